//! JSON error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use fellowsheep_core::FlockError;
use serde::Serialize;
use tracing::error;

/// Error body returned by every route: `{error, message?, path?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            message: None,
            path: None,
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: "Route not found".to_string(),
            message: None,
            path: Some(path.into()),
        }
    }

    /// A failed upstream call, reported as a 500 with the cause in `message`.
    pub fn upstream(context: &str, err: &FlockError) -> Self {
        error!("{}: {}", context, err);
        Self {
            status: StatusCode::from_u16(err.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            error: context.to_string(),
            message: Some(err.to_string()),
            path: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    #[test]
    fn test_bodies() {
        let body = serde_json::to_value(ApiError::bad_request("name is required")).unwrap();
        assert_eq!(body, json!({"error": "name is required"}));

        let body = serde_json::to_value(ApiError::not_found("/api/nope?x=1")).unwrap();
        assert_eq!(body, json!({"error": "Route not found", "path": "/api/nope?x=1"}));

        let err = ApiError::upstream(
            "Failed to fetch ranking",
            &FlockError::Timeout(Duration::from_secs(30)),
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message.as_deref(), Some("Request timeout after 30s"));
    }
}
