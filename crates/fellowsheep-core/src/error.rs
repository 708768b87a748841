//! Error types for the FellowSheep service layer.

use std::time::Duration;
use thiserror::Error;

/// Main error type for FellowSheep operations.
#[derive(Debug, Error)]
pub enum FlockError {
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    #[error("Rate limited by {service}, retry after {retry_after_secs:?} seconds")]
    RateLimited {
        service: String,
        retry_after_secs: Option<u64>,
    },

    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to {operation}: {source}")]
    Operation {
        operation: &'static str,
        #[source]
        source: Box<FlockError>,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for FellowSheep operations.
pub type Result<T> = std::result::Result<T, FlockError>;

impl From<serde_json::Error> for FlockError {
    fn from(err: serde_json::Error) -> Self {
        FlockError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl FlockError {
    /// Attach the name of the operation that failed.
    pub fn during(self, operation: &'static str) -> Self {
        FlockError::Operation {
            operation,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping operation context.
    pub fn root(&self) -> &FlockError {
        match self {
            FlockError::Operation { source, .. } => source.root(),
            other => other,
        }
    }

    /// Check if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        match self.root() {
            FlockError::Network { .. }
            | FlockError::Timeout(_)
            | FlockError::RateLimited { .. } => true,
            FlockError::Upstream { status, .. } => *status == 408 || *status >= 500,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.root(), FlockError::Timeout(_))
    }

    /// HTTP status a server should answer with when surfacing this error.
    pub fn http_status(&self) -> u16 {
        match self.root() {
            FlockError::InvalidParams { .. } => 400,
            _ => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FlockError::Upstream {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "Upstream returned 502: bad gateway");

        let err = FlockError::Timeout(Duration::from_secs(10)).during("fetch summary");
        assert_eq!(err.to_string(), "Failed to fetch summary: Request timeout after 10s");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(FlockError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(FlockError::Upstream {
            status: 503,
            message: String::new()
        }
        .is_retryable());
        assert!(FlockError::Upstream {
            status: 501,
            message: String::new()
        }
        .is_retryable());
        assert!(FlockError::Upstream {
            status: 505,
            message: String::new()
        }
        .is_retryable());
        assert!(!FlockError::Upstream {
            status: 404,
            message: String::new()
        }
        .is_retryable());
        assert!(!FlockError::InvalidParams {
            message: "name".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_operation_context_keeps_classification() {
        let err = FlockError::Timeout(Duration::from_secs(1)).during("fetch volume");
        assert!(err.is_timeout());
        assert!(err.is_retryable());
        assert_eq!(err.http_status(), 500);

        let err = FlockError::InvalidParams {
            message: "missing name".into(),
        }
        .during("search players");
        assert_eq!(err.http_status(), 400);
    }
}
