//! JSON HTTP client.
//!
//! Wraps reqwest with:
//! - Per-request timeouts that surface as [`FlockError::Timeout`]
//! - Upstream status classification (429 → rate limited, other non-2xx → upstream error)
//! - Extraction of the `error` field from JSON error bodies

use crate::config::NetworkConfig;
use crate::{FlockError, Result};
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Empty query string for endpoints without parameters.
pub const NO_QUERY: &[(&str, &str)] = &[];

/// HTTP client speaking JSON to the leaderboard provider and site backends.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    /// Create a client with the default request timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(NetworkConfig::REQUEST_TIMEOUT)
    }

    /// Create a client with a custom default timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(NetworkConfig::USER_AGENT)
            .build()
            .map_err(|e| FlockError::Network {
                message: format!("Failed to create HTTP client: {}", e),
                cause: None,
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// GET `url` with query parameters and decode the JSON body.
    pub async fn get_json<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.get_json_with_timeout(url, query, self.default_timeout)
            .await
    }

    /// GET with an explicit timeout for this request only.
    pub async fn get_json_with_timeout<T, Q>(&self, url: &str, query: &Q, timeout: Duration) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.client.get(url).query(query);
        let response = self.send(request, "GET", url, timeout).await?;
        decode(response, url).await
    }

    /// POST with query parameters and an empty body, decoding the JSON reply.
    pub async fn post_json<T, Q>(&self, url: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.client.post(url).query(query);
        let response = self.send(request, "POST", url, self.default_timeout).await?;
        decode(response, url).await
    }

    /// Report whether `url` answers with a 2xx status within `timeout`.
    pub async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Probe of {} failed: {}", url, e);
                false
            }
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        method: &str,
        url: &str,
        timeout: Duration,
    ) -> Result<Response> {
        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                FlockError::Timeout(timeout)
            } else {
                FlockError::Network {
                    message: format!("{} {} failed: {}", method, url, e),
                    cause: std::error::Error::source(&e).map(|s| s.to_string()),
                }
            }
        })?;

        check_status(response, url).await
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        return Err(FlockError::RateLimited {
            service: extract_domain(url),
            retry_after_secs: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = upstream_error_message(&body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    warn!("{} answered {}: {}", url, status, message);

    Err(FlockError::Upstream {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| FlockError::Network {
        message: format!("Failed to read body from {}: {}", url, e),
        cause: None,
    })?;
    serde_json::from_slice(&bytes).map_err(|e| FlockError::Json {
        message: format!("Failed to parse response from {}: {}", url, e),
        source: Some(e),
    })
}

/// Pull a human-readable message out of a JSON error body.
///
/// Accepts `{"error": "..."}`, `{"message": "..."}` and `{"detail": "..."}`.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(String::from)
}

/// Extract domain from a URL.
pub fn extract_domain(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.host_str().unwrap_or("unknown").to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
