//! Client for the public Age of Empires II leaderboard provider.

use fellowsheep_core::config::ApiConfig;
use fellowsheep_core::network::{retry_async, HttpClient, RetryPolicy};
use fellowsheep_core::{FlockError, Result};
use serde_json::Value;
use tracing::debug;

const AVAILABLE_LEADERBOARDS: &str = "/community/leaderboard/getAvailableLeaderboards";
const LEADERBOARD: &str = "/community/leaderboard/getLeaderboard2";
const PERSONAL_STAT: &str = "/community/leaderboard/GetPersonalStat";

/// Parameters of a leaderboard page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub leaderboard_id: i64,
    pub start: i64,
    pub count: i64,
    pub sort_by: i64,
}

impl PageRequest {
    pub fn first_page(leaderboard_id: i64) -> Self {
        Self {
            leaderboard_id,
            start: ApiConfig::DEFAULT_START,
            count: ApiConfig::DEFAULT_COUNT,
            sort_by: ApiConfig::DEFAULT_SORT_BY,
        }
    }
}

/// Forwards requests to the provider and returns its JSON untouched.
#[derive(Clone)]
pub struct UpstreamClient {
    http: HttpClient,
    base_url: String,
    retry: RetryPolicy,
}

impl UpstreamClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Upstream GET {} {:?}", url, query);
        retry_async(
            &self.retry,
            || self.http.get_json(&url, query),
            FlockError::is_retryable,
        )
        .await
    }

    pub async fn available_leaderboards(&self) -> Result<Value> {
        self.get(
            AVAILABLE_LEADERBOARDS,
            &[("title", ApiConfig::GAME_TITLE.to_string())],
        )
        .await
    }

    pub async fn leaderboard(&self, page: PageRequest) -> Result<Value> {
        let query = [
            ("title", ApiConfig::GAME_TITLE.to_string()),
            ("leaderboard_id", page.leaderboard_id.to_string()),
            ("start", page.start.to_string()),
            ("count", page.count.to_string()),
            ("sortBy", page.sort_by.to_string()),
        ];
        self.get(LEADERBOARD, &query).await
    }

    /// Stats for a comma-separated id list, sent as `profile_ids=[a,b]`.
    pub async fn personal_stats(&self, profile_ids: &str) -> Result<Value> {
        let query = [
            ("title", ApiConfig::GAME_TITLE.to_string()),
            ("profile_ids", format!("[{}]", profile_ids)),
        ];
        self.get(PERSONAL_STAT, &query).await
    }
}
