//! Elo tracker client.
//!
//! The tracker backend ingests clan matches and serves aggregated views:
//! game volume, rating summaries, a timeline and +100 Elo cycles. Calls are
//! not cached; the dashboard loads each view once per refresh.

use crate::config::{tracker_base_url_from_env, NetworkConfig};
use crate::models::{
    EloCycle, PlayerDetails, SummaryData, TimelinePoint, TrackerEnvelope, VolumeData,
};
use crate::network::HttpClient;
use crate::{FlockError, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_LADDER: &str = "rm_1v1";
pub const DEFAULT_TIMELINE_DAYS: u32 = 90;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A `[from, to]` window in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    /// The `days` days ending at `now`.
    pub fn last_days(days: i64, now: DateTime<Utc>) -> Self {
        let to = now.timestamp();
        Self {
            from: to - days * SECONDS_PER_DAY,
            to,
        }
    }

    pub fn last_week(now: DateTime<Utc>) -> Self {
        Self::last_days(7, now)
    }

    pub fn last_month(now: DateTime<Utc>) -> Self {
        Self::last_days(30, now)
    }

    pub fn last_three_months(now: DateTime<Utc>) -> Self {
        Self::last_days(90, now)
    }
}

/// Ladder and optional window shared by the volume and summary views.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerQuery {
    pub ladder: String,
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl Default for TrackerQuery {
    fn default() -> Self {
        Self {
            ladder: DEFAULT_LADDER.to_string(),
            from: None,
            to: None,
        }
    }
}

impl TrackerQuery {
    pub fn ladder(ladder: impl Into<String>) -> Self {
        Self {
            ladder: ladder.into(),
            ..Self::default()
        }
    }

    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.from = Some(window.from);
        self.to = Some(window.to);
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("ladder", self.ladder.clone())];
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Granularity {
    #[default]
    Day,
    Week,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineQuery {
    pub granularity: Granularity,
    pub days: u32,
    pub ladder: String,
}

impl Default for TimelineQuery {
    fn default() -> Self {
        Self {
            granularity: Granularity::Day,
            days: DEFAULT_TIMELINE_DAYS,
            ladder: DEFAULT_LADDER.to_string(),
        }
    }
}

/// All dashboard views, each loaded independently.
#[derive(Debug)]
pub struct Dashboard {
    pub volume: Result<TrackerEnvelope<VolumeData>>,
    pub summary: Result<TrackerEnvelope<SummaryData>>,
    pub timeline: Result<TrackerEnvelope<Vec<TimelinePoint>>>,
    pub cycles: Result<TrackerEnvelope<Vec<EloCycle>>>,
}

impl Dashboard {
    pub fn is_complete(&self) -> bool {
        self.errors().is_empty()
    }

    /// Failed sections by name.
    pub fn errors(&self) -> Vec<(&'static str, &FlockError)> {
        [
            ("volume", self.volume.as_ref().err()),
            ("summary", self.summary.as_ref().err()),
            ("timeline", self.timeline.as_ref().err()),
            ("cycles", self.cycles.as_ref().err()),
        ]
        .into_iter()
        .filter_map(|(section, err)| err.map(|e| (section, e)))
        .collect()
    }
}

/// HTTP client for the tracker backend.
pub struct TrackerClient {
    http: HttpClient,
    base_url: String,
    summary_timeout: Duration,
    summary_detailed_timeout: Duration,
}

impl TrackerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            summary_timeout: NetworkConfig::SUMMARY_TIMEOUT,
            summary_detailed_timeout: NetworkConfig::SUMMARY_DETAILED_TIMEOUT,
        })
    }

    /// Client for `VITE_API_URL`, or the default backend for `NODE_ENV`.
    pub fn from_env() -> Result<Self> {
        let base_url = tracker_base_url_from_env();
        info!("Tracker backend: {}", base_url);
        Self::new(base_url)
    }

    /// Override the summary timeouts (without and with player details).
    pub fn with_summary_timeouts(mut self, plain: Duration, detailed: Duration) -> Self {
        self.summary_timeout = plain;
        self.summary_detailed_timeout = detailed;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        operation: &'static str,
    ) -> Result<T> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, params);
        self.http
            .get_json(&url, params)
            .await
            .map_err(|e| e.during(operation))
    }

    /// Ask the tracker to ingest new matches.
    pub async fn pull(&self, profile_id: Option<i64>, since: Option<i64>) -> Result<Value> {
        let mut params = Vec::new();
        if let Some(id) = profile_id {
            params.push(("profile_id", id.to_string()));
        }
        if let Some(since) = since {
            params.push(("since", since.to_string()));
        }

        let url = self.url("/api/tracker/pull");
        debug!("POST {} {:?}", url, params);
        let result: Value = self
            .http
            .post_json(&url, &params)
            .await
            .map_err(|e| e.during("run pull"))?;
        info!("Tracker pull completed");
        Ok(result)
    }

    /// Games per account and consolidated.
    pub async fn volume(&self, query: &TrackerQuery) -> Result<TrackerEnvelope<VolumeData>> {
        self.get("/api/tracker/volume", &query.params(), "fetch volume")
            .await
    }

    /// Rating metrics per account and consolidated.
    ///
    /// A detailed request that times out is retried once without details;
    /// every account then gets [`PlayerDetails::unknown`].
    pub async fn summary(
        &self,
        query: &TrackerQuery,
        include_details: bool,
    ) -> Result<TrackerEnvelope<SummaryData>> {
        match self.fetch_summary(query, include_details).await {
            Err(e) if include_details && e.is_timeout() => {
                warn!("Detailed summary timed out, retrying without details");
                let mut summary = self
                    .fetch_summary(query, false)
                    .await
                    .map_err(|e| e.during("fetch summary without details"))?;
                for account in &mut summary.data.by_account {
                    account.player = Some(PlayerDetails::unknown());
                }
                Ok(summary)
            }
            other => other.map_err(|e| e.during("fetch summary")),
        }
    }

    async fn fetch_summary(
        &self,
        query: &TrackerQuery,
        include_details: bool,
    ) -> Result<TrackerEnvelope<SummaryData>> {
        let mut params = query.params();
        params.push(("includeDetails", include_details.to_string()));
        let timeout = if include_details {
            self.summary_detailed_timeout
        } else {
            self.summary_timeout
        };

        let url = self.url("/api/tracker/summary");
        debug!("GET {} {:?} (timeout {:?})", url, params, timeout);
        self.http.get_json_with_timeout(&url, &params, timeout).await
    }

    pub async fn timeline(&self, query: &TimelineQuery) -> Result<TrackerEnvelope<Vec<TimelinePoint>>> {
        let params = [
            ("granularity", query.granularity.as_str().to_string()),
            ("days", query.days.to_string()),
            ("ladder", query.ladder.clone()),
        ];
        self.get("/api/tracker/timeline", &params, "fetch timeline")
            .await
    }

    /// +100 Elo climbs on `ladder`.
    pub async fn cycles(&self, ladder: &str) -> Result<TrackerEnvelope<Vec<EloCycle>>> {
        let params = [("ladder", ladder.to_string())];
        self.get("/api/tracker/cycles", &params, "fetch cycles")
            .await
    }

    /// True when `GET /api` answers 200.
    pub async fn check_api_status(&self) -> bool {
        let url = self.url("/api");
        let request = self
            .http
            .inner()
            .get(&url)
            .timeout(self.http.default_timeout());

        match request.send().await {
            Ok(response) if response.status() == StatusCode::OK => true,
            Ok(response) => {
                warn!("Tracker API answered {}", response.status());
                false
            }
            Err(e) => {
                warn!("Tracker API unavailable: {}", e);
                false
            }
        }
    }

    /// Load every dashboard view concurrently.
    pub async fn dashboard(&self, query: &TrackerQuery, timeline: &TimelineQuery) -> Dashboard {
        let (volume, summary, timeline, cycles) = tokio::join!(
            self.volume(query),
            self.summary(query, true),
            self.timeline(timeline),
            self.cycles(&query.ladder),
        );

        let dashboard = Dashboard {
            volume,
            summary,
            timeline,
            cycles,
        };
        for (section, e) in dashboard.errors() {
            warn!("Dashboard section {} failed: {}", section, e);
        }
        dashboard
    }
}
