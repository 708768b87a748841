//! Elo tracker payloads.
//!
//! Every tracker endpoint answers `{ "data": ... }`. Fields the dashboard
//! reads are typed; the rest stays as JSON in `extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `{ data: ... }` envelope shared by all tracker endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerEnvelope<T> {
    pub data: T,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Weekly and monthly game counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeCounts {
    #[serde(default)]
    pub week: Option<f64>,
    #[serde(default)]
    pub month: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeData {
    #[serde(default)]
    pub consolidated: Option<VolumeCounts>,
    #[serde(default)]
    pub by_account: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Percentiles {
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
}

/// Mean rating over the last N games (`g10` = last 10 games).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RollingAverages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g30: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g50: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g100: Option<f64>,
}

/// Rating change over the last N games.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Deltas {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g10: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub g30: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedSummary {
    #[serde(default)]
    pub percentiles: Percentiles,
    #[serde(default)]
    pub rolling_avg: RollingAverages,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Player identity attached to an account when details are requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetails {
    #[serde(default)]
    pub nick: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub rating_now: Option<f64>,
}

impl PlayerDetails {
    /// Placeholder used when details could not be loaded.
    pub fn unknown() -> Self {
        Self {
            nick: "Unknown".to_string(),
            country: Some("unknown".to_string()),
            rating_now: None,
        }
    }
}

/// A detected tilt episode (loss streak or Elo drop).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TiltEvent {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub losses: Option<i64>,
    #[serde(default)]
    pub elo_drop: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(rename = "profile_id", default)]
    pub profile_id: i64,
    #[serde(default)]
    pub player: Option<PlayerDetails>,
    #[serde(default)]
    pub volume: VolumeCounts,
    #[serde(default)]
    pub rolling_avg: RollingAverages,
    #[serde(default)]
    pub delta: Deltas,
    #[serde(default)]
    pub tilt: Vec<TiltEvent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountSummary {
    /// The most recent tilt episode, if any.
    pub fn recent_tilt(&self) -> Option<&TiltEvent> {
        self.tilt.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryData {
    #[serde(default)]
    pub consolidated: Option<ConsolidatedSummary>,
    #[serde(default)]
    pub by_account: Vec<AccountSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bucket (day or week) of the Elo timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    #[serde(default)]
    pub last_elo: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A climb of 100 Elo points and what it took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EloCycle {
    #[serde(default)]
    pub elo_from: f64,
    #[serde(default)]
    pub elo_to: f64,
    #[serde(default)]
    pub games_in_cycle: f64,
    #[serde(default)]
    pub days_in_cycle: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EloCycle {
    /// Games played per day during the climb; `None` for same-day cycles.
    pub fn games_per_day(&self) -> Option<f64> {
        (self.days_in_cycle > 0.0).then(|| self.games_in_cycle / self.days_in_cycle)
    }
}
