//! Rating statistics over an Elo history.
//!
//! Histories are ordered oldest first; the last element is the current rating.

use crate::models::tracker::{Deltas, Percentiles, RollingAverages};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Rolling-average windows shown on the dashboard.
pub const ROLLING_WINDOWS: [usize; 4] = [10, 30, 50, 100];

/// Percentile `p` (0-100) of an ascending slice, interpolating linearly
/// between the closest ranks.
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() || !p.is_finite() {
        return None;
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// p25, p50 and p75 of the finite ratings in `history`.
pub fn percentiles(history: &[f64]) -> Percentiles {
    let mut sorted: Vec<f64> = history.iter().copied().filter(|r| r.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);

    Percentiles {
        p25: percentile(&sorted, 25.0),
        p50: percentile(&sorted, 50.0),
        p75: percentile(&sorted, 75.0),
    }
}

/// Mean of the last `window` ratings; `None` until that many games exist.
pub fn rolling_average(history: &[f64], window: usize) -> Option<f64> {
    if window == 0 || history.len() < window {
        return None;
    }
    let recent = &history[history.len() - window..];
    Some(recent.iter().sum::<f64>() / window as f64)
}

pub fn rolling_averages(history: &[f64]) -> RollingAverages {
    let [g10, g30, g50, g100] = ROLLING_WINDOWS.map(|w| rolling_average(history, w));
    RollingAverages { g10, g30, g50, g100 }
}

/// Current rating minus the rating `window` games earlier.
pub fn delta(history: &[f64], window: usize) -> Option<f64> {
    let latest = *history.last()?;
    let earlier = history.len().checked_sub(window)?.checked_sub(1)?;
    Some(latest - history[earlier])
}

/// Everything the dashboard derives from one rating history.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EloSummary {
    pub games: usize,
    pub current: Option<f64>,
    pub peak: Option<f64>,
    pub percentiles: Percentiles,
    pub rolling_avg: RollingAverages,
    pub delta: Deltas,
}

impl EloSummary {
    pub fn from_history(history: &[f64]) -> Self {
        Self {
            games: history.len(),
            current: history.last().copied(),
            peak: history.iter().copied().reduce(f64::max),
            percentiles: percentiles(history),
            rolling_avg: rolling_averages(history),
            delta: Deltas {
                g10: delta(history, 10),
                g30: delta(history, 30),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Clicking the same column again flips the order; a new column starts ascending.
    pub fn toggled(self, same_column: bool) -> Self {
        match (same_column, self) {
            (true, SortDirection::Asc) => SortDirection::Desc,
            _ => SortDirection::Asc,
        }
    }
}

/// Look up a dotted path such as `rollingAvg.g30` or `tilt.0.type`.
pub fn value_at_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

#[derive(Debug, PartialEq)]
enum SortKey<'a> {
    Missing,
    Number(f64),
    Text(&'a str),
}

impl<'a> SortKey<'a> {
    fn of(value: Option<&'a Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(SortKey::Missing, SortKey::Number),
            Some(Value::Bool(b)) => SortKey::Number(f64::from(u8::from(*b))),
            Some(Value::String(s)) => SortKey::Text(s),
            _ => SortKey::Missing,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Missing => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Sort JSON records by the value at `path`.
///
/// Missing and `null` values sort as negative infinity, so they come first
/// ascending and last descending. The sort is stable.
pub fn sort_by_path(records: &mut [Value], path: &str, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ordering = SortKey::of(value_at_path(a, path)).compare(&SortKey::of(value_at_path(b, path)));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history(len: usize) -> Vec<f64> {
        (0..len).map(|i| 1500.0 + i as f64).collect()
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1400.0, 1500.0, 1600.0, 1700.0];
        assert_eq!(percentile(&sorted, 0.0), Some(1400.0));
        assert_eq!(percentile(&sorted, 50.0), Some(1550.0));
        assert_eq!(percentile(&sorted, 25.0), Some(1475.0));
        assert_eq!(percentile(&sorted, 100.0), Some(1700.0));
        assert_eq!(percentile(&[1234.0], 75.0), Some(1234.0));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn test_percentiles_ignore_order_and_nan() {
        let p = percentiles(&[1700.0, f64::NAN, 1400.0, 1600.0, 1500.0]);
        assert_eq!(p.p50, Some(1550.0));
        assert_eq!(percentiles(&[]), Percentiles::default());
    }

    #[test]
    fn test_rolling_average_uses_most_recent_games() {
        let h = history(40);
        // last 10 ratings are 1530..=1539
        assert_eq!(rolling_average(&h, 10), Some(1534.5));
        assert_eq!(rolling_average(&h, 50), None);
        assert_eq!(rolling_average(&h, 0), None);

        let all = rolling_averages(&h);
        assert_eq!(all.g30, Some(1524.5));
        assert_eq!(all.g100, None);
    }

    #[test]
    fn test_delta() {
        let h = history(31);
        assert_eq!(delta(&h, 30), Some(30.0));
        assert_eq!(delta(&h, 10), Some(10.0));
        assert_eq!(delta(&history(30), 30), None);
        assert_eq!(delta(&[], 10), None);
        assert_eq!(delta(&h, usize::MAX), None);
    }

    #[test]
    fn test_summary_from_history() {
        let summary = EloSummary::from_history(&[1500.0, 1620.0, 1580.0]);
        assert_eq!(summary.games, 3);
        assert_eq!(summary.current, Some(1580.0));
        assert_eq!(summary.peak, Some(1620.0));
        assert_eq!(summary.percentiles.p50, Some(1580.0));
        assert_eq!(summary.rolling_avg.g10, None);

        let value = serde_json::to_value(&summary).unwrap();
        assert!(value.get("rollingAvg").is_some());
    }

    #[test]
    fn test_value_at_path() {
        let record = json!({"rollingAvg": {"g30": 1520}, "tilt": [{"type": "elo_drop"}]});
        assert_eq!(value_at_path(&record, "rollingAvg.g30"), Some(&json!(1520)));
        assert_eq!(value_at_path(&record, "tilt.0.type"), Some(&json!("elo_drop")));
        assert_eq!(value_at_path(&record, "rollingAvg.g100"), None);
        assert_eq!(value_at_path(&record, "tilt.x"), None);
    }

    #[test]
    fn test_sort_by_path_puts_missing_values_lowest() {
        let mut records = vec![
            json!({"profile_id": 1, "rollingAvg": {"g30": 1600}}),
            json!({"profile_id": 2, "rollingAvg": {}}),
            json!({"profile_id": 3, "rollingAvg": {"g30": 1450.5}}),
            json!({"profile_id": 4, "rollingAvg": {"g30": null}}),
        ];

        sort_by_path(&mut records, "rollingAvg.g30", SortDirection::Asc);
        let ids: Vec<_> = records.iter().map(|r| r["profile_id"].clone()).collect();
        assert_eq!(ids, vec![json!(2), json!(4), json!(3), json!(1)]);

        sort_by_path(&mut records, "rollingAvg.g30", SortDirection::Desc);
        let ids: Vec<_> = records.iter().map(|r| r["profile_id"].clone()).collect();
        assert_eq!(ids[0], json!(1));
        assert_eq!(ids[1], json!(3));
    }

    #[test]
    fn test_sort_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggled(true), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(true), SortDirection::Asc);
        assert_eq!(SortDirection::Desc.toggled(false), SortDirection::Asc);
    }
}
