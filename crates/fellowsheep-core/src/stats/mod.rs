//! Elo statistics and dashboard formatting.

mod elo;
mod format;

pub use elo::{
    delta, percentile, percentiles, rolling_average, rolling_averages, sort_by_path,
    value_at_path, EloSummary, SortDirection, ROLLING_WINDOWS,
};
pub use format::{
    calculate_winrate, format_date, format_delta, format_elo, format_number, format_timestamp,
    relative_time, EloTier, Styled, TiltKind,
};
