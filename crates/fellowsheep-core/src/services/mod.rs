//! Data services used by the site pages.
//!
//! - [`LeaderboardService`]: ladders, rankings, stats and search via the site proxy
//! - [`LiveService`]: live clan games and curated streams
//! - [`TrackerClient`]: Elo tracker views
//!
//! The leaderboard and live services never fail: they answer from cache,
//! then the backend, then built-in data.

pub mod fallback;
mod leaderboard;
mod live;
mod tracker;

pub use leaderboard::LeaderboardService;
pub use live::{format_game_time, LiveService};
pub use tracker::{
    Dashboard, Granularity, TimeWindow, TimelineQuery, TrackerClient, TrackerQuery,
    DEFAULT_LADDER, DEFAULT_TIMELINE_DAYS,
};
