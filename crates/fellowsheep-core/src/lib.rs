//! FellowSheep Core - service layer behind the FellowSheep Gaming clan site.
//!
//! This crate fetches, caches and reshapes data from the Age of Empires II
//! leaderboard provider and the clan's own tracker backend. It can be used
//! without any HTTP server; the `fellowsheep-proxy` crate builds on top of it.
//!
//! # Example
//!
//! ```rust,ignore
//! use fellowsheep_core::LeaderboardService;
//!
//! #[tokio::main]
//! async fn main() -> fellowsheep_core::Result<()> {
//!     let service = LeaderboardService::connect_from_env().await?;
//!
//!     let ranking = service.clan_ranking(3, 0, 1000).await;
//!     println!(
//!         "{} of {} ranked players wear the clan tag",
//!         ranking.total_clan_players, ranking.total_players
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod services;
pub mod stats;

pub use cache::TtlCache;
pub use config::Environment;
pub use error::{FlockError, Result};
pub use models::{
    ClanRanking, Leaderboard, LiveGame, LiveStream, Player, PlayerStats, StreamPlatform,
};
pub use network::{HttpClient, RetryPolicy};
pub use services::{Dashboard, LeaderboardService, LiveService, TrackerClient};
