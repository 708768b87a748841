//! FellowSheep Proxy - HTTP front for the Age of Empires II leaderboard provider.
//!
//! The site cannot call the provider directly from the browser, so this
//! server forwards a handful of read-only requests and relays the JSON back.
//! Routes:
//!
//! - `GET /` and `GET /health`
//! - `GET /api/leaderboards`
//! - `GET /api/leaderboard/:id?start=&count=&sort_by=`
//! - `GET /api/player/stats?profile_ids=1,2`
//! - `GET /api/search/player?name=&leaderboard_id=`

pub mod error;
pub mod handler;
pub mod server;
pub mod upstream;

pub use error::ApiError;
pub use server::{build_router, start_server, AppState};
pub use upstream::{PageRequest, UpstreamClient};
