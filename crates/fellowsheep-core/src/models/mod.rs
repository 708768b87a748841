//! Data models shared by the services and the proxy.

mod live;
mod player;
pub mod tracker;

pub use live::{LiveGame, LiveStream, StreamPlatform};
pub(crate) use live::{from_unix_seconds, LadderPresence, LiveMatch, TeamMember};
pub use player::{ranking_rows, ClanRanking, Leaderboard, Player, PlayerStats};
pub(crate) use player::LeaderboardsPayload;
pub use tracker::{
    AccountSummary, EloCycle, PlayerDetails, SummaryData, TimelinePoint, TrackerEnvelope,
    VolumeData,
};
