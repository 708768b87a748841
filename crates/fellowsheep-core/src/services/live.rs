//! Live clan games and streams.

use crate::cache::TtlCache;
use crate::config::{CacheConfig, ClanConfig};
use crate::models::{
    from_unix_seconds, LadderPresence, LiveGame, LiveMatch, LiveStream, TeamMember,
};
use crate::network::{HttpClient, NO_QUERY};
use crate::services::fallback;
use crate::{FlockError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const LIVE_GAMES_KEY: &str = "live_games";
const TWITCH_KEY: &str = "twitch_streams";
const YOUTUBE_KEY: &str = "youtube_streams";

const PLACEHOLDER_OPPONENT: &str = "Adversário";
const LADDER_MAP: &str = "Ranked Queue";
const LADDER_GAME_TYPE: &str = "1v1 Random Map";
const DEFAULT_TEAM_0: &str = "Time A";
const DEFAULT_TEAM_1: &str = "Time B";
const DEFAULT_MAP: &str = "Ranked";

/// Client for the live endpoints of the tracker backend.
pub struct LiveService {
    http: HttpClient,
    base_url: String,
    games: TtlCache<String, Vec<LiveGame>>,
    streams: TtlCache<String, Vec<LiveStream>>,
}

impl LiveService {
    pub fn new() -> Result<Self> {
        Self::with_base_url(ClanConfig::LIVE_BACKEND)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            games: TtlCache::new(CacheConfig::LIVE_TTL),
            streams: TtlCache::new(CacheConfig::LIVE_TTL),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Games clan members are playing right now.
    ///
    /// Team matches are preferred; when none are listed, ranked 1v1 activity
    /// is shown against a placeholder opponent. Failures yield an empty list
    /// and are not cached.
    pub async fn live_games(&self) -> Arc<Vec<LiveGame>> {
        let fetched = self
            .games
            .get_or_try_insert_with(LIVE_GAMES_KEY.to_string(), || async {
                let games = self.fetch_live_games().await?;
                info!("Fetched {} live games", games.len());
                Ok::<_, FlockError>(games)
            })
            .await;

        fetched.unwrap_or_else(|e| {
            error!("Failed to fetch live games: {}", e);
            Arc::new(Vec::new())
        })
    }

    async fn fetch_live_games(&self) -> Result<Vec<LiveGame>> {
        let url = format!("{}/api/liveFsMatches", self.base_url);
        let matches = match self.http.get_json::<Value, _>(&url, NO_QUERY).await? {
            Value::Array(items) if !items.is_empty() => items,
            _ => {
                debug!("No team matches listed, falling back to ladder activity");
                return self.fetch_ladder_games().await;
            }
        };

        Ok(decode_records::<LiveMatch>(matches, "live match")
            .into_iter()
            .map(game_from_match)
            .collect())
    }

    async fn fetch_ladder_games(&self) -> Result<Vec<LiveGame>> {
        let url = format!("{}/api/liveFs1v1", self.base_url);
        let Value::Array(players) = self.http.get_json::<Value, _>(&url, NO_QUERY).await? else {
            return Ok(Vec::new());
        };

        Ok(decode_records::<LadderPresence>(players, "ladder entry")
            .into_iter()
            .map(game_from_presence)
            .collect())
    }

    /// Curated Twitch channels. There is no Twitch integration yet.
    pub async fn twitch_streams(&self) -> Arc<Vec<LiveStream>> {
        let key = TWITCH_KEY.to_string();
        match self.streams.get(&key) {
            Some(cached) => cached,
            None => self.streams.insert(key, fallback::twitch_streams()),
        }
    }

    /// Curated YouTube channels. There is no YouTube integration yet.
    pub async fn youtube_streams(&self) -> Arc<Vec<LiveStream>> {
        let key = YOUTUBE_KEY.to_string();
        match self.streams.get(&key) {
            Some(cached) => cached,
            None => self.streams.insert(key, fallback::youtube_streams()),
        }
    }

    /// Twitch and YouTube streams, Twitch first.
    pub async fn all_live_streams(&self) -> Vec<LiveStream> {
        let (twitch, youtube) = tokio::join!(self.twitch_streams(), self.youtube_streams());
        twitch.iter().chain(youtube.iter()).cloned().collect()
    }

    pub fn clear_cache(&self) {
        self.games.clear();
        self.streams.clear();
    }

    pub fn clear_expired_cache(&self) -> usize {
        self.games.clear_expired() + self.streams.clear_expired()
    }
}

fn team_names(members: &[TeamMember]) -> Option<String> {
    let names = members
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    (!names.is_empty()).then_some(names)
}

/// Decode each record on its own so one bad entry does not hide the rest.
fn decode_records<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping malformed {}: {}", what, e);
                None
            }
        })
        .collect()
}

fn game_from_match(m: LiveMatch) -> LiveGame {
    let teams = m.teams.unwrap_or_default();
    LiveGame {
        id: m.id,
        player1: team_names(&teams.team0).unwrap_or_else(|| DEFAULT_TEAM_0.to_string()),
        player2: team_names(&teams.team1).unwrap_or_else(|| DEFAULT_TEAM_1.to_string()),
        map: non_empty(m.mapname).unwrap_or_else(|| DEFAULT_MAP.to_string()),
        game_type: non_empty(m.game_type).unwrap_or_else(|| DEFAULT_MAP.to_string()),
        start_time: from_unix_seconds(m.startgametime),
        status: "playing".to_string(),
        score: "0-0".to_string(),
    }
}

fn game_from_presence(p: LadderPresence) -> LiveGame {
    LiveGame {
        id: p.profile_id,
        player1: p.name,
        player2: PLACEHOLDER_OPPONENT.to_string(),
        map: LADDER_MAP.to_string(),
        game_type: LADDER_GAME_TYPE.to_string(),
        start_time: from_unix_seconds(p.last_match_time),
        status: "playing".to_string(),
        score: "0-0".to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Elapsed time since `start`: `"42m"` under an hour, `"1h 5m"` above.
///
/// A start in the future counts as zero minutes.
pub fn format_game_time(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - start).num_minutes().max(0);
    if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}
