//! Leaderboard service backed by the site proxy.
//!
//! Provides:
//! - Available ladders, leaderboard pages and personal stats
//! - Clan filtering and player search
//! - Five minute in-memory cache per request
//! - Roster fallback whenever the proxy is down or answers with an error

use crate::cache::TtlCache;
use crate::config::{ApiConfig, CacheConfig, ClanConfig, Environment, NetworkConfig};
use crate::models::{ranking_rows, ClanRanking, Leaderboard, LeaderboardsPayload, Player};
use crate::network::{HttpClient, NO_QUERY};
use crate::services::fallback;
use crate::{FlockError, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const LEADERBOARDS_KEY: &str = "available_leaderboards";

/// Decode the player rows of a ranking response; undecodable rows are skipped.
fn players_from(ranking: Value) -> Result<Vec<Player>> {
    let rows = ranking_rows(ranking)
        .ok_or_else(|| FlockError::Other("Ranking response has no player list".to_string()))?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<Player>(row) {
            Ok(player) => Some(player),
            Err(e) => {
                warn!("Skipping malformed player row: {}", e);
                None
            }
        })
        .collect())
}

/// Client for the leaderboard endpoints of the site backend.
pub struct LeaderboardService {
    http: HttpClient,
    base_url: String,
    clan_tag: String,
    backend_available: AtomicBool,
    leaderboards: TtlCache<String, Vec<Leaderboard>>,
    rankings: TtlCache<String, Vec<Player>>,
    stats: TtlCache<String, Value>,
}

impl LeaderboardService {
    /// Create a service for `base_url` without probing it.
    ///
    /// The backend counts as unavailable until [`check_backend_availability`]
    /// succeeds, so every call is answered from the roster until then.
    ///
    /// [`check_backend_availability`]: Self::check_backend_availability
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            clan_tag: ClanConfig::CLAN_TAG.to_string(),
            backend_available: AtomicBool::new(false),
            leaderboards: TtlCache::new(CacheConfig::RANKINGS_TTL),
            rankings: TtlCache::new(CacheConfig::RANKINGS_TTL),
            stats: TtlCache::new(CacheConfig::RANKINGS_TTL),
        })
    }

    /// Create a service and probe the backend once.
    pub async fn connect(base_url: impl Into<String>) -> Result<Self> {
        let service = Self::new(base_url)?;
        service.check_backend_availability().await;
        Ok(service)
    }

    /// Connect to the backend selected by `NODE_ENV`.
    pub async fn connect_from_env() -> Result<Self> {
        let env = Environment::from_env();
        info!("Using {} site backend", env);
        Self::connect(env.site_backend_url()).await
    }

    /// Match clan members on a different tag (case-insensitive).
    pub fn with_clan_tag(mut self, tag: impl Into<String>) -> Self {
        self.clan_tag = tag.into().to_lowercase();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_backend_available(&self) -> bool {
        self.backend_available.load(Ordering::Relaxed)
    }

    /// Probe `/health` and record the outcome. Never fails.
    pub async fn check_backend_availability(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        let available = self.http.probe(&url, NetworkConfig::HEALTH_TIMEOUT).await;
        self.backend_available.store(available, Ordering::Relaxed);

        if available {
            info!("Backend available at {}", self.base_url);
        } else {
            warn!("Backend unavailable at {}, serving roster data", self.base_url);
        }
        available
    }

    /// Ladders offered by the provider.
    pub async fn available_leaderboards(&self) -> Arc<Vec<Leaderboard>> {
        let key = LEADERBOARDS_KEY.to_string();
        if let Some(cached) = self.leaderboards.get(&key) {
            return cached;
        }

        if !self.is_backend_available() {
            debug!("Serving built-in leaderboard list");
            return Arc::new(fallback::leaderboards());
        }

        let url = format!("{}/api/leaderboards", self.base_url);
        match self.http.get_json::<LeaderboardsPayload, _>(&url, NO_QUERY).await {
            Ok(payload) => {
                let boards = payload.into_vec();
                info!("Fetched {} leaderboards", boards.len());
                self.leaderboards.insert(key, boards)
            }
            Err(e) => {
                error!("Failed to fetch leaderboards: {}", e);
                Arc::new(fallback::leaderboards())
            }
        }
    }

    /// One page of a leaderboard, sorted by rating.
    ///
    /// Roster pages served as a fallback are cached like real ones.
    pub async fn leaderboard(&self, leaderboard_id: i64, start: usize, count: usize) -> Arc<Vec<Player>> {
        let key = format!("leaderboard_{}_{}_{}", leaderboard_id, start, count);
        if let Some(cached) = self.rankings.get(&key) {
            return cached;
        }

        if !self.is_backend_available() {
            debug!("Serving roster page for leaderboard {}", leaderboard_id);
            let page = fallback::leaderboard_page(leaderboard_id, start, count);
            return self.rankings.insert(key, page);
        }

        match self.fetch_leaderboard(leaderboard_id, start, count).await {
            Ok(players) => {
                info!(
                    "Fetched {} players from leaderboard {}",
                    players.len(),
                    leaderboard_id
                );
                self.rankings.insert(key, players)
            }
            Err(e) => {
                warn!(
                    "Leaderboard {} unavailable ({}), serving roster page",
                    leaderboard_id, e
                );
                let page = fallback::leaderboard_page(leaderboard_id, start, count);
                self.rankings.insert(key, page)
            }
        }
    }

    async fn fetch_leaderboard(&self, leaderboard_id: i64, start: usize, count: usize) -> Result<Vec<Player>> {
        let url = format!("{}/api/leaderboard/{}", self.base_url, leaderboard_id);
        let query = [
            ("start", start.to_string()),
            ("count", count.to_string()),
            ("sort_by", ApiConfig::DEFAULT_SORT_BY.to_string()),
        ];
        players_from(self.http.get_json(&url, &query).await?)
    }

    /// Personal stats for the given profiles, as the backend returns them.
    ///
    /// When the backend cannot answer, a list of [`PlayerStats`] for the ids
    /// known to the roster is returned instead.
    ///
    /// [`PlayerStats`]: crate::models::PlayerStats
    pub async fn personal_stats(&self, profile_ids: &[i64]) -> Arc<Value> {
        if profile_ids.is_empty() {
            return Arc::new(Value::Array(Vec::new()));
        }

        let key = format!("personal_stats_{}", join_ids(profile_ids, "_"));
        if let Some(cached) = self.stats.get(&key) {
            return cached;
        }

        if self.is_backend_available() {
            let url = format!("{}/api/player/stats", self.base_url);
            let query = [("profile_ids", join_ids(profile_ids, ","))];
            match self.http.get_json::<Value, _>(&url, &query).await {
                Ok(stats) => {
                    info!("Fetched stats for {} profiles", profile_ids.len());
                    return self.stats.insert(key, stats);
                }
                Err(e) => warn!("Personal stats unavailable ({}), serving roster stats", e),
            }
        }

        let stats = fallback::personal_stats(profile_ids)
            .into_iter()
            .filter_map(|s| serde_json::to_value(s).ok())
            .collect();
        self.stats.insert(key, Value::Array(stats))
    }

    /// Players whose name carries the clan tag.
    pub fn filter_clan_players(&self, players: &[Player]) -> Vec<Player> {
        players
            .iter()
            .filter(|p| p.name_contains(&self.clan_tag))
            .cloned()
            .collect()
    }

    /// A leaderboard page together with its clan members.
    pub async fn clan_ranking(&self, leaderboard_id: i64, start: usize, count: usize) -> ClanRanking {
        let all_players = self.leaderboard(leaderboard_id, start, count).await;
        let clan_players = self.filter_clan_players(&all_players);

        ClanRanking {
            total_clan_players: clan_players.len(),
            total_players: all_players.len(),
            all_players: all_players.as_ref().clone(),
            clan_players,
        }
    }

    /// Players whose name contains `term`, case-insensitively.
    pub async fn search_player_by_name(&self, term: &str, leaderboard_id: i64) -> Vec<Player> {
        if self.is_backend_available() {
            let url = format!("{}/api/search/player", self.base_url);
            let query = [
                ("name", term.to_string()),
                ("leaderboard_id", leaderboard_id.to_string()),
            ];
            let found = self.http.get_json::<Value, _>(&url, &query).await;
            match found.and_then(players_from) {
                Ok(players) => return players,
                Err(e) => warn!("Player search failed ({}), searching locally", e),
            }
        } else {
            debug!("Searching roster for {:?}", term);
        }

        let needle = term.to_lowercase();
        self.leaderboard(leaderboard_id, 0, ApiConfig::DEFAULT_COUNT as usize)
            .await
            .iter()
            .filter(|p| p.name_contains(&needle))
            .cloned()
            .collect()
    }

    pub fn clear_cache(&self) {
        self.leaderboards.clear();
        self.rankings.clear();
        self.stats.clear();
    }

    /// Drop expired entries; returns how many were removed.
    pub fn clear_expired_cache(&self) -> usize {
        self.leaderboards.clear_expired() + self.rankings.clear_expired() + self.stats.clear_expired()
    }
}

fn join_ids(ids: &[i64], separator: &str) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
