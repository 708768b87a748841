//! Centralized configuration for the FellowSheep service layer.
//!
//! Constants are grouped by concern; the few values chosen at runtime come
//! from environment variables (`NODE_ENV`, `VITE_API_URL`).

use std::time::Duration;

/// Leaderboard provider constants.
pub struct ApiConfig;

impl ApiConfig {
    pub const UPSTREAM_BASE: &'static str = "https://aoe-api.reliclink.com";
    pub const GAME_TITLE: &'static str = "age2";
    pub const DEFAULT_LEADERBOARD_ID: i64 = 3;
    pub const DEFAULT_START: i64 = 0;
    pub const DEFAULT_COUNT: i64 = 1000;
    pub const DEFAULT_SORT_BY: i64 = 1;
}

/// Network timeouts and retry limits.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
    pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
    pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(10);
    pub const SUMMARY_DETAILED_TIMEOUT: Duration = Duration::from_secs(15);
    pub const MAX_ATTEMPTS: u32 = 2;
    pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);
    pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(2);
    pub const USER_AGENT: &'static str = "FellowSheep/0.3";
}

/// Cache freshness windows.
pub struct CacheConfig;

impl CacheConfig {
    pub const RANKINGS_TTL: Duration = Duration::from_secs(5 * 60);
    pub const LIVE_TTL: Duration = Duration::from_secs(2 * 60);
    pub const MAX_ENTRIES: u64 = 256;
}

/// Clan identity and service endpoints.
pub struct ClanConfig;

impl ClanConfig {
    pub const CLAN_TAG: &'static str = "fs.";
    pub const SITE_BACKEND_DEV: &'static str = "http://localhost:8000";
    pub const SITE_BACKEND_PROD: &'static str = "https://fellowsheep.vercel.app";
    pub const TRACKER_BACKEND_DEV: &'static str = "http://localhost:3000";
    pub const TRACKER_BACKEND_PROD: &'static str = "https://fellowsheepapi.vercel.app";
    pub const LIVE_BACKEND: &'static str = "https://fellowsheepapi.vercel.app";
    pub const ALLOWED_ORIGINS: [&'static str; 4] = [
        "http://localhost:5173",
        "http://localhost:3000",
        "https://fellowsheep.vercel.app",
        "https://fellowsheep-gaming.vercel.app",
    ];
}

/// Environment variable names read at runtime.
pub struct EnvVars;

impl EnvVars {
    pub const NODE_ENV: &'static str = "NODE_ENV";
    pub const API_URL: &'static str = "VITE_API_URL";
}

/// Deployment environment, selected by `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::parse(std::env::var(EnvVars::NODE_ENV).ok().as_deref())
    }

    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("production") => Environment::Production,
            _ => Environment::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Base URL of the site backend used by the leaderboard service.
    pub fn site_backend_url(&self) -> &'static str {
        match self {
            Environment::Development => ClanConfig::SITE_BACKEND_DEV,
            Environment::Production => ClanConfig::SITE_BACKEND_PROD,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Resolve the tracker backend URL.
///
/// An explicit override wins; otherwise the environment decides.
pub fn tracker_base_url(override_url: Option<&str>, env: Environment) -> String {
    match override_url.map(str::trim).filter(|s| !s.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None if env.is_production() => ClanConfig::TRACKER_BACKEND_PROD.to_string(),
        None => ClanConfig::TRACKER_BACKEND_DEV.to_string(),
    }
}

/// Resolve the tracker backend URL from `VITE_API_URL` and `NODE_ENV`.
pub fn tracker_base_url_from_env() -> String {
    let override_url = std::env::var(EnvVars::API_URL).ok();
    tracker_base_url(override_url.as_deref(), Environment::from_env())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parse() {
        assert_eq!(Environment::parse(Some("production")), Environment::Production);
        assert_eq!(Environment::parse(Some(" Production ")), Environment::Production);
        assert_eq!(Environment::parse(Some("test")), Environment::Development);
        assert_eq!(Environment::parse(None), Environment::Development);
    }

    #[test]
    fn test_site_backend_by_environment() {
        assert_eq!(
            Environment::Production.site_backend_url(),
            "https://fellowsheep.vercel.app"
        );
        assert_eq!(
            Environment::Development.site_backend_url(),
            "http://localhost:8000"
        );
    }

    #[test]
    fn test_tracker_base_url_override_wins() {
        assert_eq!(
            tracker_base_url(Some("https://tracker.example/"), Environment::Production),
            "https://tracker.example"
        );
        assert_eq!(
            tracker_base_url(Some("  "), Environment::Development),
            "http://localhost:3000"
        );
        assert_eq!(
            tracker_base_url(None, Environment::Production),
            "https://fellowsheepapi.vercel.app"
        );
    }

    #[test]
    fn test_ttls_are_ordered() {
        assert!(CacheConfig::LIVE_TTL < CacheConfig::RANKINGS_TTL);
        assert!(NetworkConfig::SUMMARY_TIMEOUT < NetworkConfig::SUMMARY_DETAILED_TIMEOUT);
    }
}
