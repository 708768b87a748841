//! Route handlers.

use crate::error::ApiError;
use crate::server::AppState;
use crate::upstream::PageRequest;
use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use fellowsheep_core::config::ApiConfig;
use fellowsheep_core::models::ranking_rows;
use fellowsheep_core::FlockError;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "fellowsheep-proxy";

/// Raw query strings; numbers are parsed by hand so bad input gets a JSON 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub start: Option<String>,
    pub count: Option<String>,
    pub sort_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    pub profile_ids: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub leaderboard_id: Option<String>,
}

fn parse_int(name: &str, value: Option<&str>, default: i64) -> Result<i64, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => v
            .parse()
            .map_err(|_| ApiError::bad_request(format!("{} must be an integer", name))),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Service banner listing the routes.
pub async fn handle_root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "message": "FellowSheep Gaming API Proxy",
        "status": "running",
        "api_base": state.upstream.base_url(),
        "endpoints": {
            "health": "/health",
            "leaderboards": "/api/leaderboards",
            "leaderboard": "/api/leaderboard/:id",
            "player_stats": "/api/player/stats",
            "search_player": "/api/search/player"
        }
    }))
}

/// Health check endpoint.
pub async fn handle_health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }))
}

pub async fn handle_leaderboards(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let boards = state
        .upstream
        .available_leaderboards()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch leaderboards", &e))?;
    info!("Leaderboards loaded");
    Ok(Json(boards))
}

pub async fn handle_leaderboard(
    State(state): State<Arc<AppState>>,
    Path(leaderboard_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let page = PageRequest {
        leaderboard_id: parse_int("leaderboard_id", Some(&leaderboard_id), ApiConfig::DEFAULT_LEADERBOARD_ID)?,
        start: parse_int("start", params.start.as_deref(), ApiConfig::DEFAULT_START)?,
        count: parse_int("count", params.count.as_deref(), ApiConfig::DEFAULT_COUNT)?,
        sort_by: parse_int("sort_by", params.sort_by.as_deref(), ApiConfig::DEFAULT_SORT_BY)?,
    };

    let ranking = state
        .upstream
        .leaderboard(page)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch ranking", &e))?;
    info!("Ranking {} loaded", page.leaderboard_id);
    Ok(Json(ranking))
}

pub async fn handle_player_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Value>, ApiError> {
    let profile_ids =
        non_empty(params.profile_ids).ok_or_else(|| ApiError::bad_request("profile_ids is required"))?;

    let stats = state
        .upstream
        .personal_stats(&profile_ids)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch player stats", &e))?;
    info!("Stats loaded for {}", profile_ids);
    Ok(Json(stats))
}

pub async fn handle_search_player(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let name = non_empty(params.name).ok_or_else(|| ApiError::bad_request("name is required"))?;
    let leaderboard_id = parse_int(
        "leaderboard_id",
        params.leaderboard_id.as_deref(),
        ApiConfig::DEFAULT_LEADERBOARD_ID,
    )?;

    let ranking = state
        .upstream
        .leaderboard(PageRequest::first_page(leaderboard_id))
        .await
        .map_err(|e| ApiError::upstream("Failed to search player", &e))?;

    let matches = filter_by_name(ranking, &name).ok_or_else(|| {
        let cause = FlockError::Other("Leaderboard response has no player list".to_string());
        ApiError::upstream("Failed to search player", &cause)
    })?;
    info!("Search for '{}' returned {} results", name, matches.len());
    Ok(Json(Value::Array(matches)))
}

/// Fallback for unknown routes.
pub async fn handle_not_found(uri: Uri) -> ApiError {
    let path = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    ApiError::not_found(path)
}

/// The name a record is searched by: `name`, else `profileName`, else `alias`.
fn searchable_name(player: &Value) -> &str {
    ["name", "profileName", "alias"]
        .iter()
        .filter_map(|key| player.get(key).and_then(Value::as_str))
        .find(|n| !n.is_empty())
        .unwrap_or("")
}

/// Players whose name contains `term`, case-insensitively.
///
/// Accepts a bare player list or the provider's page object. Page rows are
/// returned with their stat group member's `alias`, `profile_id` and
/// `country` merged in; anything else yields `None`.
pub fn filter_by_name(ranking: Value, term: &str) -> Option<Vec<Value>> {
    let players = ranking_rows(ranking)?;

    let needle = term.to_lowercase();
    Some(
        players
            .into_iter()
            .filter(|p| searchable_name(p).to_lowercase().contains(&needle))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("start", None, 0).unwrap(), 0);
        assert_eq!(parse_int("start", Some(" 25 "), 0).unwrap(), 25);
        assert_eq!(parse_int("count", Some(""), 1000).unwrap(), 1000);
        let err = parse_int("count", Some("lots"), 1000).unwrap_err();
        assert_eq!(err.error, "count must be an integer");
    }

    #[test]
    fn test_filter_by_name_prefers_name_field() {
        let ranking = json!([
            {"name": "Fs.Kawan", "profileName": "ignored"},
            {"profileName": "fs.sheepking"},
            {"name": "", "profileName": "FS.Ram"},
            {"name": "TheViper"}
        ]);
        let found = filter_by_name(ranking, "FS.").unwrap();
        assert_eq!(found.len(), 3);

        let found = filter_by_name(json!([{"name": "Hera", "profileName": "Fs.Hera"}]), "fs.").unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_filter_by_name_page_object() {
        let page = json!({"leaderboardStats": [{"name": "DauT"}, {"name": "Yo"}], "rankTotal": 2});
        assert_eq!(filter_by_name(page, "dau").unwrap().len(), 1);
        assert!(filter_by_name(json!({"result": {}}), "x").is_none());
        assert!(filter_by_name(json!("nope"), "x").is_none());
    }

    #[test]
    fn test_filter_by_name_uses_stat_group_alias() {
        let page = json!({
            "statGroups": [
                {"id": 7, "members": [{"profile_id": 70, "alias": "Fs.Kawan"}]},
                {"id": 8, "members": [{"profile_id": 80, "alias": "Hera"}]}
            ],
            "leaderboardStats": [
                {"statgroup_id": 7, "rating": 1850},
                {"statgroup_id": 8, "rating": 2300}
            ]
        });
        let found = filter_by_name(page, "kawan").unwrap();
        assert_eq!(
            found,
            vec![json!({"statgroup_id": 7, "rating": 1850, "alias": "Fs.Kawan", "profile_id": 70})]
        );
    }
}
