//! Route tests for the proxy.
//!
//! The router is driven with `oneshot` while a fake provider runs on
//! `127.0.0.1:0` and records the query strings it receives.

use axum::{
    body::{to_bytes, Body},
    extract::{Query, State},
    http::{header, Request, StatusCode},
    routing::get,
    Json, Router,
};
use fellowsheep_core::RetryPolicy;
use fellowsheep_proxy::{build_router, AppState, UpstreamClient};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

fn leaderboard_page() -> Value {
    json!({
        "result": {"code": 0, "message": "SUCCESS"},
        "statGroups": [{"id": 1}],
        "leaderboardStats": [
            {"statgroup_id": 1, "rank": 1, "rating": 2100},
            {"statgroup_id": 2, "rank": 2, "rating": 2050}
        ]
    })
}

async fn spawn_provider(seen: Seen, players: Value) -> String {
    let app = Router::new()
        .route(
            "/community/leaderboard/getAvailableLeaderboards",
            get(|State((seen, _)): State<(Seen, Value)>, Query(q): Query<HashMap<String, String>>| async move {
                seen.lock().unwrap().push(q);
                Json(json!({"leaderboards": [{"id": 3, "name": "1v1 Random Map"}]}))
            }),
        )
        .route(
            "/community/leaderboard/getLeaderboard2",
            get(|State((seen, players)): State<(Seen, Value)>, Query(q): Query<HashMap<String, String>>| async move {
                seen.lock().unwrap().push(q);
                Json(players)
            }),
        )
        .route(
            "/community/leaderboard/GetPersonalStat",
            get(|| async {
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"error": "maintenance"})),
                )
            }),
        )
        .with_state((seen, players));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn router_for(base: &str) -> Router {
    let upstream = UpstreamClient::new(base)
        .unwrap()
        .with_retry(RetryPolicy::once());
    build_router(Arc::new(AppState { upstream }))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_missing_params_are_rejected() {
    let app = router_for("http://127.0.0.1:9");

    let (status, body) = get_json(app.clone(), "/api/player/stats").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "profile_ids is required"}));

    let (status, body) = get_json(app.clone(), "/api/search/player?leaderboard_id=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "name is required"}));

    let (status, _) = get_json(app, "/api/leaderboard/3?count=many").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_leaderboard_is_relayed_unchanged() {
    let seen = Seen::default();
    let base = spawn_provider(seen.clone(), leaderboard_page()).await;
    let app = router_for(&base);

    let (status, body) = get_json(app, "/api/leaderboard/4?start=50&count=25").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, leaderboard_page());

    let query = seen.lock().unwrap()[0].clone();
    assert_eq!(query["title"], "age2");
    assert_eq!(query["leaderboard_id"], "4");
    assert_eq!(query["start"], "50");
    assert_eq!(query["count"], "25");
    assert_eq!(query["sortBy"], "1");
}

#[tokio::test]
async fn test_available_leaderboards_forwards_title() {
    let seen = Seen::default();
    let base = spawn_provider(seen.clone(), leaderboard_page()).await;

    let (status, body) = get_json(router_for(&base), "/api/leaderboards").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["leaderboards"][0]["id"], json!(3));
    assert_eq!(seen.lock().unwrap()[0]["title"], "age2");
}

#[tokio::test]
async fn test_search_filters_by_name() {
    let seen = Seen::default();
    let players = json!([
        {"name": "Fs.Kawan", "rating": 1850},
        {"profileName": "fs.SheepKing", "rating": 1820},
        {"name": "TheViper", "rating": 1900}
    ]);
    let base = spawn_provider(seen.clone(), players).await;

    let (status, body) = get_json(router_for(&base), "/api/search/player?name=FS.&leaderboard_id=13").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"name": "Fs.Kawan", "rating": 1850},
            {"profileName": "fs.SheepKing", "rating": 1820}
        ])
    );

    let query = seen.lock().unwrap()[0].clone();
    assert_eq!(query["leaderboard_id"], "13");
    assert_eq!(query["start"], "0");
    assert_eq!(query["count"], "1000");
}

#[tokio::test]
async fn test_search_matches_names_from_stat_groups() {
    let page = json!({
        "result": {"code": 0, "message": "SUCCESS"},
        "statGroups": [
            {"id": 1, "members": [{"profile_id": 11, "alias": "Fs.Kawan", "country": "br"}]},
            {"id": 2, "members": [{"profile_id": 22, "alias": "TheViper", "country": "no"}]}
        ],
        "leaderboardStats": [
            {"statgroup_id": 2, "rank": 1, "rating": 2400},
            {"statgroup_id": 1, "rank": 2, "rating": 1850}
        ]
    });
    let base = spawn_provider(Seen::default(), page).await;

    let (status, body) = get_json(router_for(&base), "/api/search/player?name=fs.").await;
    assert_eq!(status, StatusCode::OK);
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["alias"], json!("Fs.Kawan"));
    assert_eq!(found[0]["profile_id"], json!(11));
    assert_eq!(found[0]["rating"], json!(1850));
}

#[tokio::test]
async fn test_upstream_failure_is_500() {
    let base = spawn_provider(Seen::default(), leaderboard_page()).await;

    let (status, body) = get_json(router_for(&base), "/api/player/stats?profile_ids=1,2").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Failed to fetch player stats"));
    assert_eq!(body["message"], json!("Upstream returned 503: maintenance"));

    let (status, body) = get_json(router_for("http://127.0.0.1:9"), "/api/leaderboards").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("Failed to fetch leaderboards"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, body) = get_json(router_for("http://127.0.0.1:9"), "/api/unknown?x=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Route not found", "path": "/api/unknown?x=1"}));
}

#[tokio::test]
async fn test_root_and_health() {
    let app = router_for("https://aoe-api.reliclink.com");

    let (status, body) = get_json(app.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["service"], json!("fellowsheep-proxy"));
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));

    let (_, body) = get_json(app, "/").await;
    assert_eq!(body["status"], json!("running"));
    assert_eq!(body["api_base"], json!("https://aoe-api.reliclink.com"));
    assert_eq!(body["endpoints"]["search_player"], json!("/api/search/player"));
}

#[tokio::test]
async fn test_cors_allows_site_origin_with_credentials() {
    let app = router_for("http://127.0.0.1:9");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://fellowsheep.vercel.app")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://fellowsheep.vercel.app"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let response = router_for("http://127.0.0.1:9")
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
