//! HTTP server implementation using Axum.

use crate::handler::{
    handle_health, handle_leaderboard, handle_leaderboards, handle_not_found, handle_player_stats,
    handle_root, handle_search_player,
};
use crate::upstream::UpstreamClient;
use axum::{
    body::Body,
    http::{header, HeaderValue, Method, Request},
    routing::get,
    Router,
};
use fellowsheep_core::config::ClanConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, Span};

/// Application state shared across handlers.
pub struct AppState {
    /// Leaderboard provider client
    pub upstream: UpstreamClient,
}

/// Site origins allowed to call the proxy with credentials.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = ClanConfig::ALLOWED_ORIGINS
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

/// Build the router with all routes, CORS and request logging.
pub fn build_router(state: Arc<AppState>) -> Router {
    let trace = TraceLayer::new_for_http().on_request(|request: &Request<Body>, _span: &Span| {
        info!("{} {}", request.method(), request.uri().path());
    });

    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/leaderboards", get(handle_leaderboards))
        .route("/api/leaderboard/:leaderboard_id", get(handle_leaderboard))
        .route("/api/player/stats", get(handle_player_stats))
        .route("/api/search/player", get(handle_search_player))
        .fallback(handle_not_found)
        .layer(ServiceBuilder::new().layer(trace).layer(cors_layer()))
        .with_state(state)
}

/// Start the proxy server.
///
/// Returns the actual address the server is bound to (useful when port=0).
pub async fn start_server(upstream: UpstreamClient, host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let state = Arc::new(AppState { upstream });
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
        }
    });

    Ok(actual_addr)
}
