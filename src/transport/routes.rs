//! Peer Server Routes
//!
//! Configures the Axum router serving the peer protocol.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{group_stats_handler, health_handler, peer_handler, stats_handler, AppState};

/// Creates the router for one node.
///
/// # Endpoints
/// - `GET {base_path}{group}/{key}` - Peer protocol, raw bytes (the bare
///   `{base_path}` answers 400)
/// - `GET /stats` - Counters for every group
/// - `GET /stats/:group` - Counters for one group
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // `*rest` never matches an empty remainder, so the bare prefix gets its own route.
    let peer_route = format!("{}*rest", state.base_path);

    Router::new()
        .route(&state.base_path, get(peer_handler))
        .route(&peer_route, get(peer_handler))
        .route("/stats", get(stats_handler))
        .route("/stats/:group", get(group_stats_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
