//! Axum router construction for the game API.
//!
//! Assembles all routes into a single [`Router`] with CORS middleware
//! enabled for cross-origin browser access and per-request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router for the game API.
///
/// CORS is configured to allow any origin for development; in
/// production this should be restricted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/roles", get(handlers::list_roles))
        .route("/api/game/start", post(handlers::start_game))
        .route("/api/game/action", post(handlers::game_action))
        .route("/api/game/state", get(handlers::game_state))
        .route("/api/game/reset", post(handlers::reset_game))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
