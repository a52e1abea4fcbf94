//! Endpoint handlers for the game API.
//!
//! Every mutating handler returns the same full state payload, so the
//! browser can re-render from any response without a follow-up fetch.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use tracing::info;

use kingsday_core::{GameFlow, init_game_runtime};
use kingsday_types::{RoleId, RoleSummary};

use crate::error::ApiError;
use crate::state::{AppState, GameStatePayload};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body of `POST /api/game/start`.
#[derive(Debug, Default, Deserialize)]
pub struct StartRequest {
    /// The roles picked in the lobby. Required roles are seated even
    /// when absent here.
    #[serde(default)]
    pub selected_role_ids: Vec<RoleId>,
}

/// Body of `POST /api/game/action`: a tagged action envelope.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum GameAction {
    /// Pay the draw cost and draw an event card.
    RequestDraw,
    /// Resolve a pending `OR`-cost choice.
    ChooseDrawCost {
        /// Index into the offered options.
        index: usize,
    },
    /// Pass the turn.
    SkipTurn,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /api/health` -- liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"ok": true}))
}

/// `GET /api/roles` -- discover the selectable roles.
pub async fn list_roles(State(state): State<Arc<AppState>>) -> Json<Vec<RoleSummary>> {
    let session = state.session.lock().await;
    Json(session.store.list_roles())
}

/// `POST /api/game/start` -- initialize the runtime and start the flow.
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> Result<Json<GameStatePayload>, ApiError> {
    let mut session = state.session.lock().await;

    let seated = init_game_runtime(&session.store, &session.rules, &request.selected_role_ids)?;
    info!(players = seated.len(), "starting game");

    let mut flow = GameFlow::new(session.store.clone());
    let first = flow.start_game()?;

    session.flow = Some(flow);
    session.current_ui = Some(first);
    session.log_history.clear();
    session.pull_logs();

    Ok(Json(session.state_payload()))
}

/// `POST /api/game/action` -- perform one turn action.
pub async fn game_action(
    State(state): State<Arc<AppState>>,
    Json(action): Json<GameAction>,
) -> Result<Json<GameStatePayload>, ApiError> {
    let mut session = state.session.lock().await;

    let step = {
        let flow = session.flow.as_mut().ok_or(ApiError::NotStarted)?;
        match action {
            GameAction::RequestDraw => flow.request_draw()?,
            GameAction::ChooseDrawCost { index } => flow.choose_draw_cost(index)?,
            GameAction::SkipTurn => flow.skip_turn()?,
        }
    };

    session.current_ui = Some(step);
    session.pull_logs();

    Ok(Json(session.state_payload()))
}

/// `GET /api/game/state` -- full state snapshot.
pub async fn game_state(State(state): State<Arc<AppState>>) -> Json<GameStatePayload> {
    let session = state.session.lock().await;
    Json(session.state_payload())
}

/// `POST /api/game/reset` -- delete the runtime state and idle the
/// session. Win-rate statistics survive.
pub async fn reset_game(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GameStatePayload>, ApiError> {
    let mut session = state.session.lock().await;

    session.store.reset_runtime()?;
    session.clear();
    info!("game reset");

    Ok(Json(session.state_payload()))
}
