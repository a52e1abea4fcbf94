//! Shared application state and the state payload served to the UI.
//!
//! [`AppState`] holds the single [`GameSession`] behind a
//! [`tokio::sync::Mutex`]; every handler locks it for the duration of
//! the request, so turn processing is serial by construction.

use std::collections::BTreeMap;

use serde::Serialize;
use tokio::sync::Mutex;

use kingsday_core::config::RulesConfig;
use kingsday_core::{FlowStep, GameFlow};
use kingsday_rules::cost;
use kingsday_rules::{CostOption, DrawLogic};
use kingsday_store::GameStore;
use kingsday_types::{CounterValue, ProgressDetail, RoleId, SkillInfo, VictorySpec};

/// Maximum number of log lines served in a state payload.
const LOG_TAIL_LIMIT: usize = 500;

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// The one game session this process serves.
pub struct GameSession {
    /// The persistence adapter for all game documents.
    pub store: GameStore,
    /// Rule configuration applied at game setup.
    pub rules: RulesConfig,
    /// The running flow, present once a game has started.
    pub flow: Option<GameFlow>,
    /// The last flow step, echoed to the UI as its current screen.
    pub current_ui: Option<FlowStep>,
    /// Accumulated human-readable log lines.
    pub log_history: Vec<String>,
}

impl GameSession {
    /// Create an idle session over a store.
    pub fn new(store: GameStore, rules: RulesConfig) -> Self {
        Self {
            store,
            rules,
            flow: None,
            current_ui: None,
            log_history: Vec::new(),
        }
    }

    /// Drain the flow's pending log lines into the session history.
    pub fn pull_logs(&mut self) {
        if let Some(flow) = self.flow.as_mut() {
            self.log_history.extend(flow.consume_logs());
        }
    }

    /// Clear the session back to idle. The caller resets the store.
    pub fn clear(&mut self) {
        self.flow = None;
        self.current_ui = None;
        self.log_history.clear();
    }

    /// Build the full state snapshot served by every mutating endpoint
    /// and `GET /api/game/state`.
    pub fn state_payload(&self) -> GameStatePayload {
        let current = self.store.load_current_game();

        let players = current
            .players
            .iter()
            .map(|role_id| {
                let role = self.store.load_role(role_id);
                let state = self.store.load_gamestate(role_id);
                let (draw_logic, draw_options) = role
                    .as_ref()
                    .map_or((DrawLogic::Then, Vec::new()), cost::draw_cost_config);

                PlayerView {
                    role_id: role_id.clone(),
                    role_name: role
                        .as_ref()
                        .map_or_else(|| role_id.to_string(), |r| r.name.clone()),
                    status: state.status,
                    counters: state.counters,
                    win_game: state.win_game,
                    progress_detail: state.progress_detail,
                    role_meta: RoleMeta {
                        draw_logic,
                        draw_options,
                        victory: role.as_ref().and_then(|r| r.victory.clone()),
                        active_skill: role.and_then(|r| r.active_skill),
                    },
                }
            })
            .collect();

        let logs = self
            .log_history
            .iter()
            .rev()
            .take(LOG_TAIL_LIMIT)
            .rev()
            .cloned()
            .collect();

        GameStatePayload {
            game_started: self.flow.is_some(),
            game_over: current.game_over,
            game_over_reason: current.game_over_reason,
            rounds_completed: current.rounds_completed,
            events_drawn: u64::try_from(current.events_drawn.len()).unwrap_or(u64::MAX),
            ui: self.current_ui.clone(),
            players,
            logs,
        }
    }
}

/// Shared state for the Axum application.
///
/// Wrapped in an `Arc` and injected via Axum's `State` extractor.
pub struct AppState {
    /// The single game session, serialized behind a mutex.
    pub session: Mutex<GameSession>,
}

impl AppState {
    /// Create application state over a store with the given rules.
    pub fn new(store: GameStore, rules: RulesConfig) -> Self {
        Self {
            session: Mutex::new(GameSession::new(store, rules)),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// The full game snapshot served to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatePayload {
    /// Whether a game has been started this session.
    pub game_started: bool,
    /// Whether the persisted game is over.
    pub game_over: bool,
    /// Why the game ended (empty while running).
    pub game_over_reason: String,
    /// Full rounds completed.
    pub rounds_completed: u32,
    /// Event cards drawn so far.
    pub events_drawn: u64,
    /// The UI screen to show, when a game is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ui: Option<FlowStep>,
    /// One view per seated player.
    pub players: Vec<PlayerView>,
    /// The most recent log lines, oldest first.
    pub logs: Vec<String>,
}

/// One seated player's state as served to the browser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    /// The player's role id.
    pub role_id: RoleId,
    /// Display name of the role.
    pub role_name: String,
    /// General resource counters.
    pub status: BTreeMap<String, i64>,
    /// Event-driven tallies.
    pub counters: BTreeMap<String, CounterValue>,
    /// Explicit win flag.
    pub win_game: bool,
    /// Trade-goal progress snapshot, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_detail: Option<ProgressDetail>,
    /// Static role metadata for rendering controls.
    pub role_meta: RoleMeta,
}

/// Static role metadata for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleMeta {
    /// How the draw-cost options combine.
    pub draw_logic: DrawLogic,
    /// The normalized draw-cost options.
    pub draw_options: Vec<CostOption>,
    /// The role's victory condition, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victory: Option<VictorySpec>,
    /// Active skill metadata, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_skill: Option<SkillInfo>,
}
