//! The turn flow state machine.
//!
//! Drives one game session over the persisted documents:
//!
//! 1. **Prompt** -- each turn starts with a [`TurnPrompt`] telling the
//!    UI whether the seated player can afford to draw.
//! 2. **Draw** -- `THEN` costs are paid automatically in authored
//!    order; `OR` costs pause the flow with a [`FlowStep::NeedChoice`]
//!    until the player picks one payable option.
//! 3. **Event** -- a paid draw takes one card uniformly at random from
//!    the files not yet in `events_drawn`. The `game_end_immediately`
//!    effect flips the session's `game_over` flag.
//! 4. **Advance** -- the turn index wraps around the seating order;
//!    each wrap increments `rounds_completed`.
//! 5. **End** -- a finished game computes winners (explicit flags,
//!    then the victory registry, then highest `progress`) and records
//!    the outcome with the win-rate aggregator exactly once.
//!
//! Every step returns a [`FlowStep`] describing what the UI should
//! show next; the flow never blocks and never panics.

use rand::seq::IndexedRandom;
use serde::Serialize;
use tracing::{debug, info};

use kingsday_rules::cost::{self, DrawLogic};
use kingsday_rules::{CostOption, ledger, victory, winrate};
use kingsday_store::GameStore;
use kingsday_types::RoleId;
use kingsday_types::event::GAME_END_IMMEDIATELY;

use crate::FlowError;

// ---------------------------------------------------------------------------
// Step types
// ---------------------------------------------------------------------------

/// What the UI should show at the start of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnPrompt {
    /// The seated player whose turn it is.
    pub role_id: RoleId,
    /// Display name of the role.
    pub role_name: String,
    /// Whether at least one draw-cost option is affordable.
    pub can_draw: bool,
    /// Whether the turn can be skipped (always true today).
    pub can_skip: bool,
}

/// The final summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// The winning roles (possibly empty, possibly shared).
    pub winners: Vec<RoleId>,
    /// Display names matching `winners`.
    pub winner_names: Vec<String>,
    /// Why the game ended.
    pub reason: String,
    /// Full rounds completed.
    pub rounds_completed: u32,
    /// Event cards drawn over the whole game.
    pub events_drawn: u64,
}

/// The result of one flow step: what the UI should render next.
///
/// Serialized with a `ui_mode` tag so the browser can switch screens on
/// a single field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "ui_mode")]
pub enum FlowStep {
    /// Show the turn controls for the current player.
    #[serde(rename = "TURN")]
    Turn(TurnPrompt),

    /// The player must pick one of several payable cost options.
    #[serde(rename = "DRAW_COST_CHOICE")]
    NeedChoice {
        /// The player who must choose.
        role_id: RoleId,
        /// Display name of the role.
        role_name: String,
        /// The payable options, in authored order.
        choices: Vec<CostOption>,
    },

    /// The game is over.
    #[serde(rename = "GAME_OVER")]
    GameOver(GameSummary),
}

/// A parked `OR`-cost decision awaiting the player's pick.
#[derive(Debug, Clone)]
struct PendingChoice {
    role_id: RoleId,
    choices: Vec<CostOption>,
}

// ---------------------------------------------------------------------------
// GameFlow
// ---------------------------------------------------------------------------

/// The turn flow for one game session.
///
/// Holds only sequencing state (seating order, turn index, pending
/// choice, log buffer); all game state lives in the store so a fresh
/// flow can resume a persisted session.
#[derive(Debug)]
pub struct GameFlow {
    store: GameStore,
    players: Vec<RoleId>,
    turn_index: usize,
    logs: Vec<String>,
    pending_choice: Option<PendingChoice>,
    finalized: bool,
}

impl GameFlow {
    /// Create a flow over the given store. Call
    /// [`start_game`](Self::start_game) before anything else.
    pub fn new(store: GameStore) -> Self {
        Self {
            store,
            players: Vec::new(),
            turn_index: 0,
            logs: Vec::new(),
            pending_choice: None,
            finalized: false,
        }
    }

    /// The seating order of the running game.
    pub fn players(&self) -> &[RoleId] {
        &self.players
    }

    /// Whether the persisted session is marked over.
    pub fn is_game_over(&self) -> bool {
        self.store.load_current_game().game_over
    }

    /// Drain the human-readable log lines produced since the last call.
    pub fn consume_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }

    // -----------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------

    /// Begin the session from the persisted current-game document.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NoPlayers`] when no game has been
    /// initialized, or a store error from the first turn's writes.
    pub fn start_game(&mut self) -> Result<FlowStep, FlowError> {
        let current = self.store.load_current_game();
        if current.players.is_empty() {
            return Err(FlowError::NoPlayers);
        }

        self.players = current.players;
        self.turn_index = 0;
        self.pending_choice = None;
        self.finalized = false;

        info!(players = self.players.len(), "game started");
        self.logs.push(String::from("=== Game Started ==="));
        self.log_all_player_status();
        self.start_turn()
    }

    /// Open the current player's turn, or route to the end of the game.
    fn start_turn(&mut self) -> Result<FlowStep, FlowError> {
        if self.is_game_over() {
            return self.game_end();
        }

        let role_id = self.current_role()?;
        let role = self.store.load_role(&role_id);
        let role_name = role
            .as_ref()
            .map_or_else(|| role_id.to_string(), |r| r.name.clone());

        self.logs.push(format!("--- Turn: {role_name} ---"));

        let can_draw = role.as_ref().is_some_and(|r| {
            cost::check_draw_eligibility(r, &self.store.load_gamestate(&role_id)).eligible
        });

        Ok(FlowStep::Turn(TurnPrompt {
            role_id,
            role_name,
            can_draw,
            can_skip: true,
        }))
    }

    // -----------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------

    /// The current player asks to draw an event card.
    ///
    /// An unaffordable draw degrades to a skipped draw. `THEN` costs
    /// are paid in full immediately; `OR` costs park a pending choice.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on a persistence failure.
    pub fn request_draw(&mut self) -> Result<FlowStep, FlowError> {
        let role_id = self.current_role()?;
        let Some(role) = self.store.load_role(&role_id) else {
            self.logs
                .push(format!("[DRAW] No role definition for {role_id}."));
            return self.end_turn();
        };

        let state = self.store.load_gamestate(&role_id);
        let eligibility = cost::check_draw_eligibility(&role, &state);
        if !eligibility.eligible {
            self.logs
                .push(String::from("[DRAW] Cannot draw, treated as no draw."));
            return self.end_turn();
        }

        let (logic, options) = cost::draw_cost_config(&role);
        match logic {
            DrawLogic::Then => {
                // All options are one combined price, paid in authored
                // order; each application clamps at zero.
                for option in &options {
                    ledger::apply_cost_option(&self.store, &role_id, option)?;
                }
                self.logs.push(format!(
                    "[DRAW] Paid {} cost option(s) (THEN).",
                    options.len()
                ));
                self.draw_event(&role_id)?;
                self.end_turn()
            }
            DrawLogic::Or => {
                let choices = eligibility.payable;
                self.logs.push(format!(
                    "[DRAW] Choose one of {} payable option(s) (OR).",
                    choices.len()
                ));
                self.pending_choice = Some(PendingChoice {
                    role_id: role_id.clone(),
                    choices: choices.clone(),
                });
                Ok(FlowStep::NeedChoice {
                    role_id,
                    role_name: role.name,
                    choices,
                })
            }
        }
    }

    /// Resolve a pending `OR`-cost choice by index into the offered
    /// options.
    ///
    /// Without a pending choice, or when the pending player is no
    /// longer the current player, the choice is abandoned and the turn
    /// re-prompted. An out-of-range index re-issues the choice.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on a persistence failure.
    pub fn choose_draw_cost(&mut self, index: usize) -> Result<FlowStep, FlowError> {
        let Some(pending) = self.pending_choice.clone() else {
            return self.start_turn();
        };

        let current = self.current_role()?;
        if pending.role_id != current {
            debug!(pending = %pending.role_id, current = %current, "stale cost choice dropped");
            self.pending_choice = None;
            return self.start_turn();
        }

        let Some(option) = pending.choices.get(index).cloned() else {
            self.logs
                .push(format!("[DRAW] Invalid cost choice index {index}."));
            return Ok(FlowStep::NeedChoice {
                role_id: pending.role_id.clone(),
                role_name: self.role_name(&pending.role_id),
                choices: pending.choices,
            });
        };

        self.pending_choice = None;
        ledger::apply_cost_option(&self.store, &pending.role_id, &option)?;
        self.logs
            .push(format!("[DRAW] Paid chosen option {index} (OR)."));
        self.draw_event(&pending.role_id)?;
        self.end_turn()
    }

    /// The current player passes.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError`] on a persistence failure.
    pub fn skip_turn(&mut self) -> Result<FlowStep, FlowError> {
        self.logs.push(String::from("[TURN] Skip."));
        self.end_turn()
    }

    // -----------------------------------------------------------------
    // Turn advancement
    // -----------------------------------------------------------------

    /// Close the current turn and open the next one. Wrapping back to
    /// the first seat completes a round.
    fn end_turn(&mut self) -> Result<FlowStep, FlowError> {
        self.log_all_player_status();

        self.turn_index = self.turn_index.saturating_add(1);
        if self.turn_index >= self.players.len() {
            self.turn_index = 0;
            let mut current = self.store.load_current_game();
            current.rounds_completed = current.rounds_completed.saturating_add(1);
            self.store.save_current_game(&current)?;
            self.logs
                .push(format!("[ROUND] Round {} completed.", current.rounds_completed));
        }

        self.start_turn()
    }

    /// Draw one event card for the player who paid.
    ///
    /// An exhausted deck logs and draws nothing; the game goes on.
    fn draw_event(&mut self, role_id: &RoleId) -> Result<(), FlowError> {
        let mut current = self.store.load_current_game();
        let remaining: Vec<String> = self
            .store
            .list_event_files()
            .into_iter()
            .filter(|file| !current.events_drawn.contains(file))
            .collect();

        let Some(file) = remaining.choose(&mut rand::rng()).cloned() else {
            self.logs
                .push(String::from("[EVENT] No remaining event cards."));
            return Ok(());
        };

        current.events_drawn.push(file.clone());
        self.store.save_current_game(&current)?;

        let card = self.store.load_event(&file);
        let shown = if card.name.is_empty() {
            file.clone()
        } else {
            card.name.clone()
        };
        self.logs
            .push(format!("[EVENT] {role_id} drew \"{shown}\" ({file})"));

        if card
            .global_effect
            .as_ref()
            .is_some_and(|effect| effect.id == GAME_END_IMMEDIATELY)
        {
            let mut current = self.store.load_current_game();
            current.game_over = true;
            current.game_over_reason = String::from("event_game_over");
            self.store.save_current_game(&current)?;
            self.logs
                .push(String::from("[EVENT] The game ends immediately."));
        }

        Ok(())
    }

    // -----------------------------------------------------------------
    // Game end
    // -----------------------------------------------------------------

    /// Produce the final summary, recording the outcome exactly once.
    fn game_end(&mut self) -> Result<FlowStep, FlowError> {
        let current = self.store.load_current_game();
        let winners = self.calc_winners();
        let winner_names: Vec<String> = winners.iter().map(|id| self.role_name(id)).collect();

        if !self.finalized {
            self.finalized = true;
            self.logs.push(String::from("=== GAME OVER ==="));
            if winner_names.is_empty() {
                self.logs.push(String::from("No winner."));
            } else {
                self.logs
                    .push(format!("Winner(s): {}", winner_names.join(", ")));
            }
            self.log_all_player_status();

            winrate::update_winrate(
                &self.store,
                &self.players,
                &winners,
                Some(u64::try_from(current.events_drawn.len()).unwrap_or(u64::MAX)),
                Some(u64::from(current.rounds_completed)),
            )?;
        }

        Ok(FlowStep::GameOver(GameSummary {
            winners,
            winner_names,
            reason: current.game_over_reason,
            rounds_completed: current.rounds_completed,
            events_drawn: u64::try_from(current.events_drawn.len()).unwrap_or(u64::MAX),
        }))
    }

    /// Decide the winners of a finished game.
    ///
    /// Explicit `win_game` flags beat the victory registry, which beats
    /// the highest-`progress` fallback; ties share the win.
    fn calc_winners(&self) -> Vec<RoleId> {
        let flagged: Vec<RoleId> = self
            .players
            .iter()
            .filter(|id| self.store.load_gamestate(id).win_game)
            .cloned()
            .collect();
        if !flagged.is_empty() {
            return flagged;
        }

        let satisfied: Vec<RoleId> = self
            .players
            .iter()
            .filter(|id| victory::evaluate_for_role(&self.store, id))
            .cloned()
            .collect();
        if !satisfied.is_empty() {
            return satisfied;
        }

        let mut best: Option<i64> = None;
        let mut best_ids: Vec<RoleId> = Vec::new();
        for id in &self.players {
            let progress = self
                .store
                .load_gamestate(id)
                .status
                .get("progress")
                .copied()
                .unwrap_or(0);
            match best {
                Some(b) if progress < b => {}
                Some(b) if progress == b => best_ids.push(id.clone()),
                _ => {
                    best = Some(progress);
                    best_ids = vec![id.clone()];
                }
            }
        }
        best_ids
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn current_role(&self) -> Result<RoleId, FlowError> {
        self.players
            .get(self.turn_index)
            .cloned()
            .ok_or(FlowError::NoPlayers)
    }

    fn role_name(&self, role_id: &RoleId) -> String {
        self.store
            .load_role(role_id)
            .map_or_else(|| role_id.to_string(), |role| role.name)
    }

    fn log_all_player_status(&mut self) {
        let lines: Vec<String> = self
            .players
            .iter()
            .map(|id| {
                let state = self.store.load_gamestate(id);
                let status: Vec<String> = state
                    .status
                    .iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect();
                format!("[STATUS] {id}: {}", status.join(" "))
            })
            .collect();
        self.logs.extend(lines);
    }
}
