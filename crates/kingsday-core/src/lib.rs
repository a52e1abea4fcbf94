//! Game orchestration for the Kingsday board game.
//!
//! This crate sequences what the rule core decides:
//!
//! - [`config`] -- Typed configuration loaded from `kingsday.yaml` with
//!   environment overrides.
//! - [`setup`] -- Runtime initialization: role selection to initial
//!   per-player state and a fresh session document.
//! - [`flow`] -- The turn flow state machine: prompts, draw-cost
//!   payment, event draws, round bookkeeping, and game end.
//!
//! The flow is an explicit state machine over the persisted documents.
//! Each step returns a [`flow::FlowStep`] describing what the UI should
//! show next, replacing implicit file-presence checks with typed
//! transitions.

pub mod config;
pub mod flow;
pub mod setup;

pub use config::{ConfigError, GameConfig};
pub use flow::{FlowStep, GameFlow, GameSummary, TurnPrompt};
pub use setup::init_game_runtime;

/// Errors that can occur while orchestrating a game.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The current-game document has no seated players.
    #[error("no players in the current game")]
    NoPlayers,

    /// A document write failed.
    #[error(transparent)]
    Store(#[from] kingsday_store::StoreError),

    /// A rule-core operation failed.
    #[error(transparent)]
    Rule(#[from] kingsday_rules::RuleError),
}
