//! Shared type definitions for the Kingsday board game.
//!
//! This crate is the single source of truth for every document shape the
//! game persists or serves: role definitions authored as content files,
//! per-player runtime state, the current-game session document, event
//! cards, and the cross-session win-rate statistics.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers
//! - [`role`] -- Role definition content documents
//! - [`state`] -- Per-player game state and the current-game document
//! - [`event`] -- Event card content documents
//! - [`winrate`] -- Cross-session outcome statistics
//!
//! # Leniency
//!
//! Runtime documents are edited by the game but may also be hand-edited
//! or partially written after a crash. Deserialization is therefore
//! lenient at the load boundary: resource values coerce to non-negative
//! integers, counters of the wrong JSON type degrade to an empty value,
//! and missing fields take documented defaults. Accessors downstream can
//! then assume well-formed data.

pub mod event;
pub mod ids;
pub mod role;
pub mod state;
pub mod winrate;

// Re-export all public types at crate root for convenience.
pub use event::{EventCard, GlobalEffect};
pub use ids::RoleId;
pub use role::{
    GlobalDefs, InitNumber, RawDrawCost, RoleDefinition, RoleSummary, SkillInfo, TradeState,
    VictoryParams, VictorySpec,
};
pub use state::{CounterValue, CurrentGame, PlayerState, ProgressDetail};
pub use winrate::{WinrateRecord, WinrateStats};
