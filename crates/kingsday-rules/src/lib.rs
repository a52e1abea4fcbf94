//! Rule-evaluation core for the Kingsday board game.
//!
//! Everything that decides whether a move is legal or a player has won
//! lives here, separated from the turn flow that sequences it:
//!
//! - [`ledger`] -- The resource ledger: cost affordability and
//!   application with a non-negativity guarantee.
//! - [`cost`] -- The cost resolver: normalizes authored draw-cost
//!   options and computes draw eligibility.
//! - [`victory`] -- The victory registry: a closed set of win-condition
//!   kinds dispatched to one predicate each.
//! - [`winrate`] -- The win-rate aggregator: per-player-set outcome
//!   statistics across sessions.
//!
//! # Degradation, not errors
//!
//! Malformed content degrades to safe defaults -- an unaffordable draw,
//! an unmet condition, a zero counter -- rather than producing errors.
//! The single hard failure mode is a write I/O error from the store,
//! surfaced as [`RuleError`] by the few operations that persist.

pub mod cost;
pub mod ledger;
pub mod victory;
pub mod winrate;

pub use cost::{CostEntry, CostOption, DrawEligibility, DrawLogic};
pub use victory::VictoryKind;

/// Errors that can occur in the rule core.
///
/// Every variant wraps a persistence failure; pure evaluation never
/// fails.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// A document write failed.
    #[error(transparent)]
    Store(#[from] kingsday_store::StoreError),
}
