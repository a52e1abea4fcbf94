//! Cross-session outcome statistics.
//!
//! The win-rate document survives runtime resets; it accumulates one
//! entry per distinct player set across every completed game.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregate statistics for one distinct player set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinrateRecord {
    /// Completed games with this exact player set.
    #[serde(default)]
    pub games: u64,

    /// Win tally per role id.
    #[serde(default)]
    pub wins: BTreeMap<String, u64>,

    /// Total event cards drawn across all games of this set.
    #[serde(default)]
    pub draws_total: u64,

    /// Total rounds completed across all games of this set.
    #[serde(default)]
    pub rounds_total: u64,

    /// Average draws per game, rounded to two decimals.
    #[serde(default)]
    pub avg_draws: f64,

    /// Average rounds per game, rounded to two decimals.
    #[serde(default)]
    pub avg_rounds: f64,
}

/// The whole win-rate statistics document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WinrateStats {
    /// Completed games across all player sets.
    #[serde(default)]
    pub total_games: u64,

    /// Per-player-set records, keyed by the sorted pipe-joined id set.
    #[serde(default)]
    pub by_player_set: BTreeMap<String, WinrateRecord>,

    /// When the document was last written.
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}
