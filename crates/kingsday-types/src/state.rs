//! Per-player runtime state and the current-game session document.
//!
//! Both documents live under `data/runtime/` and are rewritten on every
//! mutation. Deserialization is lenient: these files can be hand-edited
//! or left half-written by a crash, and a malformed value must degrade
//! to a safe default rather than poison the whole document.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::ids::RoleId;
use crate::role::TradeState;

// ---------------------------------------------------------------------------
// Counters
// ---------------------------------------------------------------------------

/// An event-driven tally: either a plain count or a list of tokens
/// (partner ids, photo targets, help types).
///
/// Values of any other JSON type degrade to `Count(0)` at the load
/// boundary, so accessors never see malformed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CounterValue {
    /// A numeric tally.
    Count(i64),
    /// A list of string tokens, duplicates allowed.
    Tokens(Vec<String>),
}

impl Default for CounterValue {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl<'de> Deserialize<'de> for CounterValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl CounterValue {
    /// Coerce an arbitrary JSON value into a counter value.
    ///
    /// Integers become counts, arrays keep only their string elements,
    /// everything else degrades to `Count(0)`.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => Self::Count(n.as_i64().unwrap_or(0)),
            serde_json::Value::Array(items) => Self::Tokens(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(ToOwned::to_owned))
                    .collect(),
            ),
            _ => Self::Count(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Progress detail
// ---------------------------------------------------------------------------

/// Persisted snapshot of a trade-based victory condition's progress.
///
/// Written by the dynamic trade predicates on every evaluation so the UI
/// can show current-versus-target values, win or lose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressDetail {
    /// Trades required to win.
    #[serde(default)]
    pub target_trades: i64,
    /// Distinct trade partners required to win.
    #[serde(default)]
    pub target_unique_partners: i64,
    /// Trades completed so far.
    #[serde(default)]
    pub trades_done: i64,
    /// Distinct non-self partners traded with so far.
    #[serde(default)]
    pub unique_partners: i64,
}

// ---------------------------------------------------------------------------
// Player state
// ---------------------------------------------------------------------------

/// The mutable per-player game state document.
///
/// `status` holds general resources and is kept non-negative; `counters`
/// holds event-driven tallies. Created at game init, mutated on every
/// action, deleted on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// The role this state belongs to.
    #[serde(default)]
    pub role_id: RoleId,

    /// General resource counters. Values are coerced to non-negative
    /// integers at the load boundary.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: BTreeMap<String, i64>,

    /// Event-driven tallies (counts or token lists).
    #[serde(default)]
    pub counters: BTreeMap<String, CounterValue>,

    /// Vendor pricing state, for trading roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_state: Option<TradeState>,

    /// Progress snapshot for trade-based victory conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_detail: Option<ProgressDetail>,

    /// Explicit win flag set by game effects.
    #[serde(default)]
    pub win_game: bool,
}

impl PlayerState {
    /// Create an empty state for a role, as used when the persisted
    /// document is missing or unreadable.
    pub fn empty(role_id: RoleId) -> Self {
        Self {
            role_id,
            ..Self::default()
        }
    }

    /// Read a numeric counter. Token lists and missing keys read as zero.
    pub fn counter(&self, key: &str) -> i64 {
        match self.counters.get(key) {
            Some(CounterValue::Count(n)) => *n,
            _ => 0,
        }
    }

    /// Read a token-list counter. Counts and missing keys read as empty.
    pub fn tokens(&self, key: &str) -> &[String] {
        match self.counters.get(key) {
            Some(CounterValue::Tokens(items)) => items,
            _ => &[],
        }
    }

    /// Count distinct, non-empty tokens in a token-list counter.
    pub fn distinct_tokens(&self, key: &str) -> usize {
        self.tokens(key)
            .iter()
            .filter(|t| !t.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Count distinct, non-empty tokens excluding a given value
    /// (used to ignore self-references in partner lists).
    pub fn distinct_tokens_excluding(&self, key: &str, exclude: &str) -> usize {
        self.tokens(key)
            .iter()
            .filter(|t| !t.is_empty() && t.as_str() != exclude)
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Deserialize a status map from arbitrary JSON, coercing every value to
/// a non-negative integer. Malformed values become zero.
fn lenient_status<'de, D>(deserializer: D) -> Result<BTreeMap<String, i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: BTreeMap<String, serde_json::Value> = BTreeMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(k, v)| (k, v.as_i64().unwrap_or(0).max(0)))
        .collect())
}

// ---------------------------------------------------------------------------
// Current game
// ---------------------------------------------------------------------------

/// The singleton current-session document.
///
/// Created at game init, mutated through the turn loop, deleted on
/// reset. Its presence is what distinguishes "a game is running" from
/// "no game".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentGame {
    /// Unique id of this session.
    #[serde(default)]
    pub game_id: Uuid,

    /// Active players, in seating order.
    #[serde(default)]
    pub players: Vec<RoleId>,

    /// Whether the game has ended.
    #[serde(default)]
    pub game_over: bool,

    /// Why the game ended (empty while running).
    #[serde(default)]
    pub game_over_reason: String,

    /// Filenames of event cards drawn this game, in draw order.
    #[serde(default)]
    pub events_drawn: Vec<String>,

    /// Full rounds completed (every player has taken a turn).
    #[serde(default)]
    pub rounds_completed: u32,

    /// Session-wide trade state shared by global effects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_trade_state: Option<TradeState>,

    /// When the session was created.
    #[serde(default)]
    pub started_at: DateTime<Utc>,
}

impl CurrentGame {
    /// Create a fresh session document for the given seating order.
    pub fn new(players: Vec<RoleId>) -> Self {
        Self {
            game_id: Uuid::new_v4(),
            players,
            started_at: Utc::now(),
            ..Self::default()
        }
    }

    /// Whether a role is seated in this session.
    pub fn has_player(&self, role_id: &RoleId) -> bool {
        self.players.contains(role_id)
    }

    /// Number of seated players.
    pub fn player_count(&self) -> usize {
        self.players.len()
    }
}
