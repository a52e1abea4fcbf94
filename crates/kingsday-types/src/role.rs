//! Role definition content documents.
//!
//! One role per JSON file under `data/roles/`. Roles are authored
//! offline and read-only at runtime; a role is matched by its `id`
//! field, never by filename. Files that fail to parse or that lack the
//! required fields are skipped during discovery rather than failing the
//! whole listing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::RoleId;

// ---------------------------------------------------------------------------
// Role definition
// ---------------------------------------------------------------------------

/// A player archetype: initial resources, draw-card cost, and victory
/// condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDefinition {
    /// Stable role identifier (e.g. `role_vendor`).
    #[serde(default)]
    pub id: RoleId,

    /// Display name shown in the UI.
    #[serde(default)]
    pub name: String,

    /// Initial resource counters, keyed by resource name.
    #[serde(default)]
    pub init_number: BTreeMap<String, InitNumber>,

    /// Raw draw-card cost specification, if the role can draw event cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_card_cost: Option<RawDrawCost>,

    /// Initial vendor trade state, for trading roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_state_init: Option<TradeState>,

    /// The role's victory condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub victory: Option<VictorySpec>,

    /// Active skill descriptor. Only the metadata is carried; skill
    /// effects are resolved elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_skill: Option<SkillInfo>,
}

impl RoleDefinition {
    /// Whether the document carries the fields required of a playable
    /// role: a non-empty id, a non-empty name, and at least one initial
    /// resource.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.name.trim().is_empty() && !self.init_number.is_empty()
    }
}

/// An initial value for one resource counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitNumber {
    /// The starting value. Missing or malformed values default to zero.
    #[serde(default)]
    pub number: i64,
}

// ---------------------------------------------------------------------------
// Draw-card cost (raw)
// ---------------------------------------------------------------------------

/// The raw, unvalidated draw-card cost specification as authored.
///
/// Options are kept as raw JSON values because content files use two
/// shapes interchangeably (a bare `{resource, delta}` pair or a
/// `{costs: [...]}` list) and may contain malformed entries. The cost
/// resolver normalizes them, dropping anything invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDrawCost {
    /// Combination logic tag: `THEN` (pay all options) or `OR` (pay one).
    /// Anything else falls back to `THEN` at resolution time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,

    /// The raw cost options, in authored order.
    #[serde(default)]
    pub options: Vec<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Victory specification
// ---------------------------------------------------------------------------

/// A role's victory condition as authored in the content file.
///
/// The `id` selects a handler from the closed victory registry; unknown
/// ids simply never evaluate to a win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VictorySpec {
    /// Victory condition identifier (e.g. `take_n_photo`).
    #[serde(default)]
    pub id: String,

    /// Numeric goal parameters.
    #[serde(default)]
    pub params: VictoryParams,

    /// Human-readable description shown in the UI.
    #[serde(default)]
    pub description: String,
}

/// Numeric parameters for a victory condition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryParams {
    /// The goal count. Conditions that derive their targets from the
    /// player count ignore this.
    #[serde(default)]
    pub n: i64,
}

// ---------------------------------------------------------------------------
// Skill metadata
// ---------------------------------------------------------------------------

/// Active skill metadata carried through to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillInfo {
    /// Skill effect identifier.
    #[serde(default)]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// Trade state
// ---------------------------------------------------------------------------

/// Vendor pricing state: a global modifier plus per-item overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeState {
    /// Multiplier applied to base prices.
    #[serde(default = "default_price_mod")]
    pub price_mod: i64,

    /// Absolute price overrides keyed by item name.
    #[serde(default)]
    pub price_override: BTreeMap<String, i64>,
}

impl Default for TradeState {
    fn default() -> Self {
        Self {
            price_mod: default_price_mod(),
            price_override: BTreeMap::from([
                (String::from("product"), 1),
                (String::from("orange_product"), 2),
            ]),
        }
    }
}

const fn default_price_mod() -> i64 {
    1
}

// ---------------------------------------------------------------------------
// Global definitions
// ---------------------------------------------------------------------------

/// Shared content definitions from `data/global_defs.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalDefs {
    /// Fallback trade state for vendor roles without `trade_state_init`.
    #[serde(default)]
    pub trade_defaults: TradeState,
}

// ---------------------------------------------------------------------------
// Role summary
// ---------------------------------------------------------------------------

/// The minimal role projection served by the role listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleSummary {
    /// Stable role identifier.
    pub id: RoleId,
    /// Display name.
    pub name: String,
    /// Source filename under the roles directory.
    pub file: String,
    /// Initial resource counters.
    pub init_number: BTreeMap<String, InitNumber>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_role_parses_with_defaults() {
        let json = r#"{"id": "role_finn", "name": "Finn", "init_number": {"stamina": {"number": 3}}}"#;
        let role: RoleDefinition = serde_json::from_str(json).unwrap_or_default();
        assert!(role.is_valid());
        assert_eq!(role.id.as_str(), "role_finn");
        assert_eq!(
            role.init_number.get("stamina").map(|v| v.number),
            Some(3)
        );
        assert!(role.draw_card_cost.is_none());
        assert!(role.victory.is_none());
    }

    #[test]
    fn role_without_init_number_is_invalid() {
        let json = r#"{"id": "role_x", "name": "X"}"#;
        let role: RoleDefinition = serde_json::from_str(json).unwrap_or_default();
        assert!(!role.is_valid());
    }

    #[test]
    fn trade_state_defaults_match_fallback_pricing() {
        let ts = TradeState::default();
        assert_eq!(ts.price_mod, 1);
        assert_eq!(ts.price_override.get("product"), Some(&1));
        assert_eq!(ts.price_override.get("orange_product"), Some(&2));
    }

    #[test]
    fn victory_spec_defaults_params() {
        let json = r#"{"id": "vendor_trade_dynamic"}"#;
        let spec: VictorySpec = serde_json::from_str(json).unwrap_or_default();
        assert_eq!(spec.id, "vendor_trade_dynamic");
        assert_eq!(spec.params.n, 0);
    }
}
