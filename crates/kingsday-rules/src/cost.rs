//! The cost resolver: normalization of authored draw-cost options and
//! draw eligibility.
//!
//! Content files spell a draw cost in two shapes -- a bare
//! `{resource, delta}` pair or a `{costs: [...]}` list -- and may
//! contain malformed entries. Normalization is total over arbitrary
//! JSON: whatever survives is a [`CostOption`] with at least one valid
//! entry, and everything else is dropped.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use kingsday_types::{PlayerState, RoleDefinition};

use crate::ledger::can_pay_cost;

// ---------------------------------------------------------------------------
// Normalized cost types
// ---------------------------------------------------------------------------

/// One validated cost entry: a resource name and a signed delta.
///
/// Deltas are usually negative (a price); positive deltas are legal and
/// grant resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEntry {
    /// The resource being charged.
    pub resource: String,
    /// The signed change applied to the resource.
    pub delta: i64,
}

/// A normalized draw-cost option: one or more entries paid together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOption {
    /// The entries of this option, all applied when it is chosen.
    pub costs: Vec<CostEntry>,
}

/// How a role's draw-cost options combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawLogic {
    /// Every option must be paid together. The default, and the
    /// fallback for any unrecognized tag.
    #[default]
    Then,
    /// Exactly one option is chosen and paid.
    Or,
}

impl DrawLogic {
    /// Parse an authored logic tag, case-insensitive, falling back to
    /// [`Self::Then`] for anything unrecognized.
    pub fn parse(tag: Option<&str>) -> Self {
        match tag.map(str::to_ascii_uppercase).as_deref() {
            Some("OR") => Self::Or,
            _ => Self::Then,
        }
    }
}

/// The result of a draw eligibility check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawEligibility {
    /// Whether at least one option is payable right now.
    pub eligible: bool,
    /// The payable options, in authored order.
    pub payable: Vec<CostOption>,
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Normalize one raw cost option.
///
/// Accepts the multi shape (`{costs: [...]}`) and the single shape
/// (`{resource, delta}`). An entry is valid when the resource is a
/// non-empty string and the delta a JSON integer. Returns `None` when
/// no valid entry survives.
pub fn normalize_cost_option(raw: &Value) -> Option<CostOption> {
    let obj = raw.as_object()?;

    if let Some(list) = obj.get("costs").and_then(Value::as_array) {
        let costs: Vec<CostEntry> = list.iter().filter_map(entry_from_value).collect();
        return (!costs.is_empty()).then_some(CostOption { costs });
    }

    entry_from_value(raw).map(|entry| CostOption {
        costs: vec![entry],
    })
}

/// Extract a valid `{resource, delta}` entry from a JSON value.
fn entry_from_value(value: &Value) -> Option<CostEntry> {
    let obj = value.as_object()?;
    let resource = obj.get("resource")?.as_str()?.trim();
    if resource.is_empty() {
        return None;
    }
    let delta = obj.get("delta")?.as_i64()?;
    Some(CostEntry {
        resource: resource.to_owned(),
        delta,
    })
}

/// Read a role's draw-cost configuration: the combination logic and the
/// normalized options, invalid options dropped.
///
/// A role without a `draw_card_cost` block resolves to
/// (`DrawLogic::Then`, no options), which downstream means "cannot
/// draw".
pub fn draw_cost_config(role: &RoleDefinition) -> (DrawLogic, Vec<CostOption>) {
    let Some(raw) = &role.draw_card_cost else {
        return (DrawLogic::Then, Vec::new());
    };

    let logic = DrawLogic::parse(raw.logic.as_deref());
    let options = raw
        .options
        .iter()
        .filter_map(normalize_cost_option)
        .collect();
    (logic, options)
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// Check whether a player can pay to draw, and which options are
/// payable.
///
/// An option is payable iff every one of its entries individually
/// passes [`can_pay_cost`] against the current status. Options are
/// evaluated independently against the original, unmodified status --
/// sequential payment under `THEN` logic is deliberately not simulated,
/// so a set of options that are each affordable alone always counts as
/// eligible even if paying them all would drain a shared resource.
pub fn check_draw_eligibility(role: &RoleDefinition, state: &PlayerState) -> DrawEligibility {
    let (_, options) = draw_cost_config(role);

    let payable: Vec<CostOption> = options
        .into_iter()
        .filter(|option| {
            option
                .costs
                .iter()
                .all(|entry| can_pay_cost(&state.status, &entry.resource, entry.delta))
        })
        .collect();

    DrawEligibility {
        eligible: !payable.is_empty(),
        payable,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use serde_json::json;

    use kingsday_types::RoleId;

    fn role_with_cost(cost: Value) -> RoleDefinition {
        let mut role = RoleDefinition {
            id: RoleId::from("role_test"),
            name: String::from("Test"),
            ..RoleDefinition::default()
        };
        role.draw_card_cost = serde_json::from_value(cost).ok();
        role
    }

    fn state_with(status: &[(&str, i64)]) -> PlayerState {
        let mut gs = PlayerState::empty(RoleId::from("role_test"));
        for (k, v) in status {
            gs.status.insert((*k).to_owned(), *v);
        }
        gs
    }

    #[test]
    fn single_shape_normalizes() {
        let opt = normalize_cost_option(&json!({"resource": "coin", "delta": -1})).unwrap();
        assert_eq!(
            opt.costs,
            [CostEntry {
                resource: String::from("coin"),
                delta: -1
            }]
        );
    }

    #[test]
    fn multi_shape_normalizes_and_drops_bad_entries() {
        let opt = normalize_cost_option(&json!({
            "costs": [
                {"resource": "money", "delta": -1},
                {"resource": "", "delta": -1},
                {"resource": "stamina"},
                {"resource": "energy", "delta": 1.5},
                {"resource": "energy", "delta": -2}
            ]
        }))
        .unwrap();
        assert_eq!(opt.costs.len(), 2);
        assert_eq!(opt.costs.first().map(|c| c.resource.as_str()), Some("money"));
        assert_eq!(opt.costs.last().map(|c| c.resource.as_str()), Some("energy"));
    }

    #[test]
    fn normalization_is_total_over_garbage() {
        assert!(normalize_cost_option(&json!(null)).is_none());
        assert!(normalize_cost_option(&json!(42)).is_none());
        assert!(normalize_cost_option(&json!({})).is_none());
        assert!(normalize_cost_option(&json!({"costs": []})).is_none());
        assert!(normalize_cost_option(&json!({"resource": 7, "delta": -1})).is_none());
        assert!(normalize_cost_option(&json!({"resource": "coin", "delta": "x"})).is_none());
    }

    #[test]
    fn logic_tag_falls_back_to_then() {
        assert_eq!(DrawLogic::parse(Some("OR")), DrawLogic::Or);
        assert_eq!(DrawLogic::parse(Some("or")), DrawLogic::Or);
        assert_eq!(DrawLogic::parse(Some("THEN")), DrawLogic::Then);
        assert_eq!(DrawLogic::parse(Some("XOR")), DrawLogic::Then);
        assert_eq!(DrawLogic::parse(None), DrawLogic::Then);
    }

    #[test]
    fn role_without_cost_block_has_no_options() {
        let role = role_with_cost(json!(null));
        let (logic, options) = draw_cost_config(&role);
        assert_eq!(logic, DrawLogic::Then);
        assert!(options.is_empty());

        let elig = check_draw_eligibility(&role, &state_with(&[("coin", 10)]));
        assert!(!elig.eligible);
    }

    #[test]
    fn or_cost_reports_only_payable_options() {
        // The worked example from the eligibility contract: coin is
        // empty, energy covers its price, so exactly the energy option
        // is payable.
        let role = role_with_cost(json!({
            "logic": "OR",
            "options": [
                {"resource": "coin", "delta": -1},
                {"resource": "energy", "delta": -2}
            ]
        }));
        let elig = check_draw_eligibility(&role, &state_with(&[("coin", 0), ("energy", 3)]));

        assert!(elig.eligible);
        assert_eq!(
            elig.payable,
            [CostOption {
                costs: vec![CostEntry {
                    resource: String::from("energy"),
                    delta: -2
                }]
            }]
        );
    }

    #[test]
    fn multi_entry_option_requires_every_entry_payable() {
        let role = role_with_cost(json!({
            "logic": "THEN",
            "options": [
                {"costs": [
                    {"resource": "money", "delta": -1},
                    {"resource": "stamina", "delta": -2}
                ]}
            ]
        }));

        let elig = check_draw_eligibility(&role, &state_with(&[("money", 1), ("stamina", 1)]));
        assert!(!elig.eligible);

        let elig = check_draw_eligibility(&role, &state_with(&[("money", 1), ("stamina", 2)]));
        assert!(elig.eligible);
    }

    #[test]
    fn options_are_judged_against_the_original_status() {
        // Two options both draw on the same resource. Each is payable
        // alone, so both are reported payable; joint affordability is
        // the caller's concern under THEN logic.
        let role = role_with_cost(json!({
            "logic": "THEN",
            "options": [
                {"resource": "coin", "delta": -2},
                {"resource": "coin", "delta": -2}
            ]
        }));
        let elig = check_draw_eligibility(&role, &state_with(&[("coin", 3)]));
        assert!(elig.eligible);
        assert_eq!(elig.payable.len(), 2);
    }
}
