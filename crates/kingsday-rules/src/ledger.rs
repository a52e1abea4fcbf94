//! The resource ledger: affordability checks and cost application.
//!
//! Resources are plain named counters on a player's status map. The
//! ledger enforces one invariant: no resource ever goes negative.
//! Affordability is checked with saturating arithmetic so extreme
//! deltas fail closed instead of wrapping, and application clamps every
//! result at zero.

use std::collections::BTreeMap;

use tracing::debug;

use kingsday_store::GameStore;
use kingsday_types::{PlayerState, RoleId};

use crate::RuleError;
use crate::cost::CostOption;

/// Whether a single cost entry is affordable against a status map.
///
/// True iff the current value (a missing resource reads as zero) plus
/// `delta` is at least zero. The typed signature makes the malformed
/// cases of the wire format unrepresentable; anything that would have
/// been non-numeric fails closed upstream during normalization.
pub fn can_pay_cost(status: &BTreeMap<String, i64>, resource: &str, delta: i64) -> bool {
    let current = status.get(resource).copied().unwrap_or(0);
    current.saturating_add(delta) >= 0
}

/// Apply every entry of a cost option to a player's persisted state.
///
/// Loads the player's state, adds each entry's `delta` to the current
/// value clamping the result at zero, persists, and returns the updated
/// state. Entries with an empty resource name are skipped silently --
/// a no-op for that entry, not an error.
///
/// This does not re-check affordability; callers gate on
/// [`check_draw_eligibility`](crate::cost::check_draw_eligibility)
/// first. An unaffordable entry simply clamps to zero.
///
/// # Errors
///
/// Returns [`RuleError`] if the updated state cannot be written.
pub fn apply_cost_option(
    store: &GameStore,
    role_id: &RoleId,
    option: &CostOption,
) -> Result<PlayerState, RuleError> {
    let mut state = store.load_gamestate(role_id);

    for entry in &option.costs {
        if entry.resource.is_empty() {
            continue;
        }
        let current = state.status.get(&entry.resource).copied().unwrap_or(0);
        let next = current.saturating_add(entry.delta).max(0);
        debug!(
            role = %role_id,
            resource = %entry.resource,
            delta = entry.delta,
            from = current,
            to = next,
            "cost applied"
        );
        state.status.insert(entry.resource.clone(), next);
    }

    store.save_gamestate(&state)?;
    Ok(state)
}
