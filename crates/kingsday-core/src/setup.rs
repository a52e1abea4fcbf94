//! Runtime initialization: from a role selection to a playable session.
//!
//! Setup is the one place that writes initial state. It de-duplicates
//! the selection, seats the required roles, builds each player's
//! starting status from the role's `init_number`, gives the vendor its
//! trade counters, and writes a fresh current-game document. Everything
//! downstream assumes these documents exist.

use std::collections::BTreeMap;

use tracing::{info, warn};

use kingsday_store::GameStore;
use kingsday_types::{CounterValue, CurrentGame, PlayerState, ProgressDetail, RoleId};

use crate::FlowError;
use crate::config::RulesConfig;

/// Initialize the runtime documents for a new game.
///
/// Returns the seated players in seating order: required roles first
/// (in configured order), then the selection with duplicates and
/// unknown ids dropped.
///
/// # Errors
///
/// Returns [`FlowError::Store`] if any document write fails.
pub fn init_game_runtime(
    store: &GameStore,
    rules: &RulesConfig,
    selected: &[RoleId],
) -> Result<Vec<RoleId>, FlowError> {
    // De-duplicate while preserving selection order.
    let mut chosen: Vec<RoleId> = Vec::new();
    for role_id in selected {
        if !chosen.contains(role_id) {
            chosen.push(role_id.clone());
        }
    }

    // Required roles are always seated, ahead of the selection.
    for required in rules.required_roles.iter().rev() {
        let role_id = RoleId::from(required.as_str());
        if !chosen.contains(&role_id) {
            chosen.insert(0, role_id);
        }
    }

    // Drop ids with no content file; a playable session needs a
    // definition for every seat.
    let global_defaults = store.load_global_defs().trade_defaults;
    let mut seated: Vec<RoleId> = Vec::new();
    for role_id in chosen {
        let Some(role) = store.load_role(&role_id) else {
            warn!(role = %role_id, "selected role has no content file, skipping");
            continue;
        };

        let mut status: BTreeMap<String, i64> = role
            .init_number
            .iter()
            .map(|(resource, init)| (resource.clone(), init.number.max(0)))
            .collect();
        status.entry(String::from("progress")).or_insert(0);

        let mut state = PlayerState::empty(role_id.clone());
        state.status = status;

        if role_id.as_str() == rules.vendor_role_id {
            state
                .counters
                .insert(String::from("trades_done"), CounterValue::Count(0));
            state
                .counters
                .insert(String::from("trade_partners"), CounterValue::Tokens(Vec::new()));
            state.progress_detail = Some(ProgressDetail::default());
            state.trade_state = Some(
                role.trade_state_init
                    .clone()
                    .unwrap_or_else(|| global_defaults.clone()),
            );
        }

        store.save_gamestate(&state)?;
        seated.push(role_id);
    }

    let mut current = CurrentGame::new(seated.clone());
    current.global_trade_state = Some(global_defaults);
    store.save_current_game(&current)?;

    info!(players = seated.len(), game_id = %current.game_id, "game runtime initialized");
    Ok(seated)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store_with_roles() -> (tempfile::TempDir, GameStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());
        let roles = store.roles_dir();
        std::fs::create_dir_all(&roles).unwrap();
        std::fs::write(
            roles.join("finn.json"),
            r#"{"id": "role_finn", "name": "Finn",
                "init_number": {"stamina": {"number": 3}, "money": {"number": 2}}}"#,
        )
        .unwrap();
        std::fs::write(
            roles.join("tourist.json"),
            r#"{"id": "role_tourist", "name": "Tourist",
                "init_number": {"money": {"number": 5}}}"#,
        )
        .unwrap();
        std::fs::write(
            roles.join("vendor.json"),
            r#"{"id": "role_vendor", "name": "Vendor",
                "init_number": {"product": {"number": 6}},
                "trade_state_init": {"price_mod": 2, "price_override": {"product": 3}}}"#,
        )
        .unwrap();
        (dir, store)
    }

    fn ids(names: &[&str]) -> Vec<RoleId> {
        names.iter().map(|n| RoleId::from(*n)).collect()
    }

    #[test]
    fn required_roles_are_always_seated_first() {
        let (_guard, store) = store_with_roles();
        let seated =
            init_game_runtime(&store, &RulesConfig::default(), &ids(&["role_vendor"])).unwrap();
        assert_eq!(
            seated,
            ids(&["role_finn", "role_tourist", "role_vendor"])
        );
    }

    #[test]
    fn duplicates_and_unknown_roles_are_dropped() {
        let (_guard, store) = store_with_roles();
        let seated = init_game_runtime(
            &store,
            &RulesConfig::default(),
            &ids(&["role_vendor", "role_vendor", "role_ufo"]),
        )
        .unwrap();
        assert_eq!(
            seated,
            ids(&["role_finn", "role_tourist", "role_vendor"])
        );
    }

    #[test]
    fn initial_status_comes_from_init_number_with_progress() {
        let (_guard, store) = store_with_roles();
        init_game_runtime(&store, &RulesConfig::default(), &[]).unwrap();

        let gs = store.load_gamestate(&RoleId::from("role_finn"));
        assert_eq!(gs.status.get("stamina"), Some(&3));
        assert_eq!(gs.status.get("money"), Some(&2));
        assert_eq!(gs.status.get("progress"), Some(&0));
        assert!(gs.counters.is_empty());
    }

    #[test]
    fn vendor_gets_trade_counters_and_pricing() {
        let (_guard, store) = store_with_roles();
        init_game_runtime(&store, &RulesConfig::default(), &ids(&["role_vendor"])).unwrap();

        let gs = store.load_gamestate(&RoleId::from("role_vendor"));
        assert_eq!(gs.counter("trades_done"), 0);
        assert!(gs.tokens("trade_partners").is_empty());
        assert_eq!(gs.progress_detail, Some(ProgressDetail::default()));
        assert_eq!(gs.trade_state.as_ref().map(|t| t.price_mod), Some(2));
    }

    #[test]
    fn fresh_current_game_document_is_written() {
        let (_guard, store) = store_with_roles();
        let seated =
            init_game_runtime(&store, &RulesConfig::default(), &ids(&["role_vendor"])).unwrap();

        let current = store.load_current_game();
        assert_eq!(current.players, seated);
        assert!(!current.game_over);
        assert!(current.events_drawn.is_empty());
        assert_eq!(current.rounds_completed, 0);
        assert!(current.global_trade_state.is_some());
    }
}
