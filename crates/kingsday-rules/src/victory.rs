//! The victory registry: a closed set of win-condition kinds, each
//! dispatched to one predicate.
//!
//! Every role's content file names a condition by id; the registry maps
//! the id onto a [`VictoryKind`] and evaluates the matching predicate
//! against the player's counters and the current session. Predicates
//! never fail: missing or malformed counters evaluate as empty, and an
//! unknown id simply never wins.
//!
//! The two dynamic trade conditions also persist a [`ProgressDetail`]
//! snapshot on every evaluation -- win or lose -- so the UI can show
//! current-versus-target progress. A failed snapshot write is logged
//! and does not change the verdict.

use tracing::warn;

use kingsday_store::GameStore;
use kingsday_types::{ProgressDetail, RoleId, VictoryParams, VictorySpec};

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The closed set of victory-condition kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VictoryKind {
    /// Wear at least `n` orange items.
    WearNOrangeItems,
    /// Take at least `n` photos of enough distinct targets.
    TakeNPhoto,
    /// Perform at least `n` times.
    PerformNTimes,
    /// Help with at least `n` distinct kinds of tasks.
    VolunteerHelpNTypes,
    /// Complete trades scaled to the table size (souvenir vendor).
    VendorTradeDynamic,
    /// Complete trades scaled to the table size, looser partner goal
    /// (food vendor).
    FoodVendorTradeDynamic,
    /// Feed at least `n` distinct other players successfully.
    FoodVendorOfferGoal,
}

impl VictoryKind {
    /// Every kind in the registry, in content-file id order.
    pub const ALL: [Self; 7] = [
        Self::WearNOrangeItems,
        Self::TakeNPhoto,
        Self::PerformNTimes,
        Self::VolunteerHelpNTypes,
        Self::VendorTradeDynamic,
        Self::FoodVendorTradeDynamic,
        Self::FoodVendorOfferGoal,
    ];

    /// The content-file identifier of this kind.
    pub const fn id(self) -> &'static str {
        match self {
            Self::WearNOrangeItems => "wear_n_orange_items",
            Self::TakeNPhoto => "take_n_photo",
            Self::PerformNTimes => "perform_n_times",
            Self::VolunteerHelpNTypes => "volunteer_help_n_types",
            Self::VendorTradeDynamic => "vendor_trade_dynamic",
            Self::FoodVendorTradeDynamic => "food_vendor_trade_dynamic",
            Self::FoodVendorOfferGoal => "food_vendor_offer_goal",
        }
    }

    /// Look up a kind by its content-file identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// Evaluate a victory specification for a role.
///
/// Returns false for an unknown condition id.
pub fn evaluate(store: &GameStore, role_id: &RoleId, spec: &VictorySpec) -> bool {
    let Some(kind) = VictoryKind::from_id(&spec.id) else {
        warn!(role = %role_id, id = %spec.id, "unknown victory condition id");
        return false;
    };

    match kind {
        VictoryKind::WearNOrangeItems => wear_n_orange_items(store, role_id, spec.params),
        VictoryKind::TakeNPhoto => take_n_photo(store, role_id, spec.params),
        VictoryKind::PerformNTimes => perform_n_times(store, role_id, spec.params),
        VictoryKind::VolunteerHelpNTypes => volunteer_help_n_types(store, role_id, spec.params),
        VictoryKind::VendorTradeDynamic => dynamic_trade_goal(store, role_id, 1),
        VictoryKind::FoodVendorTradeDynamic => dynamic_trade_goal(store, role_id, 2),
        VictoryKind::FoodVendorOfferGoal => food_vendor_offer_goal(store, role_id, spec.params),
    }
}

/// Evaluate the victory condition of a role loaded from the content
/// files. A role without a victory block (or an unknown role) has not
/// won.
pub fn evaluate_for_role(store: &GameStore, role_id: &RoleId) -> bool {
    store
        .load_role(role_id)
        .and_then(|role| role.victory)
        .is_some_and(|spec| evaluate(store, role_id, &spec))
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

fn wear_n_orange_items(store: &GameStore, role_id: &RoleId, params: VictoryParams) -> bool {
    store.load_gamestate(role_id).counter("orange_worn") >= params.n
}

/// Photos need both volume and variety: the distinct-target requirement
/// tightens from 2 to 3 once more than three players are seated.
fn take_n_photo(store: &GameStore, role_id: &RoleId, params: VictoryParams) -> bool {
    let state = store.load_gamestate(role_id);
    if state.counter("photo") < params.n {
        return false;
    }

    let need_unique = if store.load_current_game().player_count() <= 3 {
        2
    } else {
        3
    };
    state.distinct_tokens("photo_targets") >= need_unique
}

fn perform_n_times(store: &GameStore, role_id: &RoleId, params: VictoryParams) -> bool {
    store.load_gamestate(role_id).counter("perform") >= params.n
}

fn volunteer_help_n_types(store: &GameStore, role_id: &RoleId, params: VictoryParams) -> bool {
    let distinct = store.load_gamestate(role_id).distinct_tokens("help_types");
    as_i64(distinct) >= params.n
}

/// Shared predicate for the two table-size-scaled trade conditions.
///
/// With N = active players minus one, the goal is N trades and
/// max(0, N - `partner_slack`) distinct non-self partners. Evaluating a
/// role that is not seated returns false without touching its state.
/// The progress snapshot is persisted on every seated evaluation.
fn dynamic_trade_goal(store: &GameStore, role_id: &RoleId, partner_slack: i64) -> bool {
    let current = store.load_current_game();
    if !current.has_player(role_id) {
        return false;
    }

    let n = as_i64(current.player_count()).saturating_sub(1).max(0);
    let target_trades = n;
    let target_unique = n.saturating_sub(partner_slack).max(0);

    let mut state = store.load_gamestate(role_id);
    let trades_done = state.counter("trades_done");
    let unique_partners =
        as_i64(state.distinct_tokens_excluding("trade_partners", role_id.as_str()));

    state.progress_detail = Some(ProgressDetail {
        target_trades,
        target_unique_partners: target_unique,
        trades_done,
        unique_partners,
    });
    if let Err(err) = store.save_gamestate(&state) {
        warn!(role = %role_id, error = %err, "failed to persist trade progress snapshot");
    }

    trades_done >= target_trades && unique_partners >= target_unique
}

fn food_vendor_offer_goal(store: &GameStore, role_id: &RoleId, params: VictoryParams) -> bool {
    let state = store.load_gamestate(role_id);
    let unique_eaters = as_i64(state.distinct_tokens_excluding("feed_eaters", role_id.as_str()));
    state.counter("feed_successes") >= params.n && unique_eaters >= params.n
}

/// Widen a collection size to the counter domain.
fn as_i64(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use kingsday_types::{CounterValue, CurrentGame, PlayerState};

    fn spec(id: &str, n: i64) -> VictorySpec {
        VictorySpec {
            id: id.to_owned(),
            params: VictoryParams { n },
            description: String::new(),
        }
    }

    fn store() -> (tempfile::TempDir, GameStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());
        (dir, store)
    }

    fn seat_players(store: &GameStore, ids: &[&str]) {
        let players = ids.iter().map(|id| RoleId::from(*id)).collect();
        store.save_current_game(&CurrentGame::new(players)).unwrap();
    }

    fn save_state(store: &GameStore, role: &str, counters: &[(&str, CounterValue)]) {
        let mut gs = PlayerState::empty(RoleId::from(role));
        for (k, v) in counters {
            gs.counters.insert((*k).to_owned(), v.clone());
        }
        store.save_gamestate(&gs).unwrap();
    }

    fn tokens(items: &[&str]) -> CounterValue {
        CounterValue::Tokens(items.iter().map(|s| (*s).to_owned()).collect())
    }

    #[test]
    fn registry_ids_round_trip() {
        for kind in VictoryKind::ALL {
            assert_eq!(VictoryKind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(VictoryKind::from_id("win_by_cheating"), None);
    }

    #[test]
    fn unknown_condition_never_wins() {
        let (_guard, store) = store();
        assert!(!evaluate(
            &store,
            &RoleId::from("role_x"),
            &spec("win_by_cheating", 0)
        ));
    }

    #[test]
    fn orange_items_compares_counter_to_goal() {
        let (_guard, store) = store();
        save_state(&store, "role_finn", &[("orange_worn", CounterValue::Count(3))]);

        let role = RoleId::from("role_finn");
        assert!(evaluate(&store, &role, &spec("wear_n_orange_items", 3)));
        assert!(!evaluate(&store, &role, &spec("wear_n_orange_items", 4)));
    }

    #[test]
    fn missing_counters_evaluate_as_zero() {
        let (_guard, store) = store();
        let role = RoleId::from("role_nobody");
        assert!(evaluate(&store, &role, &spec("perform_n_times", 0)));
        assert!(!evaluate(&store, &role, &spec("perform_n_times", 1)));
    }

    #[test]
    fn photo_goal_needs_distinct_targets() {
        // Three players seated: photo count is met but both shots hit
        // the same target, one short of the required two.
        let (_guard, store) = store();
        seat_players(&store, &["role_a", "role_b", "role_photo"]);
        save_state(
            &store,
            "role_photo",
            &[
                ("photo", CounterValue::Count(2)),
                ("photo_targets", tokens(&["x", "x"])),
            ],
        );

        let role = RoleId::from("role_photo");
        assert!(!evaluate(&store, &role, &spec("take_n_photo", 2)));

        save_state(
            &store,
            "role_photo",
            &[
                ("photo", CounterValue::Count(2)),
                ("photo_targets", tokens(&["x", "y"])),
            ],
        );
        assert!(evaluate(&store, &role, &spec("take_n_photo", 2)));
    }

    #[test]
    fn photo_target_requirement_scales_with_table_size() {
        let (_guard, store) = store();
        seat_players(&store, &["a", "b", "c", "role_photo"]);
        save_state(
            &store,
            "role_photo",
            &[
                ("photo", CounterValue::Count(5)),
                ("photo_targets", tokens(&["x", "y"])),
            ],
        );

        // Four players seated raise the distinct-target bar to three.
        let role = RoleId::from("role_photo");
        assert!(!evaluate(&store, &role, &spec("take_n_photo", 2)));
    }

    #[test]
    fn help_types_counts_distinct_non_empty() {
        let (_guard, store) = store();
        save_state(
            &store,
            "role_vol",
            &[("help_types", tokens(&["carry", "", "carry", "guide"]))],
        );

        let role = RoleId::from("role_vol");
        assert!(evaluate(&store, &role, &spec("volunteer_help_n_types", 2)));
        assert!(!evaluate(&store, &role, &spec("volunteer_help_n_types", 3)));
    }

    #[test]
    fn vendor_goal_follows_the_worked_example() {
        // Four seated players: target trades 3, target unique partners
        // 2. Three trades over two distinct partners wins.
        let (_guard, store) = store();
        seat_players(&store, &["a", "b", "c", "role_vendor"]);
        save_state(
            &store,
            "role_vendor",
            &[
                ("trades_done", CounterValue::Count(3)),
                ("trade_partners", tokens(&["a", "b", "a"])),
            ],
        );

        let role = RoleId::from("role_vendor");
        assert!(evaluate(&store, &role, &spec("vendor_trade_dynamic", 0)));

        let detail = store.load_gamestate(&role).progress_detail.unwrap();
        assert_eq!(detail.target_trades, 3);
        assert_eq!(detail.target_unique_partners, 2);
        assert_eq!(detail.trades_done, 3);
        assert_eq!(detail.unique_partners, 2);
    }

    #[test]
    fn vendor_progress_persists_even_on_a_loss() {
        let (_guard, store) = store();
        seat_players(&store, &["a", "b", "role_vendor"]);
        save_state(
            &store,
            "role_vendor",
            &[
                ("trades_done", CounterValue::Count(1)),
                ("trade_partners", tokens(&["a"])),
            ],
        );

        let role = RoleId::from("role_vendor");
        assert!(!evaluate(&store, &role, &spec("vendor_trade_dynamic", 0)));

        let detail = store.load_gamestate(&role).progress_detail.unwrap();
        assert_eq!(detail.target_trades, 2);
        assert_eq!(detail.trades_done, 1);
    }

    #[test]
    fn vendor_self_trades_do_not_count_as_partners() {
        let (_guard, store) = store();
        seat_players(&store, &["a", "b", "role_vendor"]);
        save_state(
            &store,
            "role_vendor",
            &[
                ("trades_done", CounterValue::Count(2)),
                ("trade_partners", tokens(&["role_vendor", "a"])),
            ],
        );

        // Two players besides the vendor: target unique is 1, and the
        // self-entry is ignored, leaving exactly one partner.
        let role = RoleId::from("role_vendor");
        assert!(evaluate(&store, &role, &spec("vendor_trade_dynamic", 0)));
    }

    #[test]
    fn unseated_vendor_never_wins_and_keeps_state_untouched() {
        let (_guard, store) = store();
        seat_players(&store, &["a", "b"]);

        let role = RoleId::from("role_vendor");
        assert!(!evaluate(&store, &role, &spec("vendor_trade_dynamic", 0)));
        assert!(store.load_gamestate(&role).progress_detail.is_none());
    }

    #[test]
    fn food_vendor_has_looser_partner_goal() {
        // Four seated players: the food vendor needs 3 trades but only
        // max(0, 3 - 2) = 1 distinct partner.
        let (_guard, store) = store();
        seat_players(&store, &["a", "b", "c", "role_food"]);
        save_state(
            &store,
            "role_food",
            &[
                ("trades_done", CounterValue::Count(3)),
                ("trade_partners", tokens(&["a", "a", "a"])),
            ],
        );

        let role = RoleId::from("role_food");
        assert!(evaluate(&store, &role, &spec("food_vendor_trade_dynamic", 0)));
        assert!(!evaluate(&store, &role, &spec("vendor_trade_dynamic", 0)));
    }

    #[test]
    fn offer_goal_needs_successes_and_distinct_eaters() {
        let (_guard, store) = store();
        save_state(
            &store,
            "role_food",
            &[
                ("feed_successes", CounterValue::Count(2)),
                ("feed_eaters", tokens(&["a", "b", "role_food"])),
            ],
        );

        let role = RoleId::from("role_food");
        assert!(evaluate(&store, &role, &spec("food_vendor_offer_goal", 2)));
        assert!(!evaluate(&store, &role, &spec("food_vendor_offer_goal", 3)));
    }

    #[test]
    fn evaluate_for_role_reads_the_content_file() {
        let (_guard, store) = store();
        let roles_dir = store.roles_dir();
        std::fs::create_dir_all(&roles_dir).unwrap();
        std::fs::write(
            roles_dir.join("performer.json"),
            r#"{"id": "role_perf", "name": "Performer",
                "init_number": {"stamina": {"number": 3}},
                "victory": {"id": "perform_n_times", "params": {"n": 2}}}"#,
        )
        .unwrap();
        save_state(&store, "role_perf", &[("perform", CounterValue::Count(2))]);

        assert!(evaluate_for_role(&store, &RoleId::from("role_perf")));
        assert!(!evaluate_for_role(&store, &RoleId::from("role_unknown")));
    }
}
