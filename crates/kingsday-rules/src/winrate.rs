//! The win-rate aggregator: per-player-set outcome statistics.
//!
//! Outcomes are keyed by the *set* of seated roles (sorted and
//! pipe-joined) so the same table composition accumulates one record
//! regardless of seating order. The whole document is re-persisted on
//! every completed game; there is no batching.

use chrono::Utc;
use tracing::info;

use kingsday_store::GameStore;
use kingsday_types::{RoleId, WinrateStats};

use crate::RuleError;

/// Build the canonical key for a player set: sorted ids joined by `|`.
pub fn player_set_key(players: &[RoleId]) -> String {
    let mut ids: Vec<&str> = players.iter().map(RoleId::as_str).collect();
    ids.sort_unstable();
    ids.join("|")
}

/// Record one completed game.
///
/// Increments the global and per-set game counts and each winner's
/// tally; when draw and round counts are supplied they are added to the
/// running totals and the per-game averages recomputed (rounded to two
/// decimals). Returns the updated document after persisting it.
///
/// # Errors
///
/// Returns [`RuleError`] if the statistics document cannot be written.
pub fn update_winrate(
    store: &GameStore,
    players: &[RoleId],
    winners: &[RoleId],
    draws: Option<u64>,
    rounds: Option<u64>,
) -> Result<WinrateStats, RuleError> {
    let mut stats = store.load_winrate();
    stats.total_games = stats.total_games.saturating_add(1);

    let key = player_set_key(players);
    let record = stats.by_player_set.entry(key.clone()).or_default();
    record.games = record.games.saturating_add(1);

    for winner in winners {
        let tally = record.wins.entry(winner.to_string()).or_insert(0);
        *tally = tally.saturating_add(1);
    }

    if let Some(draws) = draws {
        record.draws_total = record.draws_total.saturating_add(draws);
    }
    if let Some(rounds) = rounds {
        record.rounds_total = record.rounds_total.saturating_add(rounds);
    }
    record.avg_draws = per_game_average(record.draws_total, record.games);
    record.avg_rounds = per_game_average(record.rounds_total, record.games);

    stats.updated_at = Utc::now();
    store.save_winrate(&stats)?;

    info!(
        set = %key,
        games = stats.total_games,
        winners = winners.len(),
        "winrate updated"
    );
    Ok(stats)
}

/// Average per game, rounded to two decimals. Zero games averages to
/// zero.
#[allow(clippy::cast_precision_loss)]
fn per_game_average(total: u64, games: u64) -> f64 {
    if games == 0 {
        return 0.0;
    }
    (total as f64 / games as f64 * 100.0).round() / 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<RoleId> {
        names.iter().map(|n| RoleId::from(*n)).collect()
    }

    #[test]
    fn key_is_order_independent() {
        assert_eq!(player_set_key(&ids(&["b", "a", "c"])), "a|b|c");
        assert_eq!(
            player_set_key(&ids(&["a", "b", "c"])),
            player_set_key(&ids(&["c", "b", "a"]))
        );
    }

    #[test]
    fn repeated_games_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());
        let players = ids(&["a", "b"]);
        let winners = ids(&["a"]);

        update_winrate(&store, &players, &winners, None, None).unwrap();
        let stats = update_winrate(&store, &players, &winners, None, None).unwrap();

        assert_eq!(stats.total_games, 2);
        let record = stats.by_player_set.get("a|b").unwrap();
        assert_eq!(record.games, 2);
        assert_eq!(record.wins.get("a"), Some(&2));
        assert_eq!(record.wins.get("b"), None);
    }

    #[test]
    fn averages_round_to_two_decimals() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());
        let players = ids(&["a", "b"]);

        update_winrate(&store, &players, &[], Some(5), Some(4)).unwrap();
        update_winrate(&store, &players, &[], Some(5), Some(3)).unwrap();
        let stats = update_winrate(&store, &players, &[], Some(6), Some(3)).unwrap();

        let record = stats.by_player_set.get("a|b").unwrap();
        // draws 16/3 = 5.333..., rounds 10/3 = 3.333...
        assert!((record.avg_draws - 5.33).abs() < f64::EPSILON);
        assert!((record.avg_rounds - 3.33).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_counts_leave_totals_alone() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());
        let players = ids(&["a"]);

        update_winrate(&store, &players, &[], Some(4), Some(2)).unwrap();
        let stats = update_winrate(&store, &players, &[], None, None).unwrap();

        let record = stats.by_player_set.get("a").unwrap();
        assert_eq!(record.draws_total, 4);
        assert_eq!(record.games, 2);
        assert!((record.avg_draws - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn distinct_player_sets_get_distinct_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = GameStore::new(dir.path());

        update_winrate(&store, &ids(&["a", "b"]), &ids(&["a"]), None, None).unwrap();
        let stats =
            update_winrate(&store, &ids(&["a", "c"]), &ids(&["c"]), None, None).unwrap();

        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.by_player_set.len(), 2);
    }

    #[test]
    fn document_survives_across_store_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = GameStore::new(dir.path());
            update_winrate(&store, &ids(&["a", "b"]), &ids(&["b"]), None, None).unwrap();
        }
        let store = GameStore::new(dir.path());
        let stats = store.load_winrate();
        assert_eq!(stats.total_games, 1);
    }
}
