//! Event card content documents.
//!
//! One card per JSON file under `data/events/`. The deck is the set of
//! files; the current-game document tracks which filenames have been
//! drawn. Only the `game_end_immediately` global effect is interpreted
//! by the turn flow; other effects are recorded but inert here.

use serde::{Deserialize, Serialize};

/// An event card drawn when a player pays the draw cost.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventCard {
    /// Stable card identifier.
    #[serde(default)]
    pub id: String,

    /// Display name shown in the draw log.
    #[serde(default)]
    pub name: String,

    /// Session-wide effect applied when the card is drawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_effect: Option<GlobalEffect>,
}

/// A global effect carried by an event card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalEffect {
    /// Effect identifier (e.g. `game_end_immediately`).
    #[serde(default)]
    pub id: String,

    /// Effect parameters, left uninterpreted.
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Effect id that ends the game as soon as the card is drawn.
pub const GAME_END_IMMEDIATELY: &str = "game_end_immediately";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_without_effect_parses() {
        let card: EventCard =
            serde_json::from_str(r#"{"id": "ev_parade", "name": "Parade"}"#).unwrap_or_default();
        assert_eq!(card.id, "ev_parade");
        assert!(card.global_effect.is_none());
    }

    #[test]
    fn effect_params_are_preserved_raw() {
        let card: EventCard = serde_json::from_str(
            r#"{"id": "ev_rain", "name": "Rain",
                "global_effect": {"id": "all_lose_stamina", "params": {"amount": 1}}}"#,
        )
        .unwrap_or_default();
        let effect = card.global_effect.unwrap_or_default();
        assert_eq!(effect.id, "all_lose_stamina");
        assert_eq!(effect.params.get("amount").and_then(|v| v.as_i64()), Some(1));
    }
}
