//! Projections produced by the roster aggregation queries.
//!
//! These are the reshaped outputs of the two composite reads: one
//! trainer joined with every pokemon that references it, and the
//! per-owner grouping of pokemon above a level threshold. Field renames
//! pin the wire names used in the stored documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::TrainerId;

/// Projected trainer fields for the trainer-with-pokemon query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerSummary {
    #[serde(rename = "trainerID")]
    pub trainer_id: TrainerId,
    #[serde(rename = "trainername", default)]
    pub name: String,
}

/// One trainer and all pokemon whose `trainerID` matches.
///
/// The joined pokemon keep their arbitrary attributes, so they stay
/// open documents rather than typed structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerRoster {
    pub trainer: TrainerSummary,
    pub pokemon: Vec<Value>,
}

/// Pokemon fields projected into a strong-pokemon group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonHighlight {
    pub name: Option<String>,
    pub level: i64,
    pub type1: Option<String>,
    pub type2: Option<String>,
}

/// Owner metadata joined into a strong-pokemon group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrongPokemonOwner {
    #[serde(rename = "trainerID")]
    pub trainer_id: TrainerId,
    #[serde(default)]
    pub name: String,
    pub total_strong_pokemon: i64,
}

/// One owner group from the owners-with-strong-pokemon query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerStrongPokemon {
    pub trainer: StrongPokemonOwner,
    pub pokemon: Vec<PokemonHighlight>,
}

/// Outcome of the owners-with-strong-pokemon query.
///
/// An empty result is a distinct outcome, not an error: no pokemon
/// cleared the threshold, so there is nothing to group.
#[derive(Debug, Clone, PartialEq)]
pub enum StrongPokemonReport {
    Empty { min_level: i64 },
    Grouped(Vec<TrainerStrongPokemon>),
}

impl StrongPokemonReport {
    /// Wrap query output, collapsing zero groups into the empty marker.
    pub fn from_groups(min_level: i64, groups: Vec<TrainerStrongPokemon>) -> Self {
        if groups.is_empty() {
            Self::Empty { min_level }
        } else {
            Self::Grouped(groups)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trainer_summary_uses_store_field_names() {
        let summary: TrainerSummary =
            serde_json::from_value(json!({"trainerID": 1, "trainername": "Ash"}))
                .expect("deserialize");
        assert_eq!(summary.trainer_id, TrainerId::new(1));
        assert_eq!(summary.name, "Ash");

        let wire = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(wire, json!({"trainerID": 1, "trainername": "Ash"}));
    }

    #[test]
    fn highlight_tolerates_missing_and_null_types() {
        let highlight: PokemonHighlight =
            serde_json::from_value(json!({"name": "Pikachu", "level": 50, "type2": null}))
                .expect("deserialize");
        assert_eq!(highlight.name.as_deref(), Some("Pikachu"));
        assert_eq!(highlight.level, 50);
        assert_eq!(highlight.type1, None);
        assert_eq!(highlight.type2, None);
    }

    #[test]
    fn group_output_round_trips_the_nested_shape() {
        let group: TrainerStrongPokemon = serde_json::from_value(json!({
            "trainer": {"trainerID": 1, "name": "Ash", "total_strong_pokemon": 1},
            "pokemon": [{"name": "Pikachu", "level": 50, "type1": "Electric", "type2": null}],
        }))
        .expect("deserialize");
        assert_eq!(group.trainer.trainer_id, TrainerId::new(1));
        assert_eq!(group.trainer.total_strong_pokemon, 1);
        assert_eq!(group.pokemon.len(), 1);
    }

    #[test]
    fn zero_groups_collapse_to_the_empty_marker() {
        let report = StrongPokemonReport::from_groups(30, Vec::new());
        assert!(report.is_empty());
        assert_eq!(report, StrongPokemonReport::Empty { min_level: 30 });
    }

    #[test]
    fn nonempty_groups_stay_grouped() {
        let groups = vec![TrainerStrongPokemon {
            trainer: StrongPokemonOwner {
                trainer_id: TrainerId::new(1),
                name: "Ash".into(),
                total_strong_pokemon: 1,
            },
            pokemon: vec![],
        }];
        let report = StrongPokemonReport::from_groups(30, groups);
        assert!(!report.is_empty());
    }
}
