//! Composite read reports over both collections.
//!
//! The asymmetry between the two queries is intentional: the
//! trainer-with-pokemon report is keyed on a single expected trainer
//! and misses hard, while the strong-pokemon report is a best-effort
//! fan-out where unresolvable owners simply produce no entry.

use std::sync::Arc;

use pokedex_domain::{DomainError, StrongPokemonReport, TrainerId, TrainerRoster};

use crate::infrastructure::ports::RosterQueries;

/// Read-side reports over the aggregation port.
pub struct RosterReports {
    queries: Arc<dyn RosterQueries>,
}

impl RosterReports {
    pub fn new(queries: Arc<dyn RosterQueries>) -> Self {
        Self { queries }
    }

    /// One trainer and all pokemon referencing it.
    pub async fn trainer_with_pokemon(
        &self,
        trainer_id: TrainerId,
    ) -> Result<TrainerRoster, DomainError> {
        self.queries
            .trainer_with_pokemon(trainer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Trainer", trainer_id))
    }

    /// Owners with at least one pokemon above the threshold.
    pub async fn trainers_with_pokemon_above(
        &self,
        min_level: i64,
    ) -> Result<StrongPokemonReport, DomainError> {
        let groups = self.queries.trainers_with_pokemon_above(min_level).await?;
        Ok(StrongPokemonReport::from_groups(min_level, groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockRosterQueries;
    use pokedex_domain::{PokemonHighlight, StrongPokemonOwner, TrainerStrongPokemon, TrainerSummary};

    fn reports(queries: MockRosterQueries) -> RosterReports {
        RosterReports::new(Arc::new(queries))
    }

    fn sample_group(trainer_id: i64) -> TrainerStrongPokemon {
        TrainerStrongPokemon {
            trainer: StrongPokemonOwner {
                trainer_id: TrainerId::new(trainer_id),
                name: "Ash".into(),
                total_strong_pokemon: 1,
            },
            pokemon: vec![PokemonHighlight {
                name: Some("Pikachu".into()),
                level: 50,
                type1: Some("Electric".into()),
                type2: None,
            }],
        }
    }

    #[tokio::test]
    async fn an_unresolved_trainer_is_not_found() {
        let mut queries = MockRosterQueries::new();
        queries
            .expect_trainer_with_pokemon()
            .returning(|_| Ok(None));

        let err = reports(queries)
            .trainer_with_pokemon(TrainerId::new(9))
            .await
            .expect_err("must reject");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn a_resolved_trainer_passes_through() {
        let mut queries = MockRosterQueries::new();
        queries.expect_trainer_with_pokemon().returning(|trainer_id| {
            Ok(Some(TrainerRoster {
                trainer: TrainerSummary {
                    trainer_id,
                    name: "Ash".into(),
                },
                pokemon: vec![],
            }))
        });

        let roster = reports(queries)
            .trainer_with_pokemon(TrainerId::new(1))
            .await
            .expect("roster");
        assert_eq!(roster.trainer.trainer_id, TrainerId::new(1));
        assert!(roster.pokemon.is_empty());
    }

    #[tokio::test]
    async fn no_matching_pokemon_yields_the_empty_indicator() {
        let mut queries = MockRosterQueries::new();
        queries
            .expect_trainers_with_pokemon_above()
            .returning(|_| Ok(Vec::new()));

        let report = reports(queries)
            .trainers_with_pokemon_above(99)
            .await
            .expect("report");
        assert_eq!(report, StrongPokemonReport::Empty { min_level: 99 });
    }

    #[tokio::test]
    async fn matching_groups_stay_grouped() {
        let mut queries = MockRosterQueries::new();
        queries
            .expect_trainers_with_pokemon_above()
            .returning(|_| Ok(vec![sample_group(1)]));

        let report = reports(queries)
            .trainers_with_pokemon_above(30)
            .await
            .expect("report");
        match report {
            StrongPokemonReport::Grouped(groups) => {
                assert_eq!(groups.len(), 1);
                assert_eq!(groups[0].trainer.total_strong_pokemon, 1);
            }
            StrongPokemonReport::Empty { .. } => panic!("expected groups"),
        }
    }
}
