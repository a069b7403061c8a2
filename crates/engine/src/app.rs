//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::mongo::MongoRepositories;
use crate::infrastructure::ports::{PokemonRepo, RosterQueries, StoreHealth, TrainerRepo};
use crate::use_cases::{PokemonOps, RosterReports, TrainerOps};

/// Main application state.
///
/// Holds the repository ports and the use cases built on them.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
    pub health: Arc<dyn StoreHealth>,
}

/// Container for the store-backed repository ports.
pub struct Repositories {
    pub trainer: Arc<dyn TrainerRepo>,
    pub pokemon: Arc<dyn PokemonRepo>,
    pub roster: Arc<dyn RosterQueries>,
}

/// Container for all use cases.
pub struct UseCases {
    pub trainers: TrainerOps,
    pub pokemon: PokemonOps,
    pub rosters: RosterReports,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repos: MongoRepositories, health: Arc<dyn StoreHealth>) -> Self {
        let trainer: Arc<dyn TrainerRepo> = repos.trainer;
        let pokemon: Arc<dyn PokemonRepo> = repos.pokemon;
        let roster: Arc<dyn RosterQueries> = repos.roster;

        Self::from_ports(trainer, pokemon, roster, health)
    }

    /// Wire the application from bare ports (also used by tests).
    pub fn from_ports(
        trainer: Arc<dyn TrainerRepo>,
        pokemon: Arc<dyn PokemonRepo>,
        roster: Arc<dyn RosterQueries>,
        health: Arc<dyn StoreHealth>,
    ) -> Self {
        let use_cases = UseCases {
            trainers: TrainerOps::new(trainer.clone(), pokemon.clone()),
            pokemon: PokemonOps::new(pokemon.clone()),
            rosters: RosterReports::new(roster.clone()),
        };

        Self {
            repositories: Repositories {
                trainer,
                pokemon,
                roster,
            },
            use_cases,
            health,
        }
    }
}
