//! Pokedex Domain library.
//!
//! Core domain types for the trainer/pokemon service: entity
//! identifiers, read-side aggregate projections, and the shared error
//! taxonomy. Persistence and transport live in `pokedex-engine`.

pub mod entities;
pub mod error;
pub mod ids;

pub use entities::{
    PokemonHighlight, StrongPokemonOwner, StrongPokemonReport, TrainerRoster,
    TrainerStrongPokemon, TrainerSummary,
};
pub use error::DomainError;
pub use ids::TrainerId;
