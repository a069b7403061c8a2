//! Read-side entity projections.

mod roster;

pub use roster::{
    PokemonHighlight, StrongPokemonOwner, StrongPokemonReport, TrainerRoster,
    TrainerStrongPokemon, TrainerSummary,
};
