//! Use cases - request orchestration over the store ports.
//!
//! Each module owns the write-path validation and error mapping for one
//! area; the ports stay free of request semantics.

pub mod pokemon;
pub mod rosters;
pub mod trainers;
pub mod validation;

pub use pokemon::PokemonOps;
pub use rosters::RosterReports;
pub use trainers::{CascadeOutcome, TrainerOps};
