//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is
//! concrete types. Ports exist for:
//! - Document store access (could swap MongoDB -> another document store)
//! - Health probing (so handlers never touch the driver)

use async_trait::async_trait;
use serde_json::Value;

use pokedex_domain::{DomainError, TrainerId, TrainerRoster, TrainerStrongPokemon};

/// Counts reported by a partial-field update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainerRepo: Send + Sync {
    /// All trainer documents, store ids rendered as plain strings.
    async fn list(&self) -> Result<Vec<Value>, DomainError>;

    /// Insert a trainer document, returning the store-assigned id.
    async fn insert(&self, doc: Value) -> Result<String, DomainError>;

    /// Merge `patch` into the document addressed by the store id.
    /// Fields absent from the patch are left untouched.
    async fn update(&self, id: &str, patch: Value) -> Result<UpdateOutcome, DomainError>;

    /// Delete by store id, returning the deleted count.
    async fn delete(&self, id: &str) -> Result<u64, DomainError>;

    /// Fetch a single trainer document by store id, if present.
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PokemonRepo: Send + Sync {
    /// All pokemon documents, store ids rendered as plain strings.
    async fn list(&self) -> Result<Vec<Value>, DomainError>;

    /// Insert a pokemon document after verifying its owner exists.
    /// The existence check and the insert share one transaction scope,
    /// so they observe a consistent snapshot.
    async fn insert_owned(&self, trainer_id: TrainerId, doc: Value) -> Result<String, DomainError>;

    async fn update(&self, id: &str, patch: Value) -> Result<UpdateOutcome, DomainError>;

    async fn delete(&self, id: &str) -> Result<u64, DomainError>;

    /// Cascade step: delete every pokemon owned by the trainer.
    async fn delete_by_trainer(&self, trainer_id: TrainerId) -> Result<u64, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterQueries: Send + Sync {
    /// One trainer joined with every pokemon referencing it, or None
    /// when the domain id does not resolve.
    async fn trainer_with_pokemon(
        &self,
        trainer_id: TrainerId,
    ) -> Result<Option<TrainerRoster>, DomainError>;

    /// Owners of pokemon above the level threshold, grouped per owner
    /// and sorted ascending by domain id. Groups whose owner record is
    /// missing are dropped by the join, not surfaced as errors.
    async fn trainers_with_pokemon_above(
        &self,
        min_level: i64,
    ) -> Result<Vec<TrainerStrongPokemon>, DomainError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreHealth: Send + Sync {
    /// Lightweight no-op issued against the store.
    async fn ping(&self) -> Result<(), DomainError>;
}
