//! Trainer CRUD orchestration, including the cascade delete.

use std::sync::Arc;

use serde_json::Value;

use pokedex_domain::{DomainError, TrainerId};

use super::validation::require_document;
use crate::infrastructure::ports::{PokemonRepo, TrainerRepo};

/// Counts reported by a cascade delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub trainer_deleted: u64,
    pub pokemon_deleted: u64,
}

/// Trainer operations over the store ports.
pub struct TrainerOps {
    trainers: Arc<dyn TrainerRepo>,
    pokemon: Arc<dyn PokemonRepo>,
}

impl TrainerOps {
    pub fn new(trainers: Arc<dyn TrainerRepo>, pokemon: Arc<dyn PokemonRepo>) -> Self {
        Self { trainers, pokemon }
    }

    pub async fn list(&self) -> Result<Vec<Value>, DomainError> {
        self.trainers.list().await
    }

    /// Create a trainer from an arbitrary non-empty document.
    pub async fn create(&self, doc: Value) -> Result<String, DomainError> {
        require_document(&doc, "trainer document")?;
        self.trainers.insert(doc).await
    }

    /// Partial-field update; only named fields are replaced.
    pub async fn update(&self, id: &str, patch: Value) -> Result<u64, DomainError> {
        require_document(&patch, "update patch")?;

        let outcome = self.trainers.update(id, patch).await?;
        if outcome.matched == 0 {
            return Err(DomainError::not_found("Trainer", id));
        }
        Ok(outcome.modified)
    }

    /// Delete a trainer, then every pokemon referencing it.
    ///
    /// The two deletes span two collections and are not atomic: the
    /// cascade runs whatever the trainer delete reported, and callers
    /// must tolerate the window where one side succeeded and the other
    /// did not. Not-found is keyed solely on the trainer count.
    pub async fn delete(&self, id: &str) -> Result<CascadeOutcome, DomainError> {
        let found = self.trainers.find_by_id(id).await?;
        let owner = found
            .as_ref()
            .and_then(|doc| doc.get("trainerID"))
            .and_then(Value::as_i64)
            .map(TrainerId::new);

        let trainer_deleted = self.trainers.delete(id).await?;

        let pokemon_deleted = match owner {
            Some(trainer_id) => self.pokemon.delete_by_trainer(trainer_id).await?,
            None => 0,
        };

        if trainer_deleted == 0 {
            return Err(DomainError::not_found("Trainer", id));
        }

        Ok(CascadeOutcome {
            trainer_deleted,
            pokemon_deleted,
        })
    }
}
