//! Pokemon CRUD orchestration.

use std::sync::Arc;

use serde_json::Value;

use pokedex_domain::DomainError;

use super::validation::{require_document, require_trainer_id};
use crate::infrastructure::ports::PokemonRepo;

/// Pokemon operations over the store port.
pub struct PokemonOps {
    pokemon: Arc<dyn PokemonRepo>,
}

impl PokemonOps {
    pub fn new(pokemon: Arc<dyn PokemonRepo>) -> Self {
        Self { pokemon }
    }

    pub async fn list(&self) -> Result<Vec<Value>, DomainError> {
        self.pokemon.list().await
    }

    /// Create a pokemon owned by an existing trainer.
    ///
    /// The body must carry an integer `trainerID`; whether that trainer
    /// exists is checked by the repository inside the insert's
    /// transaction scope, so a rejected pokemon is never persisted.
    pub async fn create(&self, doc: Value) -> Result<String, DomainError> {
        let trainer_id = {
            let map = require_document(&doc, "pokemon document")?;
            require_trainer_id(map)?
        };

        self.pokemon.insert_owned(trainer_id, doc).await
    }

    /// Partial-field update; only named fields are replaced.
    pub async fn update(&self, id: &str, patch: Value) -> Result<u64, DomainError> {
        require_document(&patch, "update patch")?;

        let outcome = self.pokemon.update(id, patch).await?;
        if outcome.matched == 0 {
            return Err(DomainError::not_found("Pokemon", id));
        }
        Ok(outcome.modified)
    }

    /// Delete a pokemon by store id.
    pub async fn delete(&self, id: &str) -> Result<u64, DomainError> {
        let deleted = self.pokemon.delete(id).await?;
        if deleted == 0 {
            return Err(DomainError::not_found("Pokemon", id));
        }
        Ok(deleted)
    }
}
