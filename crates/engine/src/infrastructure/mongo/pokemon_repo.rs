//! MongoDB pokemon repository implementation.
//!
//! Owns the referential check on writes: a pokemon insert verifies its
//! trainer inside the same transaction scope as the insert itself.

use async_trait::async_trait;
use futures_util::{FutureExt, TryStreamExt};
use mongodb::bson::{doc, Document};
use mongodb::ClientSession;
use serde_json::Value;

use pokedex_domain::{DomainError, TrainerId};

use super::helpers::{
    document_to_json, inserted_id_string, map_store_err, parse_object_id, value_to_document,
};
use super::{MongoConnection, POKEMON, TRAINERS};
use crate::infrastructure::ports::{PokemonRepo, UpdateOutcome};
use crate::infrastructure::retry::RetryPolicy;

pub struct MongoPokemonRepo {
    conn: MongoConnection,
    retry: RetryPolicy,
}

impl MongoPokemonRepo {
    pub fn new(conn: MongoConnection, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }
}

#[async_trait]
impl PokemonRepo for MongoPokemonRepo {
    /// List all pokemon documents.
    async fn list(&self) -> Result<Vec<Value>, DomainError> {
        let collection = self.conn.collection(POKEMON);

        let docs = self
            .retry
            .execute("pokemon.list", DomainError::is_transient, || {
                let collection = collection.clone();
                async move {
                    collection
                        .find(doc! {})
                        .await
                        .map_err(map_store_err)?
                        .try_collect::<Vec<Document>>()
                        .await
                        .map_err(map_store_err)
                }
            })
            .await?;

        Ok(docs.into_iter().map(document_to_json).collect())
    }

    /// Insert a pokemon after verifying its owner, both in one
    /// transaction scope so the check and the insert observe a
    /// consistent snapshot.
    async fn insert_owned(
        &self,
        trainer_id: TrainerId,
        doc_value: Value,
    ) -> Result<String, DomainError> {
        let document = value_to_document(&doc_value)?;
        let trainers = self.conn.collection(TRAINERS);
        let pokemon = self.conn.collection(POKEMON);
        let conn = self.conn.clone();

        self.retry
            .execute("pokemon.insert", DomainError::is_transient, || {
                let trainers = trainers.clone();
                let pokemon = pokemon.clone();
                let document = document.clone();
                let conn = conn.clone();
                async move {
                    conn.run_in_transaction(move |session: &mut ClientSession| {
                        async move {
                            let owner = trainers
                                .find_one(doc! {"trainerID": trainer_id.value()})
                                .session(&mut *session)
                                .await
                                .map_err(map_store_err)?;
                            if owner.is_none() {
                                return Err(DomainError::referential(trainer_id));
                            }

                            let result = pokemon
                                .insert_one(document)
                                .session(session)
                                .await
                                .map_err(map_store_err)?;
                            Ok(inserted_id_string(result.inserted_id))
                        }
                        .boxed()
                    })
                    .await
                }
            })
            .await
    }

    /// Merge named fields into the addressed document.
    async fn update(&self, id: &str, patch: Value) -> Result<UpdateOutcome, DomainError> {
        let oid = parse_object_id(id)?;
        let patch = value_to_document(&patch)?;
        let collection = self.conn.collection(POKEMON);
        let conn = self.conn.clone();

        self.retry
            .execute("pokemon.update", DomainError::is_transient, || {
                let collection = collection.clone();
                let patch = patch.clone();
                let conn = conn.clone();
                async move {
                    conn.run_in_transaction(move |session: &mut ClientSession| {
                        async move {
                            let result = collection
                                .update_one(doc! {"_id": oid}, doc! {"$set": patch})
                                .session(session)
                                .await
                                .map_err(map_store_err)?;
                            Ok(UpdateOutcome {
                                matched: result.matched_count,
                                modified: result.modified_count,
                            })
                        }
                        .boxed()
                    })
                    .await
                }
            })
            .await
    }

    /// Delete a pokemon by store id.
    async fn delete(&self, id: &str) -> Result<u64, DomainError> {
        let oid = parse_object_id(id)?;
        let collection = self.conn.collection(POKEMON);
        let conn = self.conn.clone();

        let deleted = self
            .retry
            .execute("pokemon.delete", DomainError::is_transient, || {
                let collection = collection.clone();
                let conn = conn.clone();
                async move {
                    conn.run_in_transaction(move |session: &mut ClientSession| {
                        async move {
                            let result = collection
                                .delete_one(doc! {"_id": oid})
                                .session(session)
                                .await
                                .map_err(map_store_err)?;
                            Ok(result.deleted_count)
                        }
                        .boxed()
                    })
                    .await
                }
            })
            .await?;

        tracing::debug!("Deleted pokemon: {} ({} document)", id, deleted);
        Ok(deleted)
    }

    /// Cascade step: delete every pokemon whose `trainerID` matches.
    async fn delete_by_trainer(&self, trainer_id: TrainerId) -> Result<u64, DomainError> {
        let collection = self.conn.collection(POKEMON);
        let conn = self.conn.clone();

        let deleted = self
            .retry
            .execute("pokemon.delete_by_trainer", DomainError::is_transient, || {
                let collection = collection.clone();
                let conn = conn.clone();
                async move {
                    conn.run_in_transaction(move |session: &mut ClientSession| {
                        async move {
                            let result = collection
                                .delete_many(doc! {"trainerID": trainer_id.value()})
                                .session(session)
                                .await
                                .map_err(map_store_err)?;
                            Ok(result.deleted_count)
                        }
                        .boxed()
                    })
                    .await
                }
            })
            .await?;

        tracing::debug!(
            "Deleted pokemon owned by trainer {}: {} documents",
            trainer_id,
            deleted
        );
        Ok(deleted)
    }
}
