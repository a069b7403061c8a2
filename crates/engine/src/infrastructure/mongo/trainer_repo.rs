//! MongoDB trainer repository implementation.

use async_trait::async_trait;
use futures_util::{FutureExt, TryStreamExt};
use mongodb::bson::{doc, Document};
use mongodb::ClientSession;
use serde_json::Value;

use pokedex_domain::DomainError;

use super::helpers::{
    document_to_json, inserted_id_string, map_store_err, parse_object_id, value_to_document,
};
use super::{MongoConnection, TRAINERS};
use crate::infrastructure::ports::{TrainerRepo, UpdateOutcome};
use crate::infrastructure::retry::RetryPolicy;

pub struct MongoTrainerRepo {
    conn: MongoConnection,
    retry: RetryPolicy,
}

impl MongoTrainerRepo {
    pub fn new(conn: MongoConnection, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }
}

#[async_trait]
impl TrainerRepo for MongoTrainerRepo {
    /// List all trainer documents.
    async fn list(&self) -> Result<Vec<Value>, DomainError> {
        let collection = self.conn.collection(TRAINERS);

        let docs = self
            .retry
            .execute("trainers.list", DomainError::is_transient, || {
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

    /// Insert a trainer document inside a transaction scope.
    async fn insert(&self, doc_value: Value) -> Result<String, DomainError> {
        let document = value_to_document(&doc_value)?;
        let collection = self.conn.collection(TRAINERS);
        let conn = self.conn.clone();

        self.retry
            .execute("trainers.insert", DomainError::is_transient, || {
                let collection = collection.clone();
                let document = document.clone();
                let conn = conn.clone();
                async move {
                    conn.run_in_transaction(move |session: &mut ClientSession| {
                        async move {
                            let result = collection
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
        let collection = self.conn.collection(TRAINERS);
        let conn = self.conn.clone();

        self.retry
            .execute("trainers.update", DomainError::is_transient, || {
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

    /// Delete a trainer by store id.
    async fn delete(&self, id: &str) -> Result<u64, DomainError> {
        let oid = parse_object_id(id)?;
        let collection = self.conn.collection(TRAINERS);
        let conn = self.conn.clone();

        let deleted = self
            .retry
            .execute("trainers.delete", DomainError::is_transient, || {
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

        tracing::debug!("Deleted trainer: {} ({} document)", id, deleted);
        Ok(deleted)
    }

    /// Fetch one trainer document by store id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Value>, DomainError> {
        let oid = parse_object_id(id)?;
        let collection = self.conn.collection(TRAINERS);

        let found = self
            .retry
            .execute("trainers.find_by_id", DomainError::is_transient, || {
                let collection = collection.clone();
                async move {
                    collection
                        .find_one(doc! {"_id": oid})
                        .await
                        .map_err(map_store_err)
                }
            })
            .await?;

        Ok(found.map(document_to_json))
    }
}
