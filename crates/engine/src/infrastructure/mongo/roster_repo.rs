//! MongoDB aggregation queries for the roster reports.
//!
//! Both composite reads run as single server-side pipelines
//! (filter, relational join, reshape, order) so they execute inside the
//! storage engine's query planner instead of pulling collections into
//! the service.

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, from_document, Bson, Document};
use serde_json::Value;

use pokedex_domain::{DomainError, TrainerId, TrainerRoster, TrainerStrongPokemon, TrainerSummary};

use super::helpers::{map_store_err, strip_document_ids};
use super::{MongoConnection, POKEMON, TRAINERS};
use crate::infrastructure::ports::RosterQueries;
use crate::infrastructure::retry::RetryPolicy;

pub struct MongoRosterRepo {
    conn: MongoConnection,
    retry: RetryPolicy,
}

impl MongoRosterRepo {
    pub fn new(conn: MongoConnection, retry: RetryPolicy) -> Self {
        Self { conn, retry }
    }

    async fn aggregate(
        &self,
        operation_name: &str,
        collection_name: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, DomainError> {
        let collection = self.conn.collection(collection_name);

        self.retry
            .execute(operation_name, DomainError::is_transient, || {
                let collection = collection.clone();
                let pipeline = pipeline.clone();
                async move {
                    collection
                        .aggregate(pipeline)
                        .await
                        .map_err(map_store_err)?
                        .try_collect::<Vec<Document>>()
                        .await
                        .map_err(map_store_err)
                }
            })
            .await
    }
}

#[async_trait]
impl RosterQueries for MongoRosterRepo {
    /// Match one trainer by domain id and left-join its pokemon.
    async fn trainer_with_pokemon(
        &self,
        trainer_id: TrainerId,
    ) -> Result<Option<TrainerRoster>, DomainError> {
        let pipeline = vec![
            doc! {"$match": {"trainerID": trainer_id.value()}},
            doc! {"$lookup": {
                "from": POKEMON,
                "localField": "trainerID",
                "foreignField": "trainerID",
                "as": "pokemon",
            }},
            doc! {"$project": {
                "_id": 0,
                "trainerID": 1,
                "trainername": 1,
                "pokemon": 1,
            }},
        ];

        let docs = self
            .aggregate("rosters.trainer_with_pokemon", TRAINERS, pipeline)
            .await?;

        let Some(mut document) = docs.into_iter().next() else {
            return Ok(None);
        };

        // Joined pokemon keep their arbitrary fields; only the opaque
        // ids are stripped before they go out.
        let pokemon = match document.remove("pokemon") {
            Some(joined) => match strip_document_ids(joined) {
                Bson::Array(items) => items.into_iter().map(Value::from).collect(),
                _ => Vec::new(),
            },
            None => Vec::new(),
        };

        let trainer: TrainerSummary = from_document(document)
            .map_err(|e| DomainError::permanent(format!("malformed trainer document: {e}")))?;

        Ok(Some(TrainerRoster { trainer, pokemon }))
    }

    /// Filter pokemon above the threshold, group per owner, join owner
    /// metadata, and order by owner domain id. Groups whose owner is
    /// missing fall out at the unwind.
    async fn trainers_with_pokemon_above(
        &self,
        min_level: i64,
    ) -> Result<Vec<TrainerStrongPokemon>, DomainError> {
        let pipeline = vec![
            doc! {"$match": {
                "pokelevel": {"$gt": min_level},
            }},
            doc! {"$group": {
                "_id": "$trainerID",
                "pokemon_count": {"$sum": 1},
                "pokemon_list": {"$push": {
                    "name": "$pokename",
                    "level": "$pokelevel",
                    "type1": "$type1",
                    "type2": "$type2",
                }},
            }},
            doc! {"$lookup": {
                "from": TRAINERS,
                "localField": "_id",
                "foreignField": "trainerID",
                "as": "trainer_info",
            }},
            doc! {"$unwind": "$trainer_info"},
            doc! {"$project": {
                "_id": 0,
                "trainer": {
                    "trainerID": "$_id",
                    "name": "$trainer_info.trainername",
                    "total_strong_pokemon": "$pokemon_count",
                },
                "pokemon": "$pokemon_list",
            }},
            doc! {"$sort": {"trainer.trainerID": 1}},
        ];

        let docs = self
            .aggregate("rosters.trainers_with_pokemon_above", POKEMON, pipeline)
            .await?;

        docs.into_iter()
            .map(|document| {
                from_document::<TrainerStrongPokemon>(document)
                    .map_err(|e| DomainError::permanent(format!("malformed group document: {e}")))
            })
            .collect()
    }
}
