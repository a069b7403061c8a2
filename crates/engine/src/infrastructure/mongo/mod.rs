//! MongoDB implementations of the store ports.

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;

use pokedex_domain::DomainError;

mod helpers;

mod connection;
mod pokemon_repo;
mod roster_repo;
mod trainer_repo;

pub use connection::MongoConnection;
pub use pokemon_repo::MongoPokemonRepo;
pub use roster_repo::MongoRosterRepo;
pub use trainer_repo::MongoTrainerRepo;

use crate::infrastructure::retry::RetryPolicy;
use helpers::map_store_err;

/// Collection names as created by the data loader.
pub const TRAINERS: &str = "Trainers";
pub const POKEMON: &str = "Pokemon";

/// Ensure both collections, the uniqueness constraint on the trainer
/// domain id, and the owner-reference lookup index exist.
/// Idempotent, safe to repeat on every startup.
pub async fn ensure_schema(conn: &MongoConnection) -> Result<(), DomainError> {
    for name in [TRAINERS, POKEMON] {
        if let Err(e) = conn.database().create_collection(name).await {
            tracing::warn!("Collection creation warning: {}", e);
        }
    }

    conn.collection(TRAINERS)
        .create_index(
            IndexModel::builder()
                .keys(doc! {"trainerID": 1})
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await
        .map_err(map_store_err)?;

    conn.collection(POKEMON)
        .create_index(IndexModel::builder().keys(doc! {"trainerID": 1}).build())
        .await
        .map_err(map_store_err)?;

    tracing::info!("Database schema initialized");
    Ok(())
}

/// Create all MongoDB repositories from a shared connection.
pub struct MongoRepositories {
    pub trainer: Arc<MongoTrainerRepo>,
    pub pokemon: Arc<MongoPokemonRepo>,
    pub roster: Arc<MongoRosterRepo>,
}

impl MongoRepositories {
    pub fn new(conn: MongoConnection, retry: RetryPolicy) -> Self {
        Self {
            trainer: Arc::new(MongoTrainerRepo::new(conn.clone(), retry.clone())),
            pokemon: Arc::new(MongoPokemonRepo::new(conn.clone(), retry.clone())),
            roster: Arc::new(MongoRosterRepo::new(conn, retry)),
        }
    }
}
