//! MongoDB connection management

use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use mongodb::bson::{doc, Document};
use mongodb::options::{Acknowledgment, ClientOptions, ReadConcern, WriteConcern};
use mongodb::{Client, ClientSession, Collection, Database};

use pokedex_domain::DomainError;

use super::helpers::map_store_err;
use crate::infrastructure::ports::StoreHealth;

const MAX_POOL_SIZE: u32 = 50;
const MIN_POOL_SIZE: u32 = 10;
const MAX_IDLE_TIME: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(2);
const WRITE_MAJORITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared MongoDB connection
///
/// Owns the pooled client and the consistency configuration: writes
/// acknowledged by a replica majority, reads observing
/// majority-committed data.
#[derive(Clone)]
pub struct MongoConnection {
    client: Client,
    database: Database,
}

impl MongoConnection {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, DomainError> {
        let mut options = ClientOptions::parse(uri).await.map_err(map_store_err)?;
        options.app_name = Some("pokedex-engine".to_string());
        options.max_pool_size = Some(MAX_POOL_SIZE);
        options.min_pool_size = Some(MIN_POOL_SIZE);
        options.max_idle_time = Some(MAX_IDLE_TIME);
        options.connect_timeout = Some(CONNECT_TIMEOUT);
        options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
        options.write_concern = Some(
            WriteConcern::builder()
                .w(Acknowledgment::Majority)
                .w_timeout(WRITE_MAJORITY_TIMEOUT)
                .build(),
        );
        options.read_concern = Some(ReadConcern::majority());

        let client = Client::with_options(options).map_err(map_store_err)?;
        let database = client.database(database);
        tracing::info!("Connected to MongoDB at {}", uri);

        Ok(Self { client, database })
    }

    /// Get a typed handle to a collection.
    pub fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }

    /// Get a reference to the database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Run `op` inside a session-bound transaction scope.
    ///
    /// The scope exits deterministically on every path: commit on Ok,
    /// abort on Err. Values the operation needs must be moved into the
    /// closure; only the session is borrowed.
    pub async fn run_in_transaction<T, F>(&self, op: F) -> Result<T, DomainError>
    where
        F: for<'s> FnOnce(&'s mut ClientSession) -> BoxFuture<'s, Result<T, DomainError>>,
    {
        let mut session = self.client.start_session().await.map_err(map_store_err)?;
        session.start_transaction().await.map_err(map_store_err)?;

        match op(&mut session).await {
            Ok(value) => {
                session.commit_transaction().await.map_err(map_store_err)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = session.abort_transaction().await {
                    tracing::warn!(error = %abort_err, "transaction abort failed");
                }
                Err(err)
            }
        }
    }
}

#[async_trait]
impl StoreHealth for MongoConnection {
    /// Issue a no-op ping against the store.
    async fn ping(&self) -> Result<(), DomainError> {
        self.database
            .run_command(doc! {"ping": 1})
            .await
            .map(|_| ())
            .map_err(map_store_err)
    }
}
