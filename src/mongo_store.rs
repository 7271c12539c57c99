//! Session records as MongoDB documents.
//!
//! Each record is one document holding the record's keys plus two
//! bookkeeping fields: the token, and the time of the last write. A TTL
//! index on the timestamp lets MongoDB remove documents that have not been
//! written for the configured TTL, so expiry slides forward on every write.
//! MongoDB's TTL monitor runs about once a minute, so expired documents may
//! still be read for a short while.

mod configuration;
mod documents;
mod error;

use mongodb::{
    bson::{doc, Document},
    error::ErrorKind,
    options::{FindOneOptions, IndexOptions, UpdateOptions},
    Client, Collection, Database, IndexModel,
};
use std::time::Duration;

pub use configuration::Configuration;
pub use error::StoreError;

use crate::{
    session_record::SessionRecord,
    session_store::{SessionKey, Store},
};

const TOKEN_INDEX_NAME: &str = "session_id";
const TTL_INDEX_NAME: &str = "session_ttl";

// Server error code for "collection already exists".
const NAMESPACE_EXISTS: i32 = 48;

pub struct MongoStore {
    config: Configuration,
    collection: Collection<Document>,
}

impl MongoStore {
    pub async fn connect(url: &str, config: Configuration) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(url).await.map_err(|e| {
            StoreError::ConnectionError(format!("Failed to connect to MongoDB: {}", e))
        })?;
        Self::new(client, config).await
    }

    /// Prepares the session collection and its indexes. Safe to run against
    /// a collection that is already set up.
    pub async fn new(client: Client, config: Configuration) -> Result<Self, StoreError> {
        config.validate()?;
        let database = client.database(config.database());
        ensure_collection(&database, config.collection()).await?;
        let collection = database.collection::<Document>(config.collection());
        ensure_indexes(&collection, &config).await?;
        Ok(Self { config, collection })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

async fn ensure_collection(database: &Database, name: &str) -> Result<(), StoreError> {
    let names = database.list_collection_names().await.map_err(|e| {
        StoreError::ConnectionError(format!("Failed to list collections: {}", e))
    })?;
    if names.iter().any(|existing| existing == name) {
        return Ok(());
    }

    match database.create_collection(name).await {
        Ok(()) => {
            tracing::info!(collection = name, "created session collection");
            Ok(())
        }
        // Another instance created it between our check and our create.
        Err(e) if matches!(e.kind.as_ref(), ErrorKind::Command(c) if c.code == NAMESPACE_EXISTS) => {
            Ok(())
        }
        Err(e) => Err(StoreError::ConnectionError(format!(
            "Failed to create collection {}: {}",
            name, e
        ))),
    }
}

async fn ensure_indexes(
    collection: &Collection<Document>,
    config: &Configuration,
) -> Result<(), StoreError> {
    let mut token_options = IndexOptions::default();
    token_options.name = Some(TOKEN_INDEX_NAME.to_string());
    let token_index = IndexModel::builder()
        .keys(documents::index_keys(config.token_field()))
        .options(token_options)
        .build();

    let mut ttl_options = IndexOptions::default();
    ttl_options.name = Some(TTL_INDEX_NAME.to_string());
    ttl_options.expire_after = Some(Duration::from_secs(config.ttl().as_secs()));
    let ttl_index = IndexModel::builder()
        .keys(documents::index_keys(config.timestamp_field()))
        .options(ttl_options)
        .build();

    for (name, index) in [(TOKEN_INDEX_NAME, token_index), (TTL_INDEX_NAME, ttl_index)] {
        collection.create_index(index).await.map_err(|e| {
            StoreError::ConfigurationError(format!(
                "Failed to create index {} on {}: {}",
                name,
                config.collection(),
                e
            ))
        })?;
    }
    tracing::info!(
        collection = config.collection(),
        ttl_secs = config.ttl().as_secs(),
        "session indexes ready"
    );
    Ok(())
}

#[async_trait::async_trait]
impl Store for MongoStore {
    type Error = StoreError;

    /// Expiry is governed by the collection's TTL index, so `ttl` is ignored.
    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        _ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        let filter = documents::filter(&self.config, session_key);
        let update = documents::upsert(&self.config, session_key, record)?;
        let mut options = UpdateOptions::default();
        options.upsert = Some(true);

        self.collection
            .update_one(filter, update)
            .with_options(options)
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        tracing::debug!(store = "mongodb", "session record written");
        Ok(())
    }

    async fn get_record(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<SessionRecord>, Self::Error> {
        let filter = documents::filter(&self.config, session_key);
        let mut options = FindOneOptions::default();
        options.projection = Some(doc! { "_id": 0 });

        let document = self
            .collection
            .find_one(filter)
            .with_options(options)
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        Ok(document.map(documents::record))
    }

    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error> {
        let filter = documents::filter(&self.config, session_key);
        self.collection
            .delete_one(filter)
            .await
            .map_err(|e| StoreError::QueryError(e.to_string()))?;
        tracing::debug!(store = "mongodb", "session record deleted");
        Ok(())
    }
}
