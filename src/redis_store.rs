//! Session records as JSON strings in Redis.
//!
//! Each record is a single key holding the JSON body, written with `SET ...
//! EX` so Redis expires it on its own. Reads fail open: a missing key, a body
//! that is not a JSON object and a lost connection all read as "no record".

mod commands;
mod configuration;
mod error;

use redis::aio::ConnectionManager;
use std::time::Duration;

use commands::Command;
pub use configuration::Configuration;
pub use error::RedisError;

use crate::{
    session_record::SessionRecord,
    session_store::{FailOpen, SessionKey, Store},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: Unable to serialize or deserialize session record: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error(transparent)]
    RedisError(#[from] RedisError),
}

pub struct RedisStore {
    config: Configuration,
    connection: ConnectionManager,
}

impl RedisStore {
    pub async fn new(url: &str, config: Configuration) -> Result<Self, RedisError> {
        let client = redis::Client::open(url)
            .map_err(|e| e.to_string())
            .map_err(RedisError::ConnectionError)?;
        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| e.to_string())
            .map_err(RedisError::ConnectionError)?;
        Ok(Self::from_connection(connection, config))
    }

    /// Wrap a connection the host application already manages.
    pub fn from_connection(connection: ConnectionManager, config: Configuration) -> Self {
        Self { config, connection }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    fn cache_key(&self, session_key: &SessionKey) -> String {
        (self.config.key_gen())(session_key)
    }

    async fn execute_command<T: redis::FromRedisValue>(
        &self,
        command: Command,
    ) -> Result<T, RedisError> {
        let name = command.name();
        let redis_command: redis::Cmd = command.into();
        let result = redis_command
            .query_async(&mut self.connection.clone())
            .await
            .map_err(|e| RedisError::QueryError {
                command: name,
                reason: e.to_string(),
            })?;
        Ok(result)
    }

    async fn fetch(&self, session_key: &SessionKey) -> Result<Option<SessionRecord>, StoreError> {
        let cache_key = self.cache_key(session_key);
        let value = self
            .execute_command::<Option<String>>(Command::get(cache_key))
            .await?;
        let record = value
            .map(|v| serde_json::from_str::<SessionRecord>(&v))
            .transpose()?;
        Ok(record)
    }
}

#[async_trait::async_trait]
impl Store for RedisStore {
    type Error = StoreError;

    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        let cache_key = self.cache_key(session_key);
        let body = serde_json::to_string(record)?;
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        self.execute_command::<()>(Command::set(cache_key, body, ttl))
            .await?;
        tracing::debug!(store = "redis", ttl_secs = ttl.as_secs(), "session record written");
        Ok(())
    }

    async fn get_record(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<SessionRecord>, Self::Error> {
        Ok(self.fetch(session_key).await.fail_open("redis"))
    }

    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error> {
        let cache_key = self.cache_key(session_key);
        self.execute_command::<()>(Command::delete(cache_key))
            .await?;
        tracing::debug!(store = "redis", "session record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{session::Session, storage::Storage};
    use rand::{distributions::Alphanumeric, Rng};
    use serde_json::json;

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379/1".to_string())
    }

    fn generate_key() -> SessionKey {
        let value: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(64)
            .map(char::from)
            .collect();
        SessionKey::from(value)
    }

    async fn connect() -> anyhow::Result<RedisStore> {
        let config = Configuration::default().with_key_prefix("lushus-test:");
        Ok(RedisStore::new(&redis_url(), config).await?)
    }

    #[tokio::test]
    async fn new_fails_for_a_malformed_url() {
        let result = RedisStore::new("not a url", Configuration::default()).await;
        assert!(matches!(result, Err(RedisError::ConnectionError(_))));
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn get_record_returns_the_record_for_the_given_key() -> anyhow::Result<()> {
        let store = connect().await?;
        let key = generate_key();
        let record: SessionRecord = [("user_id".to_string(), json!("abc-123"))]
            .into_iter()
            .collect();

        store.set_record(&key, &record, None).await?;

        let loaded = store.get_record(&key).await?;
        assert_eq!(loaded, Some(record));
        store.delete_record(&key).await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn get_record_treats_a_malformed_body_as_absent() -> anyhow::Result<()> {
        let store = connect().await?;
        let key = generate_key();
        let cache_key = store.cache_key(&key);
        store
            .execute_command::<()>(Command::set(
                cache_key,
                "not json".to_string(),
                Duration::from_secs(10),
            ))
            .await?;

        assert_eq!(store.get_record(&key).await?, None);
        store.delete_record(&key).await?;
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn set_record_expires_after_the_given_ttl() -> anyhow::Result<()> {
        let store = connect().await?;
        let key = generate_key();
        store
            .set_record(&key, &SessionRecord::new(), Some(Duration::from_secs(1)))
            .await?;
        assert!(store.get_record(&key).await?.is_some());

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(store.get_record(&key).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn session_round_trips_through_redis() -> anyhow::Result<()> {
        let store = connect().await?;
        let session = Session::new(generate_key(), &store);

        assert_eq!(session.get::<String>("user_id").await, None);
        assert!(store.get_record(session.id()).await?.is_none());

        session.insert("user_id", "abc-123").await?;
        assert_eq!(
            session.get::<String>("user_id").await.as_deref(),
            Some("abc-123")
        );

        session.clear().await?;
        assert!(store.get_record(session.id()).await?.is_none());
        Ok(())
    }
}
