use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt::{Debug, Formatter};

use crate::{
    session_record::SessionRecord,
    session_store::{SessionKey, Store},
    storage::Storage,
};

#[derive(Debug, thiserror::Error)]
pub enum SessionError<StoreError> {
    #[error("Unable to serialize value for key \"{0}\": {1}")]
    SerializeError(String, String),
    #[error(transparent)]
    StoreError(#[from] StoreError),
}

/// A session record bound to one key and one store.
///
/// Nothing is cached between calls: every operation round-trips to the
/// store. Mutations load the full record, change it locally and write the
/// whole record back, so concurrent writers to the same key can overwrite
/// each other's changes.
pub struct Session<S> {
    id: SessionKey,
    store: S,
}

impl<S: Store> Session<S> {
    pub fn new(id: impl Into<SessionKey>, store: S) -> Self {
        Session {
            id: id.into(),
            store,
        }
    }

    pub fn id(&self) -> &SessionKey {
        &self.id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full record, or an empty one when nothing is stored.
    pub async fn record(&self) -> Result<SessionRecord, SessionError<S::Error>> {
        let record = self.store.get_record(&self.id).await?;
        Ok(record.unwrap_or_default())
    }

    pub async fn keys(&self) -> Result<Vec<String>, SessionError<S::Error>> {
        let record = self.record().await?;
        Ok(record.into_iter().map(|(key, _)| key).collect())
    }

    pub async fn len(&self) -> Result<usize, SessionError<S::Error>> {
        Ok(self.record().await?.len())
    }

    pub async fn is_empty(&self) -> Result<bool, SessionError<S::Error>> {
        Ok(self.record().await?.is_empty())
    }

    pub async fn to_json_string(&self) -> Result<String, SessionError<S::Error>> {
        Ok(self.record().await?.to_string())
    }

    /// Deletes the whole session from the store, not just its keys.
    pub async fn clear(&self) -> Result<(), SessionError<S::Error>> {
        self.store.delete_record(&self.id).await?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// The raw JSON value stored under `key`.
    pub async fn get_value(&self, key: &str) -> Option<Value> {
        match self.store.get_record(&self.id).await {
            Ok(record) => record.and_then(|mut record| record.remove(key)),
            Err(error) => {
                tracing::debug!(key, %error, "unable to load session record");
                None
            }
        }
    }

    // Writes an empty record when none exists yet, so the merge-write in
    // `insert` always has a record to land on. Not atomic.
    async fn ensure_record(&self) -> Result<(), SessionError<S::Error>> {
        let existing = self.store.get_record(&self.id).await?;
        if existing.map_or(true, |record| record.is_empty()) {
            self.store
                .set_record(&self.id, &SessionRecord::new(), None)
                .await?;
            tracing::debug!("session record created");
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Store> Storage for Session<S> {
    type Error = SessionError<S::Error>;

    async fn insert<T>(&self, key: &str, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize + Sync + ?Sized,
    {
        let value = serde_json::to_value(value)
            .map_err(|e| SessionError::SerializeError(key.to_string(), e.to_string()))?;
        self.ensure_record().await?;
        let mut record = self.record().await?;
        record.insert(key, value);
        self.store.set_record(&self.id, &record, None).await?;
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.get_value(key).await?;
        serde_json::from_value(value)
            .map_err(|error| tracing::debug!(key, %error, "unable to decode session value"))
            .ok()
    }

    async fn remove(&self, key: &str) -> Result<(), Self::Error> {
        if self.get_value(key).await.is_none() {
            return Ok(());
        }
        let mut record = match self.store.get_record(&self.id).await? {
            Some(record) => record,
            None => return Ok(()),
        };
        if record.remove(key).is_none() {
            return Ok(());
        }
        self.store.set_record(&self.id, &record, None).await?;
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).await.is_some()
    }
}

impl<S> Debug for Session<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("id", &self.id).finish_non_exhaustive()
    }
}
