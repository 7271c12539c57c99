use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::time::Instant;

use crate::{
    session_record::SessionRecord,
    session_store::{SessionKey, Store, DEFAULT_TTL},
};

struct Entry {
    record: SessionRecord,
    expires_at: Instant,
}

/// An in-process store with the same sliding expiry as the network stores.
///
/// Expired records are dropped lazily, when they are next read or written.
/// Records live only as long as the store and are not shared between
/// processes.
pub struct MemoryStore {
    default_ttl: Duration,
    entries: Mutex<HashMap<SessionKey, Entry>>,
}

impl MemoryStore {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            default_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drops every expired record.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries().retain(|_, entry| entry.expires_at > now);
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<SessionKey, Entry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    type Error = Infallible;

    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        let expires_at = Instant::now() + ttl.unwrap_or(self.default_ttl);
        let entry = Entry {
            record: record.clone(),
            expires_at,
        };
        self.entries().insert(session_key.clone(), entry);
        Ok(())
    }

    async fn get_record(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<SessionRecord>, Self::Error> {
        let mut entries = self.entries();
        let expired = match entries.get(session_key) {
            Some(entry) if entry.expires_at > Instant::now() => {
                return Ok(Some(entry.record.clone()))
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(session_key);
        }
        Ok(None)
    }

    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error> {
        self.entries().remove(session_key);
        Ok(())
    }
}
