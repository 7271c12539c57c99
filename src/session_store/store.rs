use std::{sync::Arc, time::Duration};

use crate::{session_record::SessionRecord, session_store::session_key::SessionKey};

/// Expiry used when neither the caller nor the store configuration sets one.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// A backend capable of persisting session records.
///
/// Lookups that find nothing return `Ok(None)`. An `Err` is reserved for a
/// genuine backend failure, and a backend may choose to fail open on reads
/// instead of returning one.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create or replace the record for `session_key` and restart its expiry,
    /// using `ttl` when given and the store's default otherwise.
    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error>;

    async fn get_record(&self, session_key: &SessionKey)
        -> Result<Option<SessionRecord>, Self::Error>;

    /// Remove the record for `session_key`. Deleting a missing record is not an error.
    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error>;
}

#[async_trait::async_trait]
impl<S> Store for &S
where
    S: Store + ?Sized,
{
    type Error = S::Error;

    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        <S as Store>::set_record(self, session_key, record, ttl).await
    }

    async fn get_record(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<SessionRecord>, Self::Error> {
        <S as Store>::get_record(self, session_key).await
    }

    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error> {
        <S as Store>::delete_record(self, session_key).await
    }
}

#[async_trait::async_trait]
impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    type Error = S::Error;

    async fn set_record(
        &self,
        session_key: &SessionKey,
        record: &SessionRecord,
        ttl: Option<Duration>,
    ) -> Result<(), Self::Error> {
        <S as Store>::set_record(self, session_key, record, ttl).await
    }

    async fn get_record(
        &self,
        session_key: &SessionKey,
    ) -> Result<Option<SessionRecord>, Self::Error> {
        <S as Store>::get_record(self, session_key).await
    }

    async fn delete_record(&self, session_key: &SessionKey) -> Result<(), Self::Error> {
        <S as Store>::delete_record(self, session_key).await
    }
}
