use serde::{de::DeserializeOwned, Serialize};

/// Map-like access to a keyed collection of serializable values.
///
/// Reads never fail: a missing key, an unreadable backend and a value that
/// does not decode to `T` all come back as `None`. Writes report errors.
#[async_trait::async_trait]
pub trait Storage {
    type Error;

    async fn insert<T>(&self, key: &str, value: &T) -> Result<(), Self::Error>
    where
        T: Serialize + Sync + ?Sized;

    async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T>;

    async fn remove(&self, key: &str) -> Result<(), Self::Error>;

    async fn contains_key(&self, key: &str) -> bool;
}
