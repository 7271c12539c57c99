use std::time::Duration;

use crate::{mongo_store::error::StoreError, session_store::DEFAULT_TTL};

/// Where and how session documents are stored.
///
/// The token and timestamp field names share the document with application
/// keys; pick names the application will not use.
#[derive(Clone, Debug)]
pub struct Configuration {
    database: String,
    collection: String,
    token_field: String,
    timestamp_field: String,
    ttl: Duration,
}

impl Configuration {
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn token_field(&self) -> &str {
        &self.token_field
    }

    pub fn timestamp_field(&self) -> &str {
        &self.timestamp_field
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_token_field(mut self, token_field: impl Into<String>) -> Self {
        self.token_field = token_field.into();
        self
    }

    pub fn with_timestamp_field(mut self, timestamp_field: impl Into<String>) -> Self {
        self.timestamp_field = timestamp_field.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        let names = [
            ("database", &self.database),
            ("collection", &self.collection),
            ("token field", &self.token_field),
            ("timestamp field", &self.timestamp_field),
        ];
        if let Some((name, _)) = names.iter().find(|(_, value)| value.is_empty()) {
            return Err(StoreError::ConfigurationError(format!(
                "{} name must not be empty",
                name
            )));
        }
        if self.token_field == self.timestamp_field {
            return Err(StoreError::ConfigurationError(format!(
                "token and timestamp fields must differ, both are \"{}\"",
                self.token_field
            )));
        }
        if self.token_field == "_id" || self.timestamp_field == "_id" {
            return Err(StoreError::ConfigurationError(
                "\"_id\" is reserved and cannot be used as a bookkeeping field".to_string(),
            ));
        }
        if self.ttl.as_secs() == 0 {
            return Err(StoreError::ConfigurationError(
                "ttl must be at least one second".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            database: "sessions".to_string(),
            collection: "sessions".to_string(),
            token_field: "session_id".to_string(),
            timestamp_field: "_lib_created_at_".to_string(),
            ttl: DEFAULT_TTL,
        }
    }
}
