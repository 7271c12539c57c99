use std::time::Duration;

use crate::session_store::{SessionKey, DEFAULT_TTL};

type KeyGen = dyn Fn(&SessionKey) -> String + Send + Sync;

pub struct Configuration {
    key_gen: Box<KeyGen>,
    default_ttl: Duration,
}

impl Configuration {
    pub fn key_gen(&self) -> &KeyGen {
        &self.key_gen
    }

    /// Expiry applied when `set_record` is called without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn with_key_gen<F>(mut self, key_gen: F) -> Self
    where
        F: Fn(&SessionKey) -> String + Send + Sync + 'static,
    {
        self.key_gen = Box::new(key_gen);
        self
    }

    /// Store every session under `<prefix><token>`.
    pub fn with_key_prefix(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.with_key_gen(move |v| format!("{}{}", prefix, v.as_ref()))
    }

    pub fn with_default_ttl(mut self, default_ttl: Duration) -> Self {
        self.default_ttl = default_ttl;
        self
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            key_gen: Box::new(|v| v.as_ref().to_owned()),
            default_ttl: DEFAULT_TTL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_uses_the_token_as_the_cache_key() {
        let config = Configuration::default();
        let key = SessionKey::from("abc-123");
        assert_eq!((config.key_gen())(&key), "abc-123");
        assert_eq!(config.default_ttl(), Duration::from_secs(604_800));
    }

    #[test]
    fn key_prefix_is_prepended_to_the_token() {
        let config = Configuration::default().with_key_prefix("session:");
        let key = SessionKey::from("abc-123");
        assert_eq!((config.key_gen())(&key), "session:abc-123");
    }
}
