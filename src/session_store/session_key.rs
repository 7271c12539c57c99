use std::fmt::{Debug, Display, Formatter};

/// The opaque token a session record is stored under.
///
/// Tokens are generated and signed by the host application. Every store
/// receives the token as a `SessionKey`, so the conversion to text happens
/// once, here, instead of inside each backend.
#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Tokens are credentials; keep them out of debug output and logs.
impl Debug for SessionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionKey(<{} bytes>)", self.0.len())
    }
}

impl AsRef<str> for SessionKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for SessionKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SessionKey {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<&String> for SessionKey {
    fn from(value: &String) -> Self {
        Self(value.clone())
    }
}

impl From<&SessionKey> for SessionKey {
    fn from(value: &SessionKey) -> Self {
        value.clone()
    }
}
