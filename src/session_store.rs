mod fail_open;
mod session_key;
mod store;

pub use fail_open::FailOpen;
pub use session_key::SessionKey;
pub use store::{Store, DEFAULT_TTL};
