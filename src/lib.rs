pub mod memory_store;
#[cfg(feature = "mongodb-store")]
pub mod mongo_store;
#[cfg(feature = "redis-store")]
pub mod redis_store;
mod session;
mod session_record;
mod session_store;
mod storage;

pub use memory_store::MemoryStore;
#[cfg(feature = "mongodb-store")]
pub use mongo_store::MongoStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisStore;
pub use session::{Session, SessionError};
pub use session_record::SessionRecord;
pub use session_store::{FailOpen, SessionKey, Store, DEFAULT_TTL};
pub use storage::Storage;
