#[derive(Debug, thiserror::Error)]
pub enum RedisError {
    #[error("Redis connection error: {0}")]
    ConnectionError(String),
    #[error("Redis {command} failed: {reason}")]
    QueryError {
        command: &'static str,
        reason: String,
    },
}
