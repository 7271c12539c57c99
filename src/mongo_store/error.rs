#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("MongoDB configuration error: {0}")]
    ConfigurationError(String),
    #[error("MongoDB connection error: {0}")]
    ConnectionError(String),
    #[error("MongoDB query error: {0}")]
    QueryError(String),
    #[error("Unable to convert session record: {0}")]
    ConversionError(String),
}
