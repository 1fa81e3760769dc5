//! Error handling for the talent matching engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalentMatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The embedding model failed to initialize or failed during an
    /// encode call. Never converted into a default score; callers must
    /// treat this as a service-level failure.
    #[error("Embedding model unavailable: {0}")]
    EmbeddingUnavailable(String),

    /// A candidate or job record is missing a required identity field,
    /// or a request payload is malformed. Fails the whole request
    /// rather than silently dropping the record.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TalentMatchError>;
