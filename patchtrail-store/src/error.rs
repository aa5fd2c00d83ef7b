//! Error types for the storage boundary.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur at the storage boundary.
///
/// The engine never retries these; retry policy belongs to the caller or
/// the store implementation itself.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Entity not found where one was required.
    #[error("entity not found: {0}")]
    NotFound(String),

    /// A filter or update document the store cannot interpret.
    #[error("invalid query document: {0}")]
    InvalidQuery(String),

    /// Any I/O failure in the backing store, propagated verbatim.
    #[error("backend error: {0}")]
    Backend(String),
}
