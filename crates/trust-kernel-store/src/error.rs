//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Receipt serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Receipt not found.
    #[error("receipt not found: {0}")]
    NotFound(String),

    /// Backend-specific failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
