//! Error types for the Trust Kernel core.

use thiserror::Error;

/// Low-level errors from crypto and encoding operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("encoding error: {0}")]
    EncodingError(String),
}

/// Validation errors for receipt construction.
///
/// These fire before any hashing or signing happens: a receipt that fails
/// validation never acquires an id.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("interaction is missing required field `model`")]
    MissingModel,

    #[error("session_id must not be empty")]
    MissingSessionId,

    #[error("telemetry score `{field}` is not a finite number")]
    NonFiniteScore { field: &'static str },

    #[error("encoding error: {0}")]
    Encoding(String),
}

impl From<CoreError> for ValidationError {
    fn from(e: CoreError) -> Self {
        ValidationError::Encoding(e.to_string())
    }
}

/// Errors from the signing path.
///
/// Bad or missing key material is fatal and never retried automatically.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("receipt has no chain_hash; sign strictly after chain computation")]
    ChainHashMissing,

    #[error("encoding error: {0}")]
    Encoding(String),
}
