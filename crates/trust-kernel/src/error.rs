//! Error types for the Kernel.

use thiserror::Error;
use trust_kernel_core::{SigningError, ValidationError};
use trust_kernel_policy::PolicyError;
use trust_kernel_store::StoreError;

/// Errors that can occur during Kernel operations.
#[derive(Debug, Error)]
pub enum KernelError {
    /// Receipt construction failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Signing failed (bad or missing key material).
    #[error("signing error: {0}")]
    Signing(#[from] SigningError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Policy configuration or lookup error.
    #[error("policy error: {0}")]
    Policy(#[from] PolicyError),

    /// A freshly issued receipt failed its own verification.
    #[error("issued receipt failed self-verification: {errors:?}")]
    SelfVerification { errors: Vec<String> },

    /// Invalid operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for Kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
