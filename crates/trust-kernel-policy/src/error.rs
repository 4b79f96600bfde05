//! Error types for the policy engine.

use thiserror::Error;

/// Configuration and registration errors. Fatal, never silently skipped.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("unknown constraint kind: {0}")]
    UnknownConstraintKind(String),

    #[error("invalid config for constraint {constraint_id}: {reason}")]
    InvalidConstraintConfig {
        constraint_id: String,
        reason: String,
    },

    #[error("policy not found: {0}")]
    PolicyNotFound(String),

    #[error("policy registry lock poisoned")]
    LockPoisoned,
}

/// A failure inside a single evaluator at evaluation time.
///
/// This is the one place partial failure is tolerated: the runtime logs the
/// error and continues with the remaining constraints.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("evaluator failure: {0}")]
    Failed(String),
}
