//! # Trust Kernel Policy
//!
//! The governance constraint engine for trust receipts.
//!
//! A policy is an ordered list of constraints; each constraint is dispatched
//! by kind to a [`ConstraintEvaluator`] through an open
//! [`EvaluatorRegistry`]. The [`PolicyRuntime`] runs evaluations, aggregates
//! violations into enforcement verdicts, batches cross products, and retains
//! per-receipt history for audit replay.
//!
//! ## Built-in evaluators
//!
//! - PII detection (regex categories over response text)
//! - Truth-debt threshold (telemetry)
//! - Compliance boundary (regulated-domain phrase sets)
//! - Coherence consistency (telemetry, warning severity)
//!
//! ## Partial failure
//!
//! An evaluator that fails at runtime is logged and skipped; the remaining
//! constraints still run. Unknown constraint kinds are fatal configuration
//! errors at registration.

pub mod error;
pub mod evaluator;
pub mod evaluators;
pub mod registry;
pub mod runtime;
pub mod types;

pub use error::{EvaluatorError, PolicyError};
pub use evaluator::ConstraintEvaluator;
pub use evaluators::kinds;
pub use registry::{EvaluatorFactory, EvaluatorRegistry};
pub use runtime::{CancellationToken, PolicyRuntime};
pub use types::{
    AiPolicy, BatchReport, BatchSummary, ConstraintViolation, EnforcementStatus,
    PolicyConstraint, PolicyEnforcementResult, RecommendedAction, Severity,
};
