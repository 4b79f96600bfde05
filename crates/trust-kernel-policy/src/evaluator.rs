//! The evaluator seam: one capability, selected by constraint kind.

use trust_kernel_core::TrustReceipt;

use crate::error::EvaluatorError;
use crate::types::ConstraintViolation;

/// A pure detector for one category of policy violation.
///
/// Evaluators are independent and side-effect-free; they read receipt
/// content and telemetry and either find a violation or not. A receipt that
/// carries nothing an evaluator can judge (hash-only content for a text
/// scanner, absent telemetry for a threshold check) yields `Ok(None)`.
pub trait ConstraintEvaluator: Send + Sync + std::fmt::Debug {
    /// Evaluate one receipt against this constraint.
    fn evaluate(&self, receipt: &TrustReceipt)
        -> Result<Option<ConstraintViolation>, EvaluatorError>;
}

/// The response text available for content scanning, if any.
///
/// Hash-only receipts have no scannable text; scanners skip them.
pub(crate) fn response_text(receipt: &TrustReceipt) -> Option<&str> {
    receipt.interaction.response.as_deref()
}
