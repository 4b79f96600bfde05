//! Coherence consistency check over receipt telemetry.

use serde_json::json;
use trust_kernel_core::TrustReceipt;

use crate::error::{EvaluatorError, PolicyError};
use crate::evaluator::ConstraintEvaluator;
use crate::types::{ConstraintViolation, PolicyConstraint, Severity};

/// Default floor for the coherence score.
pub const DEFAULT_MIN_COHERENCE_SCORE: f64 = 0.7;

/// Flags receipts whose coherence score falls below the configured floor.
///
/// Low coherence is a quality signal, not a safety one, so violations are
/// always warning severity regardless of the constraint's setting.
#[derive(Debug)]
pub struct CoherenceEvaluator {
    constraint_id: String,
    min_coherence_score: f64,
}

impl CoherenceEvaluator {
    /// Build from a constraint's configuration (`min_coherence_score`).
    pub fn from_constraint(constraint: &PolicyConstraint) -> Result<Self, PolicyError> {
        let min = match constraint.config.get("min_coherence_score") {
            Some(value) => value.as_f64().ok_or_else(|| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: "min_coherence_score must be a number".to_string(),
                }
            })?,
            None => DEFAULT_MIN_COHERENCE_SCORE,
        };

        if !min.is_finite() {
            return Err(PolicyError::InvalidConstraintConfig {
                constraint_id: constraint.id.clone(),
                reason: "min_coherence_score must be finite".to_string(),
            });
        }

        Ok(Self {
            constraint_id: constraint.id.clone(),
            min_coherence_score: min,
        })
    }
}

impl ConstraintEvaluator for CoherenceEvaluator {
    fn evaluate(
        &self,
        receipt: &TrustReceipt,
    ) -> Result<Option<ConstraintViolation>, EvaluatorError> {
        let Some(actual) = receipt.telemetry.as_ref().and_then(|t| t.coherence_score) else {
            return Ok(None);
        };

        if actual >= self.min_coherence_score {
            return Ok(None);
        }

        Ok(Some(ConstraintViolation {
            constraint_id: self.constraint_id.clone(),
            violation_type: "coherence_below_threshold".to_string(),
            severity: Severity::Warn,
            evidence: json!({
                "actual": actual,
                "min": self.min_coherence_score,
            }),
            message: format!(
                "coherence score {actual:.3} below minimum {:.3}",
                self.min_coherence_score
            ),
        }))
    }
}
