//! Truth-debt threshold check over receipt telemetry.

use serde_json::json;
use trust_kernel_core::TrustReceipt;

use crate::error::{EvaluatorError, PolicyError};
use crate::evaluator::ConstraintEvaluator;
use crate::types::{ConstraintViolation, PolicyConstraint, Severity};

/// Default ceiling on the unverifiable-claims ratio.
pub const DEFAULT_MAX_UNVERIFIABLE_CLAIMS: f64 = 0.15;

/// Flags receipts whose recorded truth debt exceeds the configured ceiling.
#[derive(Debug)]
pub struct TruthDebtEvaluator {
    constraint_id: String,
    severity: Severity,
    max_unverifiable_claims: f64,
}

impl TruthDebtEvaluator {
    /// Build from a constraint's configuration.
    ///
    /// Reads `max_unverifiable_claims` (also accepted under its legacy
    /// camelCase spelling `maxUnverifiableClaims`).
    pub fn from_constraint(constraint: &PolicyConstraint) -> Result<Self, PolicyError> {
        let configured = constraint
            .config
            .get("max_unverifiable_claims")
            .or_else(|| constraint.config.get("maxUnverifiableClaims"));

        let max = match configured {
            Some(value) => value.as_f64().ok_or_else(|| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: "max_unverifiable_claims must be a number".to_string(),
                }
            })?,
            None => DEFAULT_MAX_UNVERIFIABLE_CLAIMS,
        };

        if !max.is_finite() || max < 0.0 {
            return Err(PolicyError::InvalidConstraintConfig {
                constraint_id: constraint.id.clone(),
                reason: format!("max_unverifiable_claims must be a non-negative number, got {max}"),
            });
        }

        Ok(Self {
            constraint_id: constraint.id.clone(),
            severity: constraint.severity,
            max_unverifiable_claims: max,
        })
    }
}

impl ConstraintEvaluator for TruthDebtEvaluator {
    fn evaluate(
        &self,
        receipt: &TrustReceipt,
    ) -> Result<Option<ConstraintViolation>, EvaluatorError> {
        let Some(actual) = receipt.telemetry.as_ref().and_then(|t| t.truth_debt) else {
            return Ok(None);
        };

        if actual <= self.max_unverifiable_claims {
            return Ok(None);
        }

        Ok(Some(ConstraintViolation {
            constraint_id: self.constraint_id.clone(),
            violation_type: "truth_debt_exceeded".to_string(),
            severity: self.severity,
            evidence: json!({
                "actual": actual,
                "max": self.max_unverifiable_claims,
                "excess": actual - self.max_unverifiable_claims,
            }),
            message: format!(
                "truth debt {actual:.3} exceeds maximum {:.3}",
                self.max_unverifiable_claims
            ),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::kinds;
    use trust_kernel_core::{ReceiptBuilder, Telemetry};

    fn receipt_with_debt(debt: Option<f64>) -> TrustReceipt {
        let mut builder = ReceiptBuilder::new("sess-1", "a", "h")
            .prompt("q")
            .response("r")
            .model("m");
        if let Some(debt) = debt {
            builder = builder.telemetry(Telemetry {
                truth_debt: Some(debt),
                ..Telemetry::default()
            });
        }
        builder.build().unwrap()
    }

    fn constraint() -> PolicyConstraint {
        PolicyConstraint::new("c-td", kinds::TRUTH_DEBT, Severity::Escalate)
    }

    #[test]
    fn test_over_threshold_violates() {
        let evaluator = TruthDebtEvaluator::from_constraint(&constraint()).unwrap();
        let violation = evaluator
            .evaluate(&receipt_with_debt(Some(0.4)))
            .unwrap()
            .unwrap();

        assert_eq!(violation.violation_type, "truth_debt_exceeded");
        assert_eq!(violation.severity, Severity::Escalate);
        let excess = violation.evidence["excess"].as_f64().unwrap();
        assert!((excess - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_at_threshold_passes() {
        let evaluator = TruthDebtEvaluator::from_constraint(&constraint()).unwrap();
        assert!(evaluator
            .evaluate(&receipt_with_debt(Some(DEFAULT_MAX_UNVERIFIABLE_CLAIMS)))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_missing_telemetry_skipped() {
        let evaluator = TruthDebtEvaluator::from_constraint(&constraint()).unwrap();
        assert!(evaluator.evaluate(&receipt_with_debt(None)).unwrap().is_none());
    }

    #[test]
    fn test_configured_threshold() {
        let c = constraint().with_config(serde_json::json!({"max_unverifiable_claims": 0.5}));
        let evaluator = TruthDebtEvaluator::from_constraint(&c).unwrap();
        assert!(evaluator
            .evaluate(&receipt_with_debt(Some(0.4)))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_legacy_camel_case_key() {
        let c = constraint().with_config(serde_json::json!({"maxUnverifiableClaims": 0.05}));
        let evaluator = TruthDebtEvaluator::from_constraint(&c).unwrap();
        assert!(evaluator
            .evaluate(&receipt_with_debt(Some(0.1)))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_bad_config_fatal() {
        let c = constraint().with_config(serde_json::json!({"max_unverifiable_claims": "lots"}));
        assert!(matches!(
            TruthDebtEvaluator::from_constraint(&c),
            Err(PolicyError::InvalidConstraintConfig { .. })
        ));
    }
}
