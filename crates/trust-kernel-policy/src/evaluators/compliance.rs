//! Compliance-boundary detection for regulated-domain advice.
//!
//! Scans response text for phrase patterns that indicate the agent crossed
//! into regulated territory (medical, financial, or legal advice). Any match
//! is flagged for mandatory human review.

use regex::Regex;
use serde_json::json;
use trust_kernel_core::TrustReceipt;

use crate::error::{EvaluatorError, PolicyError};
use crate::evaluator::{response_text, ConstraintEvaluator};
use crate::types::{ConstraintViolation, PolicyConstraint, Severity};

/// The regulated domains enforced by default.
const DEFAULT_DOMAINS: &[&str] = &["medical", "financial", "legal"];

fn domain_pattern(domain: &str) -> Option<&'static str> {
    match domain {
        "medical" => Some(
            r"(?i)\b(diagnos(?:is|e|ed)|prescri(?:be|ption|bed)|dosage|take \d+\s?mg|stop taking your)\b",
        ),
        "financial" => Some(
            r"(?i)\b(guaranteed returns?|risk-free investment|you should (?:buy|sell|invest)|insider information)\b",
        ),
        "legal" => Some(
            r"(?i)\b(legal advice|you should sue|plead (?:guilty|not guilty)|waive your rights?)\b",
        ),
        _ => None,
    }
}

/// Detects regulated-domain advice in response text.
#[derive(Debug)]
pub struct ComplianceBoundaryEvaluator {
    constraint_id: String,
    severity: Severity,
    domains: Vec<(String, Regex)>,
}

impl ComplianceBoundaryEvaluator {
    /// Build from a constraint's configuration.
    ///
    /// `config.enforced_domains` narrows the domain set; unknown domain
    /// names are a configuration error. Violations force human review, so
    /// the effective severity is at least `Escalate` (a `Block` constraint
    /// keeps blocking).
    pub fn from_constraint(constraint: &PolicyConstraint) -> Result<Self, PolicyError> {
        let enforced: Vec<String> = match constraint.config.get("enforced_domains") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: format!("enforced_domains must be an array of strings: {e}"),
                }
            })?,
            None => DEFAULT_DOMAINS.iter().map(|s| s.to_string()).collect(),
        };

        let mut domains = Vec::with_capacity(enforced.len());
        for domain in enforced {
            let pattern = domain_pattern(&domain).ok_or_else(|| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: format!("unknown compliance domain: {domain}"),
                }
            })?;
            let regex = Regex::new(pattern).map_err(|e| PolicyError::InvalidConstraintConfig {
                constraint_id: constraint.id.clone(),
                reason: e.to_string(),
            })?;
            domains.push((domain, regex));
        }

        let severity = if constraint.severity == Severity::Block {
            Severity::Block
        } else {
            Severity::Escalate
        };

        Ok(Self {
            constraint_id: constraint.id.clone(),
            severity,
            domains,
        })
    }
}

impl ConstraintEvaluator for ComplianceBoundaryEvaluator {
    fn evaluate(
        &self,
        receipt: &TrustReceipt,
    ) -> Result<Option<ConstraintViolation>, EvaluatorError> {
        let Some(text) = response_text(receipt) else {
            return Ok(None);
        };

        let mut matched = Vec::new();
        let mut counts = serde_json::Map::new();
        for (domain, regex) in &self.domains {
            let count = regex.find_iter(text).count();
            if count > 0 {
                matched.push(domain.clone());
                counts.insert(domain.clone(), json!(count));
            }
        }

        if matched.is_empty() {
            return Ok(None);
        }

        Ok(Some(ConstraintViolation {
            constraint_id: self.constraint_id.clone(),
            violation_type: "compliance_boundary".to_string(),
            severity: self.severity,
            evidence: json!({
                "domains": matched,
                "match_counts": counts,
                "human_review": true,
            }),
            message: format!(
                "response crosses regulated-domain boundaries: {}",
                matched.join(", ")
            ),
        }))
    }
}
