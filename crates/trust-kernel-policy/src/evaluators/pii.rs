//! PII detection over response text.
//!
//! Pattern-matches the response against known PII categories. Evidence
//! reports categories and match counts only; matched text never leaves the
//! evaluator, so violation records stay safe to log and alert on.

use regex::Regex;
use serde_json::json;
use trust_kernel_core::TrustReceipt;

use crate::error::{EvaluatorError, PolicyError};
use crate::evaluator::{response_text, ConstraintEvaluator};
use crate::types::{ConstraintViolation, PolicyConstraint, Severity};

/// The category set scanned by default.
const DEFAULT_CATEGORIES: &[&str] = &[
    "ssn",
    "credit_card",
    "phone",
    "email",
    "medical_record",
    "account_number",
];

fn builtin_pattern(category: &str) -> Option<&'static str> {
    match category {
        "ssn" => Some(r"\b\d{3}-\d{2}-\d{4}\b"),
        "credit_card" => Some(r"\b(?:\d{4}[ -]?){3}\d{4}\b"),
        "phone" => Some(r"\b(?:\+?1[ .-]?)?\(?\d{3}\)?[ .-]\d{3}[ .-]\d{4}\b"),
        "email" => Some(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
        "medical_record" => Some(r"(?i)\bmrn[:#]?\s*\d{6,10}\b"),
        "account_number" => Some(r"(?i)\b(?:acct|account)\s*(?:no\.?|number|#)?\s*[:#]?\s*\d{6,12}\b"),
        _ => None,
    }
}

/// Scans response text for personally identifiable information.
#[derive(Debug)]
pub struct PiiEvaluator {
    constraint_id: String,
    severity: Severity,
    patterns: Vec<(String, Regex)>,
}

impl PiiEvaluator {
    /// Build from a constraint's configuration.
    ///
    /// `config.categories` narrows the scanned set; unknown category names
    /// are a configuration error, surfaced at registration.
    pub fn from_constraint(constraint: &PolicyConstraint) -> Result<Self, PolicyError> {
        let categories: Vec<String> = match constraint.config.get("categories") {
            Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: format!("categories must be an array of strings: {e}"),
                }
            })?,
            None => DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        };

        let mut patterns = Vec::with_capacity(categories.len());
        for category in categories {
            let pattern = builtin_pattern(&category).ok_or_else(|| {
                PolicyError::InvalidConstraintConfig {
                    constraint_id: constraint.id.clone(),
                    reason: format!("unknown PII category: {category}"),
                }
            })?;
            let regex = Regex::new(pattern).map_err(|e| PolicyError::InvalidConstraintConfig {
                constraint_id: constraint.id.clone(),
                reason: e.to_string(),
            })?;
            patterns.push((category, regex));
        }

        Ok(Self {
            constraint_id: constraint.id.clone(),
            severity: constraint.severity,
            patterns,
        })
    }
}

impl ConstraintEvaluator for PiiEvaluator {
    fn evaluate(
        &self,
        receipt: &TrustReceipt,
    ) -> Result<Option<ConstraintViolation>, EvaluatorError> {
        let Some(text) = response_text(receipt) else {
            return Ok(None);
        };

        let mut matched = Vec::new();
        let mut counts = serde_json::Map::new();
        for (category, regex) in &self.patterns {
            let count = regex.find_iter(text).count();
            if count > 0 {
                matched.push(category.clone());
                counts.insert(category.clone(), json!(count));
            }
        }

        if matched.is_empty() {
            return Ok(None);
        }

        Ok(Some(ConstraintViolation {
            constraint_id: self.constraint_id.clone(),
            violation_type: "pii_detected".to_string(),
            severity: self.severity,
            evidence: json!({
                "categories": matched,
                "match_counts": counts,
            }),
            message: format!(
                "response contains possible PII: {}",
                matched.join(", ")
            ),
        }))
    }
}
