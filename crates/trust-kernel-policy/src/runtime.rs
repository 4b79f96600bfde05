//! The policy runtime: registration, evaluation, batching, and history.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{SecondsFormat, Utc};
use trust_kernel_core::TrustReceipt;

use crate::error::PolicyError;
use crate::registry::EvaluatorRegistry;
use crate::types::{
    AiPolicy, BatchReport, BatchSummary, ConstraintViolation, EnforcementStatus,
    PolicyEnforcementResult, RecommendedAction, Severity,
};

/// Cooperative cancellation for batch evaluation.
///
/// Checked between (receipt, policy) pairs, never mid-evaluation: a batch
/// stops at the next pair boundary after `cancel()`.
#[derive(Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Registers policies and evaluates receipts against them.
///
/// A runtime is an explicit context object: construct one per process, per
/// tenant, or per test. The evaluation history map is the only shared
/// mutable state, guarded by an `RwLock`.
pub struct PolicyRuntime {
    registry: EvaluatorRegistry,
    policies: RwLock<HashMap<String, AiPolicy>>,
    history: RwLock<HashMap<String, Vec<PolicyEnforcementResult>>>,
}

impl PolicyRuntime {
    /// A runtime over a custom registry.
    pub fn new(registry: EvaluatorRegistry) -> Self {
        Self {
            registry,
            policies: RwLock::new(HashMap::new()),
            history: RwLock::new(HashMap::new()),
        }
    }

    /// A runtime with the built-in evaluator kinds.
    pub fn with_builtins() -> Self {
        Self::new(EvaluatorRegistry::with_builtins())
    }

    /// Register a policy.
    ///
    /// Every enabled constraint is resolved against the registry up front:
    /// an unknown kind or invalid configuration is fatal here, not at
    /// evaluation time.
    pub fn register_policy(&self, policy: AiPolicy) -> Result<(), PolicyError> {
        for constraint in policy.constraints.iter().filter(|c| c.enabled) {
            self.registry.build(constraint)?;
        }

        let mut policies = self.policies.write().map_err(|_| PolicyError::LockPoisoned)?;
        policies.insert(policy.id.clone(), policy);
        Ok(())
    }

    /// Fetch a registered policy by id.
    pub fn policy(&self, policy_id: &str) -> Option<AiPolicy> {
        self.policies.read().ok()?.get(policy_id).cloned()
    }

    /// Evaluate one receipt against one policy.
    ///
    /// Runs every enabled constraint. An evaluator that fails at runtime is
    /// logged and skipped; one broken evaluator must not block the others
    /// or the receipt as a whole. Unknown constraint kinds remain fatal.
    pub fn evaluate_receipt(
        &self,
        receipt: &TrustReceipt,
        policy: &AiPolicy,
    ) -> Result<PolicyEnforcementResult, PolicyError> {
        let mut violations = Vec::new();

        for constraint in policy.constraints.iter().filter(|c| c.enabled) {
            let evaluator = self.registry.build(constraint)?;
            match evaluator.evaluate(receipt) {
                Ok(Some(violation)) => violations.push(violation),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(
                        constraint_id = %constraint.id,
                        kind = %constraint.kind,
                        %error,
                        "constraint evaluator failed; skipping"
                    );
                }
            }
        }

        let result = aggregate(&receipt.id, &policy.id, violations);
        self.record_history(&result)?;
        Ok(result)
    }

    /// Evaluate a receipt against a policy registered earlier.
    pub fn evaluate_registered(
        &self,
        receipt: &TrustReceipt,
        policy_id: &str,
    ) -> Result<PolicyEnforcementResult, PolicyError> {
        let policy = self
            .policy(policy_id)
            .ok_or_else(|| PolicyError::PolicyNotFound(policy_id.to_string()))?;
        self.evaluate_receipt(receipt, &policy)
    }

    /// Evaluate one receipt against several policies.
    ///
    /// In strict mode evaluation stops at the first policy that does not
    /// come back clear; the failing result is included.
    pub fn evaluate_policies(
        &self,
        receipt: &TrustReceipt,
        policies: &[AiPolicy],
        strict: bool,
    ) -> Result<Vec<PolicyEnforcementResult>, PolicyError> {
        let mut results = Vec::with_capacity(policies.len());
        for policy in policies {
            let result = self.evaluate_receipt(receipt, policy)?;
            let stop = strict && !result.is_clear();
            results.push(result);
            if stop {
                break;
            }
        }
        Ok(results)
    }

    /// Evaluate the full cross product of receipts and policies.
    pub fn batch_evaluate(
        &self,
        receipts: &[TrustReceipt],
        policies: &[AiPolicy],
    ) -> Result<BatchReport, PolicyError> {
        self.batch_evaluate_with_cancel(receipts, policies, &CancellationToken::new())
    }

    /// Batch evaluation honoring a cancellation token between pairs.
    pub fn batch_evaluate_with_cancel(
        &self,
        receipts: &[TrustReceipt],
        policies: &[AiPolicy],
        cancel: &CancellationToken,
    ) -> Result<BatchReport, PolicyError> {
        let mut results = Vec::with_capacity(receipts.len() * policies.len());
        let mut cancelled = false;

        'outer: for receipt in receipts {
            for policy in policies {
                if cancel.is_cancelled() {
                    cancelled = true;
                    break 'outer;
                }
                results.push(self.evaluate_receipt(receipt, policy)?);
            }
        }

        let summary = summarize(&results);
        let recommendations = recommend(&results);

        Ok(BatchReport {
            results,
            summary,
            recommendations,
            cancelled,
        })
    }

    /// Past evaluation results for a receipt, oldest first.
    pub fn history(&self, receipt_id: &str) -> Vec<PolicyEnforcementResult> {
        self.history
            .read()
            .ok()
            .and_then(|h| h.get(receipt_id).cloned())
            .unwrap_or_default()
    }

    fn record_history(&self, result: &PolicyEnforcementResult) -> Result<(), PolicyError> {
        let mut history = self.history.write().map_err(|_| PolicyError::LockPoisoned)?;
        history
            .entry(result.receipt_id.clone())
            .or_default()
            .push(result.clone());
        Ok(())
    }
}

/// Fold violations into the enforcement verdict.
fn aggregate(
    receipt_id: &str,
    policy_id: &str,
    violations: Vec<ConstraintViolation>,
) -> PolicyEnforcementResult {
    let any_block = violations.iter().any(|v| v.severity == Severity::Block);
    let any_escalate = violations.iter().any(|v| v.severity == Severity::Escalate);

    let status = if any_block {
        EnforcementStatus::Blocked
    } else if !violations.is_empty() {
        EnforcementStatus::Flagged
    } else {
        EnforcementStatus::Clear
    };

    let human_review_required = violations
        .iter()
        .any(|v| v.severity.requires_human_review());

    let recommended_action = if any_block {
        RecommendedAction::Block
    } else if any_escalate || violations.len() > 1 {
        RecommendedAction::RequireHumanReview
    } else if violations.len() == 1 && violations[0].severity == Severity::Warn {
        RecommendedAction::Annotate
    } else {
        RecommendedAction::Alert
    };

    PolicyEnforcementResult {
        receipt_id: receipt_id.to_string(),
        policy_id: policy_id.to_string(),
        status,
        violations,
        human_review_required,
        recommended_action,
        evaluated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

fn summarize(results: &[PolicyEnforcementResult]) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for result in results {
        match result.status {
            EnforcementStatus::Clear => summary.passed += 1,
            EnforcementStatus::Flagged => summary.flagged += 1,
            EnforcementStatus::Blocked => summary.blocked += 1,
        }
        summary.total_violations += result.violations.len();
        summary.critical_violations += result
            .violations
            .iter()
            .filter(|v| v.severity.is_critical())
            .count();
        if result.human_review_required {
            summary.requires_review += 1;
        }
    }
    summary
}

/// Free-text advice derived from violation-type frequency.
fn recommend(results: &[PolicyEnforcementResult]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for result in results {
        for violation in &result.violations {
            *counts.entry(violation.violation_type.as_str()).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    ranked
        .into_iter()
        .map(|(kind, count)| match kind {
            "pii_detected" => format!(
                "Redact or hash response content before storage; PII surfaced in {count} evaluation(s)."
            ),
            "truth_debt_exceeded" => format!(
                "Tighten claim verification; truth debt exceeded its ceiling in {count} evaluation(s)."
            ),
            "compliance_boundary" => format!(
                "Route regulated-domain conversations to human review; {count} boundary crossing(s) detected."
            ),
            "coherence_below_threshold" => format!(
                "Review generation quality; coherence fell below threshold in {count} evaluation(s)."
            ),
            other => format!("Investigate recurring violation type `{other}` ({count} occurrence(s))."),
        })
        .collect()
}
