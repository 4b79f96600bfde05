//! Policy-side entities: constraints, policies, violations, and verdicts.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How severe a constraint (and the violations it raises) is.
///
/// `Warn < Critical < Block`/`Escalate` in enforcement weight: `Block` stops
/// the interaction outright, `Escalate` and `Block` force human review,
/// `Critical` alerts without either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Critical,
    Block,
    Escalate,
}

impl Severity {
    /// Whether a violation at this severity forces human review.
    pub fn requires_human_review(self) -> bool {
        matches!(self, Severity::Block | Severity::Escalate)
    }

    /// Whether this severity counts toward critical-violation totals.
    pub fn is_critical(self) -> bool {
        matches!(self, Severity::Critical | Severity::Block | Severity::Escalate)
    }
}

/// One constraint inside a policy, dispatched to an evaluator by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConstraint {
    pub id: String,

    /// Evaluator kind, resolved through the registry (see `kinds`).
    pub kind: String,

    pub severity: Severity,
    pub enabled: bool,

    /// Evaluator-specific configuration; `Null` means defaults.
    #[serde(default)]
    pub config: Value,
}

impl PolicyConstraint {
    /// A constraint with default config, enabled.
    pub fn new(id: impl Into<String>, kind: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            severity,
            enabled: true,
            config: Value::Null,
        }
    }

    /// Attach evaluator configuration.
    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// Disable without removing.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// PII detection at its default severity.
    pub fn pii(id: impl Into<String>) -> Self {
        Self::new(id, crate::evaluators::kinds::PII_DETECTION, Severity::Critical)
    }
}

/// A governance policy: an ordered list of constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiPolicy {
    pub id: String,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub constraints: Vec<PolicyConstraint>,
}

impl AiPolicy {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            constraints: Vec::new(),
        }
    }

    pub fn with_constraint(mut self, constraint: PolicyConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// A single detected violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub constraint_id: String,
    pub violation_type: String,
    pub severity: Severity,

    /// Structured supporting data. Never raw matched PII.
    pub evidence: Value,

    pub message: String,
}

/// Aggregate verdict status for one (receipt, policy) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EnforcementStatus {
    Clear,
    Flagged,
    Blocked,
}

/// What the caller should do with the interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecommendedAction {
    Block,
    RequireHumanReview,
    Annotate,
    Alert,
}

/// The aggregated verdict of running one policy against one receipt.
///
/// Derived data: recomputable from the same receipt, policy, and evaluator
/// set, which is what makes audit replay possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEnforcementResult {
    pub receipt_id: String,
    pub policy_id: String,
    pub status: EnforcementStatus,
    pub violations: Vec<ConstraintViolation>,
    pub human_review_required: bool,
    pub recommended_action: RecommendedAction,

    /// When this evaluation ran (ISO-8601). Metadata, not part of the verdict.
    pub evaluated_at: String,
}

impl PolicyEnforcementResult {
    /// Whether the receipt passed this policy without findings.
    pub fn is_clear(&self) -> bool {
        self.status == EnforcementStatus::Clear
    }
}

/// Counts across a whole batch evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub passed: usize,
    pub flagged: usize,
    pub blocked: usize,
    pub total_violations: usize,
    pub critical_violations: usize,
    pub requires_review: usize,
}

/// Everything a batch evaluation produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub results: Vec<PolicyEnforcementResult>,
    pub summary: BatchSummary,

    /// Free-text advice derived from violation-type frequency.
    pub recommendations: Vec<String>,

    /// A cancellation token stopped the batch before the full cross product.
    pub cancelled: bool,
}
