//! Built-in constraint evaluators.
//!
//! Each evaluator detects one category of violation; the registry wires
//! constraint kinds to these implementations.

pub mod coherence;
pub mod compliance;
pub mod pii;
pub mod truth_debt;

pub use coherence::CoherenceEvaluator;
pub use compliance::ComplianceBoundaryEvaluator;
pub use pii::PiiEvaluator;
pub use truth_debt::TruthDebtEvaluator;

/// The built-in constraint kinds.
pub mod kinds {
    pub const PII_DETECTION: &str = "pii_detection";
    pub const TRUTH_DEBT: &str = "truth_debt_threshold";
    pub const COMPLIANCE_BOUNDARY: &str = "compliance_boundary";
    pub const COHERENCE: &str = "coherence_consistency";
}
