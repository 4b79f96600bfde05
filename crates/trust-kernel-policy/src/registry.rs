//! Evaluator registry: constraint kinds mapped to evaluator factories.
//!
//! An open strategy registry rather than a closed enum: built-in kinds come
//! pre-registered, and callers can add their own. Registries are plain
//! values owned by whoever constructs them; there is no global instance,
//! so isolated runtimes (one per tenant, one per test) cannot leak state
//! into each other.

use std::collections::HashMap;

use crate::error::PolicyError;
use crate::evaluator::ConstraintEvaluator;
use crate::evaluators::{
    kinds, CoherenceEvaluator, ComplianceBoundaryEvaluator, PiiEvaluator, TruthDebtEvaluator,
};
use crate::types::PolicyConstraint;

/// Builds one evaluator instance from a constraint's configuration.
pub type EvaluatorFactory =
    Box<dyn Fn(&PolicyConstraint) -> Result<Box<dyn ConstraintEvaluator>, PolicyError> + Send + Sync>;

/// Maps constraint kinds to evaluator factories.
pub struct EvaluatorRegistry {
    factories: HashMap<String, EvaluatorFactory>,
}

impl EvaluatorRegistry {
    /// An empty registry with no kinds.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A registry with the four built-in kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::PII_DETECTION, |c| {
            Ok(Box::new(PiiEvaluator::from_constraint(c)?))
        });
        registry.register(kinds::TRUTH_DEBT, |c| {
            Ok(Box::new(TruthDebtEvaluator::from_constraint(c)?))
        });
        registry.register(kinds::COMPLIANCE_BOUNDARY, |c| {
            Ok(Box::new(ComplianceBoundaryEvaluator::from_constraint(c)?))
        });
        registry.register(kinds::COHERENCE, |c| {
            Ok(Box::new(CoherenceEvaluator::from_constraint(c)?))
        });
        registry
    }

    /// Register a kind. Replaces any previous factory for the same kind.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&PolicyConstraint) -> Result<Box<dyn ConstraintEvaluator>, PolicyError>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Whether a kind is registered.
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Build the evaluator for a constraint.
    ///
    /// Unknown kinds and invalid configuration are fatal configuration
    /// errors, never silently skipped.
    pub fn build(
        &self,
        constraint: &PolicyConstraint,
    ) -> Result<Box<dyn ConstraintEvaluator>, PolicyError> {
        let factory = self
            .factories
            .get(&constraint.kind)
            .ok_or_else(|| PolicyError::UnknownConstraintKind(constraint.kind.clone()))?;
        factory(constraint)
    }
}

impl Default for EvaluatorRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConstraintViolation, Severity};
    use trust_kernel_core::TrustReceipt;

    #[test]
    fn test_builtins_registered() {
        let registry = EvaluatorRegistry::with_builtins();
        for kind in [
            kinds::PII_DETECTION,
            kinds::TRUTH_DEBT,
            kinds::COMPLIANCE_BOUNDARY,
            kinds::COHERENCE,
        ] {
            assert!(registry.contains(kind), "missing builtin {kind}");
        }
    }

    #[test]
    fn test_unknown_kind_fatal() {
        let registry = EvaluatorRegistry::with_builtins();
        let constraint = PolicyConstraint::new("c-x", "sentiment_vibes", Severity::Warn);
        let err = registry.build(&constraint).unwrap_err();
        assert!(matches!(err, PolicyError::UnknownConstraintKind(k) if k == "sentiment_vibes"));
    }

    #[test]
    fn test_builds_builtin() {
        let registry = EvaluatorRegistry::with_builtins();
        let constraint = PolicyConstraint::pii("c-pii");
        assert!(registry.build(&constraint).is_ok());
    }

    #[test]
    fn test_third_party_registration() {
        #[derive(Debug)]
        struct AlwaysClean;
        impl crate::evaluator::ConstraintEvaluator for AlwaysClean {
            fn evaluate(
                &self,
                _receipt: &TrustReceipt,
            ) -> Result<Option<ConstraintViolation>, crate::error::EvaluatorError> {
                Ok(None)
            }
        }

        let mut registry = EvaluatorRegistry::with_builtins();
        registry.register("custom_check", |_| Ok(Box::new(AlwaysClean)));

        let constraint = PolicyConstraint::new("c-custom", "custom_check", Severity::Warn);
        assert!(registry.build(&constraint).is_ok());
    }
}
