//! The Kernel: unified API for the trust receipt system.
//!
//! The Kernel brings together the integrity pipeline, persistence, and the
//! policy runtime into a cohesive interface: assemble an interaction into a
//! receipt, chain it onto its session, sign it, persist it, and later verify
//! and policy-evaluate it.

use std::sync::Arc;

use trust_kernel_core::{
    verify_chain_links, verify_receipt, CheckResult, ContentMode, Ed25519PublicKey,
    ReceiptBuilder, Signer, Telemetry, TrustReceipt, VerificationReport, VerifierConfig,
};
use trust_kernel_policy::{
    AiPolicy, BatchReport, CancellationToken, PolicyEnforcementResult, PolicyError, PolicyRuntime,
};
use trust_kernel_store::{ReceiptStore, ReceiptStoreExt, TenantId};

use crate::error::{KernelError, Result};

/// Configuration for the Kernel.
#[derive(Debug, Clone)]
pub struct KernelConfig {
    /// The tenant all operations run under.
    pub tenant: TenantId,
    /// Whether issued receipts embed raw text or only content hashes.
    pub content_mode: ContentMode,
    /// Verify each receipt immediately after issuing it.
    pub verify_on_issue: bool,
    /// Freshness windows for verification.
    pub verifier: VerifierConfig,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            tenant: TenantId::from("default"),
            content_mode: ContentMode::HashOnly,
            verify_on_issue: true,
            verifier: VerifierConfig::default(),
        }
    }
}

/// One interaction, ready to be issued as a receipt.
#[derive(Debug, Clone)]
pub struct InteractionRecord {
    pub session_id: String,
    pub agent_did: String,
    pub human_did: String,
    pub prompt: String,
    pub response: String,
    pub model: String,
    pub telemetry: Option<Telemetry>,
}

/// Verification outcome for one receipt inside a session audit.
#[derive(Debug, Clone)]
pub struct ReceiptAudit {
    pub receipt_id: String,
    /// The four independent per-receipt checks.
    pub report: VerificationReport,
    /// Whether this receipt links correctly from its predecessor's content.
    pub link: CheckResult,
}

/// The outcome of auditing a whole session chain.
#[derive(Debug, Clone)]
pub struct SessionAudit {
    pub session_id: String,
    pub receipts: Vec<ReceiptAudit>,
    /// Every receipt links from its predecessor's current content.
    pub chain_intact: bool,
    /// Chain intact and every per-receipt report valid.
    pub valid: bool,
}

/// The main Kernel struct.
///
/// Provides a unified API for:
/// - Issuing signed, chained receipts for interactions
/// - Verifying single receipts and whole session chains
/// - Registering policies and evaluating receipts against them
pub struct Kernel<S: ReceiptStore> {
    /// Signs issued receipts.
    signer: Signer,
    /// The storage backend.
    store: Arc<S>,
    /// The policy runtime for this kernel instance.
    policies: PolicyRuntime,
    /// Configuration.
    config: KernelConfig,
}

impl<S: ReceiptStore> Kernel<S> {
    /// Create a kernel with the built-in policy evaluators.
    pub fn new(signer: Signer, store: S, config: KernelConfig) -> Self {
        Self::with_policy_runtime(signer, store, PolicyRuntime::with_builtins(), config)
    }

    /// Create a kernel over a custom policy runtime (extra evaluator kinds,
    /// isolated per-tenant runtimes).
    pub fn with_policy_runtime(
        signer: Signer,
        store: S,
        policies: PolicyRuntime,
        config: KernelConfig,
    ) -> Self {
        Self {
            signer,
            store: Arc::new(store),
            policies,
            config,
        }
    }

    /// The kernel's verifying key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.signer.public_key()
    }

    /// Hex encoding of the verifying key, as served by key-distribution
    /// endpoints.
    pub fn public_key_hex(&self) -> String {
        self.signer.public_key().to_hex()
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The policy runtime.
    pub fn policies(&self) -> &PolicyRuntime {
        &self.policies
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Issue
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a signed receipt for an interaction.
    ///
    /// Loads the session head to chain onto, builds the receipt (id and
    /// chain hash), signs it, optionally self-verifies, and persists it.
    pub async fn issue(&self, record: InteractionRecord) -> Result<TrustReceipt> {
        let head = self
            .store
            .session_head(&record.session_id, &self.config.tenant)
            .await?;

        let mut builder = ReceiptBuilder::new(
            record.session_id,
            record.agent_did,
            record.human_did,
        )
        .prompt(record.prompt)
        .response(record.response)
        .model(record.model)
        .content_mode(self.config.content_mode);

        if let Some(telemetry) = record.telemetry {
            builder = builder.telemetry(telemetry);
        }
        if let Some(head) = head {
            builder = builder.previous(head.chain.chain_hash.clone(), head.chain.chain_length);
        }

        let receipt = builder.build()?;
        let signed = self.signer.sign(&receipt)?;

        if self.config.verify_on_issue {
            let report = verify_receipt(&signed, &self.signer.public_key(), &self.config.verifier);
            if !report.valid {
                return Err(KernelError::SelfVerification {
                    errors: report.errors,
                });
            }
        }

        self.store.save(&signed, &self.config.tenant).await?;
        tracing::debug!(
            receipt_id = %signed.id,
            session_id = %signed.session_id,
            chain_length = signed.chain.chain_length,
            "issued trust receipt"
        );
        Ok(signed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verify
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a single receipt against this kernel's key.
    pub fn verify(&self, receipt: &TrustReceipt) -> VerificationReport {
        verify_receipt(receipt, &self.signer.public_key(), &self.config.verifier)
    }

    /// Audit an entire session: per-receipt checks plus cross-receipt chain
    /// linkage.
    ///
    /// The linkage check recomputes each predecessor's chain hash from its
    /// current content, so tampering anywhere in the chain surfaces in the
    /// links that follow it.
    pub async fn verify_session(&self, session_id: &str) -> Result<SessionAudit> {
        let receipts = self
            .store
            .get_by_session(session_id, &self.config.tenant)
            .await?;

        let links = verify_chain_links(&receipts);
        let reports: Vec<ReceiptAudit> = receipts
            .iter()
            .zip(links)
            .map(|(receipt, link)| ReceiptAudit {
                receipt_id: receipt.id.clone(),
                report: self.verify(receipt),
                link,
            })
            .collect();

        let chain_intact = reports.iter().all(|r| r.link.passed);
        let valid = chain_intact && reports.iter().all(|r| r.report.valid);

        Ok(SessionAudit {
            session_id: session_id.to_string(),
            receipts: reports,
            chain_intact,
            valid,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Policy
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a policy with this kernel's runtime.
    pub fn register_policy(&self, policy: AiPolicy) -> Result<()> {
        Ok(self.policies.register_policy(policy)?)
    }

    /// Evaluate a receipt against a registered policy.
    pub fn evaluate_receipt(
        &self,
        receipt: &TrustReceipt,
        policy_id: &str,
    ) -> Result<PolicyEnforcementResult> {
        Ok(self.policies.evaluate_registered(receipt, policy_id)?)
    }

    /// Evaluate a receipt against several registered policies.
    pub fn evaluate_policies(
        &self,
        receipt: &TrustReceipt,
        policy_ids: &[&str],
        strict: bool,
    ) -> Result<Vec<PolicyEnforcementResult>> {
        let policies = self.resolve_policies(policy_ids)?;
        Ok(self.policies.evaluate_policies(receipt, &policies, strict)?)
    }

    /// Batch-evaluate receipts against registered policies.
    pub fn batch_evaluate(
        &self,
        receipts: &[TrustReceipt],
        policy_ids: &[&str],
    ) -> Result<BatchReport> {
        let policies = self.resolve_policies(policy_ids)?;
        Ok(self.policies.batch_evaluate(receipts, &policies)?)
    }

    /// Batch evaluation honoring a cancellation token.
    pub fn batch_evaluate_with_cancel(
        &self,
        receipts: &[TrustReceipt],
        policy_ids: &[&str],
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let policies = self.resolve_policies(policy_ids)?;
        Ok(self
            .policies
            .batch_evaluate_with_cancel(receipts, &policies, cancel)?)
    }

    fn resolve_policies(&self, policy_ids: &[&str]) -> Result<Vec<AiPolicy>> {
        policy_ids
            .iter()
            .map(|id| {
                self.policies
                    .policy(id)
                    .ok_or_else(|| KernelError::Policy(PolicyError::PolicyNotFound(id.to_string())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trust_kernel_core::Signer;
    use trust_kernel_policy::{
        kinds, EnforcementStatus, PolicyConstraint, RecommendedAction, Severity,
    };
    use trust_kernel_store::MemoryStore;

    fn kernel() -> Kernel<MemoryStore> {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        Kernel::new(signer, MemoryStore::new(), KernelConfig::default())
    }

    fn kernel_with_content() -> Kernel<MemoryStore> {
        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let config = KernelConfig {
            content_mode: ContentMode::Include,
            ..KernelConfig::default()
        };
        Kernel::new(signer, MemoryStore::new(), config)
    }

    fn record(session: &str, prompt: &str, response: &str) -> InteractionRecord {
        InteractionRecord {
            session_id: session.to_string(),
            agent_did: "did:example:agent-1".to_string(),
            human_did: "did:example:human-1".to_string(),
            prompt: prompt.to_string(),
            response: response.to_string(),
            model: "atlas-9b".to_string(),
            telemetry: None,
        }
    }

    #[tokio::test]
    async fn test_issue_genesis_then_chain() {
        let kernel = kernel();

        let r1 = kernel.issue(record("sess-1", "one", "first")).await.unwrap();
        assert!(r1.is_genesis());
        assert_eq!(r1.chain.chain_length, 1);
        assert!(r1.is_signed());

        let r2 = kernel.issue(record("sess-1", "two", "second")).await.unwrap();
        assert_eq!(r2.chain.previous_hash, r1.chain.chain_hash);
        assert_eq!(r2.chain.chain_length, 2);
    }

    #[tokio::test]
    async fn test_issued_receipt_verifies() {
        let kernel = kernel();
        let receipt = kernel.issue(record("sess-1", "q", "a")).await.unwrap();

        let report = kernel.verify(&receipt);
        assert!(report.valid, "errors: {:?}", report.errors);
    }

    #[tokio::test]
    async fn test_missing_model_surfaces_validation_error() {
        let kernel = kernel();
        let mut bad = record("sess-1", "q", "a");
        bad.model = String::new();

        let err = kernel.issue(bad).await.unwrap_err();
        assert!(matches!(err, KernelError::Validation(_)));
    }

    #[tokio::test]
    async fn test_verify_session_intact() {
        let kernel = kernel();
        for i in 0..3 {
            kernel
                .issue(record("sess-1", &format!("q{i}"), &format!("a{i}")))
                .await
                .unwrap();
        }

        let audit = kernel.verify_session("sess-1").await.unwrap();
        assert_eq!(audit.receipts.len(), 3);
        assert!(audit.chain_intact);
        assert!(audit.valid);
    }

    #[tokio::test]
    async fn test_verify_session_detects_predecessor_tamper() {
        use trust_kernel_core::ReceiptBuilder;
        use trust_kernel_store::ReceiptStore as _;

        let signer = Signer::from_seed(&[0x42; 32], "v1");
        let store = MemoryStore::new();
        let tenant = TenantId::from("default");

        // Build a three-receipt chain by hand, tamper the first, store all.
        let r1 = signer
            .sign(
                &ReceiptBuilder::new("sess-t", "a", "h")
                    .prompt("one")
                    .response("first")
                    .model("m")
                    .build()
                    .unwrap(),
            )
            .unwrap();
        let r2 = signer
            .sign(
                &ReceiptBuilder::new("sess-t", "a", "h")
                    .prompt("two")
                    .response("second")
                    .model("m")
                    .previous(r1.chain.chain_hash.clone(), 1)
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let mut tampered = r1.clone();
        tampered.interaction.response_hash = Some("ff".repeat(32));

        store.save(&tampered, &tenant).await.unwrap();
        store.save(&r2, &tenant).await.unwrap();

        let kernel = Kernel::new(signer, store, KernelConfig::default());
        let audit = kernel.verify_session("sess-t").await.unwrap();

        assert!(!audit.chain_intact);
        assert!(!audit.valid);
        // The tampered receipt fails its own checks; its successor fails
        // only the linkage.
        assert!(!audit.receipts[0].report.valid);
        assert!(audit.receipts[1].report.valid);
        assert!(!audit.receipts[1].link.passed);
    }

    #[tokio::test]
    async fn test_policy_enforcement_via_kernel() {
        let kernel = kernel_with_content();
        kernel
            .register_policy(
                AiPolicy::new("pol-pii", "PII").with_constraint(PolicyConstraint::new(
                    "c-pii",
                    kinds::PII_DETECTION,
                    Severity::Block,
                )),
            )
            .unwrap();

        let receipt = kernel
            .issue(record("sess-1", "what is on file?", "Your SSN is 123-45-6789."))
            .await
            .unwrap();

        let result = kernel.evaluate_receipt(&receipt, "pol-pii").unwrap();
        assert_eq!(result.status, EnforcementStatus::Blocked);
        assert_eq!(result.recommended_action, RecommendedAction::Block);

        // History is retained for audit replay.
        assert_eq!(kernel.policies().history(&receipt.id).len(), 1);
    }

    #[tokio::test]
    async fn test_batch_evaluate_via_kernel() {
        let kernel = kernel_with_content();
        kernel
            .register_policy(
                AiPolicy::new("pol-pii", "PII").with_constraint(PolicyConstraint::new(
                    "c-pii",
                    kinds::PII_DETECTION,
                    Severity::Block,
                )),
            )
            .unwrap();

        let clean = kernel.issue(record("s1", "q", "all good")).await.unwrap();
        let dirty = kernel
            .issue(record("s2", "q", "SSN 123-45-6789"))
            .await
            .unwrap();

        let report = kernel
            .batch_evaluate(&[clean, dirty], &["pol-pii"])
            .unwrap();
        assert_eq!(report.summary.blocked, 1);
        assert_eq!(report.summary.passed, 1);
    }

    #[tokio::test]
    async fn test_unknown_policy_id() {
        let kernel = kernel();
        let receipt = kernel.issue(record("s1", "q", "a")).await.unwrap();
        let err = kernel.evaluate_receipt(&receipt, "missing").unwrap_err();
        assert!(matches!(
            err,
            KernelError::Policy(PolicyError::PolicyNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_public_key_hex_exposed() {
        let kernel = kernel();
        assert_eq!(
            kernel.public_key_hex(),
            "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12"
        );
    }
}
