//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use chrono::{TimeZone, Utc};
use trust_kernel::{Kernel, KernelConfig};
use trust_kernel_core::{ContentMode, ReceiptBuilder, Signer, Telemetry, TrustReceipt};
use trust_kernel_policy::{kinds, AiPolicy, PolicyConstraint, Severity};
use trust_kernel_store::MemoryStore;

/// A test fixture with a seeded signer.
pub struct TestFixture {
    pub signer: Signer,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            signer: Signer::new(trust_kernel_core::Keypair::generate(), "v1"),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            signer: Signer::from_seed(&seed, "v1"),
        }
    }

    /// Get the fixture's public key.
    pub fn public_key(&self) -> trust_kernel_core::Ed25519PublicKey {
        self.signer.public_key()
    }

    /// Build a kernel over a fresh memory store.
    pub fn kernel(&self) -> Kernel<MemoryStore> {
        Kernel::new(
            self.signer.clone(),
            MemoryStore::new(),
            KernelConfig::default(),
        )
    }

    /// Build a kernel that embeds raw interaction text.
    pub fn kernel_with_content(&self) -> Kernel<MemoryStore> {
        let config = KernelConfig {
            content_mode: ContentMode::Include,
            ..KernelConfig::default()
        };
        Kernel::new(self.signer.clone(), MemoryStore::new(), config)
    }

    /// Create a signed genesis receipt.
    pub fn make_genesis(&self, session_id: &str, prompt: &str, response: &str) -> TrustReceipt {
        let receipt = ReceiptBuilder::new(session_id, "did:example:agent", "did:example:human")
            .prompt(prompt)
            .response(response)
            .model("atlas-9b")
            .timestamp(fixed_time())
            .build()
            .expect("fixture receipt must build");
        self.signer.sign(&receipt).expect("fixture signing must succeed")
    }

    /// Create a signed receipt chained onto a predecessor.
    pub fn make_chained(
        &self,
        previous: &TrustReceipt,
        prompt: &str,
        response: &str,
    ) -> TrustReceipt {
        let receipt = ReceiptBuilder::new(
            previous.session_id.clone(),
            previous.agent_did.clone(),
            previous.human_did.clone(),
        )
        .prompt(prompt)
        .response(response)
        .model(previous.interaction.model.clone())
        .timestamp(fixed_time())
        .previous(previous.chain.chain_hash.clone(), previous.chain.chain_length)
        .build()
        .expect("fixture receipt must build");
        self.signer.sign(&receipt).expect("fixture signing must succeed")
    }

    /// Create a signed chain of `n` receipts in one session.
    pub fn make_chain(&self, session_id: &str, n: usize) -> Vec<TrustReceipt> {
        let mut receipts: Vec<TrustReceipt> = Vec::with_capacity(n);
        for i in 0..n {
            let receipt = match receipts.last() {
                None => self.make_genesis(session_id, &format!("q{i}"), &format!("a{i}")),
                Some(prev) => self.make_chained(prev, &format!("q{i}"), &format!("a{i}")),
            };
            receipts.push(receipt);
        }
        receipts
    }

    /// A receipt carrying the given telemetry.
    pub fn make_with_telemetry(&self, session_id: &str, telemetry: Telemetry) -> TrustReceipt {
        let receipt = ReceiptBuilder::new(session_id, "did:example:agent", "did:example:human")
            .prompt("q")
            .response("a")
            .model("atlas-9b")
            .timestamp(fixed_time())
            .telemetry(telemetry)
            .build()
            .expect("fixture receipt must build");
        self.signer.sign(&receipt).expect("fixture signing must succeed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A single-constraint PII policy at the given severity.
pub fn pii_policy(severity: Severity) -> AiPolicy {
    AiPolicy::new("pol-pii", "PII policy").with_constraint(PolicyConstraint::new(
        "c-pii",
        kinds::PII_DETECTION,
        severity,
    ))
}

/// A policy exercising all four built-in constraint kinds.
pub fn full_policy() -> AiPolicy {
    AiPolicy::new("pol-full", "Baseline governance")
        .with_constraint(PolicyConstraint::new(
            "c-pii",
            kinds::PII_DETECTION,
            Severity::Block,
        ))
        .with_constraint(PolicyConstraint::new(
            "c-td",
            kinds::TRUTH_DEBT,
            Severity::Escalate,
        ))
        .with_constraint(PolicyConstraint::new(
            "c-comp",
            kinds::COMPLIANCE_BOUNDARY,
            Severity::Escalate,
        ))
        .with_constraint(PolicyConstraint::new(
            "c-coh",
            kinds::COHERENCE,
            Severity::Warn,
        ))
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// Install a test-friendly tracing subscriber (idempotent).
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A stable timestamp for reproducible fixtures.
pub fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 5, 12, 0, 0).unwrap()
}
