//! # Trust Kernel
//!
//! The unified API for the trust receipt system: tamper-evident, signed,
//! hash-chained records of AI agent interactions, plus the governance
//! policy engine that evaluates them.
//!
//! ## Overview
//!
//! - **Receipts**: Immutable, signed records; the atomic unit of history
//! - **Chains**: Per-session append-only linkage via chain hashes
//! - **Verification**: Independent structure/signature/chain/timestamp checks
//! - **Policies**: Pluggable constraint evaluators with enforcement verdicts
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trust_kernel::{InteractionRecord, Kernel, KernelConfig};
//! use trust_kernel::core::Signer;
//! use trust_kernel::store::MemoryStore;
//!
//! async fn example() {
//!     let signer = Signer::from_seed(&[0x42; 32], "v1");
//!     let kernel = Kernel::new(signer, MemoryStore::new(), KernelConfig::default());
//!
//!     let receipt = kernel
//!         .issue(InteractionRecord {
//!             session_id: "sess-1".into(),
//!             agent_did: "did:example:agent".into(),
//!             human_did: "did:example:human".into(),
//!             prompt: "hello".into(),
//!             response: "hi there".into(),
//!             model: "atlas-9b".into(),
//!             telemetry: None,
//!         })
//!         .await
//!         .unwrap();
//!
//!     assert!(kernel.verify(&receipt).valid);
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `trust_kernel::core` - Receipts, canonicalization, signing, verification
//! - `trust_kernel::policy` - Constraints, evaluators, the policy runtime
//! - `trust_kernel::store` - Persistence abstraction and memory store

pub mod error;
pub mod kernel;

// Re-export component crates
pub use trust_kernel_core as core;
pub use trust_kernel_policy as policy;
pub use trust_kernel_store as store;

// Re-export main types for convenience
pub use error::{KernelError, Result};
pub use kernel::{InteractionRecord, Kernel, KernelConfig, ReceiptAudit, SessionAudit};

// Re-export commonly used component types
pub use trust_kernel_core::{
    ContentMode, Ed25519PublicKey, Keypair, ReceiptBuilder, Signer, Telemetry, TrustReceipt,
    VerificationReport, VerifierConfig, GENESIS_PREVIOUS_HASH,
};
pub use trust_kernel_policy::{
    AiPolicy, BatchReport, CancellationToken, ConstraintViolation, EnforcementStatus,
    PolicyConstraint, PolicyEnforcementResult, PolicyRuntime, RecommendedAction, Severity,
};
pub use trust_kernel_store::{MemoryStore, ReceiptStore, TenantId};
