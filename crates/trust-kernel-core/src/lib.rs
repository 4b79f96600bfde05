//! # Trust Kernel Core
//!
//! Pure primitives for the Trust Kernel: trust receipts, canonical JSON,
//! and the Ed25519/SHA-256 integrity pipeline.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`TrustReceipt`] - The signed, hash-chained record of one AI interaction
//! - [`ReceiptBuilder`] - Computes the content-addressed id and chain hash
//! - [`Signer`] - Detached Ed25519 signing with key rotation support
//! - [`VerificationReport`] - Structure/signature/chain/timestamp checks as data
//! - [`ReceiptDocument`] - Tagged union over current and legacy wire formats
//!
//! ## Canonicalization
//!
//! All hashing and signing goes through one canonical JSON encoding. See
//! [`canonical`] - it is the single most safety-critical contract here.

pub mod canonical;
pub mod crypto;
pub mod error;
pub mod legacy;
pub mod receipt;
pub mod signer;
pub mod verifier;

pub use canonical::{canonical_bytes, canonical_json, hash_canonical};
pub use crypto::{Ed25519PublicKey, Ed25519Signature, Keypair, Sha256Hash};
pub use error::{CoreError, SigningError, ValidationError};
pub use legacy::{migrate, LegacyReceipt, ReceiptDocument};
pub use receipt::{
    hash_content, ChainLink, CiqMetrics, ContentMode, Interaction, ReceiptBuilder,
    ReceiptSignature, Telemetry, TrustReceipt, GENESIS_PREVIOUS_HASH, RECEIPT_VERSION,
    SIGNATURE_ALGORITHM,
};
pub use signer::Signer;
pub use verifier::{
    verify_chain_links, verify_document, verify_receipt, CheckResult, VerificationChecks,
    VerificationReport, VerifierConfig,
};
