//! # Trust Kernel Testkit
//!
//! Testing utilities for the Trust Kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Pinned test cases with expected ids, chain hashes,
//!   and signatures for cross-implementation verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Helper structs for setting up test scenarios
//!
//! ## Golden Vectors
//!
//! ```rust
//! use trust_kernel_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, id) in verify_all_vectors() {
//!     assert!(matches, "{name} diverged: {id}");
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use trust_kernel_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([0x42; 32]);
//! let chain = fixture.make_chain("my-session", 3);
//! assert_eq!(chain.len(), 3);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    full_policy, init_test_logging, multi_party_fixtures, pii_policy, TestFixture,
};
pub use generators::{receipt_from_params, ReceiptParams};
pub use vectors::{all_vectors, generate_receipt_from_vector, verify_all_vectors, GoldenVector};
