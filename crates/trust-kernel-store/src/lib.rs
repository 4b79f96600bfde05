//! # Trust Kernel Store
//!
//! Persistence abstraction for trust receipts.
//!
//! The kernel only requires two operations from a backend: `save` and
//! `get_by_session`. The [`ReceiptStore`] trait captures them; the
//! [`MemoryStore`] implements them for tests and embedded use. Durable
//! engines live behind the same trait in deployment-specific crates.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use traits::{ReceiptStore, ReceiptStoreExt, TenantId};
