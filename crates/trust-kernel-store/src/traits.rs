//! Store trait: the abstract interface for receipt persistence.
//!
//! The kernel is storage-agnostic; it only ever needs these two operations.
//! Implementations bridge to whatever engine a deployment uses; this crate
//! ships an in-memory one for tests and embedding.

use async_trait::async_trait;
use std::fmt;
use trust_kernel_core::TrustReceipt;

use crate::error::Result;

/// Identifies the tenant a receipt belongs to.
///
/// Receipts are partitioned per tenant: two tenants can use the same
/// session id without seeing each other's chains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The ReceiptStore trait: async interface for receipt persistence.
///
/// # Design Notes
///
/// - **Idempotent saves**: Saving a receipt whose id already exists in the
///   session is a no-op, not an error.
/// - **Session ordering**: `get_by_session` returns receipts in chain order
///   (append order), so the last element is the session head.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persist a receipt under a tenant.
    async fn save(&self, receipt: &TrustReceipt, tenant: &TenantId) -> Result<()>;

    /// All receipts of a session, in chain order.
    async fn get_by_session(
        &self,
        session_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<TrustReceipt>>;
}

/// Extension trait for common store patterns.
pub trait ReceiptStoreExt: ReceiptStore {
    /// The most recent receipt of a session, if any.
    ///
    /// The head's `chain_hash`/`chain_length` seed the next receipt's chain
    /// linkage.
    fn session_head(
        &self,
        session_id: &str,
        tenant: &TenantId,
    ) -> impl std::future::Future<Output = Result<Option<TrustReceipt>>> + Send;
}

impl<S: ReceiptStore + ?Sized> ReceiptStoreExt for S {
    async fn session_head(
        &self,
        session_id: &str,
        tenant: &TenantId,
    ) -> Result<Option<TrustReceipt>> {
        let receipts = self.get_by_session(session_id, tenant).await?;
        Ok(receipts.into_iter().last())
    }
}
