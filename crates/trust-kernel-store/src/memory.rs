//! In-memory implementation of the ReceiptStore trait.
//!
//! Primarily for testing and embedding. Same semantics a durable backend
//! must provide, with everything in memory and no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use trust_kernel_core::TrustReceipt;

use crate::error::{Result, StoreError};
use crate::traits::{ReceiptStore, TenantId};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    /// Sessions keyed by (tenant, session_id), receipts in append order.
    sessions: RwLock<HashMap<(String, String), Vec<TrustReceipt>>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Total receipt count across all tenants and sessions.
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .map(|s| s.values().map(Vec::len).sum())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReceiptStore for MemoryStore {
    async fn save(&self, receipt: &TrustReceipt, tenant: &TenantId) -> Result<()> {
        let mut sessions = self
            .sessions
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        let key = (tenant.0.clone(), receipt.session_id.clone());
        let chain = sessions.entry(key).or_default();

        // Idempotent: the same receipt saved twice is a no-op.
        if chain.iter().any(|r| r.id == receipt.id) {
            return Ok(());
        }

        chain.push(receipt.clone());
        Ok(())
    }

    async fn get_by_session(
        &self,
        session_id: &str,
        tenant: &TenantId,
    ) -> Result<Vec<TrustReceipt>> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;

        Ok(sessions
            .get(&(tenant.0.clone(), session_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ReceiptStoreExt;
    use trust_kernel_core::ReceiptBuilder;

    fn make_receipt(session: &str, prompt: &str) -> TrustReceipt {
        ReceiptBuilder::new(session, "did:example:agent", "did:example:human")
            .prompt(prompt)
            .response("answer")
            .model("atlas-9b")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = MemoryStore::new();
        let tenant = TenantId::from("acme");
        let receipt = make_receipt("sess-1", "first");

        store.save(&receipt, &tenant).await.unwrap();

        let receipts = store.get_by_session("sess-1", &tenant).await.unwrap();
        assert_eq!(receipts.len(), 1);
        assert_eq!(receipts[0].id, receipt.id);
    }

    #[tokio::test]
    async fn test_save_idempotent() {
        let store = MemoryStore::new();
        let tenant = TenantId::from("acme");
        let receipt = make_receipt("sess-1", "first");

        store.save(&receipt, &tenant).await.unwrap();
        store.save(&receipt, &tenant).await.unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_session_ordering_and_head() {
        let store = MemoryStore::new();
        let tenant = TenantId::from("acme");

        let r1 = make_receipt("sess-1", "one");
        let r2 = make_receipt("sess-1", "two");
        store.save(&r1, &tenant).await.unwrap();
        store.save(&r2, &tenant).await.unwrap();

        let receipts = store.get_by_session("sess-1", &tenant).await.unwrap();
        assert_eq!(receipts[0].id, r1.id);
        assert_eq!(receipts[1].id, r2.id);

        let head = store.session_head("sess-1", &tenant).await.unwrap().unwrap();
        assert_eq!(head.id, r2.id);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = MemoryStore::new();
        let receipt = make_receipt("sess-1", "secret");

        store.save(&receipt, &TenantId::from("acme")).await.unwrap();

        let other = store
            .get_by_session("sess-1", &TenantId::from("globex"))
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_empty_session_head() {
        let store = MemoryStore::new();
        let head = store
            .session_head("nope", &TenantId::from("acme"))
            .await
            .unwrap();
        assert!(head.is_none());
    }
}
