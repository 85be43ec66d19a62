//! Per-collection lock registry
//!
//! Structural changes to one collection read metadata, compute a diff, then
//! write, which is unsafe under concurrent mutation of the same collection.
//! Each
//! collection gets a mutex, created on first use; operations on different
//! collections never contend.
//!
//! Creation has no collection id yet, so it serializes on the deterministic
//! physical table name instead.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tessera_core::CollectionId;

#[derive(Debug, Default)]
pub(crate) struct CollectionLocks {
    by_id: DashMap<CollectionId, Arc<Mutex<()>>>,
    by_table: DashMap<String, Arc<Mutex<()>>>,
}

impl CollectionLocks {
    /// Mutex serializing structural changes to one collection
    pub(crate) fn collection_guard(&self, id: CollectionId) -> Arc<Mutex<()>> {
        self.by_id.entry(id).or_default().clone()
    }

    /// Mutex serializing creation under one physical table name
    pub(crate) fn table_guard(&self, table: &str) -> Arc<Mutex<()>> {
        self.by_table.entry(table.to_string()).or_default().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_collection_shares_a_lock() {
        let locks = CollectionLocks::default();
        let id = CollectionId::new();
        let a = locks.collection_guard(id);
        let b = locks.collection_guard(id);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_collections_get_different_locks() {
        let locks = CollectionLocks::default();
        let a = locks.collection_guard(CollectionId::new());
        let b = locks.collection_guard(CollectionId::new());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_table_guard_keys_by_name() {
        let locks = CollectionLocks::default();
        let a = locks.table_guard("aaaa_orders");
        let b = locks.table_guard("aaaa_orders");
        let c = locks.table_guard("bbbb_orders");
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }
}
