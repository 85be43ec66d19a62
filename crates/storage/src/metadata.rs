//! In-memory metadata store
//!
//! Tenants and collections in `parking_lot`-guarded maps, with a
//! (tenant, name) index enforcing per-tenant collection-name uniqueness
//! atomically under the write lock.

use parking_lot::RwLock;
use std::collections::HashMap;
use tessera_core::{
    Collection, CollectionId, EngineError, MetadataStore, Page, PageRequest, Result, Tenant,
    TenantId,
};

#[derive(Debug, Default)]
struct MetadataState {
    tenants: HashMap<TenantId, Tenant>,
    collections: HashMap<CollectionId, Collection>,
    /// (tenant, collection name) -> collection id
    names: HashMap<(TenantId, String), CollectionId>,
}

/// In-memory implementation of the [`MetadataStore`] port
#[derive(Debug, Default)]
pub struct MemoryMetadataStore {
    inner: RwLock<MetadataState>,
}

impl MemoryMetadataStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn insert_tenant(&self, tenant: &Tenant) -> Result<()> {
        let mut state = self.inner.write();
        if state.tenants.values().any(|t| t.name == tenant.name) {
            return Err(EngineError::conflict("Tenant", "name", &tenant.name));
        }
        state.tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    fn tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>> {
        Ok(self.inner.read().tenants.get(&id).cloned())
    }

    fn tenant_by_name(&self, name: &str) -> Result<Option<Tenant>> {
        Ok(self
            .inner
            .read()
            .tenants
            .values()
            .find(|t| t.name == name)
            .cloned())
    }

    fn delete_tenant(&self, id: TenantId) -> Result<bool> {
        Ok(self.inner.write().tenants.remove(&id).is_some())
    }

    fn insert_collection(&self, collection: &Collection) -> Result<()> {
        let mut state = self.inner.write();
        let key = (collection.tenant_id, collection.name.clone());
        if state.names.contains_key(&key) {
            return Err(EngineError::conflict("Collection", "name", &collection.name));
        }
        state.names.insert(key, collection.id);
        state.collections.insert(collection.id, collection.clone());
        Ok(())
    }

    fn save_collection(&self, collection: &Collection) -> Result<()> {
        let mut state = self.inner.write();
        if !state.collections.contains_key(&collection.id) {
            return Err(EngineError::not_found(
                "Collection",
                "id",
                collection.id.to_string(),
            ));
        }
        state.collections.insert(collection.id, collection.clone());
        Ok(())
    }

    fn delete_collection(&self, id: CollectionId) -> Result<bool> {
        let mut state = self.inner.write();
        let Some(collection) = state.collections.remove(&id) else {
            return Ok(false);
        };
        state
            .names
            .remove(&(collection.tenant_id, collection.name));
        Ok(true)
    }

    fn collection_by_id(&self, id: CollectionId) -> Result<Option<Collection>> {
        Ok(self.inner.read().collections.get(&id).cloned())
    }

    fn collection_by_name(&self, tenant_id: TenantId, name: &str) -> Result<Option<Collection>> {
        let state = self.inner.read();
        let id = state.names.get(&(tenant_id, name.to_string()));
        Ok(id.and_then(|id| state.collections.get(id)).cloned())
    }

    fn collection_exists(&self, tenant_id: TenantId, name: &str) -> Result<bool> {
        Ok(self
            .inner
            .read()
            .names
            .contains_key(&(tenant_id, name.to_string())))
    }

    fn collections_by_tenant(
        &self,
        tenant_id: TenantId,
        page: PageRequest,
    ) -> Result<Page<Collection>> {
        let state = self.inner.read();
        let mut owned: Vec<_> = state
            .collections
            .values()
            .filter(|c| c.tenant_id == tenant_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| a.name.cmp(&b.name));

        let total = owned.len() as u64;
        let items = owned
            .into_iter()
            .skip(page.offset())
            .take(page.per_page as usize)
            .collect();

        Ok(Page::new(items, page, total))
    }
}
