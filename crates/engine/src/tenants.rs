//! Tenant lifecycle operations
//!
//! A tenant is created once with a dedicated namespace; the namespace is
//! immutable thereafter. Deletion cascades over every owned collection
//! (table before metadata, per collection) and finally removes the
//! namespace and the tenant row.

use crate::Engine;
use tessera_core::{naming, EngineError, PageRequest, Result, Tenant, TenantId};
use tracing::info;

impl Engine {
    /// Create a tenant and ensure its namespace exists
    ///
    /// # Errors
    ///
    /// `Conflict` if the name is taken, `IllegalArgument` for an empty
    /// name, `Storage` on driver failure.
    pub fn create_tenant(&self, name: &str) -> Result<Tenant> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::illegal_argument("tenant name cannot be empty"));
        }
        if self.metadata.tenant_by_name(name)?.is_some() {
            return Err(EngineError::conflict("Tenant", "name", name));
        }

        let tenant = Tenant::new(name);

        // Namespace first: a failure leaves no tenant row behind
        self.driver.ensure_namespace(&naming::schema_name(tenant.id))?;
        self.metadata.insert_tenant(&tenant)?;

        info!(tenant = %tenant.id, name = %tenant.name, "created tenant");
        Ok(tenant)
    }

    /// Load a tenant by id
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no such tenant exists.
    pub fn get_tenant(&self, id: TenantId) -> Result<Tenant> {
        self.require_tenant(id)
    }

    /// Load a tenant by name, if present
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata store fails.
    pub fn find_tenant_by_name(&self, name: &str) -> Result<Option<Tenant>> {
        self.metadata.tenant_by_name(name.trim())
    }

    /// Delete a tenant, cascading to all owned collections
    ///
    /// Every owned collection is deleted first (physical table before
    /// metadata, as in [`Engine::delete_collection`]), then the namespace
    /// is dropped, then the tenant row is removed.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no such tenant exists, `Storage` on driver
    /// failure.
    pub fn delete_tenant(&self, id: TenantId) -> Result<()> {
        let tenant = self.require_tenant(id)?;

        loop {
            let page = self
                .metadata
                .collections_by_tenant(id, PageRequest::of(0, self.limits.max_page_size))?;
            if page.is_empty() {
                break;
            }
            for collection in page.items {
                self.delete_collection(collection.id)?;
            }
        }

        self.driver.drop_namespace(&naming::schema_name(id))?;
        self.metadata.delete_tenant(id)?;

        info!(tenant = %id, name = %tenant.name, "dropped tenant");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tenant_trims_name() {
        let engine = Engine::in_memory();
        let tenant = engine.create_tenant("  acme  ").unwrap();
        assert_eq!(tenant.name, "acme");
    }

    #[test]
    fn test_empty_tenant_name_rejected() {
        let engine = Engine::in_memory();
        let err = engine.create_tenant("   ").unwrap_err();
        assert!(matches!(err, EngineError::IllegalArgument(_)));
    }

    #[test]
    fn test_duplicate_tenant_name_conflicts() {
        let engine = Engine::in_memory();
        engine.create_tenant("acme").unwrap();
        assert!(engine.create_tenant("acme").unwrap_err().is_conflict());
    }

    #[test]
    fn test_find_by_name() {
        let engine = Engine::in_memory();
        let tenant = engine.create_tenant("acme").unwrap();
        assert_eq!(
            engine.find_tenant_by_name("acme").unwrap().unwrap().id,
            tenant.id
        );
        assert!(engine.find_tenant_by_name("ghost").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_tenant_not_found() {
        let engine = Engine::in_memory();
        assert!(engine.delete_tenant(TenantId::new()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_tenant_removes_it() {
        let engine = Engine::in_memory();
        let tenant = engine.create_tenant("acme").unwrap();
        engine.delete_tenant(tenant.id).unwrap();
        assert!(engine.get_tenant(tenant.id).unwrap_err().is_not_found());
    }
}
