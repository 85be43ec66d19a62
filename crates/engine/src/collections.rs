//! Collection lifecycle operations
//!
//! Orchestrates metadata and DDL so that the core invariant holds: a
//! collection's physical table exists whenever its metadata row exists.
//! Create runs DDL before committing metadata; delete drops the table
//! before removing metadata; update interleaves index DDL with the
//! attribute diff per the ordering rules below.
//!
//! Structural changes to one collection are serialized through the lock
//! registry; operations on different collections run concurrently.

use crate::diff::diff_attributes;
use crate::events::LifecycleEvent;
use crate::Engine;
use chrono::Utc;
use tessera_core::{
    naming, Attribute, Collection, CollectionId, EngineError, Page, PageRequest, Result, TenantId,
};
use tracing::{debug, info};

impl Engine {
    /// Create a collection with the given attribute set
    ///
    /// The name is sanitized first. Namespace, table, the general payload
    /// index, and one expression index per `indexed` attribute are ensured
    /// before the metadata row is committed, so a DDL failure leaves no
    /// metadata describing a missing table.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown tenant, `Conflict` when the name
    /// is taken within the tenant, `IllegalArgument` for bad names or an
    /// oversized attribute set, `Storage` on driver failure.
    pub fn create_collection(
        &self,
        tenant_id: TenantId,
        name: &str,
        attributes: Vec<Attribute>,
    ) -> Result<Collection> {
        let tenant = self.require_tenant(tenant_id)?;
        let name = naming::sanitize_collection_name(name)?;
        let attributes = self.normalize_attributes(attributes)?;

        let schema = naming::schema_name(tenant.id);
        let table = naming::table_name(tenant.id, &name)?;

        let guard = self.locks.table_guard(&table);
        let _serialized = guard.lock();

        if self.metadata.collection_exists(tenant_id, &name)? {
            return Err(EngineError::conflict("Collection", "name", name));
        }

        self.driver.ensure_namespace(&schema)?;
        self.driver.ensure_table(&schema, &table)?;
        self.driver.ensure_general_index(&schema, &table)?;
        for attr in &attributes {
            if attr.indexed {
                let physical = self
                    .registry
                    .resolve_physical_type(attr.data_type, &attr.config);
                self.driver
                    .ensure_attribute_index(&schema, &table, &attr.name, &physical)?;
            }
        }

        let collection = Collection::new(tenant_id, name, attributes);
        self.metadata.insert_collection(&collection)?;

        info!(tenant = %tenant_id, collection = %collection.name, "created collection");
        self.publish(LifecycleEvent::CollectionCreated {
            tenant_id,
            collection_id: collection.id,
            name: collection.name.clone(),
        });

        Ok(collection)
    }

    /// Replace a collection's attribute set, diffing against the current one
    ///
    /// Per attribute, independently:
    /// - removed: drop its index (if indexed), then remove it from metadata
    /// - added: add to metadata, then create its index (if requested)
    /// - retained with a differing `indexed` flag or `data_type`: drop the
    ///   old index (if one existed), update `data_type`/`indexed`, create
    ///   the new index (if newly indexed); one rebuild codepath covers both
    ///   kinds of change
    ///
    /// Existing rows are NOT migrated when a data type changes; only the
    /// index is rebuilt under the new physical type.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection, `IllegalArgument` for
    /// bad attribute names or an oversized set, `Storage` on driver
    /// failure.
    pub fn update_collection(
        &self,
        collection_id: CollectionId,
        attributes: Vec<Attribute>,
    ) -> Result<Collection> {
        let desired = self.normalize_attributes(attributes)?;

        let guard = self.locks.collection_guard(collection_id);
        let _serialized = guard.lock();

        let mut collection = self.require_collection(collection_id)?;
        let schema = naming::schema_name(collection.tenant_id);
        let table = naming::table_name(collection.tenant_id, &collection.name)?;

        let diff = diff_attributes(&collection.attributes, &desired);
        debug!(
            collection = %collection.name,
            removed = diff.removed.len(),
            added = diff.added.len(),
            changed = diff.changed.len(),
            "applying attribute diff"
        );

        for removed in &diff.removed {
            if removed.indexed {
                self.driver
                    .drop_attribute_index(&schema, &table, &removed.name)?;
            }
            collection.attributes.retain(|a| a.name != removed.name);
        }

        for added in &diff.added {
            collection.attributes.push(added.clone());
            if added.indexed {
                let physical = self
                    .registry
                    .resolve_physical_type(added.data_type, &added.config);
                self.driver
                    .ensure_attribute_index(&schema, &table, &added.name, &physical)?;
            }
        }

        for change in &diff.changed {
            if change.current.indexed {
                self.driver
                    .drop_attribute_index(&schema, &table, &change.current.name)?;
            }

            let Some(attr) = collection
                .attributes
                .iter_mut()
                .find(|a| a.name == change.current.name)
            else {
                continue;
            };
            attr.data_type = change.desired.data_type;
            attr.indexed = change.desired.indexed;

            if attr.indexed {
                let physical = self
                    .registry
                    .resolve_physical_type(attr.data_type, &attr.config);
                self.driver
                    .ensure_attribute_index(&schema, &table, &change.current.name, &physical)?;
            }
        }

        collection.updated_at = Utc::now();
        self.metadata.save_collection(&collection)?;

        info!(tenant = %collection.tenant_id, collection = %collection.name, "updated collection");
        Ok(collection)
    }

    /// Add a single attribute to an existing collection
    ///
    /// Shorthand for the common "append one field" mutation. The attribute
    /// name is sanitized; adding a name that already exists is a conflict
    /// (use [`Engine::update_collection`] to change an existing attribute).
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection, `Conflict` for a
    /// duplicate attribute name, `IllegalArgument` for a bad name or an
    /// attribute set already at the limit, `Storage` on driver failure.
    pub fn add_attribute(
        &self,
        collection_id: CollectionId,
        attribute: Attribute,
    ) -> Result<Attribute> {
        let guard = self.locks.collection_guard(collection_id);
        let _serialized = guard.lock();

        let mut collection = self.require_collection(collection_id)?;
        if collection.attributes.len() >= self.limits.max_attributes {
            return Err(EngineError::illegal_argument(format!(
                "attribute set exceeds {} entries",
                self.limits.max_attributes
            )));
        }

        let mut attribute = attribute;
        attribute.name = naming::sanitize_attribute_name(&attribute.name)?;
        if collection.attribute(&attribute.name).is_some() {
            return Err(EngineError::conflict("Attribute", "name", attribute.name));
        }

        collection.attributes.push(attribute.clone());
        if attribute.indexed {
            let schema = naming::schema_name(collection.tenant_id);
            let table = naming::table_name(collection.tenant_id, &collection.name)?;
            let physical = self
                .registry
                .resolve_physical_type(attribute.data_type, &attribute.config);
            self.driver
                .ensure_attribute_index(&schema, &table, &attribute.name, &physical)?;
        }

        collection.updated_at = Utc::now();
        self.metadata.save_collection(&collection)?;

        info!(collection = %collection.name, attribute = %attribute.name, "added attribute");
        Ok(attribute)
    }

    /// Delete a collection and its physical table
    ///
    /// The table is dropped before the metadata row is removed: a crash in
    /// between leaves an orphaned-but-referenced table, never metadata
    /// pointing at nothing.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` for an unknown collection, `Storage` on driver
    /// failure.
    pub fn delete_collection(&self, collection_id: CollectionId) -> Result<()> {
        let guard = self.locks.collection_guard(collection_id);
        let _serialized = guard.lock();

        let collection = self.require_collection(collection_id)?;
        let schema = naming::schema_name(collection.tenant_id);
        let table = naming::table_name(collection.tenant_id, &collection.name)?;

        self.driver.drop_table(&schema, &table)?;
        self.metadata.delete_collection(collection_id)?;

        info!(tenant = %collection.tenant_id, collection = %collection.name, "dropped collection");
        self.publish(LifecycleEvent::CollectionDeleted {
            tenant_id: collection.tenant_id,
            collection_id,
            name: collection.name,
        });

        Ok(())
    }

    /// Load a collection by id
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no such collection exists.
    pub fn get_collection(&self, collection_id: CollectionId) -> Result<Collection> {
        self.require_collection(collection_id)
    }

    /// Load a collection by tenant and name
    ///
    /// The name is sanitized before lookup, so raw user input is accepted.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if no such collection exists.
    pub fn get_collection_by_name(
        &self,
        tenant_id: TenantId,
        name: &str,
    ) -> Result<Collection> {
        let name = naming::sanitize_collection_name(name)?;
        self.metadata
            .collection_by_name(tenant_id, &name)?
            .ok_or_else(|| EngineError::not_found("Collection", "name", name))
    }

    /// Page through a tenant's collections
    ///
    /// # Errors
    ///
    /// Returns an error if the metadata store fails.
    pub fn list_collections(
        &self,
        tenant_id: TenantId,
        page: PageRequest,
    ) -> Result<Page<Collection>> {
        let page = PageRequest {
            page: page.page,
            per_page: self.limits.clamp_page_size(page.per_page),
        };
        self.metadata.collections_by_tenant(tenant_id, page)
    }

    /// Sanitize attribute names and collapse duplicates (last wins)
    fn normalize_attributes(&self, attributes: Vec<Attribute>) -> Result<Vec<Attribute>> {
        if attributes.len() > self.limits.max_attributes {
            return Err(EngineError::illegal_argument(format!(
                "attribute set exceeds {} entries",
                self.limits.max_attributes
            )));
        }

        let mut out: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for mut attr in attributes {
            attr.name = naming::sanitize_attribute_name(&attr.name)?;
            if let Some(existing) = out.iter_mut().find(|a| a.name == attr.name) {
                *existing = attr;
            } else {
                out.push(attr);
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tessera_core::{
        AttributeType, DataRecord, Limits, MetadataStore, Payload, PhysicalType, RecordId,
        StorageDriver, Tenant,
    };
    use tessera_storage::MemoryMetadataStore;

    fn engine() -> Engine {
        Engine::in_memory()
    }

    /// A driver whose every operation fails
    struct FailingDriver;

    impl StorageDriver for FailingDriver {
        fn ensure_namespace(&self, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn drop_namespace(&self, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn ensure_table(&self, _: &str, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn drop_table(&self, _: &str, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn ensure_general_index(&self, _: &str, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn ensure_attribute_index(
            &self,
            _: &str,
            _: &str,
            _: &str,
            _: &PhysicalType,
        ) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn drop_attribute_index(&self, _: &str, _: &str, _: &str) -> Result<()> {
            Err(EngineError::storage("induced failure"))
        }
        fn insert_record(&self, _: &str, _: &str, _: RecordId, _: &Payload) -> Result<DataRecord> {
            Err(EngineError::storage("induced failure"))
        }
        fn update_record(
            &self,
            _: &str,
            _: &str,
            _: RecordId,
            _: &Payload,
        ) -> Result<Option<DataRecord>> {
            Err(EngineError::storage("induced failure"))
        }
        fn fetch_record(&self, _: &str, _: &str, _: RecordId) -> Result<Option<DataRecord>> {
            Err(EngineError::storage("induced failure"))
        }
        fn list_records(&self, _: &str, _: &str) -> Result<Vec<DataRecord>> {
            Err(EngineError::storage("induced failure"))
        }
        fn delete_record(&self, _: &str, _: &str, _: RecordId) -> Result<bool> {
            Err(EngineError::storage("induced failure"))
        }
    }

    #[test]
    fn test_ddl_failure_leaves_no_metadata() {
        let metadata = Arc::new(MemoryMetadataStore::new());
        let engine = Engine::builder()
            .metadata(metadata.clone())
            .driver(Arc::new(FailingDriver))
            .build()
            .unwrap();

        // Seed the tenant row directly; create_tenant would trip the driver
        let tenant = Tenant::new("acme");
        metadata.insert_tenant(&tenant).unwrap();

        let err = engine
            .create_collection(tenant.id, "orders", vec![])
            .unwrap_err();
        assert!(err.is_storage());

        // The failed create committed nothing
        assert!(!metadata.collection_exists(tenant.id, "orders").unwrap());
    }

    #[test]
    fn test_create_requires_tenant() {
        let engine = engine();
        let err = engine
            .create_collection(TenantId::new(), "orders", vec![])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_create_sanitizes_name() {
        let engine = engine();
        let tenant = engine.create_tenant("acme").unwrap();
        let collection = engine
            .create_collection(tenant.id, "My Orders", vec![])
            .unwrap();
        assert_eq!(collection.name, "my_orders");
    }

    #[test]
    fn test_attribute_names_are_sanitized() {
        let engine = engine();
        let tenant = engine.create_tenant("acme").unwrap();
        let collection = engine
            .create_collection(
                tenant.id,
                "orders",
                vec![Attribute::new("total amount!", AttributeType::Decimal)],
            )
            .unwrap();
        assert_eq!(collection.attributes[0].name, "totalamount");
    }

    #[test]
    fn test_attribute_limit_enforced() {
        let engine = Engine::builder()
            .metadata(std::sync::Arc::new(tessera_storage::MemoryMetadataStore::new()))
            .driver(std::sync::Arc::new(tessera_storage::MemoryDriver::new()))
            .limits(Limits::with_small_limits())
            .build()
            .unwrap();
        let tenant = engine.create_tenant("acme").unwrap();
        let attrs: Vec<_> = (0..5)
            .map(|i| Attribute::new(format!("a{i}"), AttributeType::String))
            .collect();
        let err = engine
            .create_collection(tenant.id, "orders", attrs)
            .unwrap_err();
        assert!(matches!(err, EngineError::IllegalArgument(_)));
    }

    #[test]
    fn test_duplicate_attributes_keep_last() {
        let engine = engine();
        let tenant = engine.create_tenant("acme").unwrap();
        let collection = engine
            .create_collection(
                tenant.id,
                "orders",
                vec![
                    Attribute::new("v", AttributeType::String),
                    Attribute::new("v", AttributeType::Integer),
                ],
            )
            .unwrap();
        assert_eq!(collection.attributes.len(), 1);
        assert_eq!(collection.attributes[0].data_type, AttributeType::Integer);
    }

    #[test]
    fn test_update_missing_collection_not_found() {
        let engine = engine();
        let err = engine
            .update_collection(CollectionId::new(), vec![])
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_preserves_retained_config() {
        let engine = engine();
        let tenant = engine.create_tenant("acme").unwrap();
        let config = tessera_core::AttributeConfig::new().with("max", 100);
        let collection = engine
            .create_collection(
                tenant.id,
                "orders",
                vec![Attribute::new("total", AttributeType::Integer).with_config(config.clone())],
            )
            .unwrap();

        // Flip the index flag; the stored config must survive
        let updated = engine
            .update_collection(
                collection.id,
                vec![Attribute::new("total", AttributeType::Integer).indexed(true)],
            )
            .unwrap();
        assert_eq!(updated.attributes[0].config, config);
        assert!(updated.attributes[0].indexed);
    }

    #[test]
    fn test_add_attribute_appends_and_conflicts_on_duplicate() {
        let engine = engine();
        let tenant = engine.create_tenant("acme").unwrap();
        let collection = engine
            .create_collection(
                tenant.id,
                "orders",
                vec![Attribute::new("total", AttributeType::Decimal)],
            )
            .unwrap();

        let added = engine
            .add_attribute(
                collection.id,
                Attribute::new("note", AttributeType::String).indexed(true),
            )
            .unwrap();
        assert_eq!(added.name, "note");

        let loaded = engine.get_collection(collection.id).unwrap();
        assert_eq!(loaded.attributes.len(), 2);

        let err = engine
            .add_attribute(collection.id, Attribute::new("note", AttributeType::String))
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn test_list_clamps_page_size() {
        let engine = Engine::builder()
            .metadata(std::sync::Arc::new(tessera_storage::MemoryMetadataStore::new()))
            .driver(std::sync::Arc::new(tessera_storage::MemoryDriver::new()))
            .limits(Limits::with_small_limits())
            .build()
            .unwrap();
        let tenant = engine.create_tenant("acme").unwrap();
        for i in 0..8 {
            engine
                .create_collection(tenant.id, &format!("c{i}"), vec![])
                .unwrap();
        }
        let page = engine
            .list_collections(tenant.id, PageRequest::of(0, 100))
            .unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 8);
    }
}
