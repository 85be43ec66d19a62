//! Ports consumed by the schema engine
//!
//! Two traits decouple the engine from concrete stores:
//! - [`MetadataStore`]: persistence for tenant and collection metadata rows
//! - [`StorageDriver`]: DDL primitives and record DML against the physical
//!   backing store
//!
//! Swapping implementations (in-memory, SQLite, a networked store) must not
//! require changes in the engine.

use crate::error::Result;
use crate::physical::PhysicalType;
use crate::types::{
    Collection, CollectionId, DataRecord, Page, PageRequest, Payload, RecordId, Tenant, TenantId,
};

/// Metadata persistence port
///
/// Stores Tenant and Collection rows. Uniqueness contracts:
/// - tenant names are globally unique
/// - collection names are unique per tenant
///
/// Implementations must enforce both atomically (an insert that would
/// violate them fails with `Conflict`, never corrupts state).
///
/// Thread safety: all methods must be safe to call concurrently
/// (requires Send + Sync). Serialization of structural changes to a single
/// collection is the engine's job, not the store's.
pub trait MetadataStore: Send + Sync {
    /// Insert a tenant row
    ///
    /// # Errors
    ///
    /// `Conflict` if a tenant with the same name exists; `Storage` on
    /// store failure.
    fn insert_tenant(&self, tenant: &Tenant) -> Result<()>;

    /// Load a tenant by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn tenant_by_id(&self, id: TenantId) -> Result<Option<Tenant>>;

    /// Load a tenant by name
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn tenant_by_name(&self, name: &str) -> Result<Option<Tenant>>;

    /// Delete a tenant row
    ///
    /// Returns true if a row was removed. Does NOT cascade; the engine
    /// deletes owned collections first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn delete_tenant(&self, id: TenantId) -> Result<bool>;

    /// Insert a collection (with its attributes)
    ///
    /// # Errors
    ///
    /// `Conflict` if the (tenant, name) pair is already taken; `Storage` on
    /// store failure.
    fn insert_collection(&self, collection: &Collection) -> Result<()>;

    /// Replace a collection row (attributes included)
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if the collection does not exist; `Storage` on
    /// store failure.
    fn save_collection(&self, collection: &Collection) -> Result<()>;

    /// Delete a collection row, returning true if one was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn delete_collection(&self, id: CollectionId) -> Result<bool>;

    /// Load a collection by id
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn collection_by_id(&self, id: CollectionId) -> Result<Option<Collection>>;

    /// Load a collection by (tenant, name)
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn collection_by_name(&self, tenant_id: TenantId, name: &str) -> Result<Option<Collection>>;

    /// Existence check by (tenant, name)
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn collection_exists(&self, tenant_id: TenantId, name: &str) -> Result<bool>;

    /// Page through a tenant's collections, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the store operation fails.
    fn collections_by_tenant(
        &self,
        tenant_id: TenantId,
        page: PageRequest,
    ) -> Result<Page<Collection>>;
}

/// Physical storage port: DDL primitives plus record DML
///
/// All `ensure_*`/`drop_*` operations are IDEMPOTENT: calling them when the
/// target already exists (or is already gone) is a no-op, not an error.
/// Record operations address rows inside a (namespace, table) previously
/// created through the DDL side.
///
/// Thread safety: all methods must be safe to call concurrently
/// (requires Send + Sync).
pub trait StorageDriver: Send + Sync {
    /// Ensure a tenant namespace exists
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn ensure_namespace(&self, namespace: &str) -> Result<()>;

    /// Drop a tenant namespace and everything inside it
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn drop_namespace(&self, namespace: &str) -> Result<()>;

    /// Ensure a collection table exists inside a namespace
    ///
    /// The table schema carries the generated id, row timestamps, and a
    /// semi-structured payload area for the record data.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace is missing or the storage
    /// operation fails.
    fn ensure_table(&self, namespace: &str, table: &str) -> Result<()>;

    /// Drop a collection table
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn drop_table(&self, namespace: &str, table: &str) -> Result<()>;

    /// Ensure the broad payload index for generic lookups exists
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn ensure_general_index(&self, namespace: &str, table: &str) -> Result<()>;

    /// Ensure a type-aware expression index over one attribute exists
    ///
    /// The index casts the attribute's payload value to `physical` so that
    /// equality and range comparisons use the resolved type, not text.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn ensure_attribute_index(
        &self,
        namespace: &str,
        table: &str,
        attribute: &str,
        physical: &PhysicalType,
    ) -> Result<()>;

    /// Drop an attribute's expression index
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    fn drop_attribute_index(&self, namespace: &str, table: &str, attribute: &str) -> Result<()>;

    /// Insert a record row
    ///
    /// # Errors
    ///
    /// Returns an error if the table is missing or the storage operation
    /// fails.
    fn insert_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
        data: &Payload,
    ) -> Result<DataRecord>;

    /// Replace a record's payload, stamping `updated_at`
    ///
    /// Returns None if no row with that id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is missing or the storage operation
    /// fails.
    fn update_record(
        &self,
        namespace: &str,
        table: &str,
        id: RecordId,
        data: &Payload,
    ) -> Result<Option<DataRecord>>;

    /// Load a record by id
    ///
    /// # Errors
    ///
    /// Returns an error if the table is missing or the storage operation
    /// fails.
    fn fetch_record(&self, namespace: &str, table: &str, id: RecordId)
        -> Result<Option<DataRecord>>;

    /// List a table's records, newest first by insertion time
    ///
    /// # Errors
    ///
    /// Returns an error if the table is missing or the storage operation
    /// fails.
    fn list_records(&self, namespace: &str, table: &str) -> Result<Vec<DataRecord>>;

    /// Delete a record, returning true if a row was removed
    ///
    /// # Errors
    ///
    /// Returns an error if the table is missing or the storage operation
    /// fails.
    fn delete_record(&self, namespace: &str, table: &str, id: RecordId) -> Result<bool>;
}
