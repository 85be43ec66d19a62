//! Engine struct, builder, and shared lookups
//!
//! The [`Engine`] is the single entry point callers hold. It owns the two
//! ports (metadata store, storage driver), the stateless type registry, the
//! per-collection lock registry, the event sinks, and the size limits.
//! Operations are defined across `tenants.rs`, `collections.rs`, and
//! `records.rs`; this module provides construction and the lookup helpers
//! they share.

use crate::events::{EventSink, LifecycleEvent};
use crate::locks::CollectionLocks;
use std::sync::Arc;
use tessera_core::{
    Collection, CollectionId, EngineError, Limits, MetadataStore, Result, StorageDriver, Tenant,
    TenantId,
};
use tessera_registry::TypeRegistry;
use tessera_storage::{MemoryDriver, MemoryMetadataStore};

/// Multi-tenant schema-as-data engine
///
/// Thread safe: operations may run concurrently from any number of threads.
/// Structural changes to the same collection are serialized internally;
/// everything else proceeds in parallel.
///
/// # Example
///
/// ```
/// use tessera_engine::Engine;
/// use tessera_core::{Attribute, AttributeType};
///
/// let engine = Engine::in_memory();
/// let tenant = engine.create_tenant("acme")?;
/// let collection = engine.create_collection(
///     tenant.id,
///     "orders",
///     vec![Attribute::new("total", AttributeType::Decimal).indexed(true)],
/// )?;
/// assert_eq!(collection.name, "orders");
/// # Ok::<(), tessera_core::EngineError>(())
/// ```
pub struct Engine {
    pub(crate) metadata: Arc<dyn MetadataStore>,
    pub(crate) driver: Arc<dyn StorageDriver>,
    pub(crate) registry: TypeRegistry,
    pub(crate) locks: CollectionLocks,
    pub(crate) sinks: Vec<Arc<dyn EventSink>>,
    pub(crate) limits: Limits,
}

impl Engine {
    /// Start building an engine over explicit port implementations
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Ephemeral engine over the in-memory stores
    ///
    /// Everything lives in process memory; nothing survives a restart.
    pub fn in_memory() -> Self {
        Engine {
            metadata: Arc::new(MemoryMetadataStore::new()),
            driver: Arc::new(MemoryDriver::new()),
            registry: TypeRegistry::new(),
            locks: CollectionLocks::default(),
            sinks: Vec::new(),
            limits: Limits::default(),
        }
    }

    /// The configured limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub(crate) fn require_tenant(&self, id: TenantId) -> Result<Tenant> {
        self.metadata
            .tenant_by_id(id)?
            .ok_or_else(|| EngineError::not_found("Tenant", "id", id.to_string()))
    }

    pub(crate) fn require_collection(&self, id: CollectionId) -> Result<Collection> {
        self.metadata
            .collection_by_id(id)?
            .ok_or_else(|| EngineError::not_found("Collection", "id", id.to_string()))
    }

    pub(crate) fn publish(&self, event: LifecycleEvent) {
        for sink in &self.sinks {
            sink.publish(&event);
        }
    }
}

/// Builder for [`Engine`]
#[derive(Default)]
pub struct EngineBuilder {
    metadata: Option<Arc<dyn MetadataStore>>,
    driver: Option<Arc<dyn StorageDriver>>,
    limits: Option<Limits>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl EngineBuilder {
    /// Metadata persistence port
    pub fn metadata(mut self, metadata: Arc<dyn MetadataStore>) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Physical storage port
    pub fn driver(mut self, driver: Arc<dyn StorageDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Override the default limits
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Register a lifecycle event sink
    pub fn sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Assemble the engine
    ///
    /// # Errors
    ///
    /// `IllegalArgument` if either port is missing.
    pub fn build(self) -> Result<Engine> {
        let metadata = self
            .metadata
            .ok_or_else(|| EngineError::illegal_argument("metadata store is required"))?;
        let driver = self
            .driver
            .ok_or_else(|| EngineError::illegal_argument("storage driver is required"))?;

        Ok(Engine {
            metadata,
            driver,
            registry: TypeRegistry::new(),
            locks: CollectionLocks::default(),
            sinks: self.sinks,
            limits: self.limits.unwrap_or_default(),
        })
    }
}
