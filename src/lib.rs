//! Tessera - multi-tenant schema-as-data engine
//!
//! Tenants define record types ("collections") with typed attributes at
//! runtime. The engine keeps the backing store's structure (namespaces,
//! tables, indexes) synchronized with that schema, validates every record
//! write against the current attribute set, and resolves each logical
//! attribute type to a physical storage type and index strategy.
//!
//! # Quick Start
//!
//! ```
//! use tessera::{Attribute, AttributeConfig, AttributeType, Engine};
//! use serde_json::json;
//!
//! // Ephemeral engine over the in-memory stores
//! let engine = Engine::in_memory();
//!
//! let tenant = engine.create_tenant("acme")?;
//! engine.create_collection(
//!     tenant.id,
//!     "invoices",
//!     vec![Attribute::new("amount", AttributeType::Decimal)
//!         .indexed(true)
//!         .with_config(AttributeConfig::new().with("required", true).with("max", 100000))],
//! )?;
//!
//! let record = engine.create_record(
//!     tenant.id,
//!     "invoices",
//!     json!({"amount": "50000.00"}).as_object().unwrap().clone(),
//! )?;
//! assert_eq!(record.data["amount"], json!("50000.00"));
//! # Ok::<(), tessera::EngineError>(())
//! ```
//!
//! # Architecture
//!
//! The [`Engine`] orchestrates two ports: a [`MetadataStore`] for tenant
//! and collection rows, and a [`StorageDriver`] for DDL and record DML
//! against the physical store. In-memory implementations back
//! [`Engine::in_memory`]; [`SqliteStore`] implements both durably. The
//! type registry and naming rules are pure and store-agnostic.

pub use tessera_core::{
    naming, Attribute, AttributeConfig, AttributeType, Collection, CollectionId, DataRecord,
    EngineError, Limits, MetadataStore, Page, PageRequest, Payload, PhysicalType, RecordId,
    Result, StorageDriver, Tenant, TenantId, ValidationError,
};
pub use tessera_engine::{
    diff_attributes, AttributeChange, AttributeDiff, Engine, EngineBuilder, EventSink,
    LifecycleEvent,
};
pub use tessera_registry::TypeRegistry;
pub use tessera_storage::{MemoryDriver, MemoryMetadataStore};
pub use tessera_store_sqlite::{SqliteConfig, SqliteStore};
