//! Core types and ports for tessera
//!
//! This crate defines the foundational pieces used throughout the system:
//! - Identifier newtypes (TenantId, CollectionId, RecordId)
//! - The schema metadata model (Tenant, Collection, Attribute)
//! - AttributeType: the closed set of logical types
//! - PhysicalType: the descriptor a logical type resolves to
//! - EngineError / ValidationError: the error hierarchy
//! - Naming: deterministic per-tenant namespace and table derivation
//! - Limits: engine-wide size limits
//! - Ports: MetadataStore and StorageDriver trait definitions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod naming;
pub mod physical;
pub mod traits;
pub mod types;

pub use error::{EngineError, Result, ValidationError};
pub use limits::Limits;
pub use physical::PhysicalType;
pub use traits::{MetadataStore, StorageDriver};
pub use types::{
    Attribute, AttributeConfig, AttributeType, Collection, CollectionId, DataRecord, Page,
    PageRequest, Payload, RecordId, Tenant, TenantId,
};
