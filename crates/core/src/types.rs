//! Core types for the tessera schema engine
//!
//! This module defines the foundational metadata types:
//! - TenantId / CollectionId / RecordId: identifier newtypes
//! - Tenant: identity plus a dedicated storage namespace
//! - AttributeType: the closed set of logical attribute types
//! - AttributeConfig: free-form per-attribute constraint map
//! - Attribute / Collection: the user-defined schema
//! - DataRecord: a stored row in a collection's physical table
//! - Page / PageRequest: pagination for listing operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Untyped field -> value payload of a record write
pub type Payload = serde_json::Map<String, Value>;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random identifier (UUID v4)
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Parse from a string representation
            ///
            /// Accepts standard UUID format (with or without hyphens).
            /// Returns None if the string is not a valid UUID.
            pub fn parse_str(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }

            /// The underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Hyphen-free lowercase hex form, used for physical naming
            pub fn simple(&self) -> String {
                self.0.simple().to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Unique identifier for a tenant
    TenantId
);
id_newtype!(
    /// Unique identifier for a collection
    CollectionId
);
id_newtype!(
    /// Unique identifier for a data record
    ///
    /// Generated by the engine on insert, never reused.
    RecordId
);

/// A tenant: identity plus a dedicated namespace in the backing store
///
/// The namespace is derived deterministically from the id (see
/// [`crate::naming::schema_name`]) and is immutable for the tenant's
/// lifetime. Deleting a tenant cascades to all owned collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant identifier
    pub id: TenantId,
    /// Unique tenant name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Tenant {
    /// Create a new tenant with a fresh id
    pub fn new(name: impl Into<String>) -> Self {
        Tenant {
            id: TenantId::new(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Logical attribute types
///
/// This enum is CLOSED: every variant must be handled exhaustively by the
/// type registry, and adding a variant is a breaking change to the schema
/// model. The wire names are the SCREAMING_SNAKE_CASE forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttributeType {
    /// UTF-8 text, bounded or unbounded
    String,
    /// Whole numbers (narrow or wide physical type by configured range)
    Integer,
    /// Arbitrary-precision decimal numbers
    Decimal,
    /// True/false
    Boolean,
    /// Date, time, or timestamp (selected by `config.format`)
    Temporal,
    /// Semi-structured JSON documents
    Json,
    /// UUID values
    Uuid,
    /// Byte strings (Base64 on the wire)
    Binary,
}

impl AttributeType {
    /// All attribute types, in declaration order
    pub const ALL: [AttributeType; 8] = [
        AttributeType::String,
        AttributeType::Integer,
        AttributeType::Decimal,
        AttributeType::Boolean,
        AttributeType::Temporal,
        AttributeType::Json,
        AttributeType::Uuid,
        AttributeType::Binary,
    ];

    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "STRING",
            AttributeType::Integer => "INTEGER",
            AttributeType::Decimal => "DECIMAL",
            AttributeType::Boolean => "BOOLEAN",
            AttributeType::Temporal => "TEMPORAL",
            AttributeType::Json => "JSON",
            AttributeType::Uuid => "UUID",
            AttributeType::Binary => "BINARY",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STRING" => Ok(AttributeType::String),
            "INTEGER" => Ok(AttributeType::Integer),
            "DECIMAL" => Ok(AttributeType::Decimal),
            "BOOLEAN" => Ok(AttributeType::Boolean),
            "TEMPORAL" => Ok(AttributeType::Temporal),
            "JSON" => Ok(AttributeType::Json),
            "UUID" => Ok(AttributeType::Uuid),
            "BINARY" => Ok(AttributeType::Binary),
            other => Err(format!("unknown attribute type '{other}'")),
        }
    }
}

/// Free-form, type-specific attribute constraints
///
/// Carries keys like `minLength`, `maxLength`, `pattern`, `min`, `max`,
/// `precision`, `scale`, `format`, `required`. An empty config means
/// "no extra constraints": consumers must treat missing keys as absent
/// constraints, never as errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeConfig(serde_json::Map<String, Value>);

impl AttributeConfig {
    /// Empty config (no constraints)
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON map
    pub fn from_map(map: serde_json::Map<String, Value>) -> Self {
        AttributeConfig(map)
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// True if no constraints are configured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Integer view of a key, truncating floats the way a `Number` would
    pub fn as_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            _ => None,
        }
    }

    /// Unsigned view of a key (for counts like `precision`/`scale`)
    pub fn as_u32(&self, key: &str) -> Option<u32> {
        self.as_i64(key).and_then(|v| u32::try_from(v).ok())
    }

    /// String view of a key
    pub fn as_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Boolean view of a key
    pub fn as_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    /// Whether the `required` flag is set
    pub fn required(&self) -> bool {
        self.as_bool("required").unwrap_or(false)
    }
}

/// A typed field definition belonging to a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Sanitized attribute name, unique within the collection
    pub name: String,
    /// Logical data type
    pub data_type: AttributeType,
    /// Whether a physical index must exist for this attribute
    pub indexed: bool,
    /// Type-specific constraints
    #[serde(default)]
    pub config: AttributeConfig,
}

impl Attribute {
    /// New unindexed attribute with an empty config
    pub fn new(name: impl Into<String>, data_type: AttributeType) -> Self {
        Attribute {
            name: name.into(),
            data_type,
            indexed: false,
            config: AttributeConfig::new(),
        }
    }

    /// Builder-style index flag
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Builder-style config replacement
    pub fn with_config(mut self, config: AttributeConfig) -> Self {
        self.config = config;
        self
    }
}

/// A tenant-scoped, user-defined record type
///
/// Invariant: whenever a collection's metadata row exists, its physical
/// table exists in the backing store. Lifecycle operations preserve this
/// by ordering DDL and metadata writes (see the engine crate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Collection identifier
    pub id: CollectionId,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Sanitized, tenant-unique name
    pub name: String,
    /// Ordered attribute set (names unique within the collection)
    pub attributes: Vec<Attribute>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last structural modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Collection {
    /// Create a new collection with a fresh id
    pub fn new(tenant_id: TenantId, name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        let now = Utc::now();
        Collection {
            id: CollectionId::new(),
            tenant_id,
            name: name.into(),
            attributes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up an attribute by name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// A stored record: generated identifier plus the untyped payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Record identifier
    pub id: RecordId,
    /// Field -> value payload as written
    pub data: Payload,
    /// Insertion timestamp
    pub created_at: DateTime<Utc>,
    /// Last write timestamp
    pub updated_at: DateTime<Utc>,
}

/// Pagination request for listing operations
///
/// Pages are zero-based. `per_page` is clamped by the engine against
/// [`crate::limits::Limits::max_page_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl PageRequest {
    /// First page with the given size
    pub fn of(page: u32, per_page: u32) -> Self {
        PageRequest { page, per_page }
    }

    /// Item offset of this page
    pub fn offset(&self) -> usize {
        self.page as usize * self.per_page as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 0,
            per_page: 50,
        }
    }
}

/// One page of results plus the total item count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Zero-based page number
    pub page: u32,
    /// Requested page size
    pub per_page: u32,
    /// Total items across all pages
    pub total: u64,
}

impl<T> Page<T> {
    /// Assemble a page
    pub fn new(items: Vec<T>, request: PageRequest, total: u64) -> Self {
        Page {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if this page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
