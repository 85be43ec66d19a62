//! Physical type descriptors
//!
//! A logical [`AttributeType`](crate::types::AttributeType) resolves, via the
//! type registry and the attribute's config, to one of these concrete
//! storage types. Storage drivers map the descriptor onto whatever their
//! engine actually supports (column types, index cast expressions).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Concrete storage type a logical attribute type resolves to
///
/// The set is closed: drivers match exhaustively so a new physical type
/// cannot be added without teaching every driver about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhysicalType {
    /// Unbounded text
    Text,
    /// Bounded text with a maximum length
    VarChar(u32),
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    BigInt,
    /// Arbitrary-precision numeric
    Numeric,
    /// Boolean
    Boolean,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Date and time
    Timestamp,
    /// Semi-structured document
    Jsonb,
    /// UUID
    Uuid,
    /// Byte string
    Bytea,
}

impl fmt::Display for PhysicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalType::Text => f.write_str("text"),
            PhysicalType::VarChar(len) => write!(f, "varchar({len})"),
            PhysicalType::Integer => f.write_str("integer"),
            PhysicalType::BigInt => f.write_str("bigint"),
            PhysicalType::Numeric => f.write_str("numeric"),
            PhysicalType::Boolean => f.write_str("boolean"),
            PhysicalType::Date => f.write_str("date"),
            PhysicalType::Time => f.write_str("time"),
            PhysicalType::Timestamp => f.write_str("timestamp"),
            PhysicalType::Jsonb => f.write_str("jsonb"),
            PhysicalType::Uuid => f.write_str("uuid"),
            PhysicalType::Bytea => f.write_str("bytea"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(PhysicalType::Text.to_string(), "text");
        assert_eq!(PhysicalType::VarChar(255).to_string(), "varchar(255)");
        assert_eq!(PhysicalType::BigInt.to_string(), "bigint");
        assert_eq!(PhysicalType::Jsonb.to_string(), "jsonb");
    }

    #[test]
    fn test_descriptor_equality_includes_length() {
        assert_ne!(PhysicalType::VarChar(10), PhysicalType::VarChar(20));
        assert_eq!(PhysicalType::VarChar(10), PhysicalType::VarChar(10));
    }
}
