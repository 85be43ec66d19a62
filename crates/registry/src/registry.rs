//! Type registry: dispatch over the closed attribute-type set
//!
//! Maps a logical [`AttributeType`] to its physical-type resolver and its
//! validator chain. Dispatch is an exhaustive `match`, so adding a variant
//! to the enum cannot compile until every arm exists.

use crate::{kind, validate};
use serde_json::Value;
use tessera_core::{AttributeConfig, AttributeType, PhysicalType, ValidationError};

/// Stateless registry of type definitions
///
/// Both operations are pure: the registry holds no configuration and is
/// freely shareable.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeRegistry;

impl TypeRegistry {
    /// Create a registry
    pub fn new() -> Self {
        TypeRegistry
    }

    /// Resolve a logical type plus config to its physical storage type
    pub fn resolve_physical_type(
        &self,
        data_type: AttributeType,
        config: &AttributeConfig,
    ) -> PhysicalType {
        match data_type {
            AttributeType::String => kind::string::resolve(config),
            AttributeType::Integer => kind::integer::resolve(config),
            AttributeType::Decimal => kind::decimal::resolve(config),
            AttributeType::Boolean => kind::boolean::resolve(config),
            AttributeType::Temporal => kind::temporal::resolve(config),
            AttributeType::Json => kind::json::resolve(config),
            AttributeType::Uuid => kind::uuid::resolve(config),
            AttributeType::Binary => kind::binary::resolve(config),
        }
    }

    /// Validate one field against its attribute's type and config
    ///
    /// `value` is None when the field is absent from the payload. The
    /// required check runs first; an absent or null value that isn't
    /// required passes without reaching the type chain.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's [`ValidationError`].
    pub fn validate(
        &self,
        data_type: AttributeType,
        field: &str,
        value: Option<&Value>,
        config: &AttributeConfig,
    ) -> Result<(), ValidationError> {
        validate::required(field, value, config)?;

        let Some(value) = value else {
            return Ok(());
        };
        if value.is_null() {
            return Ok(());
        }

        match data_type {
            AttributeType::String => kind::string::validate(field, value, config),
            AttributeType::Integer => kind::integer::validate(field, value, config),
            AttributeType::Decimal => kind::decimal::validate(field, value, config),
            AttributeType::Boolean => kind::boolean::validate(field, value, config),
            AttributeType::Temporal => kind::temporal::validate(field, value, config),
            AttributeType::Json => kind::json::validate(field, value, config),
            AttributeType::Uuid => kind::uuid::validate(field, value, config),
            AttributeType::Binary => kind::binary::validate(field, value, config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cfg(v: serde_json::Value) -> AttributeConfig {
        match v {
            Value::Object(map) => AttributeConfig::from_map(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_every_type_resolves_with_empty_config() {
        let registry = TypeRegistry::new();
        let empty = AttributeConfig::new();
        let expected = [
            (AttributeType::String, PhysicalType::Text),
            (AttributeType::Integer, PhysicalType::Integer),
            (AttributeType::Decimal, PhysicalType::Numeric),
            (AttributeType::Boolean, PhysicalType::Boolean),
            (AttributeType::Temporal, PhysicalType::Timestamp),
            (AttributeType::Json, PhysicalType::Jsonb),
            (AttributeType::Uuid, PhysicalType::Uuid),
            (AttributeType::Binary, PhysicalType::Bytea),
        ];
        for (logical, physical) in expected {
            assert_eq!(registry.resolve_physical_type(logical, &empty), physical);
        }
    }

    #[test]
    fn test_config_steers_resolution() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve_physical_type(AttributeType::String, &cfg(json!({"maxLength": 40}))),
            PhysicalType::VarChar(40)
        );
        assert_eq!(
            registry.resolve_physical_type(
                AttributeType::Integer,
                &cfg(json!({"max": 10_000_000_000i64}))
            ),
            PhysicalType::BigInt
        );
        assert_eq!(
            registry.resolve_physical_type(AttributeType::Temporal, &cfg(json!({"format": "DATE"}))),
            PhysicalType::Date
        );
    }

    #[test]
    fn test_required_absent_fails_for_every_type() {
        let registry = TypeRegistry::new();
        let config = cfg(json!({"required": true}));
        for ty in AttributeType::ALL {
            let err = registry.validate(ty, "f", None, &config).unwrap_err();
            assert!(err.reason.contains("required"), "{ty}: {err}");
        }
    }

    #[test]
    fn test_optional_absent_passes_for_every_type() {
        let registry = TypeRegistry::new();
        let empty = AttributeConfig::new();
        for ty in AttributeType::ALL {
            assert!(registry.validate(ty, "f", None, &empty).is_ok());
            assert!(registry.validate(ty, "f", Some(&Value::Null), &empty).is_ok());
        }
    }

    #[test]
    fn test_integer_acceptance_matrix() {
        let registry = TypeRegistry::new();
        let empty = AttributeConfig::new();
        for ok in [json!(42), json!("12345"), json!(10.0)] {
            assert!(
                registry
                    .validate(AttributeType::Integer, "f", Some(&ok), &empty)
                    .is_ok(),
                "{ok} should pass"
            );
        }
        for bad in [json!(3.5), json!("abc")] {
            assert!(
                registry
                    .validate(AttributeType::Integer, "f", Some(&bad), &empty)
                    .is_err(),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn test_decimal_range_via_registry() {
        let registry = TypeRegistry::new();
        let config = cfg(json!({"max": 100}));
        assert!(registry
            .validate(AttributeType::Decimal, "f", Some(&json!(50)), &config)
            .is_ok());
        assert!(registry
            .validate(AttributeType::Decimal, "f", Some(&json!(200)), &config)
            .is_err());
    }

    #[test]
    fn test_validation_error_carries_field_name() {
        let registry = TypeRegistry::new();
        let err = registry
            .validate(
                AttributeType::Boolean,
                "active",
                Some(&json!("maybe")),
                &AttributeConfig::new(),
            )
            .unwrap_err();
        assert_eq!(err.field, "active");
        assert_eq!(err.value, "maybe");
    }
}
