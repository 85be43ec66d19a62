//! STRING: bounded or unbounded text

use crate::validate;
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

/// Bounded text iff `maxLength` is configured
pub(crate) fn resolve(config: &AttributeConfig) -> PhysicalType {
    match config.as_u32("maxLength") {
        Some(max) => PhysicalType::VarChar(max),
        None => PhysicalType::Text,
    }
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    if !value.is_string() {
        return Err(ValidationError::new(
            field,
            validate::display_value(value),
            "expected a string value",
        ));
    }

    validate::string_length(field, value, config)?;
    validate::pattern(field, value, config)
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
    fn test_resolve_unbounded() {
        assert_eq!(resolve(&AttributeConfig::new()), PhysicalType::Text);
    }

    #[test]
    fn test_resolve_bounded() {
        assert_eq!(
            resolve(&cfg(json!({"maxLength": 120}))),
            PhysicalType::VarChar(120)
        );
    }

    #[test]
    fn test_accepts_strings() {
        assert!(validate("f", &json!("hello"), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!(""), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_rejects_non_strings() {
        for v in [json!(1), json!(true), json!([1]), json!({"a": 1})] {
            let err = validate("f", &v, &AttributeConfig::new()).unwrap_err();
            assert!(err.reason.contains("expected a string"));
        }
    }

    #[test]
    fn test_length_constraints_compose() {
        let config = cfg(json!({"minLength": 3, "maxLength": 5}));
        assert!(validate("f", &json!("abcd"), &config).is_ok());
        assert!(validate("f", &json!("ab"), &config).is_err());
        assert!(validate("f", &json!("abcdef"), &config).is_err());
    }

    #[test]
    fn test_pattern_constraint_composes() {
        let config = cfg(json!({"pattern": "[A-Z]{2}-\\d+"}));
        assert!(validate("f", &json!("AB-123"), &config).is_ok());
        assert!(validate("f", &json!("ab-123"), &config).is_err());
    }

    #[test]
    fn test_length_checked_before_pattern() {
        let config = cfg(json!({"maxLength": 2, "pattern": "[a-z]+"}));
        let err = validate("f", &json!("abc"), &config).unwrap_err();
        assert!(err.reason.contains("length"));
    }
}
