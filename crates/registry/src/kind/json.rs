//! JSON: semi-structured documents

use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

pub(crate) fn resolve(_config: &AttributeConfig) -> PhysicalType {
    PhysicalType::Jsonb
}

/// Native structured values pass as-is; strings must parse as JSON text.
/// Scalars pass because their textual form is itself valid JSON.
pub(crate) fn validate(
    field: &str,
    value: &Value,
    _config: &AttributeConfig,
) -> Result<(), ValidationError> {
    match value {
        Value::Object(_) | Value::Array(_) | Value::Bool(_) | Value::Number(_) => Ok(()),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(_) => Ok(()),
            Err(_) => Err(ValidationError::new(field, s.clone(), "expected valid JSON")),
        },
        Value::Null => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_is_jsonb() {
        assert_eq!(resolve(&AttributeConfig::new()), PhysicalType::Jsonb);
    }

    #[test]
    fn test_accepts_objects_and_arrays() {
        assert!(validate("f", &json!({"a": 1}), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!([1, 2, 3]), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_accepts_json_text() {
        assert!(validate("f", &json!("{\"a\": 1}"), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("[1, 2]"), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("\"quoted\""), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("42"), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_rejects_malformed_json_text() {
        assert!(validate("f", &json!("{not json"), &AttributeConfig::new()).is_err());
        assert!(validate("f", &json!("plain words"), &AttributeConfig::new()).is_err());
    }

    #[test]
    fn test_accepts_scalars() {
        assert!(validate("f", &json!(42), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!(true), &AttributeConfig::new()).is_ok());
    }
}
