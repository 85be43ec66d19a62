//! UUID values

use crate::validate;
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};
use uuid::Uuid;

pub(crate) fn resolve(_config: &AttributeConfig) -> PhysicalType {
    PhysicalType::Uuid
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    _config: &AttributeConfig,
) -> Result<(), ValidationError> {
    match value {
        Value::String(s) if Uuid::parse_str(s).is_ok() => Ok(()),
        _ => Err(ValidationError::new(
            field,
            validate::display_value(value),
            "expected a valid UUID",
        )),
    }
}
