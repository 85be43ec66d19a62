//! BOOLEAN: native booleans and "true"/"false" strings only

use crate::validate;
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

pub(crate) fn resolve(_config: &AttributeConfig) -> PhysicalType {
    PhysicalType::Boolean
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    _config: &AttributeConfig,
) -> Result<(), ValidationError> {
    match value {
        Value::Bool(_) => Ok(()),
        Value::String(s) if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") => {
            Ok(())
        }
        _ => Err(ValidationError::new(
            field,
            validate::display_value(value),
            "must be a valid boolean value",
        )),
    }
}
