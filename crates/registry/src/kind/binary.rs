//! BINARY: byte strings
//!
//! Inside a JSON payload, bytes arrive either Base64-encoded or as an array
//! of integers in 0..=255.

use crate::validate;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

pub(crate) fn resolve(_config: &AttributeConfig) -> PhysicalType {
    PhysicalType::Bytea
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    _config: &AttributeConfig,
) -> Result<(), ValidationError> {
    match value {
        Value::String(s) => match STANDARD.decode(s) {
            Ok(_) => Ok(()),
            Err(_) => Err(ValidationError::new(
                field,
                s.clone(),
                "expected a Base64-encoded binary value",
            )),
        },
        Value::Array(items) if items.iter().all(is_byte) => Ok(()),
        _ => Err(ValidationError::new(
            field,
            validate::display_value(value),
            "expected a Base64-encoded binary value",
        )),
    }
}

fn is_byte(value: &Value) -> bool {
    value.as_u64().is_some_and(|n| n <= 255)
}
