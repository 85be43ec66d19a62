//! INTEGER: narrow or wide whole numbers

use crate::validate;
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

/// Narrow integer unless the configured range exceeds the 32-bit signed
/// range; both bounds absent means narrow.
pub(crate) fn resolve(config: &AttributeConfig) -> PhysicalType {
    let min = config.as_i64("min");
    let max = config.as_i64("max");
    if fits_in_integer(min, max) {
        PhysicalType::Integer
    } else {
        PhysicalType::BigInt
    }
}

fn fits_in_integer(min: Option<i64>, max: Option<i64>) -> bool {
    if let Some(min) = min {
        if min < i64::from(i32::MIN) {
            return false;
        }
    }
    if let Some(max) = max {
        if max > i64::from(i32::MAX) {
            return false;
        }
    }
    true
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    check_type(field, value)?;
    validate::numeric_range(field, value, config)
}

/// Native integers, integral-valued floats, and integer strings
fn check_type(field: &str, value: &Value) -> Result<(), ValidationError> {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(()),
        Value::Number(n) => {
            let f = n.as_f64().unwrap_or(f64::NAN);
            if f.is_finite() && f.fract() == 0.0 {
                Ok(())
            } else {
                Err(ValidationError::new(
                    field,
                    validate::display_value(value),
                    "expected an integer value (no decimals allowed)",
                ))
            }
        }
        Value::String(s) if s.parse::<i128>().is_ok() => Ok(()),
        _ => Err(ValidationError::new(
            field,
            validate::display_value(value),
            "expected an integer value",
        )),
    }
}
