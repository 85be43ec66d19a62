//! DECIMAL: arbitrary-precision numerics

use crate::validate;
use bigdecimal::BigDecimal;
use serde_json::Value;
use std::str::FromStr;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};

pub(crate) fn resolve(_config: &AttributeConfig) -> PhysicalType {
    PhysicalType::Numeric
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let decimal = to_decimal(field, value)?;
    check_precision_scale(field, value, &decimal, config)?;
    validate::numeric_range(field, value, config)
}

fn to_decimal(field: &str, value: &Value) -> Result<BigDecimal, ValidationError> {
    let parsed = match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s).ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ValidationError::new(
            field,
            validate::display_value(value),
            "expected a decimal value",
        )
    })
}

/// Precision and scale checks operate on the value after removing trailing
/// fractional zeros; the fractional digit count floors at zero.
fn check_precision_scale(
    field: &str,
    value: &Value,
    decimal: &BigDecimal,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let stripped = decimal.clone().normalized();

    if let Some(precision) = config.as_u32("precision") {
        if stripped.digits() > u64::from(precision) {
            return Err(ValidationError::new(
                field,
                validate::display_value(value),
                format!("precision must be <= {precision}"),
            ));
        }
    }

    if let Some(scale) = config.as_u32("scale") {
        let actual_scale = stripped.fractional_digit_count().max(0);
        if actual_scale > i64::from(scale) {
            return Err(ValidationError::new(
                field,
                validate::display_value(value),
                format!("scale must be <= {scale}"),
            ));
        }
    }

    Ok(())
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
    fn test_resolve_is_numeric() {
        assert_eq!(resolve(&AttributeConfig::new()), PhysicalType::Numeric);
    }

    #[test]
    fn test_accepts_numbers_and_numeric_strings() {
        assert!(validate("f", &json!(1.5), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!(42), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("123.45"), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("-0.001"), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(validate("f", &json!("abc"), &AttributeConfig::new()).is_err());
        assert!(validate("f", &json!(true), &AttributeConfig::new()).is_err());
        assert!(validate("f", &json!({"a": 1}), &AttributeConfig::new()).is_err());
    }

    #[test]
    fn test_scale_enforced_after_stripping_trailing_zeros() {
        let config = cfg(json!({"scale": 2}));
        assert!(validate("f", &json!(123.45), &config).is_ok());
        assert!(validate("f", &json!(123.456), &config).is_err());
        // Trailing zeros don't count against scale
        assert!(validate("f", &json!("123.4500"), &config).is_ok());
    }

    #[test]
    fn test_precision_counts_significant_digits() {
        let config = cfg(json!({"precision": 3}));
        assert!(validate("f", &json!(123), &config).is_ok());
        assert!(validate("f", &json!(12345.67), &config).is_err());
        // 200 strips to 2e2: one significant digit
        assert!(validate("f", &json!(200), &config).is_ok());
    }

    #[test]
    fn test_range_composes() {
        let config = cfg(json!({"max": 100}));
        assert!(validate("f", &json!(50), &config).is_ok());
        assert!(validate("f", &json!(200), &config).is_err());
    }

    #[test]
    fn test_integer_values_have_zero_scale() {
        let config = cfg(json!({"scale": 0}));
        assert!(validate("f", &json!(500), &config).is_ok());
        assert!(validate("f", &json!(5.1), &config).is_err());
    }
}
