//! Shared validator functions
//!
//! Small composable checks that the per-type modules chain together:
//! required, string length, pattern, numeric range. Each is a pure function
//! `(field, value, config) -> Result<(), ValidationError>`; chains
//! short-circuit on the first failure. A check whose config keys are absent
//! is a no-op; missing config never errors.

use bigdecimal::BigDecimal;
use regex::Regex;
use serde_json::Value;
use std::str::FromStr;
use tessera_core::{AttributeConfig, ValidationError};

/// Render a payload value for error messages
///
/// Strings render raw (no JSON quoting); everything else renders as its
/// JSON text.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric view of a payload value: native number or numeric string
pub(crate) fn decimal_of(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s).ok(),
        _ => None,
    }
}

/// Numeric view of a config entry
fn config_decimal(config: &AttributeConfig, key: &str) -> Option<BigDecimal> {
    match config.get(key)? {
        Value::Number(n) => BigDecimal::from_str(&n.to_string()).ok(),
        Value::String(s) => BigDecimal::from_str(s).ok(),
        _ => None,
    }
}

/// Fail when `config.required` is set and the value is absent or null
pub(crate) fn required(
    field: &str,
    value: Option<&Value>,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    if config.required() && value.map_or(true, Value::is_null) {
        return Err(ValidationError::new(field, "null", "field is required"));
    }
    Ok(())
}

/// Enforce `minLength`/`maxLength` on string values
pub(crate) fn string_length(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let Value::String(s) = value else {
        return Ok(());
    };
    let len = s.chars().count() as i64;

    if let Some(min) = config.as_i64("minLength") {
        if len < min {
            return Err(ValidationError::new(
                field,
                s.clone(),
                format!("length must be >= {min}"),
            ));
        }
    }

    if let Some(max) = config.as_i64("maxLength") {
        if len > max {
            return Err(ValidationError::new(
                field,
                s.clone(),
                format!("length must be <= {max}"),
            ));
        }
    }

    Ok(())
}

/// Enforce `pattern` (full-string regex match) on string values
pub(crate) fn pattern(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let Some(p) = config.as_str("pattern") else {
        return Ok(());
    };
    let Value::String(s) = value else {
        return Ok(());
    };

    let re = Regex::new(&format!("^(?:{p})$")).map_err(|_| {
        ValidationError::new(field, s.clone(), format!("invalid pattern '{p}'"))
    })?;

    if re.is_match(s) {
        Ok(())
    } else {
        Err(ValidationError::new(
            field,
            s.clone(),
            format!("must match pattern '{p}'"),
        ))
    }
}

/// Enforce `min`/`max` on numeric values (native or numeric string)
pub(crate) fn numeric_range(
    field: &str,
    value: &Value,
    config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let Some(actual) = decimal_of(value) else {
        return Ok(());
    };

    if let Some(min) = config_decimal(config, "min") {
        if actual < min {
            return Err(ValidationError::new(
                field,
                display_value(value),
                format!("must be >= {min}"),
            ));
        }
    }

    if let Some(max) = config_decimal(config, "max") {
        if actual > max {
            return Err(ValidationError::new(
                field,
                display_value(value),
                format!("must be <= {max}"),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(v: serde_json::Value) -> AttributeConfig {
        match v {
            Value::Object(map) => AttributeConfig::from_map(map),
            _ => panic!("config fixture must be an object"),
        }
    }

    #[test]
    fn test_required_absent_fails() {
        let cfg = config(json!({"required": true}));
        assert!(required("f", None, &cfg).is_err());
    }

    #[test]
    fn test_required_null_fails() {
        let cfg = config(json!({"required": true}));
        assert!(required("f", Some(&Value::Null), &cfg).is_err());
    }

    #[test]
    fn test_required_present_passes() {
        let cfg = config(json!({"required": true}));
        assert!(required("f", Some(&json!(1)), &cfg).is_ok());
    }

    #[test]
    fn test_not_required_absent_passes() {
        assert!(required("f", None, &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_min_passes_at_boundary() {
        let cfg = config(json!({"min": 10}));
        assert!(numeric_range("f", &json!(10), &cfg).is_ok());
    }

    #[test]
    fn test_min_fails_below() {
        let cfg = config(json!({"min": 10}));
        assert!(numeric_range("f", &json!(5), &cfg).is_err());
    }

    #[test]
    fn test_max_passes_at_boundary() {
        let cfg = config(json!({"max": 100}));
        assert!(numeric_range("f", &json!(100), &cfg).is_ok());
    }

    #[test]
    fn test_max_fails_above() {
        let cfg = config(json!({"max": 100}));
        assert!(numeric_range("f", &json!(200), &cfg).is_err());
    }

    #[test]
    fn test_min_and_max_window() {
        let cfg = config(json!({"min": 10, "max": 100}));
        assert!(numeric_range("f", &json!(50), &cfg).is_ok());
        assert!(numeric_range("f", &json!(5), &cfg).is_err());
        assert!(numeric_range("f", &json!(200), &cfg).is_err());
    }

    #[test]
    fn test_decimal_range() {
        let cfg = config(json!({"min": 1.0, "max": 10.0}));
        assert!(numeric_range("f", &json!(5.5), &cfg).is_ok());
    }

    #[test]
    fn test_range_applies_to_numeric_strings() {
        let cfg = config(json!({"max": 100000}));
        assert!(numeric_range("f", &json!("50000.00"), &cfg).is_ok());
        assert!(numeric_range("f", &json!("150000.00"), &cfg).is_err());
    }

    #[test]
    fn test_no_range_config_passes() {
        assert!(numeric_range("f", &json!(50), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_string_length_window() {
        let cfg = config(json!({"minLength": 2, "maxLength": 4}));
        assert!(string_length("f", &json!("ab"), &cfg).is_ok());
        assert!(string_length("f", &json!("abcd"), &cfg).is_ok());
        assert!(string_length("f", &json!("a"), &cfg).is_err());
        assert!(string_length("f", &json!("abcde"), &cfg).is_err());
    }

    #[test]
    fn test_string_length_counts_chars_not_bytes() {
        let cfg = config(json!({"maxLength": 3}));
        assert!(string_length("f", &json!("héé"), &cfg).is_ok());
    }

    #[test]
    fn test_pattern_full_match() {
        let cfg = config(json!({"pattern": "[a-z]+"}));
        assert!(pattern("f", &json!("abc"), &cfg).is_ok());
        assert!(pattern("f", &json!("abc1"), &cfg).is_err());
    }

    #[test]
    fn test_invalid_pattern_is_a_validation_error() {
        let cfg = config(json!({"pattern": "("}));
        let err = pattern("f", &json!("abc"), &cfg).unwrap_err();
        assert!(err.reason.contains("invalid pattern"));
    }

    #[test]
    fn test_display_value_renders_strings_raw() {
        assert_eq!(display_value(&json!("abc")), "abc");
        assert_eq!(display_value(&json!(3.5)), "3.5");
        assert_eq!(display_value(&json!({"a": 1})), "{\"a\":1}");
    }
}
