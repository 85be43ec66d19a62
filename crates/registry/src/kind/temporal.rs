//! TEMPORAL: dates, times, and timestamps
//!
//! The physical type is selected by `config.format` ("DATE", "TIME",
//! default timestamp). A string value is accepted if it parses as a full
//! timestamp, a date, or a time, tried in that order; first success wins.

use crate::validate;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use tessera_core::{AttributeConfig, PhysicalType, ValidationError};
use tracing::debug;

pub(crate) fn resolve(config: &AttributeConfig) -> PhysicalType {
    match config.as_str("format").map(str::to_ascii_uppercase).as_deref() {
        Some("DATE") => PhysicalType::Date,
        Some("TIME") => PhysicalType::Time,
        _ => PhysicalType::Timestamp,
    }
}

pub(crate) fn validate(
    field: &str,
    value: &Value,
    _config: &AttributeConfig,
) -> Result<(), ValidationError> {
    let Value::String(s) = value else {
        return Err(ValidationError::new(
            field,
            validate::display_value(value),
            "expected a valid temporal value (ISO-8601)",
        ));
    };

    if s.parse::<NaiveDateTime>().is_ok() {
        return Ok(());
    }
    debug!(value = %s, "not a timestamp, trying date");

    if s.parse::<NaiveDate>().is_ok() {
        return Ok(());
    }
    debug!(value = %s, "not a date, trying time");

    if s.parse::<NaiveTime>().is_ok() {
        return Ok(());
    }

    Err(ValidationError::new(
        field,
        s.clone(),
        "expected a valid temporal value (ISO-8601)",
    ))
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
    fn test_resolve_defaults_to_timestamp() {
        assert_eq!(resolve(&AttributeConfig::new()), PhysicalType::Timestamp);
    }

    #[test]
    fn test_resolve_by_format() {
        assert_eq!(resolve(&cfg(json!({"format": "DATE"}))), PhysicalType::Date);
        assert_eq!(resolve(&cfg(json!({"format": "time"}))), PhysicalType::Time);
        assert_eq!(
            resolve(&cfg(json!({"format": "DATETIME"}))),
            PhysicalType::Timestamp
        );
    }

    #[test]
    fn test_accepts_timestamps() {
        assert!(validate("f", &json!("2024-01-15T10:30:00"), &AttributeConfig::new()).is_ok());
        assert!(validate("f", &json!("2024-01-15T10:30:00.123"), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_accepts_dates() {
        assert!(validate("f", &json!("2024-01-15"), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_accepts_times() {
        assert!(validate("f", &json!("10:30:00"), &AttributeConfig::new()).is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(validate("f", &json!("not-a-date"), &AttributeConfig::new()).is_err());
        assert!(validate("f", &json!("2024-13-45"), &AttributeConfig::new()).is_err());
    }

    #[test]
    fn test_rejects_non_strings() {
        assert!(validate("f", &json!(1700000000), &AttributeConfig::new()).is_err());
        assert!(validate("f", &json!(true), &AttributeConfig::new()).is_err());
    }
}
