//! Deterministic physical naming and identifier sanitization
//!
//! Everything here is pure: the lifecycle manager recomputes these names on
//! every operation instead of persisting them. Sanitization maps arbitrary
//! user input onto a safe identifier subset; the composition functions
//! guarantee that no two distinct (tenant, collection) pairs share a
//! physical name.
//!
//! Layout in the backing store:
//! - one namespace (schema) per tenant: `tenant_<32-hex tenant id>`
//! - one table per collection inside that namespace: `<8-hex prefix>_<name>`
//!
//! The schema embeds the full tenant id, so namespaces are collision-free;
//! collection names are unique per tenant, so tables are collision-free
//! within their namespace.

use crate::error::{EngineError, Result};
use crate::types::TenantId;

/// Maximum length of a generated identifier, in bytes
///
/// Matches the common backing-store limit for identifiers.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Sanitize a collection name to a safe physical identifier
///
/// Lowercases, collapses whitespace/hyphen runs to underscores, strips
/// everything outside `[a-z0-9_]`, prefixes `tbl_` when the result does not
/// start with a letter, and truncates to [`MAX_IDENTIFIER_LENGTH`].
/// Deterministic: the same input always yields the same output.
///
/// # Errors
///
/// Returns `IllegalArgument` when the input is empty or whitespace-only.
pub fn sanitize_collection_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::illegal_argument(
            "collection name cannot be empty",
        ));
    }

    let mut sanitized = String::with_capacity(trimmed.len());
    let mut pending_separator = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_separator = !sanitized.is_empty() || pending_separator;
            continue;
        }
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            if pending_separator {
                sanitized.push('_');
                pending_separator = false;
            }
            sanitized.push(ch);
        }
    }

    if !sanitized.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        sanitized.insert_str(0, "tbl_");
    }
    sanitized.truncate(MAX_IDENTIFIER_LENGTH);

    Ok(sanitized)
}

/// Sanitize an attribute name to a safe physical identifier
///
/// Strips everything outside `[A-Za-z0-9_]` (case is preserved) and
/// prefixes `attr_` when the result does not start with a letter.
///
/// # Errors
///
/// Returns `IllegalArgument` when the input is empty or whitespace-only.
pub fn sanitize_attribute_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(EngineError::illegal_argument(
            "attribute name cannot be empty",
        ));
    }

    let sanitized: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    let sanitized = if sanitized.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        sanitized
    } else {
        format!("attr_{sanitized}")
    };

    Ok(sanitized)
}

/// Namespace (schema) for a tenant: `tenant_<32-hex id>`
pub fn schema_name(tenant_id: TenantId) -> String {
    format!("tenant_{}", tenant_id.simple())
}

/// Physical table name for a collection: `<8-hex tenant prefix>_<name>`
///
/// The collection name is sanitized first, so callers may pass raw input.
///
/// # Errors
///
/// Returns `IllegalArgument` when the collection name sanitizes to empty.
pub fn table_name(tenant_id: TenantId, collection_name: &str) -> Result<String> {
    let sanitized = sanitize_collection_name(collection_name)?;
    let simple = tenant_id.simple();
    Ok(format!("{}_{}", &simple[..8], sanitized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_collection_lowercases() {
        assert_eq!(sanitize_collection_name("Orders").unwrap(), "orders");
    }

    #[test]
    fn test_sanitize_collection_maps_spaces_and_hyphens() {
        assert_eq!(
            sanitize_collection_name("My Order-Lines").unwrap(),
            "my_order_lines"
        );
        assert_eq!(
            sanitize_collection_name("a  -  b").unwrap(),
            "a_b"
        );
    }

    #[test]
    fn test_sanitize_collection_strips_unsafe_characters() {
        assert_eq!(
            sanitize_collection_name("orders; DROP TABLE x").unwrap(),
            "orders_drop_table_x"
        );
        assert_eq!(sanitize_collection_name("café").unwrap(), "caf");
    }

    #[test]
    fn test_sanitize_collection_prefixes_non_letter_start() {
        assert_eq!(sanitize_collection_name("123abc").unwrap(), "tbl_123abc");
        assert_eq!(sanitize_collection_name("_x").unwrap(), "tbl__x");
    }

    #[test]
    fn test_sanitize_collection_truncates() {
        let long = "a".repeat(100);
        let out = sanitize_collection_name(&long).unwrap();
        assert_eq!(out.len(), MAX_IDENTIFIER_LENGTH);
    }

    #[test]
    fn test_sanitize_collection_rejects_empty() {
        assert!(sanitize_collection_name("").is_err());
        assert!(sanitize_collection_name("   ").is_err());
    }

    #[test]
    fn test_sanitize_attribute_preserves_case() {
        assert_eq!(sanitize_attribute_name("userName").unwrap(), "userName");
    }

    #[test]
    fn test_sanitize_attribute_strips_unsafe_characters() {
        assert_eq!(sanitize_attribute_name("a.b c").unwrap(), "abc");
    }

    #[test]
    fn test_sanitize_attribute_prefixes_non_letter_start() {
        assert_eq!(sanitize_attribute_name("1st").unwrap(), "attr_1st");
        assert_eq!(sanitize_attribute_name("_x").unwrap(), "attr__x");
    }

    #[test]
    fn test_sanitize_attribute_rejects_empty() {
        assert!(sanitize_attribute_name("").is_err());
        assert!(sanitize_attribute_name(" \t ").is_err());
    }

    #[test]
    fn test_schema_name_embeds_full_tenant_id() {
        let tenant = TenantId::new();
        let schema = schema_name(tenant);
        assert!(schema.starts_with("tenant_"));
        assert!(schema.ends_with(&tenant.simple()));
    }

    #[test]
    fn test_table_name_composition() {
        let tenant = TenantId::new();
        let table = table_name(tenant, "Orders").unwrap();
        assert_eq!(table, format!("{}_orders", &tenant.simple()[..8]));
    }

    #[test]
    fn test_distinct_tenants_get_distinct_schemas() {
        assert_ne!(schema_name(TenantId::new()), schema_name(TenantId::new()));
    }

    proptest! {
        #[test]
        fn prop_sanitize_collection_is_deterministic(name in ".{1,80}") {
            let a = sanitize_collection_name(&name);
            let b = sanitize_collection_name(&name);
            match (a, b) {
                (Ok(x), Ok(y)) => prop_assert_eq!(x, y),
                (Err(_), Err(_)) => {}
                _ => prop_assert!(false, "determinism violated"),
            }
        }

        #[test]
        fn prop_sanitize_collection_is_idempotent(name in ".{1,80}") {
            if let Ok(once) = sanitize_collection_name(&name) {
                let twice = sanitize_collection_name(&once).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        #[test]
        fn prop_sanitized_collection_charset(name in ".{1,80}") {
            if let Ok(out) = sanitize_collection_name(&name) {
                prop_assert!(out.len() <= MAX_IDENTIFIER_LENGTH);
                prop_assert!(out
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'));
            }
        }

        #[test]
        fn prop_sanitized_attribute_charset(name in ".{1,80}") {
            if let Ok(out) = sanitize_attribute_name(&name) {
                prop_assert!(out
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_'));
            }
        }
    }
}
