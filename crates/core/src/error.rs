//! Error types for the schema engine
//!
//! One error enum covers the whole engine surface. Callers can distinguish
//! "your request was invalid" (Conflict / Validation / IllegalArgument) from
//! "requested thing doesn't exist" (ResourceNotFound) from "the engine
//! failed internally" (Storage). We use `thiserror` for `Display`/`Error`
//! implementations.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Field-level validation failure
///
/// Raised by the type registry's validators. Carries the field name, the
/// offending value (rendered), and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed for field '{field}' with value '{value}': {reason}")]
pub struct ValidationError {
    /// Name of the failing field
    pub field: String,
    /// Offending value, rendered to text
    pub value: String,
    /// Human-readable reason
    pub reason: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error types for the schema engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// A uniquely-named resource already exists
    #[error("{resource} with {field} '{value}' already exists")]
    Conflict {
        /// Resource kind ("Tenant", "Collection", ...)
        resource: &'static str,
        /// Conflicting field
        field: &'static str,
        /// Conflicting value
        value: String,
    },

    /// A referenced resource does not exist
    #[error("{resource} with {field} '{value}' not found")]
    ResourceNotFound {
        /// Resource kind ("Tenant", "Collection", "Record", ...)
        resource: &'static str,
        /// Lookup field
        field: &'static str,
        /// Lookup value
        value: String,
    },

    /// Field-level type/constraint failure
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Caller contract violation (bad name, oversized request, ...)
    #[error("illegal argument: {0}")]
    IllegalArgument(String),

    /// Opaque backing-store failure
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Duplicate-name conflict
    pub fn conflict(resource: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        EngineError::Conflict {
            resource,
            field,
            value: value.into(),
        }
    }

    /// Missing-resource error
    pub fn not_found(
        resource: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        EngineError::ResourceNotFound {
            resource,
            field,
            value: value.into(),
        }
    }

    /// Caller contract violation
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        EngineError::IllegalArgument(message.into())
    }

    /// Opaque storage failure
    pub fn storage(message: impl Into<String>) -> Self {
        EngineError::Storage(message.into())
    }

    /// True for duplicate-name conflicts
    pub fn is_conflict(&self) -> bool {
        matches!(self, EngineError::Conflict { .. })
    }

    /// True for missing-resource errors
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::ResourceNotFound { .. })
    }

    /// True for field validation failures
    pub fn is_validation(&self) -> bool {
        matches!(self, EngineError::Validation(_))
    }

    /// True for backing-store failures
    pub fn is_storage(&self) -> bool {
        matches!(self, EngineError::Storage(_))
    }
}
