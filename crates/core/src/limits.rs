//! Size limits enforced by the engine
//!
//! Violations surface as `IllegalArgument`: the request itself is out of
//! contract, independent of any per-field validation.

/// Engine-wide size limits
///
/// Custom limits can be supplied when building an engine; the defaults are
/// what production deployments run with.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum attributes per collection (default: 256)
    pub max_attributes: usize,

    /// Maximum serialized record payload size in bytes (default: 1MB)
    pub max_payload_bytes: usize,

    /// Maximum page size for listing operations (default: 200)
    pub max_page_size: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_attributes: 256,
            max_payload_bytes: 1024 * 1024, // 1MB
            max_page_size: 200,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    ///
    /// Useful for unit tests that exercise limit enforcement without
    /// building large inputs.
    pub fn with_small_limits() -> Self {
        Limits {
            max_attributes: 4,
            max_payload_bytes: 256,
            max_page_size: 5,
        }
    }

    /// Clamp a requested page size against `max_page_size`
    pub fn clamp_page_size(&self, per_page: u32) -> u32 {
        per_page.min(self.max_page_size).max(1)
    }
}
