//! Error types for the heapcache library.
//!
//! Cache operations themselves never fail: misuse is ignored and logged, and
//! numeric degeneracy is clamped. Errors only surface in two places:
//!
//! - [`ConfigError`]: a constructor parameter is out of range (decay factor,
//!   epoch length, model size, n-gram windows).
//! - [`InvariantError`]: a `check_invariants` walk found corrupted heap or
//!   index bookkeeping.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::error::ConfigError;
//! use heapcache::policy::aging_lfu::AgingLfuCache;
//!
//! let cache: Result<AgingLfuCache<String, i32>, ConfigError> = AgingLfuCache::try_new(0.99, 1000);
//! assert!(cache.is_ok());
//!
//! let bad = AgingLfuCache::<String, i32>::try_new(1.5, 1000).unwrap_err();
//! assert_eq!(bad.parameter(), "alpha");
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal heap or index invariants are violated.
///
/// Produced by [`IndexedHeap::check_invariants`](crate::ds::IndexedHeap::check_invariants)
/// and the `check_invariants` method of every cache policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when a cache constructor receives an invalid parameter.
///
/// Carries the parameter name and a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    parameter: &'static str,
    reason: String,
}

impl ConfigError {
    #[inline]
    pub fn new(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self {
            parameter,
            reason: reason.into(),
        }
    }

    /// Name of the rejected constructor parameter.
    #[inline]
    pub fn parameter(&self) -> &'static str {
        self.parameter
    }

    #[inline]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.parameter, self.reason)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
