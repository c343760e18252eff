//! Error types for the hotspot library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when tracker configuration parameters are
//!   invalid (zero `top_n`, zero shard count, zero refresh interval).
//! - [`TrackerError`]: Lifecycle failures of a tracker (configuration,
//!   refresher thread spawn, double close).
//! - [`InvariantError`]: Returned when internal data-structure invariants are
//!   violated (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use hotspot::error::ConfigError;
//! use hotspot::HotspotTracker;
//!
//! let tracker: Result<HotspotTracker<String>, ConfigError> = HotspotTracker::new(10, 4);
//! assert!(tracker.is_ok());
//!
//! // Zero top_n is rejected instead of producing a tracker that stores nothing
//! let bad = HotspotTracker::<String>::new(0, 4);
//! assert_eq!(bad.unwrap_err(), ConfigError::ZeroTopN);
//! ```

use std::io;
use std::time::Duration;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when tracker configuration parameters are invalid.
///
/// Produced by [`HotspotTracker::new`](crate::HotspotTracker::new),
/// [`HotspotTracker::with_cache`](crate::HotspotTracker::with_cache) and
/// [`TrackerBuilder::try_build`](crate::builder::TrackerBuilder::try_build).
///
/// # Example
///
/// ```
/// use hotspot::error::ConfigError;
/// use hotspot::HotspotTracker;
///
/// let err = HotspotTracker::<u64>::new(8, 0).unwrap_err();
/// assert!(err.to_string().contains("shard_count"));
/// assert_eq!(err, ConfigError::ZeroShardCount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `top_n` was zero.
    #[error("top_n must be > 0")]
    ZeroTopN,
    /// `shard_count` was zero.
    #[error("shard_count must be > 0")]
    ZeroShardCount,
    /// The snapshot refresh interval was zero.
    #[error("refresh interval must be > 0, got {0:?}")]
    ZeroRefreshInterval(Duration),
}

// ---------------------------------------------------------------------------
// TrackerError
// ---------------------------------------------------------------------------

/// Error returned by tracker lifecycle operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Invalid configuration.
    #[error("invalid tracker configuration: {0}")]
    Config(#[from] ConfigError),
    /// The snapshot refresher thread could not be started.
    #[error("failed to spawn snapshot refresher thread")]
    Spawn(#[source] io::Error),
    /// [`close`](crate::HotspotTracker::close) was called more than once.
    #[error("hotspot tracker already closed")]
    AlreadyClosed,
}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal store invariants are violated.
///
/// Produced by [`TopNStore::check_invariants`](crate::ds::TopNStore::check_invariants).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
