//! Tracker builder.
//!
//! Collects tracker configuration in one place and validates it at build
//! time.
//!
//! ## Configuration
//!
//! | Setting            | Default                 | Constraint |
//! |--------------------|-------------------------|------------|
//! | `top_n`            | required                | > 0        |
//! | `shards`           | [`DEFAULT_SHARD_COUNT`] | > 0        |
//! | `seed`             | 0                       | any        |
//! | `refresh_interval` | none (no snapshot cache)| > 0        |
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use hotspot::builder::TrackerBuilder;
//!
//! let tracker = TrackerBuilder::new(100)
//!     .shards(8)
//!     .refresh_interval(Duration::from_millis(250))
//!     .try_build::<String>()
//!     .unwrap();
//!
//! tracker.record("user:1".to_string());
//! assert_eq!(tracker.shard_count(), 8);
//! tracker.close().unwrap();
//! ```

use std::hash::Hash;
use std::time::Duration;

use crate::error::TrackerError;
use crate::tracker::HotspotTracker;

/// Shard count used when none is configured.
pub const DEFAULT_SHARD_COUNT: usize = 4;

/// Builder for [`HotspotTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerBuilder {
    top_n: usize,
    shards: usize,
    seed: u64,
    refresh_interval: Option<Duration>,
}

impl TrackerBuilder {
    /// Creates a builder tracking `top_n` hot keys over
    /// [`DEFAULT_SHARD_COUNT`] shards, without a snapshot cache.
    pub fn new(top_n: usize) -> Self {
        Self {
            top_n,
            shards: DEFAULT_SHARD_COUNT,
            seed: 0,
            refresh_interval: None,
        }
    }

    /// Sets the number of shards.
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Sets the seed mixed into the shard routing hash.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enables the snapshot cache, invalidated every `interval`.
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    /// Builds the tracker.
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or the refresher thread cannot
    /// be started. For a non-panicking alternative, use
    /// [`try_build`](Self::try_build).
    pub fn build<K>(self) -> HotspotTracker<K>
    where
        K: Eq + Hash + Clone,
    {
        match self.try_build() {
            Ok(tracker) => tracker,
            Err(e) => panic!("{}", e),
        }
    }

    /// Builds the tracker, returning an error instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] for a zero `top_n`, shard count or
    /// refresh interval, and [`TrackerError::Spawn`] if the refresher thread
    /// cannot be started.
    ///
    /// # Example
    ///
    /// ```
    /// use hotspot::builder::TrackerBuilder;
    /// use hotspot::error::{ConfigError, TrackerError};
    ///
    /// let err = TrackerBuilder::new(10).shards(0).try_build::<u64>().unwrap_err();
    /// assert!(matches!(err, TrackerError::Config(ConfigError::ZeroShardCount)));
    /// ```
    pub fn try_build<K>(self) -> Result<HotspotTracker<K>, TrackerError>
    where
        K: Eq + Hash + Clone,
    {
        let tracker = HotspotTracker::with_seed(self.top_n, self.shards, self.seed)?;
        match self.refresh_interval {
            Some(interval) => tracker.with_cache(interval),
            None => Ok(tracker),
        }
    }
}
