//! Sharded top-N hotspot tracker.
//!
//! [`HotspotTracker`] answers "what are the current top-N keys?" and "is this
//! key hot?" for a request path that records every key it serves. Writes are
//! spread over independently locked shards; reads merge the shards' local
//! top-N lists into one global list.
//!
//! ## Architecture
//!
//! ```text
//!   record(key)                                  hotspots() / is_hotspot(key)
//!       │                                                    │
//!       ▼                                                    ▼
//!   ShardSelector ── FNV-1a(key) % shards        ┌───────────────────────┐
//!       │                                        │ SnapshotCache (opt.)  │
//!       ▼                                        │ Fresh ─► cached Arc   │
//!   ┌─────────┬─────────┬─────────┬─────────┐    │ Stale ─► aggregate()  │
//!   │ RwLock  │ RwLock  │ RwLock  │ RwLock  │    └───────────┬───────────┘
//!   │ TopN 0  │ TopN 1  │ TopN 2  │ TopN 3  │ ◄──────────────┘
//!   └─────────┴─────────┴─────────┴─────────┘   one shard read lock at a time,
//!                                               offer() each entry into a
//!                                               fresh TopNStore(top_n)
//! ```
//!
//! ## Approximation
//!
//! Each shard only remembers its own top-N, and a full shard rejects new
//! keys whose single occurrence cannot beat the shard minimum. A key that is
//! globally frequent but never survives admission in its shard is invisible
//! to aggregation. Results are exact when every hot key holds a place in its
//! shard's local top-N, which is the common case for genuinely hot keys.
//!
//! ## Concurrency
//!
//! - `record` takes one shard's write lock and nothing else.
//! - Aggregation takes each shard's read lock in turn, never two at once, so
//!   the merged view is best-effort rather than a linearizable snapshot.
//! - With caching enabled, the snapshot lock is the tracker-wide lock:
//!   rebuilds happen under its exclusive mode, cached reads under its shared
//!   mode without touching shard locks.
//!
//! ## Example Usage
//!
//! ```
//! use hotspot::HotspotTracker;
//!
//! let tracker = HotspotTracker::new(3, 1).unwrap();
//! for key in ["a", "b", "c", "a", "a", "b", "d", "d", "d", "d", "e", "f", "e"] {
//!     tracker.record(key);
//! }
//!
//! let mut hot = tracker.hotspots();
//! hot.sort();
//! assert_eq!(hot, vec!["a", "b", "d"]);
//! assert!(!tracker.is_hotspot("f"));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use log::{debug, trace};
use parking_lot::RwLock;

use crate::builder::TrackerBuilder;
use crate::ds::{Admission, ShardSelector, TopNStore};
use crate::error::{ConfigError, TrackerError};
#[cfg(feature = "metrics")]
use crate::metrics::{TrackerMetrics, TrackerMetricsSnapshot};
#[cfg(feature = "metrics")]
use crate::snapshot::Freshness;
use crate::snapshot::SnapshotCache;
use crate::traits::{HotspotRecorder, HotspotView};

/// Thread-safe sharded top-N hotspot tracker.
///
/// Share it across request threads behind an `Arc`. See the
/// [module docs](self) for the sharding and aggregation model.
pub struct HotspotTracker<K> {
    shards: Box<[RwLock<TopNStore<K>>]>,
    selector: ShardSelector,
    top_n: usize,
    cache: Option<SnapshotCache<K>>,
    #[cfg(feature = "metrics")]
    metrics: TrackerMetrics,
}

impl<K> HotspotTracker<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a tracker of `top_n` hot keys spread over `shard_count` shards.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if either argument is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use hotspot::error::ConfigError;
    /// use hotspot::HotspotTracker;
    ///
    /// assert!(HotspotTracker::<u64>::new(100, 4).is_ok());
    /// assert_eq!(HotspotTracker::<u64>::new(0, 4).unwrap_err(), ConfigError::ZeroTopN);
    /// ```
    pub fn new(top_n: usize, shard_count: usize) -> Result<Self, ConfigError> {
        Self::with_seed(top_n, shard_count, 0)
    }

    /// Returns a [`TrackerBuilder`] for `top_n` hot keys.
    pub fn builder(top_n: usize) -> TrackerBuilder {
        TrackerBuilder::new(top_n)
    }

    pub(crate) fn with_seed(
        top_n: usize,
        shard_count: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if top_n == 0 {
            return Err(ConfigError::ZeroTopN);
        }
        if shard_count == 0 {
            return Err(ConfigError::ZeroShardCount);
        }
        let shards = (0..shard_count)
            .map(|_| RwLock::new(TopNStore::new(top_n)))
            .collect();
        debug!("hotspot tracker created: top_n={top_n}, shards={shard_count}, seed={seed}");
        Ok(Self {
            shards,
            selector: ShardSelector::new(shard_count, seed),
            top_n,
            cache: None,
            #[cfg(feature = "metrics")]
            metrics: TrackerMetrics::default(),
        })
    }

    /// Wraps aggregation in a snapshot cache refreshed every `interval`.
    ///
    /// Starts a background refresher thread, stopped by
    /// [`close`](Self::close) or when the tracker is dropped. Reads between
    /// ticks see the snapshot taken at the first read after the last tick.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] for a zero interval and
    /// [`TrackerError::Spawn`] if the thread cannot be started.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use hotspot::HotspotTracker;
    ///
    /// let tracker = HotspotTracker::<&str>::new(10, 4)
    ///     .unwrap()
    ///     .with_cache(Duration::from_secs(1))
    ///     .unwrap();
    /// tracker.record("a");
    /// assert_eq!(tracker.hotspots(), vec!["a"]);
    /// tracker.close().unwrap();
    /// ```
    pub fn with_cache(mut self, interval: Duration) -> Result<Self, TrackerError> {
        self.cache = Some(SnapshotCache::start(self.top_n, interval)?);
        debug!("hotspot snapshot cache enabled, interval {interval:?}");
        Ok(self)
    }

    /// Records one request for `key` in its shard.
    pub fn record(&self, key: K) {
        let shard = self.selector.shard_for_key(&key);
        let outcome = self.shards[shard].write().record(key);
        if matches!(outcome, Admission::Replaced { .. }) {
            trace!("shard {shard}: admitted key by evicting its minimum");
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_admission(&outcome);
    }

    /// Returns the current hot keys, ascending by frequency.
    ///
    /// At most `top_n` keys.
    pub fn hotspots(&self) -> Vec<K> {
        self.with_snapshot(TopNStore::hotspots)
    }

    /// Returns the current hot keys with their frequencies, ascending.
    pub fn hotspot_entries(&self) -> Vec<(K, u64)> {
        self.with_snapshot(TopNStore::entries)
    }

    /// Returns `true` if `key` is currently among the hot keys.
    pub fn is_hotspot<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.with_snapshot(|snapshot| snapshot.contains(key))
    }

    /// Merges every shard's top-N into a fresh global top-N store.
    ///
    /// Bypasses the snapshot cache.
    pub fn aggregate(&self) -> TopNStore<K> {
        let mut merged = TopNStore::new(self.top_n);
        for shard in self.shards.iter() {
            let store = shard.read();
            for (key, frequency) in store.iter() {
                merged.offer(key.clone(), frequency);
            }
        }
        #[cfg(feature = "metrics")]
        self.metrics.record_aggregation();
        merged
    }

    /// Stops the snapshot refresher.
    ///
    /// A no-op on a tracker without caching. The tracker must not be used
    /// after closing: cached reads would keep serving the last snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::AlreadyClosed`] on a second call.
    pub fn close(&self) -> Result<(), TrackerError> {
        match &self.cache {
            Some(cache) => {
                cache.close()?;
                debug!("hotspot tracker closed");
                Ok(())
            },
            None => Ok(()),
        }
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Returns `true` if reads go through the snapshot cache.
    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        self.cache.as_ref().map(SnapshotCache::interval)
    }

    /// Returns the shard `key` is routed to.
    pub fn shard_index_of<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + ?Sized,
    {
        self.selector.shard_for_key(key)
    }

    #[cfg(feature = "metrics")]
    pub fn metrics(&self) -> TrackerMetricsSnapshot {
        self.metrics.snapshot()
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&self) {
        self.metrics.reset();
    }

    fn with_snapshot<R>(&self, read: impl FnOnce(&TopNStore<K>) -> R) -> R {
        let Some(cache) = &self.cache else {
            return read(&self.aggregate());
        };
        let (snapshot, freshness) = cache.get_or_refresh(|| self.aggregate());
        #[cfg(feature = "metrics")]
        match freshness {
            Freshness::Cached => self.metrics.record_snapshot_hit(),
            Freshness::Refreshed => self.metrics.record_snapshot_refresh(),
        }
        #[cfg(not(feature = "metrics"))]
        let _ = freshness;
        read(&snapshot)
    }
}

impl<K> fmt::Debug for HotspotTracker<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HotspotTracker")
            .field("top_n", &self.top_n)
            .field("shards", &self.shards.len())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl<K> HotspotView<K> for HotspotTracker<K>
where
    K: Eq + Hash + Clone,
{
    fn hotspots(&self) -> Vec<K> {
        HotspotTracker::hotspots(self)
    }

    fn is_hotspot(&self, key: &K) -> bool {
        HotspotTracker::is_hotspot(self, key)
    }
}

impl<K> HotspotRecorder<K> for HotspotTracker<K>
where
    K: Eq + Hash + Clone,
{
    fn record(&self, key: K) {
        HotspotTracker::record(self, key);
    }
}
