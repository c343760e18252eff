//! Timed-invalidation cache around cross-shard aggregation.
//!
//! Aggregating every shard on every read costs
//! O(shards × top_n × log top_n) plus one read lock per shard. When reads
//! are frequent, [`SnapshotCache`] keeps the last aggregate and only rebuilds
//! it after a background [`Refresher`] has marked it stale.
//!
//! ## State Machine
//!
//! ```text
//!                 tick (every interval, unconditional)
//!        ┌───────────────────────────────────────────────┐
//!        │                                               ▼
//!   ┌─────────┐                                     ┌─────────┐
//!   │  Fresh  │ ◄────────────────────────────────── │  Stale  │ ◄── initial
//!   └─────────┘   read: exclusive lock, clear flag, └─────────┘
//!        │              aggregate, store snapshot
//!        │
//!        └── read: shared lock, clone Arc of current snapshot
//! ```
//!
//! The first read always aggregates. Readers that pile up behind the
//! exclusive lock while one of them rebuilds find the flag already cleared
//! and reuse that rebuild instead of aggregating again.
//!
//! ## Refresher Lifecycle
//!
//! ```text
//!   start(interval)            close() / drop
//!        │                          │
//!        ▼                          ▼
//!   spawn "hotspot-refresh"    drop shutdown Sender ──► select! sees
//!   select! { tick, shutdown }                         disconnect, exits
//!                                   │
//!                                   ▼
//!                              join thread
//! ```

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, select};
use log::{debug, trace, warn};
use parking_lot::{Mutex, RwLock};

use crate::ds::TopNStore;
use crate::error::{ConfigError, TrackerError};

const REFRESHER_THREAD_NAME: &str = "hotspot-refresh";

/// Whether a cached read reused the snapshot or rebuilt it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Freshness {
    Cached,
    Refreshed,
}

/// Background thread that marks a [`SnapshotCache`] stale on a fixed timer.
#[derive(Debug)]
struct Refresher {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

impl Refresher {
    fn spawn(interval: Duration, stale: Arc<AtomicBool>) -> Result<Self, TrackerError> {
        let (shutdown, signal) = crossbeam_channel::bounded::<()>(0);
        let handle = thread::Builder::new()
            .name(REFRESHER_THREAD_NAME.to_string())
            .spawn(move || run_refresher(interval, &stale, &signal))
            .map_err(TrackerError::Spawn)?;
        debug!("snapshot refresher started, interval {interval:?}");
        Ok(Self { shutdown, handle })
    }

    /// Signals the thread to exit and waits for it.
    fn stop(self) {
        let Refresher { shutdown, handle } = self;
        drop(shutdown);
        if handle.join().is_err() {
            warn!("snapshot refresher thread panicked");
        }
    }
}

fn run_refresher(interval: Duration, stale: &AtomicBool, signal: &Receiver<()>) {
    let ticker = crossbeam_channel::tick(interval);
    loop {
        select! {
            recv(ticker) -> _ => {
                stale.store(true, Ordering::Release);
                trace!("hotspot snapshot marked stale");
            },
            recv(signal) -> _ => break,
        }
    }
    debug!("snapshot refresher stopped");
}

/// Cached aggregate snapshot plus the refresher that invalidates it.
pub(crate) struct SnapshotCache<K> {
    current: RwLock<Arc<TopNStore<K>>>,
    stale: Arc<AtomicBool>,
    refresher: Mutex<Option<Refresher>>,
    interval: Duration,
}

impl<K> SnapshotCache<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates a stale cache and starts its refresher.
    pub(crate) fn start(top_n: usize, interval: Duration) -> Result<Self, TrackerError> {
        if interval.is_zero() {
            return Err(ConfigError::ZeroRefreshInterval(interval).into());
        }
        let stale = Arc::new(AtomicBool::new(true));
        let refresher = Refresher::spawn(interval, Arc::clone(&stale))?;
        Ok(Self {
            current: RwLock::new(Arc::new(TopNStore::new(top_n))),
            stale,
            refresher: Mutex::new(Some(refresher)),
            interval,
        })
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    #[cfg(test)]
    fn is_running(&self) -> bool {
        self.refresher.lock().is_some()
    }

    /// Returns the current snapshot, rebuilding it with `recompute` if stale.
    pub(crate) fn get_or_refresh(
        &self,
        recompute: impl FnOnce() -> TopNStore<K>,
    ) -> (Arc<TopNStore<K>>, Freshness) {
        {
            let current = self.current.read();
            if !self.stale.load(Ordering::Acquire) {
                return (Arc::clone(&current), Freshness::Cached);
            }
        }

        let mut current = self.current.write();
        // Cleared before rebuilding so a tick during the rebuild is not lost.
        if !self.stale.swap(false, Ordering::AcqRel) {
            return (Arc::clone(&current), Freshness::Cached);
        }
        let fresh = Arc::new(recompute());
        trace!("hotspot snapshot rebuilt with {} entries", fresh.len());
        *current = Arc::clone(&fresh);
        (fresh, Freshness::Refreshed)
    }

    /// Stops the refresher. A second call reports [`TrackerError::AlreadyClosed`].
    pub(crate) fn close(&self) -> Result<(), TrackerError> {
        let refresher = self
            .refresher
            .lock()
            .take()
            .ok_or(TrackerError::AlreadyClosed)?;
        refresher.stop();
        Ok(())
    }
}

impl<K> Drop for SnapshotCache<K> {
    fn drop(&mut self) {
        if let Some(refresher) = self.refresher.get_mut().take() {
            refresher.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn store_with(keys: &[&'static str]) -> TopNStore<&'static str> {
        let mut store = TopNStore::new(4);
        for &key in keys {
            store.record(key);
        }
        store
    }

    // A long interval keeps the refresher from ticking during a test.
    const QUIET: Duration = Duration::from_secs(3600);

    #[test]
    fn first_read_rebuilds_then_serves_cached() {
        let cache = SnapshotCache::start(4, QUIET).unwrap();
        let calls = Cell::new(0);

        let (first, freshness) = cache.get_or_refresh(|| {
            calls.set(calls.get() + 1);
            store_with(&["a"])
        });
        assert_eq!(freshness, Freshness::Refreshed);
        assert_eq!(first.hotspots(), vec!["a"]);

        let (second, freshness) = cache.get_or_refresh(|| {
            calls.set(calls.get() + 1);
            store_with(&["a", "b"])
        });
        assert_eq!(freshness, Freshness::Cached);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn stale_flag_forces_rebuild() {
        let cache = SnapshotCache::start(4, QUIET).unwrap();
        cache.get_or_refresh(|| store_with(&["a"]));

        cache.stale.store(true, Ordering::Release);
        let (snapshot, freshness) = cache.get_or_refresh(|| store_with(&["a", "b"]));
        assert_eq!(freshness, Freshness::Refreshed);
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn refresher_ticks_mark_cache_stale() {
        let cache = SnapshotCache::start(4, Duration::from_millis(10)).unwrap();
        cache.get_or_refresh(|| store_with(&["a"]));
        thread::sleep(Duration::from_millis(100));
        assert!(cache.stale.load(Ordering::Acquire));
    }

    #[test]
    fn close_stops_refresher_once() {
        let cache: SnapshotCache<u64> = SnapshotCache::start(4, QUIET).unwrap();
        assert!(cache.is_running());
        cache.close().unwrap();
        assert!(!cache.is_running());
        assert!(matches!(cache.close(), Err(TrackerError::AlreadyClosed)));
    }

    #[test]
    fn closed_cache_stops_ticking() {
        let cache = SnapshotCache::start(4, Duration::from_millis(5)).unwrap();
        cache.close().unwrap();
        cache.stale.store(false, Ordering::Release);
        thread::sleep(Duration::from_millis(50));
        assert!(!cache.stale.load(Ordering::Acquire));
        let (snapshot, freshness) = cache.get_or_refresh(|| store_with(&["z"]));
        assert_eq!(freshness, Freshness::Cached);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let result = SnapshotCache::<u64>::start(4, Duration::ZERO);
        assert!(matches!(
            result,
            Err(TrackerError::Config(ConfigError::ZeroRefreshInterval(_)))
        ));
    }

    #[test]
    fn interval_is_reported() {
        let cache = SnapshotCache::<u64>::start(4, QUIET).unwrap();
        assert_eq!(cache.interval(), QUIET);
    }
}
