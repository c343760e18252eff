//! Tracker counters (feature `metrics`).
//!
//! Counters are relaxed atomics so that recording never takes a lock of its
//! own; a write bumps counters after releasing its shard lock. A snapshot is
//! therefore a best-effort view, consistent per counter but not across them.
//!
//! ## Example
//!
//! ```
//! use hotspot::HotspotTracker;
//!
//! let tracker = HotspotTracker::<&str>::new(1, 1).unwrap();
//! tracker.record("a");
//! tracker.record("a");
//! tracker.record("b"); // rejected: "a" has frequency 2
//!
//! let m = tracker.metrics();
//! assert_eq!(m.records, 3);
//! assert_eq!(m.inserts, 1);
//! assert_eq!(m.increments, 1);
//! assert_eq!(m.rejections, 1);
//! ```

pub mod snapshot;

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ds::Admission;

pub use snapshot::TrackerMetricsSnapshot;

#[derive(Debug, Default)]
pub struct TrackerMetrics {
    records: AtomicU64,
    increments: AtomicU64,
    inserts: AtomicU64,
    evictions: AtomicU64,
    rejections: AtomicU64,
    aggregations: AtomicU64,
    snapshot_hits: AtomicU64,
    snapshot_refreshes: AtomicU64,
}

impl TrackerMetrics {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one `record` call and its admission outcome.
    pub fn record_admission<K>(&self, outcome: &Admission<K>) {
        Self::bump(&self.records);
        match outcome {
            Admission::Incremented => Self::bump(&self.increments),
            Admission::Inserted => Self::bump(&self.inserts),
            Admission::Replaced { .. } => {
                Self::bump(&self.inserts);
                Self::bump(&self.evictions);
            },
            Admission::Rejected => Self::bump(&self.rejections),
        }
    }

    pub fn record_aggregation(&self) {
        Self::bump(&self.aggregations);
    }

    pub fn record_snapshot_hit(&self) {
        Self::bump(&self.snapshot_hits);
    }

    pub fn record_snapshot_refresh(&self) {
        Self::bump(&self.snapshot_refreshes);
    }

    pub fn snapshot(&self) -> TrackerMetricsSnapshot {
        TrackerMetricsSnapshot {
            records: self.records.load(Ordering::Relaxed),
            increments: self.increments.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rejections: self.rejections.load(Ordering::Relaxed),
            aggregations: self.aggregations.load(Ordering::Relaxed),
            snapshot_hits: self.snapshot_hits.load(Ordering::Relaxed),
            snapshot_refreshes: self.snapshot_refreshes.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.records,
            &self.increments,
            &self.inserts,
            &self.evictions,
            &self.rejections,
            &self.aggregations,
            &self.snapshot_hits,
            &self.snapshot_refreshes,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
