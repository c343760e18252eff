use std::fmt;

/// Point-in-time copy of a tracker's counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TrackerMetricsSnapshot {
    /// Number of `record` calls.
    pub records: u64,
    /// Records that bumped an already-tracked key.
    pub increments: u64,
    /// Records that admitted a new key (with or without eviction).
    pub inserts: u64,
    /// Keys displaced by an admission.
    pub evictions: u64,
    /// Records dropped by the admission test.
    pub rejections: u64,
    /// Cross-shard aggregations performed.
    pub aggregations: u64,
    /// Reads served from a fresh cached snapshot.
    pub snapshot_hits: u64,
    /// Reads that found the cache stale and recomputed it.
    pub snapshot_refreshes: u64,
}

impl TrackerMetricsSnapshot {
    /// Fraction of `record` calls that left the key tracked.
    pub fn admission_rate(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        self.records.saturating_sub(self.rejections) as f64 / self.records as f64
    }
}

impl fmt::Display for TrackerMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TrackerMetrics {{ records: {}, admission_rate: {:.2}%, increments: {}, \
             inserts: {}, evictions: {}, rejections: {}, aggregations: {}, \
             snapshot_hits: {}, snapshot_refreshes: {} }}",
            self.records,
            self.admission_rate() * 100.0,
            self.increments,
            self.inserts,
            self.evictions,
            self.rejections,
            self.aggregations,
            self.snapshot_hits,
            self.snapshot_refreshes,
        )
    }
}
