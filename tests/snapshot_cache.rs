// ==============================================
// SNAPSHOT CACHE TIMING TESTS (integration)
// ==============================================
//
// Cached reads must not observe writes until the refresher has ticked.
// Intervals are generous so that scheduling jitter cannot cross a tick
// boundary between the reads that must agree.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use hotspot::HotspotTracker;
use hotspot::error::TrackerError;

const INTERVAL: Duration = Duration::from_millis(300);

fn sorted(mut keys: Vec<&'static str>) -> Vec<&'static str> {
    keys.sort();
    keys
}

#[test]
fn reads_are_stale_until_the_interval_elapses() {
    let tracker = HotspotTracker::new(4, 2).unwrap().with_cache(INTERVAL).unwrap();

    tracker.record("a");
    let first = tracker.hotspots();
    assert_eq!(first, vec!["a"]);

    tracker.record("b");
    assert_eq!(tracker.hotspots(), first);
    assert!(!tracker.is_hotspot("b"));

    thread::sleep(INTERVAL * 2);
    assert_eq!(sorted(tracker.hotspots()), vec!["a", "b"]);
    assert!(tracker.is_hotspot("b"));

    tracker.close().unwrap();
}

#[test]
fn first_read_always_aggregates() {
    let tracker = HotspotTracker::new(4, 2).unwrap().with_cache(INTERVAL).unwrap();
    tracker.record("x");
    tracker.record("y");
    assert_eq!(sorted(tracker.hotspots()), vec!["x", "y"]);
    tracker.close().unwrap();
}

#[test]
fn consecutive_cached_reads_are_identical() {
    let tracker = HotspotTracker::new(3, 4).unwrap().with_cache(INTERVAL).unwrap();
    for key in ["a", "b", "a", "c", "a", "b"] {
        tracker.record(key);
    }
    let first = tracker.hotspot_entries();
    let second = tracker.hotspot_entries();
    assert_eq!(first, second);
    tracker.close().unwrap();
}

#[test]
fn close_twice_is_an_error() {
    let tracker: HotspotTracker<u64> = HotspotTracker::new(4, 2)
        .unwrap()
        .with_cache(INTERVAL)
        .unwrap();
    assert!(tracker.close().is_ok());
    assert!(matches!(tracker.close(), Err(TrackerError::AlreadyClosed)));
}

#[test]
fn dropping_a_cached_tracker_stops_its_refresher() {
    for _ in 0..16 {
        let tracker: HotspotTracker<u64> = HotspotTracker::new(2, 2)
            .unwrap()
            .with_cache(Duration::from_millis(1))
            .unwrap();
        tracker.record(1);
        drop(tracker);
    }
}

#[cfg(feature = "metrics")]
#[test]
fn readers_queued_behind_a_rebuild_reuse_it() {
    const READERS: usize = 16;

    let tracker: Arc<HotspotTracker<u64>> = Arc::new(
        HotspotTracker::new(8, 4)
            .unwrap()
            .with_cache(Duration::from_secs(3600))
            .unwrap(),
    );
    for key in 0..32u64 {
        tracker.record(key);
    }
    let barrier = Arc::new(Barrier::new(READERS));

    let handles: Vec<_> = (0..READERS)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                tracker.hotspots()
            })
        })
        .collect();
    let results: Vec<Vec<u64>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert!(results.windows(2).all(|w| w[0] == w[1]));
    let metrics = tracker.metrics();
    assert_eq!(metrics.aggregations, 1);
    assert_eq!(metrics.snapshot_refreshes, 1);
    assert_eq!(metrics.snapshot_hits, (READERS - 1) as u64);
    tracker.close().unwrap();
}
