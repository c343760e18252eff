#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use hotspot::ds::TopNStore;

// Fuzz property-based tests for TopNStore
//
// Tests specific invariants:
// - Tracked counts never exceed the true request count
// - Counts are exact when every distinct key fits
// - Entries stay ascending and bounded by capacity
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let test_type = data[0] % 3;

    match test_type {
        0 => test_counts_bounded_by_truth(&data[1..]),
        1 => test_exact_when_keys_fit(&data[1..]),
        2 => test_entries_ascending(&data[1..]),
        _ => unreachable!(),
    }
});

// Property: a tracked count never exceeds how often the key was requested
fn test_counts_bounded_by_truth(data: &[u8]) {
    let capacity = (data[0] as usize % 8) + 1;
    let mut store = TopNStore::new(capacity);
    let mut truth: HashMap<u8, u64> = HashMap::new();

    for &byte in &data[1..] {
        let key = byte % 24;
        *truth.entry(key).or_default() += 1;
        store.record(key);
    }

    for (key, frequency) in store.entries() {
        assert!(frequency <= truth[&key]);
    }
}

// Property: with no more distinct keys than capacity, counts are exact
fn test_exact_when_keys_fit(data: &[u8]) {
    let mut store = TopNStore::new(16);
    let mut truth: HashMap<u8, u64> = HashMap::new();

    for &byte in data {
        let key = byte % 16;
        *truth.entry(key).or_default() += 1;
        store.record(key);
    }

    assert_eq!(store.len(), truth.len());
    for (key, count) in truth {
        assert_eq!(store.frequency(&key), Some(count));
    }
}

// Property: entries are ascending by frequency and never exceed capacity
fn test_entries_ascending(data: &[u8]) {
    let capacity = data[0] as usize % 8;
    let mut store = TopNStore::new(capacity);

    for &byte in &data[1..] {
        store.record(byte % 12);
        let entries = store.entries();
        assert!(entries.len() <= capacity);
        assert!(entries.windows(2).all(|w| w[0].1 <= w[1].1));
    }
}
