#![no_main]

use libfuzzer_sys::fuzz_target;
use hotspot::ds::{Admission, TopNStore};

// Fuzz arbitrary operation sequences on TopNStore
//
// Drives record, offer and the read-only queries from the input bytes and
// checks the heap/index invariants after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    let capacity = (data[0] as usize) % 16;
    let mut store: TopNStore<u8> = TopNStore::new(capacity);

    let mut idx = 1;
    while idx + 1 < data.len() {
        let op = data[idx] % 6;
        let key = data[idx + 1] % 32;

        match op {
            0 | 1 => {
                let before = store.frequency(&key);
                let min = store.min_frequency();
                match store.record(key) {
                    Admission::Incremented => {
                        assert_eq!(store.frequency(&key), before.map(|f| f + 1));
                    },
                    Admission::Inserted => {
                        assert!(before.is_none());
                        assert_eq!(store.frequency(&key), Some(1));
                    },
                    Admission::Replaced { evicted } => {
                        assert!(before.is_none());
                        assert!(!store.contains(&evicted));
                        assert!(min.is_some_and(|m| m <= 1));
                    },
                    Admission::Rejected => {
                        assert!(before.is_none());
                        assert!(!store.contains(&key));
                        assert!(capacity == 0 || min.is_some_and(|m| m > 1));
                    },
                }
            },
            2 => {
                let frequency = u64::from(data[idx + 1]);
                let before = store.frequency(&key);
                if store.offer(key, frequency).is_tracked() {
                    let expected = before.map_or(frequency, |f| f.max(frequency));
                    assert_eq!(store.frequency(&key), Some(expected));
                }
            },
            3 => {
                let hot = store.hotspots();
                assert_eq!(hot.len(), store.len());
                for k in &hot {
                    assert!(store.contains(k));
                }
            },
            4 => {
                let entries = store.entries();
                assert!(entries.windows(2).all(|w| w[0].1 <= w[1].1));
                if let Some(&(_, first)) = entries.first() {
                    assert_eq!(store.min_frequency(), Some(first));
                }
            },
            5 => {
                assert!(store.len() <= store.capacity());
                assert_eq!(store.is_empty(), store.len() == 0);
                assert_eq!(store.is_full(), store.len() == store.capacity());
            },
            _ => unreachable!(),
        }

        if let Err(err) = store.check_invariants() {
            panic!("invariant violated: {err}");
        }
        idx += 2;
    }
});
