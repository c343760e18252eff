//! Bounded top-N frequency store.
//!
//! Keeps at most `capacity` keys ranked by request frequency in a binary
//! min-heap, so the least frequent tracked key is always at the root and is
//! the eviction candidate. Keys outside the heap have no state at all: a key
//! that is evicted or rejected forgets its count.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TopNStore<K> { capacity: 3 }                                           │
//! │                                                                         │
//! │  index: FxHashMap<K, SlotId>        records: SlotArena<FrequencyRecord> │
//! │    "a" ─► 0                           0: { "a", 3 }                     │
//! │    "b" ─► 1                           1: { "b", 2 }                     │
//! │    "d" ─► 2                           2: { "d", 4 }                     │
//! │                                                                         │
//! │  heap: Vec<SlotId>  (min-heap by frequency)                             │
//! │    [ 1 , 0 , 2 ]        root = "b" (2)                                  │
//! │                                                                         │
//! │  positions: Vec<usize>  (slot index ─► heap index)                      │
//! │    [ 1 , 0 , 2 ]                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Records carry only the key and its count. Heap positions are owned by the
//! store and updated on every heap swap, which is what makes the O(log n)
//! re-sift after an increment possible.
//!
//! ## Admission
//!
//! ```text
//!   record(k):
//!     k tracked?              → frequency += 1, sift down        Incremented
//!     len < capacity?         → insert { k, 1 }                  Inserted
//!     min_frequency <= 1?     → evict root, insert { k, 1 }      Replaced
//!     otherwise               → drop k (count lost)              Rejected
//! ```
//!
//! The full-store branch is an approximation: once every tracked key has a
//! frequency above 1, new keys are rejected on every attempt, however often
//! they arrive. [`offer`](TopNStore::offer) runs the same admission test with
//! an arbitrary candidate frequency and is what aggregation uses to merge
//! shard results.
//!
//! ## Operations
//!
//! | Operation          | Description                               | Complexity     |
//! |--------------------|-------------------------------------------|----------------|
//! | `record`           | Count one occurrence of a key             | O(log n)       |
//! | `offer`            | Admit a key with a known frequency        | O(log n)       |
//! | `hotspots`         | Tracked keys, ascending frequency         | O(n log n)     |
//! | `entries`          | Tracked `(key, frequency)`, ascending     | O(n log n)     |
//! | `contains`         | Membership test                           | O(1)           |
//! | `frequency`        | Current count for a tracked key           | O(1)           |
//! | `min_frequency`    | Root frequency                            | O(1)           |
//!
//! ## Example Usage
//!
//! ```
//! use hotspot::ds::{Admission, TopNStore};
//!
//! let mut store = TopNStore::new(2);
//! store.record("a");
//! store.record("a");
//! store.record("b");
//! store.record("b");
//!
//! // Full, and every tracked key is above the candidate's count of 1
//! assert_eq!(store.record("c"), Admission::Rejected);
//! assert_eq!(store.hotspots().len(), 2);
//! assert!(!store.contains("c"));
//! ```
//!
//! ## Thread Safety
//!
//! `TopNStore` is not thread-safe. The tracker wraps each shard's store in a
//! `parking_lot::RwLock`.
//!
//! ## Tie-breaking
//!
//! Among entries with equal frequency, which one sits at the root (and is
//! evicted first, or listed first) depends on the heap layout. No ordering
//! is guaranteed beyond non-decreasing frequency.

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;
use crate::traits::HotspotView;

const VACANT: usize = usize::MAX;

/// Outcome of feeding a key through a [`TopNStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission<K> {
    /// The key was already tracked; its frequency went up.
    Incremented,
    /// The key was admitted into free capacity.
    Inserted,
    /// The key was admitted by evicting the minimum-frequency entry.
    Replaced {
        /// Key that was displaced.
        evicted: K,
    },
    /// The store was full and the candidate lost the admission test.
    Rejected,
}

impl<K> Admission<K> {
    /// Returns `true` if the key is tracked after the call.
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Admission::Rejected)
    }
}

#[derive(Debug, Clone)]
struct FrequencyRecord<K> {
    key: K,
    frequency: u64,
}

/// Bounded min-heap of the `capacity` most frequent keys.
///
/// See the [module docs](self) for layout and admission rules.
#[derive(Debug, Clone)]
pub struct TopNStore<K> {
    capacity: usize,
    records: SlotArena<FrequencyRecord<K>>,
    heap: Vec<SlotId>,
    positions: Vec<usize>,
    index: FxHashMap<K, SlotId>,
}

impl<K> TopNStore<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty store that tracks at most `capacity` keys.
    ///
    /// A store with capacity 0 rejects every key.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            records: SlotArena::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
            positions: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Maximum number of tracked keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Records one occurrence of `key`.
    ///
    /// # Example
    ///
    /// ```
    /// use hotspot::ds::{Admission, TopNStore};
    ///
    /// let mut store = TopNStore::new(1);
    /// assert_eq!(store.record("a"), Admission::Inserted);
    /// assert_eq!(store.record("a"), Admission::Incremented);
    /// assert_eq!(store.frequency("a"), Some(2));
    ///
    /// // "a" has frequency 2 > 1, so "b" cannot displace it
    /// assert_eq!(store.record("b"), Admission::Rejected);
    /// ```
    pub fn record(&mut self, key: K) -> Admission<K> {
        if let Some(&slot) = self.index.get(&key) {
            let record = &mut self.records[slot];
            record.frequency = record.frequency.saturating_add(1);
            self.sift_down(self.positions[slot.index()]);
            return Admission::Incremented;
        }
        self.admit(key, 1)
    }

    /// Offers `key` with an already-known `frequency`.
    ///
    /// An untracked key is admitted if there is room or if `frequency` is at
    /// least the current minimum. A tracked key keeps the larger of its own
    /// and the offered frequency.
    ///
    /// # Example
    ///
    /// ```
    /// use hotspot::ds::{Admission, TopNStore};
    ///
    /// let mut merged = TopNStore::new(2);
    /// merged.offer("a", 10);
    /// merged.offer("b", 3);
    ///
    /// assert_eq!(merged.offer("c", 2), Admission::Rejected);
    /// assert_eq!(merged.offer("d", 3), Admission::Replaced { evicted: "b" });
    /// assert_eq!(merged.hotspots(), vec!["d", "a"]);
    /// ```
    pub fn offer(&mut self, key: K, frequency: u64) -> Admission<K> {
        if let Some(&slot) = self.index.get(&key) {
            let record = &mut self.records[slot];
            if frequency > record.frequency {
                record.frequency = frequency;
                self.sift_down(self.positions[slot.index()]);
            }
            return Admission::Incremented;
        }
        self.admit(key, frequency)
    }

    /// Returns `true` if `key` is tracked.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(key)
    }

    /// Returns the tracked frequency of `key`.
    pub fn frequency<Q>(&self, key: &Q) -> Option<u64>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index
            .get(key)
            .map(|&slot| self.records[slot].frequency)
    }

    /// Returns the smallest tracked frequency (the heap root).
    pub fn min_frequency(&self) -> Option<u64> {
        self.heap.first().map(|&slot| self.records[slot].frequency)
    }

    /// Returns tracked keys in ascending frequency order.
    ///
    /// Sorts a copy of the heap; the live heap is not modified.
    pub fn hotspots(&self) -> Vec<K> {
        self.sorted_slots()
            .into_iter()
            .map(|slot| self.records[slot].key.clone())
            .collect()
    }

    /// Returns tracked `(key, frequency)` pairs in ascending frequency order.
    pub fn entries(&self) -> Vec<(K, u64)> {
        self.sorted_slots()
            .into_iter()
            .map(|slot| {
                let record = &self.records[slot];
                (record.key.clone(), record.frequency)
            })
            .collect()
    }

    /// Iterates tracked `(key, frequency)` pairs in heap order (unsorted).
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> + '_ {
        self.heap.iter().map(|&slot| {
            let record = &self.records[slot];
            (&record.key, record.frequency)
        })
    }

    /// Validates the store's structural invariants.
    ///
    /// Checks the capacity bound, the index/heap bijection, the position
    /// index, and the min-heap ordering.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.heap.len() > self.capacity {
            return Err(InvariantError::new(format!(
                "heap holds {} entries, capacity is {}",
                self.heap.len(),
                self.capacity
            )));
        }
        if self.index.len() != self.heap.len() || self.records.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "size mismatch: index={}, heap={}, records={}",
                self.index.len(),
                self.heap.len(),
                self.records.len()
            )));
        }
        for (pos, &slot) in self.heap.iter().enumerate() {
            let Some(record) = self.records.get(slot) else {
                return Err(InvariantError::new(format!(
                    "heap position {pos} points at vacant slot {}",
                    slot.index()
                )));
            };
            if self.positions.get(slot.index()) != Some(&pos) {
                return Err(InvariantError::new(format!(
                    "slot {} is at heap position {pos} but indexed elsewhere",
                    slot.index()
                )));
            }
            if self.index.get(&record.key) != Some(&slot) {
                return Err(InvariantError::new(format!(
                    "index does not map key at heap position {pos} to slot {}",
                    slot.index()
                )));
            }
            if pos > 0 {
                let parent = self.records[self.heap[(pos - 1) / 2]].frequency;
                if parent > record.frequency {
                    return Err(InvariantError::new(format!(
                        "heap order violated at position {pos}: parent {parent} > child {}",
                        record.frequency
                    )));
                }
            }
        }
        Ok(())
    }

    fn admit(&mut self, key: K, frequency: u64) -> Admission<K> {
        if self.capacity == 0 {
            return Admission::Rejected;
        }
        if self.heap.len() < self.capacity {
            self.push(key, frequency);
            return Admission::Inserted;
        }
        if !self.min_frequency().is_some_and(|min| min <= frequency) {
            return Admission::Rejected;
        }
        match self.pop_min() {
            Some((evicted, _)) => {
                self.push(key, frequency);
                Admission::Replaced { evicted }
            },
            None => Admission::Rejected,
        }
    }

    fn push(&mut self, key: K, frequency: u64) {
        let slot = self.records.insert(FrequencyRecord {
            key: key.clone(),
            frequency,
        });
        self.index.insert(key, slot);
        let pos = self.heap.len();
        self.heap.push(slot);
        if self.positions.len() <= slot.index() {
            self.positions.resize(slot.index() + 1, VACANT);
        }
        self.positions[slot.index()] = pos;
        self.sift_up(pos);
    }

    fn pop_min(&mut self) -> Option<(K, u64)> {
        let last = self.heap.len().checked_sub(1)?;
        self.swap(0, last);
        let slot = self.heap.pop()?;
        self.positions[slot.index()] = VACANT;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        let record = self.records.remove(slot)?;
        self.index.remove(&record.key);
        Some((record.key, record.frequency))
    }

    fn sorted_slots(&self) -> Vec<SlotId> {
        let mut order = self.heap.clone();
        order.sort_by_key(|&slot| self.records[slot].frequency);
        order
    }

    #[inline]
    fn frequency_at(&self, pos: usize) -> u64 {
        self.records[self.heap[pos]].frequency
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.positions[self.heap[a].index()] = a;
        self.positions[self.heap[b].index()] = b;
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.frequency_at(pos) >= self.frequency_at(parent) {
                break;
            }
            self.swap(pos, parent);
            pos = parent;
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smallest = left;
            if right < len && self.frequency_at(right) < self.frequency_at(left) {
                smallest = right;
            }
            if self.frequency_at(smallest) >= self.frequency_at(pos) {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }
}

impl<K> HotspotView<K> for TopNStore<K>
where
    K: Eq + Hash + Clone,
{
    fn hotspots(&self) -> Vec<K> {
        TopNStore::hotspots(self)
    }

    fn is_hotspot(&self, key: &K) -> bool {
        self.contains(key)
    }
}
