//! # Hotspot Trait Seams
//!
//! Small traits that let request-path code depend on "something that can
//! answer hotspot queries" without naming a concrete tracker.
//!
//! ## Architecture
//!
//! ```text
//!   ┌─────────────────────────────┐      ┌─────────────────────────────┐
//!   │      HotspotView<K>         │      │     HotspotRecorder<K>      │
//!   │                             │      │                             │
//!   │  hotspots(&) → Vec<K>       │      │  record(&, K)               │
//!   │  is_hotspot(&, &K) → bool   │      │                             │
//!   └──────────────┬──────────────┘      └──────────────┬──────────────┘
//!                  │                                    │
//!                  │        ┌───────────────────────────┘
//!                  ▼        ▼
//!   ┌─────────────────────────────────────────────────────────────┐
//!   │  ConcurrentHotspots<K>: HotspotView + HotspotRecorder       │
//!   │                         + Send + Sync                       │
//!   └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Implementors
//!
//! | Type                 | `HotspotView` | `HotspotRecorder` | Thread-safe |
//! |----------------------|---------------|-------------------|-------------|
//! | `TopNStore<K>`       | yes           | no (`&mut self`)  | no          |
//! | `HotspotTracker<K>`  | yes           | yes               | yes         |
//!
//! `TopNStore` only views because recording into it needs `&mut self`; the
//! tracker records through `&self` by locking the target shard.
//!
//! ## Example
//!
//! ```
//! use hotspot::traits::{ConcurrentHotspots, HotspotView};
//! use hotspot::HotspotTracker;
//!
//! fn route<T: ConcurrentHotspots<String>>(hot: &T, key: String) -> &'static str {
//!     let is_hot = hot.is_hotspot(&key);
//!     hot.record(key);
//!     if is_hot { "replica" } else { "primary" }
//! }
//!
//! let tracker = HotspotTracker::<String>::new(4, 2).unwrap();
//! assert_eq!(route(&tracker, "k".to_string()), "primary");
//! assert_eq!(route(&tracker, "k".to_string()), "replica");
//! ```

/// Read side of a hotspot tracker.
pub trait HotspotView<K> {
    /// Current hot keys, ascending by frequency.
    fn hotspots(&self) -> Vec<K>;

    /// Returns `true` if `key` is currently hot.
    fn is_hotspot(&self, key: &K) -> bool;
}

/// Write side of a shared hotspot tracker.
pub trait HotspotRecorder<K> {
    /// Records one request for `key`.
    fn record(&self, key: K);
}

/// Marker for trackers that can be shared across request threads.
pub trait ConcurrentHotspots<K>: HotspotView<K> + HotspotRecorder<K> + Send + Sync {}

impl<K, T> ConcurrentHotspots<K> for T where T: HotspotView<K> + HotspotRecorder<K> + Send + Sync {}
