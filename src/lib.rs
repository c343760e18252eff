//! hotspot: online top-N hot-key tracking for request paths.
//!
//! Records every key a cache or router serves and answers two questions
//! cheaply: which keys are hottest right now, and whether a given key is one
//! of them. Per-key state is bounded by `top_n` per shard; frequencies are
//! approximate (see [`tracker`] for the trade-off).
//!
//! ## Quick Start
//!
//! ```
//! use hotspot::HotspotTracker;
//!
//! let tracker = HotspotTracker::new(2, 4).unwrap();
//! for key in ["img/1", "img/2", "img/1", "img/3", "img/1", "img/2"] {
//!     tracker.record(key);
//! }
//! assert!(tracker.is_hotspot("img/1"));
//! assert!(tracker.hotspots().len() <= 2);
//! ```
//!
//! ## Modules
//!
//! - [`ds`]: the bounded top-N store, its slot arena and the shard selector
//! - [`tracker`]: the sharded tracker and cross-shard aggregation
//! - [`builder`]: tracker configuration
//! - [`traits`]: read/write seams for request-path code
//! - [`error`]: configuration and lifecycle errors
//! - `metrics` (feature `metrics`): tracker counters

pub mod builder;
pub mod ds;
pub mod error;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod prelude;
mod snapshot;
pub mod tracker;
pub mod traits;

pub use builder::TrackerBuilder;
pub use error::{ConfigError, TrackerError};
pub use tracker::HotspotTracker;
