pub use crate::builder::{DEFAULT_SHARD_COUNT, TrackerBuilder};
pub use crate::ds::{Admission, ShardSelector, TopNStore};
pub use crate::error::{ConfigError, InvariantError, TrackerError};
#[cfg(feature = "metrics")]
pub use crate::metrics::TrackerMetricsSnapshot;
pub use crate::tracker::HotspotTracker;
pub use crate::traits::{ConcurrentHotspots, HotspotRecorder, HotspotView};
