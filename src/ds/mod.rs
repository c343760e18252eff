pub mod shard;
pub mod slot_arena;
pub mod top_n;

pub use shard::ShardSelector;
pub use slot_arena::{SlotArena, SlotId};
pub use top_n::{Admission, TopNStore};
