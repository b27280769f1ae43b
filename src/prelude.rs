pub use crate::builder::{Cache, CacheBuilder, CachePolicy};
pub use crate::ds::{IndexedHeap, SlotId, clamp_priority};
pub use crate::error::{ConfigError, InvariantError};
pub use crate::listener::{EvictionListener, EvictionReason};
pub use crate::model::Perceptron;
pub use crate::policy::aging_lfu::AgingLfuCache;
pub use crate::policy::greedy_dual::GreedyDualCache;
pub use crate::policy::learned_lru::LearnedLruCache;
pub use crate::traits::{CoreCache, CostAwareCache, EvictingCache, MutableCache};
