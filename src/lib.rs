//! heapcache: cache eviction policies built on an indexed binary heap.
//!
//! Three policies share one data structure, [`IndexedHeap`](ds::IndexedHeap),
//! a min-heap whose items know their own array position so any entry can be
//! re-prioritised or removed in O(log n):
//!
//! - [`GreedyDualCache`]: cost-aware eviction with a monotonic virtual clock.
//! - [`AgingLfuCache`]: frequency counting with per-epoch exponential decay.
//! - [`LearnedLruCache`]: LRU shifted by a perceptron's idle-time prediction
//!   over hashed n-grams of the key.
//!
//! No cache enforces a capacity. Call `remove_oldest` when your own size
//! budget is exceeded:
//!
//! ```
//! use heapcache::prelude::*;
//!
//! let mut cache = GreedyDualCache::new();
//! for (i, key) in ["a", "b", "c", "d"].into_iter().enumerate() {
//!     cache.add(key, i, (i + 1) as f64);
//!     if cache.len() > 2 {
//!         cache.remove_oldest();
//!     }
//! }
//! assert_eq!(cache.len(), 2);
//! ```
//!
//! Caches are single-threaded; share one behind a mutex.

pub mod builder;
pub mod ds;
pub mod error;
pub mod listener;
pub mod model;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;

pub use crate::ds::{IndexedHeap, SlotArena, SlotId};
#[cfg(feature = "metrics")]
pub use crate::metrics::snapshot::CacheMetricsSnapshot;
pub use crate::policy::aging_lfu::AgingLfuCache;
pub use crate::policy::greedy_dual::GreedyDualCache;
pub use crate::policy::learned_lru::LearnedLruCache;
