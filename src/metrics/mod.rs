//! Per-cache operation counters, compiled only with the `metrics` feature.
//!
//! Every policy owns one [`CacheMetrics`](metrics_impl::CacheMetrics) and
//! implements [`MetricsSnapshotProvider<CacheMetricsSnapshot>`](traits::MetricsSnapshotProvider).
//!
//! ```
//! use heapcache::metrics::snapshot::CacheMetricsSnapshot;
//! use heapcache::metrics::traits::MetricsSnapshotProvider;
//! use heapcache::policy::greedy_dual::GreedyDualCache;
//!
//! let mut cache = GreedyDualCache::new();
//! cache.add("a", 1, 2.0);
//! cache.get(&"a");
//! cache.get(&"b");
//!
//! let snap: CacheMetricsSnapshot = cache.snapshot();
//! assert_eq!(snap.get_hits, 1);
//! assert_eq!(snap.get_misses, 1);
//! assert_eq!(snap.cache_len, 1);
//! ```

pub mod cell;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;

pub use metrics_impl::CacheMetrics;
pub use snapshot::CacheMetricsSnapshot;
pub use traits::MetricsSnapshotProvider;
