//! # Cache Trait Hierarchy
//!
//! Every policy in this crate exposes the same caller-facing contract. The
//! traits below let code be written once against that contract and run over
//! any of the heap-backed policies.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌─────────────────────────────────────────┐
//!                 │            CoreCache<K, V>              │
//!                 │                                         │
//!                 │  insert(&mut, K, V)                     │
//!                 │  get(&mut, &K) → Option<&V>             │
//!                 │  contains(&, &K) → bool                 │
//!                 │  len(&) → usize                         │
//!                 │  is_empty(&) → bool                     │
//!                 │  clear(&mut)                            │
//!                 └──────────────────┬──────────────────────┘
//!                                    │
//!                                    ▼
//!                 ┌─────────────────────────────────────────┐
//!                 │          MutableCache<K, V>             │
//!                 │  remove(&mut, &K) → Option<V>           │
//!                 └──────────────────┬──────────────────────┘
//!                                    │
//!                                    ▼
//!                 ┌─────────────────────────────────────────┐
//!                 │          EvictingCache<K, V>            │
//!                 │  remove_oldest(&mut) → Option<(K, V)>   │
//!                 │  peek_oldest(&) → Option<(&K, &V)>      │
//!                 └──────────────────┬──────────────────────┘
//!                                    │
//!                                    ▼
//!                 ┌─────────────────────────────────────────┐
//!                 │         CostAwareCache<K, V>            │
//!                 │  insert_with_cost(&mut, K, V, f64)      │
//!                 └─────────────────────────────────────────┘
//! ```
//!
//! | Policy             | CoreCache | MutableCache | EvictingCache | CostAwareCache |
//! |--------------------|-----------|--------------|---------------|----------------|
//! | `GreedyDualCache`  | ✅        | ✅           | ✅            | ✅             |
//! | `AgingLfuCache`    | ✅        | ✅           | ✅            | ✅             |
//! | `LearnedLruCache`  | ✅        | ✅           | ✅            | ❌             |
//!
//! ## Capacity
//!
//! None of the caches carries a maximum size. Capacity enforcement is the
//! caller's job: check [`CoreCache::len`] and call
//! [`EvictingCache::remove_oldest`] when full.
//!
//! ```
//! use heapcache::traits::{CoreCache, EvictingCache};
//! use heapcache::policy::greedy_dual::GreedyDualCache;
//!
//! fn admit<C: EvictingCache<u64, String>>(cache: &mut C, cap: usize, key: u64, value: String) {
//!     cache.insert(key, value);
//!     while cache.len() > cap {
//!         cache.remove_oldest();
//!     }
//! }
//!
//! let mut cache = GreedyDualCache::new();
//! for key in 0..10 {
//!     admit(&mut cache, 4, key, key.to_string());
//! }
//! assert_eq!(cache.len(), 4);
//! ```
//!
//! ## Thread Safety
//!
//! No cache here is thread-safe. Share one behind an external lock
//! (`Mutex<C>`); every operation runs to completion on the calling thread.

/// Operations every policy supports.
pub trait CoreCache<K, V> {
    /// Inserts `key`, or re-prioritises it if already resident.
    ///
    /// Cost-aware policies use a unit cost. Whether an existing key's value is
    /// overwritten is policy-specific; see each policy's `add`.
    fn insert(&mut self, key: K, value: V);

    /// Looks up `key`, updating its priority on a hit.
    ///
    /// `None` is the "not found" signal; lookups never fail otherwise.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Checks residency without touching priorities or operation counters.
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every entry, notifying the eviction listener for each.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes `key`. Absent keys are a silent no-op returning `None`.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes several keys, returning results in input order.
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|k| self.remove(k)).collect()
    }
}

/// Caches that evict in priority order.
pub trait EvictingCache<K, V>: MutableCache<K, V> {
    /// Evicts the minimum-priority entry. `None` on an empty cache.
    fn remove_oldest(&mut self) -> Option<(K, V)>;

    /// Returns the entry `remove_oldest` would evict, without side effects.
    fn peek_oldest(&self) -> Option<(&K, &V)>;
}

/// Caches whose priorities depend on a per-entry cost or weight.
pub trait CostAwareCache<K, V>: EvictingCache<K, V> {
    fn insert_with_cost(&mut self, key: K, value: V, cost: f64);
}
