//! # GreedyDual-Size Cache
//!
//! Cost-aware eviction over an [`IndexedHeap`]. Each entry is prioritised at
//! `clock + cost`; evicting the minimum advances `clock` to the evicted
//! priority, so the cost of everything still resident is "amortised" against
//! the cost already paid to throw entries out.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                      GreedyDualCache<K, V>                           │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>        heap: IndexedHeap<Entry, f64>   │
//!   │   ┌──────────┬─────────┐             ┌───────────────────────────┐   │
//!   │   │ "img/a"  │  #0  ───┼────────────►│ #0 { key, value, cost: 5 }│   │
//!   │   │ "img/b"  │  #1  ───┼────────────►│ #1 { key, value, cost: 1 }│   │
//!   │   └──────────┴─────────┘             └───────────────────────────┘   │
//!   │                                                                      │
//!   │   clock: f64   (0 at start, only ever moves forward)                 │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Clock Walkthrough
//!
//! ```text
//!   add("a", cost 5)      clock 0    a:5
//!   add("b", cost 1)      clock 0    a:5  b:1
//!   remove_oldest()       clock 1    a:5                 (b evicted at 1)
//!   get("a")              clock 1    a:6                 (1 + 5)
//!   add("c", cost 2)      clock 1    a:6  c:3
//!   remove_oldest()       clock 3    a:6                 (c evicted at 3)
//! ```
//!
//! Every live priority is `>= clock`: entries enter at `clock + cost` with
//! `cost >= 0`, and the clock only ever jumps to the current minimum.
//!
//! ## Core Operations
//!
//! | Method            | Complexity | Description                                  |
//! |-------------------|------------|----------------------------------------------|
//! | `add(k, v, cost)` | O(log n)   | Insert at `clock + cost`; duplicates ignored |
//! | `get(&k)`         | O(log n)   | Re-prioritise to `clock + cost`              |
//! | `remove(&k)`      | O(log n)   | Detach; clock untouched                      |
//! | `remove_oldest()` | O(log n)   | Pop minimum, advance clock                   |
//! | `peek_oldest()`   | O(1)       | Minimum without side effects                 |
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::greedy_dual::GreedyDualCache;
//!
//! let mut cache = GreedyDualCache::new();
//! cache.add("a", "va", 5.0);
//! cache.add("b", "vb", 1.0);
//!
//! assert_eq!(cache.remove_oldest(), Some(("b", "vb")));
//! assert_eq!(cache.clock(), 1.0);
//!
//! assert_eq!(cache.get(&"a"), Some(&"va"));
//! assert_eq!(cache.priority_of(&"a"), Some(6.0));
//! ```
//!
//! ## Thread Safety
//!
//! Not thread-safe; wrap in a `Mutex` for shared access.

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IndexedHeap, SlotId, clamp_priority};
use crate::error::InvariantError;
use crate::listener::{EvictionListener, EvictionReason, ListenerSlot};
#[cfg(feature = "metrics")]
use crate::metrics::{
    metrics_impl::CacheMetrics,
    snapshot::CacheMetricsSnapshot,
    traits::{
        CoreMetricsRecorder, HeapPolicyMetricsReadRecorder, HeapPolicyMetricsRecorder,
        MetricsSnapshotProvider,
    },
};
use crate::policy::sanitize_cost;
use crate::traits::{CoreCache, CostAwareCache, EvictingCache, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    cost: f64,
}

/// GreedyDual-Size cache. See the module documentation.
pub struct GreedyDualCache<K, V> {
    index: FxHashMap<K, SlotId>,
    heap: IndexedHeap<Entry<K, V>>,
    clock: f64,
    listener: ListenerSlot<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-allocates room for `capacity` entries. Not a size limit.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: IndexedHeap::with_capacity(capacity),
            clock: 0.0,
            listener: ListenerSlot::new(),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        }
    }

    /// Inserts `key` at priority `clock + cost`.
    ///
    /// A key that is already resident is left untouched (value, cost and
    /// priority) and a warning is logged. Degenerate costs are sanitised:
    /// NaN and negative costs become `0`, `+∞` becomes `f64::MAX`.
    pub fn add(&mut self, key: K, value: V, cost: f64) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if self.index.contains_key(&key) {
            tracing::warn!("[greedy dual]: add ignored, key is already resident");
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_rejected();
            return;
        }

        let cost = sanitize_cost(cost);
        let priority = clamp_priority(self.clock + cost);
        let id = self.heap.insert(
            Entry {
                key: key.clone(),
                value,
                cost,
            },
            priority,
        );
        self.index.insert(key, id);

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Returns the value for `key`, refreshing its priority to `clock + cost`.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        let cost = self.heap.get(id)?.payload().cost;
        self.heap
            .update_priority(id, clamp_priority(self.clock + cost));

        #[cfg(feature = "metrics")]
        {
            self.metrics.record_get_hit();
            self.metrics.record_reprioritize();
        }

        self.heap.get(id).map(|item| &item.payload().value)
    }

    /// Removes `key` without moving the clock. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let id = self.index.remove(key)?;
        let entry = self.heap.remove_handle(id)?.into_payload();
        self.listener
            .notify(EvictionReason::Removed, &entry.key, &entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(entry.value)
    }

    /// Evicts the minimum-priority entry and advances the clock to its priority.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let (entry, priority) = self.heap.pop()?.into_parts();
        debug_assert!(
            priority >= self.clock,
            "live priority {priority} fell below clock {}",
            self.clock
        );
        if priority > self.clock {
            self.clock = priority;
            #[cfg(feature = "metrics")]
            self.metrics.record_clock_advance();
        }
        self.index.remove(&entry.key);

        tracing::trace!(clock = self.clock, "[greedy dual]: evicted minimum");
        self.listener
            .notify(EvictionReason::Evicted, &entry.key, &entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        Some((entry.key, entry.value))
    }

    /// Returns the entry `remove_oldest` would evict.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_oldest_call();

        let item = self.heap.head()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_oldest_found();

        Some((&item.payload().key, &item.payload().value))
    }

    /// Current virtual clock: the priority of the last evicted entry.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Sanitised cost recorded for `key`.
    pub fn cost_of(&self, key: &K) -> Option<f64> {
        let id = self.index.get(key)?;
        self.heap.get(*id).map(|item| item.payload().cost)
    }

    pub fn priority_of(&self, key: &K) -> Option<f64> {
        let id = self.index.get(key)?;
        self.heap.get(*id).map(|item| item.priority())
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drops every entry, notifying the listener with [`EvictionReason::Cleared`].
    ///
    /// The clock keeps its value so it stays monotonic over the cache's lifetime.
    pub fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        if self.listener.is_set() {
            let drained = std::mem::take(&mut self.heap);
            for (_, item) in drained.iter() {
                let entry = item.payload();
                self.listener
                    .notify(EvictionReason::Cleared, &entry.key, &entry.value);
            }
        } else {
            self.heap.clear();
        }
    }

    /// Installs the listener called for every detached entry, replacing any previous one.
    pub fn set_eviction_listener<L>(&mut self, listener: L)
    where
        L: EvictionListener<K, V> + 'static,
    {
        self.listener.set(Box::new(listener));
    }

    pub fn take_eviction_listener(&mut self) -> Option<Box<dyn EvictionListener<K, V>>> {
        self.listener.take()
    }

    /// Verifies heap bookkeeping, the key index ⟷ heap bijection and
    /// `priority >= clock` for every live entry.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check_invariants()?;
        if self.index.len() != self.heap.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but heap holds {} entries",
                self.index.len(),
                self.heap.len()
            )));
        }
        for (key, &id) in &self.index {
            let item = self
                .heap
                .get(id)
                .ok_or_else(|| InvariantError::new("index references a stale heap handle"))?;
            if item.payload().key != *key {
                return Err(InvariantError::new(
                    "index key does not match the key stored in its heap entry",
                ));
            }
            if !item.priority().is_finite() || item.priority() < self.clock {
                return Err(InvariantError::new(format!(
                    "priority {} is non-finite or below clock {}",
                    item.priority(),
                    self.clock
                )));
            }
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = CacheMetrics::default();
    }
}

impl<K, V> Default for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for GreedyDualCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreedyDualCache")
            .field("len", &self.heap.len())
            .field("clock", &self.clock)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl<K, V> CoreCache<K, V> for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Adds with unit cost.
    fn insert(&mut self, key: K, value: V) {
        self.add(key, value, 1.0);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        GreedyDualCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        GreedyDualCache::contains(self, key)
    }

    fn len(&self) -> usize {
        GreedyDualCache::len(self)
    }

    fn clear(&mut self) {
        GreedyDualCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        GreedyDualCache::remove(self, key)
    }
}

impl<K, V> EvictingCache<K, V> for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove_oldest(&mut self) -> Option<(K, V)> {
        GreedyDualCache::remove_oldest(self)
    }

    fn peek_oldest(&self) -> Option<(&K, &V)> {
        GreedyDualCache::peek_oldest(self)
    }
}

impl<K, V> CostAwareCache<K, V> for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert_with_cost(&mut self, key: K, value: V, cost: f64) {
        self.add(key, value, cost);
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for GreedyDualCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len())
    }
}
