//! # Aging LFU Cache
//!
//! Frequency-based eviction where the frequency estimate decays over time, so a
//! burst of old accesses cannot pin an entry forever.
//!
//! ## Architecture
//!
//! ```text
//!   ┌────────────────────────────────────────────────────────────────────────┐
//!   │                        AgingLfuCache<K, V>                             │
//!   │                                                                        │
//!   │   index: FxHashMap<K, SlotId>                                          │
//!   │                                                                        │
//!   │   heap: IndexedHeap<Entry, EpochScore>                                 │
//!   │     Entry { key, value, weight, usage, epoch }                         │
//!   │     EpochScore { epoch, score = weight × usage }                       │
//!   │                                                                        │
//!   │   clock: AgingClock { alpha, limit, operations, epoch }                │
//!   └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Epochs
//!
//! Every `add`, `get` (hit or miss) and `remove` is one operation. When
//! `operations` reaches `limit`, the epoch rolls: `operations` returns to 0,
//! `epoch` increments and `limit` grows by one. The slowly widening epoch keeps
//! the per-operation weight `alpha^-operations` from exploding on long runs.
//!
//! ```text
//!   touch(entry):
//!     if entry.epoch != epoch:
//!         entry.usage *= alpha ^ (limit × (epoch - entry.epoch))
//!         entry.epoch  = epoch
//!     entry.usage += (1 - alpha) / alpha ^ operations
//! ```
//!
//! Accumulators only decay when touched. The heap orders first by the epoch at
//! which an entry was last touched and then by score, so an entry untouched
//! since an older epoch always sorts ahead of one touched in the current epoch
//! even though its stored score was never decayed.
//!
//! ## Numeric Bounds
//!
//! Usage is capped at [`MAX_USAGE`] and scores pass through
//! [`clamp_priority`], so neither extreme epoch gaps nor long epochs can push
//! `NaN` or infinities into the heap.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::aging_lfu::AgingLfuCache;
//!
//! let mut cache = AgingLfuCache::new(0.99, 1000);
//! cache.add("hot", 1, 1.0);
//! cache.add("cold", 2, 1.0);
//! for _ in 0..5 {
//!     cache.get(&"hot");
//! }
//! assert_eq!(cache.remove_oldest(), Some(("cold", 2)));
//! ```

use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;

use crate::ds::{IndexedHeap, Priority, SlotId, clamp_priority};
use crate::error::{ConfigError, InvariantError};
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

/// Upper bound on a usage accumulator.
pub const MAX_USAGE: f64 = 1e300;

/// Heap priority: last-touched epoch first, then `weight × usage`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochScore {
    pub epoch: u64,
    pub score: f64,
}

impl Priority for EpochScore {
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        if self.epoch != other.epoch {
            self.epoch < other.epoch
        } else {
            self.score.total_cmp(&other.score).is_lt()
        }
    }

    fn is_well_formed(&self) -> bool {
        self.score.is_finite()
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    weight: f64,
    usage: f64,
    epoch: u64,
}

impl<K, V> Entry<K, V> {
    fn priority(&self) -> EpochScore {
        EpochScore {
            epoch: self.epoch,
            score: clamp_priority(self.weight * self.usage),
        }
    }
}

/// Operation counter and epoch state.
#[derive(Debug, Clone, Copy)]
struct AgingClock {
    alpha: f64,
    limit: u64,
    operations: u64,
    epoch: u64,
}

impl AgingClock {
    /// Counts one operation. Returns `true` if an epoch boundary was crossed.
    fn tick(&mut self) -> bool {
        self.operations += 1;
        if self.operations >= self.limit {
            self.operations = 0;
            self.limit += 1;
            self.epoch += 1;
            return true;
        }
        false
    }

    /// Decays `entry` to the current epoch and adds this operation's weight.
    fn accumulate<K, V>(&self, entry: &mut Entry<K, V>) {
        if entry.epoch != self.epoch {
            let elapsed = self.epoch.abs_diff(entry.epoch) as f64;
            entry.usage *= self.alpha.powf(self.limit as f64 * elapsed);
            entry.epoch = self.epoch;
        }
        let increment = (1.0 - self.alpha) / self.alpha.powf(self.operations as f64);
        entry.usage = (entry.usage + increment).min(MAX_USAGE);
    }
}

/// Time-decayed LFU cache. See the module documentation.
pub struct AgingLfuCache<K, V> {
    index: FxHashMap<K, SlotId>,
    heap: IndexedHeap<Entry<K, V>, EpochScore>,
    clock: AgingClock,
    listener: ListenerSlot<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a cache with decay factor `alpha` and initial epoch length `limit`.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in `(0, 1)` or `limit` is zero.
    pub fn new(alpha: f64, limit: u64) -> Self {
        match Self::try_new(alpha, limit) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(alpha: f64, limit: u64) -> Result<Self, ConfigError> {
        Self::try_with_capacity(alpha, limit, 0)
    }

    /// [`new`](Self::new) with room pre-allocated for `capacity` entries. Not a size limit.
    pub fn with_capacity(alpha: f64, limit: u64, capacity: usize) -> Self {
        match Self::try_with_capacity(alpha, limit, capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// [`try_new`](Self::try_new) with room pre-allocated for `capacity` entries.
    pub fn try_with_capacity(alpha: f64, limit: u64, capacity: usize) -> Result<Self, ConfigError> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::new(
                "alpha",
                format!("must be in (0, 1), got {alpha}"),
            ));
        }
        if limit == 0 {
            return Err(ConfigError::new("limit", "must be greater than zero"));
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            heap: IndexedHeap::with_capacity(capacity),
            clock: AgingClock {
                alpha,
                limit,
                operations: 0,
                epoch: 0,
            },
            listener: ListenerSlot::new(),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    fn tick(&mut self) {
        if self.clock.tick() {
            tracing::debug!(
                epoch = self.clock.epoch,
                limit = self.clock.limit,
                "[aging lfu]: epoch rolled"
            );
            #[cfg(feature = "metrics")]
            self.metrics.record_epoch_roll();
        }
    }

    /// Counts one operation on `id` and moves it to its new priority.
    fn touch(&mut self, id: SlotId) {
        self.tick();
        let Some(entry) = self.heap.payload_mut(id) else {
            return;
        };
        self.clock.accumulate(entry);
        let priority = entry.priority();
        self.heap.update_priority(id, priority);

        #[cfg(feature = "metrics")]
        self.metrics.record_reprioritize();
    }

    /// Inserts `key` or, if resident, overwrites its value and weight and
    /// counts one more use.
    ///
    /// Weights are sanitised like GreedyDual costs.
    pub fn add(&mut self, key: K, value: V, weight: f64) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        let weight = sanitize_cost(weight);
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.heap.payload_mut(id) {
                entry.value = value;
                entry.weight = weight;
            }
            self.touch(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        self.tick();
        let mut entry = Entry {
            key: key.clone(),
            value,
            weight,
            usage: 0.0,
            epoch: self.clock.epoch,
        };
        self.clock.accumulate(&mut entry);
        let priority = entry.priority();
        let id = self.heap.insert(entry, priority);
        self.index.insert(key, id);

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Returns the value for `key`, counting a use. Misses still count as an operation.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let Some(&id) = self.index.get(key) else {
            self.tick();
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        self.touch(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.heap.get(id).map(|item| &item.payload().value)
    }

    /// Counts an operation, then removes `key` if present.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        self.tick();
        let id = self.index.remove(key)?;
        let entry = self.heap.remove_handle(id)?.into_payload();
        self.listener
            .notify(EvictionReason::Removed, &entry.key, &entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(entry.value)
    }

    /// Evicts the minimum-priority entry. Does not count as an operation.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let entry = self.heap.pop()?.into_payload();
        self.index.remove(&entry.key);
        self.listener
            .notify(EvictionReason::Evicted, &entry.key, &entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_evicted_entry();

        Some((entry.key, entry.value))
    }

    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_oldest_call();

        let item = self.heap.head()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_oldest_found();

        Some((&item.payload().key, &item.payload().value))
    }

    pub fn alpha(&self) -> f64 {
        self.clock.alpha
    }

    /// Current epoch length. Starts at the constructor's `limit` and grows by
    /// one per epoch.
    pub fn limit(&self) -> u64 {
        self.clock.limit
    }

    pub fn epoch(&self) -> u64 {
        self.clock.epoch
    }

    /// Operations counted in the current epoch.
    pub fn operations(&self) -> u64 {
        self.clock.operations
    }

    /// Usage accumulator as of the entry's last touch (not decayed to the current epoch).
    pub fn usage_of(&self, key: &K) -> Option<f64> {
        let id = self.index.get(key)?;
        self.heap.get(*id).map(|item| item.payload().usage)
    }

    pub fn priority_of(&self, key: &K) -> Option<EpochScore> {
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

    /// Drops every entry, notifying the listener. Epoch state is kept.
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

    pub fn set_eviction_listener<L>(&mut self, listener: L)
    where
        L: EvictionListener<K, V> + 'static,
    {
        self.listener.set(Box::new(listener));
    }

    pub fn take_eviction_listener(&mut self) -> Option<Box<dyn EvictionListener<K, V>>> {
        self.listener.take()
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.heap.check_invariants()?;
        if self.clock.operations >= self.clock.limit {
            return Err(InvariantError::new(format!(
                "operations {} reached limit {} without an epoch roll",
                self.clock.operations, self.clock.limit
            )));
        }
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
            let entry = item.payload();
            if entry.key != *key {
                return Err(InvariantError::new(
                    "index key does not match the key stored in its heap entry",
                ));
            }
            if !(entry.usage.is_finite() && entry.usage >= 0.0) {
                return Err(InvariantError::new(format!(
                    "usage accumulator {} is negative or non-finite",
                    entry.usage
                )));
            }
            if entry.epoch > self.clock.epoch || item.priority().epoch != entry.epoch {
                return Err(InvariantError::new(format!(
                    "entry epoch {} disagrees with heap epoch {} or current epoch {}",
                    entry.epoch,
                    item.priority().epoch,
                    self.clock.epoch
                )));
            }
            if !item.priority().is_well_formed() {
                return Err(InvariantError::new("heap score is non-finite"));
            }
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = CacheMetrics::default();
    }
}

impl<K, V> fmt::Debug for AgingLfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgingLfuCache")
            .field("len", &self.heap.len())
            .field("alpha", &self.clock.alpha)
            .field("limit", &self.clock.limit)
            .field("operations", &self.clock.operations)
            .field("epoch", &self.clock.epoch)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl<K, V> CoreCache<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Adds with unit weight.
    fn insert(&mut self, key: K, value: V) {
        self.add(key, value, 1.0);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        AgingLfuCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        AgingLfuCache::contains(self, key)
    }

    fn len(&self) -> usize {
        AgingLfuCache::len(self)
    }

    fn clear(&mut self) {
        AgingLfuCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        AgingLfuCache::remove(self, key)
    }
}

impl<K, V> EvictingCache<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove_oldest(&mut self) -> Option<(K, V)> {
        AgingLfuCache::remove_oldest(self)
    }

    fn peek_oldest(&self) -> Option<(&K, &V)> {
        AgingLfuCache::peek_oldest(self)
    }
}

impl<K, V> CostAwareCache<K, V> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert_with_cost(&mut self, key: K, value: V, cost: f64) {
        self.add(key, value, cost);
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for AgingLfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len())
    }
}
