//! # Learned LRU Cache
//!
//! An LRU variant whose priorities are shifted by a learned estimate of how
//! long each entry will stay idle. The estimate comes from a
//! [`Perceptron`] scoring hashed byte n-grams of the key, so keys with similar
//! shapes (`user:17`, `user:42`) share what the model has learned.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                         LearnedLruCache<K, V>                            │
//!   │                                                                          │
//!   │   index: FxHashMap<K, SlotId>      heap: IndexedHeap<Entry, f64>         │
//!   │                                      Entry { key, value, last_use }      │
//!   │                                                                          │
//!   │   operations: u64  (logical clock; +1 per add/get/remove, hit or miss)   │
//!   │                                                                          │
//!   │   model: Perceptron   windows: [3, 5, 7]   features: Vec<i32> (scratch)  │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Priorities
//!
//! ```text
//!   new key:      priority = operations + model.score(features(key))
//!   hit:          target   = operations - entry.last_use      (realized idle time)
//!                 priority = operations + model.update(features(key), target)
//!   eviction:     if head.priority > operations:
//!                     model.update(features(head.key), operations - head.last_use)
//! ```
//!
//! With an untrained model (or keys shorter than every window) the score is
//! `0` and the cache is plain LRU: the minimum priority is the least recently
//! touched entry.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::policy::learned_lru::LearnedLruCache;
//!
//! let mut cache = LearnedLruCache::new(64);
//! cache.add("abc", 1);
//! assert_eq!(cache.get(&"abc"), Some(&1));
//! assert_eq!(cache.get(&"xyz"), None);
//! assert_eq!(cache.len(), 1);
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
use crate::model::{DEFAULT_WINDOWS, Perceptron, extract_into};
use crate::traits::{CoreCache, EvictingCache, MutableCache};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    last_use: u64,
}

/// Perceptron-guided LRU cache. See the module documentation.
pub struct LearnedLruCache<K, V> {
    index: FxHashMap<K, SlotId>,
    heap: IndexedHeap<Entry<K, V>>,
    model: Perceptron,
    windows: Vec<usize>,
    features: Vec<i32>,
    operations: u64,
    listener: ListenerSlot<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

impl<K, V> LearnedLruCache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    /// Creates a cache whose model has `model_size` weights.
    ///
    /// # Panics
    ///
    /// Panics if `model_size` is zero.
    pub fn new(model_size: usize) -> Self {
        Self::with_windows(model_size, &DEFAULT_WINDOWS)
    }

    pub fn try_new(model_size: usize) -> Result<Self, ConfigError> {
        Self::try_with_windows(model_size, &DEFAULT_WINDOWS)
    }

    /// Creates a cache that extracts n-grams of the given byte lengths.
    ///
    /// # Panics
    ///
    /// Panics if `model_size` is zero or `windows` is empty or contains a zero.
    pub fn with_windows(model_size: usize, windows: &[usize]) -> Self {
        match Self::try_with_windows(model_size, windows) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_windows(model_size: usize, windows: &[usize]) -> Result<Self, ConfigError> {
        if windows.is_empty() {
            return Err(ConfigError::new("windows", "at least one window length is required"));
        }
        if windows.contains(&0) {
            return Err(ConfigError::new("windows", "window lengths must be greater than zero"));
        }
        let model = Perceptron::try_new(model_size)?;
        Ok(Self {
            index: FxHashMap::default(),
            heap: IndexedHeap::new(),
            model,
            windows: windows.to_vec(),
            features: Vec::new(),
            operations: 0,
            listener: ListenerSlot::new(),
            #[cfg(feature = "metrics")]
            metrics: CacheMetrics::default(),
        })
    }

    /// [`new`](Self::new) with room pre-allocated for `capacity` entries. Not a size limit.
    pub fn with_capacity(model_size: usize, capacity: usize) -> Self {
        match Self::try_with_capacity(model_size, capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_with_capacity(model_size: usize, capacity: usize) -> Result<Self, ConfigError> {
        let mut cache = Self::try_new(model_size)?;
        cache.index.reserve(capacity);
        cache.heap = IndexedHeap::with_capacity(capacity);
        Ok(cache)
    }

    /// Trains the model on `id`'s realized idle time and moves it to its new priority.
    fn refresh(&mut self, id: SlotId) {
        let Some(item) = self.heap.get(id) else {
            return;
        };
        let entry = item.payload();
        let target = self.operations.saturating_sub(entry.last_use) as f64;
        extract_into(entry.key.as_ref(), &self.windows, &mut self.features);
        let corrected = self.model.update(&self.features, target);

        let priority = clamp_priority(self.operations as f64 + corrected);
        self.heap.update_priority(id, priority);
        if let Some(entry) = self.heap.payload_mut(id) {
            entry.last_use = self.operations;
        }

        tracing::trace!(target, corrected, "[learned lru]: model updated on hit");
        #[cfg(feature = "metrics")]
        {
            self.metrics.record_model_update();
            self.metrics.record_reprioritize();
        }
    }

    /// Inserts `key`, or overwrites the value of a resident key and
    /// re-prioritises it as a hit.
    pub fn add(&mut self, key: K, value: V) {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        self.operations += 1;
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.heap.payload_mut(id) {
                entry.value = value;
            }
            self.refresh(id);
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();
            return;
        }

        extract_into(key.as_ref(), &self.windows, &mut self.features);
        let score = self.model.score(&self.features);
        let priority = clamp_priority(self.operations as f64 + score);
        let id = self.heap.insert(
            Entry {
                key: key.clone(),
                value,
                last_use: self.operations,
            },
            priority,
        );
        self.index.insert(key, id);

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();
    }

    /// Returns the value for `key`, training the model on a hit.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        self.operations += 1;
        let Some(&id) = self.index.get(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        self.refresh(id);

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.heap.get(id).map(|item| &item.payload().value)
    }

    /// Removes `key` without training the model. Absent keys are a no-op.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        self.operations += 1;
        let id = self.index.remove(key)?;
        let entry = self.heap.remove_handle(id)?.into_payload();
        self.listener
            .notify(EvictionReason::Removed, &entry.key, &entry.value);

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(entry.value)
    }

    /// Evicts the minimum-priority entry.
    ///
    /// If the model predicted the entry would stay idle past the current clock,
    /// the model is corrected with the idle time actually realized before the
    /// entry is detached.
    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_evict_call();

        let head = self.heap.head()?;
        let now = self.operations as f64;
        if head.priority() > now {
            let entry = head.payload();
            let target = self.operations.saturating_sub(entry.last_use) as f64;
            extract_into(entry.key.as_ref(), &self.windows, &mut self.features);
            let corrected = self.model.update(&self.features, target);
            tracing::debug!(
                predicted = head.priority(),
                now,
                corrected,
                "[learned lru]: evicted entry outlived its prediction, model corrected"
            );
            #[cfg(feature = "metrics")]
            self.metrics.record_model_update();
        }

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

    /// Logical clock: number of `add`, `get` and `remove` calls so far.
    pub fn operations(&self) -> u64 {
        self.operations
    }

    pub fn priority_of(&self, key: &K) -> Option<f64> {
        let id = self.index.get(key)?;
        self.heap.get(*id).map(|item| item.priority())
    }

    /// Read-only view of the idle-time model.
    pub fn model(&self) -> &Perceptron {
        &self.model
    }

    pub fn windows(&self) -> &[usize] {
        &self.windows
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

    /// Drops every entry, notifying the listener. The model and clock are kept.
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
            if entry.last_use > self.operations {
                return Err(InvariantError::new(format!(
                    "last use {} is ahead of the clock {}",
                    entry.last_use, self.operations
                )));
            }
            if !item.priority().is_well_formed() {
                return Err(InvariantError::new("heap priority is non-finite"));
            }
        }
        Ok(())
    }

    #[cfg(feature = "metrics")]
    pub fn reset_metrics(&mut self) {
        self.metrics = CacheMetrics::default();
    }
}

impl<K, V> fmt::Debug for LearnedLruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LearnedLruCache")
            .field("len", &self.heap.len())
            .field("operations", &self.operations)
            .field("model_size", &self.model.size())
            .field("windows", &self.windows)
            .field("listener", &self.listener)
            .finish_non_exhaustive()
    }
}

impl<K, V> CoreCache<K, V> for LearnedLruCache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) {
        self.add(key, value);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        LearnedLruCache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        LearnedLruCache::contains(self, key)
    }

    fn len(&self) -> usize {
        LearnedLruCache::len(self)
    }

    fn clear(&mut self) {
        LearnedLruCache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for LearnedLruCache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        LearnedLruCache::remove(self, key)
    }
}

impl<K, V> EvictingCache<K, V> for LearnedLruCache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn remove_oldest(&mut self) -> Option<(K, V)> {
        LearnedLruCache::remove_oldest(self)
    }

    fn peek_oldest(&self) -> Option<(&K, &V)> {
        LearnedLruCache::peek_oldest(self)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<CacheMetricsSnapshot> for LearnedLruCache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn snapshot(&self) -> CacheMetricsSnapshot {
        self.metrics.snapshot(self.len())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::model::hash_window;

    #[test]
    fn hit_and_miss() {
        let mut cache = LearnedLruCache::new(64);
        cache.add("abc", "v");
        assert_eq!(cache.get(&"abc"), Some(&"v"));
        assert_eq!(cache.get(&"xyz"), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.operations(), 3);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn short_keys_behave_as_plain_lru() {
        let mut cache = LearnedLruCache::new(16);
        cache.add("a", 1);
        cache.add("b", 2);
        cache.add("c", 3);
        cache.get(&"a");
        assert_eq!(cache.remove_oldest(), Some(("b", 2)));
        assert_eq!(cache.remove_oldest(), Some(("c", 3)));
        assert_eq!(cache.remove_oldest(), Some(("a", 1)));
        assert!(cache.model().weights().iter().all(|w| *w == 0.0));
    }

    #[test]
    fn new_key_priority_is_clock_plus_score() {
        let mut cache = LearnedLruCache::new(8);
        cache.add("abc", ());
        assert_eq!(cache.priority_of(&"abc"), Some(1.0));
    }

    #[test]
    fn hit_trains_model_and_reprioritises() {
        let mut cache = LearnedLruCache::new(8);
        cache.add("abc", ());
        cache.get(&"abc");
        // target 1 > score 0: one unit step down on the single feature.
        assert_eq!(cache.priority_of(&"abc"), Some(1.0));
        let touched: f64 = cache.model().weights().iter().map(|w| w.abs()).sum();
        assert_eq!(touched, 1.0);
        assert_eq!(cache.model().adagrad().iter().sum::<f64>(), 1.0);
    }

    #[test]
    fn add_existing_overwrites_value_without_eviction() {
        let mut cache = LearnedLruCache::new(8);
        let fired = Arc::new(Mutex::new(0usize));
        let sink = Arc::clone(&fired);
        cache.set_eviction_listener(move |_: &&str, _: &u8| *sink.lock().unwrap() += 1);

        cache.add("key", 1);
        cache.add("key", 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"key"), Some(&2));
        assert_eq!(*fired.lock().unwrap(), 0);
    }

    #[test]
    fn eviction_of_overestimated_entry_corrects_model() {
        let probe = |want_positive: bool| {
            (0u8..=255)
                .map(|b| [b'k', b'0', b])
                .find(|key| (hash_window(key) > 0) == want_positive)
                .unwrap()
        };
        let pos = probe(true);
        let neg = probe(false);

        // One shared weight: training `neg` raises the score of `pos`.
        let mut cache = LearnedLruCache::new(1);
        cache.add(neg, ());
        cache.get(&neg);
        assert_eq!(cache.model().weights(), &[1.0]);
        cache.add(pos, ());
        assert_eq!(cache.priority_of(&neg), Some(1.0));
        assert_eq!(cache.priority_of(&pos), Some(4.0));

        // neg sits below the clock: evicted without an update.
        assert_eq!(cache.remove_oldest(), Some((neg, ())));
        assert_eq!(cache.model().adagrad(), &[1.0]);

        // pos was predicted to outlive the clock: one corrective update.
        assert_eq!(cache.remove_oldest(), Some((pos, ())));
        assert_eq!(cache.model().adagrad(), &[2.0]);
        assert_eq!(cache.operations(), 3);
    }

    #[test]
    fn remove_does_not_train() {
        let mut cache = LearnedLruCache::new(8);
        cache.add("abcdef", 1);
        assert_eq!(cache.remove(&"abcdef"), Some(1));
        assert_eq!(cache.remove(&"abcdef"), None);
        assert!(cache.model().adagrad().iter().all(|g| *g == 0.0));
        assert_eq!(cache.operations(), 3);
    }

    #[test]
    fn empty_cache_guards() {
        let mut cache: LearnedLruCache<String, u8> = LearnedLruCache::new(4);
        assert_eq!(cache.remove_oldest(), None);
        assert_eq!(cache.peek_oldest(), None);
        assert_eq!(cache.remove(&"nope".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn custom_windows_change_feature_count() {
        let mut cache = LearnedLruCache::with_windows(32, &[2]);
        assert_eq!(cache.windows(), &[2]);
        cache.add("abcd", ());
        cache.get(&"abcd");
        // three bigrams, one unit step each
        assert_eq!(cache.model().adagrad().iter().sum::<f64>(), 3.0);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let err = LearnedLruCache::<&str, ()>::try_new(0).unwrap_err();
        assert_eq!(err.parameter(), "model_size");
        let err = LearnedLruCache::<&str, ()>::try_with_windows(8, &[]).unwrap_err();
        assert_eq!(err.parameter(), "windows");
        let err = LearnedLruCache::<&str, ()>::try_with_windows(8, &[3, 0]).unwrap_err();
        assert_eq!(err.parameter(), "windows");
    }

    #[test]
    fn clear_keeps_model_and_clock() {
        let mut cache = LearnedLruCache::with_capacity(16, 4);
        cache.add("abcd", 1);
        cache.get(&"abcd");
        let weights = cache.model().weights().to_vec();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.operations(), 2);
        assert_eq!(cache.model().weights(), weights.as_slice());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(String),
            Get(String),
            Remove(String),
            RemoveOldest,
        }

        fn key() -> impl Strategy<Value = String> {
            "[a-c]{1,8}"
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => key().prop_map(Op::Add),
                4 => key().prop_map(Op::Get),
                1 => key().prop_map(Op::Remove),
                2 => Just(Op::RemoveOldest),
            ]
        }

        proptest! {
            /// Property: the index and heap stay in sync and every priority stays finite.
            #[cfg_attr(miri, ignore)]
            #[test]
            fn prop_invariants_hold(
                size in 1usize..32,
                ops in prop::collection::vec(op_strategy(), 0..200)
            ) {
                let mut cache: LearnedLruCache<String, usize> = LearnedLruCache::new(size);
                for (i, op) in ops.into_iter().enumerate() {
                    match op {
                        Op::Add(k) => cache.add(k, i),
                        Op::Get(k) => { cache.get(&k); },
                        Op::Remove(k) => { cache.remove(&k); },
                        Op::RemoveOldest => { cache.remove_oldest(); },
                    }
                    prop_assert!(cache.check_invariants().is_ok());
                }
            }
        }
    }
}
