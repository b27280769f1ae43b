//! Unified cache builder for the heap-backed policies.
//!
//! Picks a policy at runtime and hides which concrete cache sits behind the
//! [`Cache`] wrapper.
//!
//! ## Example
//!
//! ```rust
//! use heapcache::builder::{CacheBuilder, CachePolicy};
//!
//! let mut cache = CacheBuilder::new().build::<String, u64>(CachePolicy::GreedyDual);
//! cache.add("hello".to_string(), 1, 3.0);
//! assert_eq!(cache.get(&"hello".to_string()), Some(&1));
//! ```

use std::hash::Hash;

use crate::error::{ConfigError, InvariantError};
use crate::listener::EvictionListener;
use crate::policy::aging_lfu::AgingLfuCache;
use crate::policy::greedy_dual::GreedyDualCache;
use crate::policy::learned_lru::LearnedLruCache;
use crate::traits::{CoreCache, CostAwareCache, EvictingCache, MutableCache};

/// Available eviction policies.
#[derive(Debug, Clone, PartialEq)]
pub enum CachePolicy {
    /// GreedyDual-Size: `clock + cost`, clock advanced on eviction.
    GreedyDual,
    /// Time-decayed LFU with decay factor `alpha` in `(0, 1)` and initial epoch length `limit`.
    AgingLfu { alpha: f64, limit: u64 },
    /// LRU shifted by a perceptron's idle-time prediction over `model_size` weights.
    LearnedLru { model_size: usize },
}

impl CachePolicy {
    pub fn name(&self) -> &'static str {
        match self {
            CachePolicy::GreedyDual => "greedy_dual",
            CachePolicy::AgingLfu { .. } => "aging_lfu",
            CachePolicy::LearnedLru { .. } => "learned_lru",
        }
    }
}

/// Unified cache wrapper that provides a consistent API regardless of policy.
///
/// `add` takes a cost for every policy; LearnedLRU ignores it.
#[derive(Debug)]
pub struct Cache<K, V> {
    policy: CachePolicy,
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V> {
    GreedyDual(GreedyDualCache<K, V>),
    AgingLfu(AgingLfuCache<K, V>),
    LearnedLru(LearnedLruCache<K, V>),
}

macro_rules! dispatch {
    ($self:expr, $cache:ident => $body:expr) => {
        match $self {
            CacheInner::GreedyDual($cache) => $body,
            CacheInner::AgingLfu($cache) => $body,
            CacheInner::LearnedLru($cache) => $body,
        }
    };
}

impl<K, V> Cache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    pub fn add(&mut self, key: K, value: V, cost: f64) {
        match &mut self.inner {
            CacheInner::GreedyDual(gd) => gd.add(key, value, cost),
            CacheInner::AgingLfu(lfu) => lfu.add(key, value, cost),
            CacheInner::LearnedLru(lru) => lru.add(key, value),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        dispatch!(&mut self.inner, c => c.get(key))
    }

    pub fn contains(&self, key: &K) -> bool {
        dispatch!(&self.inner, c => c.contains(key))
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        dispatch!(&mut self.inner, c => c.remove(key))
    }

    pub fn remove_oldest(&mut self) -> Option<(K, V)> {
        dispatch!(&mut self.inner, c => c.remove_oldest())
    }

    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        dispatch!(&self.inner, c => c.peek_oldest())
    }

    pub fn len(&self) -> usize {
        dispatch!(&self.inner, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        dispatch!(&mut self.inner, c => c.clear())
    }

    pub fn set_eviction_listener<L>(&mut self, listener: L)
    where
        L: EvictionListener<K, V> + 'static,
    {
        dispatch!(&mut self.inner, c => c.set_eviction_listener(listener))
    }

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        dispatch!(&self.inner, c => c.check_invariants())
    }

    /// Name of the policy behind this cache.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Policy and parameters this cache was built with.
    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }
}

impl<K, V> CoreCache<K, V> for Cache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) {
        self.add(key, value, 1.0);
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        Cache::get(self, key)
    }

    fn contains(&self, key: &K) -> bool {
        Cache::contains(self, key)
    }

    fn len(&self) -> usize {
        Cache::len(self)
    }

    fn clear(&mut self) {
        Cache::clear(self);
    }
}

impl<K, V> MutableCache<K, V> for Cache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        Cache::remove(self, key)
    }
}

impl<K, V> EvictingCache<K, V> for Cache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn remove_oldest(&mut self) -> Option<(K, V)> {
        Cache::remove_oldest(self)
    }

    fn peek_oldest(&self) -> Option<(&K, &V)> {
        Cache::peek_oldest(self)
    }
}

impl<K, V> CostAwareCache<K, V> for Cache<K, V>
where
    K: AsRef<[u8]> + Eq + Hash + Clone,
{
    fn insert_with_cost(&mut self, key: K, value: V, cost: f64) {
        self.add(key, value, cost);
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    capacity_hint: usize,
}

impl CacheBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocates room for `capacity` entries. The cache still grows without bound.
    pub fn capacity_hint(mut self, capacity: usize) -> Self {
        self.capacity_hint = capacity;
        self
    }

    /// Build a cache with the specified policy.
    ///
    /// # Panics
    ///
    /// Panics if the policy parameters are invalid; see [`try_build`](Self::try_build).
    ///
    /// # Example
    ///
    /// ```rust
    /// use heapcache::builder::{CacheBuilder, CachePolicy};
    ///
    /// let lfu = CacheBuilder::new().build::<&str, u32>(CachePolicy::AgingLfu { alpha: 0.99, limit: 1000 });
    /// let lru = CacheBuilder::new()
    ///     .capacity_hint(1024)
    ///     .build::<Vec<u8>, u32>(CachePolicy::LearnedLru { model_size: 4096 });
    /// assert_eq!(lfu.policy_name(), "aging_lfu");
    /// assert!(lru.is_empty());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Cache<K, V>
    where
        K: AsRef<[u8]> + Eq + Hash + Clone,
    {
        match self.try_build(policy) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    /// Build a cache, returning an error for out-of-range policy parameters.
    pub fn try_build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: AsRef<[u8]> + Eq + Hash + Clone,
    {
        let inner = match &policy {
            CachePolicy::GreedyDual => {
                CacheInner::GreedyDual(GreedyDualCache::with_capacity(self.capacity_hint))
            },
            CachePolicy::AgingLfu { alpha, limit } => CacheInner::AgingLfu(
                AgingLfuCache::try_with_capacity(*alpha, *limit, self.capacity_hint)?,
            ),
            CachePolicy::LearnedLru { model_size } => CacheInner::LearnedLru(
                LearnedLruCache::try_with_capacity(*model_size, self.capacity_hint)?,
            ),
        };
        let cache = Cache { policy, inner };
        tracing::debug!(
            policy = cache.policy_name(),
            capacity_hint = self.capacity_hint,
            "[builder]: cache built"
        );
        Ok(cache)
    }
}
