//! Eviction notifications.
//!
//! A cache holds at most one [`EvictionListener`]. It is called synchronously,
//! on the caller's stack, after the entry has been unlinked from both the heap
//! and the key index. Re-prioritising an existing key (`add` on a resident key,
//! `get`) never notifies.
//!
//! Closures taking `(&K, &V)` are listeners:
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use heapcache::policy::greedy_dual::GreedyDualCache;
//!
//! let evicted = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&evicted);
//!
//! let mut cache = GreedyDualCache::new();
//! cache.set_eviction_listener(move |key: &&'static str, value: &i32| {
//!     sink.lock().unwrap().push((*key, *value));
//! });
//! cache.add("a", 1, 5.0);
//! cache.add("b", 2, 1.0);
//! cache.remove_oldest();
//!
//! assert_eq!(*evicted.lock().unwrap(), vec![("b", 2)]);
//! ```
//!
//! Implement the trait directly to see why an entry left:
//!
//! ```
//! use heapcache::listener::{EvictionListener, EvictionReason};
//!
//! #[derive(Default)]
//! struct Tally {
//!     removed: usize,
//!     evicted: usize,
//! }
//!
//! impl EvictionListener<String, Vec<u8>> for Tally {
//!     fn on_evicted(&mut self, reason: EvictionReason, _key: &String, _value: &Vec<u8>) {
//!         match reason {
//!             EvictionReason::Removed => self.removed += 1,
//!             EvictionReason::Evicted => self.evicted += 1,
//!             EvictionReason::Cleared => {},
//!         }
//!     }
//! }
//! ```

/// Why an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvictionReason {
    /// Explicit `remove(key)`.
    Removed,
    /// Minimum-priority entry dropped by `remove_oldest`.
    Evicted,
    /// Dropped by `clear`.
    Cleared,
}

/// Receives entries after they are detached from a cache.
pub trait EvictionListener<K, V>: Send {
    fn on_evicted(&mut self, reason: EvictionReason, key: &K, value: &V);
}

impl<K, V, F> EvictionListener<K, V> for F
where
    F: FnMut(&K, &V) + Send,
{
    fn on_evicted(&mut self, _reason: EvictionReason, key: &K, value: &V) {
        self(key, value)
    }
}

/// Optional boxed listener slot owned by a cache.
pub(crate) struct ListenerSlot<K, V> {
    inner: Option<Box<dyn EvictionListener<K, V>>>,
}

impl<K, V> ListenerSlot<K, V> {
    pub(crate) fn new() -> Self {
        Self { inner: None }
    }

    pub(crate) fn set(&mut self, listener: Box<dyn EvictionListener<K, V>>) {
        self.inner = Some(listener);
    }

    pub(crate) fn take(&mut self) -> Option<Box<dyn EvictionListener<K, V>>> {
        self.inner.take()
    }

    pub(crate) fn is_set(&self) -> bool {
        self.inner.is_some()
    }

    pub(crate) fn notify(&mut self, reason: EvictionReason, key: &K, value: &V) {
        if let Some(listener) = self.inner.as_mut() {
            listener.on_evicted(reason, key, value);
        }
    }
}

impl<K, V> std::fmt::Debug for ListenerSlot<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSlot")
            .field("installed", &self.is_set())
            .finish()
    }
}
