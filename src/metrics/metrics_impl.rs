use crate::metrics::cell::MetricsCell;
use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{
    CoreMetricsRecorder, HeapPolicyMetricsReadRecorder, HeapPolicyMetricsRecorder,
};

/// Counters owned by one cache instance.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,
    pub insert_rejected: u64,
    pub remove_calls: u64,
    pub remove_found: u64,
    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub clears: u64,
    pub peek_oldest_calls: MetricsCell,
    pub peek_oldest_found: MetricsCell,
    pub reprioritizations: u64,
    pub clock_advances: u64,
    pub epoch_rolls: u64,
    pub model_updates: u64,
}

impl CacheMetrics {
    /// Copies the counters, recording `cache_len` as the current length gauge.
    pub fn snapshot(&self, cache_len: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            insert_calls: self.insert_calls,
            insert_new: self.insert_new,
            insert_updates: self.insert_updates,
            insert_rejected: self.insert_rejected,
            remove_calls: self.remove_calls,
            remove_found: self.remove_found,
            evict_calls: self.evict_calls,
            evicted_entries: self.evicted_entries,
            clears: self.clears,
            peek_oldest_calls: self.peek_oldest_calls.get(),
            peek_oldest_found: self.peek_oldest_found.get(),
            reprioritizations: self.reprioritizations,
            clock_advances: self.clock_advances,
            epoch_rolls: self.epoch_rolls,
            model_updates: self.model_updates,
            cache_len,
        }
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_insert_rejected(&mut self) {
        self.insert_rejected += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_clear(&mut self) {
        self.clears += 1;
    }
}

impl HeapPolicyMetricsRecorder for CacheMetrics {
    fn record_reprioritize(&mut self) {
        self.reprioritizations += 1;
    }

    fn record_clock_advance(&mut self) {
        self.clock_advances += 1;
    }

    fn record_epoch_roll(&mut self) {
        self.epoch_rolls += 1;
    }

    fn record_model_update(&mut self) {
        self.model_updates += 1;
    }
}

impl HeapPolicyMetricsReadRecorder for CacheMetrics {
    fn record_peek_oldest_call(&self) {
        self.peek_oldest_calls.incr();
    }

    fn record_peek_oldest_found(&self) {
        self.peek_oldest_found.incr();
    }
}
