/// Plain copy of a cache's counters plus gauges read at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
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

    pub peek_oldest_calls: u64,
    pub peek_oldest_found: u64,

    pub reprioritizations: u64,
    pub clock_advances: u64, // GreedyDual only
    pub epoch_rolls: u64,    // AgingLFU only
    pub model_updates: u64,  // LearnedLRU only

    // gauges captured at snapshot time
    pub cache_len: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of `get` calls that hit, or `0.0` before any lookup.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}
