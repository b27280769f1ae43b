//! Heap-backed eviction policies.
//!
//! | Policy                                        | Priority                              | Evicts             |
//! |-----------------------------------------------|---------------------------------------|--------------------|
//! | [`GreedyDualCache`](greedy_dual::GreedyDualCache) | `clock + cost`                    | cheapest, oldest   |
//! | [`AgingLfuCache`](aging_lfu::AgingLfuCache)   | `(epoch, weight × decayed usage)`     | least used lately  |
//! | [`LearnedLruCache`](learned_lru::LearnedLruCache) | `operations + predicted idle time` | soonest predicted  |
//!
//! All three keep a key index (`FxHashMap<K, SlotId>`) next to an
//! [`IndexedHeap`](crate::ds::IndexedHeap) and never enforce a capacity on
//! their own: callers evict with `remove_oldest` when they decide the cache is
//! full.

pub mod aging_lfu;
pub mod greedy_dual;
pub mod learned_lru;

/// Maps a caller-supplied cost or weight to a finite, non-negative value.
///
/// NaN and negative costs become `0.0`; `+∞` saturates at `f64::MAX`.
pub(crate) fn sanitize_cost(cost: f64) -> f64 {
    if cost.is_nan() || cost < 0.0 {
        tracing::warn!(cost, "[heapcache]: cost must be finite and non-negative, using 0");
        0.0
    } else if cost.is_infinite() {
        tracing::warn!("[heapcache]: infinite cost saturated to f64::MAX");
        f64::MAX
    } else {
        cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_cost_keeps_valid_costs() {
        assert_eq!(sanitize_cost(0.0), 0.0);
        assert_eq!(sanitize_cost(12.5), 12.5);
    }

    #[test]
    fn sanitize_cost_replaces_degenerate_costs() {
        assert_eq!(sanitize_cost(f64::NAN), 0.0);
        assert_eq!(sanitize_cost(-3.0), 0.0);
        assert_eq!(sanitize_cost(f64::NEG_INFINITY), 0.0);
        assert_eq!(sanitize_cost(f64::INFINITY), f64::MAX);
    }
}
