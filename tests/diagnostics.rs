// ==============================================
// DIAGNOSTIC PATH TESTS (integration)
// ==============================================
//
// Misuse and numeric degeneracy are logged through `tracing` and otherwise
// absorbed. Run with `RUST_LOG=heapcache=trace` to see the events.

use heapcache::prelude::*;

#[test_log::test]
fn duplicate_greedy_dual_add_keeps_first_entry() {
    let mut cache = GreedyDualCache::new();
    cache.add("k", 1, 2.0);
    cache.add("k", 2, 8.0);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(&"k"), Some(&1));
    assert_eq!(cache.cost_of(&"k"), Some(2.0));
}

#[test_log::test]
fn degenerate_costs_never_reach_the_heap() {
    let mut gd = GreedyDualCache::new();
    let mut lfu = AgingLfuCache::new(0.9, 10);
    for (i, cost) in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -1.0, 0.0]
        .into_iter()
        .enumerate()
    {
        gd.add(i, (), cost);
        lfu.add(i, (), cost);
    }
    gd.check_invariants().unwrap();
    lfu.check_invariants().unwrap();

    while gd.remove_oldest().is_some() {}
    assert_eq!(gd.clock(), f64::MAX);
    gd.check_invariants().unwrap();
}

#[test_log::test]
fn epoch_rolls_widen_limit_and_reset_operations() {
    let mut cache: AgingLfuCache<u32, u32> = AgingLfuCache::new(0.5, 1);
    for i in 0..50 {
        cache.add(i % 5, i, 1.0);
    }
    // Epoch k closes after 1 + 2 + ... + k operations: 45 ops close epoch 9.
    assert_eq!(cache.epoch(), 9);
    assert_eq!(cache.limit(), 10);
    assert_eq!(cache.operations(), 5);
    cache.check_invariants().unwrap();
}

#[test_log::test]
fn repeated_evictions_keep_model_weights_finite() {
    let mut cache = LearnedLruCache::new(2);
    for round in 0..20 {
        for key in ["alpha", "bravo", "charlie", "delta"] {
            cache.add(key, round);
        }
        cache.get(&"alpha");
        if cache.len() > 3 {
            cache.remove_oldest();
        }
    }
    cache.check_invariants().unwrap();
    assert!(cache.model().weights().iter().all(|w| w.is_finite()));
}

#[test_log::test]
fn invalid_configuration_is_reported_not_logged() {
    let err = CacheBuilder::new()
        .try_build::<String, u8>(CachePolicy::AgingLfu {
            alpha: f64::NAN,
            limit: 3,
        })
        .unwrap_err();
    assert_eq!(err.parameter(), "alpha");
    assert!(err.to_string().starts_with("invalid alpha"));
}
