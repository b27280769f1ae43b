use heapcache::policy::aging_lfu::AgingLfuCache;

fn main() {
    let mut cache: AgingLfuCache<&str, u32> = AgingLfuCache::new(0.99, 1000);

    cache.add("a", 1, 1.0);
    cache.add("b", 2, 1.0);
    for _ in 0..3 {
        cache.get(&"a");
    }

    let (key, _) = cache.remove_oldest().unwrap();
    println!("evicted: {key}");
    println!("epoch: {}, operations: {}", cache.epoch(), cache.operations());
}

// Expected output:
// evicted: b
// epoch: 0, operations: 5
//
// Explanation: both entries share epoch 0, so the more frequently used "a"
// outranks "b". Eviction itself does not advance the operation counter.
