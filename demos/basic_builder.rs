use heapcache::builder::{CacheBuilder, CachePolicy};

fn main() {
    let mut cache = CacheBuilder::new()
        .capacity_hint(2)
        .build::<String, u32>(CachePolicy::GreedyDual);
    cache.set_eviction_listener(|key: &String, value: &u32| {
        println!("dropped {key}={value}");
    });

    for (key, cost) in [("a", 3.0), ("b", 1.0), ("c", 2.0)] {
        cache.add(key.to_string(), cost as u32, cost);
        while cache.len() > 2 {
            cache.remove_oldest();
        }
    }

    println!("policy: {}", cache.policy_name());
    println!("contains b? {}", cache.contains(&"b".to_string()));
}

// Expected output:
// dropped b=1
// policy: greedy_dual
// contains b? false
//
// Explanation: the caller keeps two entries; "b" has the lowest cost when
// "c" arrives, so it is evicted and the listener sees it.
