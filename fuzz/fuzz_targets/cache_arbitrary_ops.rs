#![no_main]

use heapcache::prelude::*;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on every policy through the unified Cache
//
// Byte triples drive add / get / remove / remove_oldest / clear with costs
// that include NaN and infinities. Capacity is enforced caller-side.
const CAPACITY: usize = 32;

fn cost(byte: u8) -> f64 {
    match byte {
        0 => f64::NAN,
        1 => f64::INFINITY,
        2 => f64::NEG_INFINITY,
        b => f64::from(b) - 64.0,
    }
}

fuzz_target!(|data: &[u8]| {
    let policies = [
        CachePolicy::GreedyDual,
        CachePolicy::AgingLfu {
            alpha: 0.9,
            limit: 4,
        },
        CachePolicy::LearnedLru { model_size: 16 },
    ];

    for policy in policies {
        let mut cache: Cache<Vec<u8>, u8> = CacheBuilder::new().build(policy);

        for chunk in data.chunks_exact(3) {
            let key = vec![b'k', chunk[1] % 64];
            match chunk[0] % 6 {
                0 | 1 => cache.add(key.clone(), chunk[2], cost(chunk[2])),
                2 => {
                    let hit = cache.get(&key).is_some();
                    assert_eq!(hit, cache.contains(&key));
                }
                3 => {
                    cache.remove(&key);
                    assert!(!cache.contains(&key));
                }
                4 => {
                    let peeked = cache.peek_oldest().map(|(k, v)| (k.clone(), *v));
                    assert_eq!(peeked, cache.remove_oldest());
                }
                _ => {
                    if chunk[2] == 0 {
                        cache.clear();
                        assert!(cache.is_empty());
                    }
                }
            }
            while cache.len() > CAPACITY {
                cache.remove_oldest();
            }
            cache.check_invariants().expect("cache invariants violated");
        }
    }
});
