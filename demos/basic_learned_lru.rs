use heapcache::policy::learned_lru::LearnedLruCache;

fn main() {
    let mut cache: LearnedLruCache<String, u32> = LearnedLruCache::new(1024);

    for round in 0..3 {
        for name in ["home", "profile", "settings", "search"] {
            cache.add(format!("/page/{name}"), round);
        }
        cache.get(&"/page/home".to_string());
    }

    while cache.len() > 2 {
        cache.remove_oldest();
    }

    println!("operations: {}", cache.operations());
    println!("resident: {}", cache.len());
}

// Expected output:
// operations: 15
// resident: 2
//
// Explanation: every add and get advances the logical clock; re-adding a
// resident key trains the model like a hit. Evictions do not tick.
