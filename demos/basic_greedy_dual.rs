use heapcache::policy::greedy_dual::GreedyDualCache;

fn main() {
    let mut cache: GreedyDualCache<&str, String> = GreedyDualCache::new();

    cache.add("thumbnail", "small".to_string(), 1.0);
    cache.add("report", "expensive".to_string(), 5.0);

    let (key, _) = cache.remove_oldest().unwrap();
    println!("evicted: {key}");
    println!("clock: {}", cache.clock());

    cache.get(&"report");
    println!("report priority: {:?}", cache.priority_of(&"report"));

    cache.add("icon", "tiny".to_string(), 2.0);
    let (key, _) = cache.remove_oldest().unwrap();
    println!("evicted: {key}");
}

// Expected output:
// evicted: thumbnail
// clock: 1
// report priority: Some(6.0)
// evicted: icon
//
// Explanation: priority = clock + cost. Evicting "thumbnail" raises the clock
// to 1, so the hit on "report" lifts it to 6 while "icon" only reaches 3.
