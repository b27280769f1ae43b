//! Operation and hit-rate benchmarks for the heap-backed policies.
//!
//! Run with: `cargo bench --bench policies`
//!
//! Capacity is enforced by the harness, the same way a caller would: insert,
//! then `remove_oldest` until the cache is back under the limit.

mod common;

use std::hint::black_box;
use std::time::Instant;

use common::workload::{HitRate, Workload, WorkloadGenerator, WorkloadSpec, run_hit_rate};
use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use heapcache::policy::aging_lfu::AgingLfuCache;
use heapcache::policy::greedy_dual::GreedyDualCache;
use heapcache::policy::learned_lru::LearnedLruCache;
use heapcache::traits::EvictingCache;

const CAPACITY: usize = 4_096;
const UNIVERSE: u64 = 16_384;
const OPS: u64 = 50_000;
const ALPHA: f64 = 0.99;
const LIMIT: u64 = 1_000;
const MODEL_SIZE: usize = 4_096;

fn keys(n: u64) -> Vec<String> {
    (0..n).map(|i| format!("obj:{i}")).collect()
}

// ============================================================================
// Insert with caller-side eviction
// ============================================================================

fn bench_insert_evict(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert_evict");
    group.throughput(Throughput::Elements(OPS));
    let stream = keys(OPS);

    group.bench_function("greedy_dual", |b| {
        b.iter_batched(
            || GreedyDualCache::<String, u64>::with_capacity(CAPACITY + 1),
            |mut cache| {
                for (i, key) in stream.iter().enumerate() {
                    cache.add(key.clone(), i as u64, WorkloadGenerator::cost_of(key));
                    if cache.len() > CAPACITY {
                        black_box(cache.remove_oldest());
                    }
                }
                cache
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("aging_lfu", |b| {
        b.iter_batched(
            || AgingLfuCache::<String, u64>::with_capacity(ALPHA, LIMIT, CAPACITY + 1),
            |mut cache| {
                for (i, key) in stream.iter().enumerate() {
                    cache.add(key.clone(), i as u64, WorkloadGenerator::cost_of(key));
                    if cache.len() > CAPACITY {
                        black_box(cache.remove_oldest());
                    }
                }
                cache
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("learned_lru", |b| {
        b.iter_batched(
            || LearnedLruCache::<String, u64>::with_capacity(MODEL_SIZE, CAPACITY + 1),
            |mut cache| {
                for (i, key) in stream.iter().enumerate() {
                    cache.add(key.clone(), i as u64);
                    if cache.len() > CAPACITY {
                        black_box(cache.remove_oldest());
                    }
                }
                cache
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

// ============================================================================
// Get hit latency
// ============================================================================

fn bench_get_hit(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_hit");
    group.throughput(Throughput::Elements(OPS));
    let resident = keys(CAPACITY as u64);

    group.bench_function("greedy_dual", |b| {
        b.iter_custom(|iters| {
            let mut cache = GreedyDualCache::with_capacity(CAPACITY);
            for (i, key) in resident.iter().enumerate() {
                cache.add(key.clone(), i as u64, 1.0);
            }
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS as usize {
                    black_box(cache.get(&resident[i % CAPACITY]));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("aging_lfu", |b| {
        b.iter_custom(|iters| {
            let mut cache = AgingLfuCache::with_capacity(ALPHA, LIMIT, CAPACITY);
            for (i, key) in resident.iter().enumerate() {
                cache.add(key.clone(), i as u64, 1.0);
            }
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS as usize {
                    black_box(cache.get(&resident[i % CAPACITY]));
                }
            }
            start.elapsed()
        })
    });

    group.bench_function("learned_lru", |b| {
        b.iter_custom(|iters| {
            let mut cache = LearnedLruCache::with_capacity(MODEL_SIZE, CAPACITY);
            for (i, key) in resident.iter().enumerate() {
                cache.add(key.clone(), i as u64);
            }
            let start = Instant::now();
            for _ in 0..iters {
                for i in 0..OPS as usize {
                    black_box(cache.get(&resident[i % CAPACITY]));
                }
            }
            start.elapsed()
        })
    });

    group.finish();
}

// ============================================================================
// Hit rate under synthetic workloads
// ============================================================================

fn workloads() -> [(&'static str, Workload); 4] {
    [
        ("uniform", Workload::Uniform),
        (
            "hotset_90_10",
            Workload::Hotset {
                hot_fraction: 0.1,
                hot_prob: 0.9,
            },
        ),
        ("scan", Workload::Scan),
        ("zipfian_0.99", Workload::Zipfian { theta: 0.99 }),
    ]
}

fn measure<C: EvictingCache<String, u64>>(mut cache: C, workload: Workload) -> HitRate {
    let mut generator = WorkloadSpec {
        universe: UNIVERSE,
        workload,
        seed: 0x5eed,
    }
    .generator();
    run_hit_rate(&mut cache, &mut generator, OPS as usize, CAPACITY)
}

fn bench_hit_rate(c: &mut Criterion) {
    let mut group = c.benchmark_group("hit_rate");
    group.throughput(Throughput::Elements(OPS));
    group.sample_size(10);

    for (name, workload) in workloads() {
        let gd = measure(GreedyDualCache::with_capacity(CAPACITY + 1), workload);
        let lfu = measure(AgingLfuCache::with_capacity(ALPHA, LIMIT, CAPACITY + 1), workload);
        let llru = measure(LearnedLruCache::with_capacity(MODEL_SIZE, CAPACITY + 1), workload);
        println!(
            "{name:>14}: greedy_dual={:.3} aging_lfu={:.3} learned_lru={:.3}",
            gd.hit_rate(),
            lfu.hit_rate(),
            llru.hit_rate(),
        );

        group.bench_function(format!("greedy_dual/{name}"), |b| {
            b.iter(|| black_box(measure(GreedyDualCache::new(), workload)))
        });
        group.bench_function(format!("aging_lfu/{name}"), |b| {
            b.iter(|| black_box(measure(AgingLfuCache::new(ALPHA, LIMIT), workload)))
        });
        group.bench_function(format!("learned_lru/{name}"), |b| {
            b.iter(|| black_box(measure(LearnedLruCache::new(MODEL_SIZE), workload)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert_evict, bench_get_hit, bench_hit_rate);
criterion_main!(benches);
