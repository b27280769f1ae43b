//! Micro-benchmarks for `IndexedHeap`.
//!
//! Run with: `cargo bench --bench indexed_heap`

use std::hint::black_box;

use criterion::{BatchSize, Criterion, Throughput, criterion_group, criterion_main};
use heapcache::ds::{IndexedHeap, SlotId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIZE: usize = 16_384;

fn priorities(seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..SIZE).map(|_| rng.gen_range(0.0..1_000_000.0)).collect()
}

fn filled(priorities: &[f64]) -> (IndexedHeap<u32>, Vec<SlotId>) {
    let mut heap = IndexedHeap::with_capacity(priorities.len());
    let ids = priorities
        .iter()
        .enumerate()
        .map(|(i, &p)| heap.insert(i as u32, p))
        .collect();
    (heap, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap_insert");
    group.throughput(Throughput::Elements(SIZE as u64));
    let input = priorities(1);

    group.bench_function("random", |b| {
        b.iter_batched(
            || IndexedHeap::<u32>::with_capacity(SIZE),
            |mut heap| {
                for (i, &p) in input.iter().enumerate() {
                    black_box(heap.insert(i as u32, p));
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("ascending", |b| {
        b.iter_batched(
            || IndexedHeap::<u32>::with_capacity(SIZE),
            |mut heap| {
                for i in 0..SIZE {
                    black_box(heap.insert(i as u32, i as f64));
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_update_priority(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap_update_priority");
    group.throughput(Throughput::Elements(SIZE as u64));
    let input = priorities(2);
    let bumps = priorities(3);

    group.bench_function("random", |b| {
        b.iter_batched(
            || filled(&input),
            |(mut heap, ids)| {
                for (id, &p) in ids.iter().zip(&bumps) {
                    black_box(heap.update_priority(*id, p));
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("reinsert_head_upward", |b| {
        b.iter_batched(
            || filled(&input),
            |(mut heap, _)| {
                for i in 0..SIZE {
                    heap.reinsert(0, 1_000_000.0 + i as f64);
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn bench_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexed_heap_pop");
    group.throughput(Throughput::Elements(SIZE as u64));
    let input = priorities(4);

    group.bench_function("drain", |b| {
        b.iter_batched(
            || filled(&input).0,
            |mut heap| {
                while let Some(item) = heap.pop() {
                    black_box(item.priority());
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("remove_by_handle", |b| {
        b.iter_batched(
            || filled(&input),
            |(mut heap, ids)| {
                for id in ids.iter().rev() {
                    black_box(heap.remove_handle(*id));
                }
                heap
            },
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_insert, bench_update_priority, bench_pop);
criterion_main!(benches);
