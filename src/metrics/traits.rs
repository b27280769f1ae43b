//! # Metrics Trait Hierarchy
//!
//! Recording, snapshotting and resetting are kept in separate traits so that
//! policy code only ever writes counters and tests/benches only ever read them.
//!
//! ```text
//!                  ┌─────────────────────────────┐
//!                  │     CoreMetricsRecorder     │
//!                  │  get_hit/get_miss/insert    │
//!                  │  remove/evict/clear         │
//!                  └──────────────┬──────────────┘
//!                                 │
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │  HeapPolicyMetricsRecorder  │
//!                  │  reprioritize/clock_advance │
//!                  │  epoch_roll/model_update    │
//!                  └─────────────────────────────┘
//!
//!   Consumption:
//!   ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │
//!   └──────────────────────────────┘
//! ```

/// Counters shared by every policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    /// An `add` that was ignored (duplicate key on a policy that rejects them).
    fn record_insert_rejected(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_clear(&mut self);
}

/// Signals specific to the heap-backed policies.
pub trait HeapPolicyMetricsRecorder: CoreMetricsRecorder {
    /// Resident entry moved to a new heap position.
    fn record_reprioritize(&mut self);
    /// GreedyDual clock moved forward on eviction.
    fn record_clock_advance(&mut self);
    /// AgingLFU epoch boundary crossed.
    fn record_epoch_roll(&mut self);
    /// Perceptron trained on a realized idle time.
    fn record_model_update(&mut self);
}

/// Counters bumped from `&self` methods (interior mutability).
pub trait HeapPolicyMetricsReadRecorder {
    fn record_peek_oldest_call(&self);
    fn record_peek_oldest_found(&self);
}

/// Snapshot provider for tests and benches.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
