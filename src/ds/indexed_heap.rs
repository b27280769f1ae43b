//! Indexed binary min-heap with in-place priority changes.
//!
//! Unlike [`std::collections::BinaryHeap`], every resident item knows its own
//! array position, so an arbitrary item can be re-prioritised or removed in
//! O(log n) without a linear scan. Items live in a [`SlotArena`]; the heap
//! array stores only [`SlotId`] handles, and each item records the array index
//! its handle currently occupies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                         IndexedHeap<T, P> Layout                            │
//! │                                                                             │
//! │   order: Vec<SlotId>   (binary heap over priorities, root = minimum)        │
//! │                                                                             │
//! │      index:   0        1        2        3                                  │
//! │             ┌────────┬────────┬────────┬────────┐                           │
//! │             │ #2     │ #0     │ #3     │ #1     │                           │
//! │             └───┬────┴───┬────┴───┬────┴───┬────┘                           │
//! │                 │        │        │        │                                │
//! │   items: SlotArena<HeapItem<T, P>>                                          │
//! │             ┌───▼──────────────────────────────────────────┐                │
//! │             │ #0 { priority: 3, position: 1, payload }     │                │
//! │             │ #1 { priority: 8, position: 3, payload }     │                │
//! │             │ #2 { priority: 1, position: 0, payload }     │                │
//! │             │ #3 { priority: 5, position: 2, payload }     │                │
//! │             └──────────────────────────────────────────────┘                │
//! │                                                                             │
//! │   Invariants:                                                               │
//! │     items[order[i]].position == i            for every resident item        │
//! │     !items[order[i]].precedes(items[order[parent(i)]])  for i > 0           │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation        | Description                                    | Complexity |
//! |------------------|------------------------------------------------|------------|
//! | `insert`         | Append and sift up                             | O(log n)   |
//! | `reinsert`       | Detach, set new priority, push back            | O(log n)   |
//! | `update_priority`| `reinsert` addressed by handle                 | O(log n)   |
//! | `remove`         | Swap with last, shrink, restore order          | O(log n)   |
//! | `pop`            | `remove(0)`                                    | O(log n)   |
//! | `head`           | Peek minimum                                   | O(1)       |
//! | `position_of`    | Current array index of a handle                | O(1)       |
//!
//! ## Comparator
//!
//! Ordering is delegated to [`Priority::precedes`], a strict "sorts before"
//! relation. Both sift directions use that one relation, so ties never move
//! an item. For `f64` the relation is [`f64::total_cmp`], which also gives NaN
//! a fixed place instead of silently breaking the ordering.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::ds::IndexedHeap;
//!
//! let mut heap = IndexedHeap::new();
//! let _a = heap.insert("a", 5.0);
//! let b = heap.insert("b", 3.0);
//! let c = heap.insert("c", 8.0);
//! assert_eq!(heap.head().map(|item| *item.payload()), Some("b"));
//!
//! // Move "c" to the front without a scan.
//! heap.update_priority(c, 0.0);
//! assert_eq!(heap.head().map(|item| *item.payload()), Some("c"));
//!
//! // Remove "b" from wherever it currently sits.
//! let pos = heap.position_of(b).unwrap();
//! assert_eq!(heap.remove(pos).map(|item| item.into_payload()), Some("b"));
//! assert_eq!(heap.len(), 2);
//! ```
//!
//! ## Thread Safety
//!
//! `IndexedHeap` is not thread-safe. Wrap it in a mutex for shared access.

use std::fmt::Debug;

use crate::ds::slot_arena::{SlotArena, SlotId};
use crate::error::InvariantError;

/// Strict ordering used by [`IndexedHeap`].
pub trait Priority: Copy + Debug {
    /// Returns `true` if `self` must sit closer to the root than `other`.
    fn precedes(&self, other: &Self) -> bool;

    /// Returns `false` for values that should never reach a live heap (NaN, infinities).
    fn is_well_formed(&self) -> bool {
        true
    }
}

impl Priority for f64 {
    #[inline]
    fn precedes(&self, other: &Self) -> bool {
        self.total_cmp(other).is_lt()
    }

    fn is_well_formed(&self) -> bool {
        self.is_finite()
    }
}

/// Maps a raw floating-point priority to a finite value the heap can order.
///
/// NaN becomes `0.0`; infinities saturate at `±f64::MAX`.
#[inline]
pub fn clamp_priority(priority: f64) -> f64 {
    if priority.is_nan() {
        0.0
    } else {
        priority.clamp(-f64::MAX, f64::MAX)
    }
}

/// An item resident in an [`IndexedHeap`].
#[derive(Debug)]
pub struct HeapItem<T, P = f64> {
    priority: P,
    position: usize,
    payload: T,
}

impl<T, P: Copy> HeapItem<T, P> {
    pub fn priority(&self) -> P {
        self.priority
    }

    /// Array index the item occupied when last observed in the heap.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    pub fn into_parts(self) -> (T, P) {
        (self.payload, self.priority)
    }
}

/// Array-backed binary min-heap whose items track their own positions.
///
/// See the module documentation for layout and invariants.
#[derive(Debug)]
pub struct IndexedHeap<T, P = f64> {
    items: SlotArena<HeapItem<T, P>>,
    order: Vec<SlotId>,
}

impl<T, P: Priority> IndexedHeap<T, P> {
    pub fn new() -> Self {
        Self {
            items: SlotArena::new(),
            order: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: SlotArena::with_capacity(capacity),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Number of resident items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Appends `payload` with `priority` and sifts it into place.
    pub fn insert(&mut self, payload: T, priority: P) -> SlotId {
        let id = self.items.insert(HeapItem {
            priority,
            position: usize::MAX,
            payload,
        });
        self.push(id);
        id
    }

    /// Gives the item at `position` a new priority and restores heap order.
    ///
    /// Behaves as remove-then-insert: the item is detached, re-prioritised and
    /// pushed back, keeping its handle. Out-of-range positions are ignored.
    pub fn reinsert(&mut self, position: usize, priority: P) {
        if position >= self.order.len() {
            return;
        }
        let id = self.detach(position);
        self.item_mut(id).priority = priority;
        self.push(id);
    }

    /// [`reinsert`](Self::reinsert) addressed by handle. Returns `false` for stale handles.
    pub fn update_priority(&mut self, id: SlotId, priority: P) -> bool {
        match self.position_of(id) {
            Some(position) => {
                self.reinsert(position, priority);
                true
            },
            None => false,
        }
    }

    /// Removes and returns the item at `position`.
    ///
    /// The last item is moved into the vacated slot and sifted in whichever
    /// direction its priority requires.
    pub fn remove(&mut self, position: usize) -> Option<HeapItem<T, P>> {
        if position >= self.order.len() {
            return None;
        }
        let id = self.detach(position);
        self.items.remove(id)
    }

    /// [`remove`](Self::remove) addressed by handle.
    pub fn remove_handle(&mut self, id: SlotId) -> Option<HeapItem<T, P>> {
        let position = self.position_of(id)?;
        self.remove(position)
    }

    /// Removes and returns the minimum item.
    pub fn pop(&mut self) -> Option<HeapItem<T, P>> {
        self.remove(0)
    }

    /// Peeks at the minimum item. `None` when empty.
    pub fn head(&self) -> Option<&HeapItem<T, P>> {
        self.order.first().and_then(|&id| self.items.get(id))
    }

    pub fn head_handle(&self) -> Option<SlotId> {
        self.order.first().copied()
    }

    pub fn get(&self, id: SlotId) -> Option<&HeapItem<T, P>> {
        self.items.get(id)
    }

    /// Mutable access to an item's payload. Priority and position stay heap-owned.
    pub fn payload_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.items.get_mut(id).map(|item| &mut item.payload)
    }

    pub fn position_of(&self, id: SlotId) -> Option<usize> {
        self.items.get(id).map(|item| item.position)
    }

    pub fn handle_at(&self, position: usize) -> Option<SlotId> {
        self.order.get(position).copied()
    }

    pub fn item_at(&self, position: usize) -> Option<&HeapItem<T, P>> {
        self.handle_at(position).and_then(|id| self.items.get(id))
    }

    /// Iterates resident items in array order (not sorted).
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &HeapItem<T, P>)> {
        self.order
            .iter()
            .filter_map(|&id| self.items.get(id).map(|item| (id, item)))
    }

    /// Drops every item. Previously issued handles stop resolving.
    pub fn clear(&mut self) {
        self.order.clear();
        self.items.clear();
    }

    /// Verifies position bookkeeping and heap order.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.items.len() != self.order.len() {
            return Err(InvariantError::new(format!(
                "arena holds {} items but heap array holds {}",
                self.items.len(),
                self.order.len()
            )));
        }
        for (index, &id) in self.order.iter().enumerate() {
            let item = self.items.get(id).ok_or_else(|| {
                InvariantError::new(format!("heap index {} holds stale handle {:?}", index, id))
            })?;
            if item.position != index {
                return Err(InvariantError::new(format!(
                    "item at heap index {} records position {}",
                    index, item.position
                )));
            }
            if index > 0 {
                let parent = self.item_at_unchecked((index - 1) / 2);
                if item.priority.precedes(&parent.priority) {
                    return Err(InvariantError::new(format!(
                        "heap order violated: index {} ({:?}) precedes parent ({:?})",
                        index, item.priority, parent.priority
                    )));
                }
            }
        }
        Ok(())
    }

    fn push(&mut self, id: SlotId) {
        let position = self.order.len();
        self.order.push(id);
        self.item_mut(id).position = position;
        self.sift_up(position);
    }

    /// Unlinks the handle at `position` from the array; the item stays in the arena.
    fn detach(&mut self, position: usize) -> SlotId {
        let last = self.order.len() - 1;
        if position != last {
            self.swap(position, last);
        }
        let id = self.order.pop().expect("heap array empty during detach");
        if position < self.order.len() {
            self.restore(position);
        }
        id
    }

    fn restore(&mut self, position: usize) {
        if self.sift_up(position) == position {
            self.sift_down(position);
        }
    }

    fn sift_up(&mut self, mut index: usize) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.precedes(index, parent) {
                break;
            }
            self.swap(index, parent);
            index = parent;
        }
        index
    }

    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.order.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let child = if right < len && self.precedes(right, left) {
                right
            } else {
                left
            };
            if !self.precedes(child, index) {
                break;
            }
            self.swap(index, child);
            index = child;
        }
        index
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.order.swap(i, j);
        let (id_i, id_j) = (self.order[i], self.order[j]);
        self.item_mut(id_i).position = i;
        self.item_mut(id_j).position = j;
    }

    fn precedes(&self, i: usize, j: usize) -> bool {
        self.item_at_unchecked(i)
            .priority
            .precedes(&self.item_at_unchecked(j).priority)
    }

    fn item_at_unchecked(&self, position: usize) -> &HeapItem<T, P> {
        self.items
            .get(self.order[position])
            .expect("heap array references a freed slot")
    }

    fn item_mut(&mut self, id: SlotId) -> &mut HeapItem<T, P> {
        self.items
            .get_mut(id)
            .expect("heap handle references a freed slot")
    }
}

impl<T, P: Priority> Default for IndexedHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
