pub mod indexed_heap;
pub mod slot_arena;

pub use indexed_heap::{HeapItem, IndexedHeap, Priority, clamp_priority};
pub use slot_arena::{SlotArena, SlotId};
