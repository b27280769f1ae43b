#![no_main]

use heapcache::ds::{IndexedHeap, SlotId, clamp_priority};
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on IndexedHeap
//
// Tests random sequences of insert, reinsert, update_priority, remove,
// remove_handle and pop, checking position bookkeeping after every step.
fuzz_target!(|data: &[u8]| {
    let mut heap: IndexedHeap<u32> = IndexedHeap::new();
    let mut handles: Vec<SlotId> = Vec::new();
    let mut next = 0u32;

    for chunk in data.chunks_exact(3) {
        let op = chunk[0] % 6;
        let arg = usize::from(chunk[1]);
        let priority = clamp_priority(f64::from(i8::from_le_bytes([chunk[2]])));

        match op {
            0 => {
                handles.push(heap.insert(next, priority));
                next += 1;
            }
            1 => {
                let len = heap.len();
                heap.reinsert(arg, priority);
                assert_eq!(heap.len(), len);
            }
            2 => {
                if !handles.is_empty() {
                    let id = handles[arg % handles.len()];
                    let live = heap.get(id).is_some();
                    assert_eq!(heap.update_priority(id, priority), live);
                    if live {
                        assert_eq!(heap.get(id).map(|item| item.priority()), Some(priority));
                    }
                }
            }
            3 => {
                let len = heap.len();
                match heap.remove(arg) {
                    Some(_) => assert_eq!(heap.len(), len - 1),
                    None => assert!(arg >= len),
                }
            }
            4 => {
                if !handles.is_empty() {
                    let id = handles.swap_remove(arg % handles.len());
                    let len = heap.len();
                    if heap.remove_handle(id).is_some() {
                        assert_eq!(heap.len(), len - 1);
                        assert!(heap.get(id).is_none());
                    }
                }
            }
            _ => {
                let head = heap.head().map(|item| item.priority());
                let popped = heap.pop().map(|item| item.priority());
                assert_eq!(head, popped);
                if let (Some(popped), Some(next_head)) = (popped, heap.head().map(|i| i.priority())) {
                    assert!(popped <= next_head);
                }
            }
        }

        heap.check_invariants().expect("heap invariants violated");
    }
});
