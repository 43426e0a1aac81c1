// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Binary min-heap with stable handles.
//
// Keys inserted before `init` are only appended; `init` heapifies them in one
// pass. After that every insert restores heap order incrementally. Each key
// gets a handle that stays valid until the key leaves the queue, so a key can
// be removed from the middle of the heap. Released handles are recycled.

use crate::handle::PqHandle;

/// Ordering used by [`PriorityQueue`]: `a.leq(b)` iff `a` should come out no
/// later than `b`.
pub trait QueueKey: Copy {
    fn leq(&self, other: &Self) -> bool;
}

#[derive(Clone, Copy)]
struct HandleSlot<K> {
    key: K,
    /// Position in `nodes` while `live`.
    node: usize,
    live: bool,
}

pub struct PriorityQueue<K> {
    /// `nodes[1..]` is the heap; `nodes[0]` is unused so children of `i`
    /// are `2i` and `2i + 1`.
    nodes: Vec<PqHandle>,
    handles: Vec<HandleSlot<K>>,
    free_list: Vec<PqHandle>,
    initialized: bool,
}

impl<K: QueueKey> PriorityQueue<K> {
    pub fn new() -> Self {
        PriorityQueue {
            nodes: vec![PqHandle::new(0)],
            handles: Vec::new(),
            free_list: Vec::new(),
            initialized: false,
        }
    }

    /// Empties the queue and returns it to the pre-`init` state.
    pub fn reset(&mut self) {
        self.nodes.truncate(1);
        self.handles.clear();
        self.free_list.clear();
        self.initialized = false;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn key_at(&self, node: usize) -> &K {
        &self.handles[self.nodes[node].idx()].key
    }

    #[inline]
    fn place(&mut self, node: usize, handle: PqHandle) {
        self.nodes[node] = handle;
        self.handles[handle.idx()].node = node;
    }

    fn float_down(&mut self, mut curr: usize) {
        let size = self.len();
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child < size && self.key_at(child + 1).leq(self.key_at(child)) {
                child += 1;
            }
            if child > size || self.key_of(h_curr).leq(self.key_at(child)) {
                self.place(curr, h_curr);
                return;
            }
            let h_child = self.nodes[child];
            self.place(curr, h_child);
            curr = child;
        }
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 || self.key_at(parent).leq(self.key_of(h_curr)) {
                self.place(curr, h_curr);
                return;
            }
            let h_parent = self.nodes[parent];
            self.place(curr, h_parent);
            curr = parent;
        }
    }

    #[inline]
    fn key_of(&self, handle: PqHandle) -> &K {
        &self.handles[handle.idx()].key
    }

    /// Builds the heap from everything inserted so far.
    pub fn init(&mut self) {
        for node in (1..=self.len() / 2).rev() {
            self.float_down(node);
        }
        self.initialized = true;
    }

    pub fn insert(&mut self, key: K) -> PqHandle {
        let handle = match self.free_list.pop() {
            Some(handle) => {
                let slot = &mut self.handles[handle.idx()];
                slot.key = key;
                slot.live = true;
                handle
            }
            None => {
                self.handles.push(HandleSlot {
                    key,
                    node: 0,
                    live: true,
                });
                PqHandle::new((self.handles.len() - 1) as u32)
            }
        };
        self.nodes.push(handle);
        let node = self.len();
        self.handles[handle.idx()].node = node;
        if self.initialized {
            self.float_up(node);
        }
        handle
    }

    pub fn minimum(&self) -> Option<K> {
        if self.is_empty() {
            None
        } else {
            Some(*self.key_at(1))
        }
    }

    pub fn extract_min(&mut self) -> Option<K> {
        if self.is_empty() {
            return None;
        }
        let h_min = self.nodes[1];
        self.remove(h_min)
    }

    /// Removes the key behind `handle`. Returns `None` if the handle is not
    /// live.
    pub fn remove(&mut self, handle: PqHandle) -> Option<K> {
        let slot = self.handles.get_mut(handle.idx()).filter(|slot| slot.live)?;
        slot.live = false;
        let key = slot.key;
        let curr = slot.node;
        self.free_list.push(handle);

        let last = self.nodes.pop()?;
        if curr <= self.len() {
            self.place(curr, last);
            if curr <= 1 || self.key_at(curr >> 1).leq(self.key_at(curr)) {
                self.float_down(curr);
            } else {
                self.float_up(curr);
            }
        }
        Some(key)
    }
}

impl<K: QueueKey> Default for PriorityQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl QueueKey for i32 {
        fn leq(&self, other: &Self) -> bool {
            self <= other
        }
    }

    fn drain(pq: &mut PriorityQueue<i32>) -> Vec<i32> {
        let mut out = Vec::new();
        while let Some(k) = pq.extract_min() {
            out.push(k);
        }
        out
    }

    #[test]
    fn batch_init_then_extract_in_order() {
        let mut pq = PriorityQueue::new();
        for k in [5, 3, 8, 1, 9, 2, 7] {
            pq.insert(k);
        }
        pq.init();
        assert_eq!(pq.minimum(), Some(1));
        assert_eq!(drain(&mut pq), vec![1, 2, 3, 5, 7, 8, 9]);
        assert!(pq.is_empty());
        assert_eq!(pq.extract_min(), None);
    }

    #[test]
    fn insert_after_init_keeps_heap_order() {
        let mut pq = PriorityQueue::new();
        for k in [10, 20, 30] {
            pq.insert(k);
        }
        pq.init();
        assert_eq!(pq.extract_min(), Some(10));
        pq.insert(15);
        pq.insert(5);
        pq.insert(25);
        assert_eq!(drain(&mut pq), vec![5, 15, 20, 25, 30]);
    }

    #[test]
    fn remove_by_handle_from_the_middle() {
        let mut pq = PriorityQueue::new();
        let handles: Vec<_> = [4, 1, 6, 3, 5, 2].iter().map(|&k| pq.insert(k)).collect();
        pq.init();
        assert_eq!(pq.remove(handles[3]), Some(3));
        assert_eq!(pq.remove(handles[0]), Some(4));
        assert_eq!(pq.remove(handles[0]), None);
        assert_eq!(drain(&mut pq), vec![1, 2, 5, 6]);
    }

    #[test]
    fn released_handles_leave_the_heap_alone() {
        let mut pq = PriorityQueue::new();
        let handles: Vec<_> = [7, 3, 9, 1].iter().map(|&k| pq.insert(k)).collect();
        pq.init();
        assert_eq!(pq.extract_min(), Some(1));
        for _ in 0..2 {
            assert_eq!(pq.remove(handles[3]), None);
        }
        assert_eq!(pq.remove(PqHandle::new(40)), None);
        assert_eq!(pq.len(), 3);
        pq.insert(5);
        assert_eq!(drain(&mut pq), vec![3, 5, 7, 9]);
    }

    #[test]
    fn handles_are_recycled() {
        let mut pq = PriorityQueue::new();
        let a = pq.insert(1);
        pq.init();
        assert_eq!(pq.extract_min(), Some(1));
        let b = pq.insert(2);
        assert_eq!(a, b);
        assert_eq!(pq.minimum(), Some(2));
    }

    #[test]
    fn reset_returns_to_pre_init_state() {
        let mut pq = PriorityQueue::new();
        pq.insert(3);
        pq.init();
        pq.reset();
        assert!(pq.is_empty());
        pq.insert(9);
        pq.insert(4);
        pq.init();
        assert_eq!(drain(&mut pq), vec![4, 9]);
    }

    #[test]
    fn many_interleaved_operations() {
        let mut pq = PriorityQueue::new();
        let mut live = Vec::new();
        for i in 0..200 {
            live.push((pq.insert((i * 37) % 101), (i * 37) % 101));
        }
        pq.init();
        for (h, _) in live.iter().step_by(3) {
            pq.remove(*h);
        }
        let mut expected: Vec<i32> = live
            .iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, (_, k))| *k)
            .collect();
        expected.sort();
        assert_eq!(drain(&mut pq), expected);
    }
}
