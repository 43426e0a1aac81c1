// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Sorted circular doubly-linked list with a head sentinel.
//
// The ordering is not stored in the dictionary: callers pass the comparison
// on every insert or search. The sweep's edge order is only meaningful at the
// current event, so keys are compared against the sweep state of the moment.

use crate::handle::NodeId;
use crate::pool::Pool;

struct DictNode<K> {
    /// `None` only for the head.
    key: Option<K>,
    next: NodeId,
    prev: NodeId,
}

pub struct Dict<K> {
    nodes: Pool<NodeId, DictNode<K>>,
    head: NodeId,
}

impl<K: Copy> Dict<K> {
    pub fn new() -> Self {
        let mut nodes = Pool::new();
        let head = Self::alloc_head(&mut nodes);
        Dict { nodes, head }
    }

    fn alloc_head(nodes: &mut Pool<NodeId, DictNode<K>>) -> NodeId {
        let head = nodes.alloc(DictNode {
            key: None,
            next: NodeId::new(0),
            prev: NodeId::new(0),
        });
        nodes[head].next = head;
        nodes[head].prev = head;
        head
    }

    /// Removes every node and keeps the storage.
    pub fn clear(&mut self) {
        self.nodes.reset();
        self.head = Self::alloc_head(&mut self.nodes);
    }

    /// Inserts `key` at the end of the list, walking back past every key that
    /// is not `leq` it.
    pub fn insert(&mut self, key: K, leq: impl FnMut(K, K) -> bool) -> NodeId {
        self.insert_before(self.head, key, leq)
    }

    /// Inserts `key` somewhere before `node`: the walk goes backwards from
    /// `node` and stops at the first key `k` with `leq(k, key)`.
    pub fn insert_before(&mut self, mut node: NodeId, key: K, mut leq: impl FnMut(K, K) -> bool) -> NodeId {
        loop {
            node = self.nodes[node].prev;
            match self.nodes[node].key {
                Some(k) if !leq(k, key) => continue,
                _ => break,
            }
        }
        let next = self.nodes[node].next;
        let new_node = self.nodes.alloc(DictNode {
            key: Some(key),
            next,
            prev: node,
        });
        self.nodes[next].prev = new_node;
        self.nodes[node].next = new_node;
        new_node
    }

    /// Returns the first node, walking forward from the head, whose key
    /// satisfies `stop`. Returns the head when none does.
    pub fn search(&self, mut stop: impl FnMut(K) -> bool) -> NodeId {
        let mut node = self.head;
        loop {
            node = self.nodes[node].next;
            match self.nodes[node].key {
                Some(k) if !stop(k) => continue,
                _ => return node,
            }
        }
    }

    pub fn delete(&mut self, node: NodeId) {
        debug_assert!(node != self.head);
        if let Some(removed) = self.nodes.free(node) {
            self.nodes[removed.next].prev = removed.prev;
            self.nodes[removed.prev].next = removed.next;
        }
    }

    #[inline]
    pub fn key(&self, node: NodeId) -> Option<K> {
        self.nodes[node].key
    }

    #[inline]
    pub fn succ(&self, node: NodeId) -> NodeId {
        self.nodes[node].next
    }

    #[inline]
    pub fn pred(&self, node: NodeId) -> NodeId {
        self.nodes[node].prev
    }

    #[inline]
    pub fn min(&self) -> NodeId {
        self.nodes[self.head].next
    }
}

impl<K: Copy> Default for Dict<K> {
    fn default() -> Self {
        Self::new()
    }
}
