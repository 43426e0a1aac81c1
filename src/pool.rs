// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)
//
// Typed slab with an explicit free list. Slots are recycled after `free` and
// the whole pool can be `reset` without giving its storage back, so one
// tessellator reuses the same memory across calls.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// Keys that address a [`Pool`] slot.
pub trait PoolKey: Copy {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

enum Slot<T> {
    Occupied(T),
    Vacant,
}

pub struct Pool<K, T> {
    slots: Vec<Slot<T>>,
    free_list: Vec<usize>,
    _key: PhantomData<K>,
}

impl<K: PoolKey, T> Pool<K, T> {
    pub fn new() -> Self {
        Pool {
            slots: Vec::new(),
            free_list: Vec::new(),
            _key: PhantomData,
        }
    }

    pub fn alloc(&mut self, value: T) -> K {
        match self.free_list.pop() {
            Some(index) => {
                self.slots[index] = Slot::Occupied(value);
                K::from_index(index)
            }
            None => {
                self.slots.push(Slot::Occupied(value));
                K::from_index(self.slots.len() - 1)
            }
        }
    }

    /// Returns the slot to the free list, handing back its value.
    pub fn free(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.index())?;
        match std::mem::replace(slot, Slot::Vacant) {
            Slot::Occupied(value) => {
                self.free_list.push(key.index());
                Some(value)
            }
            Slot::Vacant => None,
        }
    }

    pub fn get(&self, key: K) -> Option<&T> {
        match self.slots.get(key.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        match self.slots.get_mut(key.index()) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Drops every value but keeps the allocated storage.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }
}

impl<K: PoolKey, T> Default for Pool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: PoolKey, T> Index<K> for Pool<K, T> {
    type Output = T;

    fn index(&self, key: K) -> &T {
        match self.get(key) {
            Some(value) => value,
            None => panic!("pool slot {} is not allocated", key.index()),
        }
    }
}

impl<K: PoolKey, T> IndexMut<K> for Pool<K, T> {
    fn index_mut(&mut self, key: K) -> &mut T {
        let index = key.index();
        match self.get_mut(key) {
            Some(value) => value,
            None => panic!("pool slot {} is not allocated", index),
        }
    }
}
