// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Costless-meld pairing heaps.
//!
//! Iacono and Özkan's variant of the pairing heap. Decrease-key does not link
//! the decreased subtree back into the main tree; it parks it in a small
//! decrease pool instead. The pool is combined into the main tree before an
//! extraction, or when it grows beyond logarithmic size.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use crate::tree::pairing::PairingForest;
use jheaps_core::arena::NodeId;
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

/// A pairing heap with a decrease pool.
#[derive(Debug)]
pub struct CostlessMeldPairingHeap<K, C> {
    forest: PairingForest<K, C>,
    root: Option<NodeId>,
    pool: Vec<NodeId>,
    pool_min: usize,
    owner: OwnerToken,
}

impl<K, C> CostlessMeldPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            forest: PairingForest::new(comparator),
            root: None,
            pool: Vec::new(),
            pool_min: 0,
            owner: OwnerToken::new(),
        }
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    #[inline]
    fn pool_capacity(&self) -> usize {
        let n = self.forest.arena.len().max(2);
        (usize::BITS - n.leading_zeros()) as usize
    }

    fn refresh_pool_min(&mut self) {
        self.pool_min = 0;
        for i in 1..self.pool.len() {
            if self.forest.less(self.pool[i], self.pool[self.pool_min]) {
                self.pool_min = i;
            }
        }
    }

    fn pool_position(&self, x: NodeId) -> Option<usize> {
        self.pool.iter().position(|&p| p == x)
    }

    /// Links every pooled tree into the main tree.
    fn consolidate(&mut self) {
        if self.pool.is_empty() {
            return;
        }
        let pool = std::mem::take(&mut self.pool);
        let combined = self.forest.combine(&pool);
        self.root = self.forest.meld_roots(self.root, combined);
        self.pool_min = 0;
    }

    /// The node holding the overall minimum.
    fn min_node(&self) -> Option<NodeId> {
        let pooled = self.pool.get(self.pool_min).copied();
        match (self.root, pooled) {
            (Some(r), Some(p)) => Some(if self.forest.less(p, r) { p } else { r }),
            (r, None) => r,
            (None, p) => p,
        }
    }

    fn remove_root(&mut self) -> HeapResult<Handle<K>> {
        self.consolidate();
        let root = self.root.ok_or(HeapError::NoSuchElement)?;
        self.root = self.forest.combine_children(root);
        Ok(self.forest.release(root))
    }
}

impl<K, C> AddressableHeap<K> for CostlessMeldPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.forest.alloc(handle.clone());
        self.root = self.forest.meld_roots(self.root, Some(id));
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.min_node()
            .map(|m| self.forest.arena[m].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        self.remove_root()
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.forest.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);

        if Some(x) == self.root {
            return Ok(());
        }
        if let Some(pos) = self.pool_position(x) {
            if self.forest.less(x, self.pool[self.pool_min]) {
                self.pool_min = pos;
            }
            return Ok(());
        }

        self.forest.cut(x);
        self.pool.push(x);
        let last = self.pool.len() - 1;
        if self.forest.less(x, self.pool[self.pool_min]) {
            self.pool_min = last;
        }
        if self.pool.len() > self.pool_capacity() {
            self.consolidate();
        }
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if Some(x) == self.root {
            self.root = self.forest.combine_children(x);
        } else {
            if let Some(pos) = self.pool_position(x) {
                self.pool.swap_remove(pos);
                self.refresh_pool_min();
            } else {
                self.forest.cut(x);
            }
            let subtree = self.forest.combine_children(x);
            self.root = self.forest.meld_roots(self.root, subtree);
        }
        self.forest.release(x);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.forest.arena.len()
    }

    fn clear(&mut self) {
        self.forest.clear();
        self.root = None;
        self.pool.clear();
        self.pool_min = 0;
    }
}

impl<K, C> MergeableHeap for CostlessMeldPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.forest.comparator != other.forest.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.forest.arena.absorb(&mut other.forest.arena);
        self.root = self.forest.meld_roots(self.root, other.root.take());
        self.pool.append(&mut other.pool);
        other.pool_min = 0;
        self.refresh_pool_min();
        if self.pool.len() > self.pool_capacity() {
            self.consolidate();
        }
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_addressable_contract, assert_meld_contract};
    use jheaps_core::compare::NaturalOrder;

    #[test]
    fn test_pool_serves_minimum() {
        let mut heap = CostlessMeldPairingHeap::new(NaturalOrder);
        let handles: Vec<_> = (0..16i64).map(|k| heap.insert(k, 0).unwrap()).collect();
        heap.decrease_key(&handles[9], -3).unwrap();
        assert_eq!(heap.pool.len(), 1);
        assert!(heap.find_min().unwrap().ptr_eq(&handles[9]));

        heap.decrease_key(&handles[9], -4).unwrap();
        assert_eq!(heap.pool.len(), 1);
        assert_eq!(heap.delete_min().unwrap().key(), -4);
        assert!(heap.pool.is_empty());
    }

    #[test]
    fn test_delete_pooled_node() {
        let mut heap = CostlessMeldPairingHeap::new(NaturalOrder);
        let handles: Vec<_> = (0..8i64).map(|k| heap.insert(k, 0).unwrap()).collect();
        heap.decrease_key(&handles[5], -1).unwrap();
        heap.delete(&handles[5]).unwrap();
        assert_eq!(heap.find_min().unwrap().key(), 0);
        assert_eq!(heap.len(), 7);
    }

    #[test]
    fn test_contract() {
        assert_addressable_contract(|| CostlessMeldPairingHeap::new(NaturalOrder));
        assert_meld_contract(|| CostlessMeldPairingHeap::new(NaturalOrder));
    }
}
