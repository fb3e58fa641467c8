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

//! Pairing heaps.
//!
//! A pairing heap is a single heap-ordered multiway tree. Children are kept in
//! a doubly linked sibling list: `prev` of a first child points to its parent,
//! `prev` of any other child to its left sibling. Deleting the root combines
//! its children with the standard two-pass pairing.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use smallvec::SmallVec;

#[derive(Debug)]
pub(crate) struct PairingNode<K> {
    pub(crate) elem: Handle<K>,
    pub(crate) child: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
}

/// Node storage and the linking primitives shared by the pairing heap
/// variants.
#[derive(Debug)]
pub(crate) struct PairingForest<K, C> {
    pub(crate) arena: NodeArena<PairingNode<K>>,
    pub(crate) comparator: C,
}

impl<K, C> PairingForest<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub(crate) fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            comparator,
        }
    }

    #[inline]
    pub(crate) fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.arena[a].elem.key(), &self.arena[b].elem.key())
    }

    pub(crate) fn alloc(&mut self, elem: Handle<K>) -> NodeId {
        let id = self.arena.alloc(PairingNode {
            elem: elem.clone(),
            child: None,
            next: None,
            prev: None,
        });
        elem.link(id.to_raw());
        id
    }

    /// Links two tree roots; the loser becomes the first child of the winner.
    pub(crate) fn link(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (winner, loser) = if self.less(b, a) { (b, a) } else { (a, b) };
        let first = self.arena[winner].child;
        {
            let l = &mut self.arena[loser];
            l.next = first;
            l.prev = Some(winner);
        }
        if let Some(f) = first {
            self.arena[f].prev = Some(loser);
        }
        let w = &mut self.arena[winner];
        w.child = Some(loser);
        w.next = None;
        w.prev = None;
        winner
    }

    /// Links two optional roots.
    #[inline]
    pub(crate) fn meld_roots(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.link(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Detaches a non-root node (and its subtree) from its sibling list.
    pub(crate) fn cut(&mut self, x: NodeId) {
        let (prev, next) = {
            let n = &self.arena[x];
            (n.prev, n.next)
        };
        if let Some(p) = prev {
            if self.arena[p].child == Some(x) {
                self.arena[p].child = next;
            } else {
                self.arena[p].next = next;
            }
        }
        if let Some(n) = next {
            self.arena[n].prev = prev;
        }
        let n = &mut self.arena[x];
        n.prev = None;
        n.next = None;
    }

    /// Combines a list of detached roots: pairs left to right, then folds the
    /// pairs right to left.
    pub(crate) fn combine(&mut self, roots: &[NodeId]) -> Option<NodeId> {
        let mut pairs: SmallVec<[NodeId; 32]> = SmallVec::new();
        for chunk in roots.chunks(2) {
            match *chunk {
                [a, b] => pairs.push(self.link(a, b)),
                [a] => pairs.push(a),
                _ => {}
            }
        }
        let mut iter = pairs.into_iter().rev();
        let mut acc = iter.next()?;
        for p in iter {
            acc = self.link(p, acc);
        }
        Some(acc)
    }

    /// Detaches all children of `x` and combines them into one tree.
    pub(crate) fn combine_children(&mut self, x: NodeId) -> Option<NodeId> {
        let mut children: SmallVec<[NodeId; 32]> = SmallVec::new();
        let mut cur = self.arena[x].child.take();
        while let Some(c) = cur {
            let n = &mut self.arena[c];
            cur = n.next.take();
            n.prev = None;
            children.push(c);
        }
        self.combine(&children)
    }

    /// Frees a detached node and unlinks its element.
    pub(crate) fn release(&mut self, x: NodeId) -> Handle<K> {
        let node = self.arena.remove(x);
        node.elem.unlink();
        node.elem
    }

    pub(crate) fn clear(&mut self) {
        for node in self.arena.values() {
            node.elem.unlink();
        }
        self.arena.clear();
    }
}

/// A two-pass pairing heap.
#[derive(Debug)]
pub struct PairingHeap<K, C> {
    forest: PairingForest<K, C>,
    root: Option<NodeId>,
    owner: OwnerToken,
}

impl<K, C> PairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            forest: PairingForest::new(comparator),
            root: None,
            owner: OwnerToken::new(),
        }
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.forest.comparator
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    fn remove_root(&mut self) -> HeapResult<Handle<K>> {
        let root = self.root.ok_or(HeapError::NoSuchElement)?;
        self.root = self.forest.combine_children(root);
        Ok(self.forest.release(root))
    }
}

impl<K, C> AddressableHeap<K> for PairingHeap<K, C>
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
        self.root
            .map(|r| self.forest.arena[r].elem.clone())
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
        if Some(x) != self.root {
            self.forest.cut(x);
            self.root = self.forest.meld_roots(self.root, Some(x));
        }
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if Some(x) == self.root {
            self.remove_root()?;
            return Ok(());
        }
        self.forest.cut(x);
        let subtree = self.forest.combine_children(x);
        self.forest.release(x);
        self.root = self.forest.meld_roots(self.root, subtree);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.forest.arena.len()
    }

    fn clear(&mut self) {
        self.forest.clear();
        self.root = None;
    }
}

impl<K, C> MergeableHeap for PairingHeap<K, C>
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
    fn test_insert_extract_then_decrease() {
        let mut heap = PairingHeap::new(NaturalOrder);
        let five = heap.insert(5i64, 0).unwrap();
        heap.insert(1, 0).unwrap();
        heap.insert(3, 0).unwrap();

        assert_eq!(heap.find_min().unwrap().key(), 1);
        assert_eq!(heap.delete_min().unwrap().key(), 1);
        assert_eq!(heap.len(), 2);

        heap.decrease_key(&five, 0).unwrap();
        assert_eq!(heap.find_min().unwrap().key(), 0);
    }

    #[test]
    fn test_delete_inner_node() {
        let mut heap = PairingHeap::new(NaturalOrder);
        let handles: Vec<_> = (0..10i64).map(|k| heap.insert(k, k).unwrap()).collect();
        heap.delete_min().unwrap();
        heap.delete(&handles[5]).unwrap();
        let mut out = Vec::new();
        while let Ok(h) = heap.delete_min() {
            out.push(h.key());
        }
        assert_eq!(out, vec![1, 2, 3, 4, 6, 7, 8, 9]);
    }

    #[test]
    fn test_contract() {
        assert_addressable_contract(|| PairingHeap::new(NaturalOrder));
        assert_meld_contract(|| PairingHeap::new(NaturalOrder));
    }
}
