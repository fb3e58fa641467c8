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

//! Fibonacci heaps.
//!
//! Roots and siblings live in circular doubly linked lists. Extraction
//! consolidates the root list by degree; decrease-key cuts the node and
//! cascades along marked ancestors.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use smallvec::SmallVec;

#[derive(Debug)]
struct FibonacciNode<K> {
    elem: Handle<K>,
    parent: Option<NodeId>,
    child: Option<NodeId>,
    left: NodeId,
    right: NodeId,
    degree: usize,
    mark: bool,
}

/// A Fibonacci heap.
#[derive(Debug)]
pub struct FibonacciHeap<K, C> {
    arena: NodeArena<FibonacciNode<K>>,
    min: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
}

impl<K, C> FibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            min: None,
            comparator,
            owner: OwnerToken::new(),
        }
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[inline]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.arena[a].elem.key(), &self.arena[b].elem.key())
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    /// Makes `x` a singleton circular list.
    #[inline]
    fn isolate(&mut self, x: NodeId) {
        let n = &mut self.arena[x];
        n.left = x;
        n.right = x;
    }

    /// Splices the circular list containing `b` into the one containing `a`.
    fn splice(&mut self, a: NodeId, b: NodeId) {
        let a_right = self.arena[a].right;
        let b_left = self.arena[b].left;
        self.arena[a].right = b;
        self.arena[b].left = a;
        self.arena[b_left].right = a_right;
        self.arena[a_right].left = b_left;
    }

    /// Removes `x` from its sibling list.
    fn unsplice(&mut self, x: NodeId) {
        let (l, r) = {
            let n = &self.arena[x];
            (n.left, n.right)
        };
        self.arena[l].right = r;
        self.arena[r].left = l;
        self.isolate(x);
    }

    fn add_root(&mut self, x: NodeId) {
        {
            let n = &mut self.arena[x];
            n.parent = None;
            n.mark = false;
        }
        match self.min {
            None => {
                self.isolate(x);
                self.min = Some(x);
            }
            Some(m) => {
                self.isolate(x);
                self.splice(m, x);
                if self.less(x, m) {
                    self.min = Some(x);
                }
            }
        }
    }

    /// Makes `y` a child of `x`.
    fn link(&mut self, y: NodeId, x: NodeId) {
        self.unsplice(y);
        {
            let n = &mut self.arena[y];
            n.parent = Some(x);
            n.mark = false;
        }
        match self.arena[x].child {
            None => self.arena[x].child = Some(y),
            Some(c) => self.splice(c, y),
        }
        self.arena[x].degree += 1;
    }

    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let mut roots: SmallVec<[NodeId; 64]> = SmallVec::new();
        let mut cur = start;
        loop {
            roots.push(cur);
            cur = self.arena[cur].right;
            if cur == start {
                break;
            }
        }

        let mut by_degree: SmallVec<[Option<NodeId>; 64]> = SmallVec::new();
        for &w in &roots {
            let mut x = w;
            let mut d = self.arena[x].degree;
            loop {
                if by_degree.len() <= d {
                    by_degree.resize(d + 1, None);
                }
                let Some(mut y) = by_degree[d].take() else {
                    break;
                };
                if self.less(y, x) {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                d += 1;
            }
            if by_degree.len() <= d {
                by_degree.resize(d + 1, None);
            }
            by_degree[d] = Some(x);
        }

        self.min = None;
        for x in by_degree.into_iter().flatten() {
            self.add_root(x);
        }
    }

    /// Detaches `x` from its parent and makes it a root.
    fn cut(&mut self, x: NodeId, parent: NodeId) {
        let right = self.arena[x].right;
        if self.arena[parent].child == Some(x) {
            self.arena[parent].child = (right != x).then_some(right);
        }
        self.unsplice(x);
        self.arena[parent].degree -= 1;
        self.add_root(x);
    }

    fn cascading_cut(&mut self, mut y: NodeId) {
        while let Some(z) = self.arena[y].parent {
            if !self.arena[y].mark {
                self.arena[y].mark = true;
                return;
            }
            self.cut(y, z);
            y = z;
        }
    }

    fn remove_min(&mut self) -> HeapResult<Handle<K>> {
        let z = self.min.ok_or(HeapError::NoSuchElement)?;

        // Promote the children of z to roots.
        let mut child = self.arena[z].child.take();
        while let Some(c) = child {
            let next = self.arena[c].right;
            child = (next != c).then_some(next);
            self.unsplice(c);
            let n = &mut self.arena[c];
            n.parent = None;
            n.mark = false;
            self.splice(z, c);
        }

        let right = self.arena[z].right;
        self.unsplice(z);
        if right == z {
            self.min = None;
        } else {
            self.min = Some(right);
            self.consolidate();
        }

        let node = self.arena.remove(z);
        node.elem.unlink();
        Ok(node.elem)
    }

    /// Moves `x` to the root list and makes it the minimum regardless of
    /// its key.
    fn force_min(&mut self, x: NodeId) {
        if let Some(p) = self.arena[x].parent {
            self.cut(x, p);
            self.cascading_cut(p);
        }
        self.min = Some(x);
    }
}

impl<K, C> AddressableHeap<K> for FibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.arena.alloc(FibonacciNode {
            elem: handle.clone(),
            parent: None,
            child: None,
            left: NodeId::from_raw(0),
            right: NodeId::from_raw(0),
            degree: 0,
            mark: false,
        });
        handle.link(id.to_raw());
        self.add_root(id);
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.min
            .map(|m| self.arena[m].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        self.remove_min()
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        if let Some(p) = self.arena[x].parent {
            if self.less(x, p) {
                self.cut(x, p);
                self.cascading_cut(p);
            }
        }
        if let Some(m) = self.min {
            if self.less(x, m) {
                self.min = Some(x);
            }
        }
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        self.force_min(x);
        self.remove_min().map(|_| ())
    }

    #[inline]
    fn len(&self) -> usize {
        self.arena.len()
    }

    fn clear(&mut self) {
        for node in self.arena.values() {
            node.elem.unlink();
        }
        self.arena.clear();
        self.min = None;
    }
}

impl<K, C> MergeableHeap for FibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.arena.absorb(&mut other.arena);
        if let Some(om) = other.min.take() {
            match self.min {
                None => self.min = Some(om),
                Some(m) => {
                    self.splice(m, om);
                    if self.less(om, m) {
                        self.min = Some(om);
                    }
                }
            }
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
    use std::cmp::Ordering;

    /// Natural order carrying an identity, so two instances can differ.
    #[derive(Debug, Clone, PartialEq)]
    struct Tagged(u8);

    impl Comparator<i64> for Tagged {
        fn compare(&self, a: &i64, b: &i64) -> Ordering {
            a.cmp(b)
        }
    }

    #[test]
    fn test_consolidation_after_many_inserts() {
        let mut heap = FibonacciHeap::new(NaturalOrder);
        let handles: Vec<_> = (0..100i64).rev().map(|k| heap.insert(k, 0).unwrap()).collect();
        assert_eq!(heap.delete_min().unwrap().key(), 0);
        // Decrease deep nodes to trigger cascading cuts.
        for h in handles.iter().take(40) {
            let k = h.key();
            heap.decrease_key(h, k - 1000).unwrap();
        }
        assert_eq!(heap.find_min().unwrap().key(), 99 - 1000);
        assert_eq!(heap.len(), 99);
    }

    #[test]
    fn test_meld_rejects_different_comparators() {
        let mut a = FibonacciHeap::new(Tagged(1));
        let mut b = FibonacciHeap::new(Tagged(2));
        a.insert(1i64, 0).unwrap();
        b.insert(2i64, 0).unwrap();
        assert_eq!(a.meld(&mut b), Err(HeapError::comparator_mismatch()));
        assert_eq!((a.len(), b.len()), (1, 1));

        let mut c = FibonacciHeap::new(Tagged(1));
        c.insert(0i64, 0).unwrap();
        a.meld(&mut c).unwrap();
        assert_eq!(a.find_min().unwrap().key(), 0);
    }

    #[test]
    fn test_contract() {
        assert_addressable_contract(|| FibonacciHeap::new(NaturalOrder));
        assert_meld_contract(|| FibonacciHeap::new(NaturalOrder));
    }
}
