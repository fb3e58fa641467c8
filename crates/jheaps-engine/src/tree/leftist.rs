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

//! Leftist and skew heaps.
//!
//! Both are binary heap-ordered trees melded along their right spines. They
//! differ only in how the spine is repaired after a meld: a leftist heap swaps
//! children where the null path length of the right child exceeds the left's,
//! a skew heap swaps the children of every node on the merge path.
//!
//! Melds are iterative. The merge path is recorded top-down and repaired
//! bottom-up, so degenerate skew trees cannot overflow the stack.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use std::fmt::Debug;
use std::marker::PhantomData;

/// How the merge path is repaired.
pub trait MergeDiscipline: Debug + Send + Sync + 'static {
    /// Swap the children of every node on the merge path.
    const ALWAYS_SWAP: bool;
}

/// Rank-driven repair.
#[derive(Debug, Clone, Copy, Default)]
pub struct Leftist;

impl MergeDiscipline for Leftist {
    const ALWAYS_SWAP: bool = false;
}

/// Unconditional swaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct Skew;

impl MergeDiscipline for Skew {
    const ALWAYS_SWAP: bool = true;
}

#[derive(Debug)]
struct MeldNode<K> {
    elem: Handle<K>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    npl: u32,
}

/// A binary tree heap melded along its right spine.
#[derive(Debug)]
pub struct SpineMeldHeap<K, C, D> {
    arena: NodeArena<MeldNode<K>>,
    root: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
    _discipline: PhantomData<fn() -> D>,
}

/// A leftist heap.
pub type LeftistHeap<K, C> = SpineMeldHeap<K, C, Leftist>;

/// A skew heap.
pub type SkewHeap<K, C> = SpineMeldHeap<K, C, Skew>;

impl<K, C, D> SpineMeldHeap<K, C, D>
where
    K: Key,
    C: Comparator<K>,
    D: MergeDiscipline,
{
    pub fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            comparator,
            owner: OwnerToken::new(),
            _discipline: PhantomData,
        }
    }

    #[inline]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.arena[a].elem.key(), &self.arena[b].elem.key())
    }

    #[inline]
    fn npl(&self, n: Option<NodeId>) -> u32 {
        n.map_or(0, |n| self.arena[n].npl)
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    #[inline]
    fn set_right(&mut self, parent: NodeId, child: Option<NodeId>) {
        self.arena[parent].right = child;
        if let Some(c) = child {
            self.arena[c].parent = Some(parent);
        }
    }

    /// Repairs a single node of the merge path. Returns `true` if its null
    /// path length changed.
    fn repair(&mut self, x: NodeId) -> bool {
        let (left, right) = (self.arena[x].left, self.arena[x].right);
        let swap = D::ALWAYS_SWAP || self.npl(left) < self.npl(right);
        let shorter = if swap { left } else { right };
        let npl = self.npl(shorter) + 1;
        let n = &mut self.arena[x];
        if swap {
            std::mem::swap(&mut n.left, &mut n.right);
        }
        let changed = n.npl != npl;
        n.npl = npl;
        changed
    }

    /// Melds two detached trees.
    fn merge(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        let (mut a, mut b) = match (a, b) {
            (Some(a), Some(b)) => (a, b),
            (a, None) => return a,
            (None, b) => return b,
        };
        if self.less(b, a) {
            std::mem::swap(&mut a, &mut b);
        }
        let root = a;
        let mut path = vec![a];
        loop {
            match self.arena[a].right {
                None => {
                    self.set_right(a, Some(b));
                    break;
                }
                Some(r) => {
                    if self.less(b, r) {
                        self.set_right(a, Some(b));
                        a = b;
                        b = r;
                    } else {
                        a = r;
                    }
                    path.push(a);
                }
            }
        }
        for &x in path.iter().rev() {
            self.repair(x);
        }
        self.arena[root].parent = None;
        Some(root)
    }

    /// Detaches the subtree rooted at the non-root `x`.
    fn cut(&mut self, x: NodeId) {
        let Some(parent) = self.arena[x].parent.take() else {
            return;
        };
        if self.arena[parent].left == Some(x) {
            self.arena[parent].left = None;
        } else {
            self.arena[parent].right = None;
        }
        if D::ALWAYS_SWAP {
            return;
        }
        let mut cur = Some(parent);
        while let Some(u) = cur {
            if !self.repair(u) {
                break;
            }
            cur = self.arena[u].parent;
        }
    }

    fn remove_node(&mut self, x: NodeId) -> Handle<K> {
        let is_root = Some(x) == self.root;
        if !is_root {
            self.cut(x);
        }
        let (left, right) = {
            let n = &mut self.arena[x];
            (n.left.take(), n.right.take())
        };
        for c in [left, right].into_iter().flatten() {
            self.arena[c].parent = None;
        }
        let merged = self.merge(left, right);
        self.root = if is_root {
            merged
        } else {
            self.merge(self.root, merged)
        };
        let node = self.arena.remove(x);
        node.elem.unlink();
        node.elem
    }
}

impl<K, C, D> AddressableHeap<K> for SpineMeldHeap<K, C, D>
where
    K: Key,
    C: Comparator<K>,
    D: MergeDiscipline,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.arena.alloc(MeldNode {
            elem: handle.clone(),
            left: None,
            right: None,
            parent: None,
            npl: 1,
        });
        handle.link(id.to_raw());
        self.root = self.merge(self.root, Some(id));
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.root
            .map(|r| self.arena[r].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        let root = self.root.ok_or(HeapError::NoSuchElement)?;
        Ok(self.remove_node(root))
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        if Some(x) == self.root {
            return Ok(());
        }
        if let Some(p) = self.arena[x].parent {
            if !self.less(x, p) {
                return Ok(());
            }
        }
        self.cut(x);
        self.root = self.merge(self.root, Some(x));
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        self.remove_node(x);
        Ok(())
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
        self.root = None;
    }
}

impl<K, C, D> MergeableHeap for SpineMeldHeap<K, C, D>
where
    K: Key,
    C: Comparator<K>,
    D: MergeDiscipline,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.arena.absorb(&mut other.arena);
        self.root = self.merge(self.root, other.root.take());
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_addressable_contract, assert_meld_contract};
    use jheaps_core::compare::NaturalOrder;

    fn assert_leftist(heap: &LeftistHeap<i64, NaturalOrder>, n: Option<NodeId>) -> u32 {
        let Some(n) = n else {
            return 0;
        };
        let node = &heap.arena[n];
        let l = assert_leftist(heap, node.left);
        let r = assert_leftist(heap, node.right);
        assert!(l >= r, "leftist property violated at {}", n);
        assert_eq!(node.npl, r + 1);
        node.npl
    }

    #[test]
    fn test_leftist_property_holds() {
        let mut heap = LeftistHeap::new(NaturalOrder);
        let handles: Vec<_> = (0..200i64)
            .map(|k| heap.insert((k * 37) % 101, k).unwrap())
            .collect();
        assert_leftist(&heap, heap.root);

        for h in handles.iter().step_by(7) {
            heap.decrease_key(h, h.key() - 50).unwrap();
        }
        assert_leftist(&heap, heap.root);

        for h in handles.iter().skip(3).step_by(11) {
            heap.delete(h).unwrap();
        }
        assert_leftist(&heap, heap.root);
    }

    #[test]
    fn test_skew_sorted_insertions() {
        let mut heap = SkewHeap::new(NaturalOrder);
        for k in (0..5000i64).rev() {
            heap.insert(k, 0).unwrap();
        }
        for k in 0..5000i64 {
            assert_eq!(heap.delete_min().unwrap().key(), k);
        }
    }

    #[test]
    fn test_contract() {
        assert_addressable_contract(|| LeftistHeap::new(NaturalOrder));
        assert_meld_contract(|| LeftistHeap::new(NaturalOrder));
        assert_addressable_contract(|| SkewHeap::new(NaturalOrder));
        assert_meld_contract(|| SkewHeap::new(NaturalOrder));
    }
}
