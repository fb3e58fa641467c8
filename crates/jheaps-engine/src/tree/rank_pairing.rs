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

//! Rank-pairing heaps (type 1).
//!
//! Haeupler, Sen and Tarjan's heap is a list of half-ordered half trees: every
//! node is no greater than the nodes of its left subtree, and roots have no
//! right child. Ranks obey the type-1 rule: a root's rank is one more than its
//! left child's; every other node is a 1,1-node or a 0,i-node. Extraction
//! performs a single pass of links between roots of equal rank.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

#[derive(Debug)]
struct RankPairingNode<K> {
    elem: Handle<K>,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    rank: i64,
}

/// A type-1 rank-pairing heap.
#[derive(Debug)]
pub struct RankPairingHeap<K, C> {
    arena: NodeArena<RankPairingNode<K>>,
    roots: Vec<NodeId>,
    min: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
}

impl<K, C> RankPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            roots: Vec::new(),
            min: None,
            comparator,
            owner: OwnerToken::new(),
        }
    }

    #[inline]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.arena[a].elem.key(), &self.arena[b].elem.key())
    }

    #[inline]
    fn rank_of(&self, n: Option<NodeId>) -> i64 {
        n.map_or(-1, |n| self.arena[n].rank)
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    fn add_root(&mut self, x: NodeId) {
        self.roots.push(x);
        match self.min {
            Some(m) if !self.less(x, m) => {}
            _ => self.min = Some(x),
        }
    }

    /// Links two half trees of equal rank.
    fn link(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (winner, loser) = if self.less(b, a) { (b, a) } else { (a, b) };
        let winner_left = self.arena[winner].left;
        {
            let l = &mut self.arena[loser];
            l.right = winner_left;
            l.parent = Some(winner);
        }
        if let Some(c) = winner_left {
            self.arena[c].parent = Some(loser);
        }
        let w = &mut self.arena[winner];
        w.left = Some(loser);
        w.rank += 1;
        winner
    }

    /// Detaches the non-root `x` with its left subtree and makes it a root.
    /// Returns the former parent of `x`.
    fn cut(&mut self, x: NodeId) -> Option<NodeId> {
        let (parent, right) = {
            let n = &self.arena[x];
            (n.parent?, n.right)
        };
        if self.arena[parent].left == Some(x) {
            self.arena[parent].left = right;
        } else {
            self.arena[parent].right = right;
        }
        if let Some(r) = right {
            self.arena[r].parent = Some(parent);
        }
        let new_rank = self.rank_of(self.arena[x].left) + 1;
        let n = &mut self.arena[x];
        n.right = None;
        n.parent = None;
        n.rank = new_rank;
        self.roots.push(x);
        Some(parent)
    }

    /// Restores the type-1 rank rule on the path from `u` to its root.
    fn reduce_ranks(&mut self, mut u: NodeId) {
        loop {
            let (left, right, parent, rank) = {
                let n = &self.arena[u];
                (n.left, n.right, n.parent, n.rank)
            };
            match parent {
                None => {
                    self.arena[u].rank = self.rank_of(left) + 1;
                    break;
                }
                Some(p) => {
                    let r1 = self.rank_of(left);
                    let r2 = self.rank_of(right);
                    let k = if r1 == r2 { r1 + 1 } else { r1.max(r2) };
                    if k >= rank {
                        break;
                    }
                    self.arena[u].rank = k;
                    u = p;
                }
            }
        }
    }

    fn remove_min(&mut self) -> HeapResult<Handle<K>> {
        let x = self.min.ok_or(HeapError::NoSuchElement)?;
        let mut pending = std::mem::take(&mut self.roots);
        if let Some(pos) = pending.iter().position(|&r| r == x) {
            pending.swap_remove(pos);
        }

        // Disassemble the right spine of x's left child into half trees.
        let mut spine = self.arena[x].left.take();
        while let Some(c) = spine {
            spine = self.arena[c].right.take();
            let rank = self.rank_of(self.arena[c].left) + 1;
            let n = &mut self.arena[c];
            n.parent = None;
            n.rank = rank;
            pending.push(c);
        }

        // One pass of links between equal ranks.
        let mut buckets: Vec<Option<NodeId>> = Vec::new();
        for r in pending {
            let k = self.arena[r].rank as usize;
            if buckets.len() <= k {
                buckets.resize(k + 1, None);
            }
            match buckets[k].take() {
                Some(o) => {
                    let linked = self.link(r, o);
                    self.roots.push(linked);
                }
                None => buckets[k] = Some(r),
            }
        }
        self.roots.extend(buckets.into_iter().flatten());

        self.min = None;
        for i in 0..self.roots.len() {
            let r = self.roots[i];
            match self.min {
                Some(m) if !self.less(r, m) => {}
                _ => self.min = Some(r),
            }
        }

        let node = self.arena.remove(x);
        node.elem.unlink();
        Ok(node.elem)
    }
}

impl<K, C> AddressableHeap<K> for RankPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.arena.alloc(RankPairingNode {
            elem: handle.clone(),
            left: None,
            right: None,
            parent: None,
            rank: 0,
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
        if let Some(parent) = self.cut(x) {
            self.reduce_ranks(parent);
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
        if let Some(parent) = self.cut(x) {
            self.reduce_ranks(parent);
        }
        self.min = Some(x);
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
        self.roots.clear();
        self.min = None;
    }
}

impl<K, C> MergeableHeap for RankPairingHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.arena.absorb(&mut other.arena);
        self.roots.append(&mut other.roots);
        if let Some(om) = other.min.take() {
            match self.min {
                Some(m) if !self.less(om, m) => {}
                _ => self.min = Some(om),
            }
        }
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}
