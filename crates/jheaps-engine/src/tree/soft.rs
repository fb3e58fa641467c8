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

//! Soft heaps.
//!
//! Kaplan, Tarjan and Zwick's binary-tree soft heap. Every node carries a list
//! of elements and a common key `ckey` that bounds the keys in the list from
//! above. Nodes of rank above `rank_limit` may hold more than one element,
//! which corrupts the effective key of all but the largest to `ckey`. With
//! error rate `ε`, at most `εn` elements are corrupted at any time.
//!
//! The root list is kept sorted by rank with at most one tree per rank, and a
//! suffix-minimum table over the roots answers `find_min` without a scan.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

#[derive(Debug)]
struct SoftNode<K> {
    rank: u32,
    target: usize,
    ckey: K,
    left: Option<NodeId>,
    right: Option<NodeId>,
    parent: Option<NodeId>,
    items: Vec<Handle<K>>,
}

/// An addressable soft heap.
#[derive(Debug)]
pub struct BinaryTreeSoftAddressableHeap<K, C> {
    arena: NodeArena<SoftNode<K>>,
    roots: Vec<NodeId>,
    suffix_min: Vec<usize>,
    len: usize,
    rank_limit: u32,
    error_rate: f64,
    comparator: C,
    owner: OwnerToken,
}

/// Rank from which nodes start to pool elements.
fn rank_limit_for(error_rate: f64) -> u32 {
    (1.0 / error_rate).log2().ceil() as u32 + 5
}

impl<K, C> BinaryTreeSoftAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    /// Creates an empty soft heap. `error_rate` must lie in `(0, 1]`.
    pub fn new(error_rate: f64, comparator: C) -> HeapResult<Self> {
        if !(error_rate > 0.0 && error_rate <= 1.0) {
            return Err(HeapError::illegal_argument(
                "error rate must be in (0, 1]",
            ));
        }
        Ok(Self {
            arena: NodeArena::new(),
            roots: Vec::new(),
            suffix_min: Vec::new(),
            len: 0,
            rank_limit: rank_limit_for(error_rate),
            error_rate,
            comparator,
            owner: OwnerToken::new(),
        })
    }

    #[inline]
    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    #[inline]
    pub fn rank_limit(&self) -> u32 {
        self.rank_limit
    }

    #[inline]
    fn ckey_less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.arena[a].ckey, &self.arena[b].ckey)
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    fn refresh_suffix_min(&mut self) {
        let n = self.roots.len();
        self.suffix_min.clear();
        self.suffix_min.resize(n, 0);
        for i in (0..n).rev() {
            let best = if i + 1 < n
                && self.ckey_less(self.roots[self.suffix_min[i + 1]], self.roots[i])
            {
                self.suffix_min[i + 1]
            } else {
                i
            };
            self.suffix_min[i] = best;
        }
    }

    fn min_root(&self) -> Option<NodeId> {
        self.suffix_min.first().map(|&i| self.roots[i])
    }

    /// Pulls elements up from the children of `x` until its list reaches the
    /// target size or `x` becomes a leaf.
    fn sift(&mut self, x: NodeId) {
        while self.arena[x].items.len() < self.arena[x].target {
            let child = match (self.arena[x].left, self.arena[x].right) {
                (None, None) => break,
                (Some(c), None) | (None, Some(c)) => c,
                (Some(a), Some(b)) => {
                    if self.ckey_less(b, a) {
                        b
                    } else {
                        a
                    }
                }
            };

            let moved = std::mem::take(&mut self.arena[child].items);
            for h in &moved {
                h.link(x.to_raw());
            }
            let ckey = self.arena[child].ckey;
            let n = &mut self.arena[x];
            n.items.extend(moved);
            n.ckey = ckey;

            self.sift(child);
            if self.arena[child].items.is_empty() {
                self.detach_leaf(child);
            }
        }
    }

    /// Removes the exhausted leaf `x`.
    fn detach_leaf(&mut self, x: NodeId) {
        match self.arena[x].parent {
            Some(p) => {
                let n = &mut self.arena[p];
                if n.left == Some(x) {
                    n.left = None;
                } else {
                    n.right = None;
                }
            }
            None => {
                if let Some(pos) = self.roots.iter().position(|&r| r == x) {
                    self.roots.remove(pos);
                }
            }
        }
        self.arena.remove(x);
    }

    /// Links two trees of equal rank under a fresh node.
    fn combine(&mut self, x: NodeId, y: NodeId) -> NodeId {
        let rank = self.arena[x].rank + 1;
        let target = if rank <= self.rank_limit {
            1
        } else {
            (3 * self.arena[x].target + 1) / 2
        };
        let z = self.arena.alloc(SoftNode {
            rank,
            target,
            ckey: self.arena[x].ckey,
            left: Some(x),
            right: Some(y),
            parent: None,
            items: Vec::new(),
        });
        self.arena[x].parent = Some(z);
        self.arena[y].parent = Some(z);
        self.sift(z);
        z
    }

    /// Adds a tree to the root list, combining equal ranks like a binary
    /// counter.
    fn add_tree(&mut self, mut x: NodeId) {
        loop {
            let rank = self.arena[x].rank;
            match self
                .roots
                .binary_search_by_key(&rank, |&r| self.arena[r].rank)
            {
                Ok(pos) => {
                    let y = self.roots.remove(pos);
                    x = self.combine(x, y);
                }
                Err(pos) => {
                    self.roots.insert(pos, x);
                    break;
                }
            }
        }
    }

    /// Restores a node whose list ran empty.
    fn refill(&mut self, x: NodeId) {
        if !self.arena[x].items.is_empty() {
            return;
        }
        self.sift(x);
        if self.arena[x].items.is_empty() {
            self.detach_leaf(x);
        }
    }

    #[cfg(test)]
    fn corrupted(&self) -> usize {
        self.arena
            .values()
            .map(|n| {
                n.items
                    .iter()
                    .filter(|h| self.comparator.less(&h.key(), &n.ckey))
                    .count()
            })
            .sum()
    }
}

impl<K, C> AddressableHeap<K> for BinaryTreeSoftAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.arena.alloc(SoftNode {
            rank: 0,
            target: 1,
            ckey: key,
            left: None,
            right: None,
            parent: None,
            items: vec![handle.clone()],
        });
        handle.link(id.to_raw());
        self.add_tree(id);
        self.len += 1;
        self.refresh_suffix_min();
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.min_root()
            .and_then(|r| self.arena[r].items.last().cloned())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        let root = self.min_root().ok_or(HeapError::NoSuchElement)?;
        let handle = self.arena[root]
            .items
            .pop()
            .ok_or_else(|| HeapError::illegal_state("soft heap root without elements"))?;
        handle.unlink();
        self.len -= 1;
        self.refill(root);
        self.refresh_suffix_min();
        Ok(handle)
    }

    fn decrease_key(&mut self, _handle: &Handle<K>, _key: K) -> HeapResult<()> {
        Err(HeapError::unsupported(
            "decrease-key is not supported by soft heaps",
        ))
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        let pos = self.arena[x]
            .items
            .iter()
            .position(|h| h.ptr_eq(handle))
            .ok_or_else(HeapError::invalid_handle)?;
        self.arena[x].items.swap_remove(pos);
        handle.unlink();
        self.len -= 1;
        self.refill(x);
        self.refresh_suffix_min();
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for node in self.arena.values() {
            for h in &node.items {
                h.unlink();
            }
        }
        self.arena.clear();
        self.roots.clear();
        self.suffix_min.clear();
        self.len = 0;
    }
}

impl<K, C> MergeableHeap for BinaryTreeSoftAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        if self.rank_limit != other.rank_limit {
            return Err(HeapError::illegal_argument(
                "cannot meld soft heaps with different error rates",
            ));
        }
        self.arena.absorb(&mut other.arena);
        for root in std::mem::take(&mut other.roots) {
            self.add_tree(root);
        }
        other.suffix_min.clear();
        self.len += std::mem::take(&mut other.len);
        self.refresh_suffix_min();
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}
