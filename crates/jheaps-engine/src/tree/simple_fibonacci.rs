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

//! Simple Fibonacci heaps.
//!
//! The one-tree variant of Kaplan, Tarjan and Zwick. The heap is a single
//! heap-ordered tree. Decrease-key cuts the node and links it with the root;
//! ranks of the former ancestors are lowered along a path of marked nodes.
//! Extraction combines the children of the root with fair links (equal rank,
//! winner's rank grows) followed by naive links into one tree.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use smallvec::SmallVec;

#[derive(Debug)]
struct SimpleNode<K> {
    elem: Handle<K>,
    parent: Option<NodeId>,
    child: Option<NodeId>,
    next: Option<NodeId>,
    prev: Option<NodeId>,
    rank: usize,
    mark: bool,
}

/// A simple (one-tree) Fibonacci heap.
#[derive(Debug)]
pub struct SimpleFibonacciHeap<K, C> {
    arena: NodeArena<SimpleNode<K>>,
    root: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
}

impl<K, C> SimpleFibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            comparator,
            owner: OwnerToken::new(),
        }
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

    /// Makes the detached root `child` the first child of `parent`.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let first = self.arena[parent].child;
        {
            let c = &mut self.arena[child];
            c.parent = Some(parent);
            c.next = first;
            c.prev = None;
        }
        if let Some(f) = first {
            self.arena[f].prev = Some(child);
        }
        self.arena[parent].child = Some(child);
    }

    fn link(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let (winner, loser) = if self.less(b, a) { (b, a) } else { (a, b) };
        self.attach(winner, loser);
        winner
    }

    fn fair_link(&mut self, a: NodeId, b: NodeId) -> NodeId {
        let winner = self.link(a, b);
        self.arena[winner].rank += 1;
        winner
    }

    /// Detaches `x` with its subtree from its parent.
    fn cut(&mut self, x: NodeId) {
        let (parent, prev, next) = {
            let n = &self.arena[x];
            (n.parent, n.prev, n.next)
        };
        match prev {
            Some(p) => self.arena[p].next = next,
            None => {
                if let Some(p) = parent {
                    self.arena[p].child = next;
                }
            }
        }
        if let Some(n) = next {
            self.arena[n].prev = prev;
        }
        let n = &mut self.arena[x];
        n.parent = None;
        n.prev = None;
        n.next = None;
        n.mark = false;
    }

    /// Lowers ranks from `u` upward until an unmarked node absorbs the loss.
    fn decrease_ranks(&mut self, mut u: NodeId) {
        loop {
            let node = &mut self.arena[u];
            node.rank = node.rank.saturating_sub(1);
            let Some(parent) = node.parent else {
                break;
            };
            if !node.mark {
                node.mark = true;
                break;
            }
            node.mark = false;
            u = parent;
        }
    }

    fn remove_root(&mut self) -> HeapResult<Handle<K>> {
        let root = self.root.ok_or(HeapError::NoSuchElement)?;

        let mut by_rank: SmallVec<[Option<NodeId>; 64]> = SmallVec::new();
        let mut cur = self.arena[root].child.take();
        while let Some(c) = cur {
            cur = self.arena[c].next;
            {
                let n = &mut self.arena[c];
                n.parent = None;
                n.prev = None;
                n.next = None;
                n.mark = false;
            }
            let mut x = c;
            loop {
                let r = self.arena[x].rank;
                if by_rank.len() <= r {
                    by_rank.resize(r + 1, None);
                }
                match by_rank[r].take() {
                    Some(y) => x = self.fair_link(x, y),
                    None => {
                        by_rank[r] = Some(x);
                        break;
                    }
                }
            }
        }

        self.root = None;
        for x in by_rank.into_iter().flatten() {
            self.root = Some(match self.root {
                None => x,
                Some(r) => self.link(r, x),
            });
        }

        let node = self.arena.remove(root);
        node.elem.unlink();
        Ok(node.elem)
    }
}

impl<K, C> AddressableHeap<K> for SimpleFibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.arena.alloc(SimpleNode {
            elem: handle.clone(),
            parent: None,
            child: None,
            next: None,
            prev: None,
            rank: 0,
            mark: false,
        });
        handle.link(id.to_raw());
        self.root = Some(match self.root {
            None => id,
            Some(r) => self.link(r, id),
        });
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.root
            .map(|r| self.arena[r].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        self.remove_root()
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        let Some(parent) = self.arena[x].parent else {
            return Ok(());
        };
        if !self.less(x, parent) {
            return Ok(());
        }
        self.cut(x);
        if let Some(r) = self.root {
            self.root = Some(self.link(r, x));
        }
        self.decrease_ranks(parent);
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if let Some(parent) = self.arena[x].parent {
            // Promote x above the current root, then extract it.
            self.cut(x);
            self.decrease_ranks(parent);
            if let Some(r) = self.root {
                self.attach(x, r);
            }
            self.root = Some(x);
        }
        self.remove_root().map(|_| ())
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

impl<K, C> MergeableHeap for SimpleFibonacciHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.arena.absorb(&mut other.arena);
        self.root = match (self.root, other.root.take()) {
            (Some(a), Some(b)) => Some(self.link(a, b)),
            (a, None) => a,
            (None, b) => b,
        };
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}
