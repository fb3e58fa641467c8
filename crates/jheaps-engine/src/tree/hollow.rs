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

//! Hollow heaps.
//!
//! The two-parent hollow heap of Hansen, Kaplan, Tarjan and Zwick. Decrease-key
//! and delete never restructure the tree eagerly: decrease-key moves the item
//! into a fresh node and leaves the old node hollow, delete just empties the
//! node. Hollow nodes are destroyed when they surface at the root.
//!
//! A node created by decrease-key adopts the hollowed node as its last child,
//! so a hollow node may have two parents; `ep` records the second one.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, MergeableHeap};
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use smallvec::SmallVec;

#[derive(Debug)]
struct HollowNode<K> {
    item: Option<Handle<K>>,
    key: K,
    rank: usize,
    child: Option<NodeId>,
    next: Option<NodeId>,
    ep: Option<NodeId>,
}

/// A hollow heap.
#[derive(Debug)]
pub struct HollowHeap<K, C> {
    arena: NodeArena<HollowNode<K>>,
    root: Option<NodeId>,
    len: usize,
    comparator: C,
    owner: OwnerToken,
}

impl<K, C> HollowHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            len: 0,
            comparator,
            owner: OwnerToken::new(),
        }
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    fn make_node(&mut self, item: Handle<K>, key: K, rank: usize) -> NodeId {
        let id = self.arena.alloc(HollowNode {
            item: Some(item.clone()),
            key,
            rank,
            child: None,
            next: None,
            ep: None,
        });
        item.link(id.to_raw());
        id
    }

    #[inline]
    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let first = self.arena[parent].child;
        self.arena[child].next = first;
        self.arena[parent].child = Some(child);
    }

    fn link(&mut self, v: NodeId, w: NodeId) -> NodeId {
        if self
            .comparator
            .less(&self.arena[w].key, &self.arena[v].key)
        {
            self.add_child(w, v);
            w
        } else {
            self.add_child(v, w);
            v
        }
    }

    #[inline]
    fn meld_roots(&mut self, a: Option<NodeId>, b: Option<NodeId>) -> Option<NodeId> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.link(a, b)),
            (a, None) => a,
            (None, b) => b,
        }
    }

    /// Destroys the hollow root and every hollow node reachable through
    /// hollow nodes only, relinking the full nodes found on the way.
    fn rebuild_from_hollow_root(&mut self, root: NodeId) {
        let mut by_rank: SmallVec<[Option<NodeId>; 64]> = SmallVec::new();
        self.arena[root].next = None;
        let mut pending = Some(root);

        while let Some(x) = pending {
            let mut w = self.arena[x].child;
            pending = self.arena[x].next;

            while let Some(u) = w {
                w = self.arena[u].next;
                if self.arena[u].item.is_none() {
                    match self.arena[u].ep {
                        None => {
                            self.arena[u].next = pending;
                            pending = Some(u);
                        }
                        Some(ep) => {
                            if ep == x {
                                w = None;
                            } else {
                                self.arena[u].next = None;
                            }
                            self.arena[u].ep = None;
                        }
                    }
                } else {
                    self.arena[u].next = None;
                    let mut u = u;
                    loop {
                        let r = self.arena[u].rank;
                        if by_rank.len() <= r {
                            by_rank.resize(r + 1, None);
                        }
                        match by_rank[r].take() {
                            Some(v) => {
                                u = self.link(u, v);
                                self.arena[u].rank += 1;
                            }
                            None => {
                                by_rank[r] = Some(u);
                                break;
                            }
                        }
                    }
                }
            }
            self.arena.remove(x);
        }

        self.root = None;
        for u in by_rank.into_iter().flatten() {
            self.arena[u].next = None;
            self.root = self.meld_roots(self.root, Some(u));
        }
    }

    fn remove_item(&mut self, u: NodeId) -> Handle<K> {
        let item = self.arena[u].item.take();
        self.len -= 1;
        if Some(u) == self.root {
            self.rebuild_from_hollow_root(u);
        }
        match item {
            Some(item) => {
                item.unlink();
                item
            }
            None => panic!("called `HollowHeap::remove_item` on hollow node {}", u),
        }
    }
}

impl<K, C> AddressableHeap<K> for HollowHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.make_node(handle.clone(), key, 0);
        self.root = self.meld_roots(self.root, Some(id));
        self.len += 1;
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.root
            .and_then(|r| self.arena[r].item.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        let root = self.root.ok_or(HeapError::NoSuchElement)?;
        Ok(self.remove_item(root))
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let u = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        if Some(u) == self.root {
            self.arena[u].key = key;
            return Ok(());
        }

        let rank = self.arena[u].rank.saturating_sub(2);
        self.arena[u].item = None;
        let v = self.make_node(handle.clone(), key, rank);
        self.arena[v].child = Some(u);
        self.arena[u].ep = Some(v);
        self.root = self.meld_roots(Some(v), self.root);
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let u = self.locate(handle)?;
        self.remove_item(u);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for node in self.arena.values() {
            if let Some(item) = &node.item {
                item.unlink();
            }
        }
        self.arena.clear();
        self.root = None;
        self.len = 0;
    }
}

impl<K, C> MergeableHeap for HollowHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.arena.absorb(&mut other.arena);
        self.root = self.meld_roots(self.root, other.root.take());
        self.len += std::mem::take(&mut other.len);
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}
