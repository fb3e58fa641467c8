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

//! Implicit-shape heaps over explicit nodes.
//!
//! The tree has the shape of a complete d-ary tree, but every position is a
//! heap-allocated node linked to its parent and children. Positions are found
//! by walking down from the root following the base-d digits of the position.
//! Sifting moves elements between nodes; the nodes themselves never move.

use crate::array::dary::validate_arity;
use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::AddressableHeap;
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;
use smallvec::SmallVec;

#[derive(Debug)]
struct TreeNode<K> {
    elem: Handle<K>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
}

/// An addressable d-ary heap stored as an explicit tree.
#[derive(Debug)]
pub struct DaryTreeAddressableHeap<K, C> {
    d: usize,
    arena: NodeArena<TreeNode<K>>,
    root: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
}

/// An addressable binary heap stored as an explicit tree.
pub type BinaryTreeAddressableHeap<K, C> = DaryTreeAddressableHeap<K, C>;

impl<K, C> DaryTreeAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    /// Creates an empty heap whose nodes have up to `d` children.
    pub fn new(d: usize, comparator: C) -> HeapResult<Self> {
        validate_arity(d)?;
        Ok(Self {
            d,
            arena: NodeArena::new(),
            root: None,
            comparator,
            owner: OwnerToken::new(),
        })
    }

    /// Creates an empty binary heap.
    pub fn binary(comparator: C) -> Self {
        Self {
            d: 2,
            arena: NodeArena::new(),
            root: None,
            comparator,
            owner: OwnerToken::new(),
        }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.d
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

    /// Walks from the root to the node at breadth-first position `pos`.
    fn node_at(&self, mut pos: usize) -> Option<NodeId> {
        let mut digits: SmallVec<[usize; 64]> = SmallVec::new();
        while pos > 0 {
            digits.push((pos - 1) % self.d);
            pos = (pos - 1) / self.d;
        }
        let mut cur = self.root?;
        for &digit in digits.iter().rev() {
            cur = *self.arena[cur].children.get(digit)?;
        }
        Some(cur)
    }

    /// Exchanges the elements stored at two nodes.
    fn swap_elements(&mut self, a: NodeId, b: NodeId) {
        let ea = self.arena[a].elem.clone();
        let eb = std::mem::replace(&mut self.arena[b].elem, ea.clone());
        ea.link(b.to_raw());
        eb.link(a.to_raw());
        self.arena[a].elem = eb;
    }

    fn sift_up(&mut self, mut x: NodeId) {
        while let Some(p) = self.arena[x].parent {
            if !self.less(x, p) {
                break;
            }
            self.swap_elements(x, p);
            x = p;
        }
    }

    fn sift_down(&mut self, mut x: NodeId) {
        loop {
            let mut best = x;
            for i in 0..self.arena[x].children.len() {
                let c = self.arena[x].children[i];
                if self.less(c, best) {
                    best = c;
                }
            }
            if best == x {
                break;
            }
            self.swap_elements(x, best);
            x = best;
        }
    }

    /// Removes the element at node `x` by replacing it with the element of
    /// the last position.
    fn remove_at(&mut self, x: NodeId) -> HeapResult<Handle<K>> {
        let last = self
            .node_at(self.arena.len() - 1)
            .ok_or_else(|| HeapError::illegal_state("tree shape is corrupt"))?;
        if x != last {
            self.swap_elements(x, last);
        }
        match self.arena[last].parent {
            Some(p) => {
                self.arena[p].children.pop();
            }
            None => self.root = None,
        }
        let node = self.arena.remove(last);
        node.elem.unlink();

        if x != last {
            let moved_up = self.arena[x]
                .parent
                .map_or(false, |p| self.less(x, p));
            if moved_up {
                self.sift_up(x);
            } else {
                self.sift_down(x);
            }
        }
        Ok(node.elem)
    }
}

impl<K, C> AddressableHeap<K> for DaryTreeAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let pos = self.arena.len();
        let parent = match pos {
            0 => None,
            _ => Some(
                self.node_at((pos - 1) / self.d)
                    .ok_or_else(|| HeapError::illegal_state("tree shape is corrupt"))?,
            ),
        };
        let id = self.arena.alloc(TreeNode {
            elem: handle.clone(),
            parent,
            children: SmallVec::new(),
        });
        handle.link(id.to_raw());
        match parent {
            Some(p) => self.arena[p].children.push(id),
            None => self.root = Some(id),
        }
        self.sift_up(id);
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.root
            .map(|r| self.arena[r].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        let root = self.root.ok_or(HeapError::NoSuchElement)?;
        self.remove_at(root)
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        self.sift_up(x);
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        self.remove_at(x).map(|_| ())
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
