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

//! Segmented node storage with merge-stable ids.
//!
//! Pointer-based heaps (Fibonacci, pairing, hollow, ...) keep their nodes in a
//! `NodeArena`. A node is addressed by a `NodeId`, the pair of the segment it
//! was allocated in and its slot inside that segment. Segment ids are drawn
//! from a process-wide counter, so ids of two different arenas never collide.
//!
//! Melding two heaps moves the segments of one arena into the other
//! ([`NodeArena::absorb`]). No node is copied and no id changes, which keeps
//! element handles pointing at their nodes and makes meld cost proportional
//! to the number of segments rather than the number of nodes.

use crate::utils::index::{TypedIndex, TypedIndexTag};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SegmentTag;

impl TypedIndexTag for SegmentTag {
    const NAME: &'static str = "Segment";
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct SlotTag;

impl TypedIndexTag for SlotTag {
    const NAME: &'static str = "Slot";
}

/// Identifies a segment of node storage.
pub type SegmentId = TypedIndex<SegmentTag>;

/// Position of a node inside its segment.
pub type SlotIndex = TypedIndex<SlotTag>;

static NEXT_SEGMENT: AtomicU32 = AtomicU32::new(0);

#[inline]
fn fresh_segment() -> SegmentId {
    SegmentId::new(NEXT_SEGMENT.fetch_add(1, Ordering::Relaxed))
}

/// Stable address of a node inside a [`NodeArena`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    segment: SegmentId,
    slot: SlotIndex,
}

impl NodeId {
    /// Creates a node id from its parts.
    #[inline(always)]
    pub const fn new(segment: SegmentId, slot: SlotIndex) -> Self {
        Self { segment, slot }
    }

    #[inline(always)]
    pub const fn segment(&self) -> SegmentId {
        self.segment
    }

    #[inline(always)]
    pub const fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Packs the id into a single word.
    #[inline(always)]
    pub const fn to_raw(self) -> u64 {
        ((self.segment.get() as u64) << 32) | self.slot.get() as u64
    }

    /// Unpacks an id produced by [`NodeId::to_raw`].
    #[inline(always)]
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            segment: SegmentId::new((raw >> 32) as u32),
            slot: SlotIndex::new(raw as u32),
        }
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeId({}:{})", self.segment.get(), self.slot.get())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Slot storage for heap nodes.
#[derive(Debug, Clone)]
pub struct NodeArena<N> {
    home: SegmentId,
    nodes: Vec<Option<N>>,
    foreign: FxHashMap<SegmentId, Vec<Option<N>>>,
    free: Vec<NodeId>,
    len: usize,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> NodeArena<N> {
    /// Creates an empty arena with a fresh home segment.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena whose home segment can hold `capacity` nodes
    /// without reallocating.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            home: fresh_segment(),
            nodes: Vec::with_capacity(capacity),
            foreign: FxHashMap::default(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the arena holds no live nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of segments currently owned by this arena.
    #[inline]
    pub fn num_segments(&self) -> usize {
        1 + self.foreign.len()
    }

    /// Stores `node` and returns its id.
    pub fn alloc(&mut self, node: N) -> NodeId {
        self.len += 1;
        if let Some(id) = self.free.pop() {
            *self.slot_mut(id) = Some(node);
            return id;
        }

        let slot = match SlotIndex::from_usize(self.nodes.len()) {
            Some(slot) => slot,
            None => {
                // The home segment is exhausted; retire it and start a new one.
                let full = std::mem::take(&mut self.nodes);
                self.foreign.insert(self.home, full);
                self.home = fresh_segment();
                SlotIndex::new(0)
            }
        };
        self.nodes.push(Some(node));
        NodeId::new(self.home, slot)
    }

    /// Removes the node stored under `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not address a live node of this arena.
    pub fn remove(&mut self, id: NodeId) -> N {
        let node = self.slot_mut(id).take();
        match node {
            Some(node) => {
                self.len -= 1;
                self.free.push(id);
                node
            }
            None => panic!("called `NodeArena::remove` with vacant node id {}", id),
        }
    }

    /// Returns `true` if `id` addresses a live node of this arena.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Returns a reference to the node stored under `id`.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        let segment = if id.segment == self.home {
            &self.nodes
        } else {
            self.foreign.get(&id.segment)?
        };
        segment.get(id.slot.as_usize()).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the node stored under `id`.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        let segment = if id.segment == self.home {
            &mut self.nodes
        } else {
            self.foreign.get_mut(&id.segment)?
        };
        segment.get_mut(id.slot.as_usize()).and_then(Option::as_mut)
    }

    #[inline]
    fn slot_mut(&mut self, id: NodeId) -> &mut Option<N> {
        let segment = if id.segment == self.home {
            &mut self.nodes
        } else {
            match self.foreign.get_mut(&id.segment) {
                Some(segment) => segment,
                None => panic!("called `NodeArena` with node id {} of a foreign segment", id),
            }
        };
        &mut segment[id.slot.as_usize()]
    }

    /// Moves every node of `other` into `self`, leaving `other` empty.
    ///
    /// Node ids of both arenas remain valid and now address nodes of `self`.
    pub fn absorb(&mut self, other: &mut NodeArena<N>) {
        let other_home = std::mem::take(&mut other.nodes);
        let mut other_foreign = std::mem::take(&mut other.foreign);
        let mut other_free = std::mem::take(&mut other.free);
        let other_home_id = other.home;

        self.len += other.len;
        other.len = 0;
        other.home = fresh_segment();

        // Merge the smaller collections into the larger ones.
        if other_foreign.len() > self.foreign.len() {
            std::mem::swap(&mut self.foreign, &mut other_foreign);
        }
        self.foreign.extend(other_foreign);
        if !other_home.is_empty() {
            self.foreign.insert(other_home_id, other_home);
        }

        if other_free.len() > self.free.len() {
            std::mem::swap(&mut self.free, &mut other_free);
        }
        self.free.extend(other_free);
    }

    /// Removes every node, keeping the home segment's allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.foreign.clear();
        self.free.clear();
        self.len = 0;
    }

    /// Iterates over all live nodes together with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        let home = self.home;
        let home_iter = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(move |(i, n)| n.as_ref().map(|n| (NodeId::new(home, SlotIndex::new(i as u32)), n)));
        let foreign_iter = self.foreign.iter().flat_map(|(&segment, nodes)| {
            nodes
                .iter()
                .enumerate()
                .filter_map(move |(i, n)| n.as_ref().map(|n| (NodeId::new(segment, SlotIndex::new(i as u32)), n)))
        });
        home_iter.chain(foreign_iter)
    }

    /// Iterates over all live nodes.
    pub fn values(&self) -> impl Iterator<Item = &N> + '_ {
        self.nodes
            .iter()
            .chain(self.foreign.values().flatten())
            .filter_map(Option::as_ref)
    }
}

impl<N> std::ops::Index<NodeId> for NodeArena<N> {
    type Output = N;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        match self.get(id) {
            Some(node) => node,
            None => panic!("called `NodeArena::index` with vacant node id {}", id),
        }
    }
}

impl<N> std::ops::IndexMut<NodeId> for NodeArena<N> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("called `NodeArena::index_mut` with vacant node id {}", id),
        }
    }
}
