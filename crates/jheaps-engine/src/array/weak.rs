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

//! Weak heaps.
//!
//! A weak heap relaxes heap order: every element is only required to be no
//! greater than the elements of its right subtree. The children of node `i`
//! are `2i + r[i]` (left) and `2i + 1 - r[i]` (right), where `r` is one
//! reverse bit per node; flipping a bit swaps the two subtrees in O(1).
//! The root has no left subtree and its right child is node 1.
//!
//! [`BulkInsertWeakHeap`] adds an insertion buffer in front of the weak heap;
//! buffered keys are flushed into the heap once the buffer is full or a
//! minimum stored in the heap is removed.

use crate::error::{HeapError, HeapResult};
use crate::traits::Heap;
use fixedbitset::FixedBitSet;
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

/// A weak heap stored in a vector plus one reverse bit per slot.
#[derive(Debug, Clone)]
pub struct WeakHeap<K, C> {
    array: Vec<K>,
    reverse: FixedBitSet,
    comparator: C,
}

impl<K, C> WeakHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            array: Vec::new(),
            reverse: FixedBitSet::new(),
            comparator,
        }
    }

    /// Builds a weak heap from `keys` with `n - 1` comparisons.
    pub fn heapify(comparator: C, keys: Vec<K>) -> Self {
        let n = keys.len();
        let mut heap = Self {
            array: keys,
            reverse: FixedBitSet::with_capacity(n),
            comparator,
        };
        for j in (1..n).rev() {
            let i = heap.d_ancestor(j);
            heap.join(i, j);
        }
        heap
    }

    #[inline]
    fn bit(&self, i: usize) -> usize {
        usize::from(self.reverse.contains(i))
    }

    /// The distinguished ancestor of `j`: the parent of the first ancestor
    /// (including `j`) that is a right child.
    #[inline]
    fn d_ancestor(&self, mut j: usize) -> usize {
        while (j & 1) == self.bit(j >> 1) {
            j >>= 1;
        }
        j >> 1
    }

    /// Restores order between `i` and its weak descendant `j`. Returns
    /// `true` if nothing had to be changed.
    #[inline]
    fn join(&mut self, i: usize, j: usize) -> bool {
        if self.comparator.less(&self.array[j], &self.array[i]) {
            self.array.swap(i, j);
            self.reverse.toggle(j);
            false
        } else {
            true
        }
    }

    fn sift_up(&mut self, mut j: usize) {
        while j != 0 {
            let i = self.d_ancestor(j);
            if self.join(i, j) {
                break;
            }
            j = i;
        }
    }

    fn sift_down(&mut self, j: usize) {
        let n = self.array.len();
        let mut k = 2 * j + 1 - self.bit(j);
        if k >= n {
            return;
        }
        loop {
            let next = 2 * k + self.bit(k);
            if next >= n {
                break;
            }
            k = next;
        }
        while k != j {
            self.join(j, k);
            k >>= 1;
        }
    }

    fn push(&mut self, key: K) {
        let n = self.array.len();
        self.array.push(key);
        self.reverse.grow(n + 1);
        self.reverse.set(n, false);
        if n & 1 == 0 {
            self.reverse.set(n >> 1, false);
        }
        self.sift_up(n);
    }
}

impl<K, C> Heap<K> for WeakHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K) -> HeapResult<()> {
        self.push(key);
        Ok(())
    }

    fn find_min(&self) -> HeapResult<K> {
        self.array.first().copied().ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<K> {
        if self.array.is_empty() {
            return Err(HeapError::NoSuchElement);
        }
        let min = self.array.swap_remove(0);
        if self.array.len() > 1 {
            self.sift_down(0);
        }
        Ok(min)
    }

    #[inline]
    fn len(&self) -> usize {
        self.array.len()
    }

    fn clear(&mut self) {
        self.array.clear();
        self.reverse.clear();
    }
}

const INSERTION_BUFFER_CAPACITY: usize = 32;

/// A weak heap with an insertion buffer.
#[derive(Debug, Clone)]
pub struct BulkInsertWeakHeap<K, C> {
    heap: WeakHeap<K, C>,
    buffer: Vec<K>,
    buffer_min: usize,
}

impl<K, C> BulkInsertWeakHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            heap: WeakHeap::new(comparator),
            buffer: Vec::with_capacity(INSERTION_BUFFER_CAPACITY),
            buffer_min: 0,
        }
    }

    pub fn heapify(comparator: C, keys: Vec<K>) -> Self {
        Self {
            heap: WeakHeap::heapify(comparator, keys),
            buffer: Vec::with_capacity(INSERTION_BUFFER_CAPACITY),
            buffer_min: 0,
        }
    }

    fn flush(&mut self) {
        for key in self.buffer.drain(..) {
            self.heap.push(key);
        }
        self.buffer_min = 0;
    }

    fn recompute_buffer_min(&mut self) {
        let comparator = &self.heap.comparator;
        self.buffer_min = (1..self.buffer.len()).fold(0, |best, i| {
            if comparator.less(&self.buffer[i], &self.buffer[best]) {
                i
            } else {
                best
            }
        });
    }

    /// Returns `true` if the overall minimum currently sits in the buffer.
    fn min_in_buffer(&self) -> bool {
        match (self.buffer.get(self.buffer_min), self.heap.array.first()) {
            (Some(b), Some(h)) => self.heap.comparator.less(b, h),
            (Some(_), None) => true,
            _ => false,
        }
    }
}

impl<K, C> Heap<K> for BulkInsertWeakHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K) -> HeapResult<()> {
        if self.buffer.len() == INSERTION_BUFFER_CAPACITY {
            self.flush();
        }
        self.buffer.push(key);
        let last = self.buffer.len() - 1;
        if self
            .heap
            .comparator
            .less(&self.buffer[last], &self.buffer[self.buffer_min])
        {
            self.buffer_min = last;
        }
        Ok(())
    }

    fn find_min(&self) -> HeapResult<K> {
        if self.min_in_buffer() {
            Ok(self.buffer[self.buffer_min])
        } else {
            self.heap.find_min()
        }
    }

    fn delete_min(&mut self) -> HeapResult<K> {
        if self.min_in_buffer() {
            let min = self.buffer.swap_remove(self.buffer_min);
            self.recompute_buffer_min();
            return Ok(min);
        }
        let min = self.heap.delete_min()?;
        // Keep the buffer short relative to the heap between extractions.
        if self.buffer.len() > 1 && self.buffer.len() * self.buffer.len() > self.heap.len() {
            self.flush();
        }
        Ok(min)
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len() + self.buffer.len()
    }

    fn clear(&mut self) {
        self.heap.clear();
        self.buffer.clear();
        self.buffer_min = 0;
    }
}
