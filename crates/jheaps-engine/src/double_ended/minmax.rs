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

//! Min-max heaps.
//!
//! An implicit binary tree whose even levels (starting with the root) are min
//! levels and whose odd levels are max levels: every node on a min level is no
//! greater than all of its descendants, every node on a max level is no
//! smaller. The minimum is the root; the maximum is one of the root's children.

use crate::error::{HeapError, HeapResult};
use crate::traits::{DoubleEndedHeap, Heap};
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

#[inline]
fn is_min_level(i: usize) -> bool {
    (usize::BITS - (i + 1).leading_zeros() - 1) % 2 == 0
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

/// A min-max heap stored in a vector.
#[derive(Debug, Clone)]
pub struct MinMaxBinaryArrayHeap<K, C> {
    array: Vec<K>,
    comparator: C,
}

impl<K, C> MinMaxBinaryArrayHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(comparator: C) -> Self {
        Self {
            array: Vec::new(),
            comparator,
        }
    }

    /// Builds a min-max heap from `keys` in linear time.
    pub fn heapify(comparator: C, keys: Vec<K>) -> Self {
        let mut heap = Self {
            array: keys,
            comparator,
        };
        let n = heap.array.len();
        if n > 1 {
            for i in (0..=parent(n - 1)).rev() {
                heap.push_down(i);
            }
        }
        heap
    }

    /// `true` if `a` must sit above `b` on a level of the given kind.
    #[inline]
    fn before(&self, a: usize, b: usize, min_level: bool) -> bool {
        if min_level {
            self.comparator.less(&self.array[a], &self.array[b])
        } else {
            self.comparator.greater(&self.array[a], &self.array[b])
        }
    }

    fn push_up(&mut self, i: usize) {
        if i == 0 {
            return;
        }
        let p = parent(i);
        let min_level = is_min_level(i);
        if self.before(i, p, !min_level) {
            self.array.swap(i, p);
            self.push_up_grandparents(p, !min_level);
        } else {
            self.push_up_grandparents(i, min_level);
        }
    }

    fn push_up_grandparents(&mut self, mut i: usize, min_level: bool) {
        while i > 2 {
            let g = parent(parent(i));
            if !self.before(i, g, min_level) {
                break;
            }
            self.array.swap(i, g);
            i = g;
        }
    }

    fn push_down(&mut self, i: usize) {
        let min_level = is_min_level(i);
        self.push_down_on(i, min_level);
    }

    fn push_down_on(&mut self, mut m: usize, min_level: bool) {
        let n = self.array.len();
        loop {
            let first_child = 2 * m + 1;
            if first_child >= n {
                break;
            }

            // Best among children and grandchildren.
            let mut best = first_child;
            let candidates = [
                first_child + 1,
                4 * m + 3,
                4 * m + 4,
                4 * m + 5,
                4 * m + 6,
            ];
            for c in candidates {
                if c < n && self.before(c, best, min_level) {
                    best = c;
                }
            }

            if best > first_child + 1 {
                // Grandchild.
                if !self.before(best, m, min_level) {
                    break;
                }
                self.array.swap(best, m);
                let p = parent(best);
                if self.before(p, best, min_level) {
                    self.array.swap(best, p);
                }
                m = best;
            } else {
                if self.before(best, m, min_level) {
                    self.array.swap(best, m);
                }
                break;
            }
        }
    }

    fn max_index(&self) -> Option<usize> {
        match self.array.len() {
            0 => None,
            1 => Some(0),
            2 => Some(1),
            _ => Some(if self.comparator.less(&self.array[1], &self.array[2]) {
                2
            } else {
                1
            }),
        }
    }

    fn remove_at(&mut self, i: usize) -> K {
        let removed = self.array.swap_remove(i);
        if i < self.array.len() {
            self.push_down(i);
        }
        removed
    }
}

impl<K, C> Heap<K> for MinMaxBinaryArrayHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K) -> HeapResult<()> {
        self.array.push(key);
        self.push_up(self.array.len() - 1);
        Ok(())
    }

    fn find_min(&self) -> HeapResult<K> {
        self.array.first().copied().ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<K> {
        if self.array.is_empty() {
            return Err(HeapError::NoSuchElement);
        }
        Ok(self.remove_at(0))
    }

    #[inline]
    fn len(&self) -> usize {
        self.array.len()
    }

    #[inline]
    fn clear(&mut self) {
        self.array.clear();
    }
}

impl<K, C> DoubleEndedHeap<K> for MinMaxBinaryArrayHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn find_max(&self) -> HeapResult<K> {
        self.max_index()
            .map(|i| self.array[i])
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_max(&mut self) -> HeapResult<K> {
        let i = self.max_index().ok_or(HeapError::NoSuchElement)?;
        Ok(self.remove_at(i))
    }
}
