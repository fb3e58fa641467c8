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

//! Implicit d-ary heaps with element handles.
//!
//! Each handle records the array position of its element, so decrease-key and
//! arbitrary deletion run in O(d log_d n).

use crate::array::dary::validate_arity;
use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::AddressableHeap;
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

/// An addressable implicit d-ary min-heap.
#[derive(Debug)]
pub struct DaryArrayAddressableHeap<K, C> {
    d: usize,
    array: Vec<Handle<K>>,
    comparator: C,
    owner: OwnerToken,
}

/// The addressable binary array heap.
pub type BinaryArrayAddressableHeap<K, C> = DaryArrayAddressableHeap<K, C>;

impl<K, C> DaryArrayAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn new(d: usize, comparator: C) -> HeapResult<Self> {
        validate_arity(d)?;
        Ok(Self {
            d,
            array: Vec::new(),
            comparator,
            owner: OwnerToken::new(),
        })
    }

    #[inline]
    pub fn binary(comparator: C) -> Self {
        Self {
            d: 2,
            array: Vec::new(),
            comparator,
            owner: OwnerToken::new(),
        }
    }

    /// Builds a heap from parallel key and value slices in linear time.
    ///
    /// An empty `values` slice gives every element the value `0`. A non-empty
    /// one must have the same length as `keys`.
    pub fn heapify(d: usize, comparator: C, keys: &[K], values: &[i64]) -> HeapResult<Self> {
        validate_arity(d)?;
        if !values.is_empty() && values.len() != keys.len() {
            return Err(HeapError::illegal_argument(format!(
                "got {} keys but {} values",
                keys.len(),
                values.len()
            )));
        }
        let owner = OwnerToken::new();
        let array: Vec<Handle<K>> = keys
            .iter()
            .enumerate()
            .map(|(i, &k)| Handle::new(k, values.get(i).copied().unwrap_or(0), &owner))
            .collect();
        let mut heap = Self {
            d,
            array,
            comparator,
            owner,
        };
        for (i, h) in heap.array.iter().enumerate() {
            h.link(i as u64);
        }
        let n = heap.array.len();
        if n > 1 {
            for i in (0..=(n - 2) / d).rev() {
                heap.sift_down(i);
            }
        }
        Ok(heap)
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.d
    }

    #[inline]
    fn less(&self, i: usize, j: usize) -> bool {
        self.comparator
            .less(&self.array[i].key(), &self.array[j].key())
    }

    #[inline]
    fn swap(&mut self, i: usize, j: usize) {
        self.array.swap(i, j);
        self.array[i].link(i as u64);
        self.array[j].link(j as u64);
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / self.d;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.array.len();
        loop {
            let first = self.d * i + 1;
            if first >= n {
                break;
            }
            let last = (first + self.d).min(n);
            let mut best = first;
            for c in first + 1..last {
                if self.less(c, best) {
                    best = c;
                }
            }
            if !self.less(best, i) {
                break;
            }
            self.swap(i, best);
            i = best;
        }
    }

    fn position(&self, handle: &Handle<K>) -> HeapResult<usize> {
        handle
            .location_in(&self.owner)
            .map(|slot| slot as usize)
            .filter(|&i| i < self.array.len() && self.array[i].ptr_eq(handle))
            .ok_or_else(HeapError::invalid_handle)
    }

    fn remove_at(&mut self, i: usize) -> Handle<K> {
        let removed = self.array.swap_remove(i);
        removed.unlink();
        if i < self.array.len() {
            self.array[i].link(i as u64);
            if self.sift_up(i) == i {
                self.sift_down(i);
            }
        }
        removed
    }
}

impl<K, C> AddressableHeap<K> for DaryArrayAddressableHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let i = self.array.len();
        handle.link(i as u64);
        self.array.push(handle.clone());
        self.sift_up(i);
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.array.first().cloned().ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        if self.array.is_empty() {
            return Err(HeapError::NoSuchElement);
        }
        Ok(self.remove_at(0))
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let i = self.position(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        handle.set_key(key);
        self.sift_up(i);
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let i = self.position(handle)?;
        self.remove_at(i);
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.array.len()
    }

    fn clear(&mut self) {
        for h in self.array.drain(..) {
            h.unlink();
        }
    }
}
