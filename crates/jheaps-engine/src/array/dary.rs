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

//! Implicit d-ary heaps over bare keys.
//!
//! The binary array heap is the `d = 2` instance of [`DaryArrayHeap`]. Both
//! support bulk construction in linear time with Floyd's bottom-up heapify.

use crate::error::{HeapError, HeapResult};
use crate::traits::Heap;
use jheaps_core::compare::Comparator;
use jheaps_core::key::Key;

/// Checks the arity of a d-ary heap.
#[inline]
pub(crate) fn validate_arity(d: usize) -> HeapResult<()> {
    if d < 2 {
        return Err(HeapError::illegal_argument(
            "d-ary heaps must have at least 2 children per node",
        ));
    }
    Ok(())
}

/// An implicit d-ary min-heap stored in a vector.
#[derive(Debug, Clone)]
pub struct DaryArrayHeap<K, C> {
    d: usize,
    array: Vec<K>,
    comparator: C,
}

/// The binary array heap.
pub type BinaryArrayHeap<K, C> = DaryArrayHeap<K, C>;

impl<K, C> DaryArrayHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    /// Creates an empty d-ary heap.
    pub fn new(d: usize, comparator: C) -> HeapResult<Self> {
        validate_arity(d)?;
        Ok(Self {
            d,
            array: Vec::new(),
            comparator,
        })
    }

    /// Creates an empty binary heap.
    #[inline]
    pub fn binary(comparator: C) -> Self {
        Self {
            d: 2,
            array: Vec::new(),
            comparator,
        }
    }

    /// Builds a d-ary heap from `keys` in linear time.
    pub fn heapify(d: usize, comparator: C, keys: Vec<K>) -> HeapResult<Self> {
        validate_arity(d)?;
        let mut heap = Self {
            d,
            array: keys,
            comparator,
        };
        let n = heap.array.len();
        if n > 1 {
            for i in (0..=(n - 2) / d).rev() {
                heap.sift_down(i);
            }
        }
        Ok(heap)
    }

    /// The number of children per node.
    #[inline]
    pub fn arity(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / self.d;
            if !self.comparator.less(&self.array[i], &self.array[parent]) {
                break;
            }
            self.array.swap(i, parent);
            i = parent;
        }
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
                if self.comparator.less(&self.array[c], &self.array[best]) {
                    best = c;
                }
            }
            if !self.comparator.less(&self.array[best], &self.array[i]) {
                break;
            }
            self.array.swap(i, best);
            i = best;
        }
    }
}

impl<K, C> Heap<K> for DaryArrayHeap<K, C>
where
    K: Key,
    C: Comparator<K>,
{
    fn insert(&mut self, key: K) -> HeapResult<()> {
        self.array.push(key);
        self.sift_up(self.array.len() - 1);
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
        if !self.array.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
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

#[cfg(test)]
mod tests {
    use super::*;
    use jheaps_core::compare::{NaturalOrder, Reversed};
    use proptest::prelude::*;
    use rstest::rstest;

    fn drain<H: Heap<i64>>(heap: &mut H) -> Vec<i64> {
        let mut out = Vec::new();
        while let Ok(k) = heap.delete_min() {
            out.push(k);
        }
        out
    }

    #[test]
    fn test_binary_heap_orders_keys() {
        let mut heap = DaryArrayHeap::binary(NaturalOrder);
        for k in [5i64, 1, 3, 9, -2, 3] {
            heap.insert(k).unwrap();
        }
        assert_eq!(heap.find_min(), Ok(-2));
        assert_eq!(heap.len(), 6);
        assert_eq!(drain(&mut heap), vec![-2, 1, 3, 3, 5, 9]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_empty_heap_faults() {
        let mut heap: DaryArrayHeap<f64, _> = DaryArrayHeap::binary(NaturalOrder);
        assert_eq!(heap.find_min(), Err(HeapError::NoSuchElement));
        assert_eq!(heap.delete_min(), Err(HeapError::NoSuchElement));
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_rejects_small_arity(#[case] d: usize) {
        assert!(matches!(
            DaryArrayHeap::<i64, _>::new(d, NaturalOrder),
            Err(HeapError::IllegalArgument(_))
        ));
        assert!(DaryArrayHeap::<i64, _>::heapify(d, NaturalOrder, vec![1]).is_err());
    }

    #[test]
    fn test_custom_comparator() {
        let mut heap = DaryArrayHeap::new(3, Reversed(NaturalOrder)).unwrap();
        for k in [1i64, 7, 4] {
            heap.insert(k).unwrap();
        }
        assert_eq!(heap.delete_min(), Ok(7));
        assert_eq!(heap.arity(), 3);
    }

    #[test]
    fn test_clear() {
        let mut heap = DaryArrayHeap::binary(NaturalOrder);
        heap.insert(1i64).unwrap();
        heap.clear();
        assert!(heap.is_empty());
    }

    proptest! {
        #[test]
        fn prop_heapify_matches_sequential_insert(keys in prop::collection::vec(-1000i64..1000, 0..200), d in 2usize..6) {
            let mut built = DaryArrayHeap::heapify(d, NaturalOrder, keys.clone()).unwrap();
            let mut inserted = DaryArrayHeap::new(d, NaturalOrder).unwrap();
            for &k in &keys {
                inserted.insert(k).unwrap();
            }
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            prop_assert_eq!(drain(&mut built), sorted.clone());
            prop_assert_eq!(drain(&mut inserted), sorted);
        }
    }
}
