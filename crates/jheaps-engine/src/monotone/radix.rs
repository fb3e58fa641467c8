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

//! Radix heaps.
//!
//! Monotone heaps over a bounded key range. Keys are mapped onto `u64` by the
//! order-preserving encoding of the key domain and distributed over 65
//! buckets relative to the last extracted minimum `last`: bucket 0 holds keys
//! equal to `last`, bucket `i > 0` holds keys whose most significant bit
//! differing from `last` is bit `i - 1`. Extraction empties the lowest
//! non-empty bucket into lower ones once bucket 0 runs dry.
//!
//! Inserted keys must lie within `[min, max]` and must not be smaller than
//! the last extracted minimum.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, Heap};
use jheaps_core::key::Key;
use std::cmp::Ordering;

const NUM_BUCKETS: usize = 65;

#[inline]
fn bucket_index(last: u64, bits: u64) -> usize {
    (u64::BITS - (bits ^ last).leading_zeros()) as usize
}

fn check_bounds<K: Key>(min: K, max: K) -> HeapResult<()> {
    if !min.is_finite() || !max.is_finite() {
        return Err(HeapError::illegal_argument("bounds must be finite"));
    }
    if min.natural_cmp(&max) == Ordering::Greater {
        return Err(HeapError::illegal_argument(
            "minimum bound must not exceed the maximum bound",
        ));
    }
    Ok(())
}

/// Key range and the monotone lower bound shared by both radix heaps.
#[derive(Debug, Clone, Copy)]
struct Range<K> {
    min: K,
    max: K,
    last: u64,
}

impl<K: Key> Range<K> {
    fn new(min: K, max: K) -> HeapResult<Self> {
        check_bounds(min, max)?;
        Ok(Self {
            min,
            max,
            last: min.to_ordered_bits(),
        })
    }

    /// Validates `key` and returns its ordered encoding.
    fn admit(&self, key: K) -> HeapResult<u64> {
        if key.natural_cmp(&self.min) == Ordering::Less
            || key.natural_cmp(&self.max) == Ordering::Greater
        {
            return Err(HeapError::illegal_argument(format!(
                "key {} is outside the range [{}, {}]",
                key, self.min, self.max
            )));
        }
        let bits = key.to_ordered_bits();
        if bits < self.last {
            return Err(HeapError::illegal_argument(
                "key is smaller than the last extracted minimum",
            ));
        }
        Ok(bits)
    }

    #[inline]
    fn reset(&mut self) {
        self.last = self.min.to_ordered_bits();
    }
}

fn empty_buckets<T>() -> Vec<Vec<T>> {
    (0..NUM_BUCKETS).map(|_| Vec::new()).collect()
}

/// A radix heap over bare keys.
#[derive(Debug, Clone)]
pub struct RadixHeap<K> {
    buckets: Vec<Vec<K>>,
    len: usize,
    range: Range<K>,
}

impl<K: Key> RadixHeap<K> {
    /// Creates an empty heap accepting keys in `[min, max]`.
    pub fn new(min: K, max: K) -> HeapResult<Self> {
        Ok(Self {
            buckets: empty_buckets(),
            len: 0,
            range: Range::new(min, max)?,
        })
    }

    #[inline]
    pub fn min_bound(&self) -> K {
        self.range.min
    }

    #[inline]
    pub fn max_bound(&self) -> K {
        self.range.max
    }

    fn lowest_bucket(&self) -> Option<usize> {
        self.buckets.iter().position(|b| !b.is_empty())
    }

    /// Moves the keys of the lowest non-empty bucket relative to its minimum.
    fn redistribute(&mut self) {
        let Some(i) = self.lowest_bucket() else {
            return;
        };
        if i == 0 {
            return;
        }
        let keys = std::mem::take(&mut self.buckets[i]);
        let Some(last) = keys.iter().map(|k| k.to_ordered_bits()).min() else {
            return;
        };
        self.range.last = last;
        for k in keys {
            self.buckets[bucket_index(last, k.to_ordered_bits())].push(k);
        }
    }
}

impl<K: Key> Heap<K> for RadixHeap<K> {
    fn insert(&mut self, key: K) -> HeapResult<()> {
        let bits = self.range.admit(key)?;
        self.buckets[bucket_index(self.range.last, bits)].push(key);
        self.len += 1;
        Ok(())
    }

    fn find_min(&self) -> HeapResult<K> {
        let i = self.lowest_bucket().ok_or(HeapError::NoSuchElement)?;
        self.buckets[i]
            .iter()
            .copied()
            .min_by_key(|k| k.to_ordered_bits())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<K> {
        if self.len == 0 {
            return Err(HeapError::NoSuchElement);
        }
        self.redistribute();
        let key = self.buckets[0]
            .pop()
            .ok_or_else(|| HeapError::illegal_state("radix buckets out of sync"))?;
        self.len -= 1;
        Ok(key)
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for b in &mut self.buckets {
            b.clear();
        }
        self.len = 0;
        self.range.reset();
    }
}

#[inline]
fn encode_slot(bucket: usize, index: usize) -> u64 {
    ((bucket as u64) << 32) | index as u64
}

#[inline]
fn decode_slot(slot: u64) -> (usize, usize) {
    ((slot >> 32) as usize, (slot & u32::MAX as u64) as usize)
}

/// A radix heap with element handles.
#[derive(Debug)]
pub struct RadixAddressableHeap<K> {
    buckets: Vec<Vec<Handle<K>>>,
    len: usize,
    range: Range<K>,
    owner: OwnerToken,
}

impl<K: Key> RadixAddressableHeap<K> {
    /// Creates an empty heap accepting keys in `[min, max]`.
    pub fn new(min: K, max: K) -> HeapResult<Self> {
        Ok(Self {
            buckets: empty_buckets(),
            len: 0,
            range: Range::new(min, max)?,
            owner: OwnerToken::new(),
        })
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<(usize, usize)> {
        handle
            .location_in(&self.owner)
            .map(decode_slot)
            .ok_or_else(HeapError::invalid_handle)
    }

    fn push(&mut self, handle: Handle<K>) {
        let b = bucket_index(self.range.last, handle.key().to_ordered_bits());
        handle.link(encode_slot(b, self.buckets[b].len()));
        self.buckets[b].push(handle);
    }

    fn remove_at(&mut self, bucket: usize, index: usize) -> Handle<K> {
        let removed = self.buckets[bucket].swap_remove(index);
        if let Some(moved) = self.buckets[bucket].get(index) {
            moved.link(encode_slot(bucket, index));
        }
        removed
    }

    fn lowest_bucket(&self) -> Option<usize> {
        self.buckets.iter().position(|b| !b.is_empty())
    }

    fn redistribute(&mut self) {
        let Some(i) = self.lowest_bucket() else {
            return;
        };
        if i == 0 {
            return;
        }
        let handles = std::mem::take(&mut self.buckets[i]);
        let Some(last) = handles.iter().map(|h| h.key().to_ordered_bits()).min() else {
            return;
        };
        self.range.last = last;
        for h in handles {
            self.push(h);
        }
    }
}

impl<K: Key> AddressableHeap<K> for RadixAddressableHeap<K> {
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        self.range.admit(key)?;
        let handle = Handle::new(key, value, &self.owner);
        self.push(handle.clone());
        self.len += 1;
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        let i = self.lowest_bucket().ok_or(HeapError::NoSuchElement)?;
        self.buckets[i]
            .iter()
            .min_by_key(|h| h.key().to_ordered_bits())
            .cloned()
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        if self.len == 0 {
            return Err(HeapError::NoSuchElement);
        }
        self.redistribute();
        let handle = self.buckets[0]
            .pop()
            .ok_or_else(|| HeapError::illegal_state("radix buckets out of sync"))?;
        handle.unlink();
        self.len -= 1;
        Ok(handle)
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let (bucket, index) = self.locate(handle)?;
        if key.natural_cmp(&handle.key()) == Ordering::Greater {
            return Err(HeapError::key_not_decreased());
        }
        self.range.admit(key)?;
        let handle = self.remove_at(bucket, index);
        handle.set_key(key);
        self.push(handle);
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let (bucket, index) = self.locate(handle)?;
        self.remove_at(bucket, index).unlink();
        self.len -= 1;
        Ok(())
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for b in &mut self.buckets {
            for h in b.drain(..) {
                h.unlink();
            }
        }
        self.len = 0;
        self.range.reset();
    }
}
