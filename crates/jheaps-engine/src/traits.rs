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

//! Capability traits implemented by the heap variants.
//!
//! The traits are object safe so the heaps can be stored behind trait objects
//! and driven without knowing the concrete variant. Melding needs both heaps to
//! have the same concrete type; [`DynMeld`] recovers it at runtime through
//! `Any` and reports [`HeapError::ClassCast`] on a mismatch.

use crate::element::Handle;
use crate::error::{HeapError, HeapResult};
use std::any::Any;

/// A priority queue over bare keys.
pub trait Heap<K>: Send {
    /// Inserts a key.
    fn insert(&mut self, key: K) -> HeapResult<()>;

    /// Returns a minimum key.
    fn find_min(&self) -> HeapResult<K>;

    /// Removes and returns a minimum key.
    fn delete_min(&mut self) -> HeapResult<K>;

    /// Number of keys stored.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every key.
    fn clear(&mut self);
}

/// A heap that also gives access to a maximum key.
pub trait DoubleEndedHeap<K>: Heap<K> {
    /// Returns a maximum key.
    fn find_max(&self) -> HeapResult<K>;

    /// Removes and returns a maximum key.
    fn delete_max(&mut self) -> HeapResult<K>;
}

/// A priority queue whose elements can be addressed through handles.
pub trait AddressableHeap<K>: Send {
    /// Inserts a key with an attached value and returns its handle.
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>>;

    /// Returns the handle of an element with minimum key.
    fn find_min(&self) -> HeapResult<Handle<K>>;

    /// Removes an element with minimum key and returns its handle.
    fn delete_min(&mut self) -> HeapResult<Handle<K>>;

    /// Lowers the key of the element behind `handle`.
    ///
    /// Fails with `IllegalArgument` if `key` is greater than the current key
    /// or if the handle does not address an element of this heap.
    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()>;

    /// Removes the element behind `handle`.
    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()>;

    /// Number of elements stored.
    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every element. Handles of removed elements stay readable.
    fn clear(&mut self);
}

/// An addressable heap that also gives access to a maximum element.
pub trait DoubleEndedAddressableHeap<K>: AddressableHeap<K> {
    fn find_max(&self) -> HeapResult<Handle<K>>;

    fn delete_max(&mut self) -> HeapResult<Handle<K>>;

    /// Raises the key of the element behind `handle`.
    fn increase_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()>;
}

/// A heap that can absorb another heap of the same type.
pub trait MergeableHeap {
    /// Moves every element of `other` into `self`.
    ///
    /// Afterwards `other` is empty and handles of its former elements
    /// address elements of `self`.
    fn meld(&mut self, other: &mut Self) -> HeapResult<()>;
}

/// Object-safe form of [`MergeableHeap`].
pub trait DynMeld: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Melds `other` into `self` if both have the same concrete type.
    fn meld_dyn(&mut self, other: &mut dyn Any) -> HeapResult<()>;
}

impl<T> DynMeld for T
where
    T: MergeableHeap + Any,
{
    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn meld_dyn(&mut self, other: &mut dyn Any) -> HeapResult<()> {
        match other.downcast_mut::<T>() {
            Some(other) => self.meld(other),
            None => Err(HeapError::ClassCast),
        }
    }
}

/// An addressable heap that supports meld behind a trait object.
pub trait MergeableAddressableHeap<K>: AddressableHeap<K> + DynMeld {}

impl<K, T> MergeableAddressableHeap<K> for T where T: AddressableHeap<K> + DynMeld {}

/// A double-ended addressable heap that supports meld behind a trait object.
pub trait MergeableDoubleEndedAddressableHeap<K>:
    DoubleEndedAddressableHeap<K> + DynMeld
{
}

impl<K, T> MergeableDoubleEndedAddressableHeap<K> for T where
    T: DoubleEndedAddressableHeap<K> + DynMeld
{
}
