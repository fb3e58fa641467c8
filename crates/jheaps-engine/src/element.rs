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

//! Element records and handles of addressable heaps.
//!
//! Inserting into an addressable heap yields a [`Handle`], a shared reference
//! to the element record. The record stores the key, an `i64` user value, the
//! element's current location inside the heap, and the owner token of the
//! heap it was inserted into. All fields are atomics so a handle can be sent
//! to and read from any thread; mutating the heap still requires `&mut` access
//! to the heap itself.
//!
//! Ownership follows melds: owner tokens form a union-find forest and melding
//! `b` into `a` links `b`'s token below `a`'s, so every element that was in
//! `b` now reports `a` as its owner.

use jheaps_core::key::Key;
use parking_lot::Mutex;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

const DETACHED: u64 = u64::MAX;

#[derive(Debug, Default)]
struct OwnerNode {
    parent: Mutex<Option<Arc<OwnerNode>>>,
}

/// Identity of a heap for the purpose of handle validation.
#[derive(Debug, Clone, Default)]
pub struct OwnerToken(Arc<OwnerNode>);

impl OwnerToken {
    /// Creates a token that belongs to no union yet.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    fn root(&self) -> Arc<OwnerNode> {
        let mut root = self.0.clone();
        loop {
            let parent = root.parent.lock().clone();
            match parent {
                Some(p) => root = p,
                None => break,
            }
        }

        // Path compression.
        let mut cur = self.0.clone();
        while !Arc::ptr_eq(&cur, &root) {
            let next = {
                let mut parent = cur.parent.lock();
                let next = parent.clone();
                *parent = Some(root.clone());
                next
            };
            match next {
                Some(n) => cur = n,
                None => break,
            }
        }
        root
    }

    /// Returns `true` if both tokens resolve to the same heap.
    #[inline]
    pub fn same_owner(&self, other: &OwnerToken) -> bool {
        Arc::ptr_eq(&self.root(), &other.root())
    }

    /// Makes every holder of `self` resolve to `target` from now on.
    pub fn forward_to(&self, target: &OwnerToken) {
        let root = self.root();
        let target_root = target.root();
        if !Arc::ptr_eq(&root, &target_root) {
            *root.parent.lock() = Some(target_root);
        }
    }

    /// Takes over the elements of the heap owning `other` after a meld and
    /// hands that heap a fresh token.
    pub(crate) fn adopt(&self, other: &mut OwnerToken) {
        other.forward_to(self);
        *other = OwnerToken::new();
    }
}

/// The shared element record behind a [`Handle`].
#[derive(Debug)]
pub struct Element<K> {
    key: AtomicU64,
    value: AtomicI64,
    slot: AtomicU64,
    owner: OwnerToken,
    _key: PhantomData<fn() -> K>,
}

/// Reference to an element of an addressable heap.
///
/// Cloning a handle yields another reference to the same element. Key and
/// value remain readable after the element was removed from its heap.
#[derive(Debug)]
pub struct Handle<K>(Arc<Element<K>>);

impl<K> Clone for Handle<K> {
    #[inline]
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<K: Key> Handle<K> {
    pub(crate) fn new(key: K, value: i64, owner: &OwnerToken) -> Self {
        Self(Arc::new(Element {
            key: AtomicU64::new(key.to_bits()),
            value: AtomicI64::new(value),
            slot: AtomicU64::new(DETACHED),
            owner: owner.clone(),
            _key: PhantomData,
        }))
    }

    /// The element's current key.
    #[inline]
    pub fn key(&self) -> K {
        K::from_bits(self.0.key.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn set_key(&self, key: K) {
        self.0.key.store(key.to_bits(), Ordering::Relaxed);
    }

    /// The element's user value.
    #[inline]
    pub fn value(&self) -> i64 {
        self.0.value.load(Ordering::Relaxed)
    }

    /// Replaces the element's user value.
    #[inline]
    pub fn set_value(&self, value: i64) {
        self.0.value.store(value, Ordering::Relaxed);
    }

    /// Returns `true` while the element is stored in a heap.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.0.slot.load(Ordering::Relaxed) != DETACHED
    }

    /// Returns `true` if both handles reference the same element.
    #[inline]
    pub fn ptr_eq(&self, other: &Handle<K>) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    #[inline]
    pub(crate) fn slot(&self) -> u64 {
        self.0.slot.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn link(&self, slot: u64) {
        debug_assert!(slot != DETACHED, "called `Handle::link` with the detached marker");
        self.0.slot.store(slot, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn unlink(&self) {
        self.0.slot.store(DETACHED, Ordering::Relaxed);
    }

    /// Returns the element's location if it is linked into the heap owning
    /// `owner`, and `None` otherwise.
    #[inline]
    pub(crate) fn location_in(&self, owner: &OwnerToken) -> Option<u64> {
        let slot = self.slot();
        (slot != DETACHED && self.0.owner.same_owner(owner)).then_some(slot)
    }
}
