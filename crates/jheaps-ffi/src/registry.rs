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

//! # Handle Registry
//!
//! Every object that crosses the C ABI is owned by the registry and known to
//! the host only by a `u64` handle. Handles are issued from a monotonically
//! increasing counter starting at 1, so a handle is never reused and `0` can
//! serve as the null handle.
//!
//! A heap handle owns a [`HeapCell`]. Element handles keep a reference to
//! the cell of the heap they were issued from. Melding one heap into another
//! leaves the absorbed cell in the `Consumed` state pointing at the receiving
//! cell, which is how element handles of the absorbed heap find their new
//! owner. Destroying a heap drops its engine instance but keeps the cell alive
//! for as long as element handles refer to it.
//!
//! The table lock is only held to insert, clone out, or remove an entry. A
//! cell lock may be held while issuing a handle, never the other way round.

use crate::error::Fault;
use crate::instance::{AnyElement, AnyHeap, DomainKey, KeyedHeap};
use crate::variant::{HeapVariant, KeyDomain};
use jheaps_engine::element::Handle;
use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Lifecycle state of a heap behind a handle.
pub enum HeapState {
    Live(AnyHeap),
    /// Melded into the heap of the given cell.
    Consumed(Arc<HeapCell>),
    Destroyed,
}

/// A heap together with the facts fixed at construction.
pub struct HeapSlot {
    pub variant: HeapVariant,
    pub domain: KeyDomain,
    pub state: HeapState,
}

impl HeapSlot {
    /// The live heap, or the fault for a consumed or destroyed one.
    pub fn live_mut(&mut self) -> Result<&mut AnyHeap, Fault> {
        match &mut self.state {
            HeapState::Live(heap) => Ok(heap),
            HeapState::Consumed(_) => Err(Fault::Consumed),
            HeapState::Destroyed => Err(Fault::HeapDestroyed),
        }
    }

    /// The live heap viewed in key domain `K`.
    pub(crate) fn keyed_mut<K: DomainKey>(&mut self) -> Result<&mut KeyedHeap<K>, Fault> {
        let actual = self.domain;
        K::keyed_mut(self.live_mut()?).ok_or(Fault::DomainMismatch {
            expected: K::KEY_DOMAIN,
            actual,
        })
    }

    /// The cell this heap was melded into, if any.
    #[inline]
    fn successor(&self) -> Option<Arc<HeapCell>> {
        match &self.state {
            HeapState::Consumed(next) => Some(Arc::clone(next)),
            _ => None,
        }
    }
}

/// Shared, lockable home of one heap.
pub struct HeapCell(Mutex<HeapSlot>);

impl HeapCell {
    pub fn new(variant: HeapVariant, heap: AnyHeap) -> Arc<Self> {
        Arc::new(Self(Mutex::new(HeapSlot {
            variant,
            domain: heap.domain(),
            state: HeapState::Live(heap),
        })))
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, HeapSlot> {
        self.0.lock()
    }
}

/// Locks two distinct cells in address order.
pub fn lock_pair<'a>(
    a: &'a HeapCell,
    b: &'a HeapCell,
) -> (MutexGuard<'a, HeapSlot>, MutexGuard<'a, HeapSlot>) {
    if (a as *const HeapCell) < (b as *const HeapCell) {
        let ga = a.lock();
        let gb = b.lock();
        (ga, gb)
    } else {
        let gb = b.lock();
        let ga = a.lock();
        (ga, gb)
    }
}

/// An element handle's registry entry.
#[derive(Clone)]
pub struct ElementEntry {
    pub heap: Arc<HeapCell>,
    pub element: AnyElement,
}

impl ElementEntry {
    /// Runs `f` on the heap currently owning the element, following melds.
    ///
    /// Fails with `ClassCast` if the element is not of domain `K`, and with
    /// `IllegalState` if the owning heap has been destroyed.
    pub(crate) fn with_owner<K, R, F>(&self, f: F) -> Result<R, Fault>
    where
        K: DomainKey,
        F: FnOnce(&mut KeyedHeap<K>, &Handle<K>) -> Result<R, Fault>,
    {
        let element = K::element(&self.element).ok_or(Fault::DomainMismatch {
            expected: K::KEY_DOMAIN,
            actual: self.element.domain(),
        })?;
        let mut cell = Arc::clone(&self.heap);
        loop {
            let mut slot = cell.lock();
            if let Some(next) = slot.successor() {
                drop(slot);
                cell = next;
                continue;
            }
            let heap = slot.keyed_mut::<K>()?;
            return f(heap, element);
        }
    }
}

/// What a handle refers to.
#[derive(Clone)]
pub enum Entry {
    Heap(Arc<HeapCell>),
    Element(ElementEntry),
}

pub struct Registry {
    entries: Mutex<FxHashMap<u64, Entry>>,
    next: AtomicU64,
}

impl Registry {
    fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            next: AtomicU64::new(1),
        }
    }

    /// Registers `entry` under a fresh handle.
    pub fn issue(&self, entry: Entry) -> u64 {
        let handle = self.next.fetch_add(1, Ordering::Relaxed);
        self.entries.lock().insert(handle, entry);
        handle
    }

    /// Registers a new heap and returns its handle.
    pub fn issue_heap(&self, variant: HeapVariant, heap: AnyHeap) -> u64 {
        let domain = heap.domain();
        let handle = self.issue(Entry::Heap(HeapCell::new(variant, heap)));
        tracing::debug!(handle, %variant, %domain, "issued heap handle");
        handle
    }

    /// Registers an element of the heap in `cell`.
    pub(crate) fn issue_element<K: DomainKey>(&self, cell: &Arc<HeapCell>, element: Handle<K>) -> u64 {
        self.issue(Entry::Element(ElementEntry {
            heap: Arc::clone(cell),
            element: K::erase_element(element),
        }))
    }

    fn get(&self, handle: u64) -> Result<Entry, Fault> {
        if handle == 0 {
            return Err(Fault::NullHandle);
        }
        self.entries
            .lock()
            .get(&handle)
            .cloned()
            .ok_or(Fault::UnknownHandle(handle))
    }

    /// Resolves a heap handle.
    pub fn heap(&self, handle: u64) -> Result<Arc<HeapCell>, Fault> {
        match self.get(handle)? {
            Entry::Heap(cell) => Ok(cell),
            Entry::Element(_) => Err(Fault::WrongHandleKind {
                handle,
                expected: "a heap",
            }),
        }
    }

    /// Resolves an element handle.
    pub fn element(&self, handle: u64) -> Result<ElementEntry, Fault> {
        match self.get(handle)? {
            Entry::Element(entry) => Ok(entry),
            Entry::Heap(_) => Err(Fault::WrongHandleKind {
                handle,
                expected: "an element",
            }),
        }
    }

    /// Removes `handle` from the table and returns what it referred to.
    pub fn remove(&self, handle: u64) -> Result<Entry, Fault> {
        if handle == 0 {
            return Err(Fault::NullHandle);
        }
        self.entries
            .lock()
            .remove(&handle)
            .ok_or(Fault::UnknownHandle(handle))
    }

    /// Number of handles currently registered.
    pub fn live_count(&self) -> usize {
        self.entries.lock().len()
    }
}

/// The process-wide registry.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::LongOrder;
    use crate::instance;

    fn pairing_heap() -> AnyHeap {
        match instance::plain::<i64>(HeapVariant::Pairing, LongOrder::Natural) {
            Ok(h) => AnyHeap::Long(h),
            Err(e) => panic!("{}", e),
        }
    }

    #[test]
    fn test_issue_and_resolve() {
        let r = Registry::new();
        let h = r.issue_heap(HeapVariant::Pairing, pairing_heap());
        assert_eq!(h, 1);
        assert!(r.heap(h).is_ok());
        assert!(matches!(r.element(h), Err(Fault::WrongHandleKind { .. })));
        assert!(matches!(r.heap(0), Err(Fault::NullHandle)));
        assert!(matches!(r.heap(42), Err(Fault::UnknownHandle(42))));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let r = Registry::new();
        let a = r.issue_heap(HeapVariant::Pairing, pairing_heap());
        assert!(r.remove(a).is_ok());
        let b = r.issue_heap(HeapVariant::Pairing, pairing_heap());
        assert_ne!(a, b);
        assert!(matches!(r.heap(a), Err(Fault::UnknownHandle(_))));
        assert!(matches!(r.remove(a), Err(Fault::UnknownHandle(_))));
        assert_eq!(r.live_count(), 1);
    }

    #[test]
    fn test_element_follows_meld() {
        let r = Registry::new();
        let h1 = r.issue_heap(HeapVariant::Pairing, pairing_heap());
        let h2 = r.issue_heap(HeapVariant::Pairing, pairing_heap());
        let (c1, c2) = match (r.heap(h1), r.heap(h2)) {
            (Ok(a), Ok(b)) => (a, b),
            _ => panic!("lookup failed"),
        };

        let e = {
            let mut slot = c2.lock();
            let handle = match slot.keyed_mut::<i64>().and_then(|h| h.insert_element(7, 1)) {
                Ok(handle) => handle,
                Err(e) => panic!("{}", e),
            };
            r.issue_element(&c2, handle)
        };

        {
            let (mut g1, mut g2) = lock_pair(&c1, &c2);
            let (a, b) = match (g1.live_mut(), g2.live_mut()) {
                (Ok(a), Ok(b)) => (a, b),
                _ => panic!("heaps not live"),
            };
            assert!(a.meld(b).is_ok());
            g2.state = HeapState::Consumed(Arc::clone(&c1));
        }

        let entry = match r.element(e) {
            Ok(entry) => entry,
            Err(e) => panic!("{}", e),
        };
        let len = entry.with_owner::<i64, _, _>(|heap, handle| {
            heap.decrease_key(handle, 3)?;
            Ok(heap.len())
        });
        assert_eq!(len.ok(), Some(1));
        assert!(matches!(c2.lock().live_mut(), Err(Fault::Consumed)));

        c1.lock().state = HeapState::Destroyed;
        let result = entry.with_owner::<i64, _, _>(|heap, _| Ok(heap.len()));
        assert!(matches!(result, Err(Fault::HeapDestroyed)));

        let result = entry.with_owner::<f64, _, _>(|heap, _| Ok(heap.len()));
        assert!(matches!(result, Err(Fault::DomainMismatch { .. })));
    }
}
