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

//! Reflected double-ended heaps.
//!
//! A reflected heap pairs up its elements. The smaller element of each pair
//! lives in a min-heap, the larger one in a max-heap (the same heap type run
//! with the reversed order). With an odd number of elements one element is
//! left unpaired and kept aside as the free element. The minimum is either
//! the min-heap's root or the free element; symmetrically for the maximum.
//!
//! Inner heaps store, as their element value, the identifier of the outer
//! record; that is how extractions find their way back to the pair.

use crate::element::{Handle, OwnerToken};
use crate::error::{HeapError, HeapResult};
use crate::traits::{AddressableHeap, DoubleEndedAddressableHeap, MergeableHeap};
use crate::tree::fibonacci::FibonacciHeap;
use crate::tree::pairing::PairingHeap;
use jheaps_core::arena::{NodeArena, NodeId};
use jheaps_core::compare::{Comparator, Reversed};
use jheaps_core::key::Key;

#[derive(Debug, Clone)]
enum Side<K> {
    Free,
    Lower(Handle<K>),
    Upper(Handle<K>),
}

#[derive(Debug)]
struct Record<K> {
    elem: Handle<K>,
    side: Side<K>,
    partner: Option<NodeId>,
}

/// A double-ended heap built from a min-heap and a max-heap of type `Lo` and
/// `Hi`.
#[derive(Debug)]
pub struct ReflectedHeap<K, C, Lo, Hi> {
    records: NodeArena<Record<K>>,
    lower: Lo,
    upper: Hi,
    free: Option<NodeId>,
    comparator: C,
    owner: OwnerToken,
}

/// A reflected heap over Fibonacci heaps.
pub type ReflectedFibonacciHeap<K, C> =
    ReflectedHeap<K, C, FibonacciHeap<K, C>, FibonacciHeap<K, Reversed<C>>>;

/// A reflected heap over pairing heaps.
pub type ReflectedPairingHeap<K, C> =
    ReflectedHeap<K, C, PairingHeap<K, C>, PairingHeap<K, Reversed<C>>>;

impl<K, C> ReflectedHeap<K, C, FibonacciHeap<K, C>, FibonacciHeap<K, Reversed<C>>>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn fibonacci(comparator: C) -> Self {
        Self::from_parts(
            comparator.clone(),
            FibonacciHeap::new(comparator.clone()),
            FibonacciHeap::new(Reversed(comparator)),
        )
    }
}

impl<K, C> ReflectedHeap<K, C, PairingHeap<K, C>, PairingHeap<K, Reversed<C>>>
where
    K: Key,
    C: Comparator<K>,
{
    pub fn pairing(comparator: C) -> Self {
        Self::from_parts(
            comparator.clone(),
            PairingHeap::new(comparator.clone()),
            PairingHeap::new(Reversed(comparator)),
        )
    }
}

impl<K, C, Lo, Hi> ReflectedHeap<K, C, Lo, Hi>
where
    K: Key,
    C: Comparator<K>,
    Lo: AddressableHeap<K> + MergeableHeap,
    Hi: AddressableHeap<K> + MergeableHeap,
{
    /// Assembles a reflected heap from two empty inner heaps. `upper` must
    /// order keys by the reverse of `comparator`.
    pub fn from_parts(comparator: C, lower: Lo, upper: Hi) -> Self {
        debug_assert!(
            lower.is_empty() && upper.is_empty(),
            "called `ReflectedHeap::from_parts` with non-empty inner heaps"
        );
        Self {
            records: NodeArena::new(),
            lower,
            upper,
            free: None,
            comparator,
            owner: OwnerToken::new(),
        }
    }

    #[inline]
    fn less(&self, a: NodeId, b: NodeId) -> bool {
        self.comparator
            .less(&self.records[a].elem.key(), &self.records[b].elem.key())
    }

    #[inline]
    fn record_of(inner: &Handle<K>) -> NodeId {
        NodeId::from_raw(inner.value() as u64)
    }

    fn locate(&self, handle: &Handle<K>) -> HeapResult<NodeId> {
        handle
            .location_in(&self.owner)
            .map(NodeId::from_raw)
            .ok_or_else(HeapError::invalid_handle)
    }

    /// Puts two unpaired records into the inner heaps as a pair.
    fn pair(&mut self, a: NodeId, b: NodeId) -> HeapResult<()> {
        let (lo, hi) = if self.less(b, a) { (b, a) } else { (a, b) };
        let lo_inner = self
            .lower
            .insert(self.records[lo].elem.key(), lo.to_raw() as i64)?;
        let hi_inner = self
            .upper
            .insert(self.records[hi].elem.key(), hi.to_raw() as i64)?;
        let r = &mut self.records[lo];
        r.side = Side::Lower(lo_inner);
        r.partner = Some(hi);
        let r = &mut self.records[hi];
        r.side = Side::Upper(hi_inner);
        r.partner = Some(lo);
        Ok(())
    }

    /// Removes the pair containing `x` from the inner heaps and returns the
    /// partner of `x`.
    fn unpair(&mut self, x: NodeId) -> HeapResult<NodeId> {
        let partner = self.records[x]
            .partner
            .ok_or_else(|| HeapError::illegal_state("unpaired record outside the free slot"))?;
        for r in [x, partner] {
            let record = &mut self.records[r];
            record.partner = None;
            match std::mem::replace(&mut record.side, Side::Free) {
                Side::Lower(inner) => self.lower.delete(&inner)?,
                Side::Upper(inner) => self.upper.delete(&inner)?,
                Side::Free => {}
            }
        }
        Ok(partner)
    }

    /// Finds a place for a record that lost its partner.
    fn settle(&mut self, x: NodeId) -> HeapResult<()> {
        match self.free.take() {
            None => {
                self.free = Some(x);
                Ok(())
            }
            Some(f) => self.pair(f, x),
        }
    }

    fn release(&mut self, x: NodeId) -> Handle<K> {
        let record = self.records.remove(x);
        record.elem.unlink();
        record.elem
    }

    /// Removes the record `x`, whichever side it is on.
    fn remove(&mut self, x: NodeId) -> HeapResult<Handle<K>> {
        if self.free == Some(x) {
            self.free = None;
        } else {
            let partner = self.unpair(x)?;
            self.settle(partner)?;
        }
        Ok(self.release(x))
    }

    /// The extreme record of one side, taking the free element into account.
    fn extreme(&self, inner: Option<Handle<K>>, max: bool) -> Option<NodeId> {
        let paired = inner.as_ref().map(Self::record_of);
        match (paired, self.free) {
            (Some(p), Some(f)) => {
                let free_wins = if max { self.less(p, f) } else { self.less(f, p) };
                Some(if free_wins { f } else { p })
            }
            (p, None) => p,
            (None, f) => f,
        }
    }

    fn min_record(&self) -> Option<NodeId> {
        self.extreme(self.lower.find_min().ok(), false)
    }

    fn max_record(&self) -> Option<NodeId> {
        self.extreme(self.upper.find_min().ok(), true)
    }
}

impl<K, C, Lo, Hi> AddressableHeap<K> for ReflectedHeap<K, C, Lo, Hi>
where
    K: Key,
    C: Comparator<K>,
    Lo: AddressableHeap<K> + MergeableHeap,
    Hi: AddressableHeap<K> + MergeableHeap,
{
    fn insert(&mut self, key: K, value: i64) -> HeapResult<Handle<K>> {
        let handle = Handle::new(key, value, &self.owner);
        let id = self.records.alloc(Record {
            elem: handle.clone(),
            side: Side::Free,
            partner: None,
        });
        handle.link(id.to_raw());
        if let Err(e) = self.settle(id) {
            self.release(id);
            return Err(e);
        }
        Ok(handle)
    }

    fn find_min(&self) -> HeapResult<Handle<K>> {
        self.min_record()
            .map(|r| self.records[r].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_min(&mut self) -> HeapResult<Handle<K>> {
        let x = self.min_record().ok_or(HeapError::NoSuchElement)?;
        self.remove(x)
    }

    fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.greater(&key, &handle.key()) {
            return Err(HeapError::key_not_decreased());
        }
        match self.records[x].side.clone() {
            Side::Free => handle.set_key(key),
            Side::Lower(inner) => {
                self.lower.decrease_key(&inner, key)?;
                handle.set_key(key);
            }
            Side::Upper(_) => {
                let partner = self.unpair(x)?;
                handle.set_key(key);
                self.pair(x, partner)?;
            }
        }
        Ok(())
    }

    fn delete(&mut self, handle: &Handle<K>) -> HeapResult<()> {
        let x = self.locate(handle)?;
        self.remove(x).map(|_| ())
    }

    #[inline]
    fn len(&self) -> usize {
        self.records.len()
    }

    fn clear(&mut self) {
        for record in self.records.values() {
            record.elem.unlink();
        }
        self.records.clear();
        self.lower.clear();
        self.upper.clear();
        self.free = None;
    }
}

impl<K, C, Lo, Hi> DoubleEndedAddressableHeap<K> for ReflectedHeap<K, C, Lo, Hi>
where
    K: Key,
    C: Comparator<K>,
    Lo: AddressableHeap<K> + MergeableHeap,
    Hi: AddressableHeap<K> + MergeableHeap,
{
    fn find_max(&self) -> HeapResult<Handle<K>> {
        self.max_record()
            .map(|r| self.records[r].elem.clone())
            .ok_or(HeapError::NoSuchElement)
    }

    fn delete_max(&mut self) -> HeapResult<Handle<K>> {
        let x = self.max_record().ok_or(HeapError::NoSuchElement)?;
        self.remove(x)
    }

    fn increase_key(&mut self, handle: &Handle<K>, key: K) -> HeapResult<()> {
        let x = self.locate(handle)?;
        if self.comparator.less(&key, &handle.key()) {
            return Err(HeapError::key_not_increased());
        }
        match self.records[x].side.clone() {
            Side::Free => handle.set_key(key),
            Side::Upper(inner) => {
                self.upper.decrease_key(&inner, key)?;
                handle.set_key(key);
            }
            Side::Lower(_) => {
                let partner = self.unpair(x)?;
                handle.set_key(key);
                self.pair(x, partner)?;
            }
        }
        Ok(())
    }
}

impl<K, C, Lo, Hi> MergeableHeap for ReflectedHeap<K, C, Lo, Hi>
where
    K: Key,
    C: Comparator<K>,
    Lo: AddressableHeap<K> + MergeableHeap,
    Hi: AddressableHeap<K> + MergeableHeap,
{
    fn meld(&mut self, other: &mut Self) -> HeapResult<()> {
        if self.comparator != other.comparator {
            return Err(HeapError::comparator_mismatch());
        }
        self.lower.meld(&mut other.lower)?;
        self.upper.meld(&mut other.upper)?;
        self.records.absorb(&mut other.records);
        if let Some(f) = other.free.take() {
            self.settle(f)?;
        }
        self.owner.adopt(&mut other.owner);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        assert_addressable_contract, assert_double_ended_contract, assert_meld_contract,
    };
    use jheaps_core::compare::NaturalOrder;

    #[test]
    fn test_free_element_serves_both_ends() {
        let mut heap = ReflectedPairingHeap::pairing(NaturalOrder);
        let h = heap.insert(4.0f64, 1).unwrap();
        assert_eq!(heap.free, Some(NodeId::from_raw(h.slot())));
        assert!(heap.find_min().unwrap().ptr_eq(&h));
        assert!(heap.find_max().unwrap().ptr_eq(&h));

        heap.insert(2.0, 2).unwrap();
        assert_eq!(heap.free, None);
        assert_eq!(heap.find_min().unwrap().key(), 2.0);
        assert_eq!(heap.find_max().unwrap().key(), 4.0);

        heap.insert(9.0, 3).unwrap();
        assert_eq!(heap.delete_max().unwrap().value(), 3);
        assert_eq!(heap.delete_max().unwrap().value(), 1);
        assert_eq!(heap.delete_max().unwrap().value(), 2);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_decrease_upper_element_below_partner() {
        let mut heap = ReflectedFibonacciHeap::fibonacci(NaturalOrder);
        heap.insert(5i64, 0).unwrap();
        let upper = heap.insert(8, 0).unwrap();
        heap.decrease_key(&upper, 1).unwrap();
        assert!(heap.find_min().unwrap().ptr_eq(&upper));
        assert_eq!(heap.find_max().unwrap().key(), 5);
    }

    #[test]
    fn test_contract() {
        assert_addressable_contract(|| ReflectedFibonacciHeap::fibonacci(NaturalOrder));
        assert_meld_contract(|| ReflectedFibonacciHeap::fibonacci(NaturalOrder));
        assert_double_ended_contract(|| ReflectedFibonacciHeap::fibonacci(NaturalOrder));
        assert_addressable_contract(|| ReflectedPairingHeap::pairing(NaturalOrder));
        assert_meld_contract(|| ReflectedPairingHeap::pairing(NaturalOrder));
        assert_double_ended_contract(|| ReflectedPairingHeap::pairing(NaturalOrder));
    }
}
