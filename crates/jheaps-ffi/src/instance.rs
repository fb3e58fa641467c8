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

//! Type-erased heap instances.
//!
//! The engine's heaps are generic over key type and comparator. Behind a
//! handle they live as a [`KeyedHeap`], one trait object per capability
//! interface, wrapped in an [`AnyHeap`] for the key domain. Each operation
//! dispatches on the interface and reports `ClassCast` when the heap does not
//! implement it.

use crate::comparator::LongOrder;
use crate::error::Fault;
use crate::variant::{Capabilities, HeapVariant, KeyDomain, Shape};
use jheaps_core::compare::{Comparator, NaturalOrder};
use jheaps_core::key::Key;
use jheaps_engine::array::addressable::DaryArrayAddressableHeap;
use jheaps_engine::array::dary::DaryArrayHeap;
use jheaps_engine::array::weak::{BulkInsertWeakHeap, WeakHeap};
use jheaps_engine::double_ended::minmax::MinMaxBinaryArrayHeap;
use jheaps_engine::double_ended::reflected::{ReflectedFibonacciHeap, ReflectedPairingHeap};
use jheaps_engine::element::Handle;
use jheaps_engine::error::HeapError;
use jheaps_engine::monotone::radix::{RadixAddressableHeap, RadixHeap};
use jheaps_engine::traits::{
    AddressableHeap, DoubleEndedHeap, Heap, MergeableAddressableHeap,
    MergeableDoubleEndedAddressableHeap,
};
use jheaps_engine::tree::costless_meld_pairing::CostlessMeldPairingHeap;
use jheaps_engine::tree::explicit::DaryTreeAddressableHeap;
use jheaps_engine::tree::fibonacci::FibonacciHeap;
use jheaps_engine::tree::hollow::HollowHeap;
use jheaps_engine::tree::leftist::{LeftistHeap, SkewHeap};
use jheaps_engine::tree::pairing::PairingHeap;
use jheaps_engine::tree::rank_pairing::RankPairingHeap;
use jheaps_engine::tree::simple_fibonacci::SimpleFibonacciHeap;
use jheaps_engine::tree::soft::BinaryTreeSoftAddressableHeap;

const HEAP: &str = "Heap";
const DOUBLE_ENDED_HEAP: &str = "DoubleEndedHeap";
const ADDRESSABLE_HEAP: &str = "AddressableHeap";
const DOUBLE_ENDED_ADDRESSABLE_HEAP: &str = "DoubleEndedAddressableHeap";
const MERGEABLE_ADDRESSABLE_HEAP: &str = "MergeableAddressableHeap";

/// A heap over keys of type `K`, held through its widest capability interface.
pub enum KeyedHeap<K> {
    Plain(Box<dyn Heap<K>>),
    DoubleEnded(Box<dyn DoubleEndedHeap<K>>),
    Addressable(Box<dyn AddressableHeap<K>>),
    Mergeable(Box<dyn MergeableAddressableHeap<K>>),
    DoubleEndedMergeable(Box<dyn MergeableDoubleEndedAddressableHeap<K>>),
}

/// Expands `$body` once per addressable arm with `$h` bound to the heap.
macro_rules! addressable {
    ($self:expr, $h:ident => $body:expr, else $missing:expr) => {
        match $self {
            KeyedHeap::Addressable($h) => $body,
            KeyedHeap::Mergeable($h) => $body,
            KeyedHeap::DoubleEndedMergeable($h) => $body,
            KeyedHeap::Plain(_) | KeyedHeap::DoubleEnded(_) => $missing,
        }
    };
}

/// Like [`addressable!`] for the bare-key arms.
macro_rules! keyed {
    ($self:expr, $h:ident => $body:expr, else $missing:expr) => {
        match $self {
            KeyedHeap::Plain($h) => $body,
            KeyedHeap::DoubleEnded($h) => $body,
            _ => $missing,
        }
    };
}

impl<K: Key> KeyedHeap<K> {
    pub fn len(&self) -> usize {
        match self {
            Self::Plain(h) => h.len(),
            Self::DoubleEnded(h) => h.len(),
            Self::Addressable(h) => h.len(),
            Self::Mergeable(h) => h.len(),
            Self::DoubleEndedMergeable(h) => h.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            Self::Plain(h) => h.clear(),
            Self::DoubleEnded(h) => h.clear(),
            Self::Addressable(h) => h.clear(),
            Self::Mergeable(h) => h.clear(),
            Self::DoubleEndedMergeable(h) => h.clear(),
        }
    }

    pub fn insert_key(&mut self, key: K) -> Result<(), Fault> {
        keyed!(self, h => Ok(h.insert(key)?), else Err(Fault::MissingInterface(HEAP)))
    }

    pub fn find_min_key(&self) -> Result<K, Fault> {
        keyed!(self, h => Ok(h.find_min()?), else Err(Fault::MissingInterface(HEAP)))
    }

    pub fn delete_min_key(&mut self) -> Result<K, Fault> {
        keyed!(self, h => Ok(h.delete_min()?), else Err(Fault::MissingInterface(HEAP)))
    }

    pub fn find_max_key(&self) -> Result<K, Fault> {
        match self {
            Self::DoubleEnded(h) => Ok(h.find_max()?),
            _ => Err(Fault::MissingInterface(DOUBLE_ENDED_HEAP)),
        }
    }

    pub fn delete_max_key(&mut self) -> Result<K, Fault> {
        match self {
            Self::DoubleEnded(h) => Ok(h.delete_max()?),
            _ => Err(Fault::MissingInterface(DOUBLE_ENDED_HEAP)),
        }
    }

    pub fn insert_element(&mut self, key: K, value: i64) -> Result<Handle<K>, Fault> {
        addressable!(
            self,
            h => Ok(h.insert(key, value)?),
            else Err(Fault::MissingInterface(ADDRESSABLE_HEAP))
        )
    }

    pub fn find_min_element(&self) -> Result<Handle<K>, Fault> {
        addressable!(
            self,
            h => Ok(h.find_min()?),
            else Err(Fault::MissingInterface(ADDRESSABLE_HEAP))
        )
    }

    pub fn delete_min_element(&mut self) -> Result<Handle<K>, Fault> {
        addressable!(
            self,
            h => Ok(h.delete_min()?),
            else Err(Fault::MissingInterface(ADDRESSABLE_HEAP))
        )
    }

    pub fn decrease_key(&mut self, handle: &Handle<K>, key: K) -> Result<(), Fault> {
        addressable!(
            self,
            h => Ok(h.decrease_key(handle, key)?),
            else Err(Fault::MissingInterface(ADDRESSABLE_HEAP))
        )
    }

    pub fn delete(&mut self, handle: &Handle<K>) -> Result<(), Fault> {
        addressable!(
            self,
            h => Ok(h.delete(handle)?),
            else Err(Fault::MissingInterface(ADDRESSABLE_HEAP))
        )
    }

    pub fn find_max_element(&self) -> Result<Handle<K>, Fault> {
        match self {
            Self::DoubleEndedMergeable(h) => Ok(h.find_max()?),
            _ => Err(Fault::MissingInterface(DOUBLE_ENDED_ADDRESSABLE_HEAP)),
        }
    }

    pub fn delete_max_element(&mut self) -> Result<Handle<K>, Fault> {
        match self {
            Self::DoubleEndedMergeable(h) => Ok(h.delete_max()?),
            _ => Err(Fault::MissingInterface(DOUBLE_ENDED_ADDRESSABLE_HEAP)),
        }
    }

    pub fn increase_key(&mut self, handle: &Handle<K>, key: K) -> Result<(), Fault> {
        match self {
            Self::DoubleEndedMergeable(h) => Ok(h.increase_key(handle, key)?),
            _ => Err(Fault::MissingInterface(DOUBLE_ENDED_ADDRESSABLE_HEAP)),
        }
    }

    /// Moves every element of `other` into `self`.
    ///
    /// Both heaps must hold the same engine type; the engine reports
    /// `ClassCast` otherwise.
    pub fn meld(&mut self, other: &mut KeyedHeap<K>) -> Result<(), Fault> {
        match (self, other) {
            (Self::Mergeable(a), Self::Mergeable(b)) => Ok(a.meld_dyn((**b).as_any_mut())?),
            (Self::DoubleEndedMergeable(a), Self::DoubleEndedMergeable(b)) => {
                Ok(a.meld_dyn((**b).as_any_mut())?)
            }
            (Self::Mergeable(_), _) | (Self::DoubleEndedMergeable(_), _) => {
                Err(HeapError::ClassCast.into())
            }
            _ => Err(Fault::MissingInterface(MERGEABLE_ADDRESSABLE_HEAP)),
        }
    }
}

/// A heap of either key domain.
pub enum AnyHeap {
    Double(KeyedHeap<f64>),
    Long(KeyedHeap<i64>),
}

impl AnyHeap {
    #[inline]
    pub fn domain(&self) -> KeyDomain {
        match self {
            Self::Double(_) => KeyDomain::Double,
            Self::Long(_) => KeyDomain::Long,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Double(h) => h.len(),
            Self::Long(h) => h.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            Self::Double(h) => h.clear(),
            Self::Long(h) => h.clear(),
        }
    }

    pub fn meld(&mut self, other: &mut AnyHeap) -> Result<(), Fault> {
        match (self, other) {
            (Self::Double(a), Self::Double(b)) => a.meld(b),
            (Self::Long(a), Self::Long(b)) => a.meld(b),
            (a, b) => Err(Fault::DomainMismatch {
                expected: a.domain(),
                actual: b.domain(),
            }),
        }
    }
}

/// An element handle of either key domain.
#[derive(Debug, Clone)]
pub enum AnyElement {
    Double(Handle<f64>),
    Long(Handle<i64>),
}

impl AnyElement {
    #[inline]
    pub fn domain(&self) -> KeyDomain {
        match self {
            Self::Double(_) => KeyDomain::Double,
            Self::Long(_) => KeyDomain::Long,
        }
    }
}

/// Ties a key type to its domain tag, its default order, and its arm of the
/// erased containers.
pub(crate) trait DomainKey: Key {
    const KEY_DOMAIN: KeyDomain;

    type Order: Comparator<Self>;

    fn natural_order() -> Self::Order;

    fn keyed_mut(heap: &mut AnyHeap) -> Option<&mut KeyedHeap<Self>>;

    fn erase(heap: KeyedHeap<Self>) -> AnyHeap;

    fn element(element: &AnyElement) -> Option<&Handle<Self>>;

    fn erase_element(handle: Handle<Self>) -> AnyElement;
}

impl DomainKey for f64 {
    const KEY_DOMAIN: KeyDomain = KeyDomain::Double;

    type Order = NaturalOrder;

    #[inline]
    fn natural_order() -> Self::Order {
        NaturalOrder
    }

    #[inline]
    fn keyed_mut(heap: &mut AnyHeap) -> Option<&mut KeyedHeap<Self>> {
        match heap {
            AnyHeap::Double(h) => Some(h),
            AnyHeap::Long(_) => None,
        }
    }

    #[inline]
    fn erase(heap: KeyedHeap<Self>) -> AnyHeap {
        AnyHeap::Double(heap)
    }

    #[inline]
    fn element(element: &AnyElement) -> Option<&Handle<Self>> {
        match element {
            AnyElement::Double(e) => Some(e),
            AnyElement::Long(_) => None,
        }
    }

    #[inline]
    fn erase_element(handle: Handle<Self>) -> AnyElement {
        AnyElement::Double(handle)
    }
}

impl DomainKey for i64 {
    const KEY_DOMAIN: KeyDomain = KeyDomain::Long;

    type Order = LongOrder;

    #[inline]
    fn natural_order() -> Self::Order {
        LongOrder::Natural
    }

    #[inline]
    fn keyed_mut(heap: &mut AnyHeap) -> Option<&mut KeyedHeap<Self>> {
        match heap {
            AnyHeap::Long(h) => Some(h),
            AnyHeap::Double(_) => None,
        }
    }

    #[inline]
    fn erase(heap: KeyedHeap<Self>) -> AnyHeap {
        AnyHeap::Long(heap)
    }

    #[inline]
    fn element(element: &AnyElement) -> Option<&Handle<Self>> {
        match element {
            AnyElement::Long(e) => Some(e),
            AnyElement::Double(_) => None,
        }
    }

    #[inline]
    fn erase_element(handle: Handle<Self>) -> AnyElement {
        AnyElement::Long(handle)
    }
}

fn shape_mismatch(variant: HeapVariant, requested: Shape) -> Fault {
    Fault::invalid(format!(
        "{} is a {} heap and cannot be built as a {} heap",
        variant,
        variant.shape(),
        requested
    ))
}

/// Builds an empty heap of a variant without shape parameters.
pub(crate) fn plain<K: DomainKey>(
    variant: HeapVariant,
    order: K::Order,
) -> Result<KeyedHeap<K>, Fault> {
    use HeapVariant as V;
    let heap = match variant {
        V::Fibonacci => KeyedHeap::Mergeable(Box::new(FibonacciHeap::<K, K::Order>::new(order))),
        V::SimpleFibonacci => {
            KeyedHeap::Mergeable(Box::new(SimpleFibonacciHeap::<K, K::Order>::new(order)))
        }
        V::Pairing => KeyedHeap::Mergeable(Box::new(PairingHeap::<K, K::Order>::new(order))),
        V::RankPairing => {
            KeyedHeap::Mergeable(Box::new(RankPairingHeap::<K, K::Order>::new(order)))
        }
        V::CostlessMeldPairing => {
            KeyedHeap::Mergeable(Box::new(CostlessMeldPairingHeap::<K, K::Order>::new(order)))
        }
        V::Hollow => KeyedHeap::Mergeable(Box::new(HollowHeap::<K, K::Order>::new(order))),
        V::Leftist => KeyedHeap::Mergeable(Box::new(LeftistHeap::<K, K::Order>::new(order))),
        V::Skew => KeyedHeap::Mergeable(Box::new(SkewHeap::<K, K::Order>::new(order))),
        V::BinaryArray => KeyedHeap::Plain(Box::new(DaryArrayHeap::<K, K::Order>::binary(order))),
        V::BinaryArrayWeak => KeyedHeap::Plain(Box::new(WeakHeap::<K, K::Order>::new(order))),
        V::BinaryArrayBulkInsertWeak => {
            KeyedHeap::Plain(Box::new(BulkInsertWeakHeap::<K, K::Order>::new(order)))
        }
        V::BinaryArrayAddressable => KeyedHeap::Addressable(Box::new(
            DaryArrayAddressableHeap::<K, K::Order>::binary(order),
        )),
        V::BinaryTreeAddressable => KeyedHeap::Addressable(Box::new(
            DaryTreeAddressableHeap::<K, K::Order>::binary(order),
        )),
        V::MinMaxBinaryArray => {
            KeyedHeap::DoubleEnded(Box::new(MinMaxBinaryArrayHeap::<K, K::Order>::new(order)))
        }
        V::ReflectedFibonacci => KeyedHeap::DoubleEndedMergeable(Box::new(
            ReflectedFibonacciHeap::<K, K::Order>::fibonacci(order),
        )),
        V::ReflectedPairing => KeyedHeap::DoubleEndedMergeable(Box::new(
            ReflectedPairingHeap::<K, K::Order>::pairing(order),
        )),
        _ => return Err(shape_mismatch(variant, Shape::Plain)),
    };
    Ok(heap)
}

/// Builds an empty d-ary heap.
pub(crate) fn dary<K: DomainKey>(
    variant: HeapVariant,
    d: usize,
    order: K::Order,
) -> Result<KeyedHeap<K>, Fault> {
    let heap = match variant {
        HeapVariant::DaryArray => {
            KeyedHeap::Plain(Box::new(DaryArrayHeap::<K, K::Order>::new(d, order)?))
        }
        HeapVariant::DaryArrayAddressable => KeyedHeap::Addressable(Box::new(
            DaryArrayAddressableHeap::<K, K::Order>::new(d, order)?,
        )),
        HeapVariant::DaryTreeAddressable => KeyedHeap::Addressable(Box::new(
            DaryTreeAddressableHeap::<K, K::Order>::new(d, order)?,
        )),
        _ => return Err(shape_mismatch(variant, Shape::Dary)),
    };
    Ok(heap)
}

/// Builds an empty soft heap with the given error rate.
pub(crate) fn soft<K: DomainKey>(
    variant: HeapVariant,
    error_rate: f64,
    order: K::Order,
) -> Result<KeyedHeap<K>, Fault> {
    match variant {
        HeapVariant::BinaryTreeSoftAddressable => Ok(KeyedHeap::Mergeable(Box::new(
            BinaryTreeSoftAddressableHeap::<K, K::Order>::new(error_rate, order)?,
        ))),
        _ => Err(shape_mismatch(variant, Shape::Soft)),
    }
}

/// Builds an empty radix heap accepting keys in `[min, max]`.
pub(crate) fn monotone<K: DomainKey>(
    variant: HeapVariant,
    min: K,
    max: K,
) -> Result<KeyedHeap<K>, Fault> {
    if variant.shape() != Shape::Monotone {
        return Err(shape_mismatch(variant, Shape::Monotone));
    }
    if !variant.supports(K::KEY_DOMAIN) {
        return Err(Fault::invalid(format!(
            "{} does not accept {} keys",
            variant,
            K::KEY_DOMAIN
        )));
    }
    let heap = match variant {
        HeapVariant::LongRadixAddressable | HeapVariant::DoubleRadixAddressable => {
            KeyedHeap::Addressable(Box::new(RadixAddressableHeap::<K>::new(min, max)?))
        }
        _ => KeyedHeap::Plain(Box::new(RadixHeap::<K>::new(min, max)?)),
    };
    Ok(heap)
}

/// Builds a heap holding `keys` (and `values`) in linear time.
///
/// `d` is `None` for the binary variants. `values`, when given, has the same
/// length as `keys` and is only accepted by addressable variants.
pub(crate) fn heapify<K: DomainKey>(
    variant: HeapVariant,
    d: Option<usize>,
    order: K::Order,
    keys: &[K],
    values: Option<&[i64]>,
) -> Result<KeyedHeap<K>, Fault> {
    let requested = if d.is_some() { Shape::Dary } else { Shape::Plain };
    if variant.shape() != requested {
        return Err(shape_mismatch(variant, requested));
    }
    let caps = variant.capabilities();
    if !caps.contains(Capabilities::BULK_BUILDABLE) {
        return Err(Fault::invalid(format!("{} cannot be heapified", variant)));
    }
    if values.is_some() && !caps.contains(Capabilities::ADDRESSABLE) {
        return Err(Fault::invalid(format!("{} does not store values", variant)));
    }
    let d = d.unwrap_or(2);
    let values = values.unwrap_or(&[]);

    let heap = match variant {
        HeapVariant::BinaryArray | HeapVariant::DaryArray => KeyedHeap::Plain(Box::new(
            DaryArrayHeap::<K, K::Order>::heapify(d, order, keys.to_vec())?,
        )),
        HeapVariant::BinaryArrayWeak => KeyedHeap::Plain(Box::new(
            WeakHeap::<K, K::Order>::heapify(order, keys.to_vec()),
        )),
        HeapVariant::BinaryArrayBulkInsertWeak => KeyedHeap::Plain(Box::new(
            BulkInsertWeakHeap::<K, K::Order>::heapify(order, keys.to_vec()),
        )),
        HeapVariant::BinaryArrayAddressable | HeapVariant::DaryArrayAddressable => {
            KeyedHeap::Addressable(Box::new(DaryArrayAddressableHeap::<K, K::Order>::heapify(
                d, order, keys, values,
            )?))
        }
        HeapVariant::MinMaxBinaryArray => KeyedHeap::DoubleEnded(Box::new(
            MinMaxBinaryArrayHeap::<K, K::Order>::heapify(order, keys.to_vec()),
        )),
        _ => return Err(Fault::invalid(format!("{} cannot be heapified", variant))),
    };
    Ok(heap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn drain<K: Key>(heap: &mut KeyedHeap<K>) -> Vec<K> {
        let mut out = Vec::new();
        while !heap.is_empty() {
            let bare = matches!(heap, KeyedHeap::Plain(_) | KeyedHeap::DoubleEnded(_));
            let key = if bare {
                heap.delete_min_key()
            } else {
                heap.delete_min_element().map(|h| h.key())
            };
            match key {
                Ok(k) => out.push(k),
                Err(e) => panic!("drain failed: {}", e),
            }
        }
        out
    }

    fn fill<K: Key>(heap: &mut KeyedHeap<K>, keys: &[K]) {
        let bare = matches!(heap, KeyedHeap::Plain(_) | KeyedHeap::DoubleEnded(_));
        for (i, k) in keys.iter().enumerate() {
            let result = if bare {
                heap.insert_key(*k)
            } else {
                heap.insert_element(*k, i as i64).map(|_| ())
            };
            assert!(result.is_ok());
        }
    }

    fn shuffled(n: i64) -> Vec<i64> {
        (0..n).map(|i| (i * 37 + 11) % n).collect()
    }

    #[rstest]
    #[case(HeapVariant::Fibonacci)]
    #[case(HeapVariant::SimpleFibonacci)]
    #[case(HeapVariant::Pairing)]
    #[case(HeapVariant::RankPairing)]
    #[case(HeapVariant::CostlessMeldPairing)]
    #[case(HeapVariant::Hollow)]
    #[case(HeapVariant::Leftist)]
    #[case(HeapVariant::Skew)]
    #[case(HeapVariant::BinaryArray)]
    #[case(HeapVariant::BinaryArrayWeak)]
    #[case(HeapVariant::BinaryArrayBulkInsertWeak)]
    #[case(HeapVariant::BinaryArrayAddressable)]
    #[case(HeapVariant::BinaryTreeAddressable)]
    #[case(HeapVariant::MinMaxBinaryArray)]
    #[case(HeapVariant::ReflectedFibonacci)]
    #[case(HeapVariant::ReflectedPairing)]
    fn test_plain_variants_sort(#[case] variant: HeapVariant) {
        let mut heap = match plain::<i64>(variant, LongOrder::Natural) {
            Ok(h) => h,
            Err(e) => panic!("{}: {}", variant, e),
        };
        let keys = shuffled(101);
        fill(&mut heap, &keys);
        assert_eq!(heap.len(), 101);
        assert_eq!(drain(&mut heap), (0..101).collect::<Vec<_>>());
    }

    #[rstest]
    #[case(HeapVariant::DaryArray)]
    #[case(HeapVariant::DaryArrayAddressable)]
    #[case(HeapVariant::DaryTreeAddressable)]
    fn test_dary_variants_sort(#[case] variant: HeapVariant) {
        for d in [2, 3, 7] {
            let mut heap = match dary::<f64>(variant, d, NaturalOrder) {
                Ok(h) => h,
                Err(e) => panic!("{}: {}", variant, e),
            };
            let keys: Vec<f64> = shuffled(50).into_iter().map(|k| k as f64 * 0.5).collect();
            fill(&mut heap, &keys);
            let sorted: Vec<f64> = (0..50).map(|k| k as f64 * 0.5).collect();
            assert_eq!(drain(&mut heap), sorted);
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(plain::<i64>(HeapVariant::DaryArray, LongOrder::Natural).is_err());
        assert!(dary::<i64>(HeapVariant::Pairing, 3, LongOrder::Natural).is_err());
        assert!(soft::<i64>(HeapVariant::Pairing, 0.5, LongOrder::Natural).is_err());
        assert!(monotone::<i64>(HeapVariant::Pairing, 0, 10).is_err());
        assert!(monotone::<i64>(HeapVariant::DoubleRadix, 0, 10).is_err());
        assert!(monotone::<f64>(HeapVariant::DoubleRadix, 0.0, 10.0).is_ok());
        assert!(dary::<i64>(HeapVariant::DaryArray, 1, LongOrder::Natural).is_err());
    }

    #[test]
    fn test_interface_errors_are_class_casts() {
        let mut heap = match plain::<i64>(HeapVariant::BinaryArray, LongOrder::Natural) {
            Ok(h) => h,
            Err(e) => panic!("{}", e),
        };
        let err = heap.insert_element(1, 0).err();
        assert!(matches!(err, Some(Fault::MissingInterface("AddressableHeap"))));
        let err = heap.find_max_key().err();
        assert!(matches!(err, Some(Fault::MissingInterface("DoubleEndedHeap"))));
    }

    #[test]
    fn test_meld_across_types_is_class_cast() {
        let a = plain::<i64>(HeapVariant::Pairing, LongOrder::Natural);
        let b = plain::<i64>(HeapVariant::Fibonacci, LongOrder::Natural);
        let (mut a, mut b) = match (a, b) {
            (Ok(a), Ok(b)) => (a, b),
            _ => panic!("construction failed"),
        };
        let err = a.meld(&mut b).err();
        assert!(matches!(err, Some(Fault::Heap(HeapError::ClassCast))));
    }

    #[test]
    fn test_heapify_rejections() {
        let keys = [3i64, 1, 2];
        let order = LongOrder::Natural;
        assert!(heapify::<i64>(HeapVariant::Pairing, None, order, &keys, None).is_err());
        assert!(heapify::<i64>(HeapVariant::DaryArray, None, order, &keys, None).is_err());
        assert!(heapify::<i64>(HeapVariant::BinaryArray, Some(3), order, &keys, None).is_err());
        let values = [0i64, 0, 0];
        assert!(
            heapify::<i64>(HeapVariant::BinaryArray, None, order, &keys, Some(&values)).is_err()
        );
        assert!(heapify::<i64>(
            HeapVariant::BinaryArrayAddressable,
            None,
            order,
            &keys,
            Some(&values)
        )
        .is_ok());
    }

    fn bulk_and_sequential(
        variant: HeapVariant,
        d: Option<usize>,
        keys: &[i64],
        values: Option<&[i64]>,
    ) -> (KeyedHeap<i64>, KeyedHeap<i64>) {
        let bulk = heapify::<i64>(variant, d, LongOrder::Natural, keys, values);
        let empty = match d {
            Some(d) => dary::<i64>(variant, d, LongOrder::Natural),
            None => plain::<i64>(variant, LongOrder::Natural),
        };
        match (bulk, empty) {
            (Ok(a), Ok(b)) => (a, b),
            _ => panic!("{} failed to build", variant),
        }
    }

    fn drain_pairs(heap: &mut KeyedHeap<i64>) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        while !heap.is_empty() {
            match heap.delete_min_element() {
                Ok(h) => out.push((h.key(), h.value())),
                Err(e) => panic!("drain failed: {}", e),
            }
        }
        out
    }

    fn drain_max(heap: &mut KeyedHeap<i64>) -> Vec<i64> {
        let mut out = Vec::new();
        while !heap.is_empty() {
            match heap.delete_max_key() {
                Ok(k) => out.push(k),
                Err(e) => panic!("drain failed: {}", e),
            }
        }
        out
    }

    const BULK: [(HeapVariant, Option<usize>); 7] = [
        (HeapVariant::BinaryArray, None),
        (HeapVariant::BinaryArrayWeak, None),
        (HeapVariant::BinaryArrayBulkInsertWeak, None),
        (HeapVariant::BinaryArrayAddressable, None),
        (HeapVariant::DaryArray, Some(4)),
        (HeapVariant::DaryArrayAddressable, Some(3)),
        (HeapVariant::MinMaxBinaryArray, None),
    ];

    proptest! {
        #[test]
        fn prop_heapify_matches_sequential_inserts(
            keys in proptest::collection::hash_set(-1000i64..1000, 1..200)
        ) {
            let keys: Vec<i64> = keys.into_iter().collect();
            let mut ascending = keys.clone();
            ascending.sort_unstable();
            for (variant, d) in BULK {
                let (mut bulk, mut sequential) = bulk_and_sequential(variant, d, &keys, None);
                fill(&mut sequential, &keys);
                prop_assert_eq!(bulk.len(), keys.len());
                prop_assert_eq!(drain(&mut bulk), ascending.clone());
                prop_assert_eq!(drain(&mut sequential), ascending.clone());
            }
        }

        #[test]
        fn prop_heapify_keeps_values_with_their_keys(
            keys in proptest::collection::hash_set(-1000i64..1000, 1..200)
        ) {
            let keys: Vec<i64> = keys.into_iter().collect();
            let values: Vec<i64> = keys.iter().map(|k| k * 7 + 1).collect();
            let mut expected: Vec<(i64, i64)> =
                keys.iter().copied().zip(values.iter().copied()).collect();
            expected.sort_unstable();
            for (variant, d) in BULK {
                if !variant.capabilities().contains(Capabilities::ADDRESSABLE) {
                    continue;
                }
                let (mut bulk, mut sequential) =
                    bulk_and_sequential(variant, d, &keys, Some(&values));
                for (k, v) in keys.iter().zip(&values) {
                    prop_assert!(sequential.insert_element(*k, *v).is_ok());
                }
                prop_assert_eq!(drain_pairs(&mut bulk), expected.clone());
                prop_assert_eq!(drain_pairs(&mut sequential), expected.clone());
            }
        }

        #[test]
        fn prop_heapified_min_max_drains_from_the_top(
            keys in proptest::collection::hash_set(-1000i64..1000, 1..200)
        ) {
            let keys: Vec<i64> = keys.into_iter().collect();
            let mut descending = keys.clone();
            descending.sort_unstable_by(|a, b| b.cmp(a));
            let (mut bulk, mut sequential) =
                bulk_and_sequential(HeapVariant::MinMaxBinaryArray, None, &keys, None);
            fill(&mut sequential, &keys);
            prop_assert_eq!(drain_max(&mut bulk), descending.clone());
            prop_assert_eq!(drain_max(&mut sequential), descending);
        }

        #[test]
        fn prop_double_heaps_sort_with_negative_zero(
            keys in proptest::collection::vec(-50.0f64..50.0, 1..100)
        ) {
            let mut heap = match plain::<f64>(HeapVariant::Pairing, NaturalOrder) {
                Ok(h) => h,
                Err(e) => panic!("{}", e),
            };
            let mut keys = keys;
            keys.push(-0.0);
            keys.push(0.0);
            fill(&mut heap, &keys);
            let drained = drain(&mut heap);
            for w in drained.windows(2) {
                prop_assert!(w[0].total_cmp(&w[1]).is_le());
            }
        }
    }
}
