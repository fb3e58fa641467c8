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

//! # Meld
//!
//! `jheaps_maheap_meld(h1, h2)` moves every element of `h2` into `h1`.
//! Afterwards `h2` is consumed: every operation on it reports `IllegalState`
//! and it only remains to be destroyed. Element handles issued from `h2`
//! keep working and address `h1`.
//!
//! Both heaps must be of the same mergeable variant and key domain. Two
//! `long` heaps with different orderings, or two soft heaps with different
//! error rates, cannot be melded (`IllegalArgument`).
//!
//! ## Exported Functions
//!
//! * `jheaps_maheap_meld`

use crate::error::{self, Fault};
use crate::registry::{lock_pair, registry, HeapState};
use crate::status::JheapsStatus;
use crate::variant::Capabilities;
use jheaps_engine::error::HeapError;
use std::sync::Arc;

fn meld(h1: u64, h2: u64) -> Result<(), Fault> {
    let receiver = registry().heap(h1)?;
    let donor = registry().heap(h2)?;
    if Arc::ptr_eq(&receiver, &donor) {
        return Err(Fault::invalid("a heap cannot be melded with itself"));
    }

    let (mut a, mut b) = lock_pair(&receiver, &donor);
    let (variant, other_variant) = (a.variant, b.variant);
    let into = a.live_mut()?;
    let from = b.live_mut()?;
    if !variant.capabilities().contains(Capabilities::MERGEABLE) {
        return Err(Fault::MissingInterface("MergeableAddressableHeap"));
    }
    if variant != other_variant || into.domain() != from.domain() {
        return Err(HeapError::ClassCast.into());
    }

    let moved = from.len();
    into.meld(from)?;
    b.state = HeapState::Consumed(Arc::clone(&receiver));
    tracing::debug!(receiver = h1, donor = h2, %variant, moved, "melded heaps");
    Ok(())
}

/// Melds `h2` into `h1`.
///
/// # Errors
///
/// * `IllegalArgument` if `h1 == h2`, or if the heaps use different orderings
///   or error rates.
/// * `ClassCast` if the heaps differ in variant or key domain, or are not
///   mergeable.
/// * `IllegalState` if either heap was already melded away.
/// * `NullPointer` if either handle is `0` or unknown.
#[no_mangle]
pub extern "C" fn jheaps_maheap_meld(h1: u64, h2: u64) -> JheapsStatus {
    error::guard("jheaps_maheap_meld", || meld(h1, h2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressable::{
        jheaps_aheap_delete_min, jheaps_aheap_find_min, jheaps_aheap_insert_double,
        jheaps_aheap_insert_long,
    };
    use crate::comparator::JheapsComparator;
    use crate::element::{
        jheaps_element_decrease_key_long, jheaps_element_get_key_double,
        jheaps_element_get_key_long,
    };
    use crate::factory::{jheaps_heap_create_soft, jheaps_heap_create_with_comparator};
    use crate::handles::jheaps_handles_destroy;
    use crate::heap::{jheaps_heap_clear, jheaps_heap_is_empty, jheaps_heap_size};
    use crate::testing::{create, ok};
    use crate::variant::{HeapVariant, KeyDomain};
    use libc::c_int;
    use rstest::rstest;

    unsafe fn filled(variant: HeapVariant, keys: &[i64], handles: &mut Vec<u64>) -> u64 {
        let h = create(variant, KeyDomain::Long);
        for k in keys {
            let mut e = 0u64;
            ok(jheaps_aheap_insert_long(h, *k, &mut e));
            handles.push(e);
        }
        h
    }

    unsafe fn drain(h: u64, handles: &mut Vec<u64>) -> Vec<i64> {
        let mut out = Vec::new();
        let mut e = 0u64;
        while jheaps_aheap_delete_min(h, &mut e) == JheapsStatus::Success {
            let mut k = 0i64;
            ok(jheaps_element_get_key_long(e, &mut k));
            out.push(k);
            handles.push(e);
        }
        out
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
    #[case(HeapVariant::ReflectedFibonacci)]
    #[case(HeapVariant::ReflectedPairing)]
    fn test_meld_postconditions(#[case] variant: HeapVariant) {
        unsafe {
            let mut handles = Vec::new();
            let h1 = filled(variant, &[9, 2, 14, 6], &mut handles);
            let h2 = filled(variant, &[5, 1, 11], &mut handles);
            let donor_elements = handles[4..].to_vec();

            ok(jheaps_maheap_meld(h1, h2));

            let mut size = 0u64;
            ok(jheaps_heap_size(h1, &mut size));
            assert_eq!(size, 7);

            // The absorbed heap is unusable.
            assert_eq!(jheaps_heap_size(h2, &mut size), JheapsStatus::IllegalState);
            let mut empty = false;
            assert_eq!(jheaps_heap_is_empty(h2, &mut empty), JheapsStatus::IllegalState);
            assert_eq!(jheaps_heap_clear(h2), JheapsStatus::IllegalState);
            let mut e = 0u64;
            assert_eq!(jheaps_aheap_insert_long(h2, 3, &mut e), JheapsStatus::IllegalState);
            assert_eq!(jheaps_aheap_find_min(h2, &mut e), JheapsStatus::IllegalState);
            assert_eq!(jheaps_maheap_meld(h1, h2), JheapsStatus::IllegalState);
            assert_eq!(jheaps_maheap_meld(h2, h1), JheapsStatus::IllegalState);

            // Elements of the absorbed heap now live in the receiver.
            ok(jheaps_element_decrease_key_long(donor_elements[2], 0));

            let drained = drain(h1, &mut handles);
            assert_eq!(drained, vec![0, 1, 2, 5, 6, 9, 14]);

            handles.extend([h1, h2]);
            for handle in handles {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_meld_rejections() {
        unsafe {
            let a = create(HeapVariant::Pairing, KeyDomain::Long);
            let b = create(HeapVariant::Fibonacci, KeyDomain::Long);
            let c = create(HeapVariant::Pairing, KeyDomain::Double);
            let d = create(HeapVariant::BinaryArrayAddressable, KeyDomain::Long);
            let e = create(HeapVariant::BinaryArrayAddressable, KeyDomain::Long);

            assert_eq!(jheaps_maheap_meld(a, a), JheapsStatus::IllegalArgument);
            assert_eq!(jheaps_maheap_meld(a, b), JheapsStatus::ClassCast);
            assert_eq!(jheaps_maheap_meld(a, c), JheapsStatus::ClassCast);
            assert_eq!(jheaps_maheap_meld(d, e), JheapsStatus::ClassCast);
            assert_eq!(jheaps_maheap_meld(a, 0), JheapsStatus::NullPointer);

            let mut el = 0u64;
            ok(jheaps_aheap_insert_long(a, 1, &mut el));
            assert_eq!(jheaps_maheap_meld(a, el), JheapsStatus::ClassCast);

            for handle in [el, a, b, c, d, e] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    unsafe extern "C" fn descending(x: i64, y: i64) -> c_int {
        y.cmp(&x) as c_int
    }

    #[test]
    fn test_meld_requires_same_ordering() {
        unsafe {
            let natural = create(HeapVariant::Pairing, KeyDomain::Long);
            let mut custom = 0u64;
            let cmp: JheapsComparator = Some(descending);
            ok(jheaps_heap_create_with_comparator(
                HeapVariant::Pairing as c_int,
                cmp,
                &mut custom,
            ));
            assert_eq!(jheaps_maheap_meld(natural, custom), JheapsStatus::IllegalArgument);

            let mut other = 0u64;
            ok(jheaps_heap_create_with_comparator(
                HeapVariant::Pairing as c_int,
                cmp,
                &mut other,
            ));
            let mut e = 0u64;
            ok(jheaps_aheap_insert_long(other, 3, &mut e));
            ok(jheaps_maheap_meld(custom, other));

            let mut min = 0u64;
            ok(jheaps_aheap_find_min(custom, &mut min));
            let mut k = 0i64;
            ok(jheaps_element_get_key_long(min, &mut k));
            assert_eq!(k, 3);

            for handle in [min, e, natural, custom, other] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_soft_heaps_need_equal_error_rates() {
        unsafe {
            let soft = HeapVariant::BinaryTreeSoftAddressable as c_int;
            let double = KeyDomain::Double as c_int;
            let (mut a, mut b, mut c) = (0u64, 0u64, 0u64);
            ok(jheaps_heap_create_soft(soft, double, 0.5, &mut a));
            ok(jheaps_heap_create_soft(soft, double, 0.01, &mut b));
            ok(jheaps_heap_create_soft(soft, double, 0.5, &mut c));
            assert_eq!(jheaps_maheap_meld(a, b), JheapsStatus::IllegalArgument);

            let mut e = 0u64;
            ok(jheaps_aheap_insert_double(c, 2.5, &mut e));
            ok(jheaps_maheap_meld(a, c));
            let mut min = 0u64;
            ok(jheaps_aheap_find_min(a, &mut min));
            let mut key = 0.0;
            ok(jheaps_element_get_key_double(min, &mut key));
            assert_eq!(key, 2.5);

            for handle in [min, e, a, b, c] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_chained_melds_route_elements() {
        unsafe {
            let mut handles = Vec::new();
            let h1 = filled(HeapVariant::Pairing, &[10], &mut handles);
            let h2 = filled(HeapVariant::Pairing, &[20], &mut handles);
            let h3 = filled(HeapVariant::Pairing, &[30], &mut handles);
            ok(jheaps_maheap_meld(h2, h3));
            ok(jheaps_maheap_meld(h1, h2));
            ok(jheaps_handles_destroy(h3));

            ok(jheaps_element_decrease_key_long(handles[2], 1));
            let drained = drain(h1, &mut handles);
            assert_eq!(drained, vec![1, 10, 20]);

            ok(jheaps_handles_destroy(h1));
            let mut k = 0i64;
            assert_eq!(
                jheaps_element_get_key_long(handles[2], &mut k),
                JheapsStatus::IllegalState
            );
            handles.push(h2);
            for handle in handles {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }
}
