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

//! # Addressable Heap Operations
//!
//! Insertion into addressable heaps issues an element handle; so does every
//! access to an extreme element. Each `find_*`/`delete_*` call issues a new
//! handle, and all handles obtained for one element alias it: a key change
//! through one is visible through the others. Every issued handle must be
//! destroyed with `jheaps_handles_destroy`.
//!
//! ## Exported Functions
//!
//! ### Addressable heaps
//! * `jheaps_aheap_insert_double` / `jheaps_aheap_insert_long`
//! * `jheaps_aheap_insert_key_value_double` / `jheaps_aheap_insert_key_value_long`
//! * `jheaps_aheap_find_min`
//! * `jheaps_aheap_delete_min`
//!
//! ### Double-ended addressable heaps
//! * `jheaps_deaheap_find_max`
//! * `jheaps_deaheap_delete_max`

use crate::error::{self, Fault};
use crate::handles::{out_param, with_heap, with_keyed};
use crate::instance::{AnyHeap, DomainKey, KeyedHeap};
use crate::registry::{registry, HeapCell};
use crate::status::JheapsStatus;
use paste::paste;
use std::sync::Arc;

/// Which extreme element an access targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extreme {
    FindMin,
    DeleteMin,
    FindMax,
    DeleteMax,
}

fn extreme_in<K: DomainKey>(
    cell: &Arc<HeapCell>,
    heap: &mut KeyedHeap<K>,
    which: Extreme,
) -> Result<u64, Fault> {
    let element = match which {
        Extreme::FindMin => heap.find_min_element()?,
        Extreme::DeleteMin => heap.delete_min_element()?,
        Extreme::FindMax => heap.find_max_element()?,
        Extreme::DeleteMax => heap.delete_max_element()?,
    };
    Ok(registry().issue_element(cell, element))
}

unsafe fn extreme(heap: u64, out: *mut u64, which: Extreme) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let handle = with_heap(heap, |cell, slot| match slot.live_mut()? {
        AnyHeap::Double(h) => extreme_in(cell, h, which),
        AnyHeap::Long(h) => extreme_in(cell, h, which),
    })?;
    out.as_ptr().write(handle);
    Ok(())
}

unsafe fn insert<K: DomainKey>(heap: u64, key: K, value: i64, out: *mut u64) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let handle = with_keyed::<K, _, _>(heap, |cell, h| {
        let element = h.insert_element(key, value)?;
        Ok(registry().issue_element(cell, element))
    })?;
    out.as_ptr().write(handle);
    Ok(())
}

macro_rules! addressable_entry_points {
    ($($suffix:ident => $key:ty),* $(,)?) => {
        paste! {
            $(
                /// Inserts `key` with value `0` and writes the element handle to `out`.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for a write of one `u64`.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_aheap_insert_ $suffix>](
                    heap: u64,
                    key: $key,
                    out: *mut u64,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_aheap_insert_ $suffix>]), || {
                        insert::<$key>(heap, key, 0, out)
                    })
                }

                /// Inserts `key` with `value` and writes the element handle to `out`.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for a write of one `u64`.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_aheap_insert_key_value_ $suffix>](
                    heap: u64,
                    key: $key,
                    value: i64,
                    out: *mut u64,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_aheap_insert_key_value_ $suffix>]), || {
                        insert::<$key>(heap, key, value, out)
                    })
                }
            )*
        }
    };
}

addressable_entry_points!(double => f64, long => i64);

/// Writes a handle to a minimum element to `out`. The element stays in the heap.
///
/// # Errors
///
/// * `NoSuchElement` if the heap is empty.
/// * `ClassCast` if the heap is not addressable.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_aheap_find_min(heap: u64, out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_aheap_find_min", || extreme(heap, out, Extreme::FindMin))
}

/// Removes a minimum element and writes a handle to it to `out`.
///
/// The handle keeps the element's key and value readable.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_aheap_delete_min(heap: u64, out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_aheap_delete_min", || extreme(heap, out, Extreme::DeleteMin))
}

/// Writes a handle to a maximum element of a double-ended addressable heap to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_deaheap_find_max(heap: u64, out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_deaheap_find_max", || extreme(heap, out, Extreme::FindMax))
}

/// Removes a maximum element of a double-ended addressable heap and writes a
/// handle to it to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_deaheap_delete_max(heap: u64, out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_deaheap_delete_max", || extreme(heap, out, Extreme::DeleteMax))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{
        jheaps_element_decrease_key_long, jheaps_element_get_key_double,
        jheaps_element_get_key_long, jheaps_element_get_value,
    };
    use crate::handles::jheaps_handles_destroy;
    use crate::heap::jheaps_heap_size;
    use crate::testing::{create, ok};
    use crate::variant::{HeapVariant, KeyDomain};
    use rstest::rstest;

    unsafe fn key_of(element: u64) -> i64 {
        let mut key = 0i64;
        ok(jheaps_element_get_key_long(element, &mut key));
        key
    }

    #[test]
    fn test_pairing_scenario() {
        unsafe {
            let h = create(HeapVariant::Pairing, KeyDomain::Long);
            let mut e5 = 0u64;
            let mut e1 = 0u64;
            let mut e3 = 0u64;
            ok(jheaps_aheap_insert_key_value_long(h, 5, 0, &mut e5));
            ok(jheaps_aheap_insert_key_value_long(h, 1, 0, &mut e1));
            ok(jheaps_aheap_insert_key_value_long(h, 3, 0, &mut e3));

            let mut min = 0u64;
            ok(jheaps_aheap_find_min(h, &mut min));
            assert_eq!(key_of(min), 1);

            let mut removed = 0u64;
            ok(jheaps_aheap_delete_min(h, &mut removed));
            assert_eq!(key_of(removed), 1);
            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 2);

            ok(jheaps_element_decrease_key_long(e5, 0));
            let mut min2 = 0u64;
            ok(jheaps_aheap_find_min(h, &mut min2));
            assert_eq!(key_of(min2), 0);

            for handle in [min2, removed, min, e3, e1, e5, h] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_find_min_issues_aliasing_handles() {
        unsafe {
            let h = create(HeapVariant::Fibonacci, KeyDomain::Long);
            let mut e = 0u64;
            ok(jheaps_aheap_insert_key_value_long(h, 10, 77, &mut e));
            let mut a = 0u64;
            let mut b = 0u64;
            ok(jheaps_aheap_find_min(h, &mut a));
            ok(jheaps_aheap_find_min(h, &mut b));
            assert_ne!(a, b);
            assert_ne!(a, e);

            ok(jheaps_element_decrease_key_long(a, 4));
            assert_eq!(key_of(b), 4);
            assert_eq!(key_of(e), 4);
            let mut value = 0i64;
            ok(jheaps_element_get_value(b, &mut value));
            assert_eq!(value, 77);

            for handle in [a, b, e, h] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[rstest]
    #[case(HeapVariant::ReflectedFibonacci)]
    #[case(HeapVariant::ReflectedPairing)]
    fn test_double_ended_addressable(#[case] variant: HeapVariant) {
        unsafe {
            let h = create(variant, KeyDomain::Double);
            let mut handles = Vec::new();
            for k in [4.0, -2.0, 8.5, 1.0] {
                let mut e = 0u64;
                ok(jheaps_aheap_insert_double(h, k, &mut e));
                handles.push(e);
            }
            let mut max = 0u64;
            ok(jheaps_deaheap_find_max(h, &mut max));
            let mut key = 0.0;
            ok(jheaps_element_get_key_double(max, &mut key));
            assert_eq!(key, 8.5);

            let mut removed = 0u64;
            ok(jheaps_deaheap_delete_max(h, &mut removed));
            ok(jheaps_element_get_key_double(removed, &mut key));
            assert_eq!(key, 8.5);
            ok(jheaps_deaheap_delete_max(h, &mut removed));
            ok(jheaps_element_get_key_double(removed, &mut key));
            assert_eq!(key, 4.0);

            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 2);
            handles.extend([max, removed, h]);
            for handle in handles {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_wrong_capability_and_empty() {
        unsafe {
            let h = create(HeapVariant::Pairing, KeyDomain::Long);
            let mut out = 0u64;
            assert_eq!(jheaps_aheap_find_min(h, &mut out), JheapsStatus::NoSuchElement);
            assert_eq!(jheaps_aheap_delete_min(h, &mut out), JheapsStatus::NoSuchElement);
            assert_eq!(jheaps_deaheap_find_max(h, &mut out), JheapsStatus::ClassCast);
            assert_eq!(jheaps_aheap_insert_double(h, 1.0, &mut out), JheapsStatus::ClassCast);

            let plain = create(HeapVariant::BinaryArray, KeyDomain::Long);
            assert_eq!(jheaps_aheap_insert_long(plain, 1, &mut out), JheapsStatus::ClassCast);
            assert_eq!(jheaps_aheap_find_min(plain, &mut out), JheapsStatus::ClassCast);
            assert_eq!(
                jheaps_aheap_insert_long(h, 1, std::ptr::null_mut()),
                JheapsStatus::NullPointer
            );

            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 0);
            ok(jheaps_handles_destroy(plain));
            ok(jheaps_handles_destroy(h));
        }
    }
}
