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

//! # Heap Operations
//!
//! Key-level operations on heaps that store bare keys (`Heap` and
//! `DoubleEndedHeap` variants). The size, emptiness and clear entry points
//! accept every kind of heap.
//!
//! Each key operation exists once per key domain, suffixed `_double` or
//! `_long`. Calling it on a heap of the other domain, or on an addressable
//! heap, is `ClassCast`.
//!
//! ## Exported Functions
//!
//! * `jheaps_heap_insert_double` / `jheaps_heap_insert_long`
//! * `jheaps_heap_find_min_double` / `jheaps_heap_find_min_long`
//! * `jheaps_heap_delete_min_double` / `jheaps_heap_delete_min_long`
//! * `jheaps_heap_size`
//! * `jheaps_heap_is_empty`
//! * `jheaps_heap_clear`

use crate::error::{self, Fault};
use crate::handles::{out_param, with_heap, with_keyed};
use crate::instance::DomainKey;
use crate::status::JheapsStatus;
use paste::paste;

fn insert<K: DomainKey>(heap: u64, key: K) -> Result<(), Fault> {
    with_keyed::<K, _, _>(heap, |_, h| h.insert_key(key))
}

unsafe fn find_min<K: DomainKey>(heap: u64, out: *mut K) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let key = with_keyed::<K, _, _>(heap, |_, h| h.find_min_key())?;
    out.as_ptr().write(key);
    Ok(())
}

unsafe fn delete_min<K: DomainKey>(heap: u64, out: *mut K) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let key = with_keyed::<K, _, _>(heap, |_, h| h.delete_min_key())?;
    out.as_ptr().write(key);
    Ok(())
}

macro_rules! heap_entry_points {
    ($($suffix:ident => $key:ty),* $(,)?) => {
        paste! {
            $(
                /// Inserts `key` into a heap.
                #[no_mangle]
                pub extern "C" fn [<jheaps_heap_insert_ $suffix>](heap: u64, key: $key) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_heap_insert_ $suffix>]), || {
                        insert::<$key>(heap, key)
                    })
                }

                /// Writes a minimum key of a heap to `out`.
                ///
                /// # Errors
                ///
                /// * `NoSuchElement` if the heap is empty.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for one write.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_heap_find_min_ $suffix>](
                    heap: u64,
                    out: *mut $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_heap_find_min_ $suffix>]), || {
                        find_min::<$key>(heap, out)
                    })
                }

                /// Removes a minimum key of a heap and writes it to `out`.
                ///
                /// # Errors
                ///
                /// * `NoSuchElement` if the heap is empty.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for one write.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_heap_delete_min_ $suffix>](
                    heap: u64,
                    out: *mut $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_heap_delete_min_ $suffix>]), || {
                        delete_min::<$key>(heap, out)
                    })
                }
            )*
        }
    };
}

heap_entry_points!(double => f64, long => i64);

/// Writes the number of elements of any heap to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_size(heap: u64, out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_heap_size", || {
        let out = out_param(out, "out")?;
        let len = with_heap(heap, |_, slot| Ok(slot.live_mut()?.len()))?;
        out.as_ptr().write(len as u64);
        Ok(())
    })
}

/// Writes whether any heap is empty to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `bool`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_is_empty(heap: u64, out: *mut bool) -> JheapsStatus {
    error::guard("jheaps_heap_is_empty", || {
        let out = out_param(out, "out")?;
        let empty = with_heap(heap, |_, slot| Ok(slot.live_mut()?.is_empty()))?;
        out.as_ptr().write(empty);
        Ok(())
    })
}

/// Removes every element of any heap.
///
/// Element handles of removed elements stay registered and readable.
#[no_mangle]
pub extern "C" fn jheaps_heap_clear(heap: u64) -> JheapsStatus {
    error::guard("jheaps_heap_clear", || {
        with_heap(heap, |_, slot| {
            slot.live_mut()?.clear();
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressable::jheaps_aheap_insert_long;
    use crate::handles::jheaps_handles_destroy;
    use crate::testing::{create, ok};
    use crate::variant::{HeapVariant, KeyDomain};
    use proptest::prelude::*;

    #[test]
    fn test_insert_find_delete() {
        unsafe {
            let h = create(HeapVariant::BinaryArray, KeyDomain::Double);
            for k in [2.5, -1.0, 7.0] {
                ok(jheaps_heap_insert_double(h, k));
            }
            let mut key = 0.0;
            ok(jheaps_heap_find_min_double(h, &mut key));
            assert_eq!(key, -1.0);
            ok(jheaps_heap_delete_min_double(h, &mut key));
            assert_eq!(key, -1.0);

            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 2);

            ok(jheaps_heap_clear(h));
            let mut empty = false;
            ok(jheaps_heap_is_empty(h, &mut empty));
            assert!(empty);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_empty_heap_faults_leave_size() {
        unsafe {
            let h = create(HeapVariant::BinaryArrayWeak, KeyDomain::Long);
            let mut key = 123i64;
            assert_eq!(jheaps_heap_find_min_long(h, &mut key), JheapsStatus::NoSuchElement);
            assert_eq!(jheaps_heap_delete_min_long(h, &mut key), JheapsStatus::NoSuchElement);
            assert_eq!(key, 123);
            let mut size = 9u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 0);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_null_out_does_not_mutate() {
        unsafe {
            let h = create(HeapVariant::BinaryArray, KeyDomain::Long);
            ok(jheaps_heap_insert_long(h, 3));
            assert_eq!(
                jheaps_heap_delete_min_long(h, std::ptr::null_mut()),
                JheapsStatus::NullPointer
            );
            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 1);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_class_casts() {
        unsafe {
            let h = create(HeapVariant::BinaryArray, KeyDomain::Long);
            assert_eq!(jheaps_heap_insert_double(h, 1.0), JheapsStatus::ClassCast);

            let a = create(HeapVariant::Pairing, KeyDomain::Long);
            assert_eq!(jheaps_heap_insert_long(a, 1), JheapsStatus::ClassCast);

            let mut e = 0u64;
            ok(jheaps_aheap_insert_long(a, 1, &mut e));
            assert_eq!(jheaps_heap_insert_long(e, 1), JheapsStatus::ClassCast);
            let mut size = 0u64;
            assert_eq!(jheaps_heap_size(e, &mut size), JheapsStatus::ClassCast);

            // Size, emptiness and clear accept addressable heaps too.
            ok(jheaps_heap_size(a, &mut size));
            assert_eq!(size, 1);

            for handle in [e, a, h] {
                ok(jheaps_handles_destroy(handle));
            }
        }
    }

    #[test]
    fn test_null_and_unknown_handles() {
        assert_eq!(jheaps_heap_insert_long(0, 1), JheapsStatus::NullPointer);
        assert_eq!(jheaps_heap_clear(u64::MAX), JheapsStatus::NullPointer);
    }

    #[test]
    fn test_radix_rejects_out_of_range_keys() {
        unsafe {
            let mut h = 0u64;
            ok(crate::factory::jheaps_heap_create_monotone_long(
                HeapVariant::LongRadix as libc::c_int,
                0,
                100,
                &mut h,
            ));
            ok(jheaps_heap_insert_long(h, 50));
            assert_eq!(jheaps_heap_insert_long(h, 101), JheapsStatus::IllegalArgument);
            let mut key = 0i64;
            ok(jheaps_heap_delete_min_long(h, &mut key));
            assert_eq!(key, 50);
            // Monotone: nothing below the last extracted minimum.
            assert_eq!(jheaps_heap_insert_long(h, 49), JheapsStatus::IllegalArgument);
            ok(jheaps_heap_insert_long(h, 50));
            ok(jheaps_handles_destroy(h));
        }
    }

    proptest! {
        #[test]
        fn prop_delete_min_is_sorted(keys in proptest::collection::vec(any::<i64>(), 0..150)) {
            for variant in [
                HeapVariant::BinaryArray,
                HeapVariant::BinaryArrayWeak,
                HeapVariant::BinaryArrayBulkInsertWeak,
                HeapVariant::MinMaxBinaryArray,
            ] {
                unsafe {
                    let h = create(variant, KeyDomain::Long);
                    for k in &keys {
                        ok(jheaps_heap_insert_long(h, *k));
                    }
                    let mut drained = Vec::with_capacity(keys.len());
                    let mut key = 0i64;
                    while jheaps_heap_delete_min_long(h, &mut key) == JheapsStatus::Success {
                        drained.push(key);
                    }
                    prop_assert_eq!(crate::testing::last_message(), "Error (NoSuchElementException)");
                    let mut expected = keys.clone();
                    expected.sort_unstable();
                    prop_assert_eq!(drained, expected);
                    ok(jheaps_handles_destroy(h));
                }
            }
        }
    }
}
