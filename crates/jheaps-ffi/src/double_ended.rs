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

//! # Double-Ended Heap Operations
//!
//! Maximum-side operations on heaps that store bare keys and implement
//! `DoubleEndedHeap`. The addressable double-ended heaps expose their
//! maximum side through `jheaps_deaheap_find_max` and
//! `jheaps_deaheap_delete_max` in the addressable module.
//!
//! ## Exported Functions
//!
//! * `jheaps_deheap_find_max_double` / `jheaps_deheap_find_max_long`
//! * `jheaps_deheap_delete_max_double` / `jheaps_deheap_delete_max_long`

use crate::error::{self, Fault};
use crate::handles::{out_param, with_keyed};
use crate::instance::DomainKey;
use crate::status::JheapsStatus;
use paste::paste;

unsafe fn find_max<K: DomainKey>(heap: u64, out: *mut K) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let key = with_keyed::<K, _, _>(heap, |_, h| h.find_max_key())?;
    out.as_ptr().write(key);
    Ok(())
}

unsafe fn delete_max<K: DomainKey>(heap: u64, out: *mut K) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let key = with_keyed::<K, _, _>(heap, |_, h| h.delete_max_key())?;
    out.as_ptr().write(key);
    Ok(())
}

macro_rules! double_ended_entry_points {
    ($($suffix:ident => $key:ty),* $(,)?) => {
        paste! {
            $(
                /// Writes a maximum key of a double-ended heap to `out`.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for one write.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_deheap_find_max_ $suffix>](
                    heap: u64,
                    out: *mut $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_deheap_find_max_ $suffix>]), || {
                        find_max::<$key>(heap, out)
                    })
                }

                /// Removes a maximum key of a double-ended heap and writes it to `out`.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for one write.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_deheap_delete_max_ $suffix>](
                    heap: u64,
                    out: *mut $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_deheap_delete_max_ $suffix>]), || {
                        delete_max::<$key>(heap, out)
                    })
                }
            )*
        }
    };
}

double_ended_entry_points!(double => f64, long => i64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::jheaps_handles_destroy;
    use crate::heap::{jheaps_heap_delete_min_double, jheaps_heap_insert_double, jheaps_heap_size};
    use crate::testing::{create, ok};
    use crate::variant::{HeapVariant, KeyDomain};

    #[test]
    fn test_both_ends() {
        unsafe {
            let h = create(HeapVariant::MinMaxBinaryArray, KeyDomain::Double);
            for k in [3.0, 9.5, -4.0, 0.0, 12.25] {
                ok(jheaps_heap_insert_double(h, k));
            }
            let mut key = 0.0;
            ok(jheaps_deheap_find_max_double(h, &mut key));
            assert_eq!(key, 12.25);
            ok(jheaps_deheap_delete_max_double(h, &mut key));
            assert_eq!(key, 12.25);
            ok(jheaps_deheap_delete_max_double(h, &mut key));
            assert_eq!(key, 9.5);
            ok(jheaps_heap_delete_min_double(h, &mut key));
            assert_eq!(key, -4.0);

            let mut size = 0u64;
            ok(jheaps_heap_size(h, &mut size));
            assert_eq!(size, 2);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_empty_and_wrong_kind() {
        unsafe {
            let h = create(HeapVariant::MinMaxBinaryArray, KeyDomain::Long);
            let mut key = 0i64;
            assert_eq!(jheaps_deheap_find_max_long(h, &mut key), JheapsStatus::NoSuchElement);
            assert_eq!(jheaps_deheap_delete_max_long(h, &mut key), JheapsStatus::NoSuchElement);
            let mut dkey = 0.0;
            assert_eq!(jheaps_deheap_find_max_double(h, &mut dkey), JheapsStatus::ClassCast);

            let plain = create(HeapVariant::BinaryArray, KeyDomain::Long);
            assert_eq!(jheaps_deheap_find_max_long(plain, &mut key), JheapsStatus::ClassCast);

            ok(jheaps_handles_destroy(h));
            ok(jheaps_handles_destroy(plain));
        }
    }
}
