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

//! # Heapify
//!
//! Builds a heap from a host-owned key array in linear time. The arrays are
//! copied; the host may release them once the call returns.
//!
//! `values` is optional. When non-null it must hold `n` entries and the
//! variant must be addressable; element `i` then carries `values[i]`.
//! Without values every element carries `0`.
//!
//! Only the array-backed variants can be heapified: the binary and d-ary
//! array heaps, both weak heaps, the addressable array heaps and the min-max
//! heap.
//!
//! ## Exported Functions
//!
//! * `jheaps_heapify_double_keys`
//! * `jheaps_heapify_long_keys`
//! * `jheaps_heapify_long_keys_with_comparator`
//! * `jheaps_heapify_dary_double_keys`
//! * `jheaps_heapify_dary_long_keys`
//! * `jheaps_heapify_dary_long_keys_with_comparator`

use crate::comparator::{JheapsComparator, LongOrder};
use crate::error::{self, Fault};
use crate::factory::{arity, publish};
use crate::handles::out_param;
use crate::instance::{self, DomainKey};
use crate::status::JheapsStatus;
use crate::variant::HeapVariant;
use libc::c_int;
use std::slice;

/// Largest array length accepted over the ABI.
const MAX_ELEMENTS: i64 = (isize::MAX / 8) as i64;

/// Borrows the host's key and value arrays.
unsafe fn arrays<'a, K>(
    keys: *const K,
    values: *const i64,
    n: i64,
) -> Result<(&'a [K], Option<&'a [i64]>), Fault> {
    if n <= 0 {
        return Err(Fault::invalid(format!(
            "heapify needs at least one element, got {}",
            n
        )));
    }
    if n > MAX_ELEMENTS {
        return Err(Fault::TooManyElements {
            requested: n,
            max: MAX_ELEMENTS,
        });
    }
    if keys.is_null() {
        return Err(Fault::NullArgument("keys"));
    }
    let len = n as usize;
    let values = if values.is_null() {
        None
    } else {
        Some(slice::from_raw_parts(values, len))
    };
    Ok((slice::from_raw_parts(keys, len), values))
}

unsafe fn build<K: DomainKey>(
    variant: c_int,
    d: Option<c_int>,
    order: impl FnOnce() -> Result<K::Order, Fault>,
    keys: *const K,
    values: *const i64,
    n: i64,
    out: *mut u64,
) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let variant = HeapVariant::try_from(variant)?;
    let d = d.map(arity).transpose()?;
    let order = order()?;
    let (keys, values) = arrays(keys, values, n)?;
    let heap = instance::heapify::<K>(variant, d, order, keys, values)?;
    tracing::debug!(%variant, n, "heapified");
    publish(out, variant, heap)
}

/// Builds a `double` heap from `n` keys (and optional values).
///
/// # Errors
///
/// * `NullPointer` if `out` or `keys` is null.
/// * `IllegalArgument` if `n <= 0`, if the variant cannot be heapified, or if
///   values are given for a variant that does not store them.
/// * `IndexOutOfBounds` if `n` is too large to allocate.
///
/// # Safety
///
/// `keys` must be valid for `n` reads, `values` null or valid for `n` reads,
/// and `out` null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_double_keys(
    variant: c_int,
    keys: *const f64,
    values: *const i64,
    n: i64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_double_keys", || {
        build::<f64>(variant, None, || Ok(f64::natural_order()), keys, values, n, out)
    })
}

/// Builds a `long` heap from `n` keys (and optional values).
///
/// # Safety
///
/// As for [`jheaps_heapify_double_keys`].
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_long_keys(
    variant: c_int,
    keys: *const i64,
    values: *const i64,
    n: i64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_long_keys", || {
        build::<i64>(variant, None, || Ok(i64::natural_order()), keys, values, n, out)
    })
}

/// Builds a `long` heap ordered by `comparator` from `n` keys.
///
/// # Safety
///
/// As for [`jheaps_heapify_double_keys`]; `comparator` must stay callable
/// until the heap is destroyed.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_long_keys_with_comparator(
    variant: c_int,
    keys: *const i64,
    values: *const i64,
    n: i64,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_long_keys_with_comparator", || {
        build::<i64>(
            variant,
            None,
            || LongOrder::from_callback(comparator),
            keys,
            values,
            n,
            out,
        )
    })
}

/// Builds a d-ary `double` heap from `n` keys.
///
/// # Safety
///
/// As for [`jheaps_heapify_double_keys`].
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_dary_double_keys(
    variant: c_int,
    d: c_int,
    keys: *const f64,
    values: *const i64,
    n: i64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_dary_double_keys", || {
        build::<f64>(variant, Some(d), || Ok(f64::natural_order()), keys, values, n, out)
    })
}

/// Builds a d-ary `long` heap from `n` keys.
///
/// # Safety
///
/// As for [`jheaps_heapify_double_keys`].
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_dary_long_keys(
    variant: c_int,
    d: c_int,
    keys: *const i64,
    values: *const i64,
    n: i64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_dary_long_keys", || {
        build::<i64>(variant, Some(d), || Ok(i64::natural_order()), keys, values, n, out)
    })
}

/// Builds a d-ary `long` heap ordered by `comparator` from `n` keys.
///
/// # Safety
///
/// As for [`jheaps_heapify_long_keys_with_comparator`].
#[no_mangle]
pub unsafe extern "C" fn jheaps_heapify_dary_long_keys_with_comparator(
    variant: c_int,
    d: c_int,
    keys: *const i64,
    values: *const i64,
    n: i64,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heapify_dary_long_keys_with_comparator", || {
        build::<i64>(
            variant,
            Some(d),
            || LongOrder::from_callback(comparator),
            keys,
            values,
            n,
            out,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressable::jheaps_aheap_delete_min;
    use crate::double_ended::jheaps_deheap_find_max_long;
    use crate::element::{jheaps_element_get_key_long, jheaps_element_get_value};
    use crate::handles::jheaps_handles_destroy;
    use crate::heap::{jheaps_heap_delete_min_double, jheaps_heap_delete_min_long, jheaps_heap_size};
    use crate::testing::ok;
    use rstest::rstest;
    use std::ptr;

    unsafe fn drain_long(h: u64) -> Vec<i64> {
        let mut out = Vec::new();
        let mut key = 0i64;
        while jheaps_heap_delete_min_long(h, &mut key) == JheapsStatus::Success {
            out.push(key);
        }
        out
    }

    #[rstest]
    #[case(HeapVariant::BinaryArray)]
    #[case(HeapVariant::BinaryArrayWeak)]
    #[case(HeapVariant::BinaryArrayBulkInsertWeak)]
    #[case(HeapVariant::MinMaxBinaryArray)]
    fn test_heapify_bare_keys(#[case] variant: HeapVariant) {
        let keys = [12i64, -3, 7, 7, 0, 99, -41, 5];
        unsafe {
            let mut h = 0u64;
            ok(jheaps_heapify_long_keys(
                variant as c_int,
                keys.as_ptr(),
                ptr::null(),
                keys.len() as i64,
                &mut h,
            ));
            let mut expected = keys.to_vec();
            expected.sort_unstable();
            assert_eq!(drain_long(h), expected);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_heapify_dary_doubles() {
        let keys = [2.5, -0.5, 9.0, 1.25, 3.0, -7.75];
        unsafe {
            let mut h = 0u64;
            ok(jheaps_heapify_dary_double_keys(
                HeapVariant::DaryArray as c_int,
                4,
                keys.as_ptr(),
                ptr::null(),
                keys.len() as i64,
                &mut h,
            ));
            let mut drained = Vec::new();
            let mut key = 0.0;
            while jheaps_heap_delete_min_double(h, &mut key) == JheapsStatus::Success {
                drained.push(key);
            }
            assert_eq!(drained, vec![-7.75, -0.5, 1.25, 2.5, 3.0, 9.0]);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[rstest]
    #[case(HeapVariant::BinaryArrayAddressable, None)]
    #[case(HeapVariant::DaryArrayAddressable, Some(3))]
    fn test_heapify_with_values(#[case] variant: HeapVariant, #[case] d: Option<c_int>) {
        let keys = [40i64, 10, 30, 20];
        let values = [4i64, 1, 3, 2];
        unsafe {
            let mut h = 0u64;
            let status = match d {
                Some(d) => jheaps_heapify_dary_long_keys(
                    variant as c_int,
                    d,
                    keys.as_ptr(),
                    values.as_ptr(),
                    4,
                    &mut h,
                ),
                None => jheaps_heapify_long_keys(
                    variant as c_int,
                    keys.as_ptr(),
                    values.as_ptr(),
                    4,
                    &mut h,
                ),
            };
            ok(status);

            let mut seen = Vec::new();
            let mut e = 0u64;
            while jheaps_aheap_delete_min(h, &mut e) == JheapsStatus::Success {
                let (mut key, mut value) = (0i64, 0i64);
                ok(jheaps_element_get_key_long(e, &mut key));
                ok(jheaps_element_get_value(e, &mut value));
                seen.push((key, value));
                ok(jheaps_handles_destroy(e));
            }
            assert_eq!(seen, vec![(10, 1), (20, 2), (30, 3), (40, 4)]);
            ok(jheaps_handles_destroy(h));
        }
    }

    #[test]
    fn test_heapify_rejections() {
        let keys = [1i64, 2, 3];
        let values = [0i64; 3];
        unsafe {
            let mut h = 0u64;
            let binary = HeapVariant::BinaryArray as c_int;
            assert_eq!(
                jheaps_heapify_long_keys(binary, keys.as_ptr(), ptr::null(), 3, ptr::null_mut()),
                JheapsStatus::NullPointer
            );
            assert_eq!(
                jheaps_heapify_long_keys(binary, ptr::null(), ptr::null(), 3, &mut h),
                JheapsStatus::NullPointer
            );
            assert_eq!(
                jheaps_heapify_long_keys(binary, keys.as_ptr(), ptr::null(), 0, &mut h),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(
                jheaps_heapify_long_keys(binary, keys.as_ptr(), ptr::null(), -2, &mut h),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(
                jheaps_heapify_long_keys(binary, keys.as_ptr(), ptr::null(), i64::MAX, &mut h),
                JheapsStatus::IndexOutOfBounds
            );
            // Values on a heap that does not store them.
            assert_eq!(
                jheaps_heapify_long_keys(binary, keys.as_ptr(), values.as_ptr(), 3, &mut h),
                JheapsStatus::IllegalArgument
            );
            // Tree-backed heaps are not heapifiable.
            assert_eq!(
                jheaps_heapify_long_keys(
                    HeapVariant::Pairing as c_int,
                    keys.as_ptr(),
                    ptr::null(),
                    3,
                    &mut h
                ),
                JheapsStatus::IllegalArgument
            );
            // Binary variants reject the d-ary entry point and vice versa.
            assert_eq!(
                jheaps_heapify_dary_long_keys(binary, 3, keys.as_ptr(), ptr::null(), 3, &mut h),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(
                jheaps_heapify_long_keys(
                    HeapVariant::DaryArray as c_int,
                    keys.as_ptr(),
                    ptr::null(),
                    3,
                    &mut h
                ),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(
                jheaps_heapify_dary_long_keys(
                    HeapVariant::DaryArray as c_int,
                    1,
                    keys.as_ptr(),
                    ptr::null(),
                    3,
                    &mut h
                ),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(h, 0);
        }
    }

    unsafe extern "C" fn descending(x: i64, y: i64) -> c_int {
        y.cmp(&x) as c_int
    }

    #[test]
    fn test_heapify_with_comparator() {
        let keys = [3i64, 8, -1, 5];
        unsafe {
            let mut h = 0u64;
            ok(jheaps_heapify_long_keys_with_comparator(
                HeapVariant::MinMaxBinaryArray as c_int,
                keys.as_ptr(),
                ptr::null(),
                4,
                Some(descending),
                &mut h,
            ));
            // Under the reversed order the "maximum" is the smallest key.
            let mut key = 0i64;
            ok(jheaps_deheap_find_max_long(h, &mut key));
            assert_eq!(key, -1);
            assert_eq!(drain_long(h), vec![8, 5, 3, -1]);
            ok(jheaps_handles_destroy(h));

            let mut d = 0u64;
            ok(jheaps_heapify_dary_long_keys_with_comparator(
                HeapVariant::DaryArray as c_int,
                3,
                keys.as_ptr(),
                ptr::null(),
                4,
                Some(descending),
                &mut d,
            ));
            let mut size = 0u64;
            ok(jheaps_heap_size(d, &mut size));
            assert_eq!(size, 4);
            assert_eq!(drain_long(d), vec![8, 5, 3, -1]);
            ok(jheaps_handles_destroy(d));

            let mut none = 0u64;
            assert_eq!(
                jheaps_heapify_long_keys_with_comparator(
                    HeapVariant::BinaryArray as c_int,
                    keys.as_ptr(),
                    ptr::null(),
                    4,
                    None,
                    &mut none,
                ),
                JheapsStatus::IllegalArgument
            );
            assert_eq!(none, 0);
        }
    }
}
