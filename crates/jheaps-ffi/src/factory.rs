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

//! # Heap Construction
//!
//! Every heap starts here (or in the heapify module). A factory call either
//! writes a fresh heap handle to `out` or records a fault and leaves `out`
//! untouched.
//!
//! Variants are grouped by the parameters they need: plain variants take
//! none, d-ary variants a branching factor, the soft heap an error rate, and
//! radix heaps an inclusive key range. Asking one factory for a variant of
//! another group is `IllegalArgument`.
//!
//! Heaps built without a comparator use the natural order of their key
//! domain. The `_with_comparator` factories build `long` heaps ordered by a
//! host callback, which must stay callable until the heap is destroyed.
//!
//! ## Exported Functions
//!
//! * `jheaps_heap_create`
//! * `jheaps_heap_create_with_comparator`
//! * `jheaps_heap_create_dary`
//! * `jheaps_heap_create_dary_with_comparator`
//! * `jheaps_heap_create_soft`
//! * `jheaps_heap_create_soft_with_comparator`
//! * `jheaps_heap_create_monotone_double`
//! * `jheaps_heap_create_monotone_long`
//! * `jheaps_heap_create_monotone_long_with_comparator`

use crate::comparator::{JheapsComparator, LongOrder};
use crate::error::{self, Fault};
use crate::handles::out_param;
use crate::instance::{self, DomainKey, KeyedHeap};
use crate::registry::registry;
use crate::status::JheapsStatus;
use crate::variant::{HeapVariant, KeyDomain, Shape};
use libc::c_int;
use std::ptr::NonNull;

/// Registers `heap` and writes its handle to `out`.
pub(crate) unsafe fn publish<K: DomainKey>(
    out: NonNull<u64>,
    variant: HeapVariant,
    heap: KeyedHeap<K>,
) -> Result<(), Fault> {
    let handle = registry().issue_heap(variant, K::erase(heap));
    out.as_ptr().write(handle);
    Ok(())
}

/// Converts a branching factor received over the ABI.
pub(crate) fn arity(d: c_int) -> Result<usize, Fault> {
    usize::try_from(d).map_err(|_| {
        Fault::invalid(format!(
            "d-ary heaps must have at least 2 children per node, got {}",
            d
        ))
    })
}

/// Creates an empty heap of a variant that takes no shape parameters.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` or `domain` is unknown, or if the variant
///   needs shape parameters.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create(
    variant: c_int,
    domain: c_int,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        match KeyDomain::try_from(domain)? {
            KeyDomain::Double => {
                publish(out, variant, instance::plain::<f64>(variant, f64::natural_order())?)
            }
            KeyDomain::Long => {
                publish(out, variant, instance::plain::<i64>(variant, i64::natural_order())?)
            }
        }
    })
}

/// Creates an empty `long` heap ordered by `comparator`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` is unknown or needs shape parameters, or
///   if `comparator` is null.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`. `comparator` must
/// remain callable for the lifetime of the heap.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_with_comparator(
    variant: c_int,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_with_comparator", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        let order = LongOrder::from_callback(comparator)?;
        publish(out, variant, instance::plain::<i64>(variant, order)?)
    })
}

/// Creates an empty d-ary heap with branching factor `d`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` or `domain` is unknown, if the variant is
///   not d-ary, or if `d < 2`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_dary(
    variant: c_int,
    domain: c_int,
    d: c_int,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_dary", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        let d = arity(d)?;
        match KeyDomain::try_from(domain)? {
            KeyDomain::Double => {
                publish(out, variant, instance::dary::<f64>(variant, d, f64::natural_order())?)
            }
            KeyDomain::Long => {
                publish(out, variant, instance::dary::<i64>(variant, d, i64::natural_order())?)
            }
        }
    })
}

/// Creates an empty d-ary `long` heap ordered by `comparator`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` is unknown or not d-ary, if `d < 2`, or if
///   `comparator` is null.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`. `comparator` must
/// remain callable for the lifetime of the heap.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_dary_with_comparator(
    variant: c_int,
    d: c_int,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_dary_with_comparator", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        let d = arity(d)?;
        let order = LongOrder::from_callback(comparator)?;
        publish(out, variant, instance::dary::<i64>(variant, d, order)?)
    })
}

/// Creates an empty soft heap with the given error rate in `(0, 1]`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` or `domain` is unknown, if the variant is
///   not a soft heap, or if `error_rate` is out of range.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_soft(
    variant: c_int,
    domain: c_int,
    error_rate: f64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_soft", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        match KeyDomain::try_from(domain)? {
            KeyDomain::Double => publish(
                out,
                variant,
                instance::soft::<f64>(variant, error_rate, f64::natural_order())?,
            ),
            KeyDomain::Long => publish(
                out,
                variant,
                instance::soft::<i64>(variant, error_rate, i64::natural_order())?,
            ),
        }
    })
}

/// Creates an empty soft `long` heap ordered by `comparator`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`. `comparator` must
/// remain callable for the lifetime of the heap.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_soft_with_comparator(
    variant: c_int,
    error_rate: f64,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_soft_with_comparator", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        let order = LongOrder::from_callback(comparator)?;
        publish(out, variant, instance::soft::<i64>(variant, error_rate, order)?)
    })
}

/// Creates an empty radix heap over `double` keys in `[min, max]`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` is unknown or not a `double` radix heap,
///   or if the bounds are not finite or `min > max`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_monotone_double(
    variant: c_int,
    min: f64,
    max: f64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_monotone_double", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        publish(out, variant, instance::monotone::<f64>(variant, min, max)?)
    })
}

/// Creates an empty radix heap over `long` keys in `[min, max]`.
///
/// # Errors
///
/// * `NullPointer` if `out` is null.
/// * `IllegalArgument` if `variant` is unknown or not a `long` radix heap, or
///   if `min > max`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_monotone_long(
    variant: c_int,
    min: i64,
    max: i64,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_monotone_long", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        publish(out, variant, instance::monotone::<i64>(variant, min, max)?)
    })
}

/// Radix heaps bucket keys by their binary representation and cannot follow
/// a host ordering. This entry point validates its arguments like its
/// siblings and then reports `UnsupportedOperation`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_create_monotone_long_with_comparator(
    variant: c_int,
    min: i64,
    max: i64,
    comparator: JheapsComparator,
    out: *mut u64,
) -> JheapsStatus {
    error::guard("jheaps_heap_create_monotone_long_with_comparator", || {
        out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        LongOrder::from_callback(comparator)?;
        if variant.shape() != Shape::Monotone {
            // Reuse the factory's own shape and domain checks.
            instance::monotone::<i64>(variant, min, max)?;
        }
        Err(Fault::unsupported(format!(
            "{} orders keys by their binary representation and does not accept a comparator",
            variant
        )))
    })
}
