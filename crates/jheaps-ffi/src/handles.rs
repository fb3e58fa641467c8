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

//! # Handle Lifecycle and Introspection
//!
//! Handles are released explicitly. Destroying a heap handle drops the heap
//! but leaves the handles of its elements registered; they report
//! `IllegalState` until they are destroyed as well. Destroying an element
//! handle never affects the heap.
//!
//! ## Exported Functions
//!
//! * `jheaps_handles_destroy`
//! * `jheaps_handles_live_count`
//! * `jheaps_heap_get_variant`
//! * `jheaps_heap_get_key_domain`

use crate::error::{self, Fault};
use crate::instance::{DomainKey, KeyedHeap};
use crate::registry::{registry, Entry, HeapCell, HeapSlot, HeapState};
use crate::status::JheapsStatus;
use libc::c_int;
use std::ptr::NonNull;
use std::sync::Arc;

/// Checks an out-parameter for null.
#[inline]
pub(crate) fn out_param<T>(ptr: *mut T, name: &'static str) -> Result<NonNull<T>, Fault> {
    NonNull::new(ptr).ok_or(Fault::NullArgument(name))
}

/// Resolves a heap handle and runs `f` with its cell locked.
pub(crate) fn with_heap<R, F>(handle: u64, f: F) -> Result<R, Fault>
where
    F: FnOnce(&Arc<HeapCell>, &mut HeapSlot) -> Result<R, Fault>,
{
    let cell = registry().heap(handle)?;
    let mut slot = cell.lock();
    f(&cell, &mut *slot)
}

/// Resolves a live heap handle over keys of type `K` and runs `f` on it.
pub(crate) fn with_keyed<K, R, F>(handle: u64, f: F) -> Result<R, Fault>
where
    K: DomainKey,
    F: FnOnce(&Arc<HeapCell>, &mut KeyedHeap<K>) -> Result<R, Fault>,
{
    with_heap(handle, |cell, slot| f(cell, slot.keyed_mut::<K>()?))
}

fn destroy(handle: u64) -> Result<(), Fault> {
    match registry().remove(handle)? {
        Entry::Heap(cell) => {
            let mut slot = cell.lock();
            // A consumed cell still routes its former elements to the receiver.
            if matches!(slot.state, HeapState::Live(_)) {
                slot.state = HeapState::Destroyed;
            }
            tracing::debug!(handle, variant = %slot.variant, "destroyed heap handle");
        }
        Entry::Element(_) => {
            tracing::trace!(handle, "destroyed element handle");
        }
    }
    Ok(())
}

/// Destroys a heap or element handle.
///
/// The handle is invalid afterwards; using it reports `NullPointer`.
///
/// # Errors
///
/// * `NullPointer` if `handle` is `0`, unknown, or already destroyed.
#[no_mangle]
pub extern "C" fn jheaps_handles_destroy(handle: u64) -> JheapsStatus {
    error::guard("jheaps_handles_destroy", || destroy(handle))
}

/// Writes the number of registered handles to `out`.
///
/// Every handle that was issued and not yet destroyed is counted, including
/// melded-away heaps.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_handles_live_count(out: *mut u64) -> JheapsStatus {
    error::guard("jheaps_handles_live_count", || {
        let out = out_param(out, "out")?;
        out.as_ptr().write(registry().live_count() as u64);
        Ok(())
    })
}

/// Writes the variant tag of a heap to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `c_int`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_get_variant(heap: u64, out: *mut c_int) -> JheapsStatus {
    error::guard("jheaps_heap_get_variant", || {
        let out = out_param(out, "out")?;
        let variant = with_heap(heap, |_, slot| {
            slot.live_mut()?;
            Ok(slot.variant)
        })?;
        out.as_ptr().write(variant as c_int);
        Ok(())
    })
}

/// Writes the key domain tag of a heap to `out` (`0` double, `1` long).
///
/// # Safety
///
/// `out` must be null or valid for a write of one `c_int`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_heap_get_key_domain(heap: u64, out: *mut c_int) -> JheapsStatus {
    error::guard("jheaps_heap_get_key_domain", || {
        let out = out_param(out, "out")?;
        let domain = with_heap(heap, |_, slot| {
            slot.live_mut()?;
            Ok(slot.domain)
        })?;
        out.as_ptr().write(domain as c_int);
        Ok(())
    })
}
