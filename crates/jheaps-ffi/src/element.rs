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

//! # Element Operations
//!
//! Accessors and mutators for element handles of addressable heaps.
//!
//! An element handle always reaches the heap that currently owns the element,
//! including after the element's original heap was melded into another one.
//! Once the element has left its heap (extraction, deletion, clear) the
//! handle stays readable, and `set_value` still works, but key changes and
//! deletion report `IllegalArgument`. If the owning heap was destroyed, every
//! operation reports `IllegalState`.
//!
//! ## Exported Functions
//!
//! * `jheaps_element_get_key_double` / `jheaps_element_get_key_long`
//! * `jheaps_element_get_value`
//! * `jheaps_element_set_value`
//! * `jheaps_element_decrease_key_double` / `jheaps_element_decrease_key_long`
//! * `jheaps_element_increase_key_double` / `jheaps_element_increase_key_long`
//! * `jheaps_element_delete`

use crate::error::{self, Fault};
use crate::handles::out_param;
use crate::instance::{DomainKey, KeyedHeap};
use crate::registry::{registry, ElementEntry};
use crate::status::JheapsStatus;
use crate::variant::KeyDomain;
use jheaps_engine::element::Handle;
use paste::paste;

/// Runs `f` on an element of either domain and its owning heap.
fn with_any_element<R>(
    entry: &ElementEntry,
    f: impl ElementOp<Output = R>,
) -> Result<R, Fault> {
    match entry.element.domain() {
        KeyDomain::Double => entry.with_owner::<f64, _, _>(|heap, e| f.apply(heap, e)),
        KeyDomain::Long => entry.with_owner::<i64, _, _>(|heap, e| f.apply(heap, e)),
    }
}

/// An operation that is generic over the element's key domain.
trait ElementOp {
    type Output;

    fn apply<K: DomainKey>(self, heap: &mut KeyedHeap<K>, element: &Handle<K>)
        -> Result<Self::Output, Fault>;
}

struct GetValue;

impl ElementOp for GetValue {
    type Output = i64;

    fn apply<K: DomainKey>(self, _: &mut KeyedHeap<K>, element: &Handle<K>) -> Result<i64, Fault> {
        Ok(element.value())
    }
}

struct SetValue(i64);

impl ElementOp for SetValue {
    type Output = ();

    fn apply<K: DomainKey>(self, _: &mut KeyedHeap<K>, element: &Handle<K>) -> Result<(), Fault> {
        element.set_value(self.0);
        Ok(())
    }
}

struct Delete;

impl ElementOp for Delete {
    type Output = ();

    fn apply<K: DomainKey>(self, heap: &mut KeyedHeap<K>, element: &Handle<K>) -> Result<(), Fault> {
        heap.delete(element)
    }
}

unsafe fn get_key<K: DomainKey>(element: u64, out: *mut K) -> Result<(), Fault> {
    let out = out_param(out, "out")?;
    let key = registry()
        .element(element)?
        .with_owner::<K, _, _>(|_, e| Ok(e.key()))?;
    out.as_ptr().write(key);
    Ok(())
}

fn decrease_key<K: DomainKey>(element: u64, key: K) -> Result<(), Fault> {
    registry()
        .element(element)?
        .with_owner::<K, _, _>(|heap, e| heap.decrease_key(e, key))
}

fn increase_key<K: DomainKey>(element: u64, key: K) -> Result<(), Fault> {
    registry()
        .element(element)?
        .with_owner::<K, _, _>(|heap, e| heap.increase_key(e, key))
}

macro_rules! element_entry_points {
    ($($suffix:ident => $key:ty),* $(,)?) => {
        paste! {
            $(
                /// Writes the element's key to `out`.
                ///
                /// # Safety
                ///
                /// `out` must be null or valid for one write.
                #[no_mangle]
                pub unsafe extern "C" fn [<jheaps_element_get_key_ $suffix>](
                    element: u64,
                    out: *mut $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_element_get_key_ $suffix>]), || {
                        get_key::<$key>(element, out)
                    })
                }

                /// Lowers the element's key to `key`.
                ///
                /// # Errors
                ///
                /// * `IllegalArgument` if `key` is greater than the current key, if
                ///   the element is no longer in its heap, or if the heap does not
                ///   support decrease-key (soft heaps report `UnsupportedOperation`).
                #[no_mangle]
                pub extern "C" fn [<jheaps_element_decrease_key_ $suffix>](
                    element: u64,
                    key: $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_element_decrease_key_ $suffix>]), || {
                        decrease_key::<$key>(element, key)
                    })
                }

                /// Raises the element's key to `key`. Double-ended heaps only.
                ///
                /// # Errors
                ///
                /// * `IllegalArgument` if `key` is smaller than the current key or
                ///   the element is no longer in its heap.
                /// * `ClassCast` if the owning heap is not double-ended.
                #[no_mangle]
                pub extern "C" fn [<jheaps_element_increase_key_ $suffix>](
                    element: u64,
                    key: $key,
                ) -> JheapsStatus {
                    error::guard(stringify!([<jheaps_element_increase_key_ $suffix>]), || {
                        increase_key::<$key>(element, key)
                    })
                }
            )*
        }
    };
}

element_entry_points!(double => f64, long => i64);

/// Writes the element's value to `out`.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `i64`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_element_get_value(element: u64, out: *mut i64) -> JheapsStatus {
    error::guard("jheaps_element_get_value", || {
        let out = out_param(out, "out")?;
        let value = with_any_element(&registry().element(element)?, GetValue)?;
        out.as_ptr().write(value);
        Ok(())
    })
}

/// Replaces the element's value.
#[no_mangle]
pub extern "C" fn jheaps_element_set_value(element: u64, value: i64) -> JheapsStatus {
    error::guard("jheaps_element_set_value", || {
        with_any_element(&registry().element(element)?, SetValue(value))
    })
}

/// Removes the element from its heap. The handle stays registered.
///
/// # Errors
///
/// * `IllegalArgument` if the element is no longer in its heap.
#[no_mangle]
pub extern "C" fn jheaps_element_delete(element: u64) -> JheapsStatus {
    error::guard("jheaps_element_delete", || {
        with_any_element(&registry().element(element)?, Delete)
    })
}
