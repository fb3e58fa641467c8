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

//! Host-supplied orderings over `long` keys.

use crate::error::Fault;
use jheaps_core::compare::Comparator;
use libc::c_int;
use std::cmp::Ordering;

/// The ordering callback type accepted by the `_with_comparator` entry points.
///
/// The callback returns a negative number, zero, or a positive number when its
/// first argument is smaller than, equal to, or greater than the second.
pub type JheapsComparator = Option<unsafe extern "C" fn(i64, i64) -> c_int>;

/// The raw callback, once checked for null.
pub type RawComparator = unsafe extern "C" fn(i64, i64) -> c_int;

/// The order of a `long` heap: natural, or delegated to a host callback.
///
/// Two orders are equal if both are natural or both call the same function,
/// which is what decides whether two heaps may be melded.
#[derive(Debug, Clone, Copy)]
pub enum LongOrder {
    Natural,
    Callback(RawComparator),
}

impl LongOrder {
    /// Wraps a callback that must not be null.
    pub fn from_callback(callback: JheapsComparator) -> Result<Self, Fault> {
        callback
            .map(Self::Callback)
            .ok_or_else(|| Fault::invalid("comparator must not be null"))
    }
}

impl PartialEq for LongOrder {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Natural, Self::Natural) => true,
            (Self::Callback(a), Self::Callback(b)) => *a as usize == *b as usize,
            _ => false,
        }
    }
}

impl Comparator<i64> for LongOrder {
    #[inline]
    fn compare(&self, a: &i64, b: &i64) -> Ordering {
        match self {
            Self::Natural => a.cmp(b),
            // SAFETY: the host guarantees the callback outlives every heap built with it.
            Self::Callback(f) => unsafe { f(*a, *b) }.cmp(&0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe extern "C" fn descending(a: i64, b: i64) -> c_int {
        b.cmp(&a) as c_int
    }

    unsafe extern "C" fn by_magnitude(a: i64, b: i64) -> c_int {
        a.unsigned_abs().cmp(&b.unsigned_abs()) as c_int
    }

    #[test]
    fn test_callback_order() {
        let order = LongOrder::Callback(descending);
        assert!(order.less(&5, &3));
        assert!(order.greater(&-1, &0));
        assert_eq!(order.compare(&4, &4), Ordering::Equal);

        let order = LongOrder::Callback(by_magnitude);
        assert!(order.less(&-2, &3));
    }

    #[test]
    fn test_equality() {
        assert_eq!(LongOrder::Natural, LongOrder::Natural);
        assert_eq!(LongOrder::Callback(descending), LongOrder::Callback(descending));
        assert_ne!(LongOrder::Callback(descending), LongOrder::Callback(by_magnitude));
        assert_ne!(LongOrder::Natural, LongOrder::Callback(descending));
    }

    #[test]
    fn test_null_callback_rejected() {
        assert!(LongOrder::from_callback(None).is_err());
        assert!(LongOrder::from_callback(Some(descending)).is_ok());
    }
}
