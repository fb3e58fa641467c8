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

//! Key orderings.
//!
//! Every heap is parameterized by a `Comparator<K>`. The natural order of the
//! key domain is [`NaturalOrder`]; [`Reversed`] flips any comparator and is
//! what the max side of a reflected double-ended heap runs on.
//!
//! Comparators must be `PartialEq` so that two heaps can verify they order
//! their keys identically before a meld.

use crate::key::Key;
use std::cmp::Ordering;

/// A total order over keys of type `K`.
pub trait Comparator<K>: Clone + PartialEq + Send + Sync + 'static {
    /// Compares two keys.
    fn compare(&self, a: &K, b: &K) -> Ordering;

    /// Returns `true` if `a` is strictly smaller than `b`.
    #[inline(always)]
    fn less(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// Returns `true` if `a` is strictly greater than `b`.
    #[inline(always)]
    fn greater(&self, a: &K, b: &K) -> bool {
        self.compare(a, b) == Ordering::Greater
    }
}

/// The natural order of the key domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<K: Key> Comparator<K> for NaturalOrder {
    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.natural_cmp(b)
    }
}

/// Reverses the wrapped comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Reversed<C>(pub C);

impl<C> Reversed<C> {
    /// Returns the wrapped comparator.
    #[inline]
    pub fn inner(&self) -> &C {
        &self.0
    }
}

impl<K, C> Comparator<K> for Reversed<C>
where
    C: Comparator<K>,
{
    #[inline(always)]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self.0.compare(b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_order_long() {
        let c = NaturalOrder;
        assert!(Comparator::<i64>::less(&c, &1, &2));
        assert!(Comparator::<i64>::greater(&c, &3, &2));
        assert_eq!(Comparator::<i64>::compare(&c, &2, &2), Ordering::Equal);
    }

    #[test]
    fn test_reversed_flips_order() {
        let c = Reversed(NaturalOrder);
        assert!(Comparator::<f64>::less(&c, &2.0, &1.0));
        assert!(Comparator::<f64>::greater(&c, &1.0, &2.0));
        assert_eq!(c.inner(), &NaturalOrder);
    }

    #[test]
    fn test_double_reversed_is_identity() {
        let c = Reversed(Reversed(NaturalOrder));
        assert!(Comparator::<i64>::less(&c, &-5, &5));
    }
}
