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

//! Key domains.
//!
//! Heaps are keyed by exactly two primitive domains: 64-bit floating point
//! (`f64`, the "double" domain) and 64-bit signed integers (`i64`, the
//! "long" domain). The `Key` trait captures what the engine needs from a key:
//!
//! - a lossless 64-bit encoding, so element records can store their key in an
//!   atomic word and remain shareable across threads,
//! - a natural total order (`f64` uses IEEE 754 `totalOrder`, so `-0.0 < 0.0`
//!   and NaN sorts after every finite value),
//! - an order-preserving unsigned encoding used by the radix heaps to bucket
//!   keys by their most significant differing bit.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};

const SIGN_BIT: u64 = 1 << 63;

/// A primitive key domain.
pub trait Key: Copy + Send + Sync + Debug + Display + PartialEq + 'static {
    /// Human readable name of the domain (`"double"` or `"long"`).
    const DOMAIN: &'static str;

    /// Encodes the key into 64 bits without loss.
    fn to_bits(self) -> u64;

    /// Decodes a key previously produced by [`Key::to_bits`].
    fn from_bits(bits: u64) -> Self;

    /// The natural total order of the domain.
    fn natural_cmp(&self, other: &Self) -> Ordering;

    /// Maps the key onto `u64` such that `a < b` in the natural order
    /// iff `a.to_ordered_bits() < b.to_ordered_bits()`.
    fn to_ordered_bits(self) -> u64;

    /// Inverse of [`Key::to_ordered_bits`].
    fn from_ordered_bits(bits: u64) -> Self;

    /// Returns `false` for keys that cannot bound a monotone heap.
    #[inline(always)]
    fn is_finite(&self) -> bool {
        true
    }
}

impl Key for i64 {
    const DOMAIN: &'static str = "long";

    #[inline(always)]
    fn to_bits(self) -> u64 {
        self as u64
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        bits as i64
    }

    #[inline(always)]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    #[inline(always)]
    fn to_ordered_bits(self) -> u64 {
        (self as u64) ^ SIGN_BIT
    }

    #[inline(always)]
    fn from_ordered_bits(bits: u64) -> Self {
        (bits ^ SIGN_BIT) as i64
    }
}

impl Key for f64 {
    const DOMAIN: &'static str = "double";

    #[inline(always)]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    #[inline(always)]
    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline(always)]
    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    #[inline(always)]
    fn to_ordered_bits(self) -> u64 {
        let bits = f64::to_bits(self);
        if bits & SIGN_BIT != 0 {
            !bits
        } else {
            bits | SIGN_BIT
        }
    }

    #[inline(always)]
    fn from_ordered_bits(bits: u64) -> Self {
        if bits & SIGN_BIT != 0 {
            f64::from_bits(bits & !SIGN_BIT)
        } else {
            f64::from_bits(!bits)
        }
    }

    #[inline(always)]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_long_bits_roundtrip_extremes() {
        for k in [i64::MIN, -1, 0, 1, i64::MAX] {
            assert_eq!(<i64 as Key>::from_bits(Key::to_bits(k)), k);
            assert_eq!(<i64 as Key>::from_ordered_bits(k.to_ordered_bits()), k);
        }
    }

    #[test]
    fn test_double_natural_order_is_total() {
        assert_eq!((-0.0f64).natural_cmp(&0.0), Ordering::Less);
        assert_eq!(f64::NAN.natural_cmp(&f64::INFINITY), Ordering::Greater);
        assert_eq!(f64::NAN.natural_cmp(&f64::NAN), Ordering::Equal);
        assert_eq!(1.5f64.natural_cmp(&2.5), Ordering::Less);
    }

    #[test]
    fn test_double_ordered_bits_preserve_signed_zero() {
        assert!((-0.0f64).to_ordered_bits() < 0.0f64.to_ordered_bits());
        assert!(f64::NEG_INFINITY.to_ordered_bits() < f64::MIN.to_ordered_bits());
        assert!(f64::MAX.to_ordered_bits() < f64::INFINITY.to_ordered_bits());
    }

    #[test]
    fn test_finiteness() {
        assert!(i64::MIN.is_finite());
        assert!(Key::is_finite(&-3.5f64));
        assert!(!Key::is_finite(&f64::INFINITY));
        assert!(!Key::is_finite(&f64::NAN));
    }

    #[test]
    fn test_domain_names() {
        assert_eq!(<f64 as Key>::DOMAIN, "double");
        assert_eq!(<i64 as Key>::DOMAIN, "long");
    }

    proptest! {
        #[test]
        fn prop_long_ordered_bits_monotone(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(a.cmp(&b), a.to_ordered_bits().cmp(&b.to_ordered_bits()));
        }

        #[test]
        fn prop_double_ordered_bits_monotone(a in -1.0e300f64..1.0e300, b in -1.0e300f64..1.0e300) {
            prop_assert_eq!(a.natural_cmp(&b), a.to_ordered_bits().cmp(&b.to_ordered_bits()));
            prop_assert_eq!(<f64 as Key>::from_ordered_bits(a.to_ordered_bits()).to_bits(), a.to_bits());
        }
    }
}
