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

//! # Heap Variants
//!
//! The closed set of heap implementations reachable through the C ABI. A
//! variant tag, together with a key domain, fully determines the engine type
//! a handle refers to and therefore which entry points accept it.
//!
//! ## Exported Functions
//!
//! * `jheaps_variant_capabilities`

use crate::error::{self, Fault};
use crate::handles::out_param;
use crate::status::JheapsStatus;
use bitflags::bitflags;
use libc::c_int;

bitflags! {
    /// Capability set of a heap variant.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        const MERGEABLE = 1 << 0;
        const ADDRESSABLE = 1 << 1;
        const DOUBLE_ENDED = 1 << 2;
        const MONOTONE = 1 << 3;
        const BULK_BUILDABLE = 1 << 4;
    }
}

/// Construction shape of a variant: which extra parameters its factory needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Plain,
    Dary,
    Soft,
    Monotone,
}

impl Shape {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Dary => "d-ary",
            Self::Soft => "soft",
            Self::Monotone => "monotone",
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two key domains a heap can be built over.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDomain {
    Double = 0,
    Long = 1,
}

impl KeyDomain {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::Long => "long",
        }
    }
}

impl std::fmt::Display for KeyDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<c_int> for KeyDomain {
    type Error = Fault;

    fn try_from(tag: c_int) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::Double),
            1 => Ok(Self::Long),
            _ => Err(Fault::invalid(format!("unknown key domain tag {}", tag))),
        }
    }
}

/// Heap variant tags. The discriminants are part of the ABI.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeapVariant {
    Fibonacci = 0,
    SimpleFibonacci = 1,
    Pairing = 2,
    RankPairing = 3,
    CostlessMeldPairing = 4,
    Hollow = 5,
    Leftist = 6,
    Skew = 7,
    BinaryArray = 8,
    BinaryArrayWeak = 9,
    BinaryArrayBulkInsertWeak = 10,
    BinaryArrayAddressable = 11,
    DaryArray = 12,
    DaryArrayAddressable = 13,
    BinaryTreeAddressable = 14,
    DaryTreeAddressable = 15,
    BinaryTreeSoftAddressable = 16,
    MinMaxBinaryArray = 17,
    ReflectedFibonacci = 18,
    ReflectedPairing = 19,
    LongRadix = 20,
    LongRadixAddressable = 21,
    DoubleRadix = 22,
    DoubleRadixAddressable = 23,
}

impl HeapVariant {
    /// Every variant, in tag order.
    pub const ALL: [HeapVariant; 24] = [
        Self::Fibonacci,
        Self::SimpleFibonacci,
        Self::Pairing,
        Self::RankPairing,
        Self::CostlessMeldPairing,
        Self::Hollow,
        Self::Leftist,
        Self::Skew,
        Self::BinaryArray,
        Self::BinaryArrayWeak,
        Self::BinaryArrayBulkInsertWeak,
        Self::BinaryArrayAddressable,
        Self::DaryArray,
        Self::DaryArrayAddressable,
        Self::BinaryTreeAddressable,
        Self::DaryTreeAddressable,
        Self::BinaryTreeSoftAddressable,
        Self::MinMaxBinaryArray,
        Self::ReflectedFibonacci,
        Self::ReflectedPairing,
        Self::LongRadix,
        Self::LongRadixAddressable,
        Self::DoubleRadix,
        Self::DoubleRadixAddressable,
    ];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fibonacci => "Fibonacci",
            Self::SimpleFibonacci => "SimpleFibonacci",
            Self::Pairing => "Pairing",
            Self::RankPairing => "RankPairing",
            Self::CostlessMeldPairing => "CostlessMeldPairing",
            Self::Hollow => "Hollow",
            Self::Leftist => "Leftist",
            Self::Skew => "Skew",
            Self::BinaryArray => "BinaryArray",
            Self::BinaryArrayWeak => "BinaryArrayWeak",
            Self::BinaryArrayBulkInsertWeak => "BinaryArrayBulkInsertWeak",
            Self::BinaryArrayAddressable => "BinaryArrayAddressable",
            Self::DaryArray => "DaryArray",
            Self::DaryArrayAddressable => "DaryArrayAddressable",
            Self::BinaryTreeAddressable => "BinaryTreeAddressable",
            Self::DaryTreeAddressable => "DaryTreeAddressable",
            Self::BinaryTreeSoftAddressable => "BinaryTreeSoftAddressable",
            Self::MinMaxBinaryArray => "MinMaxBinaryArray",
            Self::ReflectedFibonacci => "ReflectedFibonacci",
            Self::ReflectedPairing => "ReflectedPairing",
            Self::LongRadix => "LongRadix",
            Self::LongRadixAddressable => "LongRadixAddressable",
            Self::DoubleRadix => "DoubleRadix",
            Self::DoubleRadixAddressable => "DoubleRadixAddressable",
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        type C = Capabilities;
        match self {
            Self::Fibonacci
            | Self::SimpleFibonacci
            | Self::Pairing
            | Self::RankPairing
            | Self::CostlessMeldPairing
            | Self::Hollow
            | Self::Leftist
            | Self::Skew
            | Self::BinaryTreeSoftAddressable => C::MERGEABLE | C::ADDRESSABLE,
            Self::BinaryArray
            | Self::BinaryArrayWeak
            | Self::BinaryArrayBulkInsertWeak
            | Self::DaryArray => C::BULK_BUILDABLE,
            Self::BinaryArrayAddressable | Self::DaryArrayAddressable => {
                C::ADDRESSABLE | C::BULK_BUILDABLE
            }
            Self::BinaryTreeAddressable | Self::DaryTreeAddressable => C::ADDRESSABLE,
            Self::MinMaxBinaryArray => C::DOUBLE_ENDED | C::BULK_BUILDABLE,
            Self::ReflectedFibonacci | Self::ReflectedPairing => {
                C::MERGEABLE | C::ADDRESSABLE | C::DOUBLE_ENDED
            }
            Self::LongRadix | Self::DoubleRadix => C::MONOTONE,
            Self::LongRadixAddressable | Self::DoubleRadixAddressable => {
                C::MONOTONE | C::ADDRESSABLE
            }
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Self::DaryArray | Self::DaryArrayAddressable | Self::DaryTreeAddressable => Shape::Dary,
            Self::BinaryTreeSoftAddressable => Shape::Soft,
            Self::LongRadix
            | Self::LongRadixAddressable
            | Self::DoubleRadix
            | Self::DoubleRadixAddressable => Shape::Monotone,
            _ => Shape::Plain,
        }
    }

    /// Returns `true` if the variant can be built over keys of `domain`.
    ///
    /// Radix variants are tied to one domain; everything else accepts both.
    pub fn supports(&self, domain: KeyDomain) -> bool {
        match self {
            Self::LongRadix | Self::LongRadixAddressable => domain == KeyDomain::Long,
            Self::DoubleRadix | Self::DoubleRadixAddressable => domain == KeyDomain::Double,
            _ => true,
        }
    }
}

impl std::fmt::Display for HeapVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<c_int> for HeapVariant {
    type Error = Fault;

    fn try_from(tag: c_int) -> Result<Self, Self::Error> {
        usize::try_from(tag)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| Fault::invalid(format!("unknown heap variant tag {}", tag)))
    }
}

/// Writes the capability bits of `variant` to `out`.
///
/// # Errors
///
/// * `IllegalArgument` if `variant` is not a known tag.
/// * `NullPointer` if `out` is null.
///
/// # Safety
///
/// `out` must be null or valid for a write of one `u32`.
#[no_mangle]
pub unsafe extern "C" fn jheaps_variant_capabilities(variant: c_int, out: *mut u32) -> JheapsStatus {
    error::guard("jheaps_variant_capabilities", || {
        let out = out_param(out, "out")?;
        let variant = HeapVariant::try_from(variant)?;
        out.as_ptr().write(variant.capabilities().bits());
        Ok(())
    })
}
