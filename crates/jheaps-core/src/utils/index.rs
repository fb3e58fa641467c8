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

//! # Strongly Typed Indices
//!
//! Phantom-typed wrappers around `u32` that keep the different index spaces of
//! the node storage apart (segment ids vs. slot positions inside a segment).
//! `TypedIndex<T>` carries a tag type `T: TypedIndexTag` naming the space, and
//! compiles down to a transparent `u32`, so two of them pack into a single
//! `u64` node id.
//!
//! ## Usage
//!
//! ```rust
//! use jheaps_core::utils::index::{TypedIndex, TypedIndexTag};
//!
//! #[derive(Clone, Copy)]
//! struct SlotTag;
//! impl TypedIndexTag for SlotTag { const NAME: &'static str = "Slot"; }
//!
//! type Slot = TypedIndex<SlotTag>;
//! let s = Slot::new(3);
//! assert_eq!(s.get(), 3);
//! assert_eq!(format!("{}", s), "Slot(3)");
//! ```

/// Names an index space for debugging and display purposes.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `u32` index belonging to the index space tagged by `T`.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: u32,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new index.
    #[inline(always)]
    pub const fn new(index: u32) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Creates an index from a `usize` position.
    ///
    /// Returns `None` if the position does not fit into the index space.
    #[inline(always)]
    pub fn from_usize(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self::new)
    }

    /// Returns the raw index.
    #[inline(always)]
    pub const fn get(&self) -> u32 {
        self.index
    }

    /// Returns the index as a `usize` position.
    #[inline(always)]
    pub const fn as_usize(&self) -> usize {
        self.index as usize
    }

    /// Checks if the index is zero.
    #[inline(always)]
    pub const fn is_zero(&self) -> bool {
        self.index == 0
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<u32> for TypedIndex<T> {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for u32 {
    fn from(typed_index: TypedIndex<T>) -> Self {
        typed_index.index
    }
}

macro_rules! impl_index_op {
    ($trait_name:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl<T> std::ops::$trait_name<u32> for TypedIndex<T> {
            type Output = Self;

            fn $method(self, rhs: u32) -> Self::Output {
                Self::new(self.index $op rhs)
            }
        }
        impl<T> std::ops::$assign_trait<u32> for TypedIndex<T> {
            fn $assign_method(&mut self, rhs: u32) {
                self.index = self.index $op rhs;
            }
        }
    };
}

impl_index_op!(Add, add, AddAssign, add_assign, +);
impl_index_op!(Sub, sub, SubAssign, sub_assign, -);
