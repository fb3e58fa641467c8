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

//! Engine fault type.

use std::borrow::Cow;

/// A fault raised by a heap operation.
///
/// Faults that carry a message describe the violated precondition. Empty-heap
/// accesses and incompatible meld partners carry none.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    #[error("{0}")]
    IllegalArgument(Cow<'static, str>),
    #[error("{0}")]
    UnsupportedOperation(Cow<'static, str>),
    #[error("no such element")]
    NoSuchElement,
    #[error("{0}")]
    IllegalState(Cow<'static, str>),
    #[error("incompatible heap types")]
    ClassCast,
}

impl HeapError {
    #[inline]
    pub fn illegal_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::IllegalArgument(message.into())
    }

    #[inline]
    pub fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    #[inline]
    pub fn illegal_state(message: impl Into<Cow<'static, str>>) -> Self {
        Self::IllegalState(message.into())
    }

    /// Reported when a handle does not address a live element of the heap.
    #[inline]
    pub fn invalid_handle() -> Self {
        Self::IllegalArgument(Cow::Borrowed("invalid handle"))
    }

    /// Reported when decrease-key is asked to increase a key.
    #[inline]
    pub fn key_not_decreased() -> Self {
        Self::IllegalArgument(Cow::Borrowed("keys can only be decreased"))
    }

    /// Reported when increase-key is asked to decrease a key.
    #[inline]
    pub fn key_not_increased() -> Self {
        Self::IllegalArgument(Cow::Borrowed("keys can only be increased"))
    }

    /// Reported when two heaps with different orderings are melded.
    #[inline]
    pub fn comparator_mismatch() -> Self {
        Self::IllegalArgument(Cow::Borrowed("cannot meld heaps using different comparators"))
    }

    /// The message attached to the fault, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::IllegalArgument(m) | Self::UnsupportedOperation(m) | Self::IllegalState(m) => {
                Some(m)
            }
            Self::NoSuchElement | Self::ClassCast => None,
        }
    }
}

/// Result alias used throughout the engine.
pub type HeapResult<T> = Result<T, HeapError>;
