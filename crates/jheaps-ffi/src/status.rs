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

//! Status codes returned by every entry point.

/// Outcome of a call across the C ABI.
///
/// `Success` is zero so that hosts can test the return value for truthiness.
/// Every other code has a matching message in the calling thread's error
/// record (see `jheaps_error_get_message`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JheapsStatus {
    Success = 0,
    GenericError = 1,
    IllegalArgument = 2,
    UnsupportedOperation = 3,
    IndexOutOfBounds = 4,
    NoSuchElement = 5,
    NullPointer = 6,
    ClassCast = 7,
    IoError = 8,
    IllegalState = 9,
}

impl JheapsStatus {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::GenericError => "GenericError",
            Self::IllegalArgument => "IllegalArgument",
            Self::UnsupportedOperation => "UnsupportedOperation",
            Self::IndexOutOfBounds => "IndexOutOfBounds",
            Self::NoSuchElement => "NoSuchElement",
            Self::NullPointer => "NullPointer",
            Self::ClassCast => "ClassCast",
            Self::IoError => "IoError",
            Self::IllegalState => "IllegalState",
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        *self == Self::Success
    }
}

impl std::fmt::Display for JheapsStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
