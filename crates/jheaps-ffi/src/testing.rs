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

//! Shared helpers for the entry point tests.

use crate::error::jheaps_error_get_message;
use crate::factory::jheaps_heap_create;
use crate::status::JheapsStatus;
use crate::variant::{HeapVariant, KeyDomain};
use libc::c_int;
use std::ffi::CStr;

/// The calling thread's last error message.
pub fn last_message() -> String {
    unsafe { CStr::from_ptr(jheaps_error_get_message()) }
        .to_string_lossy()
        .into_owned()
}

/// Asserts that a call succeeded, showing the recorded message otherwise.
#[track_caller]
pub fn ok(status: JheapsStatus) {
    assert_eq!(status, JheapsStatus::Success, "{}", last_message());
}

/// Creates a heap through the plain factory.
pub unsafe fn create(variant: HeapVariant, domain: KeyDomain) -> u64 {
    let mut handle = 0u64;
    ok(jheaps_heap_create(
        variant as c_int,
        domain as c_int,
        &mut handle,
    ));
    assert_ne!(handle, 0);
    handle
}
