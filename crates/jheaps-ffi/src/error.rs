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

//! # Error Channel
//!
//! Faults never cross the C ABI as anything but a status code. Every entry
//! point runs its body through [`guard`], which clears the calling thread's
//! error record, catches panics, and on failure records the fault kind, the
//! status it maps to, and a message. The record is per thread: a fault on one
//! thread is never observable from another.
//!
//! ## Exported Functions
//!
//! * `jheaps_error_get_status`
//! * `jheaps_error_get_message`
//! * `jheaps_error_get_throwable_if_any`
//!
//! All three only read the record. The pointers they return stay valid until
//! the next entry point call on the same thread.

use crate::status::JheapsStatus;
use crate::variant::KeyDomain;
use jheaps_engine::error::HeapError;
use libc::c_char;
use std::borrow::Cow;
use std::cell::RefCell;
use std::ffi::CString;
use std::panic::{self, AssertUnwindSafe};

/// A fault raised while serving an entry point.
#[derive(Debug, thiserror::Error)]
pub enum Fault {
    #[error(transparent)]
    Heap(#[from] HeapError),
    #[error("handle 0 is never issued")]
    NullHandle,
    #[error("unknown or destroyed handle {0}")]
    UnknownHandle(u64),
    #[error("handle {handle} is not {expected}")]
    WrongHandleKind { handle: u64, expected: &'static str },
    #[error("expected {expected} keys, found {actual} keys")]
    DomainMismatch { expected: KeyDomain, actual: KeyDomain },
    #[error("heap does not implement {0}")]
    MissingInterface(&'static str),
    #[error("heap has been melded into another heap")]
    Consumed,
    #[error("owning heap has been destroyed")]
    HeapDestroyed,
    #[error("null pointer passed as `{0}`")]
    NullArgument(&'static str),
    #[error("{0}")]
    InvalidArgument(Cow<'static, str>),
    #[error("{0}")]
    Unsupported(Cow<'static, str>),
    #[error("{requested} elements exceed the supported maximum of {max}")]
    TooManyElements { requested: i64, max: i64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Panic(String),
}

impl Fault {
    #[inline]
    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Self::InvalidArgument(message.into())
    }

    #[inline]
    pub fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn kind(&self) -> FaultKind {
        match self {
            Self::Heap(e) => match e {
                HeapError::IllegalArgument(_) => FaultKind::IllegalArgument,
                HeapError::UnsupportedOperation(_) => FaultKind::UnsupportedOperation,
                HeapError::NoSuchElement => FaultKind::NoSuchElement,
                HeapError::IllegalState(_) => FaultKind::IllegalState,
                HeapError::ClassCast => FaultKind::ClassCast,
            },
            Self::InvalidArgument(_) => FaultKind::IllegalArgument,
            Self::Unsupported(_) => FaultKind::UnsupportedOperation,
            Self::TooManyElements { .. } => FaultKind::IndexOutOfBounds,
            Self::NullHandle | Self::UnknownHandle(_) | Self::NullArgument(_) => {
                FaultKind::NullPointer
            }
            Self::WrongHandleKind { .. }
            | Self::DomainMismatch { .. }
            | Self::MissingInterface(_) => FaultKind::ClassCast,
            Self::Io(_) => FaultKind::Io,
            Self::Consumed | Self::HeapDestroyed => FaultKind::IllegalState,
            Self::Panic(_) => FaultKind::Other,
        }
    }

    /// The message to report, or `None` when the underlying fault has none.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Heap(e) => e.message().map(str::to_owned),
            other => Some(other.to_string()),
        }
    }
}

/// Classification of a fault; decides the status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    IllegalArgument,
    UnsupportedOperation,
    IndexOutOfBounds,
    NoSuchElement,
    NullPointer,
    ClassCast,
    Io,
    IllegalState,
    Other,
}

impl FaultKind {
    #[inline]
    pub fn status(&self) -> JheapsStatus {
        match self {
            Self::IllegalArgument => JheapsStatus::IllegalArgument,
            Self::UnsupportedOperation => JheapsStatus::UnsupportedOperation,
            Self::IndexOutOfBounds => JheapsStatus::IndexOutOfBounds,
            Self::NoSuchElement => JheapsStatus::NoSuchElement,
            Self::NullPointer => JheapsStatus::NullPointer,
            Self::ClassCast => JheapsStatus::ClassCast,
            Self::Io => JheapsStatus::IoError,
            Self::IllegalState => JheapsStatus::IllegalState,
            Self::Other => JheapsStatus::GenericError,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IllegalArgument => "IllegalArgumentException",
            Self::UnsupportedOperation => "UnsupportedOperationException",
            Self::IndexOutOfBounds => "IndexOutOfBoundsException",
            Self::NoSuchElement => "NoSuchElementException",
            Self::NullPointer => "NullPointerException",
            Self::ClassCast => "ClassCastException",
            Self::Io => "IOException",
            Self::IllegalState => "IllegalStateException",
            Self::Other => "Exception",
        }
    }

    /// Nul-terminated copy of [`FaultKind::as_str`].
    fn as_c_str(&self) -> &'static [u8] {
        match self {
            Self::IllegalArgument => b"IllegalArgumentException\0",
            Self::UnsupportedOperation => b"UnsupportedOperationException\0",
            Self::IndexOutOfBounds => b"IndexOutOfBoundsException\0",
            Self::NoSuchElement => b"NoSuchElementException\0",
            Self::NullPointer => b"NullPointerException\0",
            Self::ClassCast => b"ClassCastException\0",
            Self::Io => b"IOException\0",
            Self::IllegalState => b"IllegalStateException\0",
            Self::Other => b"Exception\0",
        }
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The originating fault of a failed call, as seen from C.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct JheapsFault {
    pub status: JheapsStatus,
    /// Static, nul-terminated name of the fault kind.
    pub kind_name: *const c_char,
}

#[derive(Debug)]
struct ErrorRecord {
    status: JheapsStatus,
    message: CString,
    fault: Option<JheapsFault>,
}

impl Default for ErrorRecord {
    fn default() -> Self {
        Self {
            status: JheapsStatus::Success,
            message: CString::default(),
            fault: None,
        }
    }
}

thread_local! {
    static LAST_ERROR: RefCell<ErrorRecord> = RefCell::new(ErrorRecord::default());
}

fn clear() {
    LAST_ERROR.with(|record| *record.borrow_mut() = ErrorRecord::default());
}

fn record(function: &'static str, fault: Fault) -> JheapsStatus {
    let kind = fault.kind();
    let status = kind.status();
    let message = fault
        .message()
        .unwrap_or_else(|| format!("Error ({})", kind.as_str()));
    tracing::trace!(function, %status, %kind, message = %message, "call failed");

    // Interior nul bytes cannot be represented; keep the prefix before the first.
    let message = CString::new(message).unwrap_or_else(|e| {
        let end = e.nul_position();
        let mut bytes = e.into_vec();
        bytes.truncate(end);
        CString::new(bytes).unwrap_or_default()
    });

    LAST_ERROR.with(|record| {
        *record.borrow_mut() = ErrorRecord {
            status,
            message,
            fault: Some(JheapsFault {
                status,
                kind_name: kind.as_c_str().as_ptr() as *const c_char,
            }),
        }
    });
    status
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with a non-string payload".to_owned()
    }
}

/// Runs the body of the entry point `function` and reports its outcome.
///
/// The thread's error record is reset before `body` runs. A returned fault
/// or a panic is recorded and translated into its status code.
pub(crate) fn guard<F>(function: &'static str, body: F) -> JheapsStatus
where
    F: FnOnce() -> Result<(), Fault>,
{
    clear();
    let outcome = panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        let message = panic_message(payload);
        tracing::warn!(function, message = %message, "caught panic at the C boundary");
        Err(Fault::Panic(message))
    });
    match outcome {
        Ok(()) => JheapsStatus::Success,
        Err(fault) => record(function, fault),
    }
}

/// Returns the status of the calling thread's most recent call.
#[no_mangle]
pub extern "C" fn jheaps_error_get_status() -> JheapsStatus {
    LAST_ERROR.with(|record| record.borrow().status)
}

/// Returns the message of the calling thread's most recent call.
///
/// The string is empty after a successful call and never null. It stays valid
/// until the next entry point call on the same thread.
#[no_mangle]
pub extern "C" fn jheaps_error_get_message() -> *const c_char {
    LAST_ERROR.with(|record| record.borrow().message.as_ptr())
}

/// Returns the fault of the calling thread's most recent call, or null if it
/// succeeded.
///
/// The pointer stays valid until the next entry point call on the same thread.
#[no_mangle]
pub extern "C" fn jheaps_error_get_throwable_if_any() -> *const JheapsFault {
    LAST_ERROR.with(|record| match &record.borrow().fault {
        Some(fault) => fault as *const JheapsFault,
        None => std::ptr::null(),
    })
}
