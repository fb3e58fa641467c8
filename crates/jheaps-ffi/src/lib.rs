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

//! # JHeaps FFI
//!
//! **C-Compatible Bindings for the JHeaps Priority Queues.**
//!
//! This crate exposes the heaps of `jheaps-engine` to C and to hosts
//! that bind C (C++, Python, C#). Twenty-four heap variants over two key
//! domains (`double` and `long`) are reachable through one flat, handle-based
//! API.
//!
//! ## Core Design Principles
//!
//! 1.  **Opaque Handles**: Heaps and element handles live in a process-wide
//!     registry and cross the boundary as `u64` handles. `0` is never issued.
//!     Every handle, including each element handle returned by a `find_*` or
//!     `delete_*` call, must be released with `jheaps_handles_destroy`.
//! 2.  **Status Codes**: Every entry point returns a `JheapsStatus`. On
//!     failure the calling thread's error record holds a message and the
//!     exception kind; read it with the `jheaps_error_*` functions before the
//!     next call on the same thread.
//! 3.  **All-or-Nothing**: A failing call leaves its heap and its output
//!     parameters untouched. Panics never unwind into the host; they are
//!     reported as `GenericError`.
//! 4.  **Thread Safety**: Each heap is guarded by its own lock, so distinct
//!     heaps can be used from distinct threads without coordination.
//!
//! ## Modules
//!
//! - `status`, `error`: Status codes and the per-thread error record.
//! - `variant`: Heap variant and key domain tags with their capabilities.
//! - `factory`, `heapify`: Heap construction.
//! - `heap`, `double_ended`: Key-level operations on plain heaps.
//! - `addressable`, `element`: Element handles and their operations.
//! - `mergeable`: Destructive meld.
//! - `comparator`: Host-supplied orderings for `long` keys.
//! - `handles`: Handle release and introspection.
//! - `config`, `logging`: Optional tracing subscriber for hosts.

pub mod addressable;
pub mod comparator;
pub mod config;
pub mod double_ended;
pub mod element;
pub mod error;
pub mod factory;
pub mod handles;
pub mod heap;
pub mod heapify;
pub mod instance;
pub mod logging;
pub mod mergeable;
pub mod registry;
pub mod status;
pub mod variant;

#[cfg(test)]
mod testing;
