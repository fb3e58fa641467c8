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

//! # JHeaps Engine
//!
//! Priority queue implementations behind the jheaps C ABI. Every heap is a
//! min-heap with respect to its comparator and is keyed by one of the two key
//! domains of `jheaps_core::key`.
//!
//! ## Modules
//!
//! - `traits`: Capability traits (`Heap`, `DoubleEndedHeap`, `AddressableHeap`,
//!   `DoubleEndedAddressableHeap`, `MergeableHeap`) plus `DynMeld`, the
//!   object-safe meld used when heaps are held as trait objects.
//! - `element`: Element handles shared between a heap and its callers, and
//!   the owner tokens that validate them across melds.
//! - `error`: `HeapError`, the fault type of every fallible operation.
//! - `array`: Implicit binary/d-ary heaps, weak heaps, and their addressable
//!   counterpart. All support linear-time construction from a key array.
//! - `tree`: Pointer-based heaps: Fibonacci, simple Fibonacci, pairing,
//!   rank-pairing, costless-meld pairing, hollow, leftist, skew, explicit
//!   binary/d-ary trees and soft heaps.
//! - `double_ended`: Min-max heaps and reflected (paired) heaps.
//! - `monotone`: Radix heaps over bounded key ranges.
//!
//! ## Handles
//!
//! Addressable heaps return `Handle<K>` values. A handle keeps the element's
//! key and value readable after it has left the heap; heap operations given
//! a handle of a removed element, or of an element of another heap, fail with
//! `HeapError::IllegalArgument`. After `a.meld(&mut b)` the handles of `b`'s
//! elements address `a`.

pub mod array;
pub mod double_ended;
pub mod element;
pub mod error;
pub mod monotone;
pub mod traits;
pub mod tree;

#[cfg(test)]
mod testing;
