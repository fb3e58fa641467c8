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

//! # JHeaps Core
//!
//! Foundational primitives for the jheaps priority queue engine and its C ABI.
//!
//! ## Modules
//!
//! - `key`: The two key domains (`f64` "double", `i64` "long") behind the
//!   `Key` trait: lossless bit encoding, natural total order, and an
//!   order-preserving unsigned encoding for radix bucketing.
//! - `compare`: The `Comparator<K>` abstraction with `NaturalOrder` and the
//!   `Reversed<C>` adapter.
//! - `arena`: `NodeArena<N>`, segmented node storage whose `NodeId`s survive
//!   merging two arenas, the basis of constant-time meld.
//! - `utils`: Phantom-tagged `u32` indices (`TypedIndex<T>`).

pub mod arena;
pub mod compare;
pub mod key;
pub mod utils;
