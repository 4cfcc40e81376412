// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Int Vector: bit-packed integer vectors with a run-time width.
//!
//! Text index arrays hold positions and lengths bounded by the text length,
//! so most of a 32- or 64-bit word is wasted. [`IntVector`] stores each
//! element in exactly `width` bits, where the width is picked at run time and
//! can be changed afterwards:
//!
//! - build at a comfortable full width, then
//! - [`bit_compress`](IntVector::bit_compress) once the final maximum is known.
//!
//! ```rust
//! use understory_int_vector::{bits_for, IntVector};
//!
//! let n = 1000_u64;
//! let mut positions = IntVector::from_values((0..n).rev(), 32).unwrap();
//! assert_eq!(positions.heap_bytes(), 4000);
//!
//! positions.bit_compress();
//! assert_eq!(positions.width(), bits_for(n - 1));
//! assert_eq!(positions.get(0), Some(n - 1));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bits;
mod error;
mod vector;

pub use bits::bits_for;
pub use error::IntVectorError;
pub use vector::{IntVector, Iter};
