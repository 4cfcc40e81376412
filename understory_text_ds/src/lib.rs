// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Text DS: text index structures built under a memory budget.
//!
//! [`TextDs`] owns a text and builds suffix-based index structures over it:
//! the suffix array, its inverse, the Phi, PLCP and LCP arrays and the
//! Burrows-Wheeler transform. Requests go through the
//! [`understory_ds_graph`] scheduler, which decides the construction order
//! and drops intermediates as soon as nothing needs them.
//!
//! - **Kinds and providers** ([`DsKind`], [`registry`]): what can be built and
//!   from what.
//! - **Storage** ([`DsStore`], [`SlotFlags`]): one slot per kind, each holding
//!   a bit-packed [`IntVector`](understory_int_vector::IntVector).
//! - **Accounting** ([`MemoryStats`]): current and peak heap usage.
//! - **Test strings** ([`generate`]): Fibonacci, Thue-Morse, run-heavy and
//!   seeded random texts.
//!
//! ## Example
//!
//! ```rust
//! use understory_ds_graph::CompressMode;
//! use understory_text_ds::{DsKind, TextDs, TextDsConfig};
//!
//! let config = TextDsConfig::new().compress_mode(CompressMode::Delayed);
//! let mut t = TextDs::with_config("mississippi", config).unwrap();
//! let schedule = t.construct(&[DsKind::SuffixArray, DsKind::Lcp]).unwrap();
//!
//! assert_eq!(
//!     schedule.constructed(),
//!     &[DsKind::SuffixArray, DsKind::Phi, DsKind::Plcp, DsKind::Lcp]
//! );
//! // Twelve suffixes fit in four bits once compressed.
//! assert_eq!(t.get(DsKind::SuffixArray).unwrap().width(), 4);
//! assert!(t.stats().peak_bytes >= t.stats().current_bytes);
//! ```
//!
//! The text may be any byte string without `0` bytes; a `0` sentinel is
//! appended internally, so a text of length `n` has `n + 1` suffixes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod bwt;
mod config;
mod error;
pub mod generate;
mod kind;
mod lcp;
mod registry;
mod stats;
mod store;
mod suffix;
mod text;

pub use config::{DEFAULT_FULL_WIDTH, TextDsConfig};
pub use error::TextDsError;
pub use kind::DsKind;
pub use registry::registry;
pub use stats::MemoryStats;
pub use store::{DsStore, SlotFlags};
pub use text::{ConstructError, TextDs};
