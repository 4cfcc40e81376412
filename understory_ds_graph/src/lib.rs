// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory DS Graph: memory-peak aware construction of derived data structures.
//!
//! Text indexes are built from each other: an LCP array needs a suffix array
//! and a PLCP array, the PLCP array needs the Phi array, and so on. Building
//! everything and keeping it around wastes memory; this crate decides, for a
//! requested set of kinds, in which order to build intermediates, when each
//! one can be released and when a result can be shrunk to its minimal bit
//! width. The decisions come entirely from static dependency metadata.
//!
//! - **Providers** ([`Provider`], [`ProviderRegistry`]): per kind, the kinds it
//!   requires and the byproducts it produces. Validated up front for cycles
//!   and dangling references.
//! - **Cost and order** ([`CostTable`]): a recursive fan-in weight used to
//!   build the heaviest sibling subtree first.
//! - **Degrees** ([`DegreeMap`]): outstanding consumers per kind.
//! - **Runs** ([`DependencyGraph`], [`construct_all`]): the request pre-pass
//!   and the depth-first evaluation that constructs, discards, unprotects and
//!   compresses.
//! - **Manager** ([`Manager`]): the owner of the actual payloads, driven by
//!   the scheduler. [`RecordingManager`] records calls for dry runs and tests.
//!
//! ## Quick Start
//!
//! ```rust
//! use understory_ds_graph::{
//!     construct_all, CompressMode, Provider, ProviderRegistry, RecordingManager,
//! };
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! enum Ds {
//!     SuffixArray,
//!     Phi,
//!     Plcp,
//!     Lcp,
//! }
//!
//! let mut registry = ProviderRegistry::new();
//! registry.register(Ds::SuffixArray, Provider::new());
//! registry.register(Ds::Phi, Provider::new().requires([Ds::SuffixArray]));
//! registry.register(Ds::Plcp, Provider::new().requires([Ds::Phi]));
//! registry.register(
//!     Ds::Lcp,
//!     Provider::new().requires([Ds::SuffixArray, Ds::Plcp]),
//! );
//!
//! let mut manager = RecordingManager::new();
//! let schedule = construct_all(&registry, &mut manager, &[Ds::Lcp], CompressMode::Delayed).unwrap();
//!
//! // The Phi/PLCP chain is descended before the bare suffix array branch.
//! assert_eq!(
//!     schedule.constructed(),
//!     &[Ds::SuffixArray, Ds::Phi, Ds::Plcp, Ds::Lcp]
//! );
//! // Every intermediate is gone; only the LCP array survives, compressed.
//! assert_eq!(manager.live().collect::<Vec<_>>(), vec![Ds::Lcp]);
//! assert!(manager.is_compressed(Ds::Lcp));
//! ```
//!
//! ## Compression Modes
//!
//! - [`CompressMode::Plain`]: build at full width, never shrink.
//! - [`CompressMode::Compressed`]: build everything at minimal width.
//! - [`CompressMode::Delayed`] (default): build at full width and shrink a
//!   requested kind in place once nothing but the client still needs it.
//!
//! ## Errors
//!
//! Nothing is recovered inside a run. A misconfigured registry is reported
//! as [`ConfigError`] before anything is built; inconsistent degree
//! bookkeeping aborts with [`InvariantError`]; a failing manager aborts with
//! [`ScheduleError::Manager`].
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Diagnostics go through `tracing`
//! with its default features disabled.

#![no_std]

extern crate alloc;

mod cost;
mod degree;
mod error;
mod graph;
mod id;
mod manager;
mod mode;
mod provider;
mod registry;
mod trace;

pub use cost::{CostTable, Order};
pub use degree::DegreeMap;
pub use error::{ConfigError, InvariantError, PhaseError, ScheduleError};
pub use graph::{DependencyGraph, Schedule, construct_all};
pub use id::DsId;
pub use manager::Manager;
pub use mode::{CompressMode, ParseCompressModeError};
pub use provider::Provider;
pub use registry::ProviderRegistry;
pub use trace::{InjectedFailure, LifecycleEvent, RecordingManager};
