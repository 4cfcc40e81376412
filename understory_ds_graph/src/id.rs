// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data structure kind identifiers.

use core::fmt;
use core::hash::Hash;

/// Identifier for one kind of derived data structure.
///
/// Hosts declare their closed vocabulary once, usually as a fieldless enum,
/// and use it as the key type of every scheduler structure. Any `'static` type
/// that is `Copy + Eq + Hash + Debug` qualifies; the trait is implemented
/// automatically.
///
/// # Example
///
/// ```
/// use understory_ds_graph::DsId;
///
/// #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// enum Ds {
///     SuffixArray,
///     Lcp,
/// }
///
/// fn takes_id<K: DsId>(_: K) {}
/// takes_id(Ds::Lcp);
/// ```
pub trait DsId: Copy + Eq + Hash + fmt::Debug + 'static {}

impl<T> DsId for T where T: Copy + Eq + Hash + fmt::Debug + 'static {}
