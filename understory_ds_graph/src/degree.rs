// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outstanding-consumer counts per kind.

use hashbrown::HashMap;

use crate::error::InvariantError;
use crate::id::DsId;

/// Number of not-yet-satisfied consumers per kind.
///
/// A consumer is either a kind that requires this one, or the client itself
/// for requested kinds. Counts only go up during the request phase and only go
/// down during evaluation. A kind absent from the map was never reached by a
/// requirement path.
///
/// # Example
///
/// ```
/// use understory_ds_graph::{DegreeMap, InvariantError};
///
/// let mut degrees = DegreeMap::new();
/// assert_eq!(degrees.increment('a'), 0);
/// assert_eq!(degrees.increment('a'), 1);
/// assert_eq!(degrees.decrement('a'), Ok(1));
/// assert_eq!(degrees.decrement('a'), Ok(0));
/// assert_eq!(degrees.decrement('a'), Err(InvariantError::AlreadyZero('a')));
/// assert_eq!(degrees.decrement('b'), Err(InvariantError::Orphan('b')));
/// ```
#[derive(Clone, Debug)]
pub struct DegreeMap<K> {
    degrees: HashMap<K, usize>,
}

impl<K> Default for DegreeMap<K> {
    fn default() -> Self {
        Self {
            degrees: HashMap::new(),
        }
    }
}

impl<K: DsId> DegreeMap<K> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the degree of `kind`, or `None` if it was never counted.
    #[must_use]
    pub fn get(&self, kind: K) -> Option<usize> {
        self.degrees.get(&kind).copied()
    }

    /// Returns the degree of `kind`, treating absent kinds as zero.
    #[must_use]
    pub fn degree(&self, kind: K) -> usize {
        self.get(kind).unwrap_or(0)
    }

    /// Returns `true` if `kind` was reached by a requirement path.
    #[must_use]
    pub fn contains(&self, kind: K) -> bool {
        self.degrees.contains_key(&kind)
    }

    /// Adds one consumer to `kind` and returns the previous degree.
    ///
    /// A previous degree of zero means this is the kind's first occurrence.
    pub fn increment(&mut self, kind: K) -> usize {
        let degree = self.degrees.entry(kind).or_insert(0);
        let previous = *degree;
        *degree += 1;
        previous
    }

    /// Removes one consumer from `kind` and returns the remaining degree.
    pub fn decrement(&mut self, kind: K) -> Result<usize, InvariantError<K>> {
        let degree = self
            .degrees
            .get_mut(&kind)
            .ok_or(InvariantError::Orphan(kind))?;
        if *degree == 0 {
            return Err(InvariantError::AlreadyZero(kind));
        }
        *degree -= 1;
        Ok(*degree)
    }

    /// Returns the number of counted kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.degrees.len()
    }

    /// Returns `true` if no kind has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty()
    }

    /// Returns the sum of all degrees.
    #[must_use]
    pub fn total(&self) -> usize {
        self.degrees.values().sum()
    }

    /// Iterates `(kind, degree)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (K, usize)> + '_ {
        self.degrees.iter().map(|(&k, &d)| (k, d))
    }
}
