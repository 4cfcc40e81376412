// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static provider descriptors.

use smallvec::SmallVec;

/// Inline capacity for requirement lists.
///
/// Text index kinds rarely need more than two inputs.
const INLINE_REQUIREMENTS: usize = 4;

/// Inline capacity for byproduct lists.
const INLINE_PROVIDES: usize = 2;

/// Static metadata describing how one data structure kind is produced.
///
/// A provider lists the kinds it needs as input ([`requirements`](Self::requirements))
/// and the kinds that are incidentally materialized while it runs
/// ([`provides`](Self::provides)). Both lists keep declaration order, which
/// is also the tie-break order used by
/// [`CostTable::construction_order`](crate::CostTable::construction_order).
///
/// Duplicate entries are ignored when building.
///
/// # Example
///
/// ```
/// use understory_ds_graph::Provider;
///
/// let lcp = Provider::new().requires(["sa", "plcp"]);
/// assert_eq!(lcp.requirements(), &["sa", "plcp"]);
/// assert!(lcp.provides().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider<K> {
    requirements: SmallVec<[K; INLINE_REQUIREMENTS]>,
    provides: SmallVec<[K; INLINE_PROVIDES]>,
}

impl<K> Default for Provider<K> {
    fn default() -> Self {
        Self {
            requirements: SmallVec::new(),
            provides: SmallVec::new(),
        }
    }
}

impl<K: PartialEq> Provider<K> {
    /// Creates a provider with no requirements and no byproducts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds direct requirements, in order.
    #[must_use]
    pub fn requires(mut self, kinds: impl IntoIterator<Item = K>) -> Self {
        for kind in kinds {
            if !self.requirements.contains(&kind) {
                self.requirements.push(kind);
            }
        }
        self
    }

    /// Adds byproducts, in order.
    #[must_use]
    pub fn byproducts(mut self, kinds: impl IntoIterator<Item = K>) -> Self {
        for kind in kinds {
            if !self.provides.contains(&kind) {
                self.provides.push(kind);
            }
        }
        self
    }
}

impl<K> Provider<K> {
    /// Returns the direct requirements in declaration order.
    #[must_use]
    #[inline]
    pub fn requirements(&self) -> &[K] {
        &self.requirements
    }

    /// Returns the byproducts in declaration order.
    #[must_use]
    #[inline]
    pub fn provides(&self) -> &[K] {
        &self.provides
    }

    /// Returns the number of direct requirements.
    ///
    /// This is the node's in-degree in the dependency graph.
    #[must_use]
    #[inline]
    pub fn in_degree(&self) -> usize {
        self.requirements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_dedups_and_keeps_order() {
        let p = Provider::new().requires([3, 1, 3, 2]).byproducts([7, 7]);
        assert_eq!(p.requirements(), &[3, 1, 2]);
        assert_eq!(p.provides(), &[7]);
        assert_eq!(p.in_degree(), 3);
    }

    #[test]
    fn leaf_has_zero_in_degree() {
        let p = Provider::<u8>::new();
        assert_eq!(p.in_degree(), 0);
        assert!(p.requirements().is_empty());
    }
}
