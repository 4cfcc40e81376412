// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cost heuristic and sibling construction order.
//!
//! The cost of a kind approximates how much construction work hangs off it:
//!
//! ```text
//! cost(k) = in_degree(k) + sum(cost(r) for r in requirements(k))
//! ```
//!
//! A kind reachable through several paths is counted once per path. The value
//! is only used to rank siblings, so the only property that matters is that it
//! is deterministic.
//!
//! Siblings are built in descending cost order. The heaviest subtree is then
//! fully built and torn down before a cheaper sibling starts, which keeps the
//! number of simultaneously live intermediates low.

use core::cell::RefCell;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::id::DsId;
use crate::registry::ProviderRegistry;

/// Inline capacity of a computed order.
const INLINE_ORDER: usize = 8;

/// A construction order for a set of siblings, highest cost first.
pub type Order<K> = SmallVec<[K; INLINE_ORDER]>;

/// Memoized cost lookups over a [`ProviderRegistry`].
///
/// Costs are a pure function of the registry, so they are computed once per
/// kind and cached. Orders are cheap to derive from the cached costs and are
/// recomputed on every call.
///
/// The registry must be acyclic (see [`ProviderRegistry::validate`]); the
/// recursion otherwise does not terminate.
///
/// # Example
///
/// ```
/// use understory_ds_graph::{CostTable, Provider, ProviderRegistry};
///
/// let mut registry = ProviderRegistry::new();
/// registry.register('a', Provider::new());
/// registry.register('b', Provider::new().requires(['a']));
/// registry.register('c', Provider::new().requires(['a', 'b']));
///
/// let costs = CostTable::new(&registry);
/// assert_eq!(costs.cost('a'), 0);
/// assert_eq!(costs.cost('b'), 1);
/// assert_eq!(costs.cost('c'), 3);
/// assert_eq!(costs.construction_order(&['a', 'b', 'c']).as_slice(), &['c', 'b', 'a']);
/// ```
#[derive(Debug)]
pub struct CostTable<'r, K> {
    registry: &'r ProviderRegistry<K>,
    memo: RefCell<HashMap<K, usize>>,
}

impl<'r, K: DsId> CostTable<'r, K> {
    /// Creates an empty cost table over `registry`.
    #[must_use]
    pub fn new(registry: &'r ProviderRegistry<K>) -> Self {
        Self {
            registry,
            memo: RefCell::new(HashMap::with_capacity(registry.len())),
        }
    }

    /// Returns the registry this table reads from.
    #[must_use]
    pub fn registry(&self) -> &'r ProviderRegistry<K> {
        self.registry
    }

    /// Returns the number of direct requirements of `kind`.
    #[must_use]
    pub fn in_degree(&self, kind: K) -> usize {
        self.registry.requirements(kind).len()
    }

    /// Returns the cost of `kind`.
    #[must_use]
    pub fn cost(&self, kind: K) -> usize {
        if let Some(&cost) = self.memo.borrow().get(&kind) {
            return cost;
        }
        let cost = self.in_degree(kind)
            + self
                .registry
                .requirements(kind)
                .iter()
                .map(|&r| self.cost(r))
                .sum::<usize>();
        self.memo.borrow_mut().insert(kind, cost);
        cost
    }

    /// Orders `siblings` by descending cost.
    ///
    /// The sort is stable: siblings of equal cost keep their given order.
    #[must_use]
    pub fn construction_order(&self, siblings: &[K]) -> Order<K> {
        let mut order: Order<K> = siblings.iter().copied().collect();
        order.sort_by_cached_key(|&k| core::cmp::Reverse(self.cost(k)));
        order
    }

    /// Orders the direct requirements of `kind` by descending cost.
    #[must_use]
    pub fn dependency_order(&self, kind: K) -> Order<K> {
        self.construction_order(self.registry.requirements(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;

    /// Text index shaped registry.
    fn text_registry() -> ProviderRegistry<&'static str> {
        let mut r = ProviderRegistry::new();
        r.register("sa", Provider::new().byproducts(["isa"]));
        r.register("isa", Provider::new().requires(["sa"]));
        r.register("phi", Provider::new().requires(["sa"]));
        r.register("plcp", Provider::new().requires(["phi"]));
        r.register("lcp", Provider::new().requires(["sa", "plcp"]));
        r.register("bwt", Provider::new().requires(["sa"]));
        r
    }

    #[test]
    fn leaf_cost_is_in_degree() {
        let r = text_registry();
        let costs = CostTable::new(&r);
        assert_eq!(costs.in_degree("sa"), 0);
        assert_eq!(costs.cost("sa"), 0);
    }

    #[test]
    fn cost_accumulates_recursively() {
        let r = text_registry();
        let costs = CostTable::new(&r);
        assert_eq!(costs.cost("phi"), 1);
        assert_eq!(costs.cost("plcp"), 2);
        // 2 (own requirements) + cost(sa) 0 + cost(plcp) 2
        assert_eq!(costs.cost("lcp"), 4);
        assert_eq!(costs.cost("bwt"), 1);
    }

    #[test]
    fn shared_ancestors_are_counted_per_path() {
        let mut r = ProviderRegistry::new();
        r.register(0_u8, Provider::new());
        r.register(1, Provider::new().requires([0]));
        r.register(2, Provider::new().requires([0]));
        r.register(3, Provider::new().requires([1, 2]));
        let costs = CostTable::new(&r);
        // 2 + cost(1) + cost(2)
        assert_eq!(costs.cost(3), 4);
    }

    #[test]
    fn order_is_descending_and_stable() {
        let r = text_registry();
        let costs = CostTable::new(&r);
        let order = costs.construction_order(&["bwt", "isa", "lcp", "phi"]);
        // bwt, isa and phi all cost 1 and keep their relative order.
        assert_eq!(order.as_slice(), &["lcp", "bwt", "isa", "phi"]);
        assert_eq!(costs.dependency_order("lcp").as_slice(), &["plcp", "sa"]);
    }

    #[test]
    fn order_of_nothing_is_empty() {
        let r = text_registry();
        let costs = CostTable::new(&r);
        assert!(costs.construction_order(&[]).is_empty());
        assert!(costs.dependency_order("sa").is_empty());
    }
}
