// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provider registry.
//!
//! This module provides [`ProviderRegistry`], the read-only lookup from a kind
//! to its [`Provider`] descriptor, plus up-front validation of the whole
//! vocabulary.

use alloc::vec::Vec;

use hashbrown::HashMap;

use crate::error::ConfigError;
use crate::id::DsId;
use crate::provider::Provider;

/// DFS colouring used by cycle detection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// A registry of provider descriptors, one per data structure kind.
///
/// Providers are registered once at startup. The registry itself holds no
/// construction logic; it only answers "what does this kind need" and "what
/// else does building it produce".
///
/// # Example
///
/// ```rust
/// use understory_ds_graph::{Provider, ProviderRegistry};
///
/// let mut registry = ProviderRegistry::new();
/// registry.register('a', Provider::new());
/// registry.register('b', Provider::new().requires(['a']));
///
/// assert_eq!(registry.requirements('b'), &['a']);
/// assert!(registry.validate().is_ok());
/// ```
#[derive(Clone, Debug)]
pub struct ProviderRegistry<K> {
    providers: HashMap<K, Provider<K>>,
    /// Registration order, for deterministic validation and iteration.
    order: Vec<K>,
}

impl<K> Default for ProviderRegistry<K> {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<K: DsId> ProviderRegistry<K> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the provider for `kind`.
    ///
    /// # Panics
    ///
    /// Panics if `kind` already has a provider.
    pub fn register(&mut self, kind: K, provider: Provider<K>) {
        assert!(
            !self.providers.contains_key(&kind),
            "provider for {kind:?} is already registered"
        );
        self.providers.insert(kind, provider);
        self.order.push(kind);
    }

    /// Returns the number of registered kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if `kind` has a provider.
    #[must_use]
    pub fn contains(&self, kind: K) -> bool {
        self.providers.contains_key(&kind)
    }

    /// Returns the provider for `kind`, if registered.
    #[must_use]
    pub fn get(&self, kind: K) -> Option<&Provider<K>> {
        self.providers.get(&kind)
    }

    /// Iterates registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.order.iter().copied()
    }

    /// Returns the direct requirements of `kind`.
    ///
    /// Unregistered kinds have no requirements.
    #[must_use]
    pub fn requirements(&self, kind: K) -> &[K] {
        self.get(kind).map_or(&[][..], Provider::requirements)
    }

    /// Returns the byproducts of `kind`.
    ///
    /// Unregistered kinds have no byproducts.
    #[must_use]
    pub fn provides(&self, kind: K) -> &[K] {
        self.get(kind).map_or(&[][..], Provider::provides)
    }

    /// Checks that every referenced kind is registered and that no kind
    /// transitively requires itself.
    ///
    /// Kinds are checked in registration order, so the reported error is
    /// deterministic.
    pub fn validate(&self) -> Result<(), ConfigError<K>> {
        for &kind in &self.order {
            let provider = &self.providers[&kind];
            if let Some(&requirement) = provider
                .requirements()
                .iter()
                .find(|r| !self.contains(**r))
            {
                return Err(ConfigError::UnregisteredRequirement { kind, requirement });
            }
            if let Some(&byproduct) = provider.provides().iter().find(|b| !self.contains(**b)) {
                return Err(ConfigError::UnregisteredByproduct { kind, byproduct });
            }
        }

        let mut marks: HashMap<K, Mark> = HashMap::with_capacity(self.order.len());
        for &root in &self.order {
            if marks.contains_key(&root) {
                continue;
            }
            self.check_acyclic_from(root, &mut marks)?;
        }
        Ok(())
    }

    /// Validates the registry and checks that every requested kind is registered.
    pub fn validate_request(&self, requested: &[K]) -> Result<(), ConfigError<K>> {
        if let Some(&kind) = requested.iter().find(|k| !self.contains(**k)) {
            return Err(ConfigError::UnregisteredKind(kind));
        }
        self.validate()
    }

    /// Iterative DFS from `root` over requirement edges.
    ///
    /// The explicit stack holds `(kind, next requirement index)`; a kind found
    /// while still `Visiting` closes a cycle.
    fn check_acyclic_from(
        &self,
        root: K,
        marks: &mut HashMap<K, Mark>,
    ) -> Result<(), ConfigError<K>> {
        let mut stack: Vec<(K, usize)> = Vec::new();
        marks.insert(root, Mark::Visiting);
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let kind = top.0;
            let requirements = self.requirements(kind);
            if top.1 == requirements.len() {
                marks.insert(kind, Mark::Done);
                stack.pop();
                continue;
            }
            let requirement = requirements[top.1];
            top.1 += 1;

            match marks.get(&requirement) {
                Some(Mark::Done) => {}
                Some(Mark::Visiting) => {
                    let start = stack
                        .iter()
                        .position(|&(k, _)| k == requirement)
                        .unwrap_or(0);
                    let mut path: Vec<K> = stack[start..].iter().map(|&(k, _)| k).collect();
                    path.push(requirement);
                    return Err(ConfigError::Cycle { path });
                }
                None => {
                    marks.insert(requirement, Mark::Visiting);
                    stack.push((requirement, 0));
                }
            }
        }
        Ok(())
    }
}
