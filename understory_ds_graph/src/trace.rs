// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A manager that records what the scheduler asked of it.
//!
//! [`RecordingManager`] owns no payloads. It logs every call as a
//! [`LifecycleEvent`] and tracks which kinds would be live, protected and
//! compressed. This is enough to dry-run a plan for a registry, or to assert
//! construction order and discard timing in tests without building anything.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;
use thiserror::Error;

use crate::id::DsId;
use crate::manager::Manager;

/// One call made by the scheduler on its manager.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleEvent<K> {
    /// [`Manager::ensure_provider`].
    EnsureProvider(K),
    /// [`Manager::construct`].
    Construct {
        /// The kind built.
        kind: K,
        /// Whether it was built at minimal width.
        compressed: bool,
    },
    /// [`Manager::discard`].
    Discard {
        /// The kind released.
        kind: K,
        /// Whether it was an intermediate.
        intermediate: bool,
    },
    /// [`Manager::protect`].
    Protect(K),
    /// [`Manager::unprotect`].
    Unprotect(K),
    /// [`Manager::compress`].
    Compress(K),
}

impl<K: Copy> LifecycleEvent<K> {
    /// Returns the kind this event is about.
    #[must_use]
    pub fn kind(&self) -> K {
        match *self {
            Self::EnsureProvider(kind)
            | Self::Protect(kind)
            | Self::Unprotect(kind)
            | Self::Compress(kind)
            | Self::Construct { kind, .. }
            | Self::Discard { kind, .. } => kind,
        }
    }
}

/// Failure injected into a [`RecordingManager`].
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("injected construction failure for {0:?}")]
pub struct InjectedFailure<K: fmt::Debug>(pub K);

/// Records scheduler calls and the resulting per-kind state.
///
/// # Example
///
/// ```
/// use understory_ds_graph::{construct_all, CompressMode, Provider, ProviderRegistry, RecordingManager};
///
/// let mut registry = ProviderRegistry::new();
/// registry.register("sa", Provider::new());
/// registry.register("bwt", Provider::new().requires(["sa"]));
///
/// let mut manager = RecordingManager::new();
/// construct_all(&registry, &mut manager, &["bwt"], CompressMode::Plain).unwrap();
///
/// assert!(manager.is_live("bwt"));
/// assert!(!manager.is_live("sa"));
/// assert_eq!(manager.construct_count("sa"), 1);
/// ```
#[derive(Clone, Debug)]
pub struct RecordingManager<K> {
    events: Vec<LifecycleEvent<K>>,
    live: HashSet<K>,
    protected: HashSet<K>,
    compressed: HashSet<K>,
    fail_on: Option<K>,
}

impl<K> Default for RecordingManager<K> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            live: HashSet::new(),
            protected: HashSet::new(),
            compressed: HashSet::new(),
            fail_on: None,
        }
    }
}

impl<K: DsId> RecordingManager<K> {
    /// Creates a manager with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`Manager::construct`] fail for `kind`.
    #[must_use]
    pub fn fail_construct_of(mut self, kind: K) -> Self {
        self.fail_on = Some(kind);
        self
    }

    /// Returns every recorded call, oldest first.
    #[must_use]
    pub fn events(&self) -> &[LifecycleEvent<K>] {
        &self.events
    }

    /// Returns `true` if `kind` was constructed (or produced) and not discarded.
    #[must_use]
    pub fn is_live(&self, kind: K) -> bool {
        self.live.contains(&kind)
    }

    /// Returns `true` if `kind` is currently protected.
    #[must_use]
    pub fn is_protected(&self, kind: K) -> bool {
        self.protected.contains(&kind)
    }

    /// Returns `true` if `kind` is live and at minimal width.
    #[must_use]
    pub fn is_compressed(&self, kind: K) -> bool {
        self.compressed.contains(&kind)
    }

    /// Returns the kinds currently live, in arbitrary order.
    pub fn live(&self) -> impl Iterator<Item = K> + '_ {
        self.live.iter().copied()
    }

    /// Returns the kinds in the order they were constructed.
    #[must_use]
    pub fn construction_order(&self) -> Vec<K> {
        self.events
            .iter()
            .filter_map(|e| match *e {
                LifecycleEvent::Construct { kind, .. } => Some(kind),
                _ => None,
            })
            .collect()
    }

    /// Returns the position of the first event matching `f`.
    pub fn position(&self, f: impl Fn(&LifecycleEvent<K>) -> bool) -> Option<usize> {
        self.events.iter().position(f)
    }

    /// Number of construct calls for `kind`.
    #[must_use]
    pub fn construct_count(&self, kind: K) -> usize {
        self.count(kind, |e| matches!(e, LifecycleEvent::Construct { .. }))
    }

    /// Number of discard calls for `kind`.
    #[must_use]
    pub fn discard_count(&self, kind: K) -> usize {
        self.count(kind, |e| matches!(e, LifecycleEvent::Discard { .. }))
    }

    /// Number of protect calls for `kind`.
    #[must_use]
    pub fn protect_count(&self, kind: K) -> usize {
        self.count(kind, |e| matches!(e, LifecycleEvent::Protect(_)))
    }

    /// Number of unprotect calls for `kind`.
    #[must_use]
    pub fn unprotect_count(&self, kind: K) -> usize {
        self.count(kind, |e| matches!(e, LifecycleEvent::Unprotect(_)))
    }

    /// Number of compress calls for `kind`.
    #[must_use]
    pub fn compress_count(&self, kind: K) -> usize {
        self.count(kind, |e| matches!(e, LifecycleEvent::Compress(_)))
    }

    fn count(&self, kind: K, f: impl Fn(&LifecycleEvent<K>) -> bool) -> usize {
        self.events
            .iter()
            .filter(|e| e.kind() == kind && f(*e))
            .count()
    }
}

impl<K: DsId> Manager<K> for RecordingManager<K> {
    type Error = InjectedFailure<K>;

    fn ensure_provider(&mut self, kind: K) -> Result<(), Self::Error> {
        self.events.push(LifecycleEvent::EnsureProvider(kind));
        Ok(())
    }

    fn construct(&mut self, kind: K, compressed: bool) -> Result<(), Self::Error> {
        if self.fail_on == Some(kind) {
            return Err(InjectedFailure(kind));
        }
        self.events
            .push(LifecycleEvent::Construct { kind, compressed });
        self.live.insert(kind);
        if compressed {
            self.compressed.insert(kind);
        }
        Ok(())
    }

    fn discard(&mut self, kind: K, intermediate: bool) {
        self.events
            .push(LifecycleEvent::Discard { kind, intermediate });
        self.live.remove(&kind);
        self.compressed.remove(&kind);
    }

    fn protect(&mut self, kind: K) {
        self.events.push(LifecycleEvent::Protect(kind));
        self.protected.insert(kind);
    }

    fn unprotect(&mut self, kind: K) {
        self.events.push(LifecycleEvent::Unprotect(kind));
        self.protected.remove(&kind);
    }

    fn compress(&mut self, kind: K) -> Result<(), Self::Error> {
        self.events.push(LifecycleEvent::Compress(kind));
        self.compressed.insert(kind);
        Ok(())
    }
}
