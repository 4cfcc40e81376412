// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Request and evaluation phases of a scheduler run.

use alloc::vec::Vec;

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::{debug, debug_span, trace};

use crate::cost::CostTable;
use crate::degree::DegreeMap;
use crate::error::{ConfigError, PhaseError, ScheduleError};
use crate::id::DsId;
use crate::manager::Manager;
use crate::mode::CompressMode;
use crate::registry::ProviderRegistry;

/// Inline capacity for the requested set.
const INLINE_REQUESTED: usize = 8;

/// Where a [`DependencyGraph`] is in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Fresh,
    Requested,
    Evaluated,
}

/// What an evaluation did, in event order.
///
/// `compressed` lists only explicit delayed compressions; under
/// [`CompressMode::Compressed`] every kind is built compressed and nothing is
/// listed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule<K> {
    constructed: Vec<K>,
    discarded: Vec<K>,
    compressed: Vec<K>,
    peak_live: usize,
}

impl<K> Default for Schedule<K> {
    fn default() -> Self {
        Self {
            constructed: Vec::new(),
            discarded: Vec::new(),
            compressed: Vec::new(),
            peak_live: 0,
        }
    }
}

impl<K> Schedule<K> {
    /// Kinds in the order they were constructed.
    #[must_use]
    pub fn constructed(&self) -> &[K] {
        &self.constructed
    }

    /// Kinds in the order they were discarded, byproducts included.
    #[must_use]
    pub fn discarded(&self) -> &[K] {
        &self.discarded
    }

    /// Kinds in the order they were compressed after construction.
    #[must_use]
    pub fn compressed(&self) -> &[K] {
        &self.compressed
    }

    /// Largest number of scheduled kinds alive at the same time.
    ///
    /// Byproducts discarded right after their producer are not counted.
    #[must_use]
    pub fn peak_live(&self) -> usize {
        self.peak_live
    }
}

/// One scheduler run over a fixed requested set.
///
/// The graph contains a node per relevant kind: requested kinds and
/// everything they transitively require. Kinds that are only ever produced as
/// byproducts have no node. Edges point from a requirement to the kind that
/// needs it; requested kinds additionally have an edge to the client.
///
/// A run has two phases:
///
/// 1. [`request`](Self::request) walks every requirement path once and counts,
///    per kind, the distinct edges leaving it (its degree). Kinds with more
///    than one consumer are protected.
/// 2. [`evaluate`](Self::evaluate) builds kinds depth-first, siblings in
///    descending [cost](CostTable::cost) order. After each construction the
///    degree of every direct requirement drops by one; a requirement with no
///    consumers left is discarded, one with a single non-client consumer left
///    is unprotected. Byproducts without a node are discarded immediately.
///
/// Under [`CompressMode::Delayed`], a requested kind is compressed once the
/// client is its only remaining consumer.
///
/// # Example
///
/// ```
/// use understory_ds_graph::{
///     CompressMode, DependencyGraph, Provider, ProviderRegistry, RecordingManager,
/// };
///
/// let mut registry = ProviderRegistry::new();
/// registry.register('a', Provider::new());
/// registry.register('b', Provider::new().requires(['a']));
/// registry.register('c', Provider::new().requires(['a']));
///
/// let mut manager = RecordingManager::new();
/// let mut graph = DependencyGraph::new(&registry, &['b', 'c'], CompressMode::Plain).unwrap();
/// graph.request(&mut manager).unwrap();
/// assert_eq!(graph.degree('a'), 2);
/// assert!(graph.is_protected('a'));
///
/// let schedule = graph.evaluate(&mut manager).unwrap();
/// assert_eq!(schedule.constructed(), &['a', 'b', 'c']);
/// assert_eq!(schedule.discarded(), &['a']);
/// assert!(manager.is_live('b') && manager.is_live('c'));
/// ```
#[derive(Debug)]
pub struct DependencyGraph<'r, K> {
    costs: CostTable<'r, K>,
    requested: SmallVec<[K; INLINE_REQUESTED]>,
    mode: CompressMode,
    degrees: DegreeMap<K>,
    protected: HashSet<K>,
    constructed: HashSet<K>,
    compressed: HashSet<K>,
    schedule: Schedule<K>,
    live: usize,
    phase: Phase,
}

impl<'r, K: DsId> DependencyGraph<'r, K> {
    /// Prepares a run for `requested` over `registry`.
    ///
    /// Duplicate requested kinds are ignored. The registry is validated
    /// first, so a cyclic or incomplete registry never reaches evaluation.
    pub fn new(
        registry: &'r ProviderRegistry<K>,
        requested: &[K],
        mode: CompressMode,
    ) -> Result<Self, ConfigError<K>> {
        registry.validate_request(requested)?;

        let mut unique: SmallVec<[K; INLINE_REQUESTED]> = SmallVec::new();
        for &kind in requested {
            if !unique.contains(&kind) {
                unique.push(kind);
            }
        }

        Ok(Self {
            costs: CostTable::new(registry),
            requested: unique,
            mode,
            degrees: DegreeMap::new(),
            protected: HashSet::new(),
            constructed: HashSet::new(),
            compressed: HashSet::new(),
            schedule: Schedule::default(),
            live: 0,
            phase: Phase::Fresh,
        })
    }

    /// Returns the requested kinds, deduplicated, in the given order.
    #[must_use]
    pub fn requested(&self) -> &[K] {
        &self.requested
    }

    /// Returns the compress mode of this run.
    #[must_use]
    pub fn mode(&self) -> CompressMode {
        self.mode
    }

    /// Returns the cost table used for ordering.
    #[must_use]
    pub fn costs(&self) -> &CostTable<'r, K> {
        &self.costs
    }

    /// Returns the degree map.
    #[must_use]
    pub fn degrees(&self) -> &DegreeMap<K> {
        &self.degrees
    }

    /// Returns the current degree of `kind` (zero if it has no node).
    #[must_use]
    pub fn degree(&self, kind: K) -> usize {
        self.degrees.degree(kind)
    }

    /// Returns `true` if `kind` was requested by the client.
    #[must_use]
    pub fn is_requested(&self, kind: K) -> bool {
        self.requested.contains(&kind)
    }

    /// Returns `true` if `kind` is currently protected.
    #[must_use]
    pub fn is_protected(&self, kind: K) -> bool {
        self.protected.contains(&kind)
    }

    /// Returns `true` if `kind` has been constructed in this run.
    #[must_use]
    pub fn is_constructed(&self, kind: K) -> bool {
        self.constructed.contains(&kind)
    }

    /// Runs the request phase: sizes degrees and flags shared kinds.
    ///
    /// A kind's requirements are walked on its first occurrence only, so each
    /// degree ends up as the number of distinct consumers of that kind.
    pub fn request<M>(&mut self, manager: &mut M) -> Result<(), ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        if self.phase != Phase::Fresh {
            return Err(PhaseError::AlreadyRequested.into());
        }
        let _span = debug_span!("request", requested = ?self.requested.as_slice()).entered();

        let requested = self.requested.clone();
        for kind in requested {
            self.request_kind(kind, manager)?;
        }

        self.phase = Phase::Requested;
        debug!(nodes = self.degrees.len(), edges = self.degrees.total(), "request complete");
        Ok(())
    }

    fn request_kind<M>(
        &mut self,
        kind: K,
        manager: &mut M,
    ) -> Result<(), ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        manager
            .ensure_provider(kind)
            .map_err(|e| ScheduleError::manager(kind, e))?;

        if !self.degrees.contains(kind) {
            let registry = self.costs.registry();
            for &requirement in registry.requirements(kind) {
                self.request_kind(requirement, manager)?;
            }
        }

        let previous = self.degrees.increment(kind);
        trace!(?kind, degree = previous + 1, "count consumer");
        if previous == 1 && self.protected.insert(kind) {
            debug!(?kind, "protect");
            manager.protect(kind);
        }
        Ok(())
    }

    /// Runs the evaluation phase and returns what it did.
    ///
    /// On success every requested kind is live; every other scheduled kind
    /// has been discarded.
    pub fn evaluate<M>(
        &mut self,
        manager: &mut M,
    ) -> Result<Schedule<K>, ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        match self.phase {
            Phase::Fresh => return Err(PhaseError::NotRequested.into()),
            Phase::Evaluated => return Err(PhaseError::AlreadyEvaluated.into()),
            Phase::Requested => {}
        }
        let _span = debug_span!("evaluate", mode = %self.mode).entered();

        for kind in self.costs.construction_order(&self.requested) {
            self.construct_recursive(kind, true, manager)?;
        }

        self.phase = Phase::Evaluated;
        let schedule = core::mem::take(&mut self.schedule);
        debug!(
            constructed = schedule.constructed.len(),
            discarded = schedule.discarded.len(),
            peak_live = schedule.peak_live,
            "evaluation complete"
        );
        Ok(schedule)
    }

    fn construct_recursive<M>(
        &mut self,
        kind: K,
        top_level: bool,
        manager: &mut M,
    ) -> Result<(), ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        if self.constructed.contains(&kind) {
            return Ok(());
        }

        for dependency in self.costs.dependency_order(kind) {
            self.construct_recursive(dependency, false, manager)?;
        }

        let compressed = self.mode == CompressMode::Compressed;
        debug!(?kind, compressed, "construct");
        manager
            .construct(kind, compressed)
            .map_err(|e| ScheduleError::manager(kind, e))?;
        self.constructed.insert(kind);
        self.schedule.constructed.push(kind);
        self.live += 1;
        self.schedule.peak_live = self.schedule.peak_live.max(self.live);

        let registry = self.costs.registry();
        for &byproduct in registry.provides(kind) {
            // No consumer left, either never scheduled or already released.
            if self.degrees.degree(byproduct) == 0 {
                debug!(?byproduct, producer = ?kind, "discard byproduct");
                manager.discard(byproduct, true);
                self.schedule.discarded.push(byproduct);
            }
        }

        for &requirement in registry.requirements(kind) {
            self.release(requirement, manager)?;
        }

        if self.mode == CompressMode::Delayed && top_level {
            self.possibly_compress(kind, manager)?;
        }
        Ok(())
    }

    /// Drops one consumer of `kind` after a dependent was constructed.
    ///
    /// A kind that is not requested is unprotected when its last consumer
    /// remains. Degrees only fall during evaluation, so such a kind had at
    /// least two consumers and was protected by the request phase.
    fn release<M>(&mut self, kind: K, manager: &mut M) -> Result<(), ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        let remaining = self.degrees.decrement(kind)?;
        trace!(?kind, degree = remaining, "release consumer");

        if remaining == 0 {
            debug!(?kind, "discard");
            manager.discard(kind, !self.is_requested(kind));
            self.protected.remove(&kind);
            self.live -= 1;
            self.schedule.discarded.push(kind);
        } else if self.mode == CompressMode::Delayed {
            self.possibly_compress(kind, manager)?;
        }

        if remaining == 1 && !self.is_requested(kind) {
            self.protected.remove(&kind);
            debug!(?kind, "unprotect");
            manager.unprotect(kind);
        }
        Ok(())
    }

    /// Compresses `kind` if the client is its only remaining consumer.
    fn possibly_compress<M>(
        &mut self,
        kind: K,
        manager: &mut M,
    ) -> Result<(), ScheduleError<K, M::Error>>
    where
        M: Manager<K>,
    {
        if self.is_requested(kind) && self.degree(kind) == 1 && self.compressed.insert(kind) {
            debug!(?kind, "compress");
            manager
                .compress(kind)
                .map_err(|e| ScheduleError::manager(kind, e))?;
            self.schedule.compressed.push(kind);
        }
        Ok(())
    }
}

/// Constructs `requested` through `manager` in memory-peak aware order.
///
/// This runs the request phase followed by the evaluation phase. After it
/// returns, every requested kind is live in `manager`, compressed according to
/// `mode`.
///
/// # Example
///
/// ```
/// use understory_ds_graph::{construct_all, CompressMode, Provider, ProviderRegistry, RecordingManager};
///
/// let mut registry = ProviderRegistry::new();
/// registry.register('a', Provider::new());
/// registry.register('b', Provider::new().requires(['a']));
///
/// let mut manager = RecordingManager::new();
/// let schedule = construct_all(&registry, &mut manager, &['b'], CompressMode::Delayed).unwrap();
/// assert_eq!(schedule.constructed(), &['a', 'b']);
/// assert_eq!(schedule.discarded(), &['a']);
/// assert_eq!(schedule.compressed(), &['b']);
/// ```
pub fn construct_all<K, M>(
    registry: &ProviderRegistry<K>,
    manager: &mut M,
    requested: &[K],
    mode: CompressMode,
) -> Result<Schedule<K>, ScheduleError<K, M::Error>>
where
    K: DsId,
    M: Manager<K>,
{
    let mut graph = DependencyGraph::new(registry, requested, mode)?;
    graph.request(manager)?;
    graph.evaluate(manager)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvariantError;
    use crate::provider::Provider;
    use crate::trace::{LifecycleEvent, RecordingManager};
    use alloc::vec;

    fn abc() -> ProviderRegistry<char> {
        let mut r = ProviderRegistry::new();
        r.register('a', Provider::new());
        r.register('b', Provider::new().requires(['a']));
        r.register('c', Provider::new().requires(['a']));
        r
    }

    #[test]
    fn request_counts_distinct_consumers() {
        let r = abc();
        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['b', 'c'], CompressMode::Plain).unwrap();
        g.request(&mut m).unwrap();

        assert_eq!(g.degree('a'), 2);
        assert_eq!(g.degree('b'), 1);
        assert_eq!(g.degree('c'), 1);
        assert!(g.is_protected('a'));
        assert!(!g.is_protected('b'));
        assert_eq!(m.protect_count('a'), 1);
    }

    #[test]
    fn shared_subtree_is_walked_once() {
        // z <- a <- {b, c}
        let mut r = ProviderRegistry::new();
        r.register('z', Provider::new());
        r.register('a', Provider::new().requires(['z']));
        r.register('b', Provider::new().requires(['a']));
        r.register('c', Provider::new().requires(['a']));

        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['b', 'c'], CompressMode::Plain).unwrap();
        g.request(&mut m).unwrap();
        assert_eq!(g.degree('a'), 2);
        assert_eq!(g.degree('z'), 1);

        let s = g.evaluate(&mut m).unwrap();
        assert_eq!(s.constructed(), &['z', 'a', 'b', 'c']);
        assert_eq!(s.discarded(), &['z', 'a']);
        assert_eq!(g.degree('z'), 0);
        assert_eq!(g.degree('a'), 0);
    }

    #[test]
    fn unprotects_when_one_consumer_remains() {
        let r = abc();
        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['b', 'c'], CompressMode::Plain).unwrap();
        g.request(&mut m).unwrap();
        g.evaluate(&mut m).unwrap();

        let a_events: Vec<_> = m
            .events()
            .iter()
            .filter(|e| e.kind() == 'a')
            .copied()
            .collect();
        assert_eq!(
            a_events,
            vec![
                LifecycleEvent::EnsureProvider('a'),
                LifecycleEvent::EnsureProvider('a'),
                LifecycleEvent::Protect('a'),
                LifecycleEvent::Construct {
                    kind: 'a',
                    compressed: false
                },
                LifecycleEvent::Unprotect('a'),
                LifecycleEvent::Discard {
                    kind: 'a',
                    intermediate: true
                },
            ]
        );
    }

    #[test]
    fn requested_requirement_stays_protected_and_live() {
        // b requires a, both requested.
        let r = abc();
        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['a', 'b'], CompressMode::Plain).unwrap();
        g.request(&mut m).unwrap();
        assert_eq!(g.degree('a'), 2);

        let s = g.evaluate(&mut m).unwrap();
        assert_eq!(s.constructed(), &['a', 'b']);
        assert!(s.discarded().is_empty());
        assert_eq!(g.degree('a'), 1);
        assert!(g.is_protected('a'));
        assert_eq!(m.unprotect_count('a'), 0);
        assert!(m.is_live('a'));
    }

    #[test]
    fn delayed_compression_waits_for_last_intermediate_consumer() {
        let r = abc();
        let mut m = RecordingManager::new();
        let s = construct_all(&r, &mut m, &['a', 'b', 'c'], CompressMode::Delayed).unwrap();

        // a is compressed right after c, its last intermediate consumer.
        assert_eq!(s.compressed(), &['b', 'a', 'c']);
        assert!(m.is_compressed('a'));
        assert_eq!(m.compress_count('a'), 1);
    }

    #[test]
    fn compressed_mode_builds_everything_compressed() {
        let r = abc();
        let mut m = RecordingManager::new();
        let s = construct_all(&r, &mut m, &['b', 'c'], CompressMode::Compressed).unwrap();
        assert!(s.compressed().is_empty());
        assert!(m.events().iter().all(|e| match *e {
            LifecycleEvent::Construct { compressed, .. } => compressed,
            LifecycleEvent::Compress(_) => false,
            _ => true,
        }));
    }

    #[test]
    fn phases_must_run_in_order() {
        let r = abc();
        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['b'], CompressMode::Plain).unwrap();
        assert!(matches!(
            g.evaluate(&mut m),
            Err(ScheduleError::Phase(PhaseError::NotRequested))
        ));
        g.request(&mut m).unwrap();
        assert!(matches!(
            g.request(&mut m),
            Err(ScheduleError::Phase(PhaseError::AlreadyRequested))
        ));
        g.evaluate(&mut m).unwrap();
        assert!(matches!(
            g.evaluate(&mut m),
            Err(ScheduleError::Phase(PhaseError::AlreadyEvaluated))
        ));
    }

    #[test]
    fn release_of_uncounted_kind_is_an_invariant_violation() {
        let r = abc();
        let mut m = RecordingManager::new();
        let mut g = DependencyGraph::new(&r, &['b'], CompressMode::Plain).unwrap();
        g.request(&mut m).unwrap();
        assert!(matches!(
            g.release('c', &mut m),
            Err(ScheduleError::Invariant(InvariantError::Orphan('c')))
        ));
    }

    #[test]
    fn duplicate_requests_are_ignored() {
        let r = abc();
        let g = DependencyGraph::new(&r, &['b', 'b', 'c', 'b'], CompressMode::Plain).unwrap();
        assert_eq!(g.requested(), &['b', 'c']);
    }

    #[test]
    fn cyclic_registry_is_rejected_up_front() {
        let mut r = ProviderRegistry::new();
        r.register('x', Provider::new().requires(['x']));
        assert!(matches!(
            DependencyGraph::new(&r, &['x'], CompressMode::Plain),
            Err(ConfigError::Cycle { .. })
        ));
    }
}
