// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for registry validation and scheduler runs.

use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

/// The provider registry is inconsistent with itself or with a request.
///
/// These are detected by [`ProviderRegistry::validate`](crate::ProviderRegistry::validate)
/// before any construction starts.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConfigError<K: fmt::Debug> {
    /// A requested kind has no registered provider.
    #[error("no provider registered for {0:?}")]
    UnregisteredKind(K),
    /// A provider requires a kind that has no provider of its own.
    #[error("{kind:?} requires unregistered kind {requirement:?}")]
    UnregisteredRequirement {
        /// The kind whose provider declares the requirement.
        kind: K,
        /// The missing requirement.
        requirement: K,
    },
    /// A provider lists a byproduct that has no provider of its own.
    #[error("{kind:?} provides unregistered kind {byproduct:?}")]
    UnregisteredByproduct {
        /// The kind whose provider declares the byproduct.
        kind: K,
        /// The missing byproduct.
        byproduct: K,
    },
    /// A kind transitively requires itself.
    #[error("requirement cycle: {path:?}")]
    Cycle {
        /// The cycle, starting and ending with the same kind.
        path: Vec<K>,
    },
}

/// The degree bookkeeping disagrees with the graph actually walked.
///
/// This always indicates inconsistent static metadata; a run that hits it
/// is aborted.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum InvariantError<K: fmt::Debug> {
    /// A degree decrement was attempted for a kind that was never counted.
    #[error("decrease degree for orphan node {0:?}")]
    Orphan(K),
    /// A degree decrement was attempted for a kind with no consumers left.
    #[error("degree already zero for node {0:?}")]
    AlreadyZero(K),
}

/// A scheduler phase was run out of order.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    /// [`DependencyGraph::request`](crate::DependencyGraph::request) was called twice.
    #[error("request phase already completed")]
    AlreadyRequested,
    /// [`DependencyGraph::evaluate`](crate::DependencyGraph::evaluate) was
    /// called before the request phase.
    #[error("evaluation requires a completed request phase")]
    NotRequested,
    /// [`DependencyGraph::evaluate`](crate::DependencyGraph::evaluate) was called twice.
    #[error("evaluation phase already completed")]
    AlreadyEvaluated,
}

/// Any failure that aborts a scheduler run.
///
/// `E` is the error type of the [`Manager`](crate::Manager) driving the run.
#[derive(Debug, Error)]
pub enum ScheduleError<K, E>
where
    K: fmt::Debug,
    E: core::error::Error + 'static,
{
    /// The registry or the requested set is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError<K>),
    /// Degree bookkeeping was violated.
    #[error(transparent)]
    Invariant(#[from] InvariantError<K>),
    /// A phase was run out of order.
    #[error(transparent)]
    Phase(#[from] PhaseError),
    /// The manager failed while handling `kind`.
    #[error("manager failed on {kind:?}")]
    Manager {
        /// The kind being handled when the manager failed.
        kind: K,
        /// The manager's error.
        #[source]
        source: E,
    },
}

impl<K, E> ScheduleError<K, E>
where
    K: fmt::Debug,
    E: core::error::Error + 'static,
{
    pub(crate) fn manager(kind: K, source: E) -> Self {
        Self::Manager { kind, source }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn messages_name_the_offending_kind() {
        let e = InvariantError::Orphan("lcp");
        assert_eq!(e.to_string(), "decrease degree for orphan node \"lcp\"");

        let e = ConfigError::Cycle {
            path: vec!['x', 'x'],
        };
        assert_eq!(e.to_string(), "requirement cycle: ['x', 'x']");
    }
}
