// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use tracing::{info, info_span};
use understory_ds_graph::{Manager, ProviderRegistry, Schedule, ScheduleError, construct_all};
use understory_int_vector::{IntVector, IntVectorError};

use crate::{DsKind, DsStore, MemoryStats, SlotFlags, TextDsConfig, TextDsError, registry};

/// Error type of [`TextDs`] construction runs.
pub type ConstructError = ScheduleError<DsKind, TextDsError>;

/// A text together with the index structures built over it.
///
/// Structures are built on demand through the dependency scheduler, so
/// intermediates are released as early as possible and results are
/// compressed according to the configured [`CompressMode`](understory_ds_graph::CompressMode).
///
/// # Example
///
/// ```
/// use understory_text_ds::{DsKind, TextDs};
///
/// let mut t = TextDs::new("banana").unwrap();
/// t.construct(&[DsKind::Lcp]).unwrap();
///
/// let lcp: Vec<u64> = t.get(DsKind::Lcp).unwrap().iter().collect();
/// assert_eq!(lcp, vec![0, 0, 1, 3, 0, 0, 2]);
///
/// // The suffix array, Phi and PLCP arrays were intermediates.
/// assert!(t.get(DsKind::SuffixArray).is_none());
/// ```
#[derive(Clone, Debug)]
pub struct TextDs {
    registry: ProviderRegistry<DsKind>,
    store: DsStore,
}

impl TextDs {
    /// Wraps `text` with the default configuration.
    ///
    /// A `0` sentinel is appended; the text itself must not contain `0`.
    pub fn new(text: impl Into<Vec<u8>>) -> Result<Self, TextDsError> {
        Self::with_config(text, TextDsConfig::default())
    }

    /// Wraps `text` with an explicit configuration.
    pub fn with_config(
        text: impl Into<Vec<u8>>,
        config: TextDsConfig,
    ) -> Result<Self, TextDsError> {
        let width = config.width();
        if !(1..=64).contains(&width) {
            return Err(IntVectorError::WidthOutOfRange(width).into());
        }

        let mut text = text.into();
        if let Some(position) = text.iter().position(|&c| c == 0) {
            return Err(TextDsError::SentinelInText { position });
        }
        text.push(0);

        Ok(Self {
            registry: registry(),
            store: DsStore::new(text, config),
        })
    }

    /// Returns the text, sentinel included.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        self.store.text()
    }

    /// Number of suffixes, which is the text length plus the sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.text().len()
    }

    /// Always `false`: the sentinel is a suffix of its own.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the construction settings.
    #[must_use]
    pub fn config(&self) -> &TextDsConfig {
        self.store.config()
    }

    /// Returns the underlying store.
    #[must_use]
    pub fn store(&self) -> &DsStore {
        &self.store
    }

    /// Builds `kinds` in one scheduler run.
    ///
    /// Held structures that the run needs, as a requirement or as a
    /// byproduct of one, are requested again so they are reused instead of
    /// rebuilt and stay live afterwards. Other held structures are left out
    /// of the run and untouched.
    pub fn construct(&mut self, kinds: &[DsKind]) -> Result<Schedule<DsKind>, ConstructError> {
        let mut requested = kinds.to_vec();
        requested.extend(self.held_in_run(kinds));
        let mode = self.config().mode();

        let _span = info_span!("construct_all", ?requested, %mode).entered();
        self.store.begin_run();
        let schedule = construct_all(&self.registry, &mut self.store, &requested, mode)?;

        let stats = self.store.stats();
        info!(
            current_bytes = stats.current_bytes,
            peak_bytes = stats.peak_bytes,
            "construction complete"
        );
        Ok(schedule)
    }

    /// Live kinds, other than `kinds`, that a run for `kinds` would touch.
    fn held_in_run(&self, kinds: &[DsKind]) -> Vec<DsKind> {
        let mut touched = [false; DsKind::ALL.len()];
        let mut stack = kinds.to_vec();
        while let Some(kind) = stack.pop() {
            if core::mem::replace(&mut touched[kind.index()], true) {
                continue;
            }
            stack.extend_from_slice(self.registry.requirements(kind));
        }
        for kind in DsKind::ALL {
            if touched[kind.index()] {
                for &byproduct in self.registry.provides(kind) {
                    touched[byproduct.index()] = true;
                }
            }
        }
        DsKind::ALL
            .into_iter()
            .filter(|&k| touched[k.index()] && self.store.is_live(k) && !kinds.contains(&k))
            .collect()
    }

    /// Returns `kind`, building it first if it is not live.
    pub fn require(&mut self, kind: DsKind) -> Result<&IntVector, ConstructError> {
        if !self.store.is_live(kind) {
            self.construct(&[kind])?;
        }
        self.store.get(kind).ok_or(ScheduleError::Manager {
            kind,
            source: TextDsError::Missing(kind),
        })
    }

    /// Returns `kind` if it is live.
    #[must_use]
    pub fn get(&self, kind: DsKind) -> Option<&IntVector> {
        self.store.get(kind)
    }

    /// Removes `kind` and hands ownership to the caller.
    pub fn take(&mut self, kind: DsKind) -> Option<IntVector> {
        self.store.take(kind)
    }

    /// Shrinks a live `kind` to its minimal width.
    ///
    /// Compressing an already compressed structure does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TextDsError::Missing`] if `kind` is not live.
    pub fn compress(&mut self, kind: DsKind) -> Result<(), TextDsError> {
        Manager::compress(&mut self.store, kind)
    }

    /// Returns the state flags of `kind`.
    #[must_use]
    pub fn flags(&self, kind: DsKind) -> SlotFlags {
        self.store.flags(kind)
    }

    /// Returns the current and peak heap usage of the held structures.
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        self.store.stats()
    }

    /// Starts a new peak measurement from the current usage.
    pub fn reset_peak(&mut self) {
        self.store.stats_mut().reset_peak();
    }
}
