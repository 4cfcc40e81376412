// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Slot storage for the built structures and the scheduler callbacks.

use alloc::vec::Vec;

use tracing::{debug, info, info_span, trace};
use understory_ds_graph::Manager;
use understory_int_vector::{IntVector, bits_for};

use crate::bwt::bwt;
use crate::lcp::{lcp, phi, plcp_in_place};
use crate::suffix::{as_u64, inverse, suffix_arrays};
use crate::{DsKind, MemoryStats, TextDsConfig, TextDsError};

bitflags::bitflags! {
    /// Per-kind state of a [`DsStore`] slot.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SlotFlags: u8 {
        /// The scheduler has asked for this kind's provider.
        const REGISTERED = 0b0000_0001;
        /// The structure is materialized.
        const LIVE       = 0b0000_0010;
        /// More than one consumer still needs the structure.
        const PROTECTED  = 0b0000_0100;
        /// The structure is stored at its minimal width.
        const COMPRESSED = 0b0000_1000;
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    flags: SlotFlags,
    data: Option<IntVector>,
}

/// The text plus one slot per [`DsKind`], driven by the scheduler.
///
/// This is the [`Manager`] behind [`TextDs`](crate::TextDs). Every structure
/// is an [`IntVector`]; construction reads its requirements from their slots
/// and writes the result into its own. Heap usage is tracked in
/// [`MemoryStats`] after every change.
#[derive(Clone, Debug)]
pub struct DsStore {
    text: Vec<u8>,
    config: TextDsConfig,
    slots: [Slot; DsKind::ALL.len()],
    stats: MemoryStats,
}

impl DsStore {
    /// Wraps a text that already ends with its sentinel.
    pub(crate) fn new(text: Vec<u8>, config: TextDsConfig) -> Self {
        Self {
            text,
            config,
            slots: Default::default(),
            stats: MemoryStats::default(),
        }
    }

    /// Returns the text, sentinel included.
    #[must_use]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Returns the construction settings.
    #[must_use]
    pub fn config(&self) -> &TextDsConfig {
        &self.config
    }

    /// Returns the state flags of `kind`'s slot.
    #[must_use]
    pub fn flags(&self, kind: DsKind) -> SlotFlags {
        self.slot(kind).flags
    }

    /// Returns `true` if `kind` is materialized.
    #[must_use]
    pub fn is_live(&self, kind: DsKind) -> bool {
        self.flags(kind).contains(SlotFlags::LIVE)
    }

    /// Returns the structure for `kind`, if it is live.
    #[must_use]
    pub fn get(&self, kind: DsKind) -> Option<&IntVector> {
        self.slot(kind).data.as_ref()
    }

    /// Returns the current and peak heap usage.
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut MemoryStats {
        &mut self.stats
    }

    /// Removes `kind` from its slot and hands it out.
    pub(crate) fn take(&mut self, kind: DsKind) -> Option<IntVector> {
        let slot = self.slot_mut(kind);
        slot.flags.remove(SlotFlags::LIVE | SlotFlags::COMPRESSED);
        let data = slot.data.take();
        self.refresh_stats();
        data
    }

    /// Clears protection left over from an earlier run.
    pub(crate) fn begin_run(&mut self) {
        for slot in &mut self.slots {
            slot.flags.remove(SlotFlags::PROTECTED);
        }
    }

    fn slot(&self, kind: DsKind) -> &Slot {
        &self.slots[kind.index()]
    }

    fn slot_mut(&mut self, kind: DsKind) -> &mut Slot {
        &mut self.slots[kind.index()]
    }

    fn live(&self, kind: DsKind) -> Result<&IntVector, TextDsError> {
        self.get(kind).ok_or(TextDsError::Missing(kind))
    }

    fn refresh_stats(&mut self) {
        let bytes = self
            .slots
            .iter()
            .filter_map(|s| s.data.as_ref())
            .map(IntVector::heap_bytes)
            .sum();
        self.stats.set_current(bytes);
    }

    fn store(&mut self, kind: DsKind, data: IntVector, compressed: bool) {
        info!(
            kind = kind.name(),
            bit_width = data.width(),
            bytes = data.bit_size() / 8,
            "stored"
        );
        let slot = self.slot_mut(kind);
        slot.flags.insert(SlotFlags::LIVE);
        slot.flags.set(SlotFlags::COMPRESSED, compressed);
        slot.data = Some(data);
        self.refresh_stats();
    }

    /// Width of an array of text positions.
    fn position_width(&self, compressed: bool) -> u8 {
        if compressed {
            bits_for(as_u64(self.text.len().saturating_sub(1)))
        } else {
            self.config.width()
        }
    }

    fn build(&mut self, kind: DsKind, compressed: bool) -> Result<(), TextDsError> {
        let positions = self.position_width(compressed);
        match kind {
            DsKind::SuffixArray => {
                let arrays = suffix_arrays(&self.text, positions)?;
                self.store(DsKind::SuffixArray, arrays.sa, compressed);
                if !self.is_live(DsKind::InverseSuffixArray) {
                    self.store(DsKind::InverseSuffixArray, arrays.isa, compressed);
                }
            }
            DsKind::InverseSuffixArray => {
                let isa = inverse(self.live(DsKind::SuffixArray)?, positions)?;
                self.store(kind, isa, compressed);
            }
            DsKind::Phi => {
                let phi = phi(self.live(DsKind::SuffixArray)?, positions)?;
                self.store(kind, phi, compressed);
            }
            DsKind::Plcp => {
                let mut plcp = if self.flags(DsKind::Phi).contains(SlotFlags::PROTECTED) {
                    trace!("phi is shared, computing plcp from a copy");
                    self.live(DsKind::Phi)?.clone()
                } else {
                    trace!("computing plcp in place over phi");
                    self.take(DsKind::Phi).ok_or(TextDsError::Missing(DsKind::Phi))?
                };
                plcp_in_place(&self.text, &mut plcp)?;
                if compressed {
                    plcp.bit_compress();
                }
                self.store(kind, plcp, compressed);
            }
            DsKind::Lcp => {
                let plcp = self.live(DsKind::Plcp)?;
                let width = if compressed {
                    bits_for(plcp.max_value())
                } else {
                    self.config.width()
                };
                let lcp = lcp(self.live(DsKind::SuffixArray)?, plcp, width)?;
                self.store(kind, lcp, compressed);
            }
            DsKind::Bwt => {
                let width = if compressed {
                    bits_for(self.text.iter().copied().max().map_or(0, u64::from))
                } else {
                    8
                };
                let bwt = bwt(&self.text, self.live(DsKind::SuffixArray)?, width)?;
                self.store(kind, bwt, compressed);
            }
        }
        Ok(())
    }

    fn compress_slot(&mut self, kind: DsKind) -> Result<(), TextDsError> {
        if self.flags(kind).contains(SlotFlags::COMPRESSED) {
            return Ok(());
        }
        let positions = self.position_width(true);
        let slot = self.slot_mut(kind);
        let data = slot.data.as_mut().ok_or(TextDsError::Missing(kind))?;
        if kind.holds_positions() {
            data.set_width(positions)?;
            data.shrink_to_fit();
        } else {
            data.bit_compress();
        }
        slot.flags.insert(SlotFlags::COMPRESSED);
        info!(
            kind = kind.name(),
            bit_width = data.width(),
            bytes = data.bit_size() / 8,
            "compressed"
        );
        self.refresh_stats();
        Ok(())
    }
}

impl Manager<DsKind> for DsStore {
    type Error = TextDsError;

    fn ensure_provider(&mut self, kind: DsKind) -> Result<(), Self::Error> {
        self.slot_mut(kind).flags.insert(SlotFlags::REGISTERED);
        Ok(())
    }

    fn construct(&mut self, kind: DsKind, compressed: bool) -> Result<(), Self::Error> {
        let _span = info_span!("construct", kind = kind.name(), compressed).entered();
        if self.is_live(kind) {
            debug!("already materialized, reusing");
            if compressed {
                self.compress_slot(kind)?;
            }
            return Ok(());
        }
        self.build(kind, compressed)
    }

    fn discard(&mut self, kind: DsKind, intermediate: bool) {
        let freed = self.get(kind).map_or(0, IntVector::heap_bytes);
        debug!(kind = kind.name(), intermediate, freed, "discard");
        self.take(kind);
    }

    fn protect(&mut self, kind: DsKind) {
        self.slot_mut(kind).flags.insert(SlotFlags::PROTECTED);
    }

    fn unprotect(&mut self, kind: DsKind) {
        self.slot_mut(kind).flags.remove(SlotFlags::PROTECTED);
    }

    fn compress(&mut self, kind: DsKind) -> Result<(), Self::Error> {
        let _span = info_span!("compress", kind = kind.name()).entered();
        self.compress_slot(kind)
    }
}
