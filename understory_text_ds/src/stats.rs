// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Heap usage of the structures held by a [`TextDs`](crate::TextDs).
///
/// Only the packed arrays are counted; the text and short-lived scratch
/// buffers are not.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStats {
    /// Bytes held right now.
    pub current_bytes: usize,
    /// Largest value `current_bytes` has reached.
    pub peak_bytes: usize,
}

impl MemoryStats {
    /// Records a new current size and raises the peak if needed.
    pub(crate) fn set_current(&mut self, bytes: usize) {
        self.current_bytes = bytes;
        self.peak_bytes = self.peak_bytes.max(bytes);
    }

    /// Starts a new peak measurement from the current size.
    pub fn reset_peak(&mut self) {
        self.peak_bytes = self.current_bytes;
    }
}
