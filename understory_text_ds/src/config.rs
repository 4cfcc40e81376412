// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_ds_graph::CompressMode;

/// Default element width for uncompressed arrays.
pub const DEFAULT_FULL_WIDTH: u8 = 32;

/// Construction settings for a [`TextDs`](crate::TextDs).
///
/// ```
/// use understory_ds_graph::CompressMode;
/// use understory_text_ds::TextDsConfig;
///
/// let config = TextDsConfig::new()
///     .full_width(64)
///     .compress_mode(CompressMode::Plain);
/// assert_eq!(config.width(), 64);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TextDsConfig {
    full_width: u8,
    compress_mode: CompressMode,
}

impl Default for TextDsConfig {
    fn default() -> Self {
        Self {
            full_width: DEFAULT_FULL_WIDTH,
            compress_mode: CompressMode::default(),
        }
    }
}

impl TextDsConfig {
    /// Returns the default configuration: 32-bit arrays, delayed compression.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the element width of arrays built uncompressed.
    ///
    /// The width has to hold every text position; construction fails with
    /// [`IntVectorError::ValueTooWide`](understory_int_vector::IntVectorError::ValueTooWide)
    /// otherwise.
    #[must_use]
    pub fn full_width(mut self, width: u8) -> Self {
        self.full_width = width;
        self
    }

    /// Sets when structures are shrunk to their minimal width.
    #[must_use]
    pub fn compress_mode(mut self, mode: CompressMode) -> Self {
        self.compress_mode = mode;
        self
    }

    /// Returns the element width of uncompressed arrays.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.full_width
    }

    /// Returns the compress mode.
    #[must_use]
    pub fn mode(&self) -> CompressMode {
        self.compress_mode
    }
}
