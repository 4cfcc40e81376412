// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Errors reported by [`IntVector`](crate::IntVector) operations.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum IntVectorError {
    /// The requested element width is not in `1..=64`.
    #[error("element width {0} is outside 1..=64")]
    WidthOutOfRange(u8),
    /// A value needs more bits than the element width.
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide {
        /// The offending value.
        value: u64,
        /// The element width it was checked against.
        width: u8,
    },
    /// An index was past the end of the vector.
    #[error("index {index} is out of bounds for length {len}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The vector length.
        len: usize,
    },
}
