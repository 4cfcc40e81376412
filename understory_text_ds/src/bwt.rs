// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_int_vector::{IntVector, IntVectorError};

use crate::suffix::as_index;

/// Builds the Burrows-Wheeler transform: the byte preceding each suffix.
///
/// The suffix starting at 0 wraps around to the sentinel at the end.
pub(crate) fn bwt(text: &[u8], sa: &IntVector, width: u8) -> Result<IntVector, IntVectorError> {
    let last = text.last().copied().unwrap_or(0);
    IntVector::from_values(
        sa.iter().map(|s| match as_index(s) {
            0 => u64::from(last),
            s => u64::from(text[s - 1]),
        }),
        width,
    )
}
