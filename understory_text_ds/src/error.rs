// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use thiserror::Error;
use understory_int_vector::IntVectorError;

use crate::DsKind;

/// Errors reported by [`TextDs`](crate::TextDs).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TextDsError {
    /// The input text contains the reserved sentinel byte `0`.
    #[error("text contains the sentinel byte 0 at position {position}")]
    SentinelInText {
        /// Position of the first `0` byte.
        position: usize,
    },
    /// A structure was needed but is not live.
    #[error("{0} is not available")]
    Missing(DsKind),
    /// A packed vector rejected a width or value.
    #[error(transparent)]
    Storage(#[from] IntVectorError),
    /// A name did not match any [`DsKind`].
    #[error("unknown data structure {0:?}")]
    UnknownKind(String),
}
