// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compression modes.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// How constructed data structures are shrunk to their minimal bit width.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompressMode {
    /// Always construct at full fixed width; never compress.
    Plain,
    /// Construct every kind already shrunk to its minimal width.
    Compressed,
    /// Construct at full width and shrink a requested kind in place once no
    /// intermediate consumer remains.
    #[default]
    Delayed,
}

impl CompressMode {
    /// All modes, in declaration order.
    pub const ALL: [Self; 3] = [Self::Plain, Self::Compressed, Self::Delayed];

    /// Returns the lowercase name used by [`FromStr`] and [`fmt::Display`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Compressed => "compressed",
            Self::Delayed => "delayed",
        }
    }
}

impl fmt::Display for CompressMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an unknown [`CompressMode`] name.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown compress mode (expected plain, compressed or delayed)")]
pub struct ParseCompressModeError;

impl FromStr for CompressMode {
    type Err = ParseCompressModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(ParseCompressModeError)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;

    #[test]
    fn names_round_trip() {
        for mode in CompressMode::ALL {
            assert_eq!(mode.to_string().parse::<CompressMode>(), Ok(mode));
        }
        assert_eq!(" Delayed ".parse::<CompressMode>(), Ok(CompressMode::Delayed));
        assert_eq!("lz".parse::<CompressMode>(), Err(ParseCompressModeError));
    }

    #[test]
    fn default_is_delayed() {
        assert_eq!(CompressMode::default(), CompressMode::Delayed);
    }
}
