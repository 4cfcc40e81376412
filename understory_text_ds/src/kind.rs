// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The closed set of text index structures.

use alloc::string::ToString;
use core::fmt;
use core::str::FromStr;

use crate::TextDsError;

/// A text index structure that [`TextDs`](crate::TextDs) can build.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DsKind {
    /// Suffix array: starting positions of the suffixes in lexicographic order.
    SuffixArray,
    /// Inverse suffix array: the rank of each suffix.
    InverseSuffixArray,
    /// Phi array: for each suffix, the suffix preceding it in the suffix array.
    Phi,
    /// Permuted LCP array, indexed by text position.
    Plcp,
    /// Longest common prefix array, indexed by suffix array position.
    Lcp,
    /// Burrows-Wheeler transform of the text.
    Bwt,
}

impl DsKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::SuffixArray,
        Self::InverseSuffixArray,
        Self::Phi,
        Self::Plcp,
        Self::Lcp,
        Self::Bwt,
    ];

    /// Short lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SuffixArray => "sa",
            Self::InverseSuffixArray => "isa",
            Self::Phi => "phi",
            Self::Plcp => "plcp",
            Self::Lcp => "lcp",
            Self::Bwt => "bwt",
        }
    }

    /// Dense index of this kind, in `0..ALL.len()`.
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` if every value is a text position, bounded by `n - 1`.
    pub(crate) const fn holds_positions(self) -> bool {
        matches!(
            self,
            Self::SuffixArray | Self::InverseSuffixArray | Self::Phi
        )
    }
}

impl fmt::Display for DsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for DsKind {
    type Err = TextDsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| TextDsError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in DsKind::ALL {
            assert_eq!(kind.name().parse::<DsKind>().unwrap(), kind);
        }
        assert_eq!(" LCP ".parse::<DsKind>().unwrap(), DsKind::Lcp);
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            "suffixtree".parse::<DsKind>(),
            Err(TextDsError::UnknownKind("suffixtree".to_string()))
        );
    }

    #[test]
    fn indices_are_dense() {
        for (i, kind) in DsKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
