// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Suffix array construction by prefix doubling.

use alloc::vec;
use alloc::vec::Vec;

use understory_int_vector::{IntVector, IntVectorError};

/// Suffix array and inverse suffix array of a text.
pub(crate) struct SuffixArrays {
    pub(crate) sa: IntVector,
    pub(crate) isa: IntVector,
}

/// Sorts the suffixes of `text` by prefix doubling.
///
/// `text` must end with a unique smallest byte. After round `k`, suffixes are
/// ranked by their first `2^k` bytes; the loop stops once every rank is
/// distinct, at which point the rank array is the inverse suffix array.
pub(crate) fn suffix_arrays(text: &[u8], width: u8) -> Result<SuffixArrays, IntVectorError> {
    let n = text.len();
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = text.iter().map(|&c| usize::from(c)).collect();
    let mut next = vec![0_usize; n];

    let mut k = 1;
    while n > 0 {
        let key = |i: usize| (rank[i], rank.get(i + k).map_or(0, |&r| r + 1));
        sa.sort_unstable_by_key(|&i| key(i));

        next[sa[0]] = 0;
        for w in 1..n {
            let step = usize::from(key(sa[w - 1]) < key(sa[w]));
            next[sa[w]] = next[sa[w - 1]] + step;
        }
        core::mem::swap(&mut rank, &mut next);

        if rank[sa[n - 1]] == n - 1 {
            break;
        }
        k *= 2;
    }

    Ok(SuffixArrays {
        sa: IntVector::from_values(sa.into_iter().map(as_u64), width)?,
        isa: IntVector::from_values(rank.into_iter().map(as_u64), width)?,
    })
}

/// Inverts a suffix array: `isa[sa[i]] = i`.
pub(crate) fn inverse(sa: &IntVector, width: u8) -> Result<IntVector, IntVectorError> {
    let mut isa = IntVector::with_len(sa.len(), 0, width)?;
    for (i, s) in sa.iter().enumerate() {
        isa.set(as_index(s), as_u64(i))?;
    }
    Ok(isa)
}

pub(crate) fn as_u64(x: usize) -> u64 {
    x as u64
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "stored values are positions in an in-memory text"
)]
pub(crate) fn as_index(x: u64) -> usize {
    x as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(text: &[u8]) -> Vec<u64> {
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by_key(|&i| &text[i..]);
        sa.into_iter().map(as_u64).collect()
    }

    #[test]
    fn banana() {
        let text = b"banana\0";
        let arrays = suffix_arrays(text, 32).unwrap();
        assert_eq!(
            arrays.sa.iter().collect::<Vec<_>>(),
            vec![6, 5, 3, 1, 0, 4, 2]
        );
        assert_eq!(
            arrays.isa.iter().collect::<Vec<_>>(),
            vec![4, 3, 6, 2, 5, 1, 0]
        );
    }

    #[test]
    fn matches_naive_sort() {
        for text in [
            &b"mississippi\0"[..],
            b"aaaaaaaaaaaaaaaa\0",
            b"abababababababab\0",
            b"zyxwvutsrqponm\0",
            b"\0",
        ] {
            let arrays = suffix_arrays(text, 32).unwrap();
            assert_eq!(arrays.sa.iter().collect::<Vec<_>>(), naive(text));
            assert_eq!(inverse(&arrays.sa, 32).unwrap(), arrays.isa);
        }
    }

    #[test]
    fn narrow_width_is_rejected() {
        assert!(matches!(
            suffix_arrays(b"abcdefghij\0", 3),
            Err(IntVectorError::ValueTooWide { width: 3, .. })
        ));
    }
}
