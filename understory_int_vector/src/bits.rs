// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Width arithmetic shared by the packed layout.

use crate::IntVectorError;

/// Bits in one backing word.
pub(crate) const WORD_BITS: usize = 64;

/// Returns the number of bits needed to store `value`, never less than 1.
///
/// ```
/// use understory_int_vector::bits_for;
///
/// assert_eq!(bits_for(0), 1);
/// assert_eq!(bits_for(1), 1);
/// assert_eq!(bits_for(255), 8);
/// assert_eq!(bits_for(256), 9);
/// assert_eq!(bits_for(u64::MAX), 64);
/// ```
#[must_use]
pub const fn bits_for(value: u64) -> u8 {
    if value == 0 {
        1
    } else {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a u64 has at most 64 significant bits"
        )]
        let bits = (64 - value.leading_zeros()) as u8;
        bits
    }
}

/// Returns the low `width` bits set.
pub(crate) const fn mask(width: u8) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1_u64 << width) - 1
    }
}

/// Number of words backing `len` elements of `width` bits.
pub(crate) const fn words_for(len: usize, width: u8) -> usize {
    (len * width as usize).div_ceil(WORD_BITS)
}

pub(crate) fn check_width(width: u8) -> Result<(), IntVectorError> {
    if (1..=64).contains(&width) {
        Ok(())
    } else {
        Err(IntVectorError::WidthOutOfRange(width))
    }
}

pub(crate) fn check_value(value: u64, width: u8) -> Result<(), IntVectorError> {
    if value & !mask(width) == 0 {
        Ok(())
    } else {
        Err(IntVectorError::ValueTooWide { value, width })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(mask(1), 1);
        assert_eq!(mask(7), 0x7f);
        assert_eq!(mask(63), u64::MAX >> 1);
        assert_eq!(mask(64), u64::MAX);
    }

    #[test]
    fn word_counts_round_up() {
        assert_eq!(words_for(0, 13), 0);
        assert_eq!(words_for(1, 1), 1);
        assert_eq!(words_for(64, 1), 1);
        assert_eq!(words_for(65, 1), 2);
        assert_eq!(words_for(5, 13), 2);
        assert_eq!(words_for(3, 64), 3);
    }

    #[test]
    fn width_and_value_checks() {
        assert_eq!(check_width(0), Err(IntVectorError::WidthOutOfRange(0)));
        assert_eq!(check_width(65), Err(IntVectorError::WidthOutOfRange(65)));
        assert!(check_width(64).is_ok());
        assert!(check_value(15, 4).is_ok());
        assert_eq!(
            check_value(16, 4),
            Err(IntVectorError::ValueTooWide {
                value: 16,
                width: 4
            })
        );
        assert!(check_value(u64::MAX, 64).is_ok());
    }
}
