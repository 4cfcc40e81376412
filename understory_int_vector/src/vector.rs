// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed vector and its iterator.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;

use tracing::trace;

use crate::IntVectorError;
use crate::bits::{WORD_BITS, bits_for, check_value, check_width, mask, words_for};

/// A vector of unsigned integers, each stored in `width` bits.
///
/// Elements are packed back to back into `u64` words, least significant bit
/// first; an element may straddle two words. Bits past the last element are
/// always zero.
///
/// Equality compares the logical values only, so a vector and its
/// [bit-compressed](Self::bit_compress) copy are equal.
///
/// # Example
///
/// ```
/// use understory_int_vector::IntVector;
///
/// let mut v = IntVector::from_values([3, 1, 4, 1, 5], 32).unwrap();
/// assert_eq!(v.bit_size(), 5 * 32);
///
/// v.bit_compress();
/// assert_eq!(v.width(), 3);
/// assert_eq!(v.iter().collect::<Vec<_>>(), vec![3, 1, 4, 1, 5]);
/// ```
#[derive(Clone)]
pub struct IntVector {
    words: Vec<u64>,
    len: usize,
    width: u8,
}

impl IntVector {
    /// Creates an empty vector with the given element width.
    pub fn new(width: u8) -> Result<Self, IntVectorError> {
        check_width(width)?;
        Ok(Self {
            words: Vec::new(),
            len: 0,
            width,
        })
    }

    /// Creates a vector of `len` copies of `value`.
    pub fn with_len(len: usize, value: u64, width: u8) -> Result<Self, IntVectorError> {
        let mut v = Self::new(width)?;
        v.resize(len, value)?;
        Ok(v)
    }

    /// Collects `values` into a vector of the given width.
    pub fn from_values(
        values: impl IntoIterator<Item = u64>,
        width: u8,
    ) -> Result<Self, IntVectorError> {
        let values = values.into_iter();
        let mut v = Self::new(width)?;
        v.words.reserve_exact(words_for(values.size_hint().0, width));
        for value in values {
            v.push(value)?;
        }
        Ok(v)
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the vector has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bits per element.
    #[must_use]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Returns the element at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u64> {
        (index < self.len).then(|| read(&self.words, index, self.width))
    }

    /// Overwrites the element at `index`.
    pub fn set(&mut self, index: usize, value: u64) -> Result<(), IntVectorError> {
        if index >= self.len {
            return Err(IntVectorError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        check_value(value, self.width)?;
        write(&mut self.words, index, self.width, value);
        Ok(())
    }

    /// Appends `value`.
    pub fn push(&mut self, value: u64) -> Result<(), IntVectorError> {
        check_value(value, self.width)?;
        let needed = words_for(self.len + 1, self.width);
        if needed > self.words.len() {
            self.words.push(0);
        }
        write(&mut self.words, self.len, self.width, value);
        self.len += 1;
        Ok(())
    }

    /// Iterates over the elements.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            vec: self,
            front: 0,
            back: self.len,
        }
    }

    /// Largest element, or 0 for an empty vector.
    #[must_use]
    pub fn max_value(&self) -> u64 {
        self.iter().max().unwrap_or(0)
    }

    /// Number of payload bits, `len * width`.
    #[must_use]
    pub fn bit_size(&self) -> usize {
        self.len * usize::from(self.width)
    }

    /// Bytes of heap memory currently reserved by the vector.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        self.words.capacity() * size_of::<u64>()
    }

    /// Shortens or extends the vector to `len` elements, filling with `value`.
    pub fn resize(&mut self, len: usize, value: u64) -> Result<(), IntVectorError> {
        check_value(value, self.width)?;
        let old = self.len;
        self.words.resize(words_for(len, self.width), 0);
        self.len = len;
        if len < old {
            self.clear_tail();
        } else if value != 0 {
            for index in old..len {
                write(&mut self.words, index, self.width, value);
            }
        }
        Ok(())
    }

    /// Releases spare capacity.
    pub fn shrink_to_fit(&mut self) {
        self.words.shrink_to_fit();
    }

    /// Re-packs every element to `width` bits.
    ///
    /// Fails without modifying the vector if the width is out of range or an
    /// element does not fit.
    pub fn set_width(&mut self, width: u8) -> Result<(), IntVectorError> {
        check_width(width)?;
        if width < self.width {
            check_value(self.max_value(), width)?;
        }
        self.repack(width);
        Ok(())
    }

    /// Shrinks the width to the fewest bits that hold every element.
    ///
    /// The logical contents do not change; spare capacity is released.
    pub fn bit_compress(&mut self) {
        self.repack(bits_for(self.max_value()));
        self.shrink_to_fit();
    }

    /// Changes the width in place. Every element must fit in `to` bits.
    fn repack(&mut self, to: u8) {
        let from = self.width;
        if from == to {
            return;
        }
        trace!(len = self.len, from, to, "repack");
        if to < from {
            // Each element moves to a lower bit offset, so a forward pass
            // never clobbers an element before it is read.
            for index in 0..self.len {
                let value = read(&self.words, index, from);
                write(&mut self.words, index, to, value);
            }
            self.width = to;
            self.words.truncate(words_for(self.len, to));
            self.clear_tail();
        } else {
            self.words.resize(words_for(self.len, to), 0);
            for index in (0..self.len).rev() {
                let value = read(&self.words, index, from);
                write(&mut self.words, index, to, value);
            }
            self.width = to;
        }
    }

    /// Zeroes the bits past the last element in the last word.
    fn clear_tail(&mut self) {
        let used = self.bit_size() % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1_u64 << used) - 1;
            }
        }
    }
}

fn read(words: &[u64], index: usize, width: u8) -> u64 {
    let bit = index * usize::from(width);
    let (word, offset) = (bit / WORD_BITS, bit % WORD_BITS);
    let mut value = words[word] >> offset;
    if offset + usize::from(width) > WORD_BITS {
        value |= words[word + 1] << (WORD_BITS - offset);
    }
    value & mask(width)
}

fn write(words: &mut [u64], index: usize, width: u8, value: u64) {
    let bit = index * usize::from(width);
    let (word, offset) = (bit / WORD_BITS, bit % WORD_BITS);
    let m = mask(width);
    words[word] = (words[word] & !(m << offset)) | (value << offset);
    if offset + usize::from(width) > WORD_BITS {
        let spill = WORD_BITS - offset;
        words[word + 1] = (words[word + 1] & !(m >> spill)) | (value >> spill);
    }
}

impl PartialEq for IntVector {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl Eq for IntVector {}

impl fmt::Debug for IntVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Values<'a>(&'a IntVector);
        impl fmt::Debug for Values<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.0.iter()).finish()
            }
        }
        f.debug_struct("IntVector")
            .field("width", &self.width)
            .field("len", &self.len)
            .field("values", &Values(self))
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a IntVector {
    type Item = u64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the elements of an [`IntVector`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    vec: &'a IntVector,
    front: usize,
    back: usize,
}

impl Iterator for Iter<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.front == self.back {
            return None;
        }
        let value = read(&self.vec.words, self.front, self.vec.width);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<u64> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(read(&self.vec.words, self.back, self.vec.width))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// A pseudo-random sequence that fits in `width` bits.
    fn sample(len: usize, width: u8) -> Vec<u64> {
        let mut x = 0x2545_f491_4f6c_dd1d_u64;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                x & mask(width)
            })
            .collect()
    }

    #[test]
    fn round_trips_across_word_boundaries() {
        for width in [1, 3, 7, 13, 31, 32, 33, 63, 64] {
            let values = sample(200, width);
            let v = IntVector::from_values(values.iter().copied(), width).unwrap();
            assert_eq!(v.len(), 200);
            assert_eq!(v.iter().collect::<Vec<_>>(), values, "width {width}");
            assert_eq!(v.iter().rev().next(), values.last().copied());
        }
    }

    #[test]
    fn set_only_touches_its_element() {
        let mut v = IntVector::with_len(20, 0, 13).unwrap();
        v.set(4, 0x1fff).unwrap();
        assert_eq!(v.get(3), Some(0));
        assert_eq!(v.get(4), Some(0x1fff));
        assert_eq!(v.get(5), Some(0));
        v.set(4, 1).unwrap();
        assert_eq!(v.get(4), Some(1));
    }

    #[test]
    fn rejects_out_of_range_input() {
        assert_eq!(
            IntVector::new(0).unwrap_err(),
            IntVectorError::WidthOutOfRange(0)
        );
        let mut v = IntVector::with_len(2, 0, 4).unwrap();
        assert_eq!(
            v.push(16),
            Err(IntVectorError::ValueTooWide {
                value: 16,
                width: 4
            })
        );
        assert_eq!(
            v.set(2, 1),
            Err(IntVectorError::IndexOutOfBounds { index: 2, len: 2 })
        );
        assert_eq!(v.get(2), None);
    }

    #[test]
    fn resize_fills_and_clears() {
        let mut v = IntVector::with_len(3, 5, 7).unwrap();
        v.resize(10, 9).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![5, 5, 5, 9, 9, 9, 9, 9, 9, 9]);
        v.resize(2, 0).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![5, 5]);
        // Growing again exposes zeroes, not stale bits.
        v.resize(4, 0).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![5, 5, 0, 0]);
    }

    #[test]
    fn set_width_repacks_both_ways() {
        let values = sample(100, 9);
        let mut v = IntVector::from_values(values.iter().copied(), 9).unwrap();
        v.set_width(40).unwrap();
        assert_eq!(v.width(), 40);
        assert_eq!(v.iter().collect::<Vec<_>>(), values);
        v.set_width(9).unwrap();
        assert_eq!(v.iter().collect::<Vec<_>>(), values);
        assert!(matches!(
            v.set_width(3),
            Err(IntVectorError::ValueTooWide { width: 3, .. })
        ));
        assert_eq!(v.width(), 9, "failed repack leaves the vector alone");
    }

    #[test]
    fn bit_compress_shrinks_memory_and_keeps_values() {
        let values: Vec<u64> = (0..1000).map(|i| i % 100).collect();
        let mut v = IntVector::from_values(values.iter().copied(), 64).unwrap();
        let before = v.heap_bytes();
        let original = v.clone();

        v.bit_compress();
        assert_eq!(v.width(), 7);
        assert!(v.heap_bytes() < before / 8);
        assert_eq!(v, original);
        assert_eq!(v.max_value(), 99);
    }

    #[test]
    fn compressing_all_zeroes_keeps_one_bit() {
        let mut v = IntVector::with_len(10, 0, 32).unwrap();
        v.bit_compress();
        assert_eq!(v.width(), 1);
        assert_eq!(v.bit_size(), 10);
        assert_eq!(v.max_value(), 0);
    }

    #[test]
    fn equality_ignores_width() {
        let a = IntVector::from_values([1, 2, 3], 8).unwrap();
        let b = IntVector::from_values([1, 2, 3], 50).unwrap();
        let c = IntVector::from_values([1, 2], 8).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
