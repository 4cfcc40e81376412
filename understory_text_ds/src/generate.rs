// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic test strings.
//!
//! Suffix structures have their worst and most interesting cases on highly
//! repetitive input. These generators produce such strings without any
//! randomness beyond a seeded LCG, so tests and benchmarks are reproducible.
//! None of them ever emit the `0` sentinel.

use alloc::vec::Vec;

/// Returns the `n`-th Fibonacci word over `{a, b}`.
///
/// `fibonacci(1) = "b"`, `fibonacci(2) = "a"`, and each later word is the
/// concatenation of the two before it. `fibonacci(0)` is empty.
///
/// ```
/// use understory_text_ds::generate::fibonacci;
///
/// assert_eq!(fibonacci(6), b"abaababa");
/// ```
#[must_use]
pub fn fibonacci(n: usize) -> Vec<u8> {
    match n {
        0 => Vec::new(),
        1 => b"b".to_vec(),
        _ => {
            let (mut prev, mut cur) = (b"b".to_vec(), b"a".to_vec());
            for _ in 2..n {
                let next = [cur.as_slice(), prev.as_slice()].concat();
                prev = core::mem::replace(&mut cur, next);
            }
            cur
        }
    }
}

/// Returns the first `len` letters of the Thue-Morse sequence over `{a, b}`.
///
/// ```
/// use understory_text_ds::generate::thue_morse;
///
/// assert_eq!(thue_morse(8), b"abbabaab");
/// ```
#[must_use]
pub fn thue_morse(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| if i.count_ones() % 2 == 0 { b'a' } else { b'b' })
        .collect()
}

/// Cycles through `alphabet`, repeating each byte `run` times, up to `len` bytes.
///
/// `0` bytes in `alphabet` are skipped. An empty alphabet or a zero run
/// length gives an empty string.
///
/// ```
/// use understory_text_ds::generate::runs;
///
/// assert_eq!(runs(b"ab", 3, 8), b"aaabbbaa");
/// ```
#[must_use]
pub fn runs(alphabet: &[u8], run: usize, len: usize) -> Vec<u8> {
    let letters: Vec<u8> = alphabet.iter().copied().filter(|&c| c != 0).collect();
    if letters.is_empty() || run == 0 {
        return Vec::new();
    }
    letters
        .iter()
        .flat_map(|&c| core::iter::repeat_n(c, run))
        .cycle()
        .take(len)
        .collect()
}

/// Returns `len` pseudo-random letters from the first `alphabet_size` letters
/// of `a..=z`.
///
/// `alphabet_size` is clamped to `1..=26`. The same seed always gives the
/// same string.
#[must_use]
pub fn random(len: usize, alphabet_size: u8, seed: u64) -> Vec<u8> {
    let size = u64::from(alphabet_size.clamp(1, 26));
    let mut state = seed;
    (0..len)
        .map(|_| {
            // Numerical Recipes LCG parameters.
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let pick = u8::try_from((state >> 33) % size).unwrap_or(0);
            b'a' + pick
        })
        .collect()
}
