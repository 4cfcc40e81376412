// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! LCP construction through the Phi and PLCP arrays.
//!
//! The PLCP array lists the LCP values in text order, where consecutive
//! entries drop by at most one. That makes it computable in linear time from
//! the Phi array alone, and in place over it.

use understory_int_vector::{IntVector, IntVectorError};

use crate::suffix::{as_index, as_u64};

/// Builds the Phi array: `phi[sa[i]] = sa[i - 1]`.
///
/// The first suffix array entry has no predecessor and wraps to the last one.
pub(crate) fn phi(sa: &IntVector, width: u8) -> Result<IntVector, IntVectorError> {
    let n = sa.len();
    let mut phi = IntVector::with_len(n, 0, width)?;
    let mut prev = sa.get(n.saturating_sub(1)).unwrap_or(0);
    for s in sa {
        phi.set(as_index(s), prev)?;
        prev = s;
    }
    Ok(phi)
}

/// Overwrites a Phi array with the PLCP array of `text`.
///
/// `text` must end with a unique smallest byte. Entry `i` is read before it
/// is written and later entries are never looked at, so the transform works
/// in place. PLCP values never exceed the positions they replace, so the
/// width does not have to change.
pub(crate) fn plcp_in_place(text: &[u8], phi: &mut IntVector) -> Result<(), IntVectorError> {
    let n = text.len();
    let mut l = 0;
    for i in 0..n.saturating_sub(1) {
        let j = as_index(phi.get(i).unwrap_or(0));
        // The sentinel differs from every other byte, so this stops before
        // either suffix runs out.
        while text[i + l] == text[j + l] {
            l += 1;
        }
        phi.set(i, as_u64(l))?;
        l = l.saturating_sub(1);
    }
    if n > 0 {
        phi.set(n - 1, 0)?;
    }
    Ok(())
}

/// Builds the LCP array: `lcp[i] = plcp[sa[i]]`, with `lcp[0] = 0`.
pub(crate) fn lcp(sa: &IntVector, plcp: &IntVector, width: u8) -> Result<IntVector, IntVectorError> {
    let mut lcp = IntVector::with_len(sa.len(), 0, width)?;
    for (i, s) in sa.iter().enumerate().skip(1) {
        lcp.set(i, plcp.get(as_index(s)).unwrap_or(0))?;
    }
    Ok(lcp)
}
