// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_ds_graph::{Provider, ProviderRegistry};

use crate::DsKind;

/// Returns the provider registry for every [`DsKind`].
///
/// | kind | requires | also produces |
/// |------|----------|---------------|
/// | suffix array | | inverse suffix array |
/// | inverse suffix array | suffix array | |
/// | Phi | suffix array | |
/// | PLCP | Phi | |
/// | LCP | suffix array, PLCP | |
/// | BWT | suffix array | |
///
/// ```
/// use understory_text_ds::{registry, DsKind};
///
/// let r = registry();
/// assert!(r.validate().is_ok());
/// assert_eq!(r.requirements(DsKind::Lcp), &[DsKind::SuffixArray, DsKind::Plcp]);
/// ```
#[must_use]
pub fn registry() -> ProviderRegistry<DsKind> {
    use DsKind::*;

    let mut r = ProviderRegistry::new();
    r.register(SuffixArray, Provider::new().byproducts([InverseSuffixArray]));
    r.register(InverseSuffixArray, Provider::new().requires([SuffixArray]));
    r.register(Phi, Provider::new().requires([SuffixArray]));
    r.register(Plcp, Provider::new().requires([Phi]));
    r.register(Lcp, Provider::new().requires([SuffixArray, Plcp]));
    r.register(Bwt, Provider::new().requires([SuffixArray]));
    r
}
