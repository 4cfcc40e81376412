// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Every structure, in every compress mode, against a naive reference over a
//! collection of generated strings.

use understory_ds_graph::CompressMode;
use understory_int_vector::{IntVector, bits_for};
use understory_text_ds::{DsKind, TextDs, TextDsConfig, generate};

fn corpus() -> Vec<Vec<u8>> {
    vec![
        Vec::new(),
        b"a".to_vec(),
        b"banana".to_vec(),
        b"mississippi".to_vec(),
        b"abracadabra".to_vec(),
        generate::fibonacci(12),
        generate::thue_morse(300),
        generate::runs(b"abc", 7, 250),
        generate::runs(b"z", 1, 64),
        generate::random(400, 2, 1),
        generate::random(400, 26, 2),
        (1..=255).collect(),
    ]
}

struct Reference {
    sa: Vec<u64>,
    isa: Vec<u64>,
    phi: Vec<u64>,
    plcp: Vec<u64>,
    lcp: Vec<u64>,
    bwt: Vec<u64>,
}

fn common_prefix(a: &[u8], b: &[u8]) -> u64 {
    a.iter().zip(b).take_while(|(x, y)| x == y).count() as u64
}

impl Reference {
    fn new(text: &[u8]) -> Self {
        let mut t = text.to_vec();
        t.push(0);
        let n = t.len();

        let mut sa: Vec<usize> = (0..n).collect();
        sa.sort_by_key(|&i| &t[i..]);

        let mut isa = vec![0; n];
        let mut phi = vec![0; n];
        let mut plcp = vec![0; n];
        for (i, &s) in sa.iter().enumerate() {
            isa[s] = i as u64;
            phi[s] = sa[if i == 0 { n - 1 } else { i - 1 }] as u64;
        }
        let mut lcp = vec![0; n];
        for i in 1..n {
            lcp[i] = common_prefix(&t[sa[i - 1]..], &t[sa[i]..]);
            plcp[sa[i]] = lcp[i];
        }
        let bwt = sa
            .iter()
            .map(|&s| u64::from(t[if s == 0 { n - 1 } else { s - 1 }]))
            .collect();

        Self {
            sa: sa.into_iter().map(|s| s as u64).collect(),
            isa,
            phi,
            plcp,
            lcp,
            bwt,
        }
    }

    fn get(&self, kind: DsKind) -> &[u64] {
        match kind {
            DsKind::SuffixArray => &self.sa,
            DsKind::InverseSuffixArray => &self.isa,
            DsKind::Phi => &self.phi,
            DsKind::Plcp => &self.plcp,
            DsKind::Lcp => &self.lcp,
            DsKind::Bwt => &self.bwt,
        }
    }
}

fn values(v: &IntVector) -> Vec<u64> {
    v.iter().collect()
}

#[test]
fn all_structures_at_once_match_reference() {
    for text in corpus() {
        let reference = Reference::new(&text);
        for mode in CompressMode::ALL {
            let config = TextDsConfig::new().compress_mode(mode);
            let mut t = TextDs::with_config(text.clone(), config).unwrap();
            t.construct(&DsKind::ALL).unwrap();
            for kind in DsKind::ALL {
                assert_eq!(
                    values(t.get(kind).unwrap()),
                    reference.get(kind),
                    "{kind} in {mode} mode for {:?}",
                    String::from_utf8_lossy(&text)
                );
            }
        }
    }
}

#[test]
fn each_structure_alone_matches_reference() {
    for text in corpus() {
        let reference = Reference::new(&text);
        for kind in DsKind::ALL {
            for mode in CompressMode::ALL {
                let config = TextDsConfig::new().compress_mode(mode);
                let mut t = TextDs::with_config(text.clone(), config).unwrap();
                t.construct(&[kind]).unwrap();

                assert_eq!(values(t.get(kind).unwrap()), reference.get(kind));
                for other in DsKind::ALL.into_iter().filter(|&k| k != kind) {
                    assert!(t.get(other).is_none(), "{other} left over after {kind}");
                }
            }
        }
    }
}

#[test]
fn compressed_widths_are_minimal() {
    let text = generate::fibonacci(14);
    let n = text.len() as u64 + 1;
    let reference = Reference::new(&text);

    for mode in [CompressMode::Compressed, CompressMode::Delayed] {
        let config = TextDsConfig::new().compress_mode(mode);
        let mut t = TextDs::with_config(text.clone(), config).unwrap();
        t.construct(&DsKind::ALL).unwrap();

        for kind in [DsKind::SuffixArray, DsKind::InverseSuffixArray, DsKind::Phi] {
            assert_eq!(t.get(kind).unwrap().width(), bits_for(n - 1), "{kind} in {mode}");
        }
        let max_lcp = reference.lcp.iter().copied().max().unwrap_or(0);
        assert_eq!(t.get(DsKind::Lcp).unwrap().width(), bits_for(max_lcp));
        assert_eq!(t.get(DsKind::Plcp).unwrap().width(), bits_for(max_lcp));
        assert_eq!(t.get(DsKind::Bwt).unwrap().width(), bits_for(u64::from(b'b')));
    }

    let plain = TextDsConfig::new().compress_mode(CompressMode::Plain);
    let mut t = TextDs::with_config(text, plain).unwrap();
    t.construct(&[DsKind::Lcp, DsKind::Bwt]).unwrap();
    assert_eq!(t.get(DsKind::Lcp).unwrap().width(), 32);
    assert_eq!(t.get(DsKind::Bwt).unwrap().width(), 8);
}

#[test]
fn sixty_four_bit_arrays() {
    let text = generate::random(200, 3, 9);
    let config = TextDsConfig::new()
        .full_width(64)
        .compress_mode(CompressMode::Plain);
    let mut t = TextDs::with_config(text.clone(), config).unwrap();
    let sa = values(t.require(DsKind::SuffixArray).unwrap());
    assert_eq!(sa, Reference::new(&text).sa);
    assert_eq!(t.get(DsKind::SuffixArray).unwrap().width(), 64);
}
