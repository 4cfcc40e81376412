// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end index construction over generated texts.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_ds_graph::CompressMode;
use understory_int_vector::IntVector;
use understory_text_ds::{DsKind, TextDs, TextDsConfig, generate};

fn bench_text_ds(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_text_ds");
    group.sample_size(20);

    let texts = [
        ("fibonacci", generate::fibonacci(22)),
        ("thue_morse", generate::thue_morse(1 << 15)),
        ("random4", generate::random(1 << 15, 4, 0x7E57)),
    ];

    for (name, text) in &texts {
        for mode in CompressMode::ALL {
            let config = TextDsConfig::new().compress_mode(mode);
            group.bench_function(format!("lcp_{mode}({name},n={})", text.len()), |b| {
                b.iter_batched(
                    || TextDs::with_config(text.clone(), config).unwrap(),
                    |mut t| {
                        t.construct(&[DsKind::Lcp]).unwrap();
                        black_box(t.stats().peak_bytes);
                    },
                    BatchSize::LargeInput,
                );
            });
        }

        group.bench_function(format!("all_delayed({name},n={})", text.len()), |b| {
            b.iter_batched(
                || TextDs::new(text.clone()).unwrap(),
                |mut t| {
                    t.construct(&DsKind::ALL).unwrap();
                    black_box(t.stats().peak_bytes);
                },
                BatchSize::LargeInput,
            );
        });
    }

    let values: Vec<u64> = (0..1_u64 << 16).map(|i| i * 7 % 1000).collect();
    group.bench_function("int_vector_bit_compress(n=65536)", |b| {
        b.iter_batched(
            || IntVector::from_values(values.iter().copied(), 32).unwrap(),
            |mut v| {
                v.bit_compress();
                black_box(v.width());
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_text_ds);
criterion_main!(benches);
