// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scheduler overhead on synthetic registries, with no payloads built.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use understory_ds_graph::{
    CompressMode, CostTable, Provider, ProviderRegistry, RecordingManager, construct_all,
};

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range_u32(&mut self, upper_exclusive: u32) -> u32 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u32() % upper_exclusive
    }
}

/// A registry over `0..n` where kind `k` requires up to `reqs` kinds below it.
fn build_dag_registry(n: u32, reqs: u32, seed: u64) -> ProviderRegistry<u32> {
    let mut registry = ProviderRegistry::new();
    let mut rng = Lcg::new(seed);

    // Requirements always point to smaller kinds, so the registry is acyclic.
    for kind in 0..n {
        let count = reqs.min(kind);
        let requirements: Vec<u32> = (0..count).map(|_| rng.gen_range_u32(kind)).collect();
        registry.register(kind, Provider::new().requires(requirements));
    }
    registry
}

/// The top `count` kinds, which have the deepest requirement trees.
fn top_kinds(n: u32, count: u32) -> Vec<u32> {
    (n.saturating_sub(count)..n).collect()
}

fn bench_ds_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("understory_ds_graph");
    group.sample_size(50);

    for &(n, reqs) in &[(64_u32, 2_u32), (256_u32, 2_u32), (1_024_u32, 3_u32)] {
        let registry = build_dag_registry(n, reqs, 0xD5_0000_0000_0001);
        let requested = top_kinds(n, 8);

        group.bench_function(format!("validate(n={n},r={reqs})"), |b| {
            b.iter(|| black_box(registry.validate()));
        });

        group.bench_function(format!("cost_all(n={n},r={reqs})"), |b| {
            b.iter(|| {
                let costs = CostTable::new(&registry);
                let total: usize = (0..n).map(|k| costs.cost(k)).sum();
                black_box(total);
            });
        });

        for mode in CompressMode::ALL {
            group.bench_function(format!("construct_all_{mode}(n={n},r={reqs})"), |b| {
                b.iter_batched(
                    RecordingManager::new,
                    |mut manager| {
                        let schedule =
                            construct_all(&registry, &mut manager, &requested, mode).unwrap();
                        black_box(schedule.peak_live());
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_ds_graph);
criterion_main!(benches);
