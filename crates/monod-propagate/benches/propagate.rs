//! Criterion benchmarks for evaluation passes.
//!
//! Run with `cargo bench -p monod-propagate`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use monod_graph::{EntityId, Network, RegulationType};
use monod_propagate::PropagationEngine;

/// Layered network: `width` seeded molecules feed `width` reactions with
/// overlapping inputs, catalysts and regulators, all rolled up into one
/// pathway. Dependency fan-in makes the shared-visited memoization do
/// real work.
fn layered_network(width: usize, rng: &mut StdRng) -> (Network, Vec<EntityId>) {
    let mut net = Network::with_capacity(width * 2 + 1);

    let molecules: Vec<EntityId> = (0..width)
        .map(|i| {
            let id = net.add_molecule(format!("m{i}"));
            net.set_fixed(id, rng.gen_range(0.0..2.0)).unwrap();
            id
        })
        .collect();

    let reactions: Vec<EntityId> = (0..width)
        .map(|i| {
            let id = net.add_reaction(format!("r{i}"));
            net.add_input(id, molecules[i]).unwrap();
            net.add_input(id, molecules[(i + 1) % width]).unwrap();
            net.add_catalyst(id, molecules[(i + 2) % width]).unwrap();
            if i % 3 == 0 {
                net.set_regulator(id, molecules[(i + 3) % width], RegulationType::Negative)
                    .unwrap();
            }
            id
        })
        .collect();

    let pathway = net.add_pathway("rollup");
    for &reaction in &reactions {
        net.add_event(pathway, reaction).unwrap();
    }

    (net, vec![pathway])
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate/evaluate");
    for width in [64usize, 512, 4096] {
        let mut rng = StdRng::seed_from_u64(42);
        let (net, roots) = layered_network(width, &mut rng);
        let engine = PropagationEngine::default();

        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter_batched(
                || net.clone(),
                |mut fresh| engine.evaluate(&mut fresh, &roots).unwrap(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
