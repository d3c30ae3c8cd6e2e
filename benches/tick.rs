//! Benchmarks for whole simulation ticks.
//!
//! Run with: `cargo bench --bench tick`
//! Add `--features parallel` to measure the rayon force phase.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flocksim::{FlockConfig, Simulation};

fn flock(population: usize, start_centered: bool) -> Simulation {
    let config = FlockConfig {
        population,
        start_centered,
        seed: Some(1),
        ..Default::default()
    };
    match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => panic!("bench config rejected: {err}"),
    }
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");
    group.sample_size(30);

    for population in [200, 1_000, 3_000] {
        group.bench_with_input(
            BenchmarkId::new("scattered", population),
            &population,
            |b, &population| {
                let mut sim = flock(population, false);
                // Let the flock settle before measuring.
                sim.run(20);
                b.iter(|| black_box(sim.tick()))
            },
        );
    }

    group.bench_function("centered_200_first_ticks", |b| {
        b.iter_batched(
            || flock(200, true),
            |mut sim| black_box(sim.run(5)),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_build_tree(c: &mut Criterion) {
    let sim = flock(1_000, false);
    c.bench_function("build_tree_1000", |b| b.iter(|| black_box(sim.build_tree())));
}

criterion_group!(benches, bench_tick, bench_build_tree);
criterion_main!(benches);
