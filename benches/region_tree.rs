//! Benchmarks for building and querying the region tree.
//!
//! Run with: `cargo bench --bench region_tree`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flocksim::{Region, RegionTree, Vec3};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const HALF: Vec3 = Vec3::new(640.0, 360.0, 360.0);

fn scattered_points(count: usize) -> Vec<Vec3> {
    let mut rng = SmallRng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            Vec3::new(
                rng.gen_range(-HALF.x..=HALF.x),
                rng.gen_range(-HALF.y..=HALF.y),
                rng.gen_range(-HALF.z..=HALF.z),
            )
        })
        .collect()
}

fn build(points: &[Vec3], capacity: usize) -> RegionTree<usize> {
    let mut tree = RegionTree::new(Region::new(Vec3::ZERO, HALF), capacity);
    for (i, &p) in points.iter().enumerate() {
        tree.insert(p, i);
    }
    tree
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_build");

    for count in [200, 1_000, 5_000] {
        let points = scattered_points(count);
        group.bench_with_input(BenchmarkId::new("points", count), &points, |b, points| {
            b.iter(|| black_box(build(points, 4)))
        });
    }

    let coincident = vec![Vec3::ZERO; 200];
    group.bench_function("coincident_200", |b| {
        b.iter(|| black_box(build(&coincident, 4)))
    });

    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_query");
    let points = scattered_points(5_000);
    let tree = build(&points, 4);

    for radius in [25.0f32, 125.0, 400.0] {
        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, &radius| {
            let mut found = Vec::new();
            b.iter(|| {
                for p in points.iter().step_by(50) {
                    found.clear();
                    tree.query(&Region::cube(*p, radius), &mut found);
                    black_box(found.len());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
