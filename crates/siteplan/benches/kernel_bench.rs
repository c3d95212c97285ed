//! Criterion benches for the planar kernel primitives on site-sized polygons.
//! Focus: bounding rectangle and inscribed rectangle over n-gons, n in {8, 32, 128}.
//! Results: by default under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use siteplan::{GeometryKernel, PlanarKernel, Polygon};

/// Star-shaped site: radial jitter around a 40 m circle.
fn random_site(n: usize, seed: u64) -> Polygon {
    let mut rng = StdRng::seed_from_u64(seed);
    let pts = (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            let r = rng.gen_range(30.0..50.0);
            (r * theta.cos(), r * theta.sin())
        })
        .collect::<Vec<_>>();
    Polygon::from_xy(&pts).unwrap()
}

fn bench_kernel(c: &mut Criterion) {
    let k = PlanarKernel::default();
    let mut group = c.benchmark_group("kernel");
    for &n in &[8usize, 32, 128] {
        group.bench_with_input(BenchmarkId::new("minimum_bounding_rectangle", n), &n, |b, &n| {
            b.iter_batched(
                || random_site(n, 17),
                |site| {
                    let _r = k.minimum_bounding_rectangle(&site);
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("largest_inscribed_rectangle", n), &n, |b, &n| {
            b.iter_batched(
                || random_site(n, 18),
                |site| {
                    let _r = k.largest_inscribed_rectangle(&site, 1.5);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_kernel);
criterion_main!(benches);
