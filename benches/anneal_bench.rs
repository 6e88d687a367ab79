//! Criterion benchmarks for the annealing loop.
//!
//! Uses synthetic cost functions (Sphere, Rastrigin, weighted letters) so the
//! numbers measure schedule, visiting and acceptance overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::f64::consts::PI;
use u_anneal::sa::{minimize, AnnealConfig, Continuous, DecayType, Discrete};

// ===========================================================================
// Continuous cost functions
// ===========================================================================

fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum()
}

fn rastrigin(x: &[f64]) -> f64 {
    x.iter()
        .map(|v| v * v - 10.0 * (2.0 * PI * v).cos())
        .sum::<f64>()
        + 10.0 * x.len() as f64
}

// ===========================================================================
// Discrete: weighted letters, minimum at all 'd'
// ===========================================================================

fn letters(x: &[char]) -> f64 {
    x.iter()
        .map(|c| match c {
            'a' => 40.0,
            'b' => 30.0,
            'c' => 20.0,
            _ => 10.0,
        })
        .sum()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sphere(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_sphere");
    group.sample_size(10);

    for &dim in &[10usize, 50, 100] {
        let domain = Continuous::new(vec![(-5.0, 5.0); dim]);
        let config = AnnealConfig::default()
            .with_init_temp(100.0)
            .with_final_temp(0.01)
            .with_niter(1000)
            .with_init_visit_scale(5.0)
            .with_min_visit_scale(0.01)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(dim),
            &(domain, config),
            |b, (d, c)| {
                b.iter(|| {
                    let result = minimize(sphere, black_box(d), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_rastrigin(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_rastrigin");
    group.sample_size(10);

    for decay in [DecayType::Exponential, DecayType::Linear] {
        let domain = Continuous::new([(-5.0, 5.0), (-5.0, 5.0)]);
        let config = AnnealConfig::default()
            .with_init_temp(37.0)
            .with_final_temp(4.0)
            .with_niter(5000)
            .with_decay_type(decay)
            .with_init_visit_scale(100.0)
            .with_min_visit_scale(0.01)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{decay:?}")),
            &(domain, config),
            |b, (d, c)| {
                b.iter(|| {
                    let result = minimize(rastrigin, black_box(d), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

fn bench_letters(c: &mut Criterion) {
    let mut group = c.benchmark_group("sa_letters");
    group.sample_size(10);

    for &dim in &[5usize, 50] {
        let domain = Discrete::new(vec![vec!['a', 'b', 'c', 'd']; dim]);
        let config = AnnealConfig::default()
            .with_init_temp(125.0)
            .with_final_temp(1.0)
            .with_niter(5000)
            .with_init_visit_scale(5.0)
            .with_min_visit_scale(1.0)
            .with_seed(42);
        group.bench_with_input(
            BenchmarkId::from_parameter(dim),
            &(domain, config),
            |b, (d, c)| {
                b.iter(|| {
                    let result = minimize(letters, black_box(d), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_sphere, bench_rastrigin, bench_letters);
criterion_main!(benches);
