use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use orbdrift::kepler::solve_kepler;

const SAMPLES: usize = 10_000;

/// Uniform random in [0, 2π)
#[inline]
fn rand_angle(rng: &mut StdRng) -> f64 {
    rng.random::<f64>() * std::f64::consts::TAU
}

/// Pre-generate `(M, e)` pairs so the RNG stays out of the timed section.
fn cases(rng: &mut StdRng, e: impl Fn(&mut StdRng) -> f64) -> Vec<(f64, f64)> {
    (0..SAMPLES)
        .map(|_| {
            let m = rand_angle(rng);
            (m, e(rng))
        })
        .collect()
}

fn run(cases: Vec<(f64, f64)>) {
    for (m, e) in cases {
        black_box(solve_kepler(black_box(m), black_box(e)));
    }
}

/// Typical regime: e ∈ [0.0, 0.7]
fn bench_typical(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xDEADBEEF);

    c.bench_function("solve_kepler_equation/typical_e<=0.7", |b| {
        b.iter_batched(
            || cases(&mut rng, |r| r.random_range(0.0..=0.7)),
            run,
            BatchSize::LargeInput,
        )
    });
}

/// High-eccentricity (still elliptic): e ∈ [0.7, 0.99]
fn bench_high_e(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xBADF00D);

    c.bench_function("solve_kepler_equation/high_e_0.7..0.99", |b| {
        b.iter_batched(
            || cases(&mut rng, |r| r.random_range(0.7..0.99)),
            run,
            BatchSize::LargeInput,
        )
    });
}

/// Near-circular regime: e ≈ 1e-12
fn bench_near_circular(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xFEEDFACE);

    c.bench_function("solve_kepler_equation/near_circular_e=1e-12", |b| {
        b.iter_batched(
            || cases(&mut rng, |_| 1e-12),
            run,
            BatchSize::LargeInput,
        )
    });
}

/// Small mean anomaly at high eccentricity, where the initial guess E = M is poorest.
fn bench_fixed_stress(c: &mut Criterion) {
    let e = 0.97_f64;
    let m = 1.0e-3_f64;

    c.bench_function("solve_kepler_equation/fixed_stress_case", |b| {
        b.iter(|| black_box(solve_kepler(black_box(m), black_box(e))))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_typical, bench_high_e, bench_near_circular, bench_fixed_stress
);
criterion_main!(benches);
