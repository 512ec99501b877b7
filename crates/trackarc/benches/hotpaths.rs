use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use trackarc::propagate::TrackSim;
use trackarc::{fit_circle, reconstruct, resample, FitConfig, ReconstructConfig};

/// Dense propagated track with small measurement noise, the shape the
/// pipeline sees in production.
fn make_track(n_steps: usize, seed: u64) -> Vec<[f64; 2]> {
    let sim = TrackSim {
        start_cm: [0.0, 0.0],
        direction: [0.0, 1.0],
        momentum_gev: 1.5,
        charge: 1,
        field_tesla: 0.5,
        step_cm: 0.25,
        n_steps,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    sim.positions()
        .into_iter()
        .map(|p| {
            [
                p[0] + rng.gen_range(-0.05..0.05),
                p[1] + rng.gen_range(-0.05..0.05),
            ]
        })
        .collect()
}

fn bench_thinning(c: &mut Criterion) {
    let hits = make_track(7000, 11);

    c.bench_function("thin_7000_hits", |b| {
        b.iter(|| {
            let thin = resample(black_box(&hits), black_box(10.0));
            black_box(thin.len())
        })
    });
}

fn bench_circle_fit(c: &mut Criterion) {
    let hits = make_track(7000, 22);
    let thin = resample(&hits, 10.0);
    let config = FitConfig::with_center(950.0, 50.0);

    c.bench_function("fit_raw_7001pts", |b| {
        b.iter(|| fit_circle(black_box(&hits), black_box(&config)).expect("fit"))
    });

    c.bench_function("fit_thinned", |b| {
        b.iter(|| fit_circle(black_box(&thin), black_box(&config)).expect("fit"))
    });
}

fn bench_reconstruct(c: &mut Criterion) {
    let hits = make_track(7000, 33);
    let config = ReconstructConfig {
        min_spacing_cm: Some(10.0),
        ..ReconstructConfig::new(FitConfig::with_center(950.0, 50.0), 0.5)
    };

    c.bench_function("reconstruct_7001pts_thinned", |b| {
        b.iter(|| reconstruct(black_box(&hits), black_box(&config)).expect("reconstruct"))
    });
}

criterion_group!(hotpaths, bench_thinning, bench_circle_fit, bench_reconstruct);
criterion_main!(hotpaths);
