//! Criterion benchmarks for whole propagation runs.
//!
//! Each iteration clones the environment so `run` always starts from
//! the same pre-propagation state.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use apsis_bench::{leo_profile, perturbed_profile, segmented_leo_profile, tumbling_profile};
use apsis_engine::{ArcScheduling, MultiArcPropagator};

fn bench_leo_run(c: &mut Criterion) {
    let (environment, job) = leo_profile();
    let propagator = MultiArcPropagator::new(job, &environment).unwrap();

    c.bench_function("leo_rk4_90min", |b| {
        b.iter(|| {
            let mut environment = environment.clone();
            let solution = propagator.run(&mut environment).unwrap();
            black_box(&solution);
        });
    });
}

fn bench_perturbed_run(c: &mut Criterion) {
    let (environment, job) = perturbed_profile();
    let propagator = MultiArcPropagator::new(job, &environment).unwrap();

    c.bench_function("perturbed_rk4_90min", |b| {
        b.iter(|| {
            let mut environment = environment.clone();
            let solution = propagator.run(&mut environment).unwrap();
            black_box(&solution);
        });
    });
}

fn bench_tumbling_run(c: &mut Criterion) {
    let (environment, job) = tumbling_profile();
    let propagator = MultiArcPropagator::new(job, &environment).unwrap();

    c.bench_function("tumbling_rk4_10min", |b| {
        b.iter(|| {
            let mut environment = environment.clone();
            let solution = propagator.run(&mut environment).unwrap();
            black_box(&solution);
        });
    });
}

fn bench_segmented_sequential(c: &mut Criterion) {
    let (environment, job) = segmented_leo_profile(8);
    let propagator = MultiArcPropagator::new(job, &environment).unwrap();

    c.bench_function("eight_arcs_sequential", |b| {
        b.iter(|| {
            let mut environment = environment.clone();
            let solution = propagator.run(&mut environment).unwrap();
            black_box(&solution);
        });
    });
}

fn bench_segmented_parallel(c: &mut Criterion) {
    let (environment, mut job) = segmented_leo_profile(8);
    job.scheduling = ArcScheduling::Parallel;
    let propagator = MultiArcPropagator::new(job, &environment).unwrap();

    c.bench_function("eight_arcs_parallel", |b| {
        b.iter(|| {
            let mut environment = environment.clone();
            let solution = propagator.run(&mut environment).unwrap();
            black_box(&solution);
        });
    });
}

criterion_group!(
    benches,
    bench_leo_run,
    bench_perturbed_run,
    bench_tumbling_run,
    bench_segmented_sequential,
    bench_segmented_parallel
);
criterion_main!(benches);
