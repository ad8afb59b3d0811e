//! Criterion benchmarks for single derivative evaluations.
//!
//! The right-hand side dominates integration cost, so these isolate one
//! `evaluate` call per profile at increasing model-stack weight.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nalgebra::DVector;

use apsis_bench::{leo_profile, perturbed_profile, tumbling_profile};
use apsis_bodies::BodyState;
use apsis_core::StateLayout;
use apsis_dynamics::DynamicsModel;

/// Packs arc-zero initial states into a combined state vector.
fn packed_state(layout: &StateLayout, states: &[BodyState]) -> DVector<f64> {
    let mut y = layout.zeros();
    for (slot, state) in layout.slots().iter().zip(states) {
        slot.set_translational(&mut y, &state.translational);
        if let Some(rotation) = slot.rotation() {
            rotation.set_attitude(&mut y, &state.attitude);
            rotation.set_angular_rate(&mut y, &state.angular_rate);
        }
    }
    y
}

fn bench_point_mass_eval(c: &mut Criterion) {
    let (environment, job) = leo_profile();
    let layout = job.layout();
    let y = packed_state(&layout, &job.arcs[0].initial_states);
    let mut dy = layout.zeros();
    let mut model = DynamicsModel::new(&environment, layout, job.models_for_arc(0));

    c.bench_function("point_mass_eval", |b| {
        b.iter(|| {
            model.evaluate(black_box(0.0), &y, &mut dy).unwrap();
            black_box(&dy);
        });
    });
}

fn bench_perturbed_eval(c: &mut Criterion) {
    let (environment, job) = perturbed_profile();
    let layout = job.layout();
    let y = packed_state(&layout, &job.arcs[0].initial_states);
    let mut dy = layout.zeros();
    let mut model = DynamicsModel::new(&environment, layout, job.models_for_arc(0));

    c.bench_function("perturbed_eval", |b| {
        b.iter(|| {
            model.evaluate(black_box(0.0), &y, &mut dy).unwrap();
            black_box(&dy);
        });
    });
}

fn bench_coupled_attitude_eval(c: &mut Criterion) {
    let (environment, job) = tumbling_profile();
    let layout = job.layout();
    let y = packed_state(&layout, &job.arcs[0].initial_states);
    let mut dy = layout.zeros();
    let mut model = DynamicsModel::new(&environment, layout, job.models_for_arc(0));

    c.bench_function("coupled_attitude_eval", |b| {
        b.iter(|| {
            model.evaluate(black_box(0.0), &y, &mut dy).unwrap();
            black_box(&dy);
        });
    });
}

criterion_group!(
    benches,
    bench_point_mass_eval,
    bench_perturbed_eval,
    bench_coupled_attitude_eval
);
criterion_main!(benches);
