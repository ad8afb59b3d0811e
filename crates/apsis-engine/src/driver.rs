//! Single-arc integration loop.
//!
//! [`integrate_arc`] walks one stepping method across one arc interval,
//! committing a sample per accepted step. The driver is agnostic to the
//! stepping scheme: the method picks its own step sizes, the driver only
//! clamps requests onto the arc end and enforces forward progress. Each
//! committed sample is post-processed: non-finite components abort the
//! arc, attitude quaternions are renormalized in place.

use std::time::Instant;

use nalgebra::DVector;

use apsis_core::{ArcInterval, DynamicsError, StateLayout};
use apsis_dynamics::DynamicsModel;
use apsis_integrate::SteppingMethod;

use crate::metrics::ArcMetrics;

/// One arc's committed history.
#[derive(Clone, Debug)]
pub struct ArcOutput {
    /// Sample times, strictly increasing. The first is the arc start,
    /// the last the arc end, both exact.
    pub times: Vec<f64>,
    /// Combined state vectors, parallel to `times`.
    pub states: Vec<DVector<f64>>,
    /// Counters for this arc.
    pub metrics: ArcMetrics,
}

/// Integrates one arc from `initial` at the arc start to the arc end.
///
/// `initial` must match the model's layout; the caller assembles it from
/// the arc definition. `initial_step` seeds the first step request;
/// afterwards each request is whatever the method asked for next,
/// clamped onto the remaining interval. Failures carry the last time the
/// state was known good.
pub fn integrate_arc(
    model: &mut DynamicsModel<'_>,
    method: &mut dyn SteppingMethod,
    interval: ArcInterval,
    initial: DVector<f64>,
    initial_step: f64,
) -> Result<ArcOutput, DynamicsError> {
    let arc_start = Instant::now();
    let evaluations_before = model.evaluations();
    let layout = model.layout().clone();

    let mut time = interval.start;
    let mut state = initial;
    commit(&layout, &mut state, interval.start)?;

    let mut times = vec![time];
    let mut states = vec![state.clone()];
    let mut accepted_steps = 0u64;
    let mut dt = initial_step;

    {
        let mut rhs =
            |t: f64, y: &DVector<f64>, dy: &mut DVector<f64>| model.evaluate(t, y, dy);
        while time < interval.end {
            let remaining = interval.end - time;
            let request = dt.min(remaining);
            let outcome = method.step(&mut rhs, time, &state, request)?;

            // The final accepted step lands bitwise on the arc end.
            let next_time = if outcome.dt_used == request && request == remaining {
                interval.end
            } else {
                time + outcome.dt_used
            };
            if next_time <= time {
                return Err(DynamicsError::StepSizeUnderflow {
                    time,
                    step: outcome.dt_used,
                });
            }

            state = outcome.state;
            commit(&layout, &mut state, time)?;

            times.push(next_time);
            states.push(state.clone());
            accepted_steps += 1;
            time = next_time;
            dt = outcome.dt_next;
        }
    }

    let metrics = ArcMetrics {
        accepted_steps,
        derivative_evaluations: model.evaluations() - evaluations_before,
        samples: times.len(),
        total_us: arc_start.elapsed().as_micros() as u64,
    };
    Ok(ArcOutput {
        times,
        states,
        metrics,
    })
}

/// Post-processes a committed sample in place.
///
/// `last_valid` is the attribution time for failures: the most recent
/// time the state was known good.
fn commit(
    layout: &StateLayout,
    state: &mut DVector<f64>,
    last_valid: f64,
) -> Result<(), DynamicsError> {
    for slot in layout.slots() {
        let block = state.rows(slot.offset(), slot.dim());
        if block.iter().any(|v| !v.is_finite()) {
            return Err(DynamicsError::NonFiniteState {
                body: slot.body(),
                time: last_valid,
            });
        }
    }
    for slot in layout.slots() {
        if let Some(rotation) = slot.rotation() {
            let attitude = rotation.attitude(state);
            let norm = attitude.norm();
            if norm == 0.0 {
                return Err(DynamicsError::DegenerateQuaternion {
                    body: slot.body(),
                    time: last_valid,
                });
            }
            rotation.set_attitude(state, &(attitude / norm));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apsis_bodies::{Body, Environment, EphemerisSource, InertiaModel};
    use apsis_core::BodyId;
    use apsis_dynamics::{AccelerationModel, ModelSetMap};
    use apsis_integrate::{IntegratorConfig, Method};
    use nalgebra::Vector6;

    const MU_EARTH: f64 = 3.986004418e14;

    fn two_body_environment() -> (Environment, BodyId, BodyId) {
        let mut environment = Environment::new();
        let earth = environment
            .add_body(
                Body::new("earth")
                    .with_gravitational_parameter(MU_EARTH)
                    .with_ephemeris(EphemerisSource::Fixed(Vector6::zeros())),
            )
            .unwrap();
        let craft = environment.add_body(Body::new("craft")).unwrap();
        (environment, earth, craft)
    }

    fn point_mass_models(earth: BodyId, craft: BodyId) -> ModelSetMap {
        let mut models = ModelSetMap::new();
        models
            .entry(craft)
            .add_acceleration(earth, AccelerationModel::PointMassGravity);
        models
    }

    #[test]
    fn samples_bracket_the_arc_exactly() {
        let (environment, earth, craft) = two_body_environment();
        let models = point_mass_models(earth, craft);
        let layout = StateLayout::new([(craft, false)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(60.0).build();

        let mut initial = layout.zeros();
        initial[0] = 6.778e6;
        initial[4] = 7.67e3;

        let output = integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(0.0, 450.0),
            initial,
            60.0,
        )
        .unwrap();

        assert_eq!(output.times[0], 0.0);
        assert_eq!(*output.times.last().unwrap(), 450.0);
        assert!(output.times.windows(2).all(|w| w[0] < w[1]));
        // Seven full steps of 60 s, then a 30 s clamp onto the end.
        assert_eq!(output.metrics.accepted_steps, 8);
        assert_eq!(output.metrics.samples, 9);
        assert_eq!(output.metrics.derivative_evaluations, 32);
        assert_eq!(output.states.len(), output.times.len());
    }

    #[test]
    fn uneven_interval_lands_on_the_end() {
        let (environment, earth, craft) = two_body_environment();
        let models = point_mass_models(earth, craft);
        let layout = StateLayout::new([(craft, false)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(37.0).build();

        let mut initial = layout.zeros();
        initial[0] = 6.778e6;
        initial[4] = 7.67e3;

        let output = integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(100.0, 250.0),
            initial,
            37.0,
        )
        .unwrap();

        assert_eq!(output.times, vec![100.0, 137.0, 174.0, 211.0, 248.0, 250.0]);
    }

    #[test]
    fn adaptive_method_respects_the_end_clamp() {
        let (environment, earth, craft) = two_body_environment();
        let models = point_mass_models(earth, craft);
        let layout = StateLayout::new([(craft, false)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let config = IntegratorConfig {
            method: Method::Rkf45 {
                rel_tol: 1e-6,
                abs_tol: 100.0,
                min_step: 1e-3,
                max_step: 1e6,
            },
            initial_step: 500.0,
        };
        let mut method = config.build();

        let mut initial = layout.zeros();
        initial[0] = 6.778e6;
        initial[4] = 7.67e3;

        let output = integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(0.0, 100.0),
            initial,
            config.initial_step,
        )
        .unwrap();

        assert_eq!(output.times[0], 0.0);
        assert_eq!(*output.times.last().unwrap(), 100.0);
        assert!(output.times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn committed_attitudes_stay_unit_norm() {
        let mut environment = Environment::new();
        let craft = environment
            .add_body(Body::new("craft").with_inertia(InertiaModel::diagonal(10.0, 20.0, 30.0)))
            .unwrap();
        let models = ModelSetMap::new();
        let layout = StateLayout::new([(craft, true)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(1.0).build();

        let mut initial = layout.zeros();
        initial[6] = 1.0; // identity attitude, scalar first
        initial[10] = 0.3;
        initial[11] = 0.2;
        initial[12] = 0.1;

        let output = integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(0.0, 120.0),
            initial,
            1.0,
        )
        .unwrap();

        for state in &output.states {
            let norm = (state[6] * state[6]
                + state[7] * state[7]
                + state[8] * state[8]
                + state[9] * state[9])
                .sqrt();
            assert!((norm - 1.0).abs() < 1e-12, "quaternion norm {norm}");
        }
    }

    #[test]
    fn zero_attitude_is_rejected_at_the_initial_sample() {
        let mut environment = Environment::new();
        let craft = environment
            .add_body(Body::new("craft").with_inertia(InertiaModel::diagonal(1.0, 1.0, 1.0)))
            .unwrap();
        let models = ModelSetMap::new();
        let layout = StateLayout::new([(craft, true)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(1.0).build();

        let initial = layout.zeros();
        match integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(0.0, 10.0),
            initial,
            1.0,
        ) {
            Err(DynamicsError::DegenerateQuaternion { body, time }) => {
                assert_eq!(body, craft);
                assert_eq!(time, 0.0);
            }
            other => panic!("expected DegenerateQuaternion, got {other:?}"),
        }
    }

    #[test]
    fn runaway_state_reports_the_last_valid_time() {
        let (environment, earth, craft) = two_body_environment();
        let models = point_mass_models(earth, craft);
        let layout = StateLayout::new([(craft, false)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(60.0).build();

        let mut initial = layout.zeros();
        initial[0] = 7.0e6;
        initial[3] = 1.0e308; // overflows position within one step

        match integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(0.0, 600.0),
            initial,
            60.0,
        ) {
            Err(DynamicsError::NonFiniteState { body, time }) => {
                assert_eq!(body, craft);
                assert_eq!(time, 0.0);
            }
            other => panic!("expected NonFiniteState, got {other:?}"),
        }
    }

    #[test]
    fn step_too_small_to_advance_the_clock_is_an_underflow() {
        let mut environment = Environment::new();
        let craft = environment.add_body(Body::new("craft")).unwrap();
        let models = ModelSetMap::new();
        let layout = StateLayout::new([(craft, false)]);
        let mut model = DynamicsModel::new(&environment, layout.clone(), &models);
        let mut method = IntegratorConfig::rk4(1.0).build();

        // At t = 1e17 the clock resolution is 16 s; a one-second step
        // cannot advance it.
        let start = 1.0e17;
        match integrate_arc(
            &mut model,
            method.as_mut(),
            ArcInterval::new(start, start + 32.0),
            layout.zeros(),
            1.0,
        ) {
            Err(DynamicsError::StepSizeUnderflow { time, step }) => {
                assert_eq!(time, start);
                assert_eq!(step, 1.0);
            }
            other => panic!("expected StepSizeUnderflow, got {other:?}"),
        }
    }
}
