//! Per-evaluation snapshot of every body the derivative model touches.
//!
//! Integrators evaluate the derivative at speculative states that are later
//! discarded, so nothing in the derivative path may write through to the
//! [`Environment`]. The [`StateFrame`] absorbs those reads instead: it is
//! refreshed once per derivative evaluation, propagated bodies from the
//! integration state vector and every other referenced body from its
//! ephemeris source, with mass properties re-evaluated at the frame time.

use apsis_bodies::{Body, Environment};
use apsis_core::{BodyId, DynamicsError, StateLayout};
use nalgebra::{DVector, Matrix3, Quaternion, Vector3};

/// One body's kinematic state and mass properties at the frame time.
///
/// Properties the body does not carry are filled with NaN, so a model
/// evaluated against a body it was never validated for surfaces as a
/// non-finite state rather than a plausible number.
#[derive(Debug, Clone)]
pub struct BodySnapshot {
    /// Which body this snapshot describes.
    pub body: BodyId,
    /// Inertial position, m.
    pub position: Vector3<f64>,
    /// Inertial velocity, m/s.
    pub velocity: Vector3<f64>,
    /// Body-fixed-to-inertial attitude quaternion, scalar first.
    pub attitude: Quaternion<f64>,
    /// Body-fixed angular rate, rad/s.
    pub angular_rate: Vector3<f64>,
    /// Gravitational parameter, m^3/s^2.
    pub gravitational_parameter: f64,
    /// Mass, kg.
    pub mass: f64,
    /// Body-fixed inertia tensor, kg m^2.
    pub inertia: Matrix3<f64>,
    /// Time derivative of the inertia tensor.
    pub inertia_rate: Matrix3<f64>,
}

impl BodySnapshot {
    fn vacant(body: BodyId) -> Self {
        Self {
            body,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: Quaternion::identity(),
            angular_rate: Vector3::zeros(),
            gravitational_parameter: f64::NAN,
            mass: f64::NAN,
            inertia: Matrix3::from_element(f64::NAN),
            inertia_rate: Matrix3::from_element(f64::NAN),
        }
    }
}

/// Scratch snapshot of all bodies involved in one derivative evaluation.
#[derive(Debug, Clone)]
pub struct StateFrame {
    snapshots: Vec<BodySnapshot>,
    time: f64,
}

impl StateFrame {
    /// Create a frame sized for `body_count` bodies with ids `0..body_count`.
    pub fn new(body_count: usize) -> Self {
        let snapshots = (0..body_count)
            .map(|index| BodySnapshot::vacant(BodyId(index as u32)))
            .collect();
        Self {
            snapshots,
            time: 0.0,
        }
    }

    /// Time the frame was last refreshed at.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Snapshot of one body.
    ///
    /// # Panics
    ///
    /// Panics if `body` lies outside the environment the frame was sized for.
    pub fn snapshot(&self, body: BodyId) -> &BodySnapshot {
        &self.snapshots[body.index()]
    }

    /// Refresh the frame at `time`.
    ///
    /// Bodies in `layout` read their state from `state`; bodies listed in
    /// `ephemeris_driven` read their translational state from their
    /// ephemeris source. Mass properties are re-evaluated at `time` for
    /// every touched body. An ephemeris failure aborts the refresh.
    pub fn refresh(
        &mut self,
        environment: &Environment,
        layout: &StateLayout,
        ephemeris_driven: &[BodyId],
        time: f64,
        state: &DVector<f64>,
    ) -> Result<(), DynamicsError> {
        self.time = time;

        for slot in layout.slots() {
            let snapshot = &mut self.snapshots[slot.body().index()];
            snapshot.position = slot.position(state);
            snapshot.velocity = slot.velocity(state);
            match slot.rotation() {
                Some(rotation) => {
                    snapshot.attitude = rotation.attitude(state);
                    snapshot.angular_rate = rotation.angular_rate(state);
                }
                None => {
                    snapshot.attitude = Quaternion::identity();
                    snapshot.angular_rate = Vector3::zeros();
                }
            }
            if let Some(record) = environment.body(slot.body()) {
                refresh_properties(snapshot, record, time);
            }
        }

        for &body in ephemeris_driven {
            let Some(record) = environment.body(body) else {
                continue;
            };
            let snapshot = &mut self.snapshots[body.index()];
            match &record.ephemeris {
                Some(source) => {
                    let translational = source
                        .state_at(time)
                        .map_err(|err| DynamicsError::Ephemeris {
                            body,
                            time,
                            source: err,
                        })?;
                    snapshot.position = translational.fixed_rows::<3>(0).into_owned();
                    snapshot.velocity = translational.fixed_rows::<3>(3).into_owned();
                }
                None => {
                    // Validation requires a source here; NaN keeps a gap loud.
                    snapshot.position = Vector3::from_element(f64::NAN);
                    snapshot.velocity = Vector3::from_element(f64::NAN);
                }
            }
            snapshot.attitude = Quaternion::identity();
            snapshot.angular_rate = Vector3::zeros();
            refresh_properties(snapshot, record, time);
        }

        Ok(())
    }
}

fn refresh_properties(snapshot: &mut BodySnapshot, record: &Body, time: f64) {
    snapshot.gravitational_parameter = record.gravitational_parameter.unwrap_or(f64::NAN);
    snapshot.mass = match &record.mass {
        Some(model) => model.mass_at(time),
        None => f64::NAN,
    };
    match &record.inertia {
        Some(model) => {
            snapshot.inertia = model.inertia_at(time);
            snapshot.inertia_rate = model.inertia_rate_at(time);
        }
        None => {
            snapshot.inertia = Matrix3::from_element(f64::NAN);
            snapshot.inertia_rate = Matrix3::from_element(f64::NAN);
        }
    }
}
