//! Closed set of body-fixed torque models.
//!
//! Mirror of [`crate::acceleration`] for the rotational equations: every
//! torque is a [`TorqueModel`] variant evaluated through one dispatch
//! point, returning the torque on the undergoing body expressed in its
//! own body-fixed frame, in N m.

use apsis_core::{BodyId, DynamicsError};
use nalgebra::{UnitQuaternion, Vector3};

use crate::frame::StateFrame;

/// One torque acting on a propagated body with rotational state.
#[derive(Debug, Clone, PartialEq)]
pub enum TorqueModel {
    /// Second-degree gravity-gradient torque `(3 μ_B / ‖r‖⁵) · r_b × (I r_b)`
    /// with `r_b` the separation to the exerting body rotated into the
    /// undergoing body's frame and `I` its inertia tensor.
    GravityGradient,

    /// A fixed torque in the undergoing body's frame.
    ConstantBodyFixed {
        /// The applied torque, N m.
        torque: Vector3<f64>,
    },
}

impl TorqueModel {
    /// Short human-readable model name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GravityGradient => "gravity-gradient torque",
            Self::ConstantBodyFixed { .. } => "constant body-fixed torque",
        }
    }

    /// Evaluate the torque on `undergoing` due to `exerting` against the
    /// refreshed `frame`.
    pub fn evaluate(
        &self,
        frame: &StateFrame,
        undergoing: BodyId,
        exerting: BodyId,
    ) -> Result<Vector3<f64>, DynamicsError> {
        match self {
            Self::GravityGradient => {
                let target = frame.snapshot(undergoing);
                let source = frame.snapshot(exerting);
                let separation = source.position - target.position;
                let distance = separation.norm();
                if distance == 0.0 {
                    return Err(DynamicsError::DegenerateSeparation {
                        undergoing,
                        exerting,
                        time: frame.time(),
                    });
                }
                // Attitude maps body to inertial; the separation comes back
                // through the inverse.
                let rotation = UnitQuaternion::from_quaternion(target.attitude);
                let body_fixed = rotation.inverse_transform_vector(&separation);
                let scale = 3.0 * source.gravitational_parameter / distance.powi(5);
                Ok(body_fixed.cross(&(target.inertia * body_fixed)) * scale)
            }

            Self::ConstantBodyFixed { torque } => Ok(*torque),
        }
    }
}
