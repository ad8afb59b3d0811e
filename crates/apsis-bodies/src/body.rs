//! The body record.

use nalgebra::{Quaternion, Vector3, Vector6};

use crate::ephemeris_source::EphemerisSource;
use crate::properties::{InertiaModel, MassModel};

/// A body's current kinematic state slot.
///
/// The engine writes this once, at the successful end of a run (each
/// propagated body receives the final arc's final sample). It is a
/// convenience record, not an input: arc initial states always come
/// from the job.
#[derive(Clone, Debug, PartialEq)]
pub struct BodyState {
    /// `[position, velocity]` in the propagation frame.
    pub translational: Vector6<f64>,
    /// Attitude quaternion (body-fixed to inertial), scalar-first.
    pub attitude: Quaternion<f64>,
    /// Body-fixed angular rate.
    pub angular_rate: Vector3<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            translational: Vector6::zeros(),
            attitude: Quaternion::identity(),
            angular_rate: Vector3::zeros(),
        }
    }
}

/// A named participant in the simulation.
///
/// Physical properties are optional; the job validator demands exactly
/// the properties the configured models need (a gravitational parameter
/// to attract, a mass to be dragged, an inertia model to rotate), so a
/// missing property is a setup error rather than a runtime surprise.
#[derive(Clone, Debug)]
pub struct Body {
    /// Unique name within the environment.
    pub name: String,
    /// Gravitational parameter `mu` in m^3/s^2, for attracting bodies.
    pub gravitational_parameter: Option<f64>,
    /// Mass history, for bodies undergoing mass-scaled forces.
    pub mass: Option<MassModel>,
    /// Inertia history, for bodies propagated with attitude.
    pub inertia: Option<InertiaModel>,
    /// Externally-defined state source, for non-propagated bodies.
    pub ephemeris: Option<EphemerisSource>,
    /// Current state slot.
    pub state: BodyState,
}

impl Body {
    /// A body with no properties set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gravitational_parameter: None,
            mass: None,
            inertia: None,
            ephemeris: None,
            state: BodyState::default(),
        }
    }

    /// Sets the gravitational parameter.
    pub fn with_gravitational_parameter(mut self, mu: f64) -> Self {
        self.gravitational_parameter = Some(mu);
        self
    }

    /// Sets the mass model.
    pub fn with_mass(mut self, mass: MassModel) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Sets the inertia model.
    pub fn with_inertia(mut self, inertia: InertiaModel) -> Self {
        self.inertia = Some(inertia);
        self
    }

    /// Sets the ephemeris source.
    pub fn with_ephemeris(mut self, source: EphemerisSource) -> Self {
        self.ephemeris = Some(source);
        self
    }
}
