//! Shared test fixtures for Apsis development.
//!
//! Standard environments and reference states used by unit and
//! integration tests across the workspace, so scenario setup reads the
//! same everywhere. Everything here is deterministic; fixtures that take
//! no arguments return the same values on every call.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use nalgebra::{Vector3, Vector6};

use apsis_astro::KeplerianElements;
use apsis_bodies::{Body, BodyState, Environment, EphemerisSource, InertiaModel};
use apsis_core::BodyId;

/// Earth's gravitational parameter in m^3/s^2.
pub const MU_EARTH: f64 = 3.986004418e14;

/// Radius of the standard low-Earth test orbit in m (roughly 400 km up).
pub const LEO_RADIUS: f64 = 6.778e6;

/// An Earth pinned at the frame origin, able to attract.
pub fn earth() -> Body {
    Body::new("earth")
        .with_gravitational_parameter(MU_EARTH)
        .with_ephemeris(EphemerisSource::Fixed(Vector6::zeros()))
}

/// An environment holding just the Earth and a bare craft.
///
/// The craft has no properties set; give it what the scenario needs
/// before registering, or use [`tumbling_craft`] for attitude work.
pub fn earth_craft_environment() -> (Environment, BodyId, BodyId) {
    let mut environment = Environment::new();
    let earth = environment
        .add_body(earth())
        .unwrap_or_else(|e| panic!("fixture environment rejected earth: {e}"));
    let craft = environment
        .add_body(Body::new("craft"))
        .unwrap_or_else(|e| panic!("fixture environment rejected craft: {e}"));
    (environment, earth, craft)
}

/// A craft with a rigid asymmetric inertia tensor, for attitude scenarios.
pub fn tumbling_craft(name: &str) -> Body {
    Body::new(name).with_inertia(InertiaModel::diagonal(10.0, 20.0, 30.0))
}

/// A circular prograde equatorial orbit: position on +x, velocity on +y.
pub fn circular_orbit_state(radius: f64, mu: f64) -> BodyState {
    let speed = (mu / radius).sqrt();
    BodyState {
        translational: Vector6::new(radius, 0.0, 0.0, 0.0, speed, 0.0),
        ..BodyState::default()
    }
}

/// The standard low-Earth test orbit as a state vector.
pub fn leo_state() -> BodyState {
    circular_orbit_state(LEO_RADIUS, MU_EARTH)
}

/// Elements describing [`leo_state`] for analytic comparison.
///
/// At zero eccentricity, inclination, and anomaly the conversion to
/// Cartesian reproduces [`leo_state`] exactly, so integrated trajectories
/// can be checked against two-body theory with no setup error.
pub fn leo_elements() -> KeplerianElements {
    KeplerianElements {
        semi_major_axis: LEO_RADIUS,
        eccentricity: 0.0,
        inclination: 0.0,
        raan: 0.0,
        argument_of_periapsis: 0.0,
        true_anomaly: 0.0,
    }
}

/// A gentle tumble to bolt onto an orbit state for attitude scenarios.
pub fn with_tumble(mut state: BodyState, rate: Vector3<f64>) -> BodyState {
    state.angular_rate = rate;
    state
}
