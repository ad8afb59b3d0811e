//! Benchmark profiles for the Apsis propagation engine.
//!
//! Pre-built environment/job pairs at increasing right-hand-side cost:
//!
//! - [`leo_profile`]: one craft under point-mass gravity alone.
//! - [`perturbed_profile`]: zonal harmonics, a lunar third body, drag,
//!   and radiation pressure on top of the point mass.
//! - [`tumbling_profile`]: coupled attitude propagation with a
//!   gravity-gradient torque.
//! - [`segmented_leo_profile`]: the point-mass orbit split into several
//!   arcs, for comparing sequential and parallel scheduling.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use nalgebra::{Vector3, Vector6};

use apsis_bodies::{Body, BodyState, Environment, EphemerisSource, InertiaModel, MassModel};
use apsis_core::ArcInterval;
use apsis_dynamics::{AccelerationModel, ExponentialAtmosphere, ModelSetMap, TorqueModel};
use apsis_engine::{
    ArcDefinition, ArcScheduling, IntegratorSelection, Interpolation, PropagatedBody,
    PropagationJob,
};
use apsis_integrate::IntegratorConfig;

const MU_EARTH: f64 = 3.986004418e14;
const MU_MOON: f64 = 4.9048695e12;
const LEO_RADIUS: f64 = 6.778e6;

fn earth() -> Body {
    Body::new("earth")
        .with_gravitational_parameter(MU_EARTH)
        .with_ephemeris(EphemerisSource::Fixed(Vector6::zeros()))
}

fn leo_state() -> BodyState {
    let speed = (MU_EARTH / LEO_RADIUS).sqrt();
    BodyState {
        translational: Vector6::new(LEO_RADIUS, 0.0, 0.0, 0.0, speed, 0.0),
        ..BodyState::default()
    }
}

/// Reference profile: one craft, point-mass gravity, a 90-minute arc.
pub fn leo_profile() -> (Environment, PropagationJob) {
    let mut environment = Environment::new();
    let earth = environment.add_body(earth()).unwrap();
    let craft = environment.add_body(Body::new("craft")).unwrap();

    let mut models = ModelSetMap::new();
    models
        .entry(craft)
        .add_acceleration(earth, AccelerationModel::PointMassGravity);

    let job = PropagationJob {
        bodies: vec![PropagatedBody::translational(craft)],
        models,
        model_overrides: Vec::new(),
        arcs: vec![ArcDefinition::new(
            ArcInterval::new(0.0, 5400.0),
            vec![leo_state()],
        )],
        integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(10.0)),
        interpolation: Interpolation::Linear,
        scheduling: ArcScheduling::Sequential,
    };
    (environment, job)
}

/// Full perturbation stack: zonal harmonics to J4, the Moon as a third
/// body on a circular Keplerian ephemeris, exponential-atmosphere drag,
/// and solar radiation pressure on a 250 kg cannonball.
pub fn perturbed_profile() -> (Environment, PropagationJob) {
    let mut environment = Environment::new();
    let earth = environment.add_body(earth()).unwrap();
    let moon = environment
        .add_body(
            Body::new("moon")
                .with_gravitational_parameter(MU_MOON)
                .with_ephemeris(EphemerisSource::Keplerian {
                    elements: apsis_astro_circular(3.844e8),
                    gravitational_parameter: MU_EARTH,
                    epoch: 0.0,
                }),
        )
        .unwrap();
    let sun = environment
        .add_body(
            Body::new("sun")
                .with_ephemeris(EphemerisSource::Fixed(Vector6::new(
                    1.496e11, 0.0, 0.0, 0.0, 0.0, 0.0,
                ))),
        )
        .unwrap();
    let craft = environment
        .add_body(Body::new("craft").with_mass(MassModel::Constant(250.0)))
        .unwrap();

    let mut models = ModelSetMap::new();
    models
        .entry(craft)
        .add_acceleration(earth, AccelerationModel::PointMassGravity)
        .add_acceleration(
            earth,
            AccelerationModel::ZonalHarmonicGravity {
                reference_radius: 6.378137e6,
                j2: 1.08262668e-3,
                j3: -2.5326e-6,
                j4: -1.6196e-6,
            },
        )
        .add_acceleration(
            moon,
            AccelerationModel::ThirdBodyPointMassGravity { central: earth },
        )
        .add_acceleration(
            earth,
            AccelerationModel::AerodynamicDrag {
                reference_area: 2.0,
                drag_coefficient: 2.2,
                atmosphere: ExponentialAtmosphere {
                    surface_density: 1.225,
                    scale_height: 8.5e3,
                    surface_radius: 6.371e6,
                    rotation_rate: 7.2921159e-5,
                },
            },
        )
        .add_acceleration(
            sun,
            AccelerationModel::CannonballRadiationPressure {
                reference_area: 2.0,
                pressure_coefficient: 1.3,
                source_power: 3.828e26,
            },
        );

    let job = PropagationJob {
        bodies: vec![PropagatedBody::translational(craft)],
        models,
        model_overrides: Vec::new(),
        arcs: vec![ArcDefinition::new(
            ArcInterval::new(0.0, 5400.0),
            vec![leo_state()],
        )],
        integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(10.0)),
        interpolation: Interpolation::Linear,
        scheduling: ArcScheduling::Sequential,
    };
    (environment, job)
}

/// Coupled orbit and attitude with a gravity-gradient torque.
pub fn tumbling_profile() -> (Environment, PropagationJob) {
    let mut environment = Environment::new();
    let earth = environment.add_body(earth()).unwrap();
    let craft = environment
        .add_body(Body::new("craft").with_inertia(InertiaModel::diagonal(10.0, 20.0, 30.0)))
        .unwrap();

    let mut models = ModelSetMap::new();
    models
        .entry(craft)
        .add_acceleration(earth, AccelerationModel::PointMassGravity)
        .add_torque(earth, TorqueModel::GravityGradient);

    let mut initial = leo_state();
    initial.angular_rate = Vector3::new(0.05, 0.03, 0.02);

    let job = PropagationJob {
        bodies: vec![PropagatedBody::with_rotation(craft)],
        models,
        model_overrides: Vec::new(),
        arcs: vec![ArcDefinition::new(ArcInterval::new(0.0, 600.0), vec![initial])],
        integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(1.0)),
        interpolation: Interpolation::Linear,
        scheduling: ArcScheduling::Sequential,
    };
    (environment, job)
}

/// The point-mass orbit split into `segments` equal arcs, every arc
/// restarting from the same state. Arc contents are identical, which is
/// what makes the profile useful for scheduling comparisons.
pub fn segmented_leo_profile(segments: usize) -> (Environment, PropagationJob) {
    let (environment, mut job) = leo_profile();
    let width = 5400.0 / segments as f64;
    job.arcs = (0..segments)
        .map(|i| {
            let start = i as f64 * width;
            ArcDefinition::new(ArcInterval::new(start, start + width), vec![leo_state()])
        })
        .collect();
    (environment, job)
}

/// Circular equatorial elements with the given semi-major axis.
fn apsis_astro_circular(semi_major_axis: f64) -> apsis_astro::KeplerianElements {
    apsis_astro::KeplerianElements {
        semi_major_axis,
        eccentricity: 0.0,
        inclination: 0.0,
        raan: 0.0,
        argument_of_periapsis: 0.0,
        true_anomaly: 0.0,
    }
}
