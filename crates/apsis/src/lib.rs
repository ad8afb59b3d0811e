//! Apsis: multi-arc orbital and rotational dynamics propagation.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Apsis sub-crates. For most users, adding `apsis` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use apsis::prelude::*;
//! use apsis::nalgebra::Vector6;
//!
//! // Earth pinned at the frame origin, one craft in low orbit.
//! let mut environment = Environment::new();
//! let earth = environment
//!     .add_body(
//!         Body::new("earth")
//!             .with_gravitational_parameter(3.986004418e14)
//!             .with_ephemeris(EphemerisSource::Fixed(Vector6::zeros())),
//!     )
//!     .unwrap();
//! let craft = environment.add_body(Body::new("craft")).unwrap();
//!
//! // One point-mass acceleration, one ten-minute arc.
//! let mut models = ModelSetMap::new();
//! models
//!     .entry(craft)
//!     .add_acceleration(earth, AccelerationModel::PointMassGravity);
//! let job = PropagationJob {
//!     bodies: vec![PropagatedBody::translational(craft)],
//!     models,
//!     model_overrides: Vec::new(),
//!     arcs: vec![ArcDefinition::new(
//!         ArcInterval::new(0.0, 600.0),
//!         vec![BodyState {
//!             translational: Vector6::new(6.778e6, 0.0, 0.0, 0.0, 7.67e3, 0.0),
//!             ..BodyState::default()
//!         }],
//!     )],
//!     integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(60.0)),
//!     interpolation: Interpolation::default(),
//!     scheduling: ArcScheduling::Sequential,
//! };
//!
//! let propagator = MultiArcPropagator::new(job, &environment).unwrap();
//! let solution = propagator.run(&mut environment).unwrap();
//! let trajectory = solution.trajectory(craft).unwrap();
//! assert_eq!(trajectory.coverage(), Some((0.0, 600.0)));
//! assert!(trajectory.translational_at(300.0).is_ok());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the
//! prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `apsis-core` | IDs, arc intervals, state layouts, shared errors |
//! | [`astro`] | `apsis-astro` | Keplerian elements and analytic two-body motion |
//! | [`ephemeris`] | `apsis-ephemeris` | Multi-arc trajectories and interpolators |
//! | [`bodies`] | `apsis-bodies` | The environment, body records, ephemeris sources |
//! | [`dynamics`] | `apsis-dynamics` | Acceleration and torque models, derivative assembly |
//! | [`integrate`] | `apsis-integrate` | Stepping methods and integrator configuration |
//! | [`engine`] | `apsis-engine` | Jobs, the arc driver, the multi-arc orchestrator |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and shared errors (`apsis-core`).
///
/// Contains [`types::BodyId`], [`types::ArcInterval`], the combined state
/// vector layout, and the [`types::DynamicsError`] /
/// [`types::EphemerisError`] families.
pub use apsis_core as types;

/// Keplerian elements and analytic two-body motion (`apsis-astro`).
///
/// Convert between [`astro::KeplerianElements`] and Cartesian states,
/// solve Kepler's equation, and advance elements in time.
pub use apsis_astro as astro;

/// Multi-arc trajectories and interpolation (`apsis-ephemeris`).
///
/// [`ephemeris::Trajectory`] stores per-arc sample tables and answers
/// state queries through a configurable [`ephemeris::Interpolator`].
pub use apsis_ephemeris as ephemeris;

/// The environment and its body records (`apsis-bodies`).
///
/// [`bodies::Environment`] registers bodies with their physical
/// properties and [`bodies::EphemerisSource`]s.
pub use apsis_bodies as bodies;

/// Dynamical models and derivative assembly (`apsis-dynamics`).
///
/// The closed [`dynamics::AccelerationModel`] and
/// [`dynamics::TorqueModel`] enums, per-body model sets, and the
/// [`dynamics::DynamicsModel`] right-hand side.
pub use apsis_dynamics as dynamics;

/// Numerical stepping methods (`apsis-integrate`).
///
/// [`integrate::RungeKutta4`] and [`integrate::Rkf45`] behind the
/// [`integrate::SteppingMethod`] seam, configured through
/// [`integrate::IntegratorConfig`].
pub use apsis_integrate as integrate;

/// Jobs, the arc driver, and the orchestrator (`apsis-engine`).
///
/// Describe a run with [`engine::PropagationJob`], validate and execute
/// it with [`engine::MultiArcPropagator`].
pub use apsis_engine as engine;

/// The linear algebra crate the public API is expressed in.
///
/// Re-exported so downstream code can name `Vector6`, `Quaternion`, and
/// friends without pinning its own compatible version.
pub use nalgebra;

/// Common imports for typical Apsis usage.
///
/// ```rust
/// use apsis::prelude::*;
/// ```
///
/// This imports the most frequently used types: the environment and body
/// records, model configuration, integrator configuration, and the
/// multi-arc propagator with its job description.
pub mod prelude {
    // Identifiers, intervals, errors
    pub use apsis_core::{ArcInterval, BodyId, DynamicsError, EphemerisError, StateLayout};

    // Environment and bodies
    pub use apsis_bodies::{
        Body, BodyState, Environment, EphemerisSource, InertiaModel, MassModel,
    };

    // Analytic two-body motion
    pub use apsis_astro::KeplerianElements;

    // Trajectories
    pub use apsis_ephemeris::Trajectory;

    // Models
    pub use apsis_dynamics::{AccelerationModel, ModelSet, ModelSetMap, TorqueModel};

    // Integrators
    pub use apsis_integrate::{IntegratorConfig, Method};

    // Jobs and the orchestrator
    pub use apsis_engine::{
        ArcDefinition, ArcScheduling, IntegratorSelection, Interpolation, MultiArcPropagator,
        MultiArcSolution, PropagatedBody, PropagationFailure, PropagationJob, RunMetrics,
        SetupError,
    };
}
