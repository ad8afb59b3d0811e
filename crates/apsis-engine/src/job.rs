//! Propagation job description and its validation.
//!
//! A [`PropagationJob`] is plain data: which bodies to advance, the model
//! sets driving them, the arcs to integrate, and how to step and
//! interpolate. [`PropagationJob::validate()`] runs every configuration
//! check up front so the orchestrator can integrate without re-checking.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use apsis_bodies::{BodyState, Environment};
use apsis_core::{ArcInterval, BodyId, StateLayout};
use apsis_dynamics::{validate_model_sets, ModelSetMap, ModelSetupError};
use apsis_ephemeris::{Interpolator, LagrangeInterpolator, LinearInterpolator};
use apsis_integrate::{ConfigError, IntegratorConfig};

// ── SetupError ───────────────────────────────────────────────────

/// A configuration violation detected before any integration starts.
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// The job names no propagated bodies.
    NoPropagatedBodies,
    /// The job defines no arcs.
    NoArcs,
    /// A propagated body is not registered in the environment.
    UnknownBody {
        /// The missing body.
        body: BodyId,
    },
    /// A body appears more than once in the propagated list.
    DuplicateBody {
        /// The repeated body.
        body: BodyId,
    },
    /// An arc interval is non-finite or not forward in time.
    MalformedArc {
        /// Index of the offending arc.
        arc_index: usize,
        /// Configured start time.
        start: f64,
        /// Configured end time.
        end: f64,
    },
    /// A per-arc integrator list does not pair one-to-one with the arcs.
    IntegratorCountMismatch {
        /// Number of configurations supplied.
        configurations: usize,
        /// Number of arcs defined.
        arcs: usize,
    },
    /// An arc's initial-state list does not cover the propagated bodies.
    InitialStateCountMismatch {
        /// Index of the offending arc.
        arc_index: usize,
        /// Number of initial states supplied.
        states: usize,
        /// Number of propagated bodies.
        bodies: usize,
    },
    /// A model override targets an arc index past the end of the list.
    OverrideOutOfRange {
        /// The out-of-range arc index.
        arc_index: usize,
        /// Number of arcs defined.
        arcs: usize,
    },
    /// A model set failed its reference or parameter checks.
    Model(ModelSetupError),
    /// An integrator configuration failed its parameter checks.
    Integrator(ConfigError),
    /// Parallel scheduling with a model entry reading a propagated body.
    ParallelPropagatedReference {
        /// The body whose model set holds the entry.
        undergoing: BodyId,
        /// The propagated body the entry reads.
        referenced: BodyId,
    },
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPropagatedBodies => write!(f, "job names no propagated bodies"),
            Self::NoArcs => write!(f, "job defines no arcs"),
            Self::UnknownBody { body } => {
                write!(f, "propagated body {body} is not in the environment")
            }
            Self::DuplicateBody { body } => {
                write!(f, "body {body} appears more than once in the propagated list")
            }
            Self::MalformedArc {
                arc_index,
                start,
                end,
            } => {
                write!(
                    f,
                    "arc {arc_index} interval [{start}, {end}] must be finite with start < end"
                )
            }
            Self::IntegratorCountMismatch {
                configurations,
                arcs,
            } => {
                write!(
                    f,
                    "{configurations} per-arc integrator configurations for {arcs} arcs"
                )
            }
            Self::InitialStateCountMismatch {
                arc_index,
                states,
                bodies,
            } => {
                write!(
                    f,
                    "arc {arc_index} supplies {states} initial states for {bodies} propagated bodies"
                )
            }
            Self::OverrideOutOfRange { arc_index, arcs } => {
                write!(f, "model override targets arc {arc_index} of {arcs}")
            }
            Self::Model(source) => write!(f, "{source}"),
            Self::Integrator(source) => write!(f, "{source}"),
            Self::ParallelPropagatedReference {
                undergoing,
                referenced,
            } => {
                write!(
                    f,
                    "parallel scheduling forbids the entry on body {undergoing} reading \
                     propagated body {referenced}"
                )
            }
        }
    }
}

impl Error for SetupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(source) => Some(source),
            Self::Integrator(source) => Some(source),
            _ => None,
        }
    }
}

impl From<ModelSetupError> for SetupError {
    fn from(source: ModelSetupError) -> Self {
        Self::Model(source)
    }
}

impl From<ConfigError> for SetupError {
    fn from(source: ConfigError) -> Self {
        Self::Integrator(source)
    }
}

// ── Job components ───────────────────────────────────────────────

/// One body the job advances, with or without rotational state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagatedBody {
    /// The body to advance.
    pub body: BodyId,
    /// Whether attitude and angular rate are propagated alongside.
    pub rotational: bool,
}

impl PropagatedBody {
    /// Translational propagation only.
    pub fn translational(body: BodyId) -> Self {
        Self {
            body,
            rotational: false,
        }
    }

    /// Translational plus rotational propagation.
    pub fn with_rotation(body: BodyId) -> Self {
        Self {
            body,
            rotational: true,
        }
    }
}

/// One arc: its interval and the caller-supplied initial states.
///
/// `initial_states` pairs with the job's propagated-body list by
/// position. Arcs never inherit state from their predecessor; each one
/// starts from exactly what is written here.
#[derive(Clone, Debug)]
pub struct ArcDefinition {
    /// The integration interval.
    pub interval: ArcInterval,
    /// One initial state per propagated body, in job body order.
    pub initial_states: Vec<BodyState>,
}

impl ArcDefinition {
    /// Creates an arc definition.
    pub fn new(interval: ArcInterval, initial_states: Vec<BodyState>) -> Self {
        Self {
            interval,
            initial_states,
        }
    }
}

/// One integrator configuration for every arc, or one per arc.
///
/// A shared configuration is re-anchored at each arc's own start time;
/// a per-arc list pairs with the arcs by position and must match their
/// count.
#[derive(Clone, Debug, PartialEq)]
pub enum IntegratorSelection {
    /// Every arc steps with the same configuration.
    Shared(IntegratorConfig),
    /// One configuration per arc, in arc order.
    PerArc(Vec<IntegratorConfig>),
}

impl IntegratorSelection {
    /// The configuration driving `arc_index`.
    pub fn config_for(&self, arc_index: usize) -> IntegratorConfig {
        match self {
            Self::Shared(config) => *config,
            Self::PerArc(configs) => configs[arc_index],
        }
    }
}

/// Interpolation scheme for the assembled trajectories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// Piecewise-linear between bracketing samples.
    Linear,
    /// Lagrange polynomial over a centered window of `points` samples.
    Lagrange {
        /// Window width in samples.
        points: usize,
    },
}

impl Interpolation {
    /// Instantiates the shared interpolator handle trajectories carry.
    pub fn build(&self) -> Arc<dyn Interpolator> {
        match self {
            Self::Linear => Arc::new(LinearInterpolator),
            Self::Lagrange { points } => Arc::new(LagrangeInterpolator::new(*points)),
        }
    }
}

impl Default for Interpolation {
    /// The 8-point Lagrange window.
    fn default() -> Self {
        Self::Lagrange { points: 8 }
    }
}

/// Whether arcs integrate one after another or fan out to threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArcScheduling {
    /// Arcs run in order on the calling thread.
    Sequential,
    /// Arcs run on scoped worker threads; results are registered in arc
    /// order, so trajectories are identical to sequential runs.
    Parallel,
}

impl Default for ArcScheduling {
    fn default() -> Self {
        Self::Sequential
    }
}

// ── PropagationJob ───────────────────────────────────────────────

/// Everything one multi-arc run needs, minus the environment.
///
/// `models` drives every arc unless an entry in `model_overrides` names
/// the arc; later override entries shadow earlier ones for the same
/// index.
#[derive(Clone, Debug)]
pub struct PropagationJob {
    /// Bodies to advance, in state-vector order.
    pub bodies: Vec<PropagatedBody>,
    /// Model sets applied to every arc not covered by an override.
    pub models: ModelSetMap,
    /// Replacement model sets for individual arcs: `(arc index, map)`.
    pub model_overrides: Vec<(usize, ModelSetMap)>,
    /// The arcs to integrate, in order.
    pub arcs: Vec<ArcDefinition>,
    /// Stepping configuration, shared or per arc.
    pub integrators: IntegratorSelection,
    /// Interpolation scheme for the assembled trajectories.
    pub interpolation: Interpolation,
    /// Sequential or parallel arc execution.
    pub scheduling: ArcScheduling,
}

impl PropagationJob {
    /// The state-vector layout this job propagates.
    pub fn layout(&self) -> StateLayout {
        StateLayout::new(self.bodies.iter().map(|p| (p.body, p.rotational)))
    }

    /// The model set map driving `arc_index`.
    pub fn models_for_arc(&self, arc_index: usize) -> &ModelSetMap {
        self.model_overrides
            .iter()
            .rev()
            .find(|(index, _)| *index == arc_index)
            .map(|(_, models)| models)
            .unwrap_or(&self.models)
    }

    /// Runs every configuration check, in order, against `environment`.
    ///
    /// Returns the validated layout so callers integrate with the exact
    /// layout the checks covered. Nothing is mutated.
    pub fn validate(&self, environment: &Environment) -> Result<StateLayout, SetupError> {
        // 1. A job must advance something over some interval.
        if self.bodies.is_empty() {
            return Err(SetupError::NoPropagatedBodies);
        }
        if self.arcs.is_empty() {
            return Err(SetupError::NoArcs);
        }

        // 2. Propagated bodies exist and are distinct.
        for (i, propagated) in self.bodies.iter().enumerate() {
            if environment.body(propagated.body).is_none() {
                return Err(SetupError::UnknownBody {
                    body: propagated.body,
                });
            }
            if self.bodies[..i].iter().any(|p| p.body == propagated.body) {
                return Err(SetupError::DuplicateBody {
                    body: propagated.body,
                });
            }
        }

        // 3. Arc intervals are finite and forward in time.
        for (arc_index, arc) in self.arcs.iter().enumerate() {
            if !arc.interval.is_well_formed() {
                return Err(SetupError::MalformedArc {
                    arc_index,
                    start: arc.interval.start,
                    end: arc.interval.end,
                });
            }
        }

        // 4. A per-arc integrator list pairs one-to-one with the arcs.
        if let IntegratorSelection::PerArc(configs) = &self.integrators {
            if configs.len() != self.arcs.len() {
                return Err(SetupError::IntegratorCountMismatch {
                    configurations: configs.len(),
                    arcs: self.arcs.len(),
                });
            }
        }

        // 5. Each arc supplies one initial state per propagated body.
        for (arc_index, arc) in self.arcs.iter().enumerate() {
            if arc.initial_states.len() != self.bodies.len() {
                return Err(SetupError::InitialStateCountMismatch {
                    arc_index,
                    states: arc.initial_states.len(),
                    bodies: self.bodies.len(),
                });
            }
        }

        // 6. Model overrides target existing arcs.
        for &(arc_index, _) in &self.model_overrides {
            if arc_index >= self.arcs.len() {
                return Err(SetupError::OverrideOutOfRange {
                    arc_index,
                    arcs: self.arcs.len(),
                });
            }
        }

        // 7. Every model set map checks out against environment and layout.
        let layout = self.layout();
        validate_model_sets(environment, &layout, &self.models)?;
        for (_, models) in &self.model_overrides {
            validate_model_sets(environment, &layout, models)?;
        }

        // 8. Integrator parameters are usable.
        match &self.integrators {
            IntegratorSelection::Shared(config) => config.validate()?,
            IntegratorSelection::PerArc(configs) => {
                for config in configs {
                    config.validate()?;
                }
            }
        }

        // 9. Parallel arcs may only read bodies no arc is advancing.
        if self.scheduling == ArcScheduling::Parallel {
            check_parallel_independence(&layout, &self.models)?;
            for (_, models) in &self.model_overrides {
                check_parallel_independence(&layout, models)?;
            }
        }

        Ok(layout)
    }
}

/// Rejects model entries reading propagated bodies.
///
/// An entry reading a propagated body would couple arcs to each other's
/// in-progress output once they run concurrently, silently corrupting
/// results; the rule keeps every parallel arc self-contained.
fn check_parallel_independence(
    layout: &StateLayout,
    models: &ModelSetMap,
) -> Result<(), SetupError> {
    let check = |undergoing: BodyId, referenced: BodyId| {
        if layout.slot(referenced).is_some() {
            Err(SetupError::ParallelPropagatedReference {
                undergoing,
                referenced,
            })
        } else {
            Ok(())
        }
    };
    for (undergoing, set) in models.iter() {
        for (exerting, model) in set.accelerations() {
            check(undergoing, exerting)?;
            if let Some(central) = model.central_body() {
                check(undergoing, central)?;
            }
        }
        for (exerting, _) in set.torques() {
            check(undergoing, exerting)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use apsis_bodies::{Body, EphemerisSource};
    use apsis_dynamics::AccelerationModel;
    use nalgebra::Vector6;

    fn two_body_environment() -> (Environment, BodyId, BodyId) {
        let mut environment = Environment::new();
        let earth = environment
            .add_body(
                Body::new("earth")
                    .with_gravitational_parameter(3.986004418e14)
                    .with_ephemeris(EphemerisSource::Fixed(Vector6::zeros())),
            )
            .unwrap();
        let craft = environment.add_body(Body::new("craft")).unwrap();
        (environment, earth, craft)
    }

    fn leo_state() -> BodyState {
        BodyState {
            translational: Vector6::new(6.778e6, 0.0, 0.0, 0.0, 7.67e3, 0.0),
            ..BodyState::default()
        }
    }

    fn point_mass_models(earth: BodyId, craft: BodyId) -> ModelSetMap {
        let mut models = ModelSetMap::new();
        models
            .entry(craft)
            .add_acceleration(earth, AccelerationModel::PointMassGravity);
        models
    }

    fn valid_job(earth: BodyId, craft: BodyId) -> PropagationJob {
        PropagationJob {
            bodies: vec![PropagatedBody::translational(craft)],
            models: point_mass_models(earth, craft),
            model_overrides: Vec::new(),
            arcs: vec![
                ArcDefinition::new(ArcInterval::new(0.0, 600.0), vec![leo_state()]),
                ArcDefinition::new(ArcInterval::new(580.0, 1200.0), vec![leo_state()]),
            ],
            integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(60.0)),
            interpolation: Interpolation::Linear,
            scheduling: ArcScheduling::Sequential,
        }
    }

    // ── Validation pass and ordering ──────────────────────────

    #[test]
    fn representative_job_is_accepted() {
        let (environment, earth, craft) = two_body_environment();
        let layout = valid_job(earth, craft).validate(&environment).unwrap();
        assert_eq!(layout.dim(), 6);
        assert!(layout.slot(craft).is_some());
    }

    #[test]
    fn empty_body_list_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.bodies.clear();
        match job.validate(&environment) {
            Err(SetupError::NoPropagatedBodies) => {}
            other => panic!("expected NoPropagatedBodies, got {other:?}"),
        }
    }

    #[test]
    fn empty_arc_list_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.arcs.clear();
        match job.validate(&environment) {
            Err(SetupError::NoArcs) => {}
            other => panic!("expected NoArcs, got {other:?}"),
        }
    }

    #[test]
    fn unknown_propagated_body_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.bodies.push(PropagatedBody::translational(BodyId(77)));
        match job.validate(&environment) {
            Err(SetupError::UnknownBody { body }) => assert_eq!(body, BodyId(77)),
            other => panic!("expected UnknownBody, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_propagated_body_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.bodies.push(PropagatedBody::with_rotation(craft));
        match job.validate(&environment) {
            Err(SetupError::DuplicateBody { body }) => assert_eq!(body, craft),
            other => panic!("expected DuplicateBody, got {other:?}"),
        }
    }

    #[test]
    fn backwards_arc_interval_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.arcs[1].interval = ArcInterval::new(1200.0, 580.0);
        match job.validate(&environment) {
            Err(SetupError::MalformedArc {
                arc_index, start, ..
            }) => {
                assert_eq!(arc_index, 1);
                assert_eq!(start, 1200.0);
            }
            other => panic!("expected MalformedArc, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_arc_interval_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.arcs[0].interval = ArcInterval::new(0.0, f64::INFINITY);
        assert!(matches!(
            job.validate(&environment),
            Err(SetupError::MalformedArc { arc_index: 0, .. })
        ));
    }

    #[test]
    fn integrator_list_must_pair_with_arcs() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.integrators = IntegratorSelection::PerArc(vec![IntegratorConfig::rk4(60.0)]);
        match job.validate(&environment) {
            Err(SetupError::IntegratorCountMismatch {
                configurations,
                arcs,
            }) => {
                assert_eq!(configurations, 1);
                assert_eq!(arcs, 2);
            }
            other => panic!("expected IntegratorCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn initial_states_must_cover_every_body() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.arcs[1].initial_states.clear();
        match job.validate(&environment) {
            Err(SetupError::InitialStateCountMismatch {
                arc_index,
                states,
                bodies,
            }) => {
                assert_eq!(arc_index, 1);
                assert_eq!(states, 0);
                assert_eq!(bodies, 1);
            }
            other => panic!("expected InitialStateCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn override_past_the_arc_list_is_rejected() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.model_overrides
            .push((5, point_mass_models(earth, craft)));
        match job.validate(&environment) {
            Err(SetupError::OverrideOutOfRange { arc_index, arcs }) => {
                assert_eq!(arc_index, 5);
                assert_eq!(arcs, 2);
            }
            other => panic!("expected OverrideOutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn model_set_violations_are_wrapped() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        let mut broken = ModelSetMap::new();
        broken
            .entry(craft)
            .add_acceleration(craft, AccelerationModel::PointMassGravity);
        job.models = broken;
        match job.validate(&environment) {
            Err(SetupError::Model(ModelSetupError::SelfReference { body, .. })) => {
                assert_eq!(body, craft);
            }
            other => panic!("expected wrapped SelfReference, got {other:?}"),
        }
    }

    #[test]
    fn override_maps_are_validated_too() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        let mut broken = ModelSetMap::new();
        broken
            .entry(craft)
            .add_acceleration(BodyId(42), AccelerationModel::PointMassGravity);
        job.model_overrides.push((0, broken));
        assert!(matches!(
            job.validate(&environment),
            Err(SetupError::Model(ModelSetupError::UnknownBody { .. }))
        ));
    }

    #[test]
    fn integrator_parameter_violations_are_wrapped() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.integrators = IntegratorSelection::Shared(IntegratorConfig::rk4(0.0));
        match job.validate(&environment) {
            Err(SetupError::Integrator(ConfigError::InvalidInitialStep { value })) => {
                assert_eq!(value, 0.0);
            }
            other => panic!("expected wrapped InvalidInitialStep, got {other:?}"),
        }
    }

    // ── Parallel independence ─────────────────────────────────

    #[test]
    fn parallel_rejects_models_reading_propagated_bodies() {
        let mut environment = Environment::new();
        let one = environment
            .add_body(Body::new("one").with_gravitational_parameter(5.0e12))
            .unwrap();
        let two = environment
            .add_body(Body::new("two").with_gravitational_parameter(3.0e12))
            .unwrap();

        let mut models = ModelSetMap::new();
        models
            .entry(one)
            .add_acceleration(two, AccelerationModel::PointMassGravity);
        models
            .entry(two)
            .add_acceleration(one, AccelerationModel::PointMassGravity);

        let job = PropagationJob {
            bodies: vec![
                PropagatedBody::translational(one),
                PropagatedBody::translational(two),
            ],
            models,
            model_overrides: Vec::new(),
            arcs: vec![ArcDefinition::new(
                ArcInterval::new(0.0, 60.0),
                vec![BodyState::default(), leo_state()],
            )],
            integrators: IntegratorSelection::Shared(IntegratorConfig::rk4(1.0)),
            interpolation: Interpolation::Linear,
            scheduling: ArcScheduling::Parallel,
        };
        match job.validate(&environment) {
            Err(SetupError::ParallelPropagatedReference {
                undergoing,
                referenced,
            }) => {
                assert_eq!(undergoing, one);
                assert_eq!(referenced, two);
            }
            other => panic!("expected ParallelPropagatedReference, got {other:?}"),
        }
    }

    #[test]
    fn parallel_accepts_ephemeris_only_references() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.scheduling = ArcScheduling::Parallel;
        job.validate(&environment).unwrap();
    }

    // ── Accessors ─────────────────────────────────────────────

    #[test]
    fn overrides_shadow_the_shared_models() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        let mut special = ModelSetMap::new();
        special.entry(craft).add_acceleration(
            earth,
            AccelerationModel::ZonalHarmonicGravity {
                reference_radius: 6.378136e6,
                j2: 1.082626e-3,
                j3: 0.0,
                j4: 0.0,
            },
        );
        job.model_overrides.push((1, special));
        job.validate(&environment).unwrap();

        let default_set = job.models_for_arc(0).get(craft).unwrap();
        assert!(default_set
            .accelerations()
            .all(|(_, model)| model.kind() == "point-mass gravity"));
        let overridden = job.models_for_arc(1).get(craft).unwrap();
        assert!(overridden
            .accelerations()
            .any(|(_, model)| model.kind() == "zonal-harmonic gravity"));
    }

    #[test]
    fn shared_selection_repeats_one_configuration() {
        let config = IntegratorConfig::rk4(30.0);
        let selection = IntegratorSelection::Shared(config);
        assert_eq!(selection.config_for(0), config);
        assert_eq!(selection.config_for(7), config);
    }

    #[test]
    fn layout_orders_slots_by_body_list() {
        let (environment, earth, craft) = two_body_environment();
        let mut job = valid_job(earth, craft);
        job.bodies = vec![PropagatedBody::with_rotation(craft)];
        let layout = job.layout();
        assert_eq!(layout.dim(), 13);
        let _ = environment;
    }
}
