//! Error types shared across the Apsis crates.
//!
//! Two families cross crate boundaries: [`DynamicsError`] for failures
//! inside the derivative/integration path (always fatal for the arc being
//! integrated) and [`EphemerisError`] for trajectory queries (recoverable
//! by the caller). Configuration failures are defined next to their
//! validators in the higher-level crates.

use std::error::Error;
use std::fmt;

use crate::id::BodyId;

/// A fatal failure inside the derivative or integration path.
///
/// Any of these aborts the arc currently being integrated. They are never
/// retried or downgraded; the orchestrator surfaces them together with the
/// offending time and, where one exists, the offending body.
#[derive(Clone, Debug, PartialEq)]
pub enum DynamicsError {
    /// A committed state sample contains a NaN or infinite component.
    NonFiniteState {
        /// Body whose state block went non-finite.
        body: BodyId,
        /// Evaluation time at which the value was detected.
        time: f64,
    },
    /// A model evaluation would divide by a zero-length separation vector.
    DegenerateSeparation {
        /// Body the contribution is computed for.
        undergoing: BodyId,
        /// Body exerting the influence.
        exerting: BodyId,
        /// Evaluation time.
        time: f64,
    },
    /// The inertia tensor is singular and cannot be inverted.
    SingularInertia {
        /// Body whose inertia tensor failed to invert.
        body: BodyId,
        /// Evaluation time.
        time: f64,
    },
    /// An attitude quaternion collapsed to zero norm.
    DegenerateQuaternion {
        /// Body whose quaternion lost its norm.
        body: BodyId,
        /// Evaluation time.
        time: f64,
    },
    /// An ephemeris source failed while refreshing a body's state.
    Ephemeris {
        /// Body whose ephemeris was queried.
        body: BodyId,
        /// Evaluation time.
        time: f64,
        /// The underlying ephemeris failure.
        source: EphemerisError,
    },
    /// An adaptive integrator shrank its step below its configured floor.
    StepSizeUnderflow {
        /// Time at which no acceptable step could be found.
        time: f64,
        /// The rejected step size.
        step: f64,
    },
}

impl DynamicsError {
    /// The evaluation time carried by every variant.
    pub fn time(&self) -> f64 {
        match self {
            Self::NonFiniteState { time, .. }
            | Self::DegenerateSeparation { time, .. }
            | Self::SingularInertia { time, .. }
            | Self::DegenerateQuaternion { time, .. }
            | Self::Ephemeris { time, .. }
            | Self::StepSizeUnderflow { time, .. } => *time,
        }
    }

    /// The offending body, when the failure is attributable to one.
    pub fn body(&self) -> Option<BodyId> {
        match self {
            Self::NonFiniteState { body, .. }
            | Self::SingularInertia { body, .. }
            | Self::DegenerateQuaternion { body, .. }
            | Self::Ephemeris { body, .. } => Some(*body),
            Self::DegenerateSeparation { undergoing, .. } => Some(*undergoing),
            Self::StepSizeUnderflow { .. } => None,
        }
    }
}

impl fmt::Display for DynamicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteState { body, time } => {
                write!(f, "non-finite state for body {body} at t = {time}")
            }
            Self::DegenerateSeparation {
                undergoing,
                exerting,
                time,
            } => write!(
                f,
                "zero-length separation between bodies {undergoing} and {exerting} at t = {time}"
            ),
            Self::SingularInertia { body, time } => {
                write!(f, "singular inertia tensor for body {body} at t = {time}")
            }
            Self::DegenerateQuaternion { body, time } => {
                write!(f, "zero-norm quaternion for body {body} at t = {time}")
            }
            Self::Ephemeris { body, time, source } => {
                write!(f, "ephemeris failure for body {body} at t = {time}: {source}")
            }
            Self::StepSizeUnderflow { time, step } => {
                write!(f, "step size underflow at t = {time} (step = {step})")
            }
        }
    }
}

impl Error for DynamicsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ephemeris { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A failed trajectory or ephemeris query.
///
/// Unlike [`DynamicsError`], these are recoverable: the caller of
/// `state_at` decides what to do with an out-of-range query.
#[derive(Clone, Debug, PartialEq)]
pub enum EphemerisError {
    /// The query time is not contained in any registered arc interval.
    ///
    /// Trajectories never extrapolate, and gaps between disjoint arcs
    /// count as uncovered. `start`/`end` report the outermost coverage
    /// bounds (earliest arc start, latest arc end).
    OutOfRange {
        /// The rejected query time.
        time: f64,
        /// Earliest covered time.
        start: f64,
        /// Latest covered time.
        end: f64,
    },
    /// The trajectory has no registered arcs.
    Empty,
    /// A caller-supplied arc index does not exist.
    UnknownArc {
        /// The rejected index.
        index: usize,
        /// Number of registered arcs.
        arc_count: usize,
    },
    /// An arc holds fewer samples than its interpolator needs.
    InsufficientSamples {
        /// Samples present in the arc.
        have: usize,
        /// Samples the interpolation scheme requires.
        need: usize,
    },
    /// An analytic source failed to evaluate.
    EvaluationFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}

impl fmt::Display for EphemerisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { time, start, end } => {
                write!(f, "t = {time} outside covered range [{start}, {end}]")
            }
            Self::Empty => write!(f, "trajectory has no registered arcs"),
            Self::UnknownArc { index, arc_count } => {
                write!(f, "arc index {index} out of range ({arc_count} arcs)")
            }
            Self::InsufficientSamples { have, need } => {
                write!(f, "arc holds {have} samples, interpolator needs {need}")
            }
            Self::EvaluationFailed { reason } => write!(f, "evaluation failed: {reason}"),
        }
    }
}

impl Error for EphemerisError {}
