//! Externally-defined state sources for non-propagated bodies.

use nalgebra::Vector6;

use apsis_astro::{propagate_elements, KeplerianElements};
use apsis_core::EphemerisError;
use apsis_ephemeris::Trajectory;

/// Where a body's translational state comes from when the engine is not
/// propagating it.
///
/// Evaluation may be asked for any time, in any order; sources hold no
/// per-call state.
#[derive(Clone, Debug)]
pub enum EphemerisSource {
    /// A constant state, e.g. a central body pinned at the frame origin.
    Fixed(Vector6<f64>),
    /// Analytic two-body motion from epoch elements.
    Keplerian {
        /// Elements at `epoch`.
        elements: KeplerianElements,
        /// Gravitational parameter of the attracting center.
        gravitational_parameter: f64,
        /// Epoch the elements refer to, in seconds.
        epoch: f64,
    },
    /// A completed multi-arc trajectory from an earlier propagation.
    Tabulated(Trajectory),
}

impl EphemerisSource {
    /// Translational state at time `t`.
    pub fn state_at(&self, t: f64) -> Result<Vector6<f64>, EphemerisError> {
        match self {
            Self::Fixed(state) => Ok(*state),
            Self::Keplerian {
                elements,
                gravitational_parameter,
                epoch,
            } => {
                let advanced = propagate_elements(elements, *gravitational_parameter, t - epoch)
                    .map_err(|e| EphemerisError::EvaluationFailed {
                        reason: e.to_string(),
                    })?;
                advanced
                    .to_cartesian(*gravitational_parameter)
                    .map_err(|e| EphemerisError::EvaluationFailed {
                        reason: e.to_string(),
                    })
            }
            Self::Tabulated(trajectory) => trajectory.translational_at(t),
        }
    }
}
