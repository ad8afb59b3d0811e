//! Errors for Keplerian element handling.

use std::error::Error;
use std::fmt;

/// A failure converting or propagating Keplerian elements.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeplerError {
    /// The orbit is parabolic or hyperbolic (`e >= 1`) or has
    /// non-positive semi-major axis.
    NonElliptic {
        /// Eccentricity of the offending orbit.
        eccentricity: f64,
    },
    /// The state has (near-)zero radius or angular momentum, so no
    /// orbital plane is defined.
    DegenerateState,
    /// Newton iteration on Kepler's equation failed to converge.
    NoConvergence {
        /// Mean anomaly being solved for.
        mean_anomaly: f64,
        /// Eccentricity of the orbit.
        eccentricity: f64,
    },
}

impl fmt::Display for KeplerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonElliptic { eccentricity } => {
                write!(f, "orbit is not elliptic (e = {eccentricity})")
            }
            Self::DegenerateState => {
                write!(f, "state has no defined orbital plane")
            }
            Self::NoConvergence {
                mean_anomaly,
                eccentricity,
            } => write!(
                f,
                "Kepler solver did not converge (M = {mean_anomaly}, e = {eccentricity})"
            ),
        }
    }
}

impl Error for KeplerError {}
