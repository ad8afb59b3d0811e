//! Anomaly conversions and the Kepler-equation solver.

use crate::error::KeplerError;

/// Convergence tolerance on the eccentric-anomaly update.
const TOLERANCE: f64 = 1e-14;
/// Iteration cap for the Newton solver.
const MAX_ITERATIONS: usize = 100;

/// True anomaly to eccentric anomaly.
///
/// Uses the atan2 form, which stays well-conditioned through `ν = π`.
pub fn true_to_eccentric(true_anomaly: f64, eccentricity: f64) -> f64 {
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    (beta * true_anomaly.sin()).atan2(eccentricity + true_anomaly.cos())
}

/// Eccentric anomaly to true anomaly.
pub fn eccentric_to_true(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let beta = (1.0 - eccentricity * eccentricity).sqrt();
    (beta * eccentric_anomaly.sin()).atan2(eccentric_anomaly.cos() - eccentricity)
}

/// Eccentric anomaly to mean anomaly (Kepler's equation, forward).
pub fn eccentric_to_mean(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Mean anomaly to eccentric anomaly by Newton iteration on
/// `E - e sin E = M`.
///
/// Converges quadratically for all elliptic eccentricities; the high-`e`
/// start guess avoids the slow region near `M = 0, e → 1`.
pub fn mean_to_eccentric(mean_anomaly: f64, eccentricity: f64) -> Result<f64, KeplerError> {
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(KeplerError::NonElliptic { eccentricity });
    }

    let mut e_anom = if eccentricity < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI.copysign(mean_anomaly)
    };

    for _ in 0..MAX_ITERATIONS {
        let f = e_anom - eccentricity * e_anom.sin() - mean_anomaly;
        let f_prime = 1.0 - eccentricity * e_anom.cos();
        let delta = f / f_prime;
        e_anom -= delta;
        if delta.abs() < TOLERANCE {
            return Ok(e_anom);
        }
    }

    Err(KeplerError::NoConvergence {
        mean_anomaly,
        eccentricity,
    })
}
