//! Closed-form propagation of an unperturbed orbit.

use crate::anomaly::{eccentric_to_mean, eccentric_to_true, mean_to_eccentric, true_to_eccentric};
use crate::elements::{wrap_two_pi, KeplerianElements};
use crate::error::KeplerError;

/// Advances elements by `dt` seconds under two-body motion.
///
/// Everything but the true anomaly is constant; the anomaly advances
/// through mean anomaly at the orbit's mean motion.
pub fn propagate_elements(
    elements: &KeplerianElements,
    mu: f64,
    dt: f64,
) -> Result<KeplerianElements, KeplerError> {
    if !(0.0..1.0).contains(&elements.eccentricity) || elements.semi_major_axis <= 0.0 {
        return Err(KeplerError::NonElliptic {
            eccentricity: elements.eccentricity,
        });
    }

    let e = elements.eccentricity;
    let e_anom = true_to_eccentric(elements.true_anomaly, e);
    let mean = eccentric_to_mean(e_anom, e) + elements.mean_motion(mu) * dt;
    let e_anom_new = mean_to_eccentric(wrap_two_pi(mean), e)?;

    Ok(KeplerianElements {
        true_anomaly: wrap_two_pi(eccentric_to_true(e_anom_new, e)),
        ..*elements
    })
}
