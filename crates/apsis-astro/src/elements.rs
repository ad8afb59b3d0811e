//! Keplerian orbital elements and Cartesian conversions.

use std::f64::consts::TAU;

use nalgebra::{Rotation3, Vector3, Vector6};

use crate::error::KeplerError;

/// Relative threshold below which eccentricity or inclination machinery
/// switches to the degenerate-geometry conventions.
const GEOMETRY_EPS: f64 = 1e-11;

/// Classical Keplerian elements of an elliptic orbit.
///
/// Angles are radians; lengths are the caller's length unit (consistent
/// with the gravitational parameter passed to the conversions). The
/// anomaly stored here is the true anomaly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerianElements {
    /// Semi-major axis.
    pub semi_major_axis: f64,
    /// Eccentricity, `0 <= e < 1`.
    pub eccentricity: f64,
    /// Inclination.
    pub inclination: f64,
    /// Right ascension of the ascending node.
    pub raan: f64,
    /// Argument of periapsis.
    pub argument_of_periapsis: f64,
    /// True anomaly.
    pub true_anomaly: f64,
}

impl KeplerianElements {
    /// Semi-latus rectum `p = a (1 - e^2)`.
    pub fn semi_latus_rectum(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity * self.eccentricity)
    }

    /// Mean motion `n = sqrt(mu / a^3)`.
    pub fn mean_motion(&self, mu: f64) -> f64 {
        (mu / self.semi_major_axis.powi(3)).sqrt()
    }

    /// Orbital period `2 pi / n`.
    pub fn period(&self, mu: f64) -> f64 {
        TAU / self.mean_motion(mu)
    }

    /// Converts to a Cartesian `[position, velocity]` state.
    ///
    /// The frame is the one the elements are expressed in: x toward the
    /// reference direction, z along the reference pole.
    pub fn to_cartesian(&self, mu: f64) -> Result<Vector6<f64>, KeplerError> {
        if !(0.0..1.0).contains(&self.eccentricity) || self.semi_major_axis <= 0.0 {
            return Err(KeplerError::NonElliptic {
                eccentricity: self.eccentricity,
            });
        }

        let p = self.semi_latus_rectum();
        let (sin_nu, cos_nu) = self.true_anomaly.sin_cos();
        let r_mag = p / (1.0 + self.eccentricity * cos_nu);

        let r_perifocal = Vector3::new(r_mag * cos_nu, r_mag * sin_nu, 0.0);
        let v_scale = (mu / p).sqrt();
        let v_perifocal = Vector3::new(
            -v_scale * sin_nu,
            v_scale * (self.eccentricity + cos_nu),
            0.0,
        );

        let rotation = Rotation3::from_axis_angle(&Vector3::z_axis(), self.raan)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), self.inclination)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), self.argument_of_periapsis);

        let mut state = Vector6::zeros();
        state
            .fixed_rows_mut::<3>(0)
            .copy_from(&(rotation * r_perifocal));
        state
            .fixed_rows_mut::<3>(3)
            .copy_from(&(rotation * v_perifocal));
        Ok(state)
    }

    /// Recovers elements from a Cartesian `[position, velocity]` state.
    ///
    /// Circular and equatorial states use the usual conventions: an
    /// undefined node collapses the RAAN to zero, an undefined periapsis
    /// collapses the argument of periapsis to zero, and the anomaly picks
    /// up the remaining in-plane angle.
    pub fn from_cartesian(state: &Vector6<f64>, mu: f64) -> Result<Self, KeplerError> {
        let r: Vector3<f64> = state.fixed_rows::<3>(0).into_owned();
        let v: Vector3<f64> = state.fixed_rows::<3>(3).into_owned();

        let r_mag = r.norm();
        if r_mag == 0.0 {
            return Err(KeplerError::DegenerateState);
        }

        let h = r.cross(&v);
        let h_mag = h.norm();
        if h_mag <= GEOMETRY_EPS * r_mag * v.norm() {
            return Err(KeplerError::DegenerateState);
        }

        let energy = 0.5 * v.norm_squared() - mu / r_mag;
        let e_vec = v.cross(&h) / mu - r / r_mag;
        let eccentricity = e_vec.norm();
        if energy >= 0.0 || eccentricity >= 1.0 {
            return Err(KeplerError::NonElliptic { eccentricity });
        }
        let semi_major_axis = -mu / (2.0 * energy);

        let inclination = (h.z / h_mag).clamp(-1.0, 1.0).acos();
        let node = Vector3::new(-h.y, h.x, 0.0);
        let node_mag = node.norm();
        let equatorial = node_mag <= GEOMETRY_EPS * h_mag;
        let circular = eccentricity <= GEOMETRY_EPS;

        let raan = if equatorial {
            0.0
        } else {
            wrap_two_pi(node.y.atan2(node.x))
        };

        let argument_of_periapsis = if circular {
            0.0
        } else if equatorial {
            wrap_two_pi(e_vec.y.atan2(e_vec.x))
        } else {
            let mut angle = angle_between(&node, &e_vec);
            if e_vec.z < 0.0 {
                angle = TAU - angle;
            }
            angle
        };

        let true_anomaly = if circular && equatorial {
            wrap_two_pi(r.y.atan2(r.x))
        } else if circular {
            let mut angle = angle_between(&node, &r);
            if r.z < 0.0 {
                angle = TAU - angle;
            }
            angle
        } else {
            let mut angle = angle_between(&e_vec, &r);
            if r.dot(&v) < 0.0 {
                angle = TAU - angle;
            }
            angle
        };

        Ok(Self {
            semi_major_axis,
            eccentricity,
            inclination,
            raan,
            argument_of_periapsis,
            true_anomaly,
        })
    }
}

/// Wraps an angle into `[0, 2 pi)`.
pub fn wrap_two_pi(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

fn angle_between(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    (a.dot(b) / (a.norm() * b.norm())).clamp(-1.0, 1.0).acos()
}
