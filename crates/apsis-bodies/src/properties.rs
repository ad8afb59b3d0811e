//! Time-varying mass and inertia models.

use nalgebra::Matrix3;

/// Mass history of a body, in kilograms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MassModel {
    /// Constant mass.
    Constant(f64),
    /// Linear drift `m(t) = reference + rate * (t - epoch)`, e.g. slow
    /// propellant depletion.
    Linear {
        /// Mass at `epoch`.
        reference: f64,
        /// Mass rate in kg/s (negative while depleting).
        rate: f64,
        /// Reference epoch in seconds.
        epoch: f64,
    },
}

impl MassModel {
    /// Mass at time `t`.
    pub fn mass_at(&self, t: f64) -> f64 {
        match self {
            Self::Constant(m) => *m,
            Self::Linear {
                reference,
                rate,
                epoch,
            } => reference + rate * (t - epoch),
        }
    }
}

/// Inertia-tensor history of a body, in kg m^2, body-fixed axes.
///
/// The model reports both the tensor and its exact time derivative, so
/// the `İω` term of Euler's equation never relies on finite differences.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InertiaModel {
    /// Constant tensor; derivative is zero.
    Constant(Matrix3<f64>),
    /// Linear drift `I(t) = reference + rate * (t - epoch)`.
    Linear {
        /// Tensor at `epoch`.
        reference: Matrix3<f64>,
        /// Constant tensor rate.
        rate: Matrix3<f64>,
        /// Reference epoch in seconds.
        epoch: f64,
    },
}

impl InertiaModel {
    /// Convenience constructor for a constant diagonal tensor.
    pub fn diagonal(xx: f64, yy: f64, zz: f64) -> Self {
        Self::Constant(Matrix3::from_diagonal(&nalgebra::Vector3::new(xx, yy, zz)))
    }

    /// Inertia tensor at time `t`.
    pub fn inertia_at(&self, t: f64) -> Matrix3<f64> {
        match self {
            Self::Constant(i) => *i,
            Self::Linear {
                reference,
                rate,
                epoch,
            } => reference + rate * (t - epoch),
        }
    }

    /// Time derivative of the tensor at time `t`.
    pub fn inertia_rate_at(&self, _t: f64) -> Matrix3<f64> {
        match self {
            Self::Constant(_) => Matrix3::zeros(),
            Self::Linear { rate, .. } => *rate,
        }
    }
}
