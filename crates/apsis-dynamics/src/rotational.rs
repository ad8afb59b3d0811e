//! Rigid-body attitude kinematics and dynamics.
//!
//! The attitude quaternion maps the body-fixed frame to the inertial
//! frame, stored scalar first. Its kinematics under the body-fixed rate
//! `ω` are `q̇ = 0.5 · Ω(ω) · q`; the rate dynamics follow Euler's
//! rigid-body equation with a possibly time-varying inertia tensor.

use apsis_core::{BodyId, DynamicsError};
use nalgebra::{Matrix3, Matrix4, Quaternion, Vector3, Vector4};

/// The skew operator `Ω(ω)` of the quaternion kinematic equation, acting
/// on a scalar-first quaternion column.
#[rustfmt::skip]
pub fn rate_matrix(omega: &Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new(
        0.0,     -omega.x, -omega.y, -omega.z,
        omega.x,  0.0,      omega.z, -omega.y,
        omega.y, -omega.z,  0.0,      omega.x,
        omega.z,  omega.y, -omega.x,  0.0,
    )
}

/// Quaternion time derivative `0.5 · Ω(ω) · q`.
///
/// The result is a plain (non-unit) quaternion; drift control happens on
/// committed samples, not here.
pub fn quaternion_rate(attitude: &Quaternion<f64>, omega: &Vector3<f64>) -> Quaternion<f64> {
    let imag = attitude.imag();
    let column = Vector4::new(attitude.scalar(), imag.x, imag.y, imag.z);
    let rate = 0.5 * rate_matrix(omega) * column;
    Quaternion::new(rate[0], rate[1], rate[2], rate[3])
}

/// Angular acceleration from Euler's rigid-body equation,
/// `ω̇ = I⁻¹ (τ − ω × (I ω) − İ ω)`.
///
/// A non-invertible inertia tensor is fatal for the arc.
pub fn angular_acceleration(
    inertia: &Matrix3<f64>,
    inertia_rate: &Matrix3<f64>,
    omega: &Vector3<f64>,
    torque: &Vector3<f64>,
    body: BodyId,
    time: f64,
) -> Result<Vector3<f64>, DynamicsError> {
    let inverse = inertia
        .try_inverse()
        .ok_or(DynamicsError::SingularInertia { body, time })?;
    Ok(inverse * (torque - omega.cross(&(inertia * omega)) - inertia_rate * omega))
}
