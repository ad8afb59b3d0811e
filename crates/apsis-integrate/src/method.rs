//! The stepping-method seam.

use apsis_core::DynamicsError;
use nalgebra::DVector;

/// The right-hand side of a first-order system `dy/dt = f(t, y)`.
///
/// Implemented for any `FnMut(f64, &DVector<f64>, &mut DVector<f64>)`
/// closure returning `Result<(), DynamicsError>`, which is how the engine
/// hands its state-derivative model to a stepper. Takes `&mut self`
/// because evaluation refreshes scratch state and counters.
pub trait Derivative {
    /// Writes `f(time, state)` into `derivative`.
    fn evaluate(
        &mut self,
        time: f64,
        state: &DVector<f64>,
        derivative: &mut DVector<f64>,
    ) -> Result<(), DynamicsError>;
}

impl<F> Derivative for F
where
    F: FnMut(f64, &DVector<f64>, &mut DVector<f64>) -> Result<(), DynamicsError>,
{
    fn evaluate(
        &mut self,
        time: f64,
        state: &DVector<f64>,
        derivative: &mut DVector<f64>,
    ) -> Result<(), DynamicsError> {
        self(time, state, derivative)
    }
}

/// Result of one accepted integration step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// State after the step.
    pub state: DVector<f64>,
    /// Step actually taken; adaptive schemes may take less than requested.
    pub dt_used: f64,
    /// Recommended size for the next step.
    pub dt_next: f64,
}

/// A single-step integration scheme.
///
/// Steppers are stateless between arcs apart from reusable workspace;
/// all persistent trajectory state lives with the driver. `step` never
/// advances past `time + dt`, which is what lets the driver clamp the
/// final step to land exactly on an arc end.
pub trait SteppingMethod {
    /// Scheme name for logs.
    fn name(&self) -> &'static str;

    /// Order of the solution the scheme advances.
    fn order(&self) -> u8;

    /// Derivative evaluations per attempted step.
    fn stages(&self) -> usize;

    /// Advances `state` from `time` by at most `dt`.
    ///
    /// Fixed-step schemes take exactly `dt`. Adaptive schemes may accept
    /// a shorter step after internal rejections and report the size
    /// actually taken in [`StepOutcome::dt_used`].
    fn step(
        &mut self,
        rhs: &mut dyn Derivative,
        time: f64,
        state: &DVector<f64>,
        dt: f64,
    ) -> Result<StepOutcome, DynamicsError>;
}
