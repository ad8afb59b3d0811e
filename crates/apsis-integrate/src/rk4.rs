//! The classic fixed-step fourth-order Runge-Kutta scheme.

use apsis_core::DynamicsError;
use nalgebra::DVector;

use crate::method::{Derivative, StepOutcome, SteppingMethod};

/// Classic four-stage fourth-order Runge-Kutta.
///
/// Takes exactly the requested step and recommends the same size for the
/// next one; step-size policy is entirely the caller's. Stage storage is
/// reused across calls and re-sized when the state dimension changes.
#[derive(Debug, Default)]
pub struct RungeKutta4 {
    k: Vec<DVector<f64>>,
    y_stage: DVector<f64>,
}

impl RungeKutta4 {
    /// A stepper with empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_workspace(&mut self, dim: usize) {
        if self.k.len() != 4 || self.y_stage.len() != dim {
            self.k = vec![DVector::zeros(dim); 4];
            self.y_stage = DVector::zeros(dim);
        }
    }
}

impl SteppingMethod for RungeKutta4 {
    fn name(&self) -> &'static str {
        "Runge-Kutta 4"
    }

    fn order(&self) -> u8 {
        4
    }

    fn stages(&self) -> usize {
        4
    }

    fn step(
        &mut self,
        rhs: &mut dyn Derivative,
        time: f64,
        state: &DVector<f64>,
        dt: f64,
    ) -> Result<StepOutcome, DynamicsError> {
        self.ensure_workspace(state.len());
        let half = 0.5 * dt;

        rhs.evaluate(time, state, &mut self.k[0])?;

        self.y_stage.copy_from(state);
        self.y_stage.axpy(half, &self.k[0], 1.0);
        rhs.evaluate(time + half, &self.y_stage, &mut self.k[1])?;

        self.y_stage.copy_from(state);
        self.y_stage.axpy(half, &self.k[1], 1.0);
        rhs.evaluate(time + half, &self.y_stage, &mut self.k[2])?;

        self.y_stage.copy_from(state);
        self.y_stage.axpy(dt, &self.k[2], 1.0);
        rhs.evaluate(time + dt, &self.y_stage, &mut self.k[3])?;

        let mut next = state.clone();
        next.axpy(dt / 6.0, &self.k[0], 1.0);
        next.axpy(dt / 3.0, &self.k[1], 1.0);
        next.axpy(dt / 3.0, &self.k[2], 1.0);
        next.axpy(dt / 6.0, &self.k[3], 1.0);

        Ok(StepOutcome {
            state: next,
            dt_used: dt,
            dt_next: dt,
        })
    }
}
