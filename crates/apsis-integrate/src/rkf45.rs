//! The Fehlberg embedded 4(5) pair with proportional step control.
//!
//! Six stages yield a fourth-order solution and a fifth-order companion
//! whose difference estimates the local truncation error. The scheme
//! advances the fourth-order solution; the estimate only steers the step
//! size. Reference: NASA TR R-315, Erwin Fehlberg, 1969.

use apsis_core::DynamicsError;
use nalgebra::DVector;

use crate::method::{Derivative, StepOutcome, SteppingMethod};

const STAGES: usize = 6;

const C: [f64; STAGES] = [0.0, 1.0 / 4.0, 3.0 / 8.0, 12.0 / 13.0, 1.0, 1.0 / 2.0];

const A: [[f64; 5]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 4.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 32.0, 9.0 / 32.0, 0.0, 0.0, 0.0],
    [1932.0 / 2197.0, -7200.0 / 2197.0, 7296.0 / 2197.0, 0.0, 0.0],
    [439.0 / 216.0, -8.0, 3680.0 / 513.0, -845.0 / 4104.0, 0.0],
    [-8.0 / 27.0, 2.0, -3544.0 / 2565.0, 1859.0 / 4104.0, -11.0 / 40.0],
];

const B: [f64; STAGES] = [
    25.0 / 216.0,
    0.0,
    1408.0 / 2565.0,
    2197.0 / 4104.0,
    -1.0 / 5.0,
    0.0,
];

/// Fifth-order weights minus fourth-order weights.
const B_ERR: [f64; STAGES] = [
    1.0 / 360.0,
    0.0,
    -128.0 / 4275.0,
    -2197.0 / 75240.0,
    1.0 / 50.0,
    2.0 / 55.0,
];

/// Attempts within one `step` call before giving up on finding an
/// acceptable size.
const MAX_ATTEMPTS: usize = 32;

/// Proportional step-size controller.
///
/// `factor = safety * error^(-1/(order+1))`, clamped to
/// `[min_factor, max_factor]`. The same factor steers both growth after
/// an accepted step and shrinkage after a rejected one.
#[derive(Debug, Clone, PartialEq)]
pub struct StepController {
    /// Fraction of the optimal step actually taken.
    pub safety: f64,
    /// Growth clamp per step.
    pub max_factor: f64,
    /// Shrink clamp per step.
    pub min_factor: f64,
    exponent: f64,
}

impl Default for StepController {
    fn default() -> Self {
        Self {
            safety: 0.9,
            max_factor: 5.0,
            min_factor: 0.2,
            exponent: 1.0 / 5.0,
        }
    }
}

impl StepController {
    /// The step-size adjustment factor for a scaled error estimate.
    pub fn factor(&self, error: f64) -> f64 {
        if error == 0.0 {
            return self.max_factor;
        }
        (self.safety * error.powf(-self.exponent)).clamp(self.min_factor, self.max_factor)
    }
}

/// Runge-Kutta-Fehlberg 4(5) with embedded error control.
///
/// A step is accepted when the infinity norm of the per-component error,
/// scaled by `abs_tol + rel_tol * |y|`, is at most one. Rejected attempts
/// shrink and retry inside `step`; a step already at `min_step` that
/// still fails the test is a [`DynamicsError::StepSizeUnderflow`].
///
/// `step` never raises a requested step to `min_step`, so a caller
/// clamping the final step onto an arc end gets that exact size back.
/// Bounds and tolerances are validated at configuration time.
#[derive(Debug)]
pub struct Rkf45 {
    rel_tol: f64,
    abs_tol: f64,
    min_step: f64,
    max_step: f64,
    controller: StepController,
    k: Vec<DVector<f64>>,
    y_stage: DVector<f64>,
}

impl Rkf45 {
    /// A stepper with the given tolerances and step bounds.
    pub fn new(rel_tol: f64, abs_tol: f64, min_step: f64, max_step: f64) -> Self {
        Self {
            rel_tol,
            abs_tol,
            min_step,
            max_step,
            controller: StepController::default(),
            k: Vec::new(),
            y_stage: DVector::zeros(0),
        }
    }

    fn ensure_workspace(&mut self, dim: usize) {
        if self.k.len() != STAGES || self.y_stage.len() != dim {
            self.k = vec![DVector::zeros(dim); STAGES];
            self.y_stage = DVector::zeros(dim);
        }
    }

    fn compute_stages(
        &mut self,
        rhs: &mut dyn Derivative,
        time: f64,
        state: &DVector<f64>,
        h: f64,
    ) -> Result<(), DynamicsError> {
        rhs.evaluate(time, state, &mut self.k[0])?;
        for i in 1..STAGES {
            self.y_stage.copy_from(state);
            for j in 0..i {
                if A[i][j] != 0.0 {
                    self.y_stage.axpy(h * A[i][j], &self.k[j], 1.0);
                }
            }
            rhs.evaluate(time + C[i] * h, &self.y_stage, &mut self.k[i])?;
        }
        Ok(())
    }

    /// Infinity norm of the embedded error estimate scaled per component
    /// by `abs_tol + rel_tol * |y|`.
    fn scaled_error(&self, next: &DVector<f64>, h: f64) -> f64 {
        let mut max_err: f64 = 0.0;
        for n in 0..next.len() {
            let mut err = 0.0;
            for (i, weight) in B_ERR.iter().enumerate() {
                if *weight != 0.0 {
                    err += weight * self.k[i][n];
                }
            }
            let scale = self.abs_tol + self.rel_tol * next[n].abs();
            max_err = max_err.max((h * err).abs() / scale);
        }
        max_err
    }
}

impl SteppingMethod for Rkf45 {
    fn name(&self) -> &'static str {
        "Fehlberg 4(5)"
    }

    fn order(&self) -> u8 {
        4
    }

    fn stages(&self) -> usize {
        STAGES
    }

    fn step(
        &mut self,
        rhs: &mut dyn Derivative,
        time: f64,
        state: &DVector<f64>,
        dt: f64,
    ) -> Result<StepOutcome, DynamicsError> {
        self.ensure_workspace(state.len());
        let mut h = dt.min(self.max_step);

        for _ in 0..MAX_ATTEMPTS {
            self.compute_stages(rhs, time, state, h)?;

            let mut next = state.clone();
            for (i, weight) in B.iter().enumerate() {
                if *weight != 0.0 {
                    next.axpy(h * weight, &self.k[i], 1.0);
                }
            }

            let error = self.scaled_error(&next, h);
            let factor = self.controller.factor(error);
            let h_next = (h * factor).clamp(self.min_step, self.max_step);

            if error <= 1.0 {
                return Ok(StepOutcome {
                    state: next,
                    dt_used: h,
                    dt_next: h_next,
                });
            }
            if h <= self.min_step {
                return Err(DynamicsError::StepSizeUnderflow { time, step: h });
            }
            h = h_next;
        }

        Err(DynamicsError::StepSizeUnderflow { time, step: h })
    }
}
