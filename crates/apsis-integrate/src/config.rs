//! Plain-data integrator configuration and its validation.

use std::error::Error;
use std::fmt;

use crate::method::SteppingMethod;
use crate::rk4::RungeKutta4;
use crate::rkf45::Rkf45;

/// Errors detected during [`IntegratorConfig::validate()`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `initial_step` is NaN, infinite, zero, or negative.
    InvalidInitialStep {
        /// The invalid value.
        value: f64,
    },
    /// An adaptive tolerance or step bound is NaN, infinite, zero, or
    /// negative.
    InvalidParameter {
        /// Which parameter.
        parameter: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The adaptive step bounds are not ordered `min_step < max_step`.
    UnorderedStepBounds {
        /// Configured lower bound.
        min_step: f64,
        /// Configured upper bound.
        max_step: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInitialStep { value } => {
                write!(f, "initial_step must be finite and positive, got {value}")
            }
            Self::InvalidParameter { parameter, value } => {
                write!(f, "{parameter} must be finite and positive, got {value}")
            }
            Self::UnorderedStepBounds { min_step, max_step } => {
                write!(f, "step bounds must satisfy min < max, got [{min_step}, {max_step}]")
            }
        }
    }
}

impl Error for ConfigError {}

/// The stepping scheme and its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    /// Fixed-step classic Runge-Kutta 4.
    RungeKutta4,
    /// Adaptive Fehlberg 4(5).
    Rkf45 {
        /// Relative tolerance for the per-component error scale.
        rel_tol: f64,
        /// Absolute tolerance for the per-component error scale.
        abs_tol: f64,
        /// Floor for internal retries.
        min_step: f64,
        /// Cap on any attempted step.
        max_step: f64,
    },
}

/// One arc's integrator description.
///
/// Plain data: a job carries configurations, and each arc run builds a
/// fresh stepper from its configuration. For the fixed-step scheme
/// `initial_step` is the step; for the adaptive scheme it seeds the
/// first attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    /// The stepping scheme.
    pub method: Method,
    /// First step size, in seconds.
    pub initial_step: f64,
}

impl IntegratorConfig {
    /// Fixed-step Runge-Kutta 4 with the given step.
    pub fn rk4(step: f64) -> Self {
        Self {
            method: Method::RungeKutta4,
            initial_step: step,
        }
    }

    /// Validate tolerances and step bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. The initial step must be usable as a forward step.
        if !self.initial_step.is_finite() || self.initial_step <= 0.0 {
            return Err(ConfigError::InvalidInitialStep {
                value: self.initial_step,
            });
        }
        // 2. Adaptive parameters must be positive, the bounds ordered.
        if let Method::Rkf45 {
            rel_tol,
            abs_tol,
            min_step,
            max_step,
        } = self.method
        {
            for (parameter, value) in [
                ("rel_tol", rel_tol),
                ("abs_tol", abs_tol),
                ("min_step", min_step),
                ("max_step", max_step),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::InvalidParameter { parameter, value });
                }
            }
            if min_step >= max_step {
                return Err(ConfigError::UnorderedStepBounds { min_step, max_step });
            }
        }
        Ok(())
    }

    /// Instantiate the boxed stepper this configuration describes.
    pub fn build(&self) -> Box<dyn SteppingMethod> {
        match self.method {
            Method::RungeKutta4 => Box::new(RungeKutta4::new()),
            Method::Rkf45 {
                rel_tol,
                abs_tol,
                min_step,
                max_step,
            } => Box::new(Rkf45::new(rel_tol, abs_tol, min_step, max_step)),
        }
    }
}
