//! Numerical stepping methods for the Apsis propagation engine.
//!
//! The arc driver owns the time loop; this crate owns single steps. The
//! seam between the two is [`SteppingMethod`]: given a derivative callback
//! and a requested step, produce the next state and a recommendation for
//! the step after it. Two schemes ship:
//!
//! - [`RungeKutta4`] — the classic fixed-step 4-stage scheme.
//! - [`Rkf45`] — the Fehlberg embedded 4(5) pair with proportional
//!   step-size control.
//!
//! [`IntegratorConfig`] is the plain-data description of a scheme; its
//! [`build`](IntegratorConfig::build) method instantiates the boxed
//! stepper, so jobs can carry configurations around without carrying
//! stepper state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod method;
pub mod rk4;
pub mod rkf45;

pub use config::{ConfigError, IntegratorConfig, Method};
pub use method::{Derivative, StepOutcome, SteppingMethod};
pub use rk4::RungeKutta4;
pub use rkf45::{Rkf45, StepController};
