//! Dynamical models and combined state-derivative evaluation.
//!
//! This crate holds the closed acceleration and torque model enums, the
//! configuration shapes that bind them to bodies, and the machinery that
//! turns a configuration into a derivative function an integrator can call:
//!
//! - [`AccelerationModel`] / [`TorqueModel`] — every supported model as a
//!   tagged variant, evaluated through one dispatch point each.
//! - [`ModelSet`] / [`ModelSetMap`] — which models act on which propagated
//!   body, in a deterministic configuration order.
//! - [`StateFrame`] — the per-evaluation scratch snapshot models read from.
//! - [`AccelerationAccumulator`] / [`TorqueAccumulator`] — deterministic
//!   summation of per-entry contributions.
//! - [`DynamicsModel`] — the right-hand side of the equations of motion.
//! - [`validate_model_sets`] — structural checks run before any integration.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod acceleration;
pub mod accumulator;
pub mod derivative;
pub mod frame;
pub mod model_set;
pub mod rotational;
pub mod torque;
pub mod validate;

pub use acceleration::{AccelerationModel, ExponentialAtmosphere};
pub use accumulator::{AccelerationAccumulator, TorqueAccumulator};
pub use derivative::DynamicsModel;
pub use frame::{BodySnapshot, StateFrame};
pub use model_set::{ModelSet, ModelSetMap};
pub use torque::TorqueModel;
pub use validate::{validate_model_sets, ModelSetupError};
