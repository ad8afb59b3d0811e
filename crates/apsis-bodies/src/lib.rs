//! Bodies and the environment registry.
//!
//! A [`Body`] bundles a name, physical properties (gravitational
//! parameter, mass, inertia), an optional [`EphemerisSource`] supplying
//! externally-defined states, and a current-state slot. Bodies live in
//! an [`Environment`], the insertion-ordered registry that hands out the
//! dense [`BodyId`](apsis_core::BodyId)s the rest of the engine works
//! with.
//!
//! Bodies are shared across arcs. Only the subset a job names as
//! propagated has its state advanced by the engine; every other body
//! referenced by a force or torque entry supplies its state through its
//! ephemeris source.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod body;
pub mod environment;
pub mod ephemeris_source;
pub mod properties;

pub use body::{Body, BodyState};
pub use environment::{Environment, EnvironmentError};
pub use ephemeris_source::EphemerisSource;
pub use properties::{InertiaModel, MassModel};
