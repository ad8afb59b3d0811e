//! Core data types for the Apsis propagation engine.
//!
//! This crate defines the vocabulary shared by every other Apsis crate:
//! strongly-typed body identifiers, the arc interval type, the combined
//! state-vector layout, and the error types that cross crate boundaries
//! (dynamics failures and ephemeris query failures).
//!
//! Everything here is plain data. Construction of a propagation job,
//! validation, and integration live in the higher-level crates.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arc;
pub mod error;
pub mod id;
pub mod state;

pub use arc::ArcInterval;
pub use error::{DynamicsError, EphemerisError};
pub use id::BodyId;
pub use state::{BodySlot, RotationSlot, StateLayout};
