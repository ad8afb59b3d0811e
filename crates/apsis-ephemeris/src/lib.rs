//! Multi-arc trajectory assembly and interpolation.
//!
//! A [`Trajectory`] stitches the discrete sample histories of one or
//! more independently-integrated arcs behind a single "state at time t"
//! query. Arc selection is deterministic: where arc intervals overlap,
//! the last-registered arc wins. Interpolation inside an arc is a
//! pluggable strategy ([`Interpolator`]); linear and Lagrange schemes
//! ship with the crate.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod interpolate;
pub mod trajectory;

pub use interpolate::{Interpolator, LagrangeInterpolator, LinearInterpolator};
pub use trajectory::{ArcRecord, Trajectory};
