//! Analytic two-body machinery.
//!
//! Keplerian orbital elements, conversions to and from Cartesian state,
//! and closed-form propagation of an unperturbed orbit. The numerical
//! engine uses this crate two ways: analytic ephemeris sources evaluate
//! environment bodies through it, and the accuracy tests compare
//! integrated trajectories against it as an independent truth source.
//!
//! Only elliptical orbits (`e < 1`) are supported; parabolic and
//! hyperbolic states are rejected with [`KeplerError::NonElliptic`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod anomaly;
pub mod elements;
pub mod error;
pub mod propagate;

pub use anomaly::{
    eccentric_to_mean, eccentric_to_true, mean_to_eccentric, true_to_eccentric,
};
pub use elements::KeplerianElements;
pub use error::KeplerError;
pub use propagate::propagate_elements;
