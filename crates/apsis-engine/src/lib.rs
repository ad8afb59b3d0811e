//! Multi-arc propagation: jobs, the arc driver, and the orchestrator.
//!
//! This crate ties the lower layers together. A [`PropagationJob`] names
//! the bodies to propagate, the model sets acting on them, the arcs to
//! integrate, and the integrator and interpolation choices.
//! [`MultiArcPropagator`] validates the job against an environment at
//! construction, then [`run`](MultiArcPropagator::run) integrates every
//! arc, assembles per-body [`Trajectory`](apsis_ephemeris::Trajectory)
//! tables, and on success writes the results back into the environment.
//!
//! Arcs are independent: each integrates from its own supplied initial
//! states over its own interval, so arcs may overlap or leave gaps. Under
//! [`ArcScheduling::Parallel`] they integrate concurrently with output
//! identical to a sequential run.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod driver;
pub mod job;
pub mod metrics;
pub mod multi_arc;

pub use driver::{integrate_arc, ArcOutput};
pub use job::{
    ArcDefinition, ArcScheduling, IntegratorSelection, Interpolation, PropagatedBody,
    PropagationJob, SetupError,
};
pub use metrics::{ArcMetrics, RunMetrics};
pub use multi_arc::{MultiArcPropagator, MultiArcSolution, PropagationFailure};
