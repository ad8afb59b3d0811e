//! Multi-arc orchestration: run every arc of a job and assemble the results.
//!
//! [`MultiArcPropagator`] is the entry point for a propagation. Construction
//! validates the job against the environment it will run over; [`run()`]
//! integrates each arc, splits the committed samples per body, and registers
//! them into per-body [`Trajectory`] tables. Arcs run in the order the job
//! lists them, so where arcs overlap in time the later arc's samples answer
//! queries in the overlap.
//!
//! On success the environment is updated in place: each propagated body's
//! state slot receives its final integrated state, and its trajectory is
//! installed as a [`Tabulated`](EphemerisSource::Tabulated) source so later
//! jobs can read this run's output as an ephemeris. On failure the
//! environment is left exactly as it was.
//!
//! [`run()`]: MultiArcPropagator::run

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::unbounded;
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra::DVector;

use apsis_bodies::{BodyState, Environment, EphemerisSource};
use apsis_core::{BodyId, DynamicsError, StateLayout};
use apsis_dynamics::DynamicsModel;
use apsis_ephemeris::{Interpolator, Trajectory};

use crate::driver::{integrate_arc, ArcOutput};
use crate::job::{ArcScheduling, PropagationJob, SetupError};
use crate::metrics::RunMetrics;

/// The product of a completed run: per-body trajectories plus counters.
#[derive(Clone, Debug)]
pub struct MultiArcSolution {
    /// One trajectory per propagated body, keyed in job body order. Each
    /// covers every arc of the run.
    pub trajectories: IndexMap<BodyId, Trajectory>,
    /// Work counters for the run and for each arc.
    pub metrics: RunMetrics,
}

impl MultiArcSolution {
    /// The trajectory of `body`, if the job propagated it.
    pub fn trajectory(&self, body: BodyId) -> Option<&Trajectory> {
        self.trajectories.get(&body)
    }
}

/// A run that stopped partway: which arc failed, why, and what survived.
///
/// `partial` holds trajectories covering only the arcs that completed and
/// registered before the failing one. The environment the run was given is
/// not modified on failure.
#[derive(Clone, Debug)]
pub struct PropagationFailure {
    /// Index of the failing arc in the job's arc list.
    pub arc_index: usize,
    /// Last valid time the failing arc reached.
    pub time: f64,
    /// The dynamics failure that stopped the arc.
    pub source: DynamicsError,
    /// Per-body trajectories from the arcs before `arc_index`.
    pub partial: IndexMap<BodyId, Trajectory>,
}

impl fmt::Display for PropagationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arc {} failed at t = {}: {}",
            self.arc_index, self.time, self.source
        )
    }
}

impl Error for PropagationFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Runs a validated [`PropagationJob`] over an environment.
pub struct MultiArcPropagator {
    job: PropagationJob,
    layout: StateLayout,
    interpolator: Arc<dyn Interpolator>,
}

impl MultiArcPropagator {
    /// Validates `job` against `environment` and readies it to run.
    ///
    /// All setup problems surface here; [`run()`](Self::run) can then only
    /// fail for numerical reasons.
    pub fn new(job: PropagationJob, environment: &Environment) -> Result<Self, SetupError> {
        let layout = job.validate(environment)?;
        let interpolator = job.interpolation.build();
        Ok(Self {
            job,
            layout,
            interpolator,
        })
    }

    /// The job this propagator was built from.
    pub fn job(&self) -> &PropagationJob {
        &self.job
    }

    /// The combined state layout the job advances.
    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Integrates every arc and assembles per-body trajectories.
    ///
    /// `environment` must be the environment the job was validated against.
    /// Arcs are independent: each starts from its own supplied initial
    /// states, never from a previous arc's output. Under
    /// [`ArcScheduling::Parallel`] the arcs integrate concurrently but the
    /// results are identical to a sequential run.
    pub fn run(
        &self,
        environment: &mut Environment,
    ) -> Result<MultiArcSolution, PropagationFailure> {
        let run_start = Instant::now();
        let outcomes = match self.job.scheduling {
            ArcScheduling::Sequential => self.integrate_sequential(environment),
            ArcScheduling::Parallel => self.integrate_parallel(environment),
        };
        self.assemble(environment, outcomes, run_start)
    }

    /// Integrates one arc from a fresh model and a fresh stepping method.
    ///
    /// Both are rebuilt per arc so that sequential and parallel runs see
    /// identical starting conditions for every arc.
    fn integrate_one(
        &self,
        environment: &Environment,
        arc_index: usize,
    ) -> Result<ArcOutput, DynamicsError> {
        let arc = &self.job.arcs[arc_index];
        let mut model = DynamicsModel::new(
            environment,
            self.layout.clone(),
            self.job.models_for_arc(arc_index),
        );
        let config = self.job.integrators.config_for(arc_index);
        let mut method = config.build();
        let initial = assemble_initial(&self.layout, &arc.initial_states);
        integrate_arc(
            &mut model,
            method.as_mut(),
            arc.interval,
            initial,
            config.initial_step,
        )
    }

    fn integrate_sequential(
        &self,
        environment: &Environment,
    ) -> Vec<Result<ArcOutput, DynamicsError>> {
        let mut outcomes = Vec::with_capacity(self.job.arcs.len());
        for arc_index in 0..self.job.arcs.len() {
            let outcome = self.integrate_one(environment, arc_index);
            let failed = outcome.is_err();
            outcomes.push(outcome);
            if failed {
                // Later arcs are independent but a failed run reports the
                // lowest failing index, so there is nothing left to learn.
                break;
            }
        }
        outcomes
    }

    fn integrate_parallel(
        &self,
        environment: &Environment,
    ) -> Vec<Result<ArcOutput, DynamicsError>> {
        let arc_count = self.job.arcs.len();
        let mut slots: Vec<Option<Result<ArcOutput, DynamicsError>>> = Vec::new();
        slots.resize_with(arc_count, || None);

        std::thread::scope(|scope| {
            let (tx, rx) = unbounded();
            for arc_index in 0..arc_count {
                let tx = tx.clone();
                scope.spawn(move || {
                    let _ = tx.send((arc_index, self.integrate_one(environment, arc_index)));
                });
            }
            drop(tx);
            for (arc_index, outcome) in rx {
                slots[arc_index] = Some(outcome);
            }
        });

        // Every worker sends exactly once; a panic would have propagated
        // out of the scope above.
        slots.into_iter().flatten().collect()
    }

    /// Registers arc outputs in arc order and, on success, installs the
    /// final states and trajectories into the environment.
    fn assemble(
        &self,
        environment: &mut Environment,
        outcomes: Vec<Result<ArcOutput, DynamicsError>>,
        run_start: Instant,
    ) -> Result<MultiArcSolution, PropagationFailure> {
        let mut trajectories: IndexMap<BodyId, Trajectory> = self
            .layout
            .slots()
            .iter()
            .map(|slot| {
                let trajectory = Trajectory::new(slot.dim(), Arc::clone(&self.interpolator));
                (slot.body(), trajectory)
            })
            .collect();
        let mut arc_metrics = Vec::with_capacity(outcomes.len());
        let mut final_state: Option<DVector<f64>> = None;

        for (arc_index, outcome) in outcomes.into_iter().enumerate() {
            let interval = self.job.arcs[arc_index].interval;
            let output = match outcome {
                Ok(output) => output,
                Err(source) => {
                    let time = source.time();
                    warn!("arc {arc_index} failed at t = {time}: {source}");
                    return Err(PropagationFailure {
                        arc_index,
                        time,
                        source,
                        partial: trajectories,
                    });
                }
            };

            debug!(
                "arc {arc_index} covering {interval} done: {} accepted steps, {} evaluations",
                output.metrics.accepted_steps, output.metrics.derivative_evaluations
            );

            for slot in self.layout.slots() {
                let states = output
                    .states
                    .iter()
                    .map(|state| state.rows(slot.offset(), slot.dim()).into_owned())
                    .collect();
                let Some(trajectory) = trajectories.get_mut(&slot.body()) else {
                    continue;
                };
                if let Err(source) =
                    trajectory.register_arc(interval, output.times.clone(), states)
                {
                    let source = DynamicsError::Ephemeris {
                        body: slot.body(),
                        time: interval.end,
                        source,
                    };
                    warn!("arc {arc_index} failed at t = {}: {source}", interval.end);
                    return Err(PropagationFailure {
                        arc_index,
                        time: interval.end,
                        source,
                        partial: trajectories,
                    });
                }
            }

            final_state = output.states.last().cloned();
            arc_metrics.push(output.metrics);
        }

        if let Some(final_state) = final_state {
            self.install(environment, &final_state, &trajectories);
        }

        Ok(MultiArcSolution {
            trajectories,
            metrics: RunMetrics {
                total_us: run_start.elapsed().as_micros() as u64,
                arcs: arc_metrics,
            },
        })
    }

    /// Writes the last arc's final state into each body's state slot and
    /// installs the assembled trajectories as tabulated ephemerides.
    fn install(
        &self,
        environment: &mut Environment,
        final_state: &DVector<f64>,
        trajectories: &IndexMap<BodyId, Trajectory>,
    ) {
        for slot in self.layout.slots() {
            let Some(body) = environment.body_mut(slot.body()) else {
                continue;
            };
            body.state.translational = slot.translational(final_state);
            if let Some(rotation) = slot.rotation() {
                body.state.attitude = rotation.attitude(final_state);
                body.state.angular_rate = rotation.angular_rate(final_state);
            }
            if let Some(trajectory) = trajectories.get(&slot.body()) {
                body.ephemeris = Some(EphemerisSource::Tabulated(trajectory.clone()));
            }
        }
    }
}

/// Packs one arc's per-body initial states into a combined state vector.
fn assemble_initial(layout: &StateLayout, initial_states: &[BodyState]) -> DVector<f64> {
    let mut state = layout.zeros();
    for (slot, body_state) in layout.slots().iter().zip(initial_states) {
        slot.set_translational(&mut state, &body_state.translational);
        if let Some(rotation) = slot.rotation() {
            rotation.set_attitude(&mut state, &body_state.attitude);
            rotation.set_angular_rate(&mut state, &body_state.angular_rate);
        }
    }
    state
}
