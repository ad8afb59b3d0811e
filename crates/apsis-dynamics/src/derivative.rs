//! Combined translational and rotational state-derivative evaluation.
//!
//! [`DynamicsModel`] is the right-hand side the integrators call once per
//! stage. Each call refreshes the scratch [`StateFrame`] at the requested
//! time and state, then fills the derivative vector block by block in
//! layout order. Stage states are speculative and later discarded, so the
//! model keeps no side effects beyond the frame and an evaluation counter.

use apsis_bodies::Environment;
use apsis_core::{BodyId, DynamicsError, StateLayout};
use nalgebra::DVector;

use crate::accumulator::{AccelerationAccumulator, TorqueAccumulator};
use crate::frame::StateFrame;
use crate::model_set::{ModelSet, ModelSetMap};
use crate::rotational;

/// State-derivative model for one arc's combined state vector.
#[derive(Debug)]
pub struct DynamicsModel<'a> {
    environment: &'a Environment,
    layout: StateLayout,
    accelerations: Vec<AccelerationAccumulator>,
    torques: Vec<TorqueAccumulator>,
    ephemeris_driven: Vec<BodyId>,
    frame: StateFrame,
    evaluations: u64,
}

impl<'a> DynamicsModel<'a> {
    /// Build the derivative model for `layout`'s propagated bodies.
    ///
    /// `models` must already have passed
    /// [`validate_model_sets`](crate::validate_model_sets); construction
    /// assumes every entry references a known body.
    pub fn new(environment: &'a Environment, layout: StateLayout, models: &ModelSetMap) -> Self {
        let empty = ModelSet::new();
        let mut accelerations = Vec::with_capacity(layout.slots().len());
        let mut torques = Vec::with_capacity(layout.slots().len());
        for slot in layout.slots() {
            let set = models.get(slot.body()).unwrap_or(&empty);
            accelerations.push(AccelerationAccumulator::new(slot.body(), set));
            torques.push(TorqueAccumulator::new(slot.body(), set));
        }

        let ephemeris_driven = collect_ephemeris_driven(&layout, models);
        let frame = StateFrame::new(environment.len());
        Self {
            environment,
            layout,
            accelerations,
            torques,
            ephemeris_driven,
            frame,
            evaluations: 0,
        }
    }

    /// Layout of the state vector this model differentiates.
    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    /// Dimension of the combined state vector.
    pub fn dim(&self) -> usize {
        self.layout.dim()
    }

    /// Derivative evaluations performed so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Fill `derivative` with the state derivative at (`time`, `state`).
    pub fn evaluate(
        &mut self,
        time: f64,
        state: &DVector<f64>,
        derivative: &mut DVector<f64>,
    ) -> Result<(), DynamicsError> {
        self.evaluations += 1;
        self.frame.refresh(
            self.environment,
            &self.layout,
            &self.ephemeris_driven,
            time,
            state,
        )?;

        for (index, slot) in self.layout.slots().iter().enumerate() {
            let velocity = slot.velocity(state);
            slot.set_position(derivative, &velocity);

            let acceleration = self.accelerations[index].total(&self.frame)?;
            slot.set_velocity(derivative, &acceleration);

            if let Some(rotation) = slot.rotation() {
                let attitude = rotation.attitude(state);
                let rate = rotation.angular_rate(state);
                rotation.set_attitude(derivative, &rotational::quaternion_rate(&attitude, &rate));

                let torque = self.torques[index].total(&self.frame)?;
                let snapshot = self.frame.snapshot(slot.body());
                let angular_acceleration = rotational::angular_acceleration(
                    &snapshot.inertia,
                    &snapshot.inertia_rate,
                    &rate,
                    &torque,
                    slot.body(),
                    time,
                )?;
                rotation.set_angular_rate(derivative, &angular_acceleration);
            }
        }
        Ok(())
    }
}

/// Bodies the models read that the layout does not advance, deduplicated
/// in first-reference order.
fn collect_ephemeris_driven(layout: &StateLayout, models: &ModelSetMap) -> Vec<BodyId> {
    let mut driven: Vec<BodyId> = Vec::new();
    let mut note = |body: BodyId| {
        if layout.slot(body).is_none() && !driven.contains(&body) {
            driven.push(body);
        }
    };
    for (_, set) in models.iter() {
        for (exerting, model) in set.accelerations() {
            note(exerting);
            if let Some(central) = model.central_body() {
                note(central);
            }
        }
        for (exerting, _) in set.torques() {
            note(exerting);
        }
    }
    driven
}
