//! Deterministic summation of model contributions.
//!
//! One accumulator per propagated body per kind. The entry list is
//! flattened from the [`ModelSet`] once at construction and never
//! reordered, so the floating-point summation order is identical across
//! evaluations and across runs. A failing entry aborts the total; no
//! contribution is ever skipped.

use apsis_core::{BodyId, DynamicsError};
use nalgebra::Vector3;
use smallvec::SmallVec;

use crate::acceleration::AccelerationModel;
use crate::frame::StateFrame;
use crate::model_set::ModelSet;
use crate::torque::TorqueModel;

/// Sums acceleration contributions on one propagated body.
#[derive(Debug, Clone)]
pub struct AccelerationAccumulator {
    undergoing: BodyId,
    entries: SmallVec<[(BodyId, AccelerationModel); 4]>,
}

impl AccelerationAccumulator {
    /// Freeze `set`'s acceleration entries for `undergoing`.
    pub fn new(undergoing: BodyId, set: &ModelSet) -> Self {
        let entries = set
            .accelerations()
            .map(|(exerting, model)| (exerting, model.clone()))
            .collect();
        Self {
            undergoing,
            entries,
        }
    }

    /// Body the summed acceleration applies to.
    pub fn undergoing(&self) -> BodyId {
        self.undergoing
    }

    /// Frozen `(exerting, model)` entries in configuration order.
    pub fn entries(&self) -> &[(BodyId, AccelerationModel)] {
        &self.entries
    }

    /// Total acceleration against the refreshed `frame`, m/s^2.
    pub fn total(&self, frame: &StateFrame) -> Result<Vector3<f64>, DynamicsError> {
        let mut total = Vector3::zeros();
        for (exerting, model) in &self.entries {
            total += model.evaluate(frame, self.undergoing, *exerting)?;
        }
        Ok(total)
    }
}

/// Sums torque contributions on one propagated body, body-fixed frame.
#[derive(Debug, Clone)]
pub struct TorqueAccumulator {
    undergoing: BodyId,
    entries: SmallVec<[(BodyId, TorqueModel); 4]>,
}

impl TorqueAccumulator {
    /// Freeze `set`'s torque entries for `undergoing`.
    pub fn new(undergoing: BodyId, set: &ModelSet) -> Self {
        let entries = set
            .torques()
            .map(|(exerting, model)| (exerting, model.clone()))
            .collect();
        Self {
            undergoing,
            entries,
        }
    }

    /// Body the summed torque applies to.
    pub fn undergoing(&self) -> BodyId {
        self.undergoing
    }

    /// Frozen `(exerting, model)` entries in configuration order.
    pub fn entries(&self) -> &[(BodyId, TorqueModel)] {
        &self.entries
    }

    /// Total torque against the refreshed `frame`, N m.
    pub fn total(&self, frame: &StateFrame) -> Result<Vector3<f64>, DynamicsError> {
        let mut total = Vector3::zeros();
        for (exerting, model) in &self.entries {
            total += model.evaluate(frame, self.undergoing, *exerting)?;
        }
        Ok(total)
    }
}
