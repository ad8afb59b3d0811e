//! Model configuration: which models act on which propagated body.
//!
//! Entries are grouped by exerting body and kept in insertion order at
//! both levels, so flattening a set always yields the same sequence. The
//! accumulators freeze that sequence at construction, which pins the
//! floating-point summation order for the life of a run.

use apsis_core::BodyId;
use indexmap::IndexMap;

use crate::acceleration::AccelerationModel;
use crate::torque::TorqueModel;

/// Acceleration and torque models acting on one propagated body.
#[derive(Debug, Clone, Default)]
pub struct ModelSet {
    accelerations: IndexMap<BodyId, Vec<AccelerationModel>>,
    torques: IndexMap<BodyId, Vec<TorqueModel>>,
}

impl ModelSet {
    /// An empty model set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an acceleration exerted by `exerting`.
    pub fn add_acceleration(&mut self, exerting: BodyId, model: AccelerationModel) -> &mut Self {
        self.accelerations.entry(exerting).or_default().push(model);
        self
    }

    /// Add a torque exerted by `exerting`.
    pub fn add_torque(&mut self, exerting: BodyId, model: TorqueModel) -> &mut Self {
        self.torques.entry(exerting).or_default().push(model);
        self
    }

    /// Flattened `(exerting, model)` acceleration entries in configuration
    /// order.
    pub fn accelerations(&self) -> impl Iterator<Item = (BodyId, &AccelerationModel)> {
        self.accelerations
            .iter()
            .flat_map(|(&body, models)| models.iter().map(move |model| (body, model)))
    }

    /// Flattened `(exerting, model)` torque entries in configuration order.
    pub fn torques(&self) -> impl Iterator<Item = (BodyId, &TorqueModel)> {
        self.torques
            .iter()
            .flat_map(|(&body, models)| models.iter().map(move |model| (body, model)))
    }

    /// Whether the set holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.accelerations.values().all(Vec::is_empty)
            && self.torques.values().all(Vec::is_empty)
    }
}

/// Per-propagated-body model sets, keyed in configuration order.
#[derive(Debug, Clone, Default)]
pub struct ModelSetMap {
    sets: IndexMap<BodyId, ModelSet>,
}

impl ModelSetMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The model set for `undergoing`, created empty on first access.
    pub fn entry(&mut self, undergoing: BodyId) -> &mut ModelSet {
        self.sets.entry(undergoing).or_default()
    }

    /// Replace the model set for `undergoing` wholesale.
    pub fn insert(&mut self, undergoing: BodyId, set: ModelSet) {
        self.sets.insert(undergoing, set);
    }

    /// The model set for `undergoing`, if one was configured.
    pub fn get(&self, undergoing: BodyId) -> Option<&ModelSet> {
        self.sets.get(&undergoing)
    }

    /// All `(undergoing, set)` pairs in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &ModelSet)> {
        self.sets.iter().map(|(&body, set)| (body, set))
    }

    /// Number of bodies with a configured set.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// Whether no body has a configured set.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn flattening_preserves_configuration_order() {
        let earth = BodyId(0);
        let moon = BodyId(1);

        let mut set = ModelSet::new();
        set.add_acceleration(
            earth,
            AccelerationModel::ZonalHarmonicGravity {
                reference_radius: 6.378e6,
                j2: 1.08e-3,
                j3: 0.0,
                j4: 0.0,
            },
        )
        .add_acceleration(moon, AccelerationModel::PointMassGravity)
        .add_acceleration(earth, AccelerationModel::PointMassGravity);

        let flattened: Vec<_> = set.accelerations().collect();
        assert_eq!(flattened.len(), 3);
        // Grouped by exerting body first, then per-body insertion order.
        assert_eq!(flattened[0].0, earth);
        assert!(matches!(
            flattened[1].1,
            AccelerationModel::PointMassGravity
        ));
        assert_eq!(flattened[1].0, earth);
        assert_eq!(flattened[2].0, moon);
    }

    #[test]
    fn torques_flatten_separately() {
        let earth = BodyId(0);
        let mut set = ModelSet::new();
        set.add_torque(earth, TorqueModel::GravityGradient).add_torque(
            earth,
            TorqueModel::ConstantBodyFixed {
                torque: Vector3::new(0.0, 0.0, 1.0e-3),
            },
        );

        assert_eq!(set.accelerations().count(), 0);
        assert_eq!(set.torques().count(), 2);
        assert!(!set.is_empty());
    }

    #[test]
    fn map_entry_creates_and_reuses_sets() {
        let craft = BodyId(2);
        let earth = BodyId(0);

        let mut map = ModelSetMap::new();
        assert!(map.get(craft).is_none());

        map.entry(craft)
            .add_acceleration(earth, AccelerationModel::PointMassGravity);
        map.entry(craft)
            .add_torque(earth, TorqueModel::GravityGradient);

        assert_eq!(map.len(), 1);
        let set = map.get(craft).unwrap();
        assert_eq!(set.accelerations().count(), 1);
        assert_eq!(set.torques().count(), 1);
    }

    #[test]
    fn map_iterates_in_configuration_order() {
        let mut map = ModelSetMap::new();
        map.entry(BodyId(5));
        map.entry(BodyId(1));
        map.entry(BodyId(3));

        let keys: Vec<_> = map.iter().map(|(body, _)| body).collect();
        assert_eq!(keys, vec![BodyId(5), BodyId(1), BodyId(3)]);
    }
}
