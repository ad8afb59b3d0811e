//! Combined state-vector layout.
//!
//! One arc integrates every propagated body together in a single
//! [`DVector`]. The layout fixes, per body, where its blocks live:
//!
//! ```text
//! [ position(3) velocity(3) | quaternion(4) angular rate(3) ]  body 0
//! [ position(3) velocity(3) ]                                  body 1
//! ...
//! ```
//!
//! The rotational block is present only for bodies propagated with
//! attitude. Quaternions are stored scalar-first (`[w, x, y, z]`).
//! A layout is fixed for the lifetime of one arc's integration; every
//! derivative evaluation and every committed sample uses the same
//! offsets.

use nalgebra::{DVector, Quaternion, Vector3, Vector6};
use smallvec::SmallVec;

use crate::id::BodyId;

/// Width of the translational block.
pub const TRANSLATIONAL_DIM: usize = 6;
/// Width of the rotational block.
pub const ROTATIONAL_DIM: usize = 7;

/// One body's region of the combined state vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BodySlot {
    body: BodyId,
    offset: usize,
    rotational: bool,
}

impl BodySlot {
    /// The body this slot belongs to.
    pub fn body(&self) -> BodyId {
        self.body
    }

    /// Offset of the translational block.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total width of this slot.
    pub fn dim(&self) -> usize {
        if self.rotational {
            TRANSLATIONAL_DIM + ROTATIONAL_DIM
        } else {
            TRANSLATIONAL_DIM
        }
    }

    /// Whether this slot carries a rotational block.
    pub fn has_rotation(&self) -> bool {
        self.rotational
    }

    /// The rotational sub-slot, if attitude is propagated for this body.
    pub fn rotation(&self) -> Option<RotationSlot> {
        self.rotational.then(|| RotationSlot {
            offset: self.offset + TRANSLATIONAL_DIM,
        })
    }

    /// Position read from `y`.
    pub fn position(&self, y: &DVector<f64>) -> Vector3<f64> {
        y.fixed_rows::<3>(self.offset).into_owned()
    }

    /// Velocity read from `y`.
    pub fn velocity(&self, y: &DVector<f64>) -> Vector3<f64> {
        y.fixed_rows::<3>(self.offset + 3).into_owned()
    }

    /// The full `[position, velocity]` block read from `y`.
    pub fn translational(&self, y: &DVector<f64>) -> Vector6<f64> {
        y.fixed_rows::<6>(self.offset).into_owned()
    }

    /// Writes the position block of `y`.
    pub fn set_position(&self, y: &mut DVector<f64>, value: &Vector3<f64>) {
        y.fixed_rows_mut::<3>(self.offset).copy_from(value);
    }

    /// Writes the velocity block of `y`.
    pub fn set_velocity(&self, y: &mut DVector<f64>, value: &Vector3<f64>) {
        y.fixed_rows_mut::<3>(self.offset + 3).copy_from(value);
    }

    /// Writes the full `[position, velocity]` block of `y`.
    pub fn set_translational(&self, y: &mut DVector<f64>, value: &Vector6<f64>) {
        y.fixed_rows_mut::<6>(self.offset).copy_from(value);
    }
}

/// The rotational region of a [`BodySlot`]: quaternion then angular rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationSlot {
    offset: usize,
}

impl RotationSlot {
    /// Offset of the quaternion's scalar component.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Attitude quaternion read from `y` (scalar-first storage).
    pub fn attitude(&self, y: &DVector<f64>) -> Quaternion<f64> {
        Quaternion::new(
            y[self.offset],
            y[self.offset + 1],
            y[self.offset + 2],
            y[self.offset + 3],
        )
    }

    /// Body-fixed angular rate read from `y`.
    pub fn angular_rate(&self, y: &DVector<f64>) -> Vector3<f64> {
        y.fixed_rows::<3>(self.offset + 4).into_owned()
    }

    /// Writes the quaternion block of `y` in scalar-first order.
    pub fn set_attitude(&self, y: &mut DVector<f64>, q: &Quaternion<f64>) {
        y[self.offset] = q.scalar();
        let v = q.imag();
        y[self.offset + 1] = v.x;
        y[self.offset + 2] = v.y;
        y[self.offset + 3] = v.z;
    }

    /// Writes the angular-rate block of `y`.
    pub fn set_angular_rate(&self, y: &mut DVector<f64>, value: &Vector3<f64>) {
        y.fixed_rows_mut::<3>(self.offset + 4).copy_from(value);
    }
}

/// The fixed layout of one arc's combined state vector.
///
/// Built once per arc from the ordered list of propagated bodies; slot
/// order equals the order bodies were named in the job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateLayout {
    slots: SmallVec<[BodySlot; 4]>,
    dim: usize,
}

impl StateLayout {
    /// Builds a layout from `(body, propagate attitude)` pairs, in order.
    pub fn new(bodies: impl IntoIterator<Item = (BodyId, bool)>) -> Self {
        let mut slots = SmallVec::new();
        let mut offset = 0;
        for (body, rotational) in bodies {
            let slot = BodySlot {
                body,
                offset,
                rotational,
            };
            offset += slot.dim();
            slots.push(slot);
        }
        Self { slots, dim: offset }
    }

    /// Total state-vector dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// All slots in layout order.
    pub fn slots(&self) -> &[BodySlot] {
        &self.slots
    }

    /// The slot for `body`, if it is propagated under this layout.
    pub fn slot(&self, body: BodyId) -> Option<&BodySlot> {
        self.slots.iter().find(|s| s.body == body)
    }

    /// A zero vector of this layout's dimension.
    pub fn zeros(&self) -> DVector<f64> {
        DVector::zeros(self.dim)
    }
}
