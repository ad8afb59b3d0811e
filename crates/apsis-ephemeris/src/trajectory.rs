//! The multi-arc trajectory record.

use std::fmt;
use std::sync::Arc;

use nalgebra::{DVector, Vector6};

use apsis_core::{ArcInterval, EphemerisError};

use crate::interpolate::Interpolator;

/// One arc's discrete sample history.
#[derive(Clone, Debug)]
pub struct ArcRecord {
    interval: ArcInterval,
    times: Vec<f64>,
    states: Vec<DVector<f64>>,
}

impl ArcRecord {
    /// The arc's time interval.
    pub fn interval(&self) -> ArcInterval {
        self.interval
    }

    /// Sample times, strictly increasing.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Sample states, parallel to [`Self::times`].
    pub fn states(&self) -> &[DVector<f64>] {
        &self.states
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the arc holds no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A time-queryable record of one body's state across registered arcs.
///
/// Arcs are registered in completion order and may overlap; a query
/// inside an overlap resolves to the last-registered arc containing it,
/// never an average. Queries outside the union of arc intervals fail
/// with [`EphemerisError::OutOfRange`] — a trajectory never
/// extrapolates.
///
/// Cloning is cheap: the interpolation strategy is shared, sample data
/// is copied per arc. A completed trajectory can therefore be both
/// returned to the caller and installed as another body's ephemeris
/// source.
#[derive(Clone)]
pub struct Trajectory {
    dim: usize,
    arcs: Vec<ArcRecord>,
    interpolator: Arc<dyn Interpolator>,
}

impl Trajectory {
    /// Creates an empty trajectory for states of dimension `dim`.
    pub fn new(dim: usize, interpolator: Arc<dyn Interpolator>) -> Self {
        Self {
            dim,
            arcs: Vec::new(),
            interpolator,
        }
    }

    /// State dimension of every sample.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of registered arcs.
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Registered arcs, oldest first.
    pub fn arcs(&self) -> &[ArcRecord] {
        &self.arcs
    }

    /// Outermost coverage bounds (earliest start, latest end).
    pub fn coverage(&self) -> Option<(f64, f64)> {
        let first = self.arcs.first()?;
        let mut start = first.interval.start;
        let mut end = first.interval.end;
        for arc in &self.arcs[1..] {
            start = start.min(arc.interval.start);
            end = end.max(arc.interval.end);
        }
        Some((start, end))
    }

    /// Registers one arc's sample history.
    ///
    /// Samples must be strictly increasing in time, parallel in length,
    /// of this trajectory's dimension, and numerous enough for the
    /// interpolation scheme. The interval is the arc's nominal span;
    /// queries are answered only inside it.
    pub fn register_arc(
        &mut self,
        interval: ArcInterval,
        times: Vec<f64>,
        states: Vec<DVector<f64>>,
    ) -> Result<(), EphemerisError> {
        let need = self.interpolator.minimum_samples();
        if times.len() < need {
            return Err(EphemerisError::InsufficientSamples {
                have: times.len(),
                need,
            });
        }
        debug_assert_eq!(times.len(), states.len());
        debug_assert!(times.windows(2).all(|w| w[0] < w[1]));
        debug_assert!(states.iter().all(|s| s.nrows() == self.dim));

        self.arcs.push(ArcRecord {
            interval,
            times,
            states,
        });
        Ok(())
    }

    /// The index of the arc answering queries at `t`, if any.
    ///
    /// Scans registration order newest-first, so overlaps resolve to the
    /// last-registered arc.
    pub fn arc_for(&self, t: f64) -> Option<usize> {
        self.arcs
            .iter()
            .enumerate()
            .rev()
            .find(|(_, arc)| arc.interval.contains(t))
            .map(|(i, _)| i)
    }

    /// Interpolated state at `t`, using deterministic arc selection.
    pub fn state_at(&self, t: f64) -> Result<DVector<f64>, EphemerisError> {
        match self.arc_for(t) {
            Some(index) => Ok(self.interpolate_in(index, t)),
            None => {
                let (start, end) = self.coverage().ok_or(EphemerisError::Empty)?;
                Err(EphemerisError::OutOfRange { time: t, start, end })
            }
        }
    }

    /// Interpolated state at `t` within a caller-chosen arc.
    pub fn state_at_in_arc(&self, t: f64, index: usize) -> Result<DVector<f64>, EphemerisError> {
        let arc = self.arcs.get(index).ok_or(EphemerisError::UnknownArc {
            index,
            arc_count: self.arcs.len(),
        })?;
        if !arc.interval.contains(t) {
            return Err(EphemerisError::OutOfRange {
                time: t,
                start: arc.interval.start,
                end: arc.interval.end,
            });
        }
        Ok(self.interpolate_in(index, t))
    }

    /// The `[position, velocity]` head of the state at `t`.
    ///
    /// Meaningful for trajectories whose layout starts with the
    /// translational block (every trajectory the engine produces).
    pub fn translational_at(&self, t: f64) -> Result<Vector6<f64>, EphemerisError> {
        let state = self.state_at(t)?;
        Ok(state.fixed_rows::<6>(0).into_owned())
    }

    fn interpolate_in(&self, index: usize, t: f64) -> DVector<f64> {
        let arc = &self.arcs[index];
        // Clamp to the sampled span: the nominal interval end and the
        // last sample time agree up to round-off.
        let t = t.clamp(arc.times[0], arc.times[arc.times.len() - 1]);
        self.interpolator.interpolate(&arc.times, &arc.states, t)
    }
}

impl fmt::Debug for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trajectory")
            .field("dim", &self.dim)
            .field("arcs", &self.arcs.len())
            .field("interpolator", &self.interpolator.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpolate::LinearInterpolator;
    use approx::assert_relative_eq;

    fn ramp_samples(start: f64, end: f64, n: usize, slope: f64) -> (Vec<f64>, Vec<DVector<f64>>) {
        let dt = (end - start) / (n - 1) as f64;
        let times: Vec<f64> = (0..n).map(|i| start + i as f64 * dt).collect();
        let states = times
            .iter()
            .map(|&t| DVector::from_vec(vec![slope * t]))
            .collect();
        (times, states)
    }

    fn linear_trajectory() -> Trajectory {
        Trajectory::new(1, Arc::new(LinearInterpolator))
    }

    #[test]
    fn empty_trajectory_reports_empty() {
        let traj = linear_trajectory();
        assert!(matches!(traj.state_at(0.0), Err(EphemerisError::Empty)));
        assert_eq!(traj.coverage(), None);
    }

    #[test]
    fn query_inside_single_arc() {
        let mut traj = linear_trajectory();
        let (times, states) = ramp_samples(0.0, 10.0, 11, 2.0);
        traj.register_arc(ArcInterval::new(0.0, 10.0), times, states)
            .unwrap();

        assert_relative_eq!(traj.state_at(3.5).unwrap()[0], 7.0);
        assert_relative_eq!(traj.state_at(0.0).unwrap()[0], 0.0);
        assert_relative_eq!(traj.state_at(10.0).unwrap()[0], 20.0);
    }

    #[test]
    fn out_of_range_on_both_sides() {
        let mut traj = linear_trajectory();
        let (times, states) = ramp_samples(5.0, 15.0, 11, 1.0);
        traj.register_arc(ArcInterval::new(5.0, 15.0), times, states)
            .unwrap();

        match traj.state_at(4.999) {
            Err(EphemerisError::OutOfRange { time, start, end }) => {
                assert_eq!(time, 4.999);
                assert_eq!(start, 5.0);
                assert_eq!(end, 15.0);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(traj.state_at(15.001).is_err());
    }

    #[test]
    fn gap_between_disjoint_arcs_is_uncovered() {
        let mut traj = linear_trajectory();
        let (t0, s0) = ramp_samples(0.0, 10.0, 11, 1.0);
        let (t1, s1) = ramp_samples(20.0, 30.0, 11, 1.0);
        traj.register_arc(ArcInterval::new(0.0, 10.0), t0, s0).unwrap();
        traj.register_arc(ArcInterval::new(20.0, 30.0), t1, s1).unwrap();

        assert!(matches!(
            traj.state_at(15.0),
            Err(EphemerisError::OutOfRange { .. })
        ));
        assert!(traj.state_at(25.0).is_ok());
    }

    #[test]
    fn overlap_resolves_to_last_registered_arc() {
        let mut traj = linear_trajectory();
        // Both arcs cover [8, 10]; slopes differ so the winner is visible.
        let (t0, s0) = ramp_samples(0.0, 10.0, 11, 1.0);
        let (t1, s1) = ramp_samples(8.0, 18.0, 11, 3.0);
        traj.register_arc(ArcInterval::new(0.0, 10.0), t0, s0).unwrap();
        traj.register_arc(ArcInterval::new(8.0, 18.0), t1, s1).unwrap();

        assert_eq!(traj.arc_for(9.0), Some(1));
        assert_relative_eq!(traj.state_at(9.0).unwrap()[0], 27.0);
        // Query order does not change the winner.
        assert_eq!(traj.arc_for(9.0), Some(1));
        // Outside the overlap the older arc still answers.
        assert_relative_eq!(traj.state_at(4.0).unwrap()[0], 4.0);
    }

    #[test]
    fn caller_chosen_arc_overrides_selection() {
        let mut traj = linear_trajectory();
        let (t0, s0) = ramp_samples(0.0, 10.0, 11, 1.0);
        let (t1, s1) = ramp_samples(8.0, 18.0, 11, 3.0);
        traj.register_arc(ArcInterval::new(0.0, 10.0), t0, s0).unwrap();
        traj.register_arc(ArcInterval::new(8.0, 18.0), t1, s1).unwrap();

        // The overlap query against the older arc sees the older data.
        assert_relative_eq!(traj.state_at_in_arc(9.0, 0).unwrap()[0], 9.0);

        assert!(matches!(
            traj.state_at_in_arc(9.0, 5),
            Err(EphemerisError::UnknownArc { index: 5, arc_count: 2 })
        ));
        assert!(matches!(
            traj.state_at_in_arc(12.0, 0),
            Err(EphemerisError::OutOfRange { .. })
        ));
    }

    #[test]
    fn short_arc_is_rejected_at_registration() {
        let mut traj = linear_trajectory();
        let times = vec![0.0];
        let states = vec![DVector::from_vec(vec![1.0])];
        assert!(matches!(
            traj.register_arc(ArcInterval::new(0.0, 1.0), times, states),
            Err(EphemerisError::InsufficientSamples { have: 1, need: 2 })
        ));
        assert_eq!(traj.arc_count(), 0);
    }

    #[test]
    fn coverage_spans_all_arcs() {
        let mut traj = linear_trajectory();
        let (t0, s0) = ramp_samples(-5.0, 0.0, 6, 1.0);
        let (t1, s1) = ramp_samples(10.0, 20.0, 6, 1.0);
        traj.register_arc(ArcInterval::new(-5.0, 0.0), t0, s0).unwrap();
        traj.register_arc(ArcInterval::new(10.0, 20.0), t1, s1).unwrap();
        assert_eq!(traj.coverage(), Some((-5.0, 20.0)));
    }

    #[test]
    fn clone_shares_interpolator_and_data() {
        let mut traj = linear_trajectory();
        let (t0, s0) = ramp_samples(0.0, 1.0, 4, 2.0);
        traj.register_arc(ArcInterval::new(0.0, 1.0), t0, s0).unwrap();

        let copy = traj.clone();
        assert_eq!(
            copy.state_at(0.5).unwrap(),
            traj.state_at(0.5).unwrap()
        );
    }
}
