//! Interpolation strategies over sampled state histories.

use nalgebra::DVector;

/// Interpolates a sampled state history at an arbitrary time.
///
/// Implementations assume `times` is strictly increasing, `states` is the
/// same length with uniform dimension, and `t` lies within
/// `[times[0], times[last]]`. The [`Trajectory`](crate::Trajectory)
/// upholds those preconditions for every query it delegates.
///
/// Queries landing exactly on a sample time reproduce that sample's
/// state bit-for-bit; regression tests rely on this.
pub trait Interpolator: Send + Sync {
    /// Scheme name for diagnostics.
    fn name(&self) -> &'static str;

    /// Minimum number of samples an arc must hold for this scheme.
    fn minimum_samples(&self) -> usize;

    /// Interpolated state at `t`.
    fn interpolate(&self, times: &[f64], states: &[DVector<f64>], t: f64) -> DVector<f64>;
}

/// Piecewise-linear interpolation between bracketing samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearInterpolator;

impl Interpolator for LinearInterpolator {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn minimum_samples(&self) -> usize {
        2
    }

    fn interpolate(&self, times: &[f64], states: &[DVector<f64>], t: f64) -> DVector<f64> {
        let right = times.partition_point(|&x| x < t);
        if right == 0 {
            return states[0].clone();
        }
        if right == times.len() {
            return states[times.len() - 1].clone();
        }

        let (t0, t1) = (times[right - 1], times[right]);
        let w = (t - t0) / (t1 - t0);
        &states[right - 1] * (1.0 - w) + &states[right] * w
    }
}

/// Lagrange polynomial interpolation over a centered sample window.
///
/// A window of `points` consecutive samples around the query time feeds
/// a classic Lagrange basis evaluation per state component. Near an
/// arc's edges the window clamps against the boundary rather than
/// shrinking, so the polynomial degree is constant across the arc.
#[derive(Clone, Copy, Debug)]
pub struct LagrangeInterpolator {
    points: usize,
}

impl LagrangeInterpolator {
    /// Creates a scheme using `points` samples per query (at least 2).
    pub fn new(points: usize) -> Self {
        Self {
            points: points.max(2),
        }
    }

    /// Window width in samples.
    pub fn points(&self) -> usize {
        self.points
    }
}

impl Default for LagrangeInterpolator {
    /// The 8-point window used throughout the engine by default.
    fn default() -> Self {
        Self::new(8)
    }
}

impl Interpolator for LagrangeInterpolator {
    fn name(&self) -> &'static str {
        "lagrange"
    }

    fn minimum_samples(&self) -> usize {
        self.points
    }

    fn interpolate(&self, times: &[f64], states: &[DVector<f64>], t: f64) -> DVector<f64> {
        let n = times.len();
        let k = self.points.min(n);

        let right = times.partition_point(|&x| x < t);
        let start = right.saturating_sub(k / 2).min(n - k);
        let window_t = &times[start..start + k];
        let window_s = &states[start..start + k];

        let mut out = DVector::zeros(window_s[0].nrows());
        for j in 0..k {
            let mut basis = 1.0;
            for m in 0..k {
                if m != j {
                    basis *= (t - window_t[m]) / (window_t[j] - window_t[m]);
                }
            }
            out += &window_s[j] * basis;
        }
        out
    }
}
