//! Arc intervals.

use std::fmt;

/// A bounded time interval over which one independent integration runs.
///
/// Times are seconds on a caller-chosen epoch. An interval is well-formed
/// when both bounds are finite and `start < end`; the propagation job
/// validator rejects anything else before integration begins, so the rest
/// of the engine can assume well-formed intervals.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcInterval {
    /// Inclusive start time.
    pub start: f64,
    /// Inclusive end time.
    pub end: f64,
}

impl ArcInterval {
    /// Creates an interval. No validation is performed here.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Whether both bounds are finite and `start < end`.
    pub fn is_well_formed(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start < self.end
    }

    /// Whether `t` lies within the closed interval.
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Interval length in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

impl fmt::Display for ArcInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_closed_on_both_ends() {
        let arc = ArcInterval::new(10.0, 20.0);
        assert!(arc.contains(10.0));
        assert!(arc.contains(20.0));
        assert!(arc.contains(15.0));
        assert!(!arc.contains(9.999));
        assert!(!arc.contains(20.001));
    }

    #[test]
    fn well_formedness_rejects_degenerate_and_non_finite() {
        assert!(ArcInterval::new(0.0, 1.0).is_well_formed());
        assert!(!ArcInterval::new(1.0, 1.0).is_well_formed());
        assert!(!ArcInterval::new(2.0, 1.0).is_well_formed());
        assert!(!ArcInterval::new(f64::NAN, 1.0).is_well_formed());
        assert!(!ArcInterval::new(0.0, f64::INFINITY).is_well_formed());
    }

    #[test]
    fn duration_is_end_minus_start() {
        assert_eq!(ArcInterval::new(-5.0, 5.0).duration(), 10.0);
    }
}
