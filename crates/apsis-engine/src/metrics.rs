//! Per-arc and per-run performance metrics.
//!
//! Plain data returned alongside results; nothing here is consulted by
//! the propagation itself.

/// Counters collected while integrating one arc.
#[derive(Clone, Debug, Default)]
pub struct ArcMetrics {
    /// Steps the stepping method accepted (committed samples minus one).
    pub accepted_steps: u64,
    /// Right-hand-side evaluations, including rejected adaptive attempts.
    pub derivative_evaluations: u64,
    /// Samples in the arc's history, bracketing samples included.
    pub samples: usize,
    /// Wall-clock time for the arc, in microseconds.
    pub total_us: u64,
}

/// Aggregate metrics for a whole multi-arc run.
#[derive(Clone, Debug, Default)]
pub struct RunMetrics {
    /// Wall-clock time for the run, in microseconds.
    pub total_us: u64,
    /// Per-arc counters, in arc order.
    pub arcs: Vec<ArcMetrics>,
}

impl RunMetrics {
    /// Accepted steps summed over every arc.
    pub fn accepted_steps(&self) -> u64 {
        self.arcs.iter().map(|m| m.accepted_steps).sum()
    }

    /// Derivative evaluations summed over every arc.
    pub fn derivative_evaluations(&self) -> u64 {
        self.arcs.iter().map(|m| m.derivative_evaluations).sum()
    }
}
