//! Per-run solver counters.
//!
//! [`SolveMetrics`] captures how much work a run has done so far,
//! enabling host-side telemetry and budget decisions (e.g. chunking
//! long runs). Counters accumulate across steps and reset with the run.

/// Work counters for a solver run.
///
/// Populated by [`Solver`](crate::Solver); read them at any time via
/// [`Solver::metrics`](crate::Solver::metrics).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolveMetrics {
    /// Observation steps executed (successful collapses).
    pub steps: u64,
    /// Cells collapsed by observation (excludes cells forced by
    /// propagation).
    pub cells_collapsed: u64,
    /// Patterns banned by observation and seeded constraints (excludes
    /// propagation removals).
    pub patterns_banned: u64,
    /// Total (cell, pattern) pairs popped off the propagation stack.
    pub propagation_pops: u64,
    /// High-water mark of the propagation stack.
    pub peak_stack_depth: usize,
}
