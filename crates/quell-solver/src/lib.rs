//! Constraint-propagation core of the Quell engine.
//!
//! This crate implements the solver both generator models wrap:
//!
//! - [`Wave`]: the per-cell pattern possibility table with incrementally
//!   maintained Shannon entropy.
//! - [`Compatibility`]: sparse per-(pattern, direction) support lists.
//! - [`Propagator`]: the arc-consistency engine driving removals through
//!   the neighbour graph via a work stack of compatible counts.
//! - [`heuristics`]: the three cell-selection policies (entropy, MRV,
//!   scanline).
//! - [`Solver`]: the observe-collapse-propagate driver with reset and
//!   seeded-constraint support.
//!
//! Everything here is single-threaded and deterministic given a seed;
//! propagation always runs to fixpoint within a step.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod compat;
pub mod heuristics;
pub mod metrics;
pub mod propagator;
pub mod solver;
pub mod wave;

pub use compat::Compatibility;
pub use heuristics::CellChoice;
pub use metrics::SolveMetrics;
pub use propagator::Propagator;
pub use solver::Solver;
pub use wave::Wave;
