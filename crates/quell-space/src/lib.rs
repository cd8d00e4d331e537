//! 2D lattice topology for Quell solvers.
//!
//! This crate defines the [`Grid`]: a row-major `W x H` cell lattice
//! with 4-connected neighbour resolution under a configurable
//! [`EdgeBehavior`]. The solver consumes flat cell indices, so all
//! neighbour queries resolve index-to-index.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod edge;
pub mod error;
pub mod grid;

pub use edge::EdgeBehavior;
pub use error::GridError;
pub use grid::Grid;
