//! Core types for the Quell wave function collapse engine.
//!
//! This is the leaf crate with zero internal Quell dependencies. It defines
//! the fundamental vocabulary used throughout the workspace: direction
//! constants, packed-pixel helpers, the deterministic PRNG, the model
//! operation surface, and error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod direction;
pub mod error;
pub mod model;
pub mod pixel;
pub mod rng;

// Re-export core types at crate root for convenience.
pub use direction::Direction;
pub use error::{ModelError, RenderError};
pub use model::{CellEntropy, Heuristic, Model, ModelState, StepOutcome};
pub use rng::Mulberry32;
