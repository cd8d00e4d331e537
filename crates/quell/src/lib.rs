//! Quell: a wave function collapse engine for 2D texture and tile map
//! synthesis.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all Quell sub-crates. For most users, adding `quell` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use quell::prelude::*;
//!
//! // Learn local structure from a 2x2 checkerboard sample and
//! // synthesize a 4x4 periodic output.
//! let black = 0xff000000u32;
//! let white = 0xffffffffu32;
//! let mut model = OverlappingModel::new(
//!     &[black, white, white, black],
//!     2,
//!     2,
//!     OverlappingOptions {
//!         pattern_size: 2,
//!         periodic: true,
//!         width: 4,
//!         height: 4,
//!         seed: 1,
//!         ..OverlappingOptions::default()
//!     },
//! )
//! .unwrap();
//!
//! assert!(model.run(1000));
//! let (w, h) = model.render_size();
//! let mut pixels = vec![0u32; w * h];
//! model.render(&mut pixels).unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `quell-core` | Directions, pixels, PRNG, the `Model` trait, errors |
//! | [`space`] | `quell-space` | The cell lattice and edge behavior |
//! | [`solver`] | `quell-solver` | Wave, propagator, heuristics, solver driver |
//! | [`models`] | `quell-models` | Overlapping and simple-tiled model builders |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the model operation surface (`quell-core`).
pub use quell_core as types;

/// The cell lattice and edge behavior (`quell-space`).
pub use quell_space as space;

/// The constraint-propagation core (`quell-solver`).
///
/// Use this directly to run a custom pattern set through the solver
/// without either model builder.
pub use quell_solver as solver;

/// The overlapping and simple-tiled model builders (`quell-models`).
pub use quell_models as models;

/// Common imports for typical Quell usage.
///
/// ```rust
/// use quell::prelude::*;
/// ```
pub mod prelude {
    // Operation surface
    pub use quell_core::{
        CellEntropy, Heuristic, Model, ModelError, ModelState, RenderError, StepOutcome,
    };

    // Determinism and pixels
    pub use quell_core::{pixel, Direction, Mulberry32};

    // Space
    pub use quell_space::{EdgeBehavior, Grid};

    // Solver
    pub use quell_solver::{Compatibility, SolveMetrics, Solver, Wave};

    // Models
    pub use quell_models::{
        NeighbourRule, OverlappingModel, OverlappingOptions, SimpleTiledModel, SymmetryClass,
        TileDef, TiledOptions, Tileset,
    };
}
