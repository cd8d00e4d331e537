//! Model builders for the Quell engine.
//!
//! Two builders feed the shared solver core:
//!
//! - [`OverlappingModel`]: extracts `N x N` patterns from a pixel
//!   sample (with optional symmetry expansion) and derives adjacency
//!   from pixelwise overlap agreement.
//! - [`SimpleTiledModel`]: places whole tiles whose adjacency comes
//!   from explicit neighbour rules, expanded over symmetry variants by
//!   [`Tileset::assemble`].
//!
//! Both implement the [`Model`](quell_core::Model) operation surface:
//! step/run/clear, state and entropy snapshots, and packed-RGBA
//! rendering.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod overlapping;
pub mod tiled;
pub mod tileset;

pub use overlapping::{OverlappingModel, OverlappingOptions};
pub use tiled::{SimpleTiledModel, TiledOptions};
pub use tileset::{NeighbourRule, SymmetryClass, TileDef, Tileset};
