//! Shared fixtures for Quell engine tests and benchmarks.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod fixtures;

pub use fixtures::{
    checkerboard_sample, render_of, sky_ground_sample, BLACK, GROUND, SKY, WHITE,
};
