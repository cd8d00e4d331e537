//! Error types for model construction and rendering.
//!
//! Everything here is detected synchronously. Contradictions reached
//! during solving are not errors; they surface as
//! [`StepOutcome::Failure`](crate::model::StepOutcome).

use std::error::Error;
use std::fmt;

/// Errors detected while constructing a model.
///
/// Construction either fully succeeds or fails with one of these; a
/// constructed model never carries a latent configuration defect.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelError {
    /// Pattern size outside the supported `2..=5` range.
    InvalidPatternSize {
        /// The rejected value.
        got: usize,
    },
    /// Output dimensions are zero or exceed the coordinate range.
    InvalidDimensions {
        /// Requested output width in cells.
        width: usize,
        /// Requested output height in cells.
        height: usize,
    },
    /// The sample pixel buffer does not match the declared dimensions.
    SampleSizeMismatch {
        /// `sample_width * sample_height`.
        expected: usize,
        /// Length of the provided pixel buffer.
        actual: usize,
    },
    /// Symmetry variant count outside `{1, 2, 8}`.
    InvalidSymmetry {
        /// The rejected value.
        got: usize,
    },
    /// Pattern extraction produced no patterns (e.g. the pattern size
    /// exceeds a non-periodic sample's dimensions).
    EmptyPatternSet,
    /// Every pattern weight is zero, so weighted collapse is undefined.
    ZeroWeightSum,
    /// A pattern weight is negative, NaN, or infinite.
    InvalidWeight {
        /// Index of the offending pattern or tile.
        index: usize,
        /// The rejected value.
        value: f64,
    },
    /// The sample palette exceeds the colour-index range.
    PaletteTooLarge {
        /// Number of distinct colours found.
        colours: usize,
    },
    /// A neighbour rule names a tile that is not in the (possibly
    /// subset-filtered) tile set.
    UnknownTile {
        /// The unresolved tile name.
        name: String,
    },
    /// A neighbour rule addresses a variant beyond the tile's symmetry
    /// cardinality.
    VariantOutOfRange {
        /// The tile name from the rule.
        name: String,
        /// The rejected variant index.
        variant: usize,
        /// The tile's variant count.
        cardinality: usize,
    },
    /// A tile's pixel buffer is not `tile_size * tile_size` long.
    TilePixelMismatch {
        /// The tile name.
        name: String,
        /// Expected pixel count.
        expected: usize,
        /// Actual pixel count.
        actual: usize,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPatternSize { got } => {
                write!(f, "pattern size {got} outside supported range 2..=5")
            }
            Self::InvalidSymmetry { got } => {
                write!(f, "symmetry {got} not one of 1, 2, 8")
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "output dimensions {width}x{height} are not usable")
            }
            Self::SampleSizeMismatch { expected, actual } => {
                write!(f, "sample buffer holds {actual} pixels, expected {expected}")
            }
            Self::EmptyPatternSet => write!(f, "sample yielded no patterns"),
            Self::ZeroWeightSum => write!(f, "all pattern weights are zero"),
            Self::InvalidWeight { index, value } => {
                write!(f, "weight {value} at index {index} is not finite and non-negative")
            }
            Self::PaletteTooLarge { colours } => {
                write!(f, "sample has {colours} distinct colours, exceeding the index range")
            }
            Self::UnknownTile { name } => write!(f, "neighbour rule names unknown tile '{name}'"),
            Self::VariantOutOfRange {
                name,
                variant,
                cardinality,
            } => write!(
                f,
                "variant {variant} out of range for tile '{name}' with cardinality {cardinality}"
            ),
            Self::TilePixelMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "tile '{name}' has {actual} pixels, expected {expected}"
            ),
        }
    }
}

impl Error for ModelError {}

/// Errors from writing a render into a caller-provided buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderError {
    /// The output buffer length does not match the render dimensions.
    BufferSize {
        /// Required length in pixels.
        expected: usize,
        /// Provided length in pixels.
        actual: usize,
    },
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferSize { expected, actual } => {
                write!(f, "render buffer holds {actual} pixels, expected {expected}")
            }
        }
    }
}

impl Error for RenderError {}
