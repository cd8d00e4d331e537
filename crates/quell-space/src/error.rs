//! Error types for grid construction.

use std::error::Error;
use std::fmt;

/// Errors arising from [`Grid`](crate::Grid) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Attempted to construct a grid with a zero dimension.
    EmptyGrid,
    /// A dimension exceeds the coordinate range.
    DimensionTooLarge {
        /// Which axis, `"width"` or `"height"`.
        name: &'static str,
        /// The rejected value.
        value: usize,
        /// The maximum supported value.
        max: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "grid must have at least one cell"),
            Self::DimensionTooLarge { name, value, max } => {
                write!(f, "{name} {value} exceeds maximum {max}")
            }
        }
    }
}

impl Error for GridError {}
