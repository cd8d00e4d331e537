//! Row-major 2D cell lattice with 4-connected neighbour resolution.

use crate::edge::EdgeBehavior;
use crate::error::GridError;
use quell_core::Direction;

/// A two-dimensional cell lattice.
///
/// Cells are addressed row-major: cell `(x, y)` has index `x + y * W`
/// with `0 <= x < W` and `0 <= y < H`. Neighbours are the four cardinal
/// directions; boundary handling is controlled by [`EdgeBehavior`].
///
/// # Examples
///
/// ```
/// use quell_core::Direction;
/// use quell_space::{EdgeBehavior, Grid};
///
/// let grid = Grid::new(8, 8, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(grid.cell_count(), 64);
/// assert_eq!(grid.index(3, 2), 19);
/// assert_eq!(grid.coords(19), (3, 2));
/// assert_eq!(grid.neighbour(19, Direction::Right), Some(20));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    edge: EdgeBehavior,
}

impl Grid {
    /// Maximum dimension size: axis offsets use `i32`, so each axis
    /// must fit.
    pub const MAX_DIM: usize = i32::MAX as usize;

    /// Create a `width * height` grid with the given edge behavior.
    ///
    /// Returns `Err(GridError::EmptyGrid)` if either dimension is 0, or
    /// `Err(GridError::DimensionTooLarge)` if either exceeds
    /// [`Grid::MAX_DIM`].
    pub fn new(width: usize, height: usize, edge: EdgeBehavior) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid);
        }
        if width > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "width",
                value: width,
                max: Self::MAX_DIM,
            });
        }
        if height > Self::MAX_DIM {
            return Err(GridError::DimensionTooLarge {
                name: "height",
                value: height,
                max: Self::MAX_DIM,
            });
        }
        Ok(Self {
            width,
            height,
            edge,
        })
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Edge behavior.
    pub fn edge(&self) -> EdgeBehavior {
        self.edge
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Row-major index of `(x, y)`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        debug_assert!(x < self.width && y < self.height);
        x + y * self.width
    }

    /// `(x, y)` coordinates of a row-major index.
    pub fn coords(&self, cell: usize) -> (usize, usize) {
        debug_assert!(cell < self.cell_count());
        (cell % self.width, cell / self.width)
    }

    /// Resolve a single axis value under this grid's edge behavior.
    fn resolve_axis(val: i32, len: usize, edge: EdgeBehavior) -> Option<usize> {
        let n = len as i32;
        if val >= 0 && val < n {
            return Some(val as usize);
        }
        match edge {
            EdgeBehavior::Absorb => None,
            EdgeBehavior::Wrap => Some((((val % n) + n) % n) as usize),
        }
    }

    /// Index of the neighbour of `cell` in `direction`, or `None` when
    /// the neighbour falls outside an absorbing boundary.
    pub fn neighbour(&self, cell: usize, direction: Direction) -> Option<usize> {
        let (x, y) = self.coords(cell);
        let nx = Self::resolve_axis(x as i32 + direction.dx(), self.width, self.edge)?;
        let ny = Self::resolve_axis(y as i32 + direction.dy(), self.height, self.edge)?;
        Some(self.index(nx, ny))
    }
}
