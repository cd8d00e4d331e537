//! Boundary behavior for the cell lattice.

/// How the lattice resolves neighbours at its edges.
///
/// This controls topology only: which cell, if any, lies beyond a
/// boundary. A cell is never its own neighbour under either behavior.
///
/// # Examples
///
/// ```
/// use quell_core::Direction;
/// use quell_space::{EdgeBehavior, Grid};
///
/// let absorb = Grid::new(4, 4, EdgeBehavior::Absorb).unwrap();
/// assert_eq!(absorb.neighbour(0, Direction::Left), None);
///
/// let wrap = Grid::new(4, 4, EdgeBehavior::Wrap).unwrap();
/// assert_eq!(wrap.neighbour(0, Direction::Left), Some(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeBehavior {
    /// Out-of-bounds neighbour is omitted (edge cells have fewer
    /// neighbours).
    Absorb,
    /// Out-of-bounds neighbour wraps to the opposite side (torus
    /// topology).
    Wrap,
}

impl EdgeBehavior {
    /// Map the model-level `periodic` flag onto an edge behavior.
    pub fn from_periodic(periodic: bool) -> Self {
        if periodic {
            EdgeBehavior::Wrap
        } else {
            EdgeBehavior::Absorb
        }
    }
}
