//! The model operation surface shared by both generators.
//!
//! A model owns a solver run over its pattern set and exposes the
//! stepping, inspection, and rendering operations the host drives. The
//! host interleaves [`Model::step`] with its own loop; nothing here
//! suspends or blocks.

use crate::error::RenderError;

/// Policy for choosing the next cell to collapse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Heuristic {
    /// Lowest Shannon entropy, ties broken by lazily drawn noise scaled
    /// below the smallest entropy gap.
    #[default]
    Entropy,
    /// Minimum remaining values: fewest still-possible patterns, ties
    /// broken by a noise draw.
    Mrv,
    /// Left-to-right, top-to-bottom scan resuming from a cursor.
    Scanline,
}

/// Result of a single observe-and-propagate step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// A cell was collapsed and its consequences propagated; more cells
    /// remain.
    Continue,
    /// Every cell holds exactly one pattern.
    Success,
    /// Some cell has no remaining pattern. Terminal for this run.
    Failure,
}

/// Aggregate run state, queryable at any time (including after failure).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelState {
    /// Number of cells in the output grid.
    pub total_cells: usize,
    /// Cells currently holding exactly one pattern.
    pub collapsed_cells: usize,
    /// Size of the pattern set.
    pub pattern_count: usize,
    /// True when every cell is collapsed.
    pub is_complete: bool,
    /// True once any cell has been emptied.
    pub has_contradiction: bool,
}

/// Per-cell solver state snapshot for visualization overlays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellEntropy {
    /// Memoized Shannon entropy of the cell (0 when collapsed or empty).
    pub entropy: f64,
    /// Number of still-possible patterns.
    pub remaining: usize,
    /// True when exactly one pattern remains.
    pub collapsed: bool,
}

/// Operations common to both generator models.
///
/// `step()` performs one observation plus a full propagation to
/// fixpoint; partial propagation state is never observable. All
/// operations are deterministic given the model build and seed.
pub trait Model {
    /// Collapse one cell and propagate to fixpoint.
    fn step(&mut self) -> StepOutcome;

    /// Step until success, failure, or `max_steps` is reached.
    ///
    /// Returns true only on success. Hosts that need to stay responsive
    /// should call this in bounded chunks.
    fn run(&mut self, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            match self.step() {
                StepOutcome::Continue => {}
                StepOutcome::Success => return true,
                StepOutcome::Failure => return false,
            }
        }
        false
    }

    /// Reset to the freshly constructed state, re-seeding any initial
    /// constraints.
    fn clear(&mut self);

    /// Aggregate run state.
    fn state(&self) -> ModelState;

    /// Per-cell entropy snapshot, in row-major cell order.
    fn entropy_data(&self) -> Vec<CellEntropy>;

    /// Output dimensions in pixels, `(width, height)`.
    fn render_size(&self) -> (usize, usize);

    /// Write the current render into `out` (row-major packed RGBA).
    ///
    /// `out` must hold exactly `render_size().0 * render_size().1`
    /// pixels.
    fn render(&self, out: &mut [u32]) -> Result<(), RenderError>;

    /// The cell collapsed by the most recent `step()`, if any.
    fn last_collapsed(&self) -> Option<usize>;
}
