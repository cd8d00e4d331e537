//! The observe-collapse-propagate driver.
//!
//! [`Solver`] owns all run state (wave, propagator, RNG, heuristic
//! cursor) and executes steps synchronously: select a cell, collapse
//! it, push the removals, and propagate to fixpoint before returning.
//! Models wrap a solver and add their pattern semantics and rendering.

use crate::compat::Compatibility;
use crate::heuristics::{self, CellChoice};
use crate::metrics::SolveMetrics;
use crate::propagator::Propagator;
use crate::wave::Wave;
use quell_core::{CellEntropy, Heuristic, ModelError, ModelState, Mulberry32, StepOutcome};
use quell_space::Grid;

/// A single-threaded constraint solver run.
///
/// Deterministic given `(grid, weights, compatibility, heuristic,
/// seed)`: two identical solvers produce identical collapse sequences
/// and final waves. Contradictions are sticky; [`Solver::clear`]
/// restores the freshly constructed state including any seeded
/// constraints, and [`Solver::reseed`] does the same under a new seed.
#[derive(Clone, Debug)]
pub struct Solver {
    grid: Grid,
    wave: Wave,
    propagator: Propagator,
    heuristic: Heuristic,
    seed: u32,
    rng: Mulberry32,
    scanline_cursor: usize,
    last_collapsed: Option<usize>,
    contradiction: bool,
    seeded_bans: Vec<(usize, usize)>,
    steps: u64,
    cells_collapsed: u64,
    patterns_banned: u64,
}

impl Solver {
    /// Build a solver over `grid` with the given pattern weights and
    /// compatibility table.
    ///
    /// Weight validation is the wave's ([`ModelError::ZeroWeightSum`],
    /// [`ModelError::InvalidWeight`]). The compatibility table must
    /// cover the same pattern set.
    pub fn new(
        grid: Grid,
        weights: &[f64],
        compatibility: Compatibility,
        heuristic: Heuristic,
        seed: u32,
    ) -> Result<Self, ModelError> {
        debug_assert_eq!(weights.len(), compatibility.pattern_count());
        let wave = Wave::new(grid.cell_count(), weights)?;
        let propagator = Propagator::new(grid, compatibility);
        Ok(Self {
            grid,
            wave,
            propagator,
            heuristic,
            seed,
            rng: Mulberry32::new(seed),
            scanline_cursor: 0,
            last_collapsed: None,
            contradiction: false,
            seeded_bans: Vec::new(),
            steps: 0,
            cells_collapsed: 0,
            patterns_banned: 0,
        })
    }

    /// The grid this solver runs over.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Read access to the wave state.
    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    /// The seed the run started from.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The cell collapsed by the most recent step, if any.
    pub fn last_collapsed(&self) -> Option<usize> {
        self.last_collapsed
    }

    /// Whether the run has hit a contradiction.
    pub fn has_contradiction(&self) -> bool {
        self.contradiction
    }

    /// Work counters for this run so far.
    pub fn metrics(&self) -> SolveMetrics {
        SolveMetrics {
            steps: self.steps,
            cells_collapsed: self.cells_collapsed,
            patterns_banned: self.patterns_banned,
            propagation_pops: self.propagator.pops(),
            peak_stack_depth: self.propagator.peak_stack(),
        }
    }

    /// Install initial constraints and drain them once.
    ///
    /// Each `(cell, pattern)` pair is banned, then propagation runs to
    /// fixpoint. The ban list is retained so [`Solver::clear`] can
    /// re-seed it. Returns false when seeding itself contradicts; the
    /// contradiction is sticky either way.
    pub fn seed_bans(&mut self, bans: Vec<(usize, usize)>) -> bool {
        self.seeded_bans = bans;
        self.apply_seeded_bans()
    }

    fn apply_seeded_bans(&mut self) -> bool {
        if self.seeded_bans.is_empty() {
            return true;
        }
        for k in 0..self.seeded_bans.len() {
            let (cell, pattern) = self.seeded_bans[k];
            if self.wave.remove(cell, pattern) {
                self.propagator.push(cell, pattern);
                self.patterns_banned += 1;
            }
        }
        let consistent = self.propagator.propagate(&mut self.wave);
        if !consistent {
            self.contradiction = true;
        }
        consistent
    }

    /// Collapse one cell and propagate to fixpoint.
    ///
    /// Selection, collapse draw, and propagation order are fully
    /// deterministic given the seed. After a contradiction every
    /// subsequent call returns [`StepOutcome::Failure`].
    pub fn step(&mut self) -> StepOutcome {
        if self.contradiction {
            return StepOutcome::Failure;
        }

        let choice = match self.heuristic {
            Heuristic::Entropy => heuristics::lowest_entropy(&self.wave, &mut self.rng),
            Heuristic::Mrv => heuristics::fewest_remaining(&self.wave, &mut self.rng),
            Heuristic::Scanline => heuristics::scanline(&self.wave, &mut self.scanline_cursor),
        };
        let cell = match choice {
            CellChoice::Cell(cell) => cell,
            CellChoice::Complete => return StepOutcome::Success,
            CellChoice::Contradiction => {
                self.contradiction = true;
                return StepOutcome::Failure;
            }
        };

        let candidates = self.wave.possible_patterns(cell);
        let Some(chosen) = self.wave.collapse(cell, &mut self.rng) else {
            self.contradiction = true;
            return StepOutcome::Failure;
        };
        for &pattern in &candidates {
            if pattern != chosen {
                self.propagator.push(cell, pattern);
                self.patterns_banned += 1;
            }
        }

        self.last_collapsed = Some(cell);
        self.steps += 1;
        self.cells_collapsed += 1;

        if !self.propagator.propagate(&mut self.wave) {
            self.contradiction = true;
            return StepOutcome::Failure;
        }
        StepOutcome::Continue
    }

    /// Step until success, failure, or `max_steps`. True only on
    /// success.
    pub fn run(&mut self, max_steps: usize) -> bool {
        for _ in 0..max_steps {
            match self.step() {
                StepOutcome::Continue => {}
                StepOutcome::Success => return true,
                StepOutcome::Failure => return false,
            }
        }
        false
    }

    /// Restore the freshly constructed state: all-possible wave,
    /// rebuilt counts, re-seeded RNG and cursor, and the seeded bans
    /// re-applied and drained.
    pub fn clear(&mut self) {
        self.wave.reset();
        self.propagator.reset();
        self.rng = Mulberry32::new(self.seed);
        self.scanline_cursor = 0;
        self.last_collapsed = None;
        self.contradiction = false;
        self.steps = 0;
        self.cells_collapsed = 0;
        self.patterns_banned = 0;
        self.apply_seeded_bans();
    }

    /// Swap the seed and clear, for re-running after a contradiction.
    pub fn reseed(&mut self, seed: u32) {
        self.seed = seed;
        self.clear();
    }

    /// Aggregate run state, queryable at any time.
    pub fn state(&self) -> ModelState {
        let total_cells = self.grid.cell_count();
        let mut collapsed_cells = 0;
        let mut has_contradiction = self.contradiction;
        for cell in 0..total_cells {
            match self.wave.remaining(cell) {
                0 => has_contradiction = true,
                1 => collapsed_cells += 1,
                _ => {}
            }
        }
        ModelState {
            total_cells,
            collapsed_cells,
            pattern_count: self.wave.pattern_count(),
            is_complete: collapsed_cells == total_cells,
            has_contradiction,
        }
    }

    /// Per-cell entropy snapshot in row-major order.
    pub fn entropy_data(&self) -> Vec<CellEntropy> {
        (0..self.grid.cell_count())
            .map(|cell| {
                let remaining = self.wave.remaining(cell);
                CellEntropy {
                    entropy: self.wave.entropy(cell),
                    remaining,
                    collapsed: remaining == 1,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quell_space::EdgeBehavior;

    fn alternating_solver(
        width: usize,
        height: usize,
        heuristic: Heuristic,
        seed: u32,
    ) -> Solver {
        let grid = Grid::new(width, height, EdgeBehavior::Wrap).unwrap();
        let compat = Compatibility::build(2, |t, _, t2| t != t2);
        Solver::new(grid, &[1.0, 1.0], compat, heuristic, seed).unwrap()
    }

    #[test]
    fn run_completes_an_even_periodic_colouring() {
        let mut solver = alternating_solver(6, 6, Heuristic::Entropy, 1);
        assert!(solver.run(1000));
        let state = solver.state();
        assert!(state.is_complete);
        assert!(!state.has_contradiction);
        assert_eq!(state.collapsed_cells, 36);

        // Adjacent observed patterns always differ.
        let grid = *solver.grid();
        for cell in 0..36 {
            let t = solver.wave().observed(cell).unwrap();
            for d in quell_core::Direction::ALL {
                let j = grid.neighbour(cell, d).unwrap();
                assert_ne!(solver.wave().observed(j).unwrap(), t);
            }
        }
    }

    #[test]
    fn step_after_success_stays_success() {
        let mut solver = alternating_solver(4, 4, Heuristic::Entropy, 3);
        assert!(solver.run(1000));
        assert_eq!(solver.step(), StepOutcome::Success);
        assert_eq!(solver.step(), StepOutcome::Success);
    }

    #[test]
    fn odd_grid_fails_and_failure_is_sticky() {
        // A 5x5 torus cannot be 2-coloured.
        let mut solver = alternating_solver(5, 5, Heuristic::Entropy, 0);
        assert!(!solver.run(1000));
        assert!(solver.state().has_contradiction);
        assert_eq!(solver.step(), StepOutcome::Failure);
        assert_eq!(solver.step(), StepOutcome::Failure);
    }

    #[test]
    fn clear_after_failure_allows_a_fresh_run() {
        let mut solver = alternating_solver(5, 5, Heuristic::Entropy, 0);
        assert!(!solver.run(1000));
        solver.clear();
        assert!(!solver.state().has_contradiction);
        assert_eq!(solver.state().collapsed_cells, 0);
        assert_eq!(solver.metrics(), SolveMetrics::default());
        // Same seed, same terminal outcome.
        assert!(!solver.run(1000));
    }

    #[test]
    fn scanline_collapses_in_row_major_order() {
        let mut solver = alternating_solver(4, 4, Heuristic::Scanline, 9);
        let mut order = Vec::new();
        loop {
            match solver.step() {
                StepOutcome::Continue => order.push(solver.last_collapsed().unwrap()),
                StepOutcome::Success => break,
                StepOutcome::Failure => panic!("unexpected contradiction"),
            }
        }
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted, "scanline order not monotone: {order:?}");
        assert_eq!(order.first(), Some(&0));
    }

    #[test]
    fn seeded_bans_survive_clear() {
        let mut solver = alternating_solver(4, 4, Heuristic::Entropy, 7);
        // Pin cell 0 to pattern 0; the whole colouring follows.
        assert!(solver.seed_bans(vec![(0, 1)]));
        assert!(solver.state().is_complete);
        let observed: Vec<usize> = (0..16)
            .map(|c| solver.wave().observed(c).unwrap())
            .collect();

        solver.clear();
        assert!(solver.state().is_complete);
        let observed_again: Vec<usize> = (0..16)
            .map(|c| solver.wave().observed(c).unwrap())
            .collect();
        assert_eq!(observed, observed_again);
    }

    #[test]
    fn contradictory_seed_bans_fail_the_first_step() {
        let mut solver = alternating_solver(4, 4, Heuristic::Entropy, 7);
        // Banning both patterns at a cell is immediately inconsistent.
        assert!(!solver.seed_bans(vec![(5, 0), (5, 1)]));
        assert_eq!(solver.step(), StepOutcome::Failure);
        assert!(solver.state().has_contradiction);
    }

    #[test]
    fn metrics_count_the_work() {
        let mut solver = alternating_solver(4, 4, Heuristic::Entropy, 2);
        assert!(solver.run(1000));
        let metrics = solver.metrics();
        // One observation forces the rest of the 16-cell torus.
        assert_eq!(metrics.steps, 1);
        assert_eq!(metrics.cells_collapsed, 1);
        assert_eq!(metrics.patterns_banned, 1);
        assert!(metrics.propagation_pops >= 16);
        assert!(metrics.peak_stack_depth >= 1);
    }

    #[test]
    fn last_collapsed_tracks_the_step_not_the_heuristic() {
        let mut solver = alternating_solver(4, 4, Heuristic::Scanline, 0);
        assert_eq!(solver.last_collapsed(), None);
        solver.step();
        assert_eq!(solver.last_collapsed(), Some(0));
        // Success leaves the record at the final collapse.
        while solver.step() == StepOutcome::Continue {}
        let last = solver.last_collapsed();
        assert_eq!(solver.step(), StepOutcome::Success);
        assert_eq!(solver.last_collapsed(), last);
    }

    #[test]
    fn reseed_changes_the_sequence_deterministically() {
        let collapse_order = |seed: u32| {
            let mut solver = alternating_solver(6, 6, Heuristic::Entropy, seed);
            let mut order = Vec::new();
            while solver.step() == StepOutcome::Continue {
                order.push(solver.last_collapsed().unwrap());
            }
            order
        };
        let a = collapse_order(1);
        let b = collapse_order(1);
        assert_eq!(a, b);

        let mut solver = alternating_solver(6, 6, Heuristic::Entropy, 1);
        while solver.step() == StepOutcome::Continue {}
        solver.reseed(2);
        assert_eq!(solver.seed(), 2);
        assert_eq!(solver.state().collapsed_cells, 0);
    }
}
