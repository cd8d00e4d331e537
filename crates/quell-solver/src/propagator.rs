//! The arc-consistency propagation engine.
//!
//! Maintains, for every (cell, pattern, direction), the number of
//! still-possible patterns in the neighbouring cell that support the
//! pattern here. Removals push (cell, pattern) pairs onto a work stack;
//! [`Propagator::propagate`] drains the stack to fixpoint, decrementing
//! counts and banning patterns whose support reaches zero.
//!
//! Counting supporters instead of rechecking neighbourhoods is the
//! load-bearing optimization: propagation cost is near-linear in the
//! number of removals.

use crate::compat::Compatibility;
use crate::wave::Wave;
use quell_core::Direction;
use quell_space::Grid;

/// Per-cell compatible counts plus the propagation work stack.
///
/// Created once per run alongside the [`Wave`]; [`Propagator::reset`]
/// rebuilds the counts and clears the stack without reallocating the
/// compatibility lists.
#[derive(Clone, Debug)]
pub struct Propagator {
    grid: Grid,
    compat: Compatibility,
    /// Neighbour index per (cell, direction); -1 where the boundary
    /// absorbs.
    neighbours: Vec<[i32; 4]>,
    /// Support counts, indexed `((cell * T) + pattern) * 4 + direction`.
    counts: Vec<i32>,
    stack: Vec<(u32, u32)>,
    pops: u64,
    peak_stack: usize,
}

impl Propagator {
    /// Build the propagator for `grid` over the given compatibility
    /// table.
    pub fn new(grid: Grid, compat: Compatibility) -> Self {
        let cells = grid.cell_count();
        let pattern_count = compat.pattern_count();

        let neighbours: Vec<[i32; 4]> = (0..cells)
            .map(|cell| {
                let mut row = [-1i32; 4];
                for d in Direction::ALL {
                    if let Some(j) = grid.neighbour(cell, d) {
                        row[d.index()] = j as i32;
                    }
                }
                row
            })
            .collect();

        let mut propagator = Self {
            grid,
            compat,
            neighbours,
            counts: vec![0; cells * pattern_count * 4],
            stack: Vec::with_capacity(cells * pattern_count),
            pops: 0,
            peak_stack: 0,
        };
        propagator.rebuild_counts();
        propagator
    }

    /// The grid this propagator runs over.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The compatibility table this propagator was built from.
    pub fn compat(&self) -> &Compatibility {
        &self.compat
    }

    /// Support count for (`cell`, `pattern`) from `direction`.
    pub fn count(&self, cell: usize, pattern: usize, direction: Direction) -> i32 {
        let t_count = self.compat.pattern_count();
        self.counts[(cell * t_count + pattern) * 4 + direction.index()]
    }

    /// Cumulative number of stack pops across propagation runs.
    pub fn pops(&self) -> u64 {
        self.pops
    }

    /// High-water mark of the work stack.
    pub fn peak_stack(&self) -> usize {
        self.peak_stack
    }

    fn rebuild_counts(&mut self) {
        let t_count = self.compat.pattern_count();
        for cell in 0..self.grid.cell_count() {
            for d in Direction::ALL {
                // Absent neighbours hold a zero count; it never reaches
                // zero *through a decrement*, so it never triggers.
                let present = self.neighbours[cell][d.index()] >= 0;
                for t in 0..t_count {
                    self.counts[(cell * t_count + t) * 4 + d.index()] = if present {
                        self.compat.list(t, d).len() as i32
                    } else {
                        0
                    };
                }
            }
        }
    }

    /// Queue a removed (cell, pattern) pair for propagation.
    ///
    /// The pattern must already be absent from the wave (or removed by
    /// the same caller before draining).
    pub fn push(&mut self, cell: usize, pattern: usize) {
        self.stack.push((cell as u32, pattern as u32));
        if self.stack.len() > self.peak_stack {
            self.peak_stack = self.stack.len();
        }
    }

    /// Drain the work stack to the arc-consistency fixpoint.
    ///
    /// Returns false as soon as some cell loses its last pattern; the
    /// wave then holds a contradiction and the run is terminal.
    pub fn propagate(&mut self, wave: &mut Wave) -> bool {
        let t_count = self.compat.pattern_count();
        while let Some((cell, pattern)) = self.stack.pop() {
            self.pops += 1;
            let i = cell as usize;
            let t = pattern as usize;

            for d in Direction::ALL {
                let j = self.neighbours[i][d.index()];
                if j < 0 {
                    continue;
                }
                let j = j as usize;
                // From the neighbour's perspective the removed pattern
                // sat in the opposite direction.
                let back = d.opposite().index();

                for &t2 in self.compat.list(t, d) {
                    let t2 = t2 as usize;
                    let count = &mut self.counts[(j * t_count + t2) * 4 + back];
                    *count -= 1;
                    if *count == 0 && wave.get(j, t2) {
                        wave.remove(j, t2);
                        self.stack.push((j as u32, t2 as u32));
                        if self.stack.len() > self.peak_stack {
                            self.peak_stack = self.stack.len();
                        }
                        if wave.remaining(j) == 0 {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Rebuild counts from the compatibility lists and clear the stack
    /// and counters.
    pub fn reset(&mut self) {
        self.rebuild_counts();
        self.stack.clear();
        self.pops = 0;
        self.peak_stack = 0;
    }
}
