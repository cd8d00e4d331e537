//! Cell-selection heuristics for the observation step.
//!
//! All three policies skip collapsed cells, report a contradiction on
//! sight of an emptied cell, and report completion when nothing is left
//! to choose. Selection must be deterministic given the RNG state, and
//! a cell with strictly lower score must never lose to a higher one:
//! tie-breaking noise is always scaled below the smallest score gap.

use crate::wave::Wave;
use quell_core::Mulberry32;

/// Outcome of a cell-selection scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellChoice {
    /// The cell to collapse next.
    Cell(usize),
    /// Every cell is collapsed; the run has succeeded.
    Complete,
    /// Some cell has no remaining pattern; the run has failed.
    Contradiction,
}

/// Noise magnitude for MRV tie-breaking; remaining counts differ by at
/// least 1.
const MRV_NOISE: f64 = 0.5;

/// Argmin of memoized entropy with lazily drawn tie-breaking noise.
///
/// Noise is drawn only when a cell's entropy is at or below the current
/// minimum, so the number of RNG draws (and therefore the downstream
/// sequence) depends only on the wave state, keeping runs reproducible.
pub fn lowest_entropy(wave: &Wave, rng: &mut Mulberry32) -> CellChoice {
    let mut min = f64::INFINITY;
    let mut argmin = None;

    for cell in 0..wave.cell_count() {
        match wave.remaining(cell) {
            0 => return CellChoice::Contradiction,
            1 => continue,
            _ => {}
        }
        let entropy = wave.entropy(cell);
        if entropy <= min {
            let noisy = entropy + rng.next_f64() * wave.noise_scale();
            if noisy < min {
                min = noisy;
                argmin = Some(cell);
            }
        }
    }

    match argmin {
        Some(cell) => CellChoice::Cell(cell),
        None => CellChoice::Complete,
    }
}

/// Argmin of the remaining-pattern count (minimum remaining values),
/// ties broken by a noise draw.
pub fn fewest_remaining(wave: &Wave, rng: &mut Mulberry32) -> CellChoice {
    let mut min = f64::INFINITY;
    let mut argmin = None;

    for cell in 0..wave.cell_count() {
        match wave.remaining(cell) {
            0 => return CellChoice::Contradiction,
            1 => continue,
            remaining => {
                let score = remaining as f64;
                if score <= min {
                    let noisy = score + rng.next_f64() * MRV_NOISE;
                    if noisy < min {
                        min = noisy;
                        argmin = Some(cell);
                    }
                }
            }
        }
    }

    match argmin {
        Some(cell) => CellChoice::Cell(cell),
        None => CellChoice::Complete,
    }
}

/// First uncollapsed cell at or after the cursor, left-to-right,
/// top-to-bottom. The cursor advances past the returned cell; there is
/// no wraparound, so completion is reaching the end.
pub fn scanline(wave: &Wave, cursor: &mut usize) -> CellChoice {
    let mut cell = *cursor;
    while cell < wave.cell_count() {
        match wave.remaining(cell) {
            0 => return CellChoice::Contradiction,
            1 => cell += 1,
            _ => {
                *cursor = cell + 1;
                return CellChoice::Cell(cell);
            }
        }
    }
    *cursor = wave.cell_count();
    CellChoice::Complete
}
