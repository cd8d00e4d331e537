//! The per-cell pattern possibility table.
//!
//! Each cell owns a boolean mask over the pattern set plus memoized
//! scalars (remaining count, weight sum, weight-log-weight sum, log of
//! the weight sum, entropy) that are updated incrementally on every
//! removal. The memos must equal their from-scratch recomputes at all
//! times; the entropy heuristic and weighted collapse read them on the
//! hot path.

use quell_core::{ModelError, Mulberry32};
use smallvec::SmallVec;

/// Per-cell possibility masks with incrementally maintained entropy.
///
/// Constructed once per run from the pattern weights; [`Wave::reset`]
/// restores the all-possible starting state without reallocating.
///
/// The entropy memo uses `plogp_t = w_t * ln(w_t)` (0 when `w_t = 0`),
/// which makes a collapsed cell's entropy exactly zero:
/// `ln(w) - (w * ln(w)) / w = 0`. The tie-breaking noise scale is
/// derived from normalized probabilities instead, so it stays strictly
/// positive for uniform unit weights.
#[derive(Clone, Debug)]
pub struct Wave {
    cell_count: usize,
    pattern_count: usize,
    weights: Vec<f64>,
    plogp: Vec<f64>,
    starting_weight_sum: f64,
    starting_plogp_sum: f64,
    starting_entropy: f64,
    noise_scale: f64,
    possible: Vec<bool>,
    remaining: Vec<u32>,
    weight_sums: Vec<f64>,
    plogp_sums: Vec<f64>,
    log_sums: Vec<f64>,
    entropies: Vec<f64>,
}

impl Wave {
    /// Build a wave over `cell_count` cells and the given pattern
    /// weights, with every pattern initially possible everywhere.
    ///
    /// Rejects non-finite or negative weights
    /// ([`ModelError::InvalidWeight`]) and an all-zero weight sum
    /// ([`ModelError::ZeroWeightSum`]), since weighted collapse would be
    /// undefined.
    pub fn new(cell_count: usize, weights: &[f64]) -> Result<Self, ModelError> {
        for (index, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w < 0.0 {
                return Err(ModelError::InvalidWeight { index, value: w });
            }
        }
        let weight_sum: f64 = weights.iter().sum();
        if weight_sum <= 0.0 {
            return Err(ModelError::ZeroWeightSum);
        }

        let plogp: Vec<f64> = weights
            .iter()
            .map(|&w| if w > 0.0 { w * w.ln() } else { 0.0 })
            .collect();
        let plogp_sum: f64 = plogp.iter().sum();
        let starting_entropy = weight_sum.ln() - plogp_sum / weight_sum;

        // Noise below half the smallest normalized |p ln p| keeps a
        // strictly-lower-entropy cell ahead of any noisy higher one.
        let noise_scale = weights
            .iter()
            .filter(|&&w| w > 0.0)
            .map(|&w| {
                let p = w / weight_sum;
                (p * p.ln()).abs()
            })
            .fold(f64::INFINITY, f64::min)
            / 2.0;
        let noise_scale = if noise_scale.is_finite() {
            noise_scale
        } else {
            0.0
        };

        let pattern_count = weights.len();
        let mut wave = Self {
            cell_count,
            pattern_count,
            weights: weights.to_vec(),
            plogp,
            starting_weight_sum: weight_sum,
            starting_plogp_sum: plogp_sum,
            starting_entropy,
            noise_scale,
            possible: vec![true; cell_count * pattern_count],
            remaining: vec![0; cell_count],
            weight_sums: vec![0.0; cell_count],
            plogp_sums: vec![0.0; cell_count],
            log_sums: vec![0.0; cell_count],
            entropies: vec![0.0; cell_count],
        };
        wave.reset();
        Ok(wave)
    }

    /// Restore the all-possible starting state.
    pub fn reset(&mut self) {
        self.possible.fill(true);
        self.remaining.fill(self.pattern_count as u32);
        self.weight_sums.fill(self.starting_weight_sum);
        self.plogp_sums.fill(self.starting_plogp_sum);
        self.log_sums.fill(self.starting_weight_sum.ln());
        let entropy = if self.pattern_count <= 1 {
            0.0
        } else {
            self.starting_entropy
        };
        self.entropies.fill(entropy);
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Size of the pattern set.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Weight of a pattern.
    pub fn weight(&self, pattern: usize) -> f64 {
        self.weights[pattern]
    }

    /// Tie-breaking noise magnitude for the entropy heuristic.
    pub fn noise_scale(&self) -> f64 {
        self.noise_scale
    }

    /// Whether `pattern` is still possible at `cell`.
    pub fn get(&self, cell: usize, pattern: usize) -> bool {
        self.possible[cell * self.pattern_count + pattern]
    }

    /// Number of still-possible patterns at `cell` (1 = collapsed,
    /// 0 = contradiction).
    pub fn remaining(&self, cell: usize) -> usize {
        self.remaining[cell] as usize
    }

    /// Memoized entropy of `cell` (0 when `remaining <= 1`).
    pub fn entropy(&self, cell: usize) -> f64 {
        self.entropies[cell]
    }

    /// Sum of still-possible pattern weights at `cell`.
    pub fn weight_sum(&self, cell: usize) -> f64 {
        self.weight_sums[cell]
    }

    /// Still-possible patterns at `cell`, in index order.
    pub fn possible_patterns(&self, cell: usize) -> SmallVec<[usize; 8]> {
        let base = cell * self.pattern_count;
        (0..self.pattern_count)
            .filter(|t| self.possible[base + t])
            .collect()
    }

    /// The single remaining pattern of a collapsed cell, if collapsed.
    pub fn observed(&self, cell: usize) -> Option<usize> {
        if self.remaining[cell] != 1 {
            return None;
        }
        let base = cell * self.pattern_count;
        (0..self.pattern_count).find(|t| self.possible[base + t])
    }

    /// Remove `pattern` from `cell`'s mask, updating the memoized
    /// scalars. Idempotent: returns false when the pattern was already
    /// absent.
    pub fn remove(&mut self, cell: usize, pattern: usize) -> bool {
        let idx = cell * self.pattern_count + pattern;
        if !self.possible[idx] {
            return false;
        }
        self.possible[idx] = false;
        self.remaining[cell] -= 1;
        self.weight_sums[cell] -= self.weights[pattern];
        self.plogp_sums[cell] -= self.plogp[pattern];

        let sum = self.weight_sums[cell];
        if self.remaining[cell] > 1 && sum > 0.0 {
            self.log_sums[cell] = sum.ln();
            self.entropies[cell] = self.log_sums[cell] - self.plogp_sums[cell] / sum;
        } else {
            // Collapsed or contradicted cells have zero entropy by
            // definition; pinning it avoids FP residue in the memo.
            self.log_sums[cell] = if sum > 0.0 { sum.ln() } else { 0.0 };
            self.entropies[cell] = 0.0;
        }
        true
    }

    /// Collapse `cell` to a single pattern chosen by a weighted draw.
    ///
    /// Scans patterns in index order accumulating weights and selects
    /// the first whose running sum reaches `rng.next() * weight_sum`;
    /// if rounding exhausts the scan, the last still-possible pattern
    /// wins. Every other still-possible pattern is removed; the caller
    /// must push those removals into the propagator.
    ///
    /// Returns `None` (without consuming a draw) when the cell is
    /// already contradicted.
    pub fn collapse(&mut self, cell: usize, rng: &mut Mulberry32) -> Option<usize> {
        if self.remaining[cell] == 0 {
            return None;
        }
        let base = cell * self.pattern_count;
        let target = rng.next_f64() * self.weight_sums[cell];

        let mut chosen = None;
        let mut last = 0;
        let mut acc = 0.0;
        for t in 0..self.pattern_count {
            if !self.possible[base + t] {
                continue;
            }
            last = t;
            acc += self.weights[t];
            if acc >= target {
                chosen = Some(t);
                break;
            }
        }
        let chosen = chosen.unwrap_or(last);

        for t in 0..self.pattern_count {
            if t != chosen && self.possible[base + t] {
                self.remove(cell, t);
            }
        }
        Some(chosen)
    }
}
