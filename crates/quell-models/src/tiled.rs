//! The simple tiled model.
//!
//! Places whole tile variants on the output lattice under the adjacency
//! rules assembled by [`Tileset`](crate::Tileset). Rendering stamps each
//! collapsed cell's tile pixels; uncollapsed cells show either opaque
//! black or a weight-normalized blend of every variant still possible.

use quell_core::{
    pixel, CellEntropy, Heuristic, Model, ModelError, ModelState, RenderError, StepOutcome,
};
use quell_solver::{SolveMetrics, Solver};
use quell_space::{EdgeBehavior, Grid};

use crate::tileset::Tileset;

// ── Options ────────────────────────────────────────────────────────

/// Configuration for [`SimpleTiledModel::new`].
#[derive(Clone, Debug)]
pub struct TiledOptions {
    /// Output width in cells.
    pub width: usize,
    /// Output height in cells.
    pub height: usize,
    /// Whether the output lattice is toroidal.
    pub periodic: bool,
    /// Cell-selection policy.
    pub heuristic: Heuristic,
    /// PRNG seed.
    pub seed: u32,
    /// Render uncollapsed cells as opaque black instead of blending.
    pub black_background: bool,
}

impl Default for TiledOptions {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            periodic: false,
            heuristic: Heuristic::Entropy,
            seed: 0,
            black_background: false,
        }
    }
}

impl TiledOptions {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.width == 0
            || self.height == 0
            || self.width > Grid::MAX_DIM
            || self.height > Grid::MAX_DIM
        {
            return Err(ModelError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

// ── Model ──────────────────────────────────────────────────────────

/// Wave function collapse over an explicit tile set.
#[derive(Debug)]
pub struct SimpleTiledModel {
    solver: Solver,
    tile_size: usize,
    tiles: Vec<Vec<u32>>,
    names: Vec<String>,
    weights: Vec<f64>,
    black_background: bool,
}

impl SimpleTiledModel {
    /// Build a model from an assembled tile set.
    ///
    /// Fails on unusable output dimensions or an all-zero weight sum;
    /// rule errors were already caught by
    /// [`Tileset::assemble`](crate::Tileset::assemble).
    pub fn new(tileset: Tileset, options: TiledOptions) -> Result<Self, ModelError> {
        options.validate()?;
        let (tile_size, tiles, names, weights, compat) = tileset.into_parts();

        let grid = Grid::new(
            options.width,
            options.height,
            EdgeBehavior::from_periodic(options.periodic),
        )
        .map_err(|_| ModelError::InvalidDimensions {
            width: options.width,
            height: options.height,
        })?;
        let solver = Solver::new(grid, &weights, compat, options.heuristic, options.seed)?;

        Ok(Self {
            solver,
            tile_size,
            tiles,
            names,
            weights,
            black_background: options.black_background,
        })
    }

    /// Tile side length in pixels.
    pub fn tile_size(&self) -> usize {
        self.tile_size
    }

    /// `"name variant"` label of a tile variant.
    pub fn tile_name(&self, variant: usize) -> &str {
        &self.names[variant]
    }

    /// The observed variant at `cell`, once collapsed.
    pub fn observed(&self, cell: usize) -> Option<usize> {
        self.solver.wave().observed(cell)
    }

    /// Read access to the underlying solver.
    pub fn solver(&self) -> &Solver {
        &self.solver
    }

    /// Work counters for this run.
    pub fn metrics(&self) -> SolveMetrics {
        self.solver.metrics()
    }

    /// Re-run preparation under a new seed.
    pub fn reseed(&mut self, seed: u32) {
        self.solver.reseed(seed);
    }

    fn stamp(&self, out: &mut [u32], cell_x: usize, cell_y: usize, pixels: &[u32]) {
        let ts = self.tile_size;
        let row_pixels = self.solver.grid().width() * ts;
        for dy in 0..ts {
            let row = (cell_y * ts + dy) * row_pixels + cell_x * ts;
            out[row..row + ts].copy_from_slice(&pixels[dy * ts..(dy + 1) * ts]);
        }
    }
}

impl Model for SimpleTiledModel {
    fn step(&mut self) -> StepOutcome {
        self.solver.step()
    }

    fn clear(&mut self) {
        self.solver.clear();
    }

    fn state(&self) -> ModelState {
        self.solver.state()
    }

    fn entropy_data(&self) -> Vec<CellEntropy> {
        self.solver.entropy_data()
    }

    fn render_size(&self) -> (usize, usize) {
        let grid = self.solver.grid();
        (grid.width() * self.tile_size, grid.height() * self.tile_size)
    }

    fn render(&self, out: &mut [u32]) -> Result<(), RenderError> {
        let (width_px, height_px) = self.render_size();
        if out.len() != width_px * height_px {
            return Err(RenderError::BufferSize {
                expected: width_px * height_px,
                actual: out.len(),
            });
        }

        let grid = self.solver.grid();
        let wave = self.solver.wave();
        let ts = self.tile_size;
        let black = vec![pixel::OPAQUE_BLACK; ts * ts];

        for cell_y in 0..grid.height() {
            for cell_x in 0..grid.width() {
                let cell = grid.index(cell_x, cell_y);
                if let Some(variant) = wave.observed(cell) {
                    self.stamp(out, cell_x, cell_y, &self.tiles[variant]);
                    continue;
                }

                let possible = wave.possible_patterns(cell);
                let weight_sum: f64 = possible.iter().map(|&t| self.weights[t]).sum();
                if self.black_background || possible.is_empty() || weight_sum <= 0.0 {
                    self.stamp(out, cell_x, cell_y, &black);
                    continue;
                }

                // Weight-normalized blend of every possible variant.
                let mut blended = vec![0u32; ts * ts];
                for (offset, slot) in blended.iter_mut().enumerate() {
                    let (mut r, mut g, mut b) = (0.0f64, 0.0, 0.0);
                    for &t in &possible {
                        let share = self.weights[t] / weight_sum;
                        let colour = self.tiles[t][offset];
                        r += share * f64::from(pixel::red(colour));
                        g += share * f64::from(pixel::green(colour));
                        b += share * f64::from(pixel::blue(colour));
                    }
                    *slot = pixel::pack(r as u8, g as u8, b as u8, 0xff);
                }
                self.stamp(out, cell_x, cell_y, &blended);
            }
        }
        Ok(())
    }

    fn last_collapsed(&self) -> Option<usize> {
        self.solver.last_collapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tileset::{NeighbourRule, SymmetryClass, TileDef};

    const RED: u32 = 0xff00_00ff;
    const BLUE: u32 = 0xffff_0000;

    fn solid(name: &str, colour: u32) -> TileDef {
        TileDef {
            name: name.into(),
            symmetry: SymmetryClass::X,
            weight: 1.0,
            pixels: vec![colour; 4],
        }
    }

    /// Two solid tiles that must alternate on both axes.
    fn alternating_tileset() -> Tileset {
        let defs = [solid("red", RED), solid("blue", BLUE)];
        let rules = [
            NeighbourRule::new("red", "blue"),
            NeighbourRule::new("blue", "red"),
        ];
        Tileset::assemble(2, &defs, &rules, None).unwrap()
    }

    #[test]
    fn alternating_tiles_colour_an_even_torus() {
        let mut model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions {
                width: 6,
                height: 6,
                periodic: true,
                seed: 5,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        assert!(model.run(1000));

        let first = model.observed(0).unwrap();
        for cell in 0..36 {
            let (x, y) = (cell % 6, cell / 6);
            let expected = (first + x + y) % 2;
            assert_eq!(model.observed(cell), Some(expected), "cell {cell}");
        }
    }

    #[test]
    fn render_stamps_tile_pixels() {
        let mut model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions {
                width: 4,
                height: 4,
                periodic: true,
                seed: 2,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        assert!(model.run(1000));
        assert_eq!(model.render_size(), (8, 8));

        let mut out = vec![0u32; 64];
        model.render(&mut out).unwrap();
        for cell in 0..16 {
            let (x, y) = (cell % 4, cell / 4);
            let expected = if model.observed(cell) == Some(0) { RED } else { BLUE };
            // Check all four pixels of the 2x2 stamp.
            for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                assert_eq!(out[(y * 2 + dy) * 8 + x * 2 + dx], expected);
            }
        }
    }

    #[test]
    fn fresh_model_blends_by_weight() {
        let defs = [solid("red", RED), solid("blue", BLUE)];
        // No rules: every adjacency is forbidden, but rendering a fresh
        // model only reads the wave, which is still all-possible.
        let tileset = Tileset::assemble(2, &defs, &[], None).unwrap();
        let model = SimpleTiledModel::new(
            tileset,
            TiledOptions {
                width: 2,
                height: 2,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        let mut out = vec![0u32; 16];
        model.render(&mut out).unwrap();
        for &p in &out {
            // Equal weights: half red, half blue.
            assert_eq!(pixel::red(p), 127);
            assert_eq!(pixel::blue(p), 127);
            assert_eq!(pixel::green(p), 0);
            assert_eq!(pixel::alpha(p), 0xff);
        }
    }

    #[test]
    fn black_background_blanks_uncollapsed_cells() {
        let model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions {
                width: 2,
                height: 2,
                black_background: true,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        let mut out = vec![0u32; 16];
        model.render(&mut out).unwrap();
        assert!(out.iter().all(|&p| p == pixel::OPAQUE_BLACK));
    }

    #[test]
    fn render_rejects_wrong_buffer_length() {
        let model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions {
                width: 2,
                height: 2,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        let mut out = vec![0u32; 9];
        assert_eq!(
            model.render(&mut out).unwrap_err(),
            RenderError::BufferSize {
                expected: 16,
                actual: 9
            }
        );
    }

    #[test]
    fn rejects_zero_dimensions() {
        assert!(matches!(
            SimpleTiledModel::new(
                alternating_tileset(),
                TiledOptions {
                    width: 0,
                    ..TiledOptions::default()
                }
            ),
            Err(ModelError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn tile_names_follow_variant_expansion() {
        let model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions::default(),
        )
        .unwrap();
        assert_eq!(model.tile_name(0), "red 0");
        assert_eq!(model.tile_name(1), "blue 0");
        assert_eq!(model.tile_size(), 2);
    }

    #[test]
    fn clear_resets_a_finished_run() {
        let mut model = SimpleTiledModel::new(
            alternating_tileset(),
            TiledOptions {
                width: 4,
                height: 4,
                periodic: true,
                seed: 8,
                ..TiledOptions::default()
            },
        )
        .unwrap();
        assert!(model.run(1000));
        let before: Vec<_> = (0..16).map(|c| model.observed(c)).collect();

        model.clear();
        assert_eq!(model.state().collapsed_cells, 0);
        assert!(model.run(1000));
        let after: Vec<_> = (0..16).map(|c| model.observed(c)).collect();
        assert_eq!(before, after);
    }
}
