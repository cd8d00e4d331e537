//! The overlapping-pattern model.
//!
//! Extracts every `N x N` patch of a colour-quantized sample (optionally
//! expanded through its 8 rotations/reflections), deduplicates patches
//! into weighted patterns, and lets two patterns neighbour each other
//! exactly when their overlap region agrees pixelwise. Collapsed cells
//! render their pattern's anchor pixel; uncollapsed cells render the
//! mean of every contribution still possible over them.

use indexmap::IndexMap;
use quell_core::{
    pixel, CellEntropy, Heuristic, Model, ModelError, ModelState, RenderError, StepOutcome,
};
use quell_solver::{Compatibility, SolveMetrics, Solver};
use quell_space::{EdgeBehavior, Grid};

/// Colour index into the sample palette.
type ColourIndex = u16;

// ── Options ────────────────────────────────────────────────────────

/// Configuration for [`OverlappingModel::new`].
#[derive(Clone, Debug)]
pub struct OverlappingOptions {
    /// Pattern side length `N`, in `2..=5`.
    pub pattern_size: usize,
    /// How many of the 8 dihedral variants to extract: 1, 2, or 8.
    pub symmetry: usize,
    /// Whether patch extraction wraps around the sample edges.
    pub periodic_input: bool,
    /// Whether the output lattice is toroidal.
    pub periodic: bool,
    /// Pin the last-registered pattern to the bottom row and ban it
    /// elsewhere before the first step.
    pub ground: bool,
    /// Cell-selection policy.
    pub heuristic: Heuristic,
    /// PRNG seed.
    pub seed: u32,
    /// Output width in cells.
    pub width: usize,
    /// Output height in cells.
    pub height: usize,
}

impl Default for OverlappingOptions {
    fn default() -> Self {
        Self {
            pattern_size: 3,
            symmetry: 8,
            periodic_input: true,
            periodic: false,
            ground: false,
            heuristic: Heuristic::Entropy,
            seed: 0,
            width: 48,
            height: 48,
        }
    }
}

impl OverlappingOptions {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        // 1. Pattern size must be small enough to overlap usefully.
        if !(2..=5).contains(&self.pattern_size) {
            return Err(ModelError::InvalidPatternSize {
                got: self.pattern_size,
            });
        }
        // 2. Symmetry selects a prefix of the dihedral variant list.
        if !matches!(self.symmetry, 1 | 2 | 8) {
            return Err(ModelError::InvalidSymmetry { got: self.symmetry });
        }
        // 3. Output must have cells, and fit the grid coordinate range.
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

// ── Patch transforms ───────────────────────────────────────────────

/// 90 degree clockwise rotation: `out[x + y*n] = in[n-1-y + x*n]`.
fn rotated(patch: &[ColourIndex], n: usize) -> Vec<ColourIndex> {
    let mut out = vec![0; n * n];
    for y in 0..n {
        for x in 0..n {
            out[x + y * n] = patch[(n - 1 - y) + x * n];
        }
    }
    out
}

/// Horizontal reflection: `out[x + y*n] = in[n-1-x + y*n]`.
fn reflected(patch: &[ColourIndex], n: usize) -> Vec<ColourIndex> {
    let mut out = vec![0; n * n];
    for y in 0..n {
        for x in 0..n {
            out[x + y * n] = patch[(n - 1 - x) + y * n];
        }
    }
    out
}

/// Whether two patterns agree pixelwise on the overlap of `q` shifted
/// by `(dx, dy)` against `p`.
fn agree(p: &[ColourIndex], q: &[ColourIndex], dx: i32, dy: i32, n: i32) -> bool {
    let xmin = dx.max(0);
    let xmax = if dx < 0 { dx + n } else { n };
    let ymin = dy.max(0);
    let ymax = if dy < 0 { dy + n } else { n };
    for y in ymin..ymax {
        for x in xmin..xmax {
            if p[(x + n * y) as usize] != q[((x - dx) + n * (y - dy)) as usize] {
                return false;
            }
        }
    }
    true
}

// ── Model ──────────────────────────────────────────────────────────

/// Wave function collapse over patterns extracted from a pixel sample.
///
/// # Examples
///
/// ```
/// use quell_core::Model;
/// use quell_models::{OverlappingModel, OverlappingOptions};
///
/// // A 2x2 checkerboard sample tiles any even periodic output.
/// let b = 0xff000000u32;
/// let w = 0xffffffffu32;
/// let mut model = OverlappingModel::new(
///     &[b, w, w, b],
///     2,
///     2,
///     OverlappingOptions {
///         pattern_size: 2,
///         periodic: true,
///         width: 4,
///         height: 4,
///         seed: 1,
///         ..OverlappingOptions::default()
///     },
/// )
/// .unwrap();
/// assert!(model.run(1000));
/// ```
#[derive(Debug)]
pub struct OverlappingModel {
    solver: Solver,
    pattern_size: usize,
    palette: Vec<u32>,
    patterns: Vec<Vec<ColourIndex>>,
}

impl OverlappingModel {
    /// Build a model from a packed-RGBA sample.
    ///
    /// `pixels` is row-major `sample_width * sample_height`. Fails on
    /// invalid options, a mismatched buffer, an oversized palette, an
    /// empty extracted pattern set, or an all-zero weight sum.
    pub fn new(
        pixels: &[u32],
        sample_width: usize,
        sample_height: usize,
        options: OverlappingOptions,
    ) -> Result<Self, ModelError> {
        options.validate()?;
        if pixels.len() != sample_width * sample_height {
            return Err(ModelError::SampleSizeMismatch {
                expected: sample_width * sample_height,
                actual: pixels.len(),
            });
        }

        // Colour quantization, palette in first-occurrence order.
        let mut palette_map: IndexMap<u32, ColourIndex> = IndexMap::new();
        let mut sample: Vec<ColourIndex> = Vec::with_capacity(pixels.len());
        for &colour in pixels {
            let next = palette_map.len();
            let index = match palette_map.entry(colour) {
                indexmap::map::Entry::Occupied(entry) => *entry.get(),
                indexmap::map::Entry::Vacant(entry) => {
                    if next > ColourIndex::MAX as usize {
                        return Err(ModelError::PaletteTooLarge { colours: next + 1 });
                    }
                    *entry.insert(next as ColourIndex)
                }
            };
            sample.push(index);
        }
        let palette: Vec<u32> = palette_map.keys().copied().collect();

        // Pattern extraction with symmetry expansion and dedup.
        let n = options.pattern_size;
        let xmax = if options.periodic_input {
            sample_width
        } else {
            (sample_width + 1).saturating_sub(n)
        };
        let ymax = if options.periodic_input {
            sample_height
        } else {
            (sample_height + 1).saturating_sub(n)
        };

        let mut registry: IndexMap<Vec<ColourIndex>, f64> = IndexMap::new();
        for y in 0..ymax {
            for x in 0..xmax {
                let mut patch = vec![0; n * n];
                for dy in 0..n {
                    for dx in 0..n {
                        let sx = (x + dx) % sample_width;
                        let sy = (y + dy) % sample_height;
                        patch[dx + dy * n] = sample[sx + sy * sample_width];
                    }
                }

                // p0, reflect(p0), rotate(p0), reflect(p2), rotate(p2),
                // reflect(p4), rotate(p4), reflect(p6).
                let mut variants: Vec<Vec<ColourIndex>> = Vec::with_capacity(8);
                variants.push(patch);
                for k in 1..8 {
                    let variant = if k % 2 == 1 {
                        reflected(&variants[k - 1], n)
                    } else {
                        rotated(&variants[k - 2], n)
                    };
                    variants.push(variant);
                }

                for variant in variants.into_iter().take(options.symmetry) {
                    *registry.entry(variant).or_insert(0.0) += 1.0;
                }
            }
        }
        if registry.is_empty() {
            return Err(ModelError::EmptyPatternSet);
        }

        let patterns: Vec<Vec<ColourIndex>> = registry.keys().cloned().collect();
        let weights: Vec<f64> = registry.values().copied().collect();

        let compat = Compatibility::build(patterns.len(), |t, d, t2| {
            agree(&patterns[t], &patterns[t2], d.dx(), d.dy(), n as i32)
        });

        let grid = Grid::new(
            options.width,
            options.height,
            EdgeBehavior::from_periodic(options.periodic),
        )
        .map_err(|_| ModelError::InvalidDimensions {
            width: options.width,
            height: options.height,
        })?;
        let mut solver = Solver::new(grid, &weights, compat, options.heuristic, options.seed)?;

        if options.ground {
            let last = patterns.len() - 1;
            let mut bans = Vec::new();
            for x in 0..options.width {
                let cell = grid.index(x, options.height - 1);
                for t in 0..last {
                    bans.push((cell, t));
                }
            }
            for y in 0..options.height - 1 {
                for x in 0..options.width {
                    bans.push((grid.index(x, y), last));
                }
            }
            // A contradictory ground surfaces as Failure on step 1.
            solver.seed_bans(bans);
        }

        Ok(Self {
            solver,
            pattern_size: n,
            palette,
            patterns,
        })
    }

    /// Number of distinct patterns after symmetry dedup.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Number of distinct colours in the sample.
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// The extracted pattern at `index`, as palette colour indices in
    /// row-major `N x N` order.
    pub fn pattern(&self, index: usize) -> &[ColourIndex] {
        &self.patterns[index]
    }

    /// Extraction weight of the pattern at `index`.
    pub fn weight(&self, index: usize) -> f64 {
        self.solver.wave().weight(index)
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
}

impl Model for OverlappingModel {
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
        (grid.width(), grid.height())
    }

    fn render(&self, out: &mut [u32]) -> Result<(), RenderError> {
        let grid = self.solver.grid();
        let (width, height) = (grid.width(), grid.height());
        if out.len() != width * height {
            return Err(RenderError::BufferSize {
                expected: width * height,
                actual: out.len(),
            });
        }

        let wave = self.solver.wave();
        let n = self.pattern_size;
        let periodic = grid.edge() == EdgeBehavior::Wrap;

        for y in 0..height {
            for x in 0..width {
                let cell = grid.index(x, y);
                if let Some(t) = wave.observed(cell) {
                    // Anchor pixel of the observed pattern.
                    out[cell] = self.palette[self.patterns[t][0] as usize];
                    continue;
                }

                // Super-position: average every pattern pixel that
                // could cover this output pixel.
                let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
                let mut contributors = 0u64;
                for dy in 0..n {
                    for dx in 0..n {
                        let sx = x as i32 - dx as i32;
                        let sy = y as i32 - dy as i32;
                        let (sx, sy) = if periodic {
                            (
                                sx.rem_euclid(width as i32) as usize,
                                sy.rem_euclid(height as i32) as usize,
                            )
                        } else {
                            if sx < 0 || sy < 0 {
                                continue;
                            }
                            (sx as usize, sy as usize)
                        };
                        let origin = grid.index(sx, sy);
                        for &t in &wave.possible_patterns(origin) {
                            let colour =
                                self.palette[self.patterns[t][dx + dy * n] as usize];
                            r += u64::from(pixel::red(colour));
                            g += u64::from(pixel::green(colour));
                            b += u64::from(pixel::blue(colour));
                            contributors += 1;
                        }
                    }
                }
                out[cell] = if contributors == 0 {
                    pixel::OPAQUE_BLACK
                } else {
                    pixel::pack(
                        (r / contributors) as u8,
                        (g / contributors) as u8,
                        (b / contributors) as u8,
                        0xff,
                    )
                };
            }
        }
        Ok(())
    }

    fn last_collapsed(&self) -> Option<usize> {
        self.solver.last_collapsed()
    }
}
