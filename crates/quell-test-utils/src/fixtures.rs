//! Reference samples shared by tests and benchmarks.

use quell_core::{Model, RenderError};

/// Opaque black.
pub const BLACK: u32 = 0xff00_0000;
/// Opaque white.
pub const WHITE: u32 = 0xffff_ffff;
/// The sky colour of the ground sample.
pub const SKY: u32 = 0xffd0_a060;
/// The ground colour of the ground sample.
pub const GROUND: u32 = 0xff20_70a0;

/// A `2 x 2` black/white checkerboard: `(pixels, width, height)`.
///
/// Under `pattern_size = 2` with periodic input this extracts exactly
/// the two checkerboard phases, so any even periodic output is
/// satisfiable.
pub fn checkerboard_sample() -> (Vec<u32>, usize, usize) {
    (vec![BLACK, WHITE, WHITE, BLACK], 2, 2)
}

/// A `2 x 4` sky-over-ground strip: `(pixels, width, height)`.
///
/// Three sky rows over one ground row. With `pattern_size = 2` and
/// non-periodic input, the ground band lands in the last-registered
/// pattern, matching the ground constraint's anchor convention.
pub fn sky_ground_sample() -> (Vec<u32>, usize, usize) {
    (
        vec![
            SKY, SKY, //
            SKY, SKY, //
            SKY, SKY, //
            GROUND, GROUND,
        ],
        2,
        4,
    )
}

/// Render a model into a freshly allocated buffer.
pub fn render_of(model: &dyn Model) -> Result<Vec<u32>, RenderError> {
    let (width, height) = model.render_size();
    let mut out = vec![0u32; width * height];
    model.render(&mut out)?;
    Ok(out)
}
