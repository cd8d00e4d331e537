//! Packed 32-bit RGBA pixel helpers.
//!
//! Both sample inputs and render outputs use the same channel layout:
//! `R | G << 8 | B << 16 | A << 24` (little-endian byte order R,G,B,A).

/// Fully opaque black, the colour of cells with no render contributors.
pub const OPAQUE_BLACK: u32 = 0xff00_0000;

/// Pack four channel bytes into a pixel.
///
/// ```
/// use quell_core::pixel;
///
/// let p = pixel::pack(0x11, 0x22, 0x33, 0xff);
/// assert_eq!(pixel::red(p), 0x11);
/// assert_eq!(pixel::green(p), 0x22);
/// assert_eq!(pixel::blue(p), 0x33);
/// assert_eq!(pixel::alpha(p), 0xff);
/// ```
pub fn pack(r: u8, g: u8, b: u8, a: u8) -> u32 {
    u32::from(r) | u32::from(g) << 8 | u32::from(b) << 16 | u32::from(a) << 24
}

/// Red channel (byte 0).
pub fn red(pixel: u32) -> u8 {
    (pixel & 0xff) as u8
}

/// Green channel (byte 1).
pub fn green(pixel: u32) -> u8 {
    (pixel >> 8 & 0xff) as u8
}

/// Blue channel (byte 2).
pub fn blue(pixel: u32) -> u8 {
    (pixel >> 16 & 0xff) as u8
}

/// Alpha channel (byte 3).
pub fn alpha(pixel: u32) -> u8 {
    (pixel >> 24 & 0xff) as u8
}
