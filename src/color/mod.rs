//! Average-color sampling over image regions.
//!
//! [`average_color`] reduces a rectangular region of an image to a single
//! representative color. It is the primitive underneath downsampling (one
//! sample per grid cell) and palette construction (one sample per candidate
//! image).

use image::{Rgba, RgbaImage};

/// A half-open pixel rectangle `[min_x, max_x) x [min_y, max_y)`.
///
/// Grid tiling math produces these via floor division; remainder pixels on
/// the right/bottom edge of an image are excluded rather than distributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Region {
    /// Creates a region from corner coordinates.
    pub fn new(min_x: u32, min_y: u32, max_x: u32, max_y: u32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Returns the full bounds of an image.
    pub fn of_image(img: &RgbaImage) -> Self {
        Self::new(0, 0, img.width(), img.height())
    }

    /// Region width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.max_x.saturating_sub(self.min_x)
    }

    /// Region height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.max_y.saturating_sub(self.min_y)
    }

    /// Returns true if the region covers no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Grows the region by `dx`/`dy` pixels on each side, clamped to `bounds`.
    ///
    /// Used to blend color samples across cell boundaries during downsampling.
    pub fn expand_within(&self, dx: u32, dy: u32, bounds: &Region) -> Region {
        Region {
            min_x: self.min_x.saturating_sub(dx).max(bounds.min_x),
            min_y: self.min_y.saturating_sub(dy).max(bounds.min_y),
            max_x: self.max_x.saturating_add(dx).min(bounds.max_x),
            max_y: self.max_y.saturating_add(dy).min(bounds.max_y),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{} {}x{}]",
            self.min_x,
            self.min_y,
            self.width(),
            self.height()
        )
    }
}

/// Computes the average color of a region of an image.
///
/// `density` is the fraction of pixels sampled, in `(0, 1]`; values outside
/// that range sample every pixel. The per-axis stride is
/// `max(1, round(size * (1 - density)))`, so `density = 1` visits every
/// pixel and lower densities skip proportionally more.
///
/// Channels are widened to alpha-premultiplied 16-bit depth
/// (`v * 257 * a / 255` per pixel), accumulated in `u64` to avoid overflow
/// across large regions, divided by the sample count, and narrowed back by
/// keeping the low byte. The narrow is the identity for uniform opaque
/// regions (`257 * v = v mod 256`); transparent pixels contribute nothing.
/// The result is always opaque.
///
/// An empty region yields opaque black.
pub fn average_color(img: &RgbaImage, region: Region, density: f64) -> Rgba<u8> {
    let density = if density <= 0.0 || density > 1.0 {
        1.0
    } else {
        density
    };
    let skip = 1.0 - density;
    let step_x = ((region.width() as f64 * skip).round() as u32).max(1);
    let step_y = ((region.height() as f64 * skip).round() as u32).max(1);

    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    let mut count = 0u64;
    let mut y = region.min_y;
    while y < region.max_y {
        let mut x = region.min_x;
        while x < region.max_x {
            let px = img.get_pixel(x, y);
            let a = px[3] as u64;
            r += px[0] as u64 * 257 * a / 255;
            g += px[1] as u64 * 257 * a / 255;
            b += px[2] as u64 * 257 * a / 255;
            count += 1;
            x += step_x;
        }
        y += step_y;
    }
    if count == 0 {
        return Rgba([0, 0, 0, 255]);
    }
    Rgba([
        (r / count) as u8,
        (g / count) as u8,
        (b / count) as u8,
        255,
    ])
}
