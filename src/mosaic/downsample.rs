//! Target-image downsampling: one color sample per output grid cell.

use super::grid::PixelGrid;
use crate::color::{average_color, Region};
use image::RgbaImage;
use tracing::trace;

/// Reduces `img` to a `w` by `h` image, one averaged color per grid cell.
///
/// `density` is the sampling density passed through to
/// [`average_color`](crate::color::average_color). `blend_radius` is the
/// fraction of a cell's size by which each sample rectangle grows on every
/// side (clamped to the source bounds); blending across cell boundaries
/// softens block artifacts in the final mosaic.
pub fn downsample(img: &RgbaImage, w: u32, h: u32, density: f64, blend_radius: f64) -> RgbaImage {
    let grid = PixelGrid::new(w, h);
    let bounds = Region::of_image(img);
    let (px, py) = grid.cell_size(img.width(), img.height());
    let blend_x = (px as f64 * blend_radius) as u32;
    let blend_y = (py as f64 * blend_radius) as u32;

    let mut out = RgbaImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let rect = grid
                .cell_rect(img.width(), img.height(), x, y)
                .expand_within(blend_x, blend_y, &bounds);
            let color = average_color(img, rect, density);
            trace!(x, y, rect = %rect, "sampled cell");
            out.put_pixel(x, y, color);
        }
    }
    out
}
