//! Final composition: one palette image per quantized cell.

use super::{dither, downsample};
use crate::palette::Palette;
use image::RgbaImage;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that abort a mosaic composition.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// The palette's color table holds no entries, so nothing can be
    /// quantized against it.
    #[error("palette has no colors")]
    EmptyColorTable,

    /// The requested grid has zero cells.
    #[error("grid must have at least one cell, got {w}x{h}")]
    EmptyGrid { w: u32, h: u32 },
}

/// Composes a mosaic of `target` as a `w` by `h` grid of palette images.
///
/// The target is downsampled to one color per cell, dithered against the
/// palette's color table, and each quantized cell is filled by copying the
/// candidate image returned by [`Palette::at_color`] - a direct overwrite,
/// no blending. Cells for which the palette has no image are left
/// transparent; a sparse palette produces a sparse mosaic, not an error.
///
/// The output raster is `(w * cell_w) x (h * cell_h)` pixels.
pub fn compose(
    target: &RgbaImage,
    w: u32,
    h: u32,
    density: f64,
    blend_radius: f64,
    palette: &mut Palette,
) -> Result<RgbaImage, MosaicError> {
    if w == 0 || h == 0 {
        return Err(MosaicError::EmptyGrid { w, h });
    }
    if palette.color_table().is_empty() {
        return Err(MosaicError::EmptyColorTable);
    }

    let down = downsample(target, w, h, density, blend_radius);
    let quantized = dither(&down, palette.color_table());

    let (cell_w, cell_h) = palette.cell_size();
    let mut out = RgbaImage::new(w * cell_w, h * cell_h);
    let mut missing = 0usize;

    for y in 0..h {
        for x in 0..w {
            let color = *quantized.get_pixel(x, y);
            match palette.at_color(color) {
                Some(cell) => place_cell(&mut out, &cell, x * cell_w, y * cell_h, cell_w, cell_h),
                None => missing += 1,
            }
        }
    }

    if missing > 0 {
        warn!(missing, total = w * h, "cells left blank: no palette image");
    }
    debug!(
        width = out.width(),
        height = out.height(),
        cells = w * h,
        "mosaic composed"
    );
    Ok(out)
}

/// Copies `cell` into the output at the given offset, clipped to the cell
/// bounds. Smaller candidates leave the remainder of the cell untouched.
fn place_cell(
    out: &mut RgbaImage,
    cell: &RgbaImage,
    x_offset: u32,
    y_offset: u32,
    cell_w: u32,
    cell_h: u32,
) {
    let copy_w = cell.width().min(cell_w);
    let copy_h = cell.height().min(cell_h);
    for y in 0..copy_h {
        for x in 0..copy_w {
            out.put_pixel(x_offset + x, y_offset + y, *cell.get_pixel(x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ColorTable;
    use image::Rgba;

    #[test]
    fn test_compose_output_dimensions() {
        let target = RgbaImage::from_pixel(500, 500, Rgba([255, 255, 255, 255]));
        let mut palette = Palette::solid(ColorTable::web_safe(), 10, 10);
        let out = compose(&target, 10, 10, 0.5, 0.5, &mut palette).unwrap();
        assert_eq!(out.width(), 100);
        assert_eq!(out.height(), 100);
    }

    #[test]
    fn test_compose_solid_palette_fills_every_cell() {
        let target = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
        let mut palette = Palette::solid(ColorTable::web_safe(), 5, 5);
        let out = compose(&target, 4, 4, 1.0, 0.0, &mut palette).unwrap();
        // White is a web-safe entry, so every cell is fully white and opaque.
        for px in out.pixels() {
            assert_eq!(*px, Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_compose_single_bucket_covers_every_cell() {
        let target = RgbaImage::from_pixel(100, 100, Rgba([200, 200, 200, 255]));
        let mut palette = Palette::with_capacity(1, 5, 5);
        palette.add(RgbaImage::from_pixel(5, 5, Rgba([0, 0, 0, 255])));
        let out = compose(&target, 2, 2, 1.0, 0.0, &mut palette).unwrap();
        assert_eq!(out.width(), 10);
        assert_eq!(out.height(), 10);
        for px in out.pixels() {
            assert_eq!(*px, Rgba([0, 0, 0, 255]));
        }
    }

    #[test]
    fn test_compose_empty_palette_is_an_error() {
        let target = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let mut palette = Palette::with_capacity(4, 5, 5);
        let err = compose(&target, 2, 2, 1.0, 0.0, &mut palette).unwrap_err();
        assert!(matches!(err, MosaicError::EmptyColorTable));
    }

    #[test]
    fn test_compose_zero_grid_is_an_error() {
        let target = RgbaImage::from_pixel(10, 10, Rgba([1, 2, 3, 255]));
        let mut palette = Palette::solid(ColorTable::web_safe(), 5, 5);
        let err = compose(&target, 0, 2, 1.0, 0.0, &mut palette).unwrap_err();
        assert!(matches!(err, MosaicError::EmptyGrid { .. }));
    }

    #[test]
    fn test_compose_undersized_candidates_are_clipped_not_stretched() {
        let target = RgbaImage::from_pixel(100, 100, Rgba([0, 0, 0, 255]));
        let mut palette = Palette::with_capacity(1, 10, 10);
        // 4x4 candidate in 10x10 cells: the remainder stays transparent.
        palette.add(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])));
        let out = compose(&target, 2, 2, 1.0, 0.0, &mut palette).unwrap();
        assert_eq!(*out.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*out.get_pixel(5, 5), Rgba([0, 0, 0, 0]));
    }
}
