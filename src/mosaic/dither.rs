//! Floyd-Steinberg error-diffusion quantization.

use crate::palette::ColorTable;
use image::{Rgba, RgbaImage};

/// Quantizes `img` onto `table` with Floyd-Steinberg error diffusion.
///
/// Pixels are processed in row-major order. Each pixel snaps to its nearest
/// table entry and the quantization error diffuses to the unprocessed
/// neighbors with the standard weights: 7/16 right, 3/16 below-left, 5/16
/// below, 1/16 below-right. Every output pixel is drawn from the table.
///
/// An empty table leaves the image untouched; callers guard against that
/// before composing.
pub fn dither(img: &RgbaImage, table: &ColorTable) -> RgbaImage {
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut out = RgbaImage::new(img.width(), img.height());
    if table.is_empty() {
        return img.clone();
    }

    // Working buffer carries fractional error between rows.
    let mut buf: Vec<[f32; 3]> = img
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();

    for y in 0..h {
        for x in 0..w {
            let old = buf[y * w + x];
            let clamped = Rgba([
                old[0].round().clamp(0.0, 255.0) as u8,
                old[1].round().clamp(0.0, 255.0) as u8,
                old[2].round().clamp(0.0, 255.0) as u8,
                255,
            ]);
            // Guarded non-empty above.
            let idx = table.nearest_index(clamped).unwrap_or(0);
            let new = table.get(idx).unwrap_or(clamped);
            out.put_pixel(x as u32, y as u32, new);

            let err = [
                old[0] - new[0] as f32,
                old[1] - new[1] as f32,
                old[2] - new[2] as f32,
            ];
            if x + 1 < w {
                diffuse(&mut buf[y * w + x + 1], err, 7.0 / 16.0);
            }
            if y + 1 < h {
                if x > 0 {
                    diffuse(&mut buf[(y + 1) * w + x - 1], err, 3.0 / 16.0);
                }
                diffuse(&mut buf[(y + 1) * w + x], err, 5.0 / 16.0);
                if x + 1 < w {
                    diffuse(&mut buf[(y + 1) * w + x + 1], err, 1.0 / 16.0);
                }
            }
        }
    }
    out
}

#[inline]
fn diffuse(px: &mut [f32; 3], err: [f32; 3], weight: f32) {
    px[0] += err[0] * weight;
    px[1] += err[1] * weight;
    px[2] += err[2] * weight;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dither_output_drawn_from_table() {
        let table = ColorTable::web_safe();
        let mut img = RgbaImage::new(16, 16);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 16) as u8, (y * 16) as u8, 77, 255]);
        }
        let out = dither(&img, &table);
        for px in out.pixels() {
            assert!(table.contains(*px), "pixel {:?} not in table", px);
        }
    }

    #[test]
    fn test_dither_exact_colors_pass_through() {
        let table = ColorTable::from_colors(vec![
            Rgba([0, 0, 0, 255]),
            Rgba([255, 255, 255, 255]),
        ]);
        let img = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        let out = dither(&img, &table);
        for px in out.pixels() {
            assert_eq!(*px, Rgba([255, 255, 255, 255]));
        }
    }

    #[test]
    fn test_dither_distributes_error() {
        // Mid-gray against a black/white table: diffusion alternates between
        // the two entries rather than collapsing to one.
        let table = ColorTable::from_colors(vec![
            Rgba([0, 0, 0, 255]),
            Rgba([255, 255, 255, 255]),
        ]);
        let img = RgbaImage::from_pixel(16, 16, Rgba([128, 128, 128, 255]));
        let out = dither(&img, &table);
        let whites = out
            .pixels()
            .filter(|p| **p == Rgba([255, 255, 255, 255]))
            .count();
        let blacks = out.pixels().filter(|p| **p == Rgba([0, 0, 0, 255])).count();
        assert_eq!(whites + blacks, 256);
        assert!(whites > 64, "want a mix, got {} whites", whites);
        assert!(blacks > 64, "want a mix, got {} blacks", blacks);
    }

    #[test]
    fn test_dither_empty_table_is_identity() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([9, 8, 7, 255]));
        let out = dither(&img, &ColorTable::default());
        assert_eq!(out, img);
    }
}
