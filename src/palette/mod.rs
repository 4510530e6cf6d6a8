//! Image palette: a quantized color table plus, per color, a rotating pool
//! of candidate images.
//!
//! A palette comes in two variants:
//!
//! - **Image-backed** ([`Palette::with_capacity`]): candidate images are
//!   bucketed by their average color. The color table grows as images arrive,
//!   up to a fixed capacity; once full, new images land in their nearest
//!   existing bucket. Lookups rotate through each bucket round-robin so a
//!   mosaic does not repeat one candidate for every same-colored cell.
//! - **Solid-fallback** ([`Palette::solid`]): a fixed, pre-supplied color
//!   table with no buckets. Every lookup synthesizes a flat-color cell image.
//!   Useful before an inventory has supplied enough candidates.
//!
//! Bucket population is never rebalanced: if a tag's images cluster in one
//! color, that bucket grows large while others stay empty.

mod table;

pub use table::ColorTable;

use crate::color::{average_color, Region};
use image::{Rgba, RgbaImage};
use std::sync::Arc;

/// One color entry's pool of candidate images plus its rotation cursor.
#[derive(Debug, Default)]
struct Bucket {
    images: Vec<Arc<RgbaImage>>,
    cursor: usize,
}

impl Bucket {
    /// Returns the image at the cursor and advances it, wrapping to 0.
    fn next(&mut self) -> Option<Arc<RgbaImage>> {
        if self.images.is_empty() {
            return None;
        }
        let img = Arc::clone(&self.images[self.cursor]);
        self.cursor = (self.cursor + 1) % self.images.len();
        Some(img)
    }
}

/// A color table with candidate images attached to each entry.
///
/// Not safe for unsynchronized concurrent mutation; callers own the palette
/// for the duration of a single mosaic composition.
pub struct Palette {
    table: ColorTable,
    cell_w: u32,
    cell_h: u32,
    variant: Variant,
}

enum Variant {
    /// Buckets parallel to the table entries, capped at `capacity` colors.
    Images { capacity: usize, buckets: Vec<Bucket> },
    /// No buckets; lookups synthesize flat cells.
    Solid,
}

impl Palette {
    /// Creates an empty image-backed palette holding up to `capacity` colors.
    ///
    /// `cell_w`/`cell_h` is the pixel size of one output grid cell.
    pub fn with_capacity(capacity: usize, cell_w: u32, cell_h: u32) -> Self {
        Self {
            table: ColorTable::with_capacity(capacity),
            cell_w,
            cell_h,
            variant: Variant::Images {
                capacity,
                buckets: Vec::with_capacity(capacity),
            },
        }
    }

    /// Creates a solid-fallback palette over a fixed color table.
    pub fn solid(table: ColorTable, cell_w: u32, cell_h: u32) -> Self {
        Self {
            table,
            cell_w,
            cell_h,
            variant: Variant::Solid,
        }
    }

    /// The palette's color table, used to drive dithering.
    pub fn color_table(&self) -> &ColorTable {
        &self.table
    }

    /// The pixel size of one output cell.
    pub fn cell_size(&self) -> (u32, u32) {
        (self.cell_w, self.cell_h)
    }

    /// Adds a candidate image.
    ///
    /// The image's average color (sampled at full density) becomes a new
    /// table entry while the table is below capacity and the color is not
    /// already present. Either way the image is appended to the bucket whose
    /// color is nearest. Solid palettes ignore additions.
    pub fn add(&mut self, img: RgbaImage) {
        let Variant::Images { capacity, buckets } = &mut self.variant else {
            return;
        };
        let c = average_color(&img, Region::of_image(&img), 1.0);
        if self.table.len() < *capacity && !self.table.contains(c) {
            self.table.push(c);
            buckets.push(Bucket::default());
        }
        if let Some(i) = self.table.nearest_index(c) {
            buckets[i].images.push(Arc::new(img));
        }
    }

    /// Returns a candidate image for the bucket nearest to `color`.
    ///
    /// Image-backed palettes rotate through the bucket's pool; an empty
    /// bucket yields `None` and the caller skips the cell. Solid palettes
    /// synthesize a flat image of the nearest table entry.
    pub fn at_color(&mut self, color: Rgba<u8>) -> Option<Arc<RgbaImage>> {
        let i = self.table.nearest_index(color)?;
        match &mut self.variant {
            Variant::Images { buckets, .. } => buckets[i].next(),
            Variant::Solid => {
                let c = self.table.get(i)?;
                Some(Arc::new(RgbaImage::from_pixel(self.cell_w, self.cell_h, c)))
            }
        }
    }

    /// Number of populated color buckets (table entries).
    pub fn size(&self) -> usize {
        self.table.len()
    }

    /// Total candidate images across all buckets.
    pub fn num_images(&self) -> usize {
        match &self.variant {
            Variant::Images { buckets, .. } => buckets.iter().map(|b| b.images.len()).sum(),
            Variant::Solid => 0,
        }
    }
}
