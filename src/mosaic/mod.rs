//! Mosaic composition engine.
//!
//! Composition runs in three stages:
//!
//! ```text
//! target image ──► downsample ──► dither ──► compose ──► output raster
//!                  (one color     (quantize   (one palette
//!                   per cell)      to table)   image per cell)
//! ```
//!
//! [`downsample`] reduces the target to one color sample per output grid
//! cell, [`dither`] maps those samples onto a palette's color table with
//! Floyd-Steinberg error diffusion, and [`compose`] stitches a candidate
//! image into each cell of the full-resolution output.

mod compose;
mod dither;
mod downsample;
mod grid;

pub use compose::{compose, MosaicError};
pub use dither::dither;
pub use downsample::downsample;
pub use grid::PixelGrid;
