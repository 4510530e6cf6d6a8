//! Grid tiling math.

use crate::color::Region;

/// A `units_x` by `units_y` grid of cells laid over an image.
///
/// Cell sizes come from floor division of the image dimensions; remainder
/// pixels on the right and bottom edges are excluded from cell bounds rather
/// than distributed across cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelGrid {
    pub units_x: u32,
    pub units_y: u32,
}

impl PixelGrid {
    /// Creates a grid of `units_x` by `units_y` cells.
    pub fn new(units_x: u32, units_y: u32) -> Self {
        Self { units_x, units_y }
    }

    /// Pixel size of one cell for an image of the given dimensions.
    ///
    /// A grid finer than the image produces zero-sized cells.
    pub fn cell_size(&self, image_w: u32, image_h: u32) -> (u32, u32) {
        (
            image_w / self.units_x.max(1),
            image_h / self.units_y.max(1),
        )
    }

    /// Pixel rectangle of the cell at grid position `(x, y)`.
    pub fn cell_rect(&self, image_w: u32, image_h: u32, x: u32, y: u32) -> Region {
        let (px, py) = self.cell_size(image_w, image_h);
        Region::new(x * px, y * py, (x + 1) * px, (y + 1) * py)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_rects_tile_without_overlap() {
        // 2x3 grid over a 40x30 image: cells are 20x10.
        let grid = PixelGrid::new(2, 3);
        assert_eq!(grid.cell_size(40, 30), (20, 10));
        assert_eq!(grid.cell_rect(40, 30, 0, 0), Region::new(0, 0, 20, 10));
        assert_eq!(grid.cell_rect(40, 30, 1, 0), Region::new(20, 0, 40, 10));
        assert_eq!(grid.cell_rect(40, 30, 0, 2), Region::new(0, 20, 20, 30));
        assert_eq!(grid.cell_rect(40, 30, 1, 2), Region::new(20, 20, 40, 30));
    }

    #[test]
    fn test_remainder_pixels_are_excluded() {
        // 43x31 with a 2x3 grid still yields 20x10 cells; the 3-pixel and
        // 1-pixel remainders fall outside every cell.
        let grid = PixelGrid::new(2, 3);
        assert_eq!(grid.cell_size(43, 31), (21, 10));
        assert_eq!(grid.cell_rect(43, 31, 1, 2), Region::new(21, 20, 42, 30));
    }

    #[test]
    fn test_grid_finer_than_image_is_empty_cells() {
        let grid = PixelGrid::new(100, 100);
        assert_eq!(grid.cell_size(10, 10), (0, 0));
        assert!(grid.cell_rect(10, 10, 3, 3).is_empty());
    }
}
