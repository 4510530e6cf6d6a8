//! Mosaic generation configuration.

const DEFAULT_GRID_UNITS: u32 = 40;
const DEFAULT_CELL_WIDTH: u32 = 150;
const DEFAULT_CELL_HEIGHT: u32 = 150;
const DEFAULT_PALETTE_CAPACITY: usize = 256;
const DEFAULT_IMAGES_PER_TAG: usize = 400;
const DEFAULT_SAMPLE_DENSITY: f64 = 0.5;
const DEFAULT_BLEND_RADIUS: f64 = 0.5;

/// Configuration for the mosaic service.
///
/// Groups the tiling, palette, and sampling parameters with sensible
/// defaults, allowing per-deployment customization.
///
/// # Example
///
/// ```
/// use mosaix::service::ServiceConfig;
///
/// let config = ServiceConfig::default();
/// assert_eq!(config.grid_units(), 40);
/// assert_eq!(config.cell_width(), 150);
///
/// let config = ServiceConfig::new()
///     .with_grid_units(20)
///     .with_cell_size(64, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceConfig {
    /// Cells per axis in the output grid
    grid_units: u32,
    /// Width of each palette cell in pixels
    cell_width: u32,
    /// Height of each palette cell in pixels
    cell_height: u32,
    /// Maximum distinct colors (buckets) in a palette
    palette_capacity: usize,
    /// Fetch cap per tag
    images_per_tag: usize,
    /// Fraction of pixels sampled when averaging (0, 1]
    sample_density: f64,
    /// Fraction of neighboring cell width blended into each sample
    blend_radius: f64,
}

impl ServiceConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of cells per axis in the output grid.
    ///
    /// The target image is divided into `units × units` cells. Default: 40.
    pub fn with_grid_units(mut self, units: u32) -> Self {
        self.grid_units = units;
        self
    }

    /// Set the pixel size of each palette cell. Default: 150×150.
    pub fn with_cell_size(mut self, width: u32, height: u32) -> Self {
        self.cell_width = width;
        self.cell_height = height;
        self
    }

    /// Set the maximum number of distinct colors in a palette. Default: 256.
    pub fn with_palette_capacity(mut self, capacity: usize) -> Self {
        self.palette_capacity = capacity;
        self
    }

    /// Set the per-tag fetch cap. Default: 400.
    pub fn with_images_per_tag(mut self, max: usize) -> Self {
        self.images_per_tag = max;
        self
    }

    /// Set the sampling density used when averaging colors. Default: 0.5.
    pub fn with_sample_density(mut self, density: f64) -> Self {
        self.sample_density = density;
        self
    }

    /// Set the blend radius used when downsampling. Default: 0.5.
    pub fn with_blend_radius(mut self, radius: f64) -> Self {
        self.blend_radius = radius;
        self
    }

    pub fn grid_units(&self) -> u32 {
        self.grid_units
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn palette_capacity(&self) -> usize {
        self.palette_capacity
    }

    pub fn images_per_tag(&self) -> usize {
        self.images_per_tag
    }

    pub fn sample_density(&self) -> f64 {
        self.sample_density
    }

    pub fn blend_radius(&self) -> f64 {
        self.blend_radius
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            grid_units: DEFAULT_GRID_UNITS,
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            palette_capacity: DEFAULT_PALETTE_CAPACITY,
            images_per_tag: DEFAULT_IMAGES_PER_TAG,
            sample_density: DEFAULT_SAMPLE_DENSITY,
            blend_radius: DEFAULT_BLEND_RADIUS,
        }
    }
}
