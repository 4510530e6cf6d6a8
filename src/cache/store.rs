//! Cache trait definition for dependency injection.

use crate::cache::types::{CacheError, CacheKey};
use image::RgbaImage;

/// Blob store abstraction for candidate images.
///
/// Enables different storage strategies (in-memory, on-disk) to be used
/// interchangeably by the inventory and job registry. Implementations must
/// persist images losslessly enough that average-color computation is stable
/// across repeated `get` calls for the same key.
pub trait ImageCache: Send + Sync {
    /// Stores an image under `key`, replacing any previous entry.
    fn put(&self, key: &CacheKey, image: &RgbaImage) -> Result<(), CacheError>;

    /// Retrieves the image stored under `key`.
    fn get(&self, key: &CacheKey) -> Result<RgbaImage, CacheError>;

    /// Returns true if an entry exists under `key`.
    fn contains(&self, key: &CacheKey) -> bool;

    /// Returns all stored keys, unordered.
    fn keys(&self) -> Vec<CacheKey>;

    /// Number of stored entries.
    fn len(&self) -> usize;

    /// Returns true if the cache holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
