//! On-disk image cache.

use crate::cache::store::ImageCache;
use crate::cache::types::{CacheError, CacheKey};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::warn;

/// A filesystem-backed image cache: one PNG file per key.
///
/// Keys are recovered from filenames, so a cache directory survives process
/// restarts. PNG storage keeps the decoded pixels byte-stable across
/// repeated reads, which average-color computation depends on.
#[derive(Debug, Clone)]
pub struct DiskImageCache {
    root: PathBuf,
}

impl DiskImageCache {
    /// Opens a cache rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Filesystem path for a key.
    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.root.join(format!("{}.png", key))
    }

    /// Recovers the key from a cache file path.
    fn key_for(path: &Path) -> Option<CacheKey> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(CacheKey::from_raw)
    }
}

impl ImageCache for DiskImageCache {
    fn put(&self, key: &CacheKey, image: &RgbaImage) -> Result<(), CacheError> {
        image
            .save_with_format(self.path_for(key), ImageFormat::Png)
            .map_err(|e| CacheError::Encode(e.to_string()))
    }

    fn get(&self, key: &CacheKey) -> Result<RgbaImage, CacheError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(CacheError::Missing(key.clone()));
        }
        let img = image::open(&path).map_err(|e| CacheError::Decode(e.to_string()))?;
        Ok(img.to_rgba8())
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.path_for(key).exists()
    }

    fn keys(&self) -> Vec<CacheKey> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "cache directory unreadable");
                return Vec::new();
            }
        };
        entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .filter_map(|p| Self::key_for(&p))
            .collect()
    }

    fn len(&self) -> usize {
        self.keys().len()
    }
}
