//! In-memory image cache.

use crate::cache::store::ImageCache;
use crate::cache::types::{CacheError, CacheKey};
use image::RgbaImage;
use std::collections::HashMap;
use std::sync::Mutex;

/// A `HashMap`-backed image cache.
///
/// Images are stored decoded. Suitable as the default store and for tests;
/// nothing is evicted or persisted.
#[derive(Debug, Default)]
pub struct MemoryImageCache {
    store: Mutex<HashMap<CacheKey, RgbaImage>>,
}

impl MemoryImageCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImageCache for MemoryImageCache {
    fn put(&self, key: &CacheKey, image: &RgbaImage) -> Result<(), CacheError> {
        let mut store = self.store.lock().unwrap();
        store.insert(key.clone(), image.clone());
        Ok(())
    }

    fn get(&self, key: &CacheKey) -> Result<RgbaImage, CacheError> {
        let store = self.store.lock().unwrap();
        store
            .get(key)
            .cloned()
            .ok_or_else(|| CacheError::Missing(key.clone()))
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.store.lock().unwrap().contains_key(key)
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.store.lock().unwrap().keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.store.lock().unwrap().len()
    }
}
