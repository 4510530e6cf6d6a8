//! Image inventory: paginated fetch, dedup, and palette population.
//!
//! The inventory drives candidate acquisition. [`ImageInventory::fetch`]
//! walks a media source's pages for a tag, deduplicating by cache key so
//! nothing is downloaded twice, until a per-tag cap is reached or the pages
//! run out. Cached images later feed [`ImageInventory::populate_palette`].
//!
//! Failure handling follows the two-tier taxonomy: a single thumbnail that
//! fails to download or decode is skipped and logged; a pagination failure
//! aborts the whole fetch.

mod coordinator;

pub use coordinator::{CompletionSignal, FetchCoordinator};

use crate::cache::{CacheError, CacheKey, ImageCache};
use crate::palette::Palette;
use crate::provider::{AsyncHttpClient, MediaSource, ProviderError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort an inventory operation.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// A page request failed; the fetch cannot continue.
    #[error("pagination failed: {0}")]
    Pagination(#[from] ProviderError),

    /// Persisting a fetched image failed.
    #[error("cache write failed: {0}")]
    Cache(#[from] CacheError),
}

/// Per-tag bookkeeping: the keys seen for the tag.
///
/// The key set only grows, which is what enforces the fetch cap across
/// repeated fetches for the same tag.
#[derive(Debug, Default)]
struct TagEntry {
    keys: HashSet<CacheKey>,
}

/// Deduplicating cache of candidate images, populated from a media source.
pub struct ImageInventory<S, C> {
    source: S,
    http: C,
    cache: Arc<dyn ImageCache>,
    tags: Mutex<HashMap<String, TagEntry>>,
}

impl<S, C> ImageInventory<S, C>
where
    S: MediaSource,
    C: AsyncHttpClient,
{
    /// Creates an inventory over the given source, HTTP client, and cache.
    pub fn new(source: S, http: C, cache: Arc<dyn ImageCache>) -> Self {
        Self {
            source,
            http,
            cache,
            tags: Mutex::new(HashMap::new()),
        }
    }

    /// Number of cached images recorded for `tag`.
    pub fn count(&self, tag: &str) -> usize {
        let tags = self.tags.lock().unwrap();
        tags.get(tag).map_or(0, |e| e.keys.len())
    }

    /// Map of tag to cached image count, for the service boundary.
    pub fn counts(&self) -> HashMap<String, usize> {
        let tags = self.tags.lock().unwrap();
        tags.iter()
            .map(|(tag, e)| (tag.clone(), e.keys.len()))
            .collect()
    }

    /// Records `key` under `tag`. Returns false if it was already recorded.
    fn record(&self, tag: &str, key: &CacheKey) -> bool {
        let mut tags = self.tags.lock().unwrap();
        tags.entry(tag.to_string())
            .or_default()
            .keys
            .insert(key.clone())
    }

    /// Keys recorded for `tag`, unordered.
    fn keys_for(&self, tag: &str) -> Vec<CacheKey> {
        let tags = self.tags.lock().unwrap();
        tags.get(tag)
            .map(|e| e.keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Fetches new images for `tag` until `max` are cached.
    ///
    /// Pages are walked in cursor order starting with no cursor. Items whose
    /// key is already cached are counted without re-downloading, so repeated
    /// fetches are idempotent. A per-item download or decode failure skips
    /// that item; a page-level error aborts and propagates. Returns the
    /// number of images cached for the tag.
    pub async fn fetch(&self, tag: &str, max: usize) -> Result<usize, InventoryError> {
        let mut cursor = String::new();
        loop {
            let page = self.source.page(tag, &cursor).await?;
            for item in &page.items {
                if self.count(tag) >= max {
                    info!(tag, cached = self.count(tag), "fetch reached cap");
                    return Ok(self.count(tag));
                }
                self.cache_item(tag, &item.thumbnail_url).await?;
            }
            debug!(tag, cached = self.count(tag), max, "fetched page");
            if page.is_last() {
                break;
            }
            cursor = page.next_cursor;
        }
        info!(tag, cached = self.count(tag), "fetch exhausted source");
        Ok(self.count(tag))
    }

    /// Downloads, decodes, and caches one thumbnail.
    ///
    /// Already-cached items are recorded without a download. Download and
    /// decode failures are transient per-item errors: logged and swallowed.
    /// Only a cache write failure propagates.
    async fn cache_item(&self, tag: &str, url: &str) -> Result<(), InventoryError> {
        let key = CacheKey::of(url);
        if self.cache.contains(&key) {
            self.record(tag, &key);
            return Ok(());
        }
        let bytes = match self.http.get(url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(tag, url, error = %e, "thumbnail download failed, skipping");
                return Ok(());
            }
        };
        let img = match image::load_from_memory(&bytes) {
            Ok(img) => img.to_rgba8(),
            Err(e) => {
                warn!(tag, url, error = %e, "thumbnail decode failed, skipping");
                return Ok(());
            }
        };
        self.cache.put(&key, &img)?;
        self.record(tag, &key);
        Ok(())
    }

    /// Adds every cached image for `tag` to `palette`.
    ///
    /// Entries that fail to read back are skipped, not fatal.
    pub fn populate_palette(&self, tag: &str, palette: &mut Palette) {
        for key in self.keys_for(tag) {
            match self.cache.get(&key) {
                Ok(img) => palette.add(img),
                Err(e) => {
                    warn!(tag, key = %key, error = %e, "cached image unreadable, skipping");
                }
            }
        }
    }
}
