//! Fetch coordination: at most one in-flight fetch per tag.
//!
//! Requests for the same tag arrive from many callers at once; only the
//! first should start a fetch. The coordinator registers a completion signal
//! per tag under a mutex, spawns the fetch as a background task, and hands
//! every caller the same signal:
//!
//! ```text
//! add_tag("cats") A ─┐
//!                    │
//! add_tag("cats") B ─┼──► FetchCoordinator ──► one fetch task
//!                    │         │                    │
//! add_tag("cats") C ─┘         ▼                    │
//!                       [A, B, C wait on ◄──────────┘
//!                        one CompletionSignal]
//! ```
//!
//! A tag stays registered after its fetch completes, so a later `add_tag`
//! returns an already-fired signal instead of fetching again; waiting on it
//! returns immediately.

use super::ImageInventory;
use crate::provider::{AsyncHttpClient, MediaSource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, error, info};

/// A single-fire broadcast: fired once, observable forever after.
///
/// Built on a watch channel so that waiters arriving after the fire see the
/// final state immediately (closed-channel semantics).
#[derive(Debug, Clone)]
pub struct CompletionSignal {
    rx: watch::Receiver<bool>,
}

impl CompletionSignal {
    /// Creates an unfired signal and the sender that fires it.
    fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// Returns true once the signal has fired.
    pub fn is_complete(&self) -> bool {
        *self.rx.borrow()
    }

    /// Waits until the signal fires. Returns immediately if it already has.
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow_and_update() {
            // A dropped sender without a fire means the fetch task died;
            // treat that as completion rather than waiting forever.
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

/// Ensures at most one fetch per tag is ever started.
pub struct FetchCoordinator<S, C> {
    inventory: Arc<ImageInventory<S, C>>,
    images_per_tag: usize,
    tags: Mutex<HashMap<String, CompletionSignal>>,
}

impl<S, C> FetchCoordinator<S, C>
where
    S: MediaSource + 'static,
    C: AsyncHttpClient + 'static,
{
    /// Creates a coordinator fetching up to `images_per_tag` per tag.
    pub fn new(inventory: Arc<ImageInventory<S, C>>, images_per_tag: usize) -> Self {
        Self {
            inventory,
            images_per_tag,
            tags: Mutex::new(HashMap::new()),
        }
    }

    /// Registers `tag` and returns its completion signal.
    ///
    /// The first call for a tag spawns the fetch as a background task and
    /// fires the signal when it finishes, success or failure. Every
    /// subsequent call, concurrent or later, returns the same signal.
    pub fn add_tag(&self, tag: &str) -> CompletionSignal {
        let mut tags = self.tags.lock().unwrap();
        if let Some(signal) = tags.get(tag) {
            debug!(tag, "fetch already registered");
            return signal.clone();
        }

        info!(tag, "beginning fetch");
        let (tx, signal) = CompletionSignal::channel();
        tags.insert(tag.to_string(), signal.clone());

        let inventory = Arc::clone(&self.inventory);
        let tag = tag.to_string();
        let max = self.images_per_tag;
        tokio::spawn(async move {
            match inventory.fetch(&tag, max).await {
                Ok(count) => info!(tag, count, "fetch complete"),
                Err(e) => error!(tag, error = %e, "fetch failed"),
            }
            let _ = tx.send(true);
        });

        signal
    }

    /// Number of tags ever registered.
    pub fn tag_count(&self) -> usize {
        self.tags.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryImageCache;
    use crate::provider::{MediaItem, MediaPage, ProviderError};
    use image::{Rgba, RgbaImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// One slow page per tag; counts how many page fetches ever start.
    struct SlowSource {
        pages_served: AtomicUsize,
    }

    impl MediaSource for SlowSource {
        async fn page(&self, _tag: &str, _cursor: &str) -> Result<MediaPage, ProviderError> {
            self.pages_served.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(MediaPage {
                items: vec![MediaItem {
                    thumbnail_url: "/thumb".into(),
                    width: 4,
                    height: 4,
                }],
                next_cursor: String::new(),
            })
        }
    }

    struct PngHttp;

    impl AsyncHttpClient for PngHttp {
        async fn get(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            let img = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
            let mut buf = Vec::new();
            img.write_to(
                &mut std::io::Cursor::new(&mut buf),
                image::ImageFormat::Png,
            )
            .unwrap();
            Ok(buf)
        }
    }

    fn coordinator() -> Arc<FetchCoordinator<SlowSource, PngHttp>> {
        let inventory = Arc::new(ImageInventory::new(
            SlowSource {
                pages_served: AtomicUsize::new(0),
            },
            PngHttp,
            Arc::new(MemoryImageCache::new()),
        ));
        Arc::new(FetchCoordinator::new(inventory, 10))
    }

    #[tokio::test]
    async fn test_concurrent_add_tag_runs_one_fetch() {
        let coord = coordinator();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let coord = Arc::clone(&coord);
                tokio::spawn(async move {
                    let signal = coord.add_tag("x");
                    signal.wait().await;
                })
            })
            .collect();
        for h in handles {
            h.await.unwrap();
        }

        // All eight callers waited on one underlying fetch.
        assert_eq!(coord.inventory.source.pages_served.load(Ordering::SeqCst), 1);
        assert_eq!(coord.inventory.count("x"), 1);
        assert_eq!(coord.tag_count(), 1);
    }

    #[tokio::test]
    async fn test_wait_completes_only_after_fetch() {
        let coord = coordinator();
        let signal = coord.add_tag("x");
        assert!(!signal.is_complete());

        signal.wait().await;
        assert!(signal.is_complete());
        assert_eq!(coord.inventory.count("x"), 1);
    }

    #[tokio::test]
    async fn test_add_tag_after_completion_returns_fired_signal() {
        let coord = coordinator();
        coord.add_tag("x").wait().await;

        // No second fetch; the signal is already fired.
        let signal = coord.add_tag("x");
        assert!(signal.is_complete());
        signal.wait().await;
        assert_eq!(coord.inventory.source.pages_served.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_tags_fetch_independently() {
        let coord = coordinator();
        let a = coord.add_tag("a");
        let b = coord.add_tag("b");
        a.wait().await;
        b.wait().await;
        assert_eq!(coord.inventory.source.pages_served.load(Ordering::SeqCst), 2);
        assert_eq!(coord.tag_count(), 2);
    }
}
