//! Service facade: tags in, mosaic jobs out.
//!
//! The service ties the pipeline together for an HTTP or CLI collaborator:
//!
//! ```text
//! add_tag ──► FetchCoordinator ──► ImageInventory ──► ImageCache
//!                     │
//! create_job ──► JobRegistry ──► [wait for tag] ──► Palette ──► compose
//!                                                                  │
//! get_job / job_result ◄── results cache ◄────────────────────────┘
//! ```
//!
//! `create_job` returns immediately; generation runs as a background task
//! that waits for the tag's fetch, builds the palette, and composes the
//! mosaic on a blocking thread. Wire encoding and routing stay with the
//! caller.

mod config;

pub use config::ServiceConfig;

use crate::cache::ImageCache;
use crate::inventory::{CompletionSignal, FetchCoordinator, ImageInventory};
use crate::jobs::{JobId, JobRecord, JobRegistry, JobStatus};
use crate::mosaic::compose;
use crate::palette::Palette;
use crate::provider::{AsyncHttpClient, MediaSource};
use image::RgbaImage;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Boundary view of one job, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub tag: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobSummary {
    fn of(record: &JobRecord) -> Self {
        Self {
            id: record.id,
            tag: record.tag.clone(),
            status: record.status().as_str(),
            error: record.error(),
        }
    }
}

/// Orchestrates fetching, palette building, and mosaic generation.
pub struct MosaicService<S, C> {
    config: ServiceConfig,
    inventory: Arc<ImageInventory<S, C>>,
    coordinator: FetchCoordinator<S, C>,
    registry: Arc<JobRegistry>,
}

impl<S, C> MosaicService<S, C>
where
    S: MediaSource + 'static,
    C: AsyncHttpClient + 'static,
{
    /// Creates a service over the given source and caches.
    ///
    /// `images` holds fetched thumbnails; `results` holds finished mosaics.
    pub fn new(
        source: S,
        http: C,
        images: Arc<dyn ImageCache>,
        results: Arc<dyn ImageCache>,
        config: ServiceConfig,
    ) -> Self {
        let inventory = Arc::new(ImageInventory::new(source, http, images));
        let coordinator = FetchCoordinator::new(Arc::clone(&inventory), config.images_per_tag());
        Self {
            config,
            inventory,
            coordinator,
            registry: Arc::new(JobRegistry::new(results)),
        }
    }

    /// Starts (at most once) the fetch for `tag` and returns its signal.
    pub fn add_tag(&self, tag: &str) -> CompletionSignal {
        self.coordinator.add_tag(tag)
    }

    /// Creates a mosaic job for `target` from `tag`'s images.
    ///
    /// Registers the tag if it is not already registered, so a bare
    /// `create_job` is enough to drive the whole pipeline. Returns the job
    /// id immediately; progress is observable through [`Self::get_job`].
    pub fn create_job(&self, tag: &str, target: RgbaImage) -> JobId {
        let record = self.registry.create(tag);
        let signal = self.coordinator.add_tag(tag);

        let id = record.id;
        let inventory = Arc::clone(&self.inventory);
        let registry = Arc::clone(&self.registry);
        let config = self.config;
        let tag = tag.to_string();
        tokio::spawn(async move {
            signal.wait().await;

            let generated = tokio::task::spawn_blocking(move || {
                generate(&inventory, &tag, &target, &config, &record)
            })
            .await;

            match generated {
                Ok(Ok(mosaic)) => match registry.store_result(id, &mosaic) {
                    Ok(()) => info!(job_id = %id, "mosaic created"),
                    Err(e) => {
                        error!(job_id = %id, error = %e, "storing mosaic failed");
                        registry.mark_failed(id, &format!("storing mosaic failed: {}", e));
                    }
                },
                Ok(Err(reason)) => {
                    error!(job_id = %id, reason, "mosaic generation failed");
                    registry.mark_failed(id, &reason);
                }
                Err(e) => {
                    error!(job_id = %id, error = %e, "generation task aborted");
                    registry.mark_failed(id, "generation task aborted");
                }
            }
        });

        id
    }

    /// Boundary view of one job.
    pub fn get_job(&self, id: JobId) -> Option<JobSummary> {
        self.registry.get(id).map(|r| JobSummary::of(&r))
    }

    /// The finished mosaic, once the job reaches `Created`.
    pub fn job_result(&self, id: JobId) -> Option<RgbaImage> {
        self.registry.result(id)
    }

    /// All jobs in creation order.
    pub fn list_jobs(&self) -> Vec<JobSummary> {
        self.registry
            .list()
            .iter()
            .map(|r| JobSummary::of(r))
            .collect()
    }

    /// Cached image counts per tag.
    pub fn inventory_counts(&self) -> HashMap<String, usize> {
        self.inventory.counts()
    }
}

/// Builds the tag's palette and composes the mosaic. CPU-bound; runs on a
/// blocking thread.
///
/// The job only enters `Working` once the palette holds at least one image,
/// so a tag with nothing to offer fails straight from `New`.
fn generate<S, C>(
    inventory: &ImageInventory<S, C>,
    tag: &str,
    target: &RgbaImage,
    config: &ServiceConfig,
    record: &JobRecord,
) -> Result<RgbaImage, String>
where
    S: MediaSource,
    C: AsyncHttpClient,
{
    let mut palette = Palette::with_capacity(
        config.palette_capacity(),
        config.cell_width(),
        config.cell_height(),
    );
    inventory.populate_palette(tag, &mut palette);
    if palette.num_images() == 0 {
        return Err("no images available".to_string());
    }
    record.advance(JobStatus::Working);
    info!(
        tag,
        colors = palette.size(),
        images = palette.num_images(),
        "palette built"
    );

    compose(
        target,
        config.grid_units(),
        config.grid_units(),
        config.sample_density(),
        config.blend_radius(),
        &mut palette,
    )
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryImageCache;
    use crate::provider::{MediaItem, MediaPage, ProviderError};
    use image::Rgba;
    use std::time::Duration;

    /// One page of canned thumbnail URLs; empty when `urls` is empty.
    struct FixedSource {
        urls: Vec<String>,
    }

    impl MediaSource for FixedSource {
        async fn page(&self, _tag: &str, _cursor: &str) -> Result<MediaPage, ProviderError> {
            Ok(MediaPage {
                items: self
                    .urls
                    .iter()
                    .map(|u| MediaItem {
                        thumbnail_url: u.clone(),
                        width: 8,
                        height: 8,
                    })
                    .collect(),
                next_cursor: String::new(),
            })
        }
    }

    /// Serves a gray PNG for every URL.
    struct GrayHttp;

    impl AsyncHttpClient for GrayHttp {
        async fn get(&self, _url: &str) -> Result<Vec<u8>, ProviderError> {
            let img = RgbaImage::from_pixel(8, 8, Rgba([120, 120, 120, 255]));
            let mut buf = Vec::new();
            img.write_to(
                &mut std::io::Cursor::new(&mut buf),
                image::ImageFormat::Png,
            )
            .unwrap();
            Ok(buf)
        }
    }

    fn service(urls: &[&str]) -> MosaicService<FixedSource, GrayHttp> {
        MosaicService::new(
            FixedSource {
                urls: urls.iter().map(|u| u.to_string()).collect(),
            },
            GrayHttp,
            Arc::new(MemoryImageCache::new()),
            Arc::new(MemoryImageCache::new()),
            ServiceConfig::new()
                .with_grid_units(5)
                .with_cell_size(8, 8)
                .with_images_per_tag(10),
        )
    }

    async fn wait_terminal(svc: &MosaicService<FixedSource, GrayHttp>, id: JobId) -> JobSummary {
        for _ in 0..400 {
            let summary = svc.get_job(id).unwrap();
            if summary.status == "created" || summary.status == "failed" {
                return summary;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {} never reached a terminal status", id);
    }

    #[tokio::test]
    async fn test_job_reaches_created_with_result() {
        let svc = service(&["/1", "/2"]);
        let target = RgbaImage::from_pixel(50, 50, Rgba([120, 120, 120, 255]));

        let id = svc.create_job("cats", target);
        let summary = wait_terminal(&svc, id).await;
        assert_eq!(summary.status, "created");
        assert!(summary.error.is_none());

        // 5x5 grid of 8x8 cells.
        let mosaic = svc.job_result(id).unwrap();
        assert_eq!(mosaic.dimensions(), (40, 40));
    }

    #[tokio::test]
    async fn test_job_fails_without_images() {
        let svc = service(&[]);
        let target = RgbaImage::from_pixel(50, 50, Rgba([0, 0, 0, 255]));

        let id = svc.create_job("empty", target);
        let summary = wait_terminal(&svc, id).await;
        assert_eq!(summary.status, "failed");
        assert_eq!(summary.error.as_deref(), Some("no images available"));
        assert!(svc.job_result(id).is_none());
    }

    #[tokio::test]
    async fn test_job_without_images_never_enters_working() {
        let svc = service(&[]);
        let id = svc.create_job("empty", RgbaImage::new(20, 20));

        // Working is only reached after the palette has images, so every
        // observable status for this job is new or failed.
        let mut seen = Vec::new();
        for _ in 0..400 {
            let status = svc.get_job(id).unwrap().status;
            if !seen.last().is_some_and(|s| *s == status) {
                seen.push(status);
            }
            if status == "failed" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(seen.last().copied(), Some("failed"));
        assert!(!seen.contains(&"working"), "observed statuses: {:?}", seen);
    }

    #[tokio::test]
    async fn test_list_jobs_in_creation_order() {
        let svc = service(&["/1"]);
        let a = svc.create_job("cats", RgbaImage::new(10, 10));
        let b = svc.create_job("cats", RgbaImage::new(10, 10));

        let listed: Vec<_> = svc.list_jobs().iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![a, b]);

        wait_terminal(&svc, a).await;
        wait_terminal(&svc, b).await;
    }

    #[tokio::test]
    async fn test_inventory_counts_after_fetch() {
        let svc = service(&["/1", "/2"]);
        svc.add_tag("cats").wait().await;
        assert_eq!(svc.inventory_counts().get("cats"), Some(&2));
    }
}
