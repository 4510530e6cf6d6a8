//! Mosaix - photomosaic composition service
//!
//! This library turns a target photograph into a photomosaic: a grid of small
//! candidate images, each chosen so its average color approximates the
//! corresponding region of the target, reassembled into one composite raster.
//!
//! # High-Level API
//!
//! For most use cases, the [`service`] module provides a simplified facade:
//!
//! ```ignore
//! use mosaix::service::{MosaicService, ServiceConfig};
//!
//! let service = MosaicService::new(source, http, thumbs, results, ServiceConfig::default());
//!
//! // Fetching and composition run in the background; the call returns at once.
//! let job_id = service.create_job("cats", target_image);
//! ```
//!
//! The pipeline flows fetch coordinator -> inventory -> palette -> downsample
//! -> dither -> compose -> job registry. See the module docs for each stage.

pub mod cache;
pub mod color;
pub mod inventory;
pub mod jobs;
pub mod logging;
pub mod mosaic;
pub mod palette;
pub mod provider;
pub mod service;

/// Version of the Mosaix library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
