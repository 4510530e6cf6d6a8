//! Candidate image cache.
//!
//! The cache is a key/value blob store for decoded images, keyed by a
//! content-derived [`CacheKey`]. The inventory deposits fetched thumbnails
//! here; palette construction and job results read them back. Concurrent
//! access to distinct keys needs no external locking; same-key write races
//! are excluded by the fetch coordinator's one-fetch-per-tag guarantee.

mod disk;
mod memory;
mod store;
mod types;

pub use disk::DiskImageCache;
pub use memory::MemoryImageCache;
pub use store::ImageCache;
pub use types::{CacheError, CacheKey};
