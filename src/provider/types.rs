//! Media source types and traits.

use serde::Deserialize;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur during media source operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The source returned data the client could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Source-specific failure.
    #[error("source error: {0}")]
    Source(String),
}

/// One media item in a page: a thumbnail at a URL with known dimensions.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    pub thumbnail_url: String,
    pub width: u32,
    pub height: u32,
}

/// One page of media for a tag.
///
/// An empty `next_cursor` marks the end of results.
#[derive(Debug, Clone, Default)]
pub struct MediaPage {
    pub items: Vec<MediaItem>,
    pub next_cursor: String,
}

impl MediaPage {
    /// Returns true if no further pages follow this one.
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_empty()
    }
}

/// Trait for paginated, tag-addressed media sources.
///
/// The first request passes an empty cursor; subsequent requests pass the
/// cursor from the previous page.
pub trait MediaSource: Send + Sync {
    /// Fetches one page of media for `tag`.
    fn page(
        &self,
        tag: &str,
        cursor: &str,
    ) -> impl Future<Output = Result<MediaPage, ProviderError>> + Send;
}
