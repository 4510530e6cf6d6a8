//! Tag-search media client over a JSON endpoint.

use super::http::AsyncHttpClient;
use super::types::{MediaItem, MediaPage, MediaSource, ProviderError};
use serde::Deserialize;
use tracing::debug;

/// A paginated tag-search client.
///
/// Issues `GET {base_url}/tags/{tag}/media?cursor={cursor}` requests and
/// deserializes the JSON body into a [`MediaPage`]. Request signing and
/// authentication belong to the deployment's HTTP layer, not here.
pub struct TagSource<C> {
    http: C,
    base_url: String,
}

/// Wire shape of one page response.
#[derive(Debug, Deserialize)]
struct PageResponse {
    data: Vec<MediaItem>,
    #[serde(default)]
    pagination: PaginationResponse,
}

#[derive(Debug, Default, Deserialize)]
struct PaginationResponse {
    #[serde(default)]
    next_cursor: String,
}

impl<C: AsyncHttpClient> TagSource<C> {
    /// Creates a source rooted at `base_url` (no trailing slash).
    pub fn new(http: C, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn page_url(&self, tag: &str, cursor: &str) -> String {
        if cursor.is_empty() {
            format!("{}/tags/{}/media", self.base_url, tag)
        } else {
            format!("{}/tags/{}/media?cursor={}", self.base_url, tag, cursor)
        }
    }
}

impl<C: AsyncHttpClient> MediaSource for TagSource<C> {
    async fn page(&self, tag: &str, cursor: &str) -> Result<MediaPage, ProviderError> {
        let url = self.page_url(tag, cursor);
        let body = self.http.get(&url).await?;
        let res: PageResponse = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::InvalidResponse(format!("bad page JSON: {}", e)))?;
        debug!(
            tag,
            items = res.data.len(),
            next_cursor = %res.pagination.next_cursor,
            "fetched media page"
        );
        Ok(MediaPage {
            items: res.data,
            next_cursor: res.pagination.next_cursor,
        })
    }
}
