//! HTTP client abstraction for testability.

use super::types::ProviderError;
use std::future::Future;
use std::time::Duration;

/// Trait for asynchronous HTTP GET operations.
///
/// The abstraction allows dependency injection: tests supply an in-memory
/// client serving canned thumbnail bytes instead of hitting the network.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET and returns the response body.
    ///
    /// A non-success status is an error; timeouts surface as
    /// [`ProviderError::Http`] and are treated by callers as per-item
    /// failures, not retried.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Real HTTP client implementation using reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

impl ReqwestClient {
    /// Creates a client with the default 30 second timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Creates a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("mosaix/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl AsyncHttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("GET {} failed: {}", url, e)))?;
        let status = res.status();
        if !status.is_success() {
            return Err(ProviderError::Http(format!(
                "GET {} failed, status {}",
                url, status
            )));
        }
        let body = res
            .bytes()
            .await
            .map_err(|e| ProviderError::Http(format!("reading body of {} failed: {}", url, e)))?;
        Ok(body.to_vec())
    }
}
