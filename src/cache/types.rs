//! Cache key and error types.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// A content-derived cache identifier.
///
/// Keys are the lowercase-hex SHA-256 of a source name (typically a
/// thumbnail URL), so identical URLs always map to the same key and fetches
/// deduplicate naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives a key by hashing `name`.
    pub fn of(name: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Wraps an already-derived key, e.g. one recovered from a filename.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The key as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised by cache implementations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// No entry stored under the key.
    #[error("no cache entry for key {0}")]
    Missing(CacheKey),

    /// Encoding an image for storage failed.
    #[error("image encode failed: {0}")]
    Encode(String),

    /// Decoding a stored image failed.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// Underlying storage I/O failed.
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
}
