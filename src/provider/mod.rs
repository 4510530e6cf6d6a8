//! Media source abstraction.
//!
//! A media source answers one question: given a tag and a pagination cursor,
//! return a page of media items with thumbnail URLs. Authentication, request
//! signing, and the source's JSON schema are collaborator concerns; the core
//! consumes pages and downloads thumbnail bytes, nothing more.

mod http;
mod tag_source;
mod types;

pub use http::{AsyncHttpClient, ReqwestClient};
pub use tag_source::TagSource;
pub use types::{MediaItem, MediaPage, MediaSource, ProviderError};
