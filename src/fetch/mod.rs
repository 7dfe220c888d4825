//! Byte transport for catalog documents.

mod cache;
mod file;
mod http;
mod memory;
mod router;

pub use cache::CachingDataSource;
pub use file::FileDataSource;
pub use http::HttpDataSource;
pub use memory::MemoryDataSource;
pub use router::SchemeRouter;

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::error::Result;

/// Anything that can hand back the bytes stored at a URL.
///
/// Implementations must report a missing document as
/// [`StreamsError::NotFound`](crate::error::StreamsError::NotFound) so callers
/// can tell "skip this source" apart from transport failures.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl<T: DataSource + ?Sized> DataSource for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url).await
    }
}

/// Resolve `path` against a source base URL.
///
/// Only `scheme://...` paths are absolute and returned unchanged; catalog
/// file names may contain `:` (`com.ubuntu.cloud:released:aws.json`). Other
/// paths are joined onto the base, treated as a directory (a trailing `/` is
/// added), with URL semantics, so `..` and rooted paths behave as in a
/// browser. Opaque bases such as `test:` cannot act as a join base and fall
/// back to concatenation.
pub fn join_url(base: &str, path: &str) -> String {
    if path.contains("://") {
        return path.to_string();
    }
    // Keeps a leading `name:` segment from being read as a scheme.
    let relative = if path.starts_with('/') || path.starts_with('.') {
        path.to_string()
    } else {
        format!("./{path}")
    };

    let directory = if base.ends_with('/') || base.ends_with(':') {
        base.to_string()
    } else {
        format!("{base}/")
    };

    Url::parse(&directory)
        .ok()
        .filter(|url| !url.cannot_be_a_base())
        .and_then(|url| url.join(&relative).ok())
        .map(String::from)
        .unwrap_or_else(|| format!("{directory}{}", path.trim_start_matches('/')))
}
