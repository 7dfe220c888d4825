use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use super::DataSource;
use crate::error::{Result, StreamsError};

#[derive(Debug, Clone)]
enum CachedResponse {
    Found(Vec<u8>),
    Missing,
}

/// Wraps a [`DataSource`] with an in-memory response cache keyed by exact URL.
///
/// Meant to live for one lookup: sources that share a mirror, or an index
/// probed for several documents, are only fetched once. Successes and
/// `NotFound` are cached; transport errors are not.
pub struct CachingDataSource<'a> {
    inner: &'a dyn DataSource,
    cache: DashMap<String, CachedResponse>,
}

impl<'a> CachingDataSource<'a> {
    pub fn new(inner: &'a dyn DataSource) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<'a> DataSource for CachingDataSource<'a> {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        // Clone out before awaiting; never hold a shard guard across I/O.
        let cached = self.cache.get(url).map(|entry| entry.value().clone());
        match cached {
            Some(CachedResponse::Found(bytes)) => {
                debug!(url, "cache hit");
                return Ok(bytes);
            }
            Some(CachedResponse::Missing) => {
                debug!(url, "cache hit (not found)");
                return Err(StreamsError::NotFound {
                    url: url.to_string(),
                });
            }
            None => {}
        }

        match self.inner.fetch(url).await {
            Ok(bytes) => {
                self.cache
                    .insert(url.to_string(), CachedResponse::Found(bytes.clone()));
                Ok(bytes)
            }
            Err(err) if err.is_not_found() => {
                self.cache.insert(url.to_string(), CachedResponse::Missing);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }
}
