use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::DataSource;
use crate::error::{Result, StreamsError};

/// Serves canned documents keyed by exact URL.
///
/// Useful for `test:` catalogs and for embedding a catalog in a binary.
#[derive(Debug, Default)]
pub struct MemoryDataSource {
    documents: HashMap<String, Vec<u8>>,
    failures: HashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Make `url` fail with a transport error instead of `NotFound`.
    pub fn with_failure(mut self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(url.into(), reason.into());
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.documents.insert(url.into(), body.into());
    }

    /// Number of `fetch` calls served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(reason) = self.failures.get(url) {
            return Err(StreamsError::Fetch {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| StreamsError::NotFound {
                url: url.to_string(),
            })
    }
}
