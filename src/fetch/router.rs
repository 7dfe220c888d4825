use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::{DataSource, FileDataSource, HttpDataSource};
use crate::error::{Result, StreamsError};

/// Dispatches each URL to the data source registered for its scheme.
#[derive(Default)]
pub struct SchemeRouter {
    sources: HashMap<String, Arc<dyn DataSource>>,
}

impl SchemeRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `http`, `https` and `file`.
    pub fn with_defaults() -> Result<Self> {
        let http: Arc<dyn DataSource> = Arc::new(HttpDataSource::new()?);
        let mut router = Self::new();
        router.register("http", http.clone());
        router.register("https", http);
        router.register("file", Arc::new(FileDataSource::new()));
        Ok(router)
    }

    pub fn register(&mut self, scheme: &str, source: Arc<dyn DataSource>) {
        self.sources.insert(scheme.to_ascii_lowercase(), source);
    }
}

#[async_trait]
impl DataSource for SchemeRouter {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let scheme = url
            .split_once(':')
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .ok_or_else(|| StreamsError::Fetch {
                url: url.to_string(),
                reason: "URL has no scheme".to_string(),
            })?;
        let source = self.sources.get(&scheme).ok_or_else(|| StreamsError::Fetch {
            url: url.to_string(),
            reason: format!("no data source registered for scheme `{scheme}`"),
        })?;
        source.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryDataSource;

    #[tokio::test]
    async fn routes_by_scheme() {
        let mut router = SchemeRouter::new();
        router.register(
            "test",
            Arc::new(MemoryDataSource::new().with_document("test:index.json", "{}")),
        );

        // scheme lookup is case-insensitive, document keys are not
        assert!(router.fetch("TEST:index.json").await.unwrap_err().is_not_found());
        assert_eq!(router.fetch("test:index.json").await.unwrap(), b"{}");
        assert!(matches!(
            router.fetch("s3://bucket/index.json").await.unwrap_err(),
            StreamsError::Fetch { .. }
        ));
    }
}
