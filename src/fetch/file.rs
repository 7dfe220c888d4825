use std::io::ErrorKind;

use async_trait::async_trait;
use url::Url;

use super::DataSource;
use crate::error::{Result, StreamsError};

/// Reads `file://` URLs from the local filesystem, e.g. a locally generated
/// catalog or an offline mirror.
#[derive(Debug, Default, Clone)]
pub struct FileDataSource;

impl FileDataSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DataSource for FileDataSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let path = Url::parse(url)
            .ok()
            .filter(|parsed| parsed.scheme() == "file")
            .and_then(|parsed| parsed.to_file_path().ok())
            .ok_or_else(|| StreamsError::Fetch {
                url: url.to_string(),
                reason: "not a local file URL".to_string(),
            })?;

        tokio::fs::read(&path).await.map_err(|err| match err.kind() {
            ErrorKind::NotFound => StreamsError::NotFound {
                url: url.to_string(),
            },
            _ => StreamsError::Fetch {
                url: url.to_string(),
                reason: format!("read {}: {err}", path.display()),
            },
        })
    }
}
