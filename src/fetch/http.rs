use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use super::DataSource;
use crate::error::{Result, StreamsError};

const USER_AGENT: &str = concat!("rust-simplestreams/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches `http(s)://` documents.
#[derive(Debug, Clone)]
pub struct HttpDataSource {
    client: Client,
}

impl HttpDataSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| StreamsError::Fetch {
                url: String::new(),
                reason: format!("cannot build HTTP client: {err}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DataSource for HttpDataSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |reason: String| StreamsError::Fetch {
            url: url.to_string(),
            reason,
        };

        debug!(url, "GET");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| fetch_error(err.to_string()))?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StreamsError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {status}")));
        }

        let bytes = res
            .bytes()
            .await
            .map_err(|err| fetch_error(format!("cannot read body: {err}")))?;
        Ok(bytes.to_vec())
    }
}
