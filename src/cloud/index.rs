use indexmap::IndexMap;
use serde::Deserialize;

use super::{CloudSpec, INDEX_FORMAT};
use crate::error::{Result, StreamsError};

/// Top-level index document pointing at one or more products documents.
#[derive(Debug, Deserialize)]
pub struct IndexMetadata {
    #[serde(default)]
    updated: String,
    #[serde(default)]
    format: String,
    // scanned in document order
    #[serde(default)]
    index: IndexMap<String, IndexEntry>,
}

impl IndexMetadata {
    pub fn parse(bytes: &[u8], url: &str) -> Result<Self> {
        let metadata: IndexMetadata =
            serde_json::from_slice(bytes).map_err(|source| StreamsError::Parse {
                url: url.to_string(),
                source,
            })?;
        if metadata.format != INDEX_FORMAT {
            return Err(StreamsError::UnsupportedFormat {
                url: url.to_string(),
                found: metadata.format,
                expected: INDEX_FORMAT,
            });
        }
        Ok(metadata)
    }

    pub fn updated(&self) -> &str {
        &self.updated
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn entries(&self) -> &IndexMap<String, IndexEntry> {
        &self.index
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexEntry {
    #[serde(default)]
    updated: String,
    #[serde(rename = "datatype")]
    data_type: String,
    #[serde(default)]
    format: String,
    #[serde(rename = "path")]
    products_path: String,
    /// Advisory: product ids the products document claims to cover.
    #[serde(default)]
    products: Vec<String>,
    /// Advisory: clouds the products document claims to cover.
    #[serde(default)]
    clouds: Vec<CloudSpec>,
    #[serde(default, rename = "cloudname")]
    cloud_name: Option<String>,
}

impl IndexEntry {
    pub fn updated(&self) -> &str {
        &self.updated
    }

    /// Content type, e.g. `image-ids` or `content-download`.
    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Absolute URL or a path relative to the source base URL.
    pub fn products_path(&self) -> &str {
        &self.products_path
    }

    pub fn products(&self) -> &[String] {
        &self.products
    }

    pub fn clouds(&self) -> &[CloudSpec] {
        &self.clouds
    }

    pub fn cloud_name(&self) -> Option<&str> {
        self.cloud_name.as_deref()
    }
}
