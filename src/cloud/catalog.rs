use serde::Deserialize;
use std::collections::HashMap;

use super::{InheritedFields, PRODUCTS_FORMAT};
use crate::error::{Result, StreamsError};

/// Field values an alias expands to (`_aliases.<field>.<key>`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AliasTarget {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}

/// A products document: every product, version and item published under
/// one content id.
#[derive(Debug, Deserialize)]
pub struct CloudMetadata {
    #[serde(flatten)]
    fields: InheritedFields,
    #[serde(default)]
    updated: String,
    #[serde(default)]
    format: String,
    #[serde(default)]
    content_id: String,
    #[serde(default, rename = "datatype")]
    data_type: Option<String>,
    #[serde(default)]
    products: HashMap<String, super::ProductCollection>,
    #[serde(default, rename = "_aliases")]
    aliases: HashMap<String, HashMap<String, AliasTarget>>,
}

impl CloudMetadata {
    /// Parse a products document and reject formats whose layout is unknown.
    pub fn parse(bytes: &[u8], url: &str) -> Result<Self> {
        let metadata: CloudMetadata =
            serde_json::from_slice(bytes).map_err(|source| StreamsError::Parse {
                url: url.to_string(),
                source,
            })?;
        if metadata.format != PRODUCTS_FORMAT {
            return Err(StreamsError::UnsupportedFormat {
                url: url.to_string(),
                found: metadata.format,
                expected: PRODUCTS_FORMAT,
            });
        }
        Ok(metadata)
    }

    pub fn fields(&self) -> &InheritedFields {
        &self.fields
    }

    pub fn updated(&self) -> &str {
        &self.updated
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    /// Borrow the products keyed by their product id.
    pub fn products(&self) -> &HashMap<String, super::ProductCollection> {
        &self.products
    }

    /// Fill region/endpoint from the `crsn` alias when the fields do not set
    /// them directly.
    pub fn expand_aliases(&self, mut fields: InheritedFields) -> InheritedFields {
        let target = fields
            .crsn
            .as_deref()
            .and_then(|key| self.aliases.get("crsn").and_then(|aliases| aliases.get(key)));
        if let Some(target) = target {
            if fields.region.is_none() {
                fields.region = target.region.clone();
            }
            if fields.endpoint.is_none() {
                fields.endpoint = target.endpoint.clone();
            }
        }
        fields
    }
}
