use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::simplestreams::{DEFAULT_BASE_URL, DEFAULT_INDEX_PATH};

/// One catalog location, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub(crate) name: String,
    pub(crate) url: String,
}

impl Source {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A named Ed25519 key, `ed25519:<base64>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedKey {
    pub(crate) id: String,
    pub(crate) public_key: String,
}

impl TrustedKey {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }
}

fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

/// Source configuration document; serde is confined to this module tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_index_path")]
    pub(crate) index_path: String,
    #[serde(default)]
    pub(crate) require_signed: bool,
    #[serde(default)]
    pub(crate) deadline_secs: Option<u64>,
    pub(crate) sources: Vec<Source>,
    #[serde(default)]
    pub(crate) keys: Vec<TrustedKey>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            require_signed: false,
            deadline_secs: None,
            sources: vec![Source {
                name: "ubuntu-releases".to_string(),
                url: DEFAULT_BASE_URL.to_string(),
            }],
            keys: Vec::new(),
        }
    }
}

impl SourcesConfig {
    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    pub fn require_signed(&self) -> bool {
        self.require_signed
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// Find by name without cloning.
    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    pub fn keys(&self) -> &[TrustedKey] {
        &self.keys
    }
}
