use serde::Deserialize;

use super::InheritedFields;

/// Leaf record of a products document. Images use `id`; agent binaries use
/// `version`, `size`, `path` and `sha256`.
#[derive(Debug, Deserialize)]
pub struct Item {
    #[serde(flatten)]
    fields: InheritedFields,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    sha256: Option<String>,
}

impl Item {
    pub fn fields(&self) -> &InheritedFields {
        &self.fields
    }

    /// Cloud image identifier, e.g. `ami-442ea674`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Agent version, e.g. `1.13.0`.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }
}
