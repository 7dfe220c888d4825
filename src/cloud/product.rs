use serde::Deserialize;
use std::collections::BTreeMap;

use super::InheritedFields;

#[derive(Debug, Deserialize)]
pub struct ProductCollection {
    #[serde(flatten)]
    fields: InheritedFields,

    #[serde(default)]
    os: Option<String>,

    #[serde(default, rename = "version")]
    distro_version: Option<String>,

    // BTreeMap keeps version serials in ascending order.
    #[serde(default)]
    versions: BTreeMap<String, super::ItemCollection>,
}

impl ProductCollection {
    pub fn fields(&self) -> &InheritedFields {
        &self.fields
    }

    pub fn arch(&self) -> Option<&str> {
        self.fields.arch.as_deref()
    }

    pub fn os(&self) -> Option<&str> {
        self.os.as_deref()
    }

    pub fn release(&self) -> Option<&str> {
        self.fields.release.as_deref()
    }

    /// e.g. `12.04`
    pub fn distro_version(&self) -> Option<&str> {
        self.distro_version.as_deref()
    }

    pub fn versions(&self) -> &BTreeMap<String, super::ItemCollection> {
        &self.versions
    }
}
