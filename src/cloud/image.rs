use serde::Serialize;
use std::fmt;

use super::{CloudSpec, InheritedFields};

/// A machine image usable in one cloud region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageMetadata {
    id: String,
    storage: String,
    virt_type: String,
    arch: String,
    release: String,
    region_alias: String,
    region: String,
    endpoint: String,
}

impl ImageMetadata {
    pub fn new(id: impl Into<String>, arch: impl Into<String>, cloud: &CloudSpec) -> Self {
        Self {
            id: id.into(),
            storage: String::new(),
            virt_type: String::new(),
            arch: arch.into(),
            release: String::new(),
            region_alias: String::new(),
            region: cloud.region().to_string(),
            endpoint: cloud.endpoint().to_string(),
        }
    }

    pub fn with_storage(mut self, storage: impl Into<String>) -> Self {
        self.storage = storage.into();
        self
    }

    pub fn with_virt_type(mut self, virt_type: impl Into<String>) -> Self {
        self.virt_type = virt_type.into();
        self
    }

    pub fn with_release(mut self, release: impl Into<String>) -> Self {
        self.release = release.into();
        self
    }

    pub fn with_region_alias(mut self, alias: impl Into<String>) -> Self {
        self.region_alias = alias.into();
        self
    }

    /// Build from denormalised catalog fields. `arch` has already been
    /// resolved by the caller, since a product may only carry it in its id.
    pub fn from_fields(id: &str, arch: &str, fields: &InheritedFields) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            id: id.to_string(),
            storage: text(&fields.root_store),
            virt_type: text(&fields.virt),
            arch: arch.to_string(),
            release: text(&fields.release),
            region_alias: text(&fields.crsn),
            region: text(&fields.region),
            endpoint: text(&fields.endpoint),
        }
    }

    /// Provider image id, e.g. `ami-442ea674`.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Root storage, e.g. `ebs` or `instance`.
    pub fn storage(&self) -> &str {
        &self.storage
    }

    /// `hvm`, `pv`, ...
    pub fn virt_type(&self) -> &str {
        &self.virt_type
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn release(&self) -> &str {
        &self.release
    }

    pub fn region_alias(&self) -> &str {
        &self.region_alias
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn cloud(&self) -> CloudSpec {
        CloudSpec::new(self.region.clone(), self.endpoint.clone())
    }
}

impl fmt::Display for ImageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {} | {}",
            self.id, self.arch, self.virt_type, self.storage, self.region
        )
    }
}
