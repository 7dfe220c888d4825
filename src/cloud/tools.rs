use serde::Serialize;
use std::fmt;

use crate::fetch::join_url;

/// An agent binary tarball published for one series/arch pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolsMetadata {
    release: String,
    version: String,
    arch: String,
    size: u64,
    path: String,
    full_path: String,
    file_type: String,
    sha256: String,
}

impl ToolsMetadata {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        release: impl Into<String>,
        version: impl Into<String>,
        arch: impl Into<String>,
        size: u64,
        path: impl Into<String>,
        file_type: impl Into<String>,
        sha256: impl Into<String>,
    ) -> Self {
        Self {
            release: release.into(),
            version: version.into(),
            arch: arch.into(),
            size,
            path: path.into(),
            full_path: String::new(),
            file_type: file_type.into(),
            sha256: sha256.into(),
        }
    }

    /// Series codename, e.g. `precise`.
    pub fn release(&self) -> &str {
        &self.release
    }

    /// Agent version, e.g. `1.13.0`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn arch(&self) -> &str {
        &self.arch
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Path as published in the catalog.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `path` resolved against the source it was found in; empty until
    /// [`ToolsMetadata::resolve_full_path`] runs.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn sha256(&self) -> &str {
        &self.sha256
    }

    pub fn resolve_full_path(&mut self, base_url: &str) {
        if !self.path.is_empty() {
            self.full_path = join_url(base_url, &self.path);
        }
    }
}

impl fmt::Display for ToolsMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{} | {} bytes | {}",
            self.version, self.release, self.arch, self.size, self.full_path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolsMetadata {
        ToolsMetadata::new(
            "precise",
            "1.13.0",
            "amd64",
            5,
            "tools/releases/juju-1.13.0-precise-amd64.tgz",
            "tar.gz",
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
        )
    }

    #[test]
    fn full_path_joins_onto_base() {
        let mut tools = sample();
        tools.resolve_full_path("https://streams.example.com/juju");
        assert_eq!(
            tools.full_path(),
            "https://streams.example.com/juju/tools/releases/juju-1.13.0-precise-amd64.tgz"
        );
    }
}
