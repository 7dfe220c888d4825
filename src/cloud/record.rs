use serde::Serialize;
use std::fmt;

use super::{CloudSpec, ImageMetadata, ToolsMetadata};

/// One match produced by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultRecord {
    Image(ImageMetadata),
    Tools(ToolsMetadata),
}

impl ResultRecord {
    pub fn arch(&self) -> &str {
        match self {
            ResultRecord::Image(image) => image.arch(),
            ResultRecord::Tools(tools) => tools.arch(),
        }
    }

    /// Region the record is scoped to. Agent binaries are region independent.
    pub fn cloud(&self) -> Option<CloudSpec> {
        match self {
            ResultRecord::Image(image) => Some(image.cloud()),
            ResultRecord::Tools(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageMetadata> {
        match self {
            ResultRecord::Image(image) => Some(image),
            ResultRecord::Tools(_) => None,
        }
    }

    pub fn as_tools(&self) -> Option<&ToolsMetadata> {
        match self {
            ResultRecord::Tools(tools) => Some(tools),
            ResultRecord::Image(_) => None,
        }
    }

    /// Turn source-relative paths into absolute URLs.
    pub fn resolve_paths(&mut self, base_url: &str) {
        if let ResultRecord::Tools(tools) = self {
            tools.resolve_full_path(base_url);
        }
    }
}

impl fmt::Display for ResultRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultRecord::Image(image) => write!(f, "image  {image}"),
            ResultRecord::Tools(tools) => write!(f, "tools  {tools}"),
        }
    }
}
