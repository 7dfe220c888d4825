use indexmap::IndexMap;
use serde::Deserialize;

use super::InheritedFields;

/// One dated build of a product (`versions.<serial>`).
#[derive(Debug, Deserialize)]
pub struct ItemCollection {
    #[serde(flatten)]
    fields: InheritedFields,
    #[serde(default)]
    label: Option<String>,
    // document order is the traversal order
    #[serde(default)]
    items: IndexMap<String, super::Item>,
}

impl ItemCollection {
    pub fn fields(&self) -> &InheritedFields {
        &self.fields
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn items(&self) -> &IndexMap<String, super::Item> {
        &self.items
    }
}
