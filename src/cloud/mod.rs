mod catalog;
mod fields;
mod image;
mod index;
mod item;
mod product;
mod record;
mod spec;
mod tools;
mod version;

pub use catalog::{AliasTarget, CloudMetadata};
pub use fields::InheritedFields;
pub use image::ImageMetadata;
pub use index::{IndexEntry, IndexMetadata};
pub use item::Item;
pub use product::ProductCollection;
pub use record::ResultRecord;
pub use spec::{CloudSpec, LookupParams};
pub use tools::ToolsMetadata;
pub use version::ItemCollection;

/// Schema version of index documents understood by this crate.
pub const INDEX_FORMAT: &str = "index:1.0";

/// Schema version of products documents understood by this crate.
pub const PRODUCTS_FORMAT: &str = "products:1.0";
