use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::cloud::{CloudMetadata, InheritedFields, ResultRecord};
use crate::constraint::{CatalogItem, Constraint};
use crate::error::Result;

fn product_id_regex() -> &'static Regex {
    static PRODUCT_RE: OnceLock<Regex> = OnceLock::new();
    PRODUCT_RE.get_or_init(|| {
        Regex::new(r"^(?P<prefix>.+):(?P<version>\d+\.\d+):(?P<arch>[A-Za-z0-9_]+)$")
            .expect("invalid product id regex")
    })
}

/// Arch encoded in the last segment of a product id, for products that do
/// not declare one.
fn arch_from_product_id(product_id: &str) -> Option<&str> {
    product_id_regex()
        .captures(product_id)
        .and_then(|caps| caps.name("arch"))
        .map(|m| m.as_str())
}

/// Parse a products document and extract the records `constraint` selects.
pub fn match_products(bytes: &[u8], url: &str, constraint: &Constraint) -> Result<Vec<ResultRecord>> {
    let metadata = CloudMetadata::parse(bytes, url)?;
    match_metadata(&metadata, constraint)
}

/// Walk product -> version -> item for every product id of `constraint`.
///
/// Output order: product ids in arch order, version serials ascending, items
/// in document order.
pub fn match_metadata(metadata: &CloudMetadata, constraint: &Constraint) -> Result<Vec<ResultRecord>> {
    let ids = constraint.ids()?;
    let mut records = Vec::new();

    for id in &ids {
        let Some(product) = metadata.products().get(id) else {
            debug!(product = id.as_str(), content_id = metadata.content_id(), "product not in catalog");
            continue;
        };

        // Aliases expand at the level that names them, so an item's `crsn`
        // overrides a region inherited from its product.
        let own = |fields: &InheritedFields| metadata.expand_aliases(fields.clone());
        let document_fields = own(metadata.fields());
        let product_fields = own(product.fields()).inherit(&document_fields);
        let Some(arch) = product_fields
            .arch
            .clone()
            .or_else(|| arch_from_product_id(id).map(str::to_string))
        else {
            debug!(product = id.as_str(), "product has no architecture");
            continue;
        };

        for (serial, collection) in product.versions() {
            let version_fields = own(collection.fields()).inherit(&product_fields);
            for (key, item) in collection.items() {
                let fields = own(item.fields()).inherit(&version_fields);
                let item_arch = fields.arch.clone().unwrap_or_else(|| arch.clone());
                let found = CatalogItem {
                    product_id: id,
                    arch: &item_arch,
                    fields: &fields,
                    item,
                };

                let Some(record) = constraint.build_record(&found) else {
                    trace!(product = id.as_str(), serial = serial.as_str(), item = key.as_str(), "item lacks required fields");
                    continue;
                };
                if !constraint.accepts(&record) {
                    trace!(product = id.as_str(), serial = serial.as_str(), item = key.as_str(), "item filtered out");
                    continue;
                }
                records.push(record);
            }
        }
    }

    Ok(records)
}
