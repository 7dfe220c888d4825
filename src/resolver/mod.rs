use tracing::debug;

use crate::cloud::{CloudSpec, IndexEntry, IndexMetadata, PRODUCTS_FORMAT};
use crate::error::{Result, StreamsError};
use crate::fetch::join_url;

/// What the caller needs from an index.
#[derive(Debug, Clone, Copy)]
pub struct IndexQuery<'a> {
    pub data_type: &'a str,
    /// Product ids the lookup will probe; used to skip entries that
    /// advertise an unrelated product list.
    pub ids: &'a [String],
    /// Skips entries that advertise other clouds. Empty matches everything.
    pub cloud: &'a CloudSpec,
}

/// Parse an index document and pick the entry that answers `query`.
///
/// `Ok(None)` means the index serves the data type but advertises nothing
/// for the wanted products or cloud; the source then has no matches.
pub fn resolve(bytes: &[u8], url: &str, query: &IndexQuery<'_>) -> Result<Option<IndexEntry>> {
    let index = IndexMetadata::parse(bytes, url)?;
    select_entry(&index, url, query)
}

/// First entry, in document order, with the requested data type and a
/// products format this crate understands. The `products` and `clouds`
/// lists are advisory: an entry they reject is skipped, and when every
/// usable entry is skipped the index simply has no data for the query.
pub fn select_entry(
    index: &IndexMetadata,
    url: &str,
    query: &IndexQuery<'_>,
) -> Result<Option<IndexEntry>> {
    let mut skipped = 0usize;
    for (name, entry) in index.entries() {
        if entry.data_type() != query.data_type {
            continue;
        }
        if entry.format() != PRODUCTS_FORMAT {
            debug!(index = name.as_str(), format = entry.format(), "skipping entry with unknown format");
            continue;
        }
        if !entry.products().is_empty()
            && !query.ids.iter().any(|id| entry.products().contains(id))
        {
            debug!(index = name.as_str(), "entry advertises none of the wanted products");
            skipped += 1;
            continue;
        }
        if !query.cloud.is_empty()
            && !entry.clouds().is_empty()
            && !entry.clouds().iter().any(|cloud| cloud.matches(query.cloud))
        {
            debug!(index = name.as_str(), region = query.cloud.region(), "entry advertises other clouds");
            skipped += 1;
            continue;
        }
        debug!(index = name.as_str(), path = entry.products_path(), "selected index entry");
        return Ok(Some(entry.clone()));
    }

    if skipped > 0 {
        debug!(url, data_type = query.data_type, skipped, "index has no data for the query");
        return Ok(None);
    }
    Err(StreamsError::NoMatchingIndex {
        url: url.to_string(),
        data_type: query.data_type.to_string(),
    })
}

/// Location of the products document, relative paths being resolved against
/// the base URL of the source the index came from.
pub fn products_url(base_url: &str, entry: &IndexEntry) -> String {
    join_url(base_url, entry.products_path())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"{
        "format": "index:1.0",
        "index": {
            "com.ubuntu.juju:released:tools": {
                "datatype": "content-download",
                "format": "products:1.0",
                "path": "streams/v1/tools_metadata.json",
                "products": ["com.ubuntu.juju:12.04:amd64"]
            },
            "com.ubuntu.cloud:released:future": {
                "datatype": "image-ids",
                "format": "products:9.9",
                "path": "streams/v1/future.json"
            },
            "com.ubuntu.cloud:released:azure": {
                "datatype": "image-ids",
                "format": "products:1.0",
                "path": "streams/v1/azure.json",
                "clouds": [{"region": "West US", "endpoint": "https://management.core.windows.net/"}],
                "products": ["com.ubuntu.cloud:server:12.04:amd64"]
            },
            "com.ubuntu.cloud:released:aws": {
                "datatype": "image-ids",
                "format": "products:1.0",
                "path": "streams/v1/aws.json",
                "clouds": [{"region": "us-east-1", "endpoint": "https://ec2.us-east-1.amazonaws.com"}],
                "products": ["com.ubuntu.cloud:server:12.04:amd64", "com.ubuntu.cloud:server:12.04:arm"]
            }
        }
    }"#;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn picks_first_matching_data_type() {
        let wanted = ids(&["com.ubuntu.juju:12.04:amd64"]);
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "content-download",
            ids: &wanted,
            cloud: &cloud,
        };
        let entry = resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().unwrap();
        assert_eq!(entry.products_path(), "streams/v1/tools_metadata.json");
    }

    #[test]
    fn skips_entries_for_other_clouds_and_formats() {
        let wanted = ids(&["com.ubuntu.cloud:server:12.04:amd64"]);
        let cloud = CloudSpec::new("us-east-1", "https://ec2.us-east-1.amazonaws.com");
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &wanted,
            cloud: &cloud,
        };
        let entry = resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().unwrap();
        assert_eq!(entry.products_path(), "streams/v1/aws.json");
    }

    #[test]
    fn empty_cloud_takes_first_usable_entry() {
        let wanted = ids(&["com.ubuntu.cloud:server:12.04:amd64"]);
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &wanted,
            cloud: &cloud,
        };
        let entry = resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().unwrap();
        assert_eq!(entry.products_path(), "streams/v1/azure.json");
    }

    #[test]
    fn product_list_rejects_unrelated_entries() {
        let wanted = ids(&["com.ubuntu.cloud:server:12.04:arm"]);
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &wanted,
            cloud: &cloud,
        };
        let entry = resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().unwrap();
        assert_eq!(entry.products_path(), "streams/v1/aws.json");
    }

    #[test]
    fn unadvertised_products_leave_nothing_to_match() {
        let wanted = ids(&["com.ubuntu.cloud:server:12.04:ppc64el"]);
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &wanted,
            cloud: &cloud,
        };
        assert!(resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().is_none());
    }

    #[test]
    fn unadvertised_cloud_leaves_nothing_to_match() {
        let wanted = ids(&["com.ubuntu.cloud:server:12.04:amd64"]);
        let cloud = CloudSpec::new("eu-west-1", "https://ec2.eu-west-1.amazonaws.com");
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &wanted,
            cloud: &cloud,
        };
        assert!(resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap().is_none());
    }

    #[test]
    fn unknown_products_format_is_not_a_match() {
        let index = INDEX.replace("\"products:1.0\"", "\"products:2.0\"");
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "image-ids",
            ids: &[],
            cloud: &cloud,
        };
        let err = resolve(index.as_bytes(), "test:index.json", &query).unwrap_err();
        assert!(matches!(err, StreamsError::NoMatchingIndex { .. }));
    }

    #[test]
    fn no_matching_data_type() {
        let cloud = CloudSpec::default();
        let query = IndexQuery {
            data_type: "image-downloads",
            ids: &[],
            cloud: &cloud,
        };
        let err = resolve(INDEX.as_bytes(), "test:index.json", &query).unwrap_err();
        assert!(matches!(
            err,
            StreamsError::NoMatchingIndex { ref data_type, .. } if data_type == "image-downloads"
        ));
    }

    #[test]
    fn relative_products_path_uses_source_base() {
        let index = IndexMetadata::parse(INDEX.as_bytes(), "test:index.json").unwrap();
        let entry = &index.entries()["com.ubuntu.cloud:released:aws"];
        assert_eq!(
            products_url("https://mirror.example/releases", entry),
            "https://mirror.example/releases/streams/v1/aws.json"
        );
    }
}
