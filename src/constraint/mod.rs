//! Search criteria and the catalog product ids they translate to.
//!
//! A product id has the shape `<namespace>[.<stream>]:<kind>:<version>:<arch>`,
//! e.g. `com.ubuntu.cloud.daily:server:12.04:amd64`. The stream segment is
//! dropped for the default stream. Agent binary catalogs publish their
//! products without a kind segment (`com.ubuntu.juju:12.04:amd64`).

use crate::cloud::{
    CloudSpec, ImageMetadata, InheritedFields, Item, LookupParams, ResultRecord, ToolsMetadata,
};
use crate::error::{Result, StreamsError};
use crate::series;

pub const IMAGE_NAMESPACE: &str = "com.ubuntu.cloud";
pub const IMAGE_KIND: &str = "server";
pub const IMAGE_DATA_TYPE: &str = "image-ids";

pub const TOOLS_NAMESPACE: &str = "com.ubuntu.juju";
pub const TOOLS_DATA_TYPE: &str = "content-download";

/// `""`, `release` and `released` all name the default channel.
pub fn is_default_stream(stream: &str) -> bool {
    matches!(stream, "" | "release" | "released")
}

/// Which agent versions a tools lookup accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolsVersion {
    #[default]
    Any,
    Exact(String),
    Major { major: u32, minor: Option<u32> },
}

impl ToolsVersion {
    pub fn matches(&self, version: &str) -> bool {
        match self {
            ToolsVersion::Any => true,
            ToolsVersion::Exact(wanted) => wanted == version,
            ToolsVersion::Major { major, minor } => {
                let mut parts = version.split('.').map(leading_number);
                if parts.next().flatten() != Some(*major) {
                    return false;
                }
                match minor {
                    Some(minor) => parts.next().flatten() == Some(*minor),
                    None => true,
                }
            }
        }
    }
}

// "13-beta1" -> 13
fn leading_number(part: &str) -> Option<u32> {
    let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConstraint {
    params: LookupParams,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolsConstraint {
    params: LookupParams,
    version: ToolsVersion,
}

impl ToolsConstraint {
    pub fn version(&self) -> &ToolsVersion {
        &self.version
    }
}

/// A catalog item together with the context the matcher resolved for it.
#[derive(Debug)]
pub struct CatalogItem<'a> {
    pub product_id: &'a str,
    pub arch: &'a str,
    /// Document, product, version and item fields merged, aliases expanded.
    pub fields: &'a InheritedFields,
    pub item: &'a Item,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Image(ImageConstraint),
    Tools(ToolsConstraint),
}

impl Constraint {
    pub fn image(params: LookupParams) -> Self {
        Constraint::Image(ImageConstraint { params })
    }

    pub fn tools(params: LookupParams, version: ToolsVersion) -> Self {
        Constraint::Tools(ToolsConstraint { params, version })
    }

    pub fn params(&self) -> &LookupParams {
        match self {
            Constraint::Image(c) => &c.params,
            Constraint::Tools(c) => &c.params,
        }
    }

    pub fn cloud(&self) -> &CloudSpec {
        self.params().cloud()
    }

    /// Index `datatype` whose products documents hold this kind of record.
    pub fn data_type(&self) -> &'static str {
        match self {
            Constraint::Image(_) => IMAGE_DATA_TYPE,
            Constraint::Tools(_) => TOOLS_DATA_TYPE,
        }
    }

    fn namespace_and_kind(&self) -> (&'static str, Option<&'static str>) {
        match self {
            Constraint::Image(_) => (IMAGE_NAMESPACE, Some(IMAGE_KIND)),
            Constraint::Tools(_) => (TOOLS_NAMESPACE, None),
        }
    }

    /// Product ids to probe, one per requested arch, in arch order.
    pub fn ids(&self) -> Result<Vec<String>> {
        let params = self.params();
        let version = series::version(params.series())?;

        let stream = params.stream();
        if stream.contains(':') || stream.chars().any(char::is_whitespace) {
            return Err(StreamsError::InvalidConstraint(format!(
                "stream {stream:?} cannot be used in a product id"
            )));
        }

        let (namespace, kind) = self.namespace_and_kind();
        let prefix = if is_default_stream(stream) {
            namespace.to_string()
        } else {
            format!("{namespace}.{stream}")
        };

        params
            .arches()
            .iter()
            .map(|arch| {
                if arch.is_empty() || arch.contains(':') {
                    return Err(StreamsError::InvalidConstraint(format!(
                        "architecture {arch:?} cannot be used in a product id"
                    )));
                }
                Ok(match kind {
                    Some(kind) => format!("{prefix}:{kind}:{version}:{arch}"),
                    None => format!("{prefix}:{version}:{arch}"),
                })
            })
            .collect()
    }

    /// Instantiate the record type of this constraint, or `None` when the
    /// item lacks the fields that record needs.
    pub fn build_record(&self, found: &CatalogItem<'_>) -> Option<ResultRecord> {
        match self {
            Constraint::Image(_) => {
                let id = found.item.id()?;
                Some(ResultRecord::Image(ImageMetadata::from_fields(
                    id,
                    found.arch,
                    found.fields,
                )))
            }
            Constraint::Tools(c) => {
                let version = found.item.version()?;
                let path = found.item.path()?;
                // Products without `release` name their series through the
                // version segment of the product id.
                let release = found
                    .fields
                    .release
                    .as_deref()
                    .or_else(|| {
                        found
                            .product_id
                            .rsplit(':')
                            .nth(1)
                            .and_then(series::series_for_version)
                    })
                    .unwrap_or(c.params.series());
                Some(ResultRecord::Tools(ToolsMetadata::new(
                    release,
                    version,
                    found.arch,
                    found.item.size().unwrap_or_default(),
                    path,
                    found.fields.ftype.clone().unwrap_or_default(),
                    found.item.sha256().unwrap_or_default(),
                )))
            }
        }
    }

    /// Final filter over a built record.
    pub fn accepts(&self, record: &ResultRecord) -> bool {
        let params = self.params();
        if !params.arches().iter().any(|arch| arch == record.arch()) {
            return false;
        }

        let cloud = params.cloud();
        if !cloud.is_empty()
            && let Some(scope) = record.cloud()
            && !scope.matches(cloud)
        {
            return false;
        }

        match (self, record) {
            (Constraint::Image(_), ResultRecord::Image(_)) => true,
            (Constraint::Tools(c), ResultRecord::Tools(tools)) => {
                tools.release() == params.series() && c.version.matches(tools.version())
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn precise(arches: &[&str]) -> LookupParams {
        LookupParams::new(CloudSpec::default(), "precise", arches.iter().copied())
    }

    #[test]
    fn id_with_default_stream() {
        let ids = Constraint::image(precise(&["amd64"])).ids().unwrap();
        assert_eq!(ids, vec!["com.ubuntu.cloud:server:12.04:amd64"]);
    }

    #[test]
    fn released_is_the_default_stream() {
        let ids = Constraint::image(precise(&["amd64"]).with_stream("released"))
            .ids()
            .unwrap();
        assert_eq!(ids, vec!["com.ubuntu.cloud:server:12.04:amd64"]);
    }

    #[test]
    fn id_with_daily_stream() {
        let ids = Constraint::image(precise(&["amd64"]).with_stream("daily"))
            .ids()
            .unwrap();
        assert_eq!(ids, vec!["com.ubuntu.cloud.daily:server:12.04:amd64"]);
    }

    #[test]
    fn ids_follow_arch_order() {
        let ids = Constraint::image(precise(&["amd64", "arm"])).ids().unwrap();
        assert_eq!(
            ids,
            vec![
                "com.ubuntu.cloud:server:12.04:amd64",
                "com.ubuntu.cloud:server:12.04:arm"
            ]
        );

        let ids = Constraint::image(precise(&["i386", "amd64"]).with_stream("daily"))
            .ids()
            .unwrap();
        assert_eq!(
            ids,
            vec![
                "com.ubuntu.cloud.daily:server:12.04:i386",
                "com.ubuntu.cloud.daily:server:12.04:amd64"
            ]
        );
    }

    #[test]
    fn non_default_release() {
        let params = LookupParams::new(CloudSpec::default(), "lucid", ["amd64"]).with_stream("daily");
        let ids = Constraint::image(params).ids().unwrap();
        assert_eq!(ids, vec!["com.ubuntu.cloud.daily:server:10.04:amd64"]);
    }

    #[test]
    fn tools_ids_have_no_kind_segment() {
        let ids = Constraint::tools(precise(&["amd64", "i386"]), ToolsVersion::Any)
            .ids()
            .unwrap();
        assert_eq!(
            ids,
            vec!["com.ubuntu.juju:12.04:amd64", "com.ubuntu.juju:12.04:i386"]
        );
    }

    #[test]
    fn unknown_series() {
        let params = LookupParams::new(CloudSpec::default(), "nosuchseries", ["amd64"]);
        let err = Constraint::image(params).ids().unwrap_err();
        assert!(matches!(err, StreamsError::UnknownSeries(ref s) if s == "nosuchseries"));
    }

    #[test]
    fn zero_arches_yield_zero_ids() {
        let ids = Constraint::image(precise(&[])).ids().unwrap();
        assert!(ids.is_empty());
    }

    #[test]
    fn malformed_stream_is_rejected() {
        let err = Constraint::image(precise(&["amd64"]).with_stream("da:ily"))
            .ids()
            .unwrap_err();
        assert!(matches!(err, StreamsError::InvalidConstraint(_)));
    }

    #[test]
    fn ids_are_deterministic() {
        let constraint = Constraint::image(precise(&["amd64", "arm", "i386"]).with_stream("daily"));
        assert_eq!(constraint.ids().unwrap(), constraint.ids().unwrap());
    }

    #[test]
    fn tools_version_filters() {
        assert!(ToolsVersion::Any.matches("1.13.0"));
        assert!(ToolsVersion::Exact("1.13.0".into()).matches("1.13.0"));
        assert!(!ToolsVersion::Exact("1.13.0".into()).matches("1.13.1"));
        assert!(ToolsVersion::Major { major: 1, minor: None }.matches("1.11.4"));
        assert!(ToolsVersion::Major { major: 1, minor: Some(13) }.matches("1.13-beta1"));
        assert!(!ToolsVersion::Major { major: 2, minor: None }.matches("1.13.0"));
    }

    #[test]
    fn accepts_filters_region_and_arch() {
        let cloud = CloudSpec::new("us-east-1", "https://ec2.us-east-1.amazonaws.com");
        let constraint = Constraint::image(LookupParams::new(cloud.clone(), "precise", ["amd64"]));

        let inside = ResultRecord::Image(ImageMetadata::new("ami-1", "amd64", &cloud));
        let elsewhere = ResultRecord::Image(ImageMetadata::new(
            "ami-2",
            "amd64",
            &CloudSpec::new("us-west-1", "https://ec2.us-west-1.amazonaws.com"),
        ));
        let wrong_arch = ResultRecord::Image(ImageMetadata::new("ami-3", "arm", &cloud));

        assert!(constraint.accepts(&inside));
        assert!(!constraint.accepts(&elsewhere));
        assert!(!constraint.accepts(&wrong_arch));
    }

    #[test]
    fn empty_cloud_accepts_any_region() {
        let constraint = Constraint::image(precise(&["amd64"]));
        let record = ResultRecord::Image(ImageMetadata::new(
            "ami-2",
            "amd64",
            &CloudSpec::new("us-west-1", "https://ec2.us-west-1.amazonaws.com"),
        ));
        assert!(constraint.accepts(&record));
    }
}
