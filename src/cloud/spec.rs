use serde::{Deserialize, Serialize};

/// A provider region as seen by the catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloudSpec {
    #[serde(default)]
    region: String,
    #[serde(default)]
    endpoint: String,
}

impl CloudSpec {
    pub fn new(region: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// An empty spec means "any region".
    pub fn is_empty(&self) -> bool {
        self.region.is_empty() && self.endpoint.is_empty()
    }

    /// Region must be equal; endpoints are compared ignoring a trailing `/`.
    pub fn matches(&self, other: &CloudSpec) -> bool {
        self.region == other.region
            && self.endpoint.trim_end_matches('/') == other.endpoint.trim_end_matches('/')
    }
}

/// What the caller is looking for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupParams {
    cloud: CloudSpec,
    series: String,
    arches: Vec<String>,
    stream: String,
}

impl LookupParams {
    pub fn new<S: Into<String>>(
        cloud: CloudSpec,
        series: impl Into<String>,
        arches: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            cloud,
            series: series.into(),
            arches: arches.into_iter().map(Into::into).collect(),
            stream: String::new(),
        }
    }

    pub fn with_stream(mut self, stream: impl Into<String>) -> Self {
        self.stream = stream.into();
        self
    }

    pub fn cloud(&self) -> &CloudSpec {
        &self.cloud
    }

    /// Release codename, e.g. `precise`.
    pub fn series(&self) -> &str {
        &self.series
    }

    pub fn arches(&self) -> &[String] {
        &self.arches
    }

    /// Release channel; empty for the default channel.
    pub fn stream(&self) -> &str {
        &self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_comparison_ignores_trailing_slash() {
        let a = CloudSpec::new("lcy01", "https://keystone.example.com:443/v2.0/");
        let b = CloudSpec::new("lcy01", "https://keystone.example.com:443/v2.0");
        assert!(a.matches(&b));
        assert!(!a.matches(&CloudSpec::new("lcy02", b.endpoint())));
    }

    #[test]
    fn default_spec_is_empty() {
        assert!(CloudSpec::default().is_empty());
        assert!(!CloudSpec::new("us-east-1", "").is_empty());
    }
}
