use serde::Deserialize;

/// Attributes a catalog may declare at any level of the
/// document -> product -> version -> item hierarchy. The most specific level
/// wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InheritedFields {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub virt: Option<String>,
    #[serde(default)]
    pub root_store: Option<String>,
    /// Alias key into `_aliases.crsn`.
    #[serde(default)]
    pub crsn: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub release: Option<String>,
    #[serde(default)]
    pub ftype: Option<String>,
}

impl InheritedFields {
    /// Fill every field this level leaves unset from `parent`.
    pub fn inherit(&self, parent: &InheritedFields) -> InheritedFields {
        fn pick(own: &Option<String>, parent: &Option<String>) -> Option<String> {
            own.clone().or_else(|| parent.clone())
        }

        InheritedFields {
            region: pick(&self.region, &parent.region),
            endpoint: pick(&self.endpoint, &parent.endpoint),
            virt: pick(&self.virt, &parent.virt),
            root_store: pick(&self.root_store, &parent.root_store),
            crsn: pick(&self.crsn, &parent.crsn),
            arch: pick(&self.arch, &parent.arch),
            release: pick(&self.release, &parent.release),
            ftype: pick(&self.ftype, &parent.ftype),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_values_win() {
        let parent = InheritedFields {
            region: Some("us-east-1".into()),
            virt: Some("pv".into()),
            ..Default::default()
        };
        let child = InheritedFields {
            virt: Some("hvm".into()),
            ..Default::default()
        };

        let merged = child.inherit(&parent);
        assert_eq!(merged.region.as_deref(), Some("us-east-1"));
        assert_eq!(merged.virt.as_deref(), Some("hvm"));
        assert_eq!(merged.endpoint, None);
    }
}
