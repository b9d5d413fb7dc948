//! Type information structs for addressing api groups, versions, kinds and resources.
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to parse group version: {0}")]
/// Failed to parse group version.
pub struct ParseGroupVersionError(pub String);

/// Core information about an API Resource.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
    /// Kind
    pub kind: String,
}

impl GroupVersionKind {
    /// Construct from explicit group, version, and kind
    pub fn gvk(group_: &str, version_: &str, kind_: &str) -> Self {
        let version = version_.to_string();
        let group = group_.to_string();
        let kind = kind_.to_string();

        Self { group, version, kind }
    }

    /// Construct from an apiVersion string (`"apps/v1"` or `"v1"`) and a kind
    pub fn try_from_api_version(api_version: &str, kind: &str) -> Result<Self, ParseGroupVersionError> {
        let gv: GroupVersion = api_version.parse()?;
        Ok(gv.with_kind(kind))
    }

    /// Generate the apiVersion string used in a kind's yaml
    pub fn api_version(&self) -> String {
        api_version_from_parts(&self.group, &self.version)
    }

    /// Drop the kind
    pub fn group_version(&self) -> GroupVersion {
        GroupVersion::gv(&self.group, &self.version)
    }
}

impl fmt::Display for GroupVersionKind {
    // matches the upstream `group/version, Kind=kind` rendering
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// Core information about a family of API Resources
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupVersion {
    /// API group
    pub group: String,
    /// Version
    pub version: String,
}

impl GroupVersion {
    /// Construct from explicit group and version
    pub fn gv(group_: &str, version_: &str) -> Self {
        let version = version_.to_string();
        let group = group_.to_string();
        Self { group, version }
    }

    /// Upgrade a GroupVersion to a GroupVersionKind
    pub fn with_kind(self, kind: &str) -> GroupVersionKind {
        GroupVersionKind {
            group: self.group,
            version: self.version,
            kind: kind.into(),
        }
    }

    /// Generate the apiVersion string used in a kind's yaml
    pub fn api_version(&self) -> String {
        api_version_from_parts(&self.group, &self.version)
    }
}

impl FromStr for GroupVersion {
    type Err = ParseGroupVersionError;

    fn from_str(gv: &str) -> Result<Self, Self::Err> {
        let gvsplit = gv.splitn(2, '/').collect::<Vec<_>>();
        let (group, version) = match *gvsplit.as_slice() {
            [g, v] if !v.is_empty() && !v.contains('/') => (g.to_string(), v.to_string()), // standard case
            [v] if !v.is_empty() => ("".to_string(), v.to_string()), // core v1 case
            _ => return Err(ParseGroupVersionError(gv.into())),
        };
        Ok(Self { group, version })
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.api_version())
    }
}

/// A resource name qualified by its group, independent of version.
///
/// Two resources with the same plural in different groups are different `GroupResource`s.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupResource {
    /// API group
    pub group: String,
    /// Plural resource name
    pub resource: String,
}

impl GroupResource {
    /// Construct from explicit group and resource name
    pub fn gr(group_: &str, resource_: &str) -> Self {
        Self {
            group: group_.to_string(),
            resource: resource_.to_string(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            f.write_str(&self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

fn api_version_from_parts(group: &str, version: &str) -> String {
    if group.is_empty() {
        version.to_string()
    } else {
        format!("{group}/{version}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_core_and_grouped_versions() {
        let core: GroupVersion = "v1".parse().unwrap();
        assert_eq!(core, GroupVersion::gv("", "v1"));
        assert_eq!(core.api_version(), "v1");

        let apps: GroupVersion = "apps/v1".parse().unwrap();
        assert_eq!(apps, GroupVersion::gv("apps", "v1"));
        assert_eq!(apps.to_string(), "apps/v1");
    }

    #[test]
    fn rejects_malformed_group_versions() {
        assert!("".parse::<GroupVersion>().is_err());
        assert!("apps/".parse::<GroupVersion>().is_err());
        assert!("a/b/c".parse::<GroupVersion>().is_err());
    }

    #[test]
    fn gvk_formatting() {
        let gvk = GroupVersionKind::gvk("batch", "v1", "Job");
        assert_eq!(gvk.to_string(), "batch/v1, Kind=Job");
        assert_eq!(gvk.group_version(), GroupVersion::gv("batch", "v1"));

        let pod = GroupVersionKind::try_from_api_version("v1", "Pod").unwrap();
        assert_eq!(pod.to_string(), "v1, Kind=Pod");
    }

    #[test]
    fn group_resource_display() {
        assert_eq!(GroupResource::gr("apps", "deployments").to_string(), "deployments.apps");
        assert_eq!(GroupResource::gr("", "pods").to_string(), "pods");
    }
}
