//! Type information structs for API discovery
use crate::gvk::{GroupVersion, GroupVersionKind, ParseGroupVersionError};
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1::{
    APIGroup, APIGroupList, APIResource, APIResourceList, APIVersions, GroupVersionForDiscovery,
};
pub use k8s_openapi::apimachinery::pkg::version::Info as VersionInfo;
use serde::{Deserialize, Serialize};

/// Information about a Kubernetes API resource
///
/// This is the resolved form of an [`APIResource`] entry from a discovery listing;
/// enough to address the resource over http.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Resource group, empty for core group.
    pub group: String,
    /// group version
    pub version: String,
    /// apiVersion of the resource (v1 for core group,
    /// groupName/groupVersions for other).
    pub api_version: String,
    /// Singular PascalCase name of the resource
    pub kind: String,
    /// Plural name of the resource
    pub plural: String,
    /// Whether objects of this resource live in a namespace
    pub namespaced: bool,
}

impl ApiResource {
    /// Creates an ApiResource from group, version, kind and plural name.
    pub fn new(gvk: &GroupVersionKind, plural: &str, namespaced: bool) -> Self {
        ApiResource {
            api_version: gvk.api_version(),
            group: gvk.group.clone(),
            version: gvk.version.clone(),
            kind: gvk.kind.clone(),
            plural: plural.to_string(),
            namespaced,
        }
    }

    /// Creates an `ApiResource` from a discovered [`APIResource`] and the group version it was listed under.
    ///
    /// Group and version overrides set on the entry itself win over the listing's group version.
    pub fn from_apiresource(ar: &APIResource, group_version: &str) -> Result<Self, ParseGroupVersionError> {
        let gv: GroupVersion = group_version.parse()?;
        let gv = GroupVersion {
            group: ar.group.clone().unwrap_or(gv.group),
            version: ar.version.clone().unwrap_or(gv.version),
        };
        Ok(ApiResource {
            api_version: gv.api_version(),
            group: gv.group,
            version: gv.version,
            kind: ar.kind.clone(),
            plural: ar.name.clone(),
            namespaced: ar.namespaced,
        })
    }

    /// The kind this resource serves
    pub fn gvk(&self) -> GroupVersionKind {
        GroupVersionKind::gvk(&self.group, &self.version, &self.kind)
    }

    /// Creates a url path for http requests for this resource
    ///
    /// The namespace segment is only emitted for namespaced resources.
    pub fn url_path(&self, namespace: Option<&str>) -> String {
        let n = match namespace {
            Some(ns) if self.namespaced && !ns.is_empty() => format!("namespaces/{ns}/"),
            _ => "".into(),
        };
        format!(
            "/{group}/{api_version}/{namespaces}{plural}",
            group = if self.group.is_empty() { "api" } else { "apis" },
            api_version = self.api_version,
            namespaces = n,
            plural = self.plural
        )
    }
}

/// Whether a discovered resource name refers to a subresource (e.g. `pods/status`)
pub fn is_subresource(name: &str) -> bool {
    name.contains('/')
}
