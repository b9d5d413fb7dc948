//! Contains types for using resource kinds not known at compile-time.
pub use crate::discovery::ApiResource;
use crate::{
    gvk::{GroupVersionKind, ParseGroupVersionError},
    metadata::{ListMeta, ObjectMeta, TypeMeta},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures to read type information off an object
#[derive(Debug, Error)]
pub enum TypeMetaError {
    /// The object carries no apiVersion/kind
    #[error("object is missing apiVersion and kind")]
    Missing,

    /// The apiVersion is not a valid group version
    #[error("invalid apiVersion: {0}")]
    InvalidApiVersion(#[source] ParseGroupVersionError),
}

/// An object that can describe its own kind and namespace
///
/// This is what the resource resolver needs to route an arbitrary object to the api resource serving it.
pub trait ObjectKind {
    /// The group, version and kind of the object
    fn gvk(&self) -> Result<GroupVersionKind, TypeMetaError>;

    /// The namespace set on the object, if any
    fn namespace(&self) -> Option<&str>;
}

impl<K> ObjectKind for K
where
    K: k8s_openapi::Metadata<Ty = ObjectMeta>,
{
    fn gvk(&self) -> Result<GroupVersionKind, TypeMetaError> {
        Ok(GroupVersionKind::gvk(K::GROUP, K::VERSION, K::KIND))
    }

    fn namespace(&self) -> Option<&str> {
        self.metadata().namespace.as_deref()
    }
}

/// A dynamic representation of a kubernetes object
///
/// This will work with any non-list type object.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DynamicObject {
    /// The type fields, not always present
    #[serde(flatten, default)]
    pub types: Option<TypeMeta>,
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// All other keys
    #[serde(flatten)]
    pub data: serde_json::Value,
}

impl DynamicObject {
    /// Create a DynamicObject with minimal values set from ApiResource.
    #[must_use]
    pub fn new(name: &str, resource: &ApiResource) -> Self {
        Self {
            types: Some(TypeMeta {
                api_version: resource.api_version.to_string(),
                kind: resource.kind.to_string(),
            }),
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..Default::default()
            },
            data: Default::default(),
        }
    }

    /// Attach dynamic data to a DynamicObject
    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    /// Attach a namespace to a DynamicObject
    #[must_use]
    pub fn within(mut self, ns: &str) -> Self {
        self.metadata.namespace = Some(ns.into());
        self
    }
}

impl ObjectKind for DynamicObject {
    fn gvk(&self) -> Result<GroupVersionKind, TypeMetaError> {
        self.types
            .as_ref()
            .ok_or(TypeMetaError::Missing)?
            .gvk()
            .map_err(TypeMetaError::InvalidApiVersion)
    }

    fn namespace(&self) -> Option<&str> {
        self.metadata.namespace.as_deref()
    }
}

/// A generic Kubernetes object list
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ObjectList<T>
where
    T: Clone,
{
    /// ListMeta - only really used for its `resourceVersion`
    #[serde(default)]
    pub metadata: ListMeta,

    /// The items we are actually interested in.
    #[serde(bound(deserialize = "Vec<T>: Deserialize<'de>"))]
    pub items: Vec<T>,
}

impl<T: Clone> ObjectList<T> {
    /// `iter` returns an Iterator over the elements of this ObjectList
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

impl<T: Clone> IntoIterator for ObjectList<T> {
    type IntoIter = ::std::vec::IntoIter<Self::Item>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
