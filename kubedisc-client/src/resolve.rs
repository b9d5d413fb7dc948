//! Routing arbitrary objects to the api resource that serves them
//!
//! Given an object that knows its own group, version and kind, [`client_for_resource`] asks
//! discovery which resource serves that kind and hands back a client scoped to it, in the
//! namespace of the object (or a default).
use kubedisc_core::{discovery::ApiResource, GroupVersionKind, ObjectKind};

use crate::{discovery::Discover, error::DiscoveryError, Error, Result};

/// Builds clients scoped to a single resource and namespace
///
/// Implemented by [`Client`](crate::Client), producing an [`Api`](crate::Api).
pub trait ResourceClientFactory {
    /// The resource scoped client
    type Client;

    /// Create a client for `resource` in `namespace`
    ///
    /// Cluster scoped resources ignore the namespace.
    fn resource_client(&self, resource: &ApiResource, namespace: &str) -> Self::Client;
}

/// Find the resource serving `gvk`
///
/// Scans the resources of the kind's group version and returns the first one of that kind.
pub async fn server_resource_for_gvk<D>(disco: &D, gvk: &GroupVersionKind) -> Result<ApiResource>
where
    D: Discover + ?Sized,
{
    let group_version = gvk.api_version();
    let list = disco
        .server_resources_for_group_version(&group_version)
        .await
        .map_err(|source| {
            Error::Discovery(DiscoveryError::UnableToFetch {
                group_version: group_version.clone(),
                source: Box::new(source),
            })
        })?;

    let found = list
        .resources
        .iter()
        .find(|ar| ar.kind == gvk.kind)
        .ok_or_else(|| Error::Discovery(DiscoveryError::MissingKind(gvk.to_string())))?;
    tracing::debug!("Using resource '{}' for {}", found.name, gvk);
    ApiResource::from_apiresource(found, &group_version)
        .map_err(|e| Error::Discovery(DiscoveryError::InvalidGroupVersion(e.0)))
}

/// Build a client for the resource serving `obj`
///
/// The client is scoped to the namespace of the object, or to `default_ns` when the object has none.
/// Nothing is cached here; put a [`MemCacheDiscovery`](crate::MemCacheDiscovery) behind `disco`
/// to avoid repeated discovery round-trips.
pub async fn client_for_resource<F, D, K>(
    factory: &F,
    disco: &D,
    obj: &K,
    default_ns: &str,
) -> Result<F::Client>
where
    F: ResourceClientFactory,
    D: Discover + ?Sized,
    K: ObjectKind,
{
    let gvk = obj.gvk().map_err(Error::TypeMeta)?;
    let resource = server_resource_for_gvk(disco, &gvk).await?;
    let namespace = obj.namespace().filter(|ns| !ns.is_empty()).unwrap_or(default_ns);
    tracing::debug!("Fetching client for {} namespace={}", resource.plural, namespace);
    Ok(factory.resource_client(&resource, namespace))
}
