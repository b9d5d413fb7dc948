//! Api discovery: the provider seam, the memoizing cache and the preferred resource aggregation.
//!
//! Everything here is written against the [`Discover`] trait:
//! - [`Client`](crate::Client) implements it by talking to the apiserver
//! - [`MemCacheDiscovery`] implements it by remembering what another [`Discover`] returned
//!
//! The aggregations ([`Discover::server_resources`], [`Discover::server_preferred_resources`],
//! [`Discover::server_preferred_namespaced_resources`]) are provided on top of the two
//! primitive listings, so they work the same against a raw client or a cache.
use std::sync::Arc;

use async_trait::async_trait;
pub use kubedisc_core::discovery::{
    APIGroup, APIGroupList, APIResource, APIResourceList, ApiResource, GroupVersionForDiscovery, VersionInfo,
};
use kubedisc_core::{
    schema::{ApiDeclaration, OpenApiDocument},
    GroupVersion,
};

use crate::Result;

mod memcache;
pub mod preferred;
#[cfg(test)] pub(crate) mod test_utils;

pub use memcache::MemCacheDiscovery;

/// A source of api discovery information
///
/// Every call may fail with whatever transport or decoding error the provider hits.
#[async_trait]
pub trait Discover: Send + Sync {
    /// Lists every api group the server serves, with their versions in server order
    async fn server_groups(&self) -> Result<Arc<APIGroupList>>;

    /// Lists the resources served under one group version (`"v1"` or `"group/version"`)
    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<Arc<APIResourceList>>;

    /// Returns server build and version information
    async fn server_version(&self) -> Result<Arc<VersionInfo>>;

    /// Returns the legacy swagger declaration of one group version
    async fn swagger_schema(&self, version: &GroupVersion) -> Result<Arc<ApiDeclaration>>;

    /// Returns the cluster wide OpenAPI v2 document
    async fn openapi_schema(&self) -> Result<Arc<OpenApiDocument>>;

    /// Lists the resources of every version of every group, failing on the first error
    async fn server_resources(&self) -> Result<Vec<Arc<APIResourceList>>> {
        preferred::server_resources(self).await
    }

    /// Lists every resource once, at the version its group prefers
    ///
    /// See [`preferred::server_preferred_resources`].
    async fn server_preferred_resources(&self) -> Result<Vec<APIResourceList>> {
        preferred::server_preferred_resources(self).await
    }

    /// Like [`Discover::server_preferred_resources`], keeping only namespaced resources
    async fn server_preferred_namespaced_resources(&self) -> Result<Vec<APIResourceList>> {
        preferred::server_preferred_namespaced_resources(self).await
    }
}

/// A [`Discover`] that remembers answers until told to forget them
#[async_trait]
pub trait CachedDiscovery: Discover {
    /// Whether cached answers are trustworthy without invalidation
    fn fresh(&self) -> bool;

    /// Forget everything, so the next queries go to the underlying provider
    async fn invalidate(&self);
}

#[async_trait]
impl<D> Discover for Arc<D>
where
    D: Discover + ?Sized,
{
    async fn server_groups(&self) -> Result<Arc<APIGroupList>> {
        (**self).server_groups().await
    }

    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<Arc<APIResourceList>> {
        (**self).server_resources_for_group_version(group_version).await
    }

    async fn server_version(&self) -> Result<Arc<VersionInfo>> {
        (**self).server_version().await
    }

    async fn swagger_schema(&self, version: &GroupVersion) -> Result<Arc<ApiDeclaration>> {
        (**self).swagger_schema(version).await
    }

    async fn openapi_schema(&self) -> Result<Arc<OpenApiDocument>> {
        (**self).openapi_schema().await
    }
}

#[async_trait]
impl<D> CachedDiscovery for Arc<D>
where
    D: CachedDiscovery + ?Sized,
{
    fn fresh(&self) -> bool {
        (**self).fresh()
    }

    async fn invalidate(&self) {
        (**self).invalidate().await
    }
}
