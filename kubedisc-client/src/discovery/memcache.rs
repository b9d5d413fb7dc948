use std::{
    collections::{hash_map::Entry, HashMap},
    future::Future,
    sync::Arc,
};

use async_trait::async_trait;
use kubedisc_core::{
    discovery::{APIGroupList, APIResourceList, VersionInfo},
    schema::{ApiDeclaration, OpenApiDocument},
    GroupVersion,
};
use tokio::sync::Mutex;

use super::{CachedDiscovery, Discover};
use crate::Result;

/// A [`Discover`] that answers every query from memory after the first time it was asked
///
/// Groups, resource lists per group version, swagger declarations per group version,
/// the OpenAPI document and the server version are each fetched from the wrapped provider
/// at most once until [`CachedDiscovery::invalidate`] is called. Answers are shared: a
/// cache hit hands out the same [`Arc`] as the fetch that filled it.
///
/// A failed fetch is never remembered; the next call asks the provider again.
///
/// All operations are serialized on one lock which is held across the provider round-trip,
/// so concurrent callers asking for the same thing cause a single fetch.
pub struct MemCacheDiscovery<D> {
    inner: D,
    cache: Mutex<Cache>,
}

#[derive(Default)]
struct Cache {
    server_groups: Option<Arc<APIGroupList>>,
    server_resources: HashMap<String, Arc<APIResourceList>>,
    schemas: HashMap<String, Arc<ApiDeclaration>>,
    schema: Option<Arc<OpenApiDocument>>,
    server_version: Option<Arc<VersionInfo>>,
}

impl<D: Discover> MemCacheDiscovery<D> {
    /// Wrap a provider with an empty cache
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// The wrapped provider, for queries that should bypass the cache
    pub fn inner(&self) -> &D {
        &self.inner
    }

    /// Drop the cache and return the wrapped provider
    pub fn into_inner(self) -> D {
        self.inner
    }
}

async fn read_through<T, F>(slot: &mut Option<Arc<T>>, what: &str, fetch: F) -> Result<Arc<T>>
where
    F: Future<Output = Result<Arc<T>>>,
{
    if let Some(cached) = slot {
        tracing::trace!("discovery cache hit for {what}");
        return Ok(cached.clone());
    }
    tracing::debug!("discovery cache miss for {what}");
    let fetched = fetch.await?;
    *slot = Some(fetched.clone());
    Ok(fetched)
}

async fn read_through_keyed<T, F>(
    map: &mut HashMap<String, Arc<T>>,
    what: &str,
    key: String,
    fetch: F,
) -> Result<Arc<T>>
where
    F: Future<Output = Result<Arc<T>>>,
{
    match map.entry(key) {
        Entry::Occupied(e) => {
            tracing::trace!("discovery cache hit for {what} {}", e.key());
            Ok(e.get().clone())
        }
        Entry::Vacant(e) => {
            tracing::debug!("discovery cache miss for {what} {}", e.key());
            let fetched = fetch.await?;
            e.insert(fetched.clone());
            Ok(fetched)
        }
    }
}

#[async_trait]
impl<D: Discover> Discover for MemCacheDiscovery<D> {
    async fn server_groups(&self) -> Result<Arc<APIGroupList>> {
        let mut cache = self.cache.lock().await;
        read_through(&mut cache.server_groups, "server groups", self.inner.server_groups()).await
    }

    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<Arc<APIResourceList>> {
        let mut cache = self.cache.lock().await;
        read_through_keyed(
            &mut cache.server_resources,
            "resources of",
            group_version.to_string(),
            self.inner.server_resources_for_group_version(group_version),
        )
        .await
    }

    async fn server_version(&self) -> Result<Arc<VersionInfo>> {
        let mut cache = self.cache.lock().await;
        read_through(&mut cache.server_version, "server version", self.inner.server_version()).await
    }

    async fn swagger_schema(&self, version: &GroupVersion) -> Result<Arc<ApiDeclaration>> {
        let mut cache = self.cache.lock().await;
        read_through_keyed(
            &mut cache.schemas,
            "swagger schema of",
            version.to_string(),
            self.inner.swagger_schema(version),
        )
        .await
    }

    async fn openapi_schema(&self) -> Result<Arc<OpenApiDocument>> {
        let mut cache = self.cache.lock().await;
        read_through(&mut cache.schema, "openapi schema", self.inner.openapi_schema()).await
    }
}

#[async_trait]
impl<D: Discover> CachedDiscovery for MemCacheDiscovery<D> {
    fn fresh(&self) -> bool {
        true
    }

    async fn invalidate(&self) {
        *self.cache.lock().await = Cache::default();
        tracing::debug!("discovery cache invalidated");
    }
}
