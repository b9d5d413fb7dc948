use std::sync::Arc;

use async_trait::async_trait;
use kubedisc_core::{
    discovery::{APIGroup, APIGroupList, APIResourceList, APIVersions, GroupVersionForDiscovery, VersionInfo},
    schema::{ApiDeclaration, OpenApiDocument},
    GroupVersion, ParseGroupVersionError,
};

use super::Client;
use crate::{discovery::Discover, error::DiscoveryError, Error, Result};

#[async_trait]
impl Discover for Client {
    /// Lists the legacy core group (from `/api`) followed by every group under `/apis`.
    ///
    /// A `404` or `403` on either endpoint is treated as an empty listing.
    async fn server_groups(&self) -> Result<Arc<APIGroupList>> {
        let core = tolerate_missing(self.list_core_api_versions().await)?;
        let mut groups = tolerate_missing(self.list_api_groups().await)?.unwrap_or_default();
        if let Some(core) = core.filter(|v| !v.versions.is_empty()) {
            groups.groups.insert(0, legacy_group(core));
        }
        Ok(Arc::new(groups))
    }

    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<Arc<APIResourceList>> {
        let gv: GroupVersion = group_version.parse().map_err(|ParseGroupVersionError(s)| {
            Error::Discovery(DiscoveryError::InvalidGroupVersion(s))
        })?;
        let mut list = if gv.group.is_empty() {
            self.list_core_api_resources(&gv.version).await?
        } else {
            self.list_api_group_resources(&gv.api_version()).await?
        };
        // older apiservers leave this unset
        if list.group_version.is_empty() {
            list.group_version = gv.api_version();
        }
        Ok(Arc::new(list))
    }

    async fn server_version(&self) -> Result<Arc<VersionInfo>> {
        self.apiserver_version().await.map(Arc::new)
    }

    async fn swagger_schema(&self, version: &GroupVersion) -> Result<Arc<ApiDeclaration>> {
        Client::swagger_schema(self, version).await.map(Arc::new)
    }

    async fn openapi_schema(&self) -> Result<Arc<OpenApiDocument>> {
        Client::openapi_schema(self).await.map(Arc::new)
    }
}

fn tolerate_missing<T>(res: Result<T>) -> Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() || e.is_forbidden() => {
            tracing::debug!("ignoring unavailable discovery endpoint: {}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Present the versions under `/api` as the group named `""`, preferring the first one
fn legacy_group(core: APIVersions) -> APIGroup {
    let versions: Vec<_> = core
        .versions
        .into_iter()
        .map(|v| GroupVersionForDiscovery {
            group_version: v.clone(),
            version: v,
        })
        .collect();
    APIGroup {
        name: String::new(),
        preferred_version: versions.first().cloned(),
        versions,
        ..Default::default()
    }
}
