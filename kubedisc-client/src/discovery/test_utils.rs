use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use kubedisc_core::{
    discovery::{APIGroup, APIGroupList, APIResource, APIResourceList, GroupVersionForDiscovery, VersionInfo},
    schema::{ApiDeclaration, Info, OpenApiDocument},
    ErrorResponse, GroupVersion,
};

use super::Discover;
use crate::{Error, Result};

/// How often each provider call was made
#[derive(Default, Debug)]
pub struct Calls {
    pub groups: AtomicUsize,
    pub resources: AtomicUsize,
    pub version: AtomicUsize,
    pub swagger: AtomicUsize,
    pub openapi: AtomicUsize,
}

pub fn count(calls: &AtomicUsize) -> usize {
    calls.load(Ordering::SeqCst)
}

/// In-memory discovery provider that counts its calls
#[derive(Default, Debug)]
pub struct FakeDiscovery {
    groups: Vec<APIGroup>,
    resources: HashMap<String, Vec<APIResource>>,
    failures: AtomicUsize,
    delay: Option<Duration>,
    pub calls: Calls,
}

pub fn resource(name: &str, kind: &str, namespaced: bool) -> APIResource {
    APIResource {
        name: name.into(),
        singular_name: name.split('/').next().unwrap_or_default().trim_end_matches('s').into(),
        kind: kind.into(),
        namespaced,
        verbs: vec!["get".into(), "list".into()],
        ..APIResource::default()
    }
}

fn unavailable() -> Error {
    Error::Api(ErrorResponse {
        status: "Failure".into(),
        message: "the server is currently unable to handle the request".into(),
        reason: "ServiceUnavailable".into(),
        code: 503,
    })
}

fn not_found(what: &str) -> Error {
    Error::Api(ErrorResponse {
        status: "Failure".into(),
        message: format!("the server could not find the requested resource {what}"),
        reason: "NotFound".into(),
        code: 404,
    })
}

impl FakeDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a group with the given versions, in that order
    pub fn group(mut self, name: &str, versions: &[&str], preferred: Option<&str>) -> Self {
        let gv = |v: &str| GroupVersionForDiscovery {
            group_version: GroupVersion::gv(name, v).api_version(),
            version: v.into(),
        };
        self.groups.push(APIGroup {
            name: name.into(),
            versions: versions.iter().map(|v| gv(v)).collect(),
            preferred_version: preferred.map(gv),
            ..APIGroup::default()
        });
        self
    }

    /// Serve the given resources under a group version string
    pub fn resources(mut self, group_version: &str, resources: Vec<APIResource>) -> Self {
        self.resources.insert(group_version.into(), resources);
        self
    }

    /// Make the next `n` calls fail with a 503
    pub fn fail_next(self, n: usize) -> Self {
        self.failures.store(n, Ordering::SeqCst);
        self
    }

    /// Sleep before answering every call
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn respond<T>(&self, calls: &AtomicUsize, value: impl FnOnce() -> Result<T>) -> Result<Arc<T>> {
        calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(unavailable());
        }
        value().map(Arc::new)
    }
}

#[async_trait]
impl Discover for FakeDiscovery {
    async fn server_groups(&self) -> Result<Arc<APIGroupList>> {
        self.respond(&self.calls.groups, || {
            Ok(APIGroupList {
                groups: self.groups.clone(),
            })
        })
        .await
    }

    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<Arc<APIResourceList>> {
        self.respond(&self.calls.resources, || {
            let resources = self
                .resources
                .get(group_version)
                .cloned()
                .ok_or_else(|| not_found(group_version))?;
            Ok(APIResourceList {
                group_version: group_version.into(),
                resources,
            })
        })
        .await
    }

    async fn server_version(&self) -> Result<Arc<VersionInfo>> {
        self.respond(&self.calls.version, || {
            Ok(VersionInfo {
                major: "1".into(),
                minor: "33".into(),
                git_version: "v1.33.1".into(),
                ..VersionInfo::default()
            })
        })
        .await
    }

    async fn swagger_schema(&self, version: &GroupVersion) -> Result<Arc<ApiDeclaration>> {
        self.respond(&self.calls.swagger, || {
            Ok(ApiDeclaration {
                swagger_version: "1.2".into(),
                api_version: version.api_version(),
                ..ApiDeclaration::default()
            })
        })
        .await
    }

    async fn openapi_schema(&self) -> Result<Arc<OpenApiDocument>> {
        self.respond(&self.calls.openapi, || {
            Ok(OpenApiDocument {
                swagger: "2.0".into(),
                info: Info {
                    title: "Kubernetes".into(),
                    version: "v1.33.1".into(),
                },
                ..OpenApiDocument::default()
            })
        })
        .await
    }
}
