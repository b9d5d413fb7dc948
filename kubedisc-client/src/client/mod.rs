//! A basic API client for talking to the discovery endpoints of an apiserver
//!
//! The [`Client`] uses standard kubedisc error handling.
//!
//! It implements [`Discover`](crate::Discover) so it can be put behind a
//! [`MemCacheDiscovery`](crate::MemCacheDiscovery), and it acts as the
//! [`ResourceClientFactory`](crate::ResourceClientFactory) producing [`Api`](crate::Api) handles.
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use k8s_openapi::apimachinery::pkg::apis::meta::v1 as k8s_meta_v1;
use kubedisc_core::{
    discovery::VersionInfo,
    schema::{ApiDeclaration, OpenApiDocument},
    GroupVersion,
};
use serde::de::DeserializeOwned;
use tower::{buffer::Buffer, util::BoxService, BoxError, Service, ServiceExt};

use crate::{error::ErrorResponse, Error, Result};

mod discovery;
pub mod middleware;

/// Client for connecting with a Kubernetes cluster.
///
/// The client is built on top of any [`tower::Service`] that can send
/// [`Request`]s with a [`Full`] body; response bodies are collected before they are handed back.
#[derive(Clone)]
pub struct Client {
    // - `Buffer` for cheap clone
    // - `BoxFuture` for dynamic response future type
    inner: Buffer<Request<Full<Bytes>>, BoxFuture<'static, Result<Response<Bytes>, BoxError>>>,
    default_ns: String,
}

impl Client {
    /// Create a [`Client`] using a custom `Service` stack.
    ///
    /// Use [`Config::base_uri_layer`](crate::Config::base_uri_layer) to make requests relative
    /// to the cluster url.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new<S, B, T>(service: S, default_namespace: T) -> Self
    where
        S: Service<Request<Full<Bytes>>, Response = Response<B>> + Send + 'static,
        S::Future: Send + 'static,
        S::Error: Into<BoxError>,
        B: http_body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
        T: Into<String>,
    {
        // Collect response bodies and use type erased error to avoid type parameters.
        let service = service
            .map_err(|e| -> BoxError { e.into() })
            .and_then(|res: Response<B>| async move {
                let (parts, body) = res.into_parts();
                let bytes = body.collect().await.map_err(Into::<BoxError>::into)?.to_bytes();
                Ok::<_, BoxError>(Response::from_parts(parts, bytes))
            });
        Self {
            inner: Buffer::new(BoxService::new(service), 1024),
            default_ns: default_namespace.into(),
        }
    }

    /// The namespace used when an object does not carry one
    pub fn default_namespace(&self) -> &str {
        &self.default_ns
    }

    /// Perform a raw HTTP request against the API and return the raw response back.
    pub async fn send(&self, request: Request<Full<Bytes>>) -> Result<Response<Bytes>> {
        let mut svc = self.inner.clone();
        let res = svc
            .ready()
            .await
            .map_err(Error::Service)?
            .call(request)
            .await
            .map_err(|err| {
                // Error decorating request
                err.downcast::<Error>()
                    .map(|e| *e)
                    // Error from another middleware
                    .unwrap_or_else(Error::Service)
            })?;
        Ok(res)
    }

    /// Perform a raw HTTP request against the API and deserialize the response
    /// as JSON to some known type.
    pub async fn request<T>(&self, request: Request<Vec<u8>>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let text = self.request_text(request).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::warn!("{}, {:?}", text, e);
            Error::SerdeError(e)
        })
    }

    /// Perform a raw HTTP request against the API and get back the response
    /// as a string
    pub async fn request_text(&self, request: Request<Vec<u8>>) -> Result<String> {
        let res = self.send(request.map(|body| Full::new(Bytes::from(body)))).await?;
        let status = res.status();
        let text = String::from_utf8(res.into_body().to_vec()).map_err(Error::FromUtf8)?;
        handle_api_errors(&text, status)?;

        Ok(text)
    }
}

/// Low level discovery methods using `k8s_openapi` types.
///
/// Consider using [`Discover`](crate::Discover) through a [`MemCacheDiscovery`](crate::MemCacheDiscovery)
/// instead; these always hit the apiserver.
impl Client {
    /// Returns apiserver version.
    pub async fn apiserver_version(&self) -> Result<VersionInfo> {
        self.request(get("/version")?).await
    }

    /// Lists api groups that apiserver serves.
    pub async fn list_api_groups(&self) -> Result<k8s_meta_v1::APIGroupList> {
        self.request(get("/apis")?).await
    }

    /// Lists resources served in given API group.
    ///
    /// `apiversion` is of the form `group/version`, e.g. `"apps/v1"`.
    pub async fn list_api_group_resources(&self, apiversion: &str) -> Result<k8s_meta_v1::APIResourceList> {
        self.request(get(&format!("/apis/{apiversion}"))?).await
    }

    /// Lists versions of `core` a.k.a. `""` legacy API group.
    pub async fn list_core_api_versions(&self) -> Result<k8s_meta_v1::APIVersions> {
        self.request(get("/api")?).await
    }

    /// Lists resources served in particular `core` group version.
    pub async fn list_core_api_resources(&self, version: &str) -> Result<k8s_meta_v1::APIResourceList> {
        self.request(get(&format!("/api/{version}"))?).await
    }

    /// Fetches the legacy swagger 1.2 declaration of a group version.
    pub async fn swagger_schema(&self, gv: &GroupVersion) -> Result<ApiDeclaration> {
        let url = if gv.group.is_empty() {
            format!("/swaggerapi/api/{}", gv.version)
        } else {
            format!("/swaggerapi/apis/{}/{}", gv.group, gv.version)
        };
        self.request(get(&url)?).await
    }

    /// Fetches the cluster wide OpenAPI v2 document.
    pub async fn openapi_schema(&self) -> Result<OpenApiDocument> {
        self.request(get("/openapi/v2")?).await
    }
}

fn get(uri: &str) -> Result<Request<Vec<u8>>> {
    Request::builder()
        .uri(uri)
        .header(http::header::ACCEPT, "application/json")
        .body(vec![])
        .map_err(Error::HttpError)
}

/// Kubernetes returned error handling
///
/// Either kube returned an explicit ApiError struct,
/// or it someohow returned something we couldn't parse as one.
///
/// In either case, present an ApiError upstream.
/// The latter is probably a bug if encountered.
fn handle_api_errors(text: &str, s: StatusCode) -> Result<()> {
    if s.is_client_error() || s.is_server_error() {
        if let Ok(errdata) = serde_json::from_str::<ErrorResponse>(text) {
            tracing::debug!("Unsuccessful: {:?}", errdata);
            Err(Error::Api(errdata))
        } else {
            tracing::warn!("Unsuccessful data error parse: {}", text);
            let ae = ErrorResponse {
                status: s.to_string(),
                code: s.as_u16(),
                message: format!("{:?}", text),
                reason: "Failed to parse error data".into(),
            };
            tracing::debug!("Unsuccessful: {:?} (reconstruct)", ae);
            Err(Error::Api(ae))
        }
    } else {
        Ok(())
    }
}
