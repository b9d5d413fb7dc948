//! Set base URI of requests.
use http::{uri, Request};
use tower::{Layer, Service};

/// Layer that applies [`BaseUri`] which makes all requests relative to the URI.
///
/// Path in the base URI is preseved.
#[derive(Debug, Clone)]
pub struct BaseUriLayer {
    base_uri: http::Uri,
}

impl BaseUriLayer {
    /// Set base URI of requests.
    pub fn new(base_uri: http::Uri) -> Self {
        Self { base_uri }
    }
}

impl<S> Layer<S> for BaseUriLayer {
    type Service = BaseUri<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BaseUri {
            base_uri: self.base_uri.clone(),
            inner,
        }
    }
}

/// Middleware that sets base URI so that all requests are relative to it.
#[derive(Debug, Clone)]
pub struct BaseUri<S> {
    base_uri: http::Uri,
    inner: S,
}

impl<S, ReqBody> Service<Request<ReqBody>> for BaseUri<S>
where
    S: Service<Request<ReqBody>>,
{
    type Error = S::Error;
    type Future = S::Future;
    type Response = S::Response;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let (mut parts, body) = req.into_parts();
        parts.uri = join_base_uri(&self.base_uri, parts.uri.path_and_query());
        self.inner.call(Request::from_parts(parts, body))
    }
}

// Join base URI and Path+Query, preserving any path in the base.
fn join_base_uri(base_uri: &http::Uri, req_pandq: Option<&uri::PathAndQuery>) -> http::Uri {
    let mut parts = base_uri.clone().into_parts();
    let joined = match (base_uri.path_and_query(), req_pandq) {
        // `PathAndQuery` always starts with a slash, so only the base needs trimming
        (Some(base), Some(req)) => format!("{}{}", base.path().trim_end_matches('/'), req),
        (Some(base), None) => base.as_str().to_string(),
        (None, Some(req)) => req.as_str().to_string(),
        (None, None) => "/".to_string(),
    };
    match joined.parse::<uri::PathAndQuery>() {
        Ok(pandq) => parts.path_and_query = Some(pandq),
        Err(err) => tracing::warn!("keeping base path, unable to join {joined}: {err}"),
    }
    match http::Uri::from_parts(parts) {
        Ok(uri) => uri,
        Err(err) => {
            tracing::warn!("sending request to {base_uri}, unable to rebuild uri with {joined}: {err}");
            base_uri.clone()
        }
    }
}
