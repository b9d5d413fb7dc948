//! Resource scoped api handles for kinds found through discovery
use http::{header, Method, Request};
use kubedisc_core::{discovery::ApiResource, DynamicObject, ObjectList};

use crate::{resolve::ResourceClientFactory, Client, Error, Result};

/// A client for a single discovered resource, optionally scoped to a namespace
///
/// Objects are handled as [`DynamicObject`]s since their types are only known at runtime.
#[derive(Clone)]
pub struct Api {
    client: Client,
    resource: ApiResource,
    namespace: Option<String>,
}

impl Api {
    /// Cluster level resources, or resources viewed across all namespaces
    pub fn all_with(client: Client, resource: &ApiResource) -> Self {
        Self {
            client,
            resource: resource.clone(),
            namespace: None,
        }
    }

    /// Namespaced resource within a given namespace
    ///
    /// The namespace is ignored for cluster scoped resources.
    pub fn namespaced_with(client: Client, ns: &str, resource: &ApiResource) -> Self {
        Self {
            client,
            resource: resource.clone(),
            namespace: Some(ns.to_string()),
        }
    }

    /// Namespaced resource within the default namespace of the client
    pub fn default_namespaced_with(client: Client, resource: &ApiResource) -> Self {
        let ns = client.default_namespace().to_string();
        Self::namespaced_with(client, &ns, resource)
    }

    /// The resource this handle talks to
    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    /// The namespace this handle is scoped to, if any
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Consume self and return the [`Client`]
    pub fn into_client(self) -> Client {
        self.client
    }

    fn collection_url(&self) -> String {
        self.resource.url_path(self.namespace.as_deref())
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}", self.collection_url(), name)
    }

    fn request(&self, method: Method, url: &str, body: Option<&DynamicObject>) -> Result<Request<Vec<u8>>> {
        let mut builder = Request::builder()
            .method(method)
            .uri(url)
            .header(header::ACCEPT, "application/json");
        let body = match body {
            Some(obj) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                serde_json::to_vec(obj).map_err(Error::SerdeError)?
            }
            None => vec![],
        };
        builder.body(body).map_err(Error::HttpError)
    }

    /// Get a named object
    pub async fn get(&self, name: &str) -> Result<DynamicObject> {
        let req = self.request(Method::GET, &self.object_url(name), None)?;
        self.client.request(req).await
    }

    /// List all objects in scope
    pub async fn list(&self) -> Result<ObjectList<DynamicObject>> {
        let req = self.request(Method::GET, &self.collection_url(), None)?;
        self.client.request(req).await
    }

    /// Create an object, returning what the server stored
    pub async fn create(&self, obj: &DynamicObject) -> Result<DynamicObject> {
        let req = self.request(Method::POST, &self.collection_url(), Some(obj))?;
        self.client.request(req).await
    }

    /// Replace a named object, returning what the server stored
    ///
    /// The object should carry the `resourceVersion` it was read at.
    pub async fn replace(&self, name: &str, obj: &DynamicObject) -> Result<DynamicObject> {
        let req = self.request(Method::PUT, &self.object_url(name), Some(obj))?;
        self.client.request(req).await
    }

    /// Delete a named object
    pub async fn delete(&self, name: &str) -> Result<()> {
        let req = self.request(Method::DELETE, &self.object_url(name), None)?;
        self.client.request_text(req).await?;
        Ok(())
    }
}

impl ResourceClientFactory for Client {
    type Client = Api;

    fn resource_client(&self, resource: &ApiResource, namespace: &str) -> Api {
        if resource.namespaced {
            Api::namespaced_with(self.clone(), namespace, resource)
        } else {
            Api::all_with(self.clone(), resource)
        }
    }
}
