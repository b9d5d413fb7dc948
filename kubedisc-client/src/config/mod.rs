//! Where to find the apiserver and which namespace to default to
//!
//! Transport concerns (tls, authentication) belong to the service handed to
//! [`Client::new`](crate::Client::new); this only describes the cluster endpoint.
mod incluster_config;

use crate::{client::middleware::BaseUriLayer, error::ConfigError};

/// Cluster endpoint and defaults for a [`Client`](crate::Client)
#[derive(Debug, Clone)]
pub struct Config {
    /// The configured cluster url
    pub cluster_url: http::Uri,
    /// The configured default namespace
    pub default_namespace: String,
}

impl Config {
    /// Config for `cluster_url`, defaulting to the `default` namespace
    pub fn new(cluster_url: http::Uri) -> Self {
        Self {
            cluster_url,
            default_namespace: String::from("default"),
        }
    }

    /// Load the configuration a pod sees from inside the cluster
    ///
    /// The cluster url comes from the `KUBERNETES_SERVICE_HOST` and `KUBERNETES_SERVICE_PORT`
    /// environment variables, the default namespace from the mounted service account.
    pub fn incluster_env() -> Result<Self, ConfigError> {
        let cluster_url = incluster_config::cluster_url_from_env()?;
        let default_namespace = incluster_config::load_default_ns()?;
        tracing::debug!("loaded in-cluster config for {cluster_url} in namespace {default_namespace}");
        Ok(Self {
            cluster_url,
            default_namespace,
        })
    }

    /// A tower layer making every request relative to [`Config::cluster_url`]
    pub fn base_uri_layer(&self) -> BaseUriLayer {
        BaseUriLayer::new(self.cluster_url.clone())
    }
}
