//! Memoizing api discovery for Kubernetes
//!
//! This crate sits in front of the discovery endpoints of an apiserver and provides:
//!
//! - [`MemCacheDiscovery`]: a read-through cache over any [`Discover`] provider,
//!   serving every query at most once until it is invalidated
//! - [`discovery::preferred`]: reduction of all served group versions into one preferred listing per resource
//! - [`resolve`]: mapping an arbitrary object to the resource serving its kind, and a client scoped to it
//!
//! ```rust,no_run
//! use kubedisc_client::{Client, Config, Discover, MemCacheDiscovery};
//! use tower::ServiceBuilder;
//!
//! # async fn doc<S>(connector: S) -> Result<(), Box<dyn std::error::Error>>
//! # where
//! #     S: tower::Service<http::Request<http_body_util::Full<bytes::Bytes>>, Response = http::Response<http_body_util::Full<bytes::Bytes>>> + Send + 'static,
//! #     S::Future: Send + 'static,
//! #     S::Error: Into<tower::BoxError>,
//! # {
//! let config = Config::new("https://10.0.0.1:6443".parse()?);
//! let service = ServiceBuilder::new()
//!     .layer(config.base_uri_layer())
//!     .service(connector);
//! let client = Client::new(service, config.default_namespace);
//!
//! let discovery = MemCacheDiscovery::new(client);
//! for list in discovery.server_preferred_resources().await? {
//!     for res in &list.resources {
//!         println!("{} {}", list.group_version, res.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod api;
pub mod client;
pub mod config;
pub mod discovery;
pub mod error;
pub mod resolve;

#[doc(inline)] pub use api::Api;
#[doc(inline)] pub use client::Client;
#[doc(inline)] pub use config::Config;
#[doc(inline)]
pub use discovery::{CachedDiscovery, Discover, MemCacheDiscovery};
#[doc(inline)] pub use error::Error;
#[doc(inline)]
pub use resolve::{client_for_resource, server_resource_for_gvk, ResourceClientFactory};

/// Re-exports from kubedisc-core
pub use kubedisc_core as core;

/// Convient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
