//! Error handling in [`kubedisc_client`][crate]
use thiserror::Error;

pub use kubedisc_core::ErrorResponse;
use kubedisc_core::TypeMetaError;

/// Possible errors when working with [`kubedisc_client`][crate]
#[derive(Error, Debug)]
pub enum Error {
    /// ApiError for when things fail
    ///
    /// This can be parsed into as an error handling fallback.
    #[error("ApiError: {0} ({0:?})")]
    Api(#[source] ErrorResponse),

    /// Service error
    #[error("ServiceError: {0}")]
    Service(#[source] tower::BoxError),

    /// UTF-8 Error
    #[error("UTF-8 Error: {0}")]
    FromUtf8(#[source] std::string::FromUtf8Error),

    /// Http based error
    #[error("HttpError: {0}")]
    HttpError(#[source] http::Error),

    /// Common error case when requesting parsing into own structs
    #[error("Error deserializing response: {0}")]
    SerdeError(#[source] serde_json::Error),

    /// Discovery errors
    #[error("Error from discovery: {0}")]
    Discovery(#[source] DiscoveryError),

    /// The object handed to the resolver did not describe its own type
    #[error("Unable to read object type: {0}")]
    TypeMeta(#[source] TypeMetaError),
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when using API discovery
pub enum DiscoveryError {
    #[error("Invalid GroupVersion: {0}")]
    InvalidGroupVersion(String),
    #[error("server is unable to handle {0}")]
    MissingKind(String),
    #[error("unable to fetch resource description for {group_version}: {source}")]
    UnableToFetch {
        group_version: String,
        #[source]
        source: Box<Error>,
    },
}

#[derive(Error, Debug)]
// Redundant with the error messages and machine names
#[allow(missing_docs)]
/// Possible errors when loading config
pub enum ConfigError {
    #[error("Unable to load in cluster config, {hostenv} and {portenv} must be defined")]
    /// One or more required in-cluster config options are missing
    MissingInClusterVariables {
        hostenv: &'static str,
        portenv: &'static str,
    },

    #[error("Unable to load incluster default namespace: {0}")]
    InvalidInClusterNamespace(#[source] std::io::Error),

    #[error("failed to parse cluster url: {0}")]
    ParseClusterUrl(#[source] http::uri::InvalidUri),
}

impl Error {
    /// Whether this is a `404 NotFound` from the apiserver
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api(ae) if ae.code == 404)
    }

    /// Whether this is a `403 Forbidden` from the apiserver
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Error::Api(ae) if ae.code == 403)
    }
}
