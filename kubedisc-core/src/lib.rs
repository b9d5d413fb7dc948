//! Types and traits for kubernetes api discovery that need no client
//!
//! The same information here is always re-exported from `kubedisc-client` under `kubedisc_client::core`.
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod discovery;
pub use discovery::ApiResource;

pub mod dynamic;
pub use dynamic::{DynamicObject, ObjectKind, ObjectList, TypeMetaError};

pub mod gvk;
pub use gvk::{GroupResource, GroupVersion, GroupVersionKind, ParseGroupVersionError};

pub mod metadata;
pub use metadata::TypeMeta;

pub mod schema;
pub use schema::{ApiDeclaration, OpenApiDocument};

mod error;
pub use error::ErrorResponse;
