//! Schema documents served by the apiserver.
//!
//! Two generations exist:
//! - [`ApiDeclaration`]: the legacy swagger 1.2 declaration, one per group version
//! - [`OpenApiDocument`]: the cluster wide OpenAPI v2 document
//!
//! Only the envelope is typed; operations and models stay as raw json.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Legacy swagger 1.2 api declaration for a single group version
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    /// Swagger spec version, `"1.2"`
    #[serde(default)]
    pub swagger_version: String,
    /// The group version this declaration covers
    #[serde(default)]
    pub api_version: String,
    /// Base path of the served apis
    #[serde(default)]
    pub base_path: String,
    /// Path of this declaration relative to the base path
    #[serde(default)]
    pub resource_path: String,
    /// Declared api paths and their operations
    #[serde(default)]
    pub apis: Vec<serde_json::Value>,
    /// Declared models by id
    #[serde(default)]
    pub models: BTreeMap<String, serde_json::Value>,
}

impl ApiDeclaration {
    /// Look up a model by id, e.g. `"v1.Pod"`
    pub fn model(&self, id: &str) -> Option<&serde_json::Value> {
        self.models.get(id)
    }
}

/// Metadata block of an OpenAPI document
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Info {
    /// Document title
    #[serde(default)]
    pub title: String,
    /// Server version the document was generated for
    #[serde(default)]
    pub version: String,
}

/// Cluster wide OpenAPI v2 document
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct OpenApiDocument {
    /// OpenAPI spec version, `"2.0"`
    #[serde(default)]
    pub swagger: String,
    /// Document metadata
    #[serde(default)]
    pub info: Info,
    /// Paths and their operations
    #[serde(default)]
    pub paths: BTreeMap<String, serde_json::Value>,
    /// Schema definitions keyed by fully qualified name
    #[serde(default)]
    pub definitions: BTreeMap<String, serde_json::Value>,
}

impl OpenApiDocument {
    /// Look up a definition by its fully qualified name, e.g. `"io.k8s.api.core.v1.Pod"`
    pub fn definition(&self, name: &str) -> Option<&serde_json::Value> {
        self.definitions.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn openapi_envelope() {
        let doc: OpenApiDocument = serde_json::from_value(json!({
            "swagger": "2.0",
            "info": { "title": "Kubernetes", "version": "v1.33.0" },
            "paths": { "/api/": { "get": {} } },
            "definitions": {
                "io.k8s.api.core.v1.Pod": { "type": "object" }
            },
            "securityDefinitions": {}
        }))
        .unwrap();
        assert_eq!(doc.info.title, "Kubernetes");
        assert_eq!(doc.definition("io.k8s.api.core.v1.Pod").unwrap()["type"], "object");
        assert!(doc.definition("io.k8s.api.core.v1.Node").is_none());
    }

    #[test]
    fn swagger_declaration() {
        let decl: ApiDeclaration = serde_json::from_value(json!({
            "swaggerVersion": "1.2",
            "apiVersion": "v1",
            "basePath": "https://10.0.0.1:443",
            "resourcePath": "/api/v1",
            "apis": [],
            "models": { "v1.Pod": { "id": "v1.Pod" } }
        }))
        .unwrap();
        assert_eq!(decl.resource_path, "/api/v1");
        assert_eq!(decl.model("v1.Pod").unwrap()["id"], "v1.Pod");
    }
}
