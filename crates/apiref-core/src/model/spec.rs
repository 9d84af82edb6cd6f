use serde::Serialize;

use super::endpoint::{Endpoint, ExternalDocs, SecurityRequirement, SecuritySchemas};
use super::navigation::NavigationNode;
use crate::error::Diagnostic;
use crate::parse::spec::Dialect;

/// A fully parsed specification, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSpec {
    pub dialect: Dialect,
    pub info: ApiInfo,
    pub base_url: String,
    pub endpoints: Vec<Endpoint>,
    pub navigation: Vec<NavigationNode>,
    pub security_schemas: SecuritySchemas,
    /// Document-level security requirements.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// Tags declared at the top of the document, in declared order.
    pub tags: Vec<DeclaredTag>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A tag from the document's top-level `tags` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredTag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,
}

impl ParsedSpec {
    /// Find the endpoint behind a navigable path. When several endpoints
    /// share a path, the last one registered wins.
    pub fn endpoint_by_path(&self, nav_path: &str) -> Option<&Endpoint> {
        self.endpoints.iter().rev().find(|e| e.nav_path == nav_path)
    }

    pub fn endpoint_by_operation_id(&self, operation_id: &str) -> Option<&Endpoint> {
        self.endpoints
            .iter()
            .find(|e| e.operation_id.as_deref() == Some(operation_id))
    }
}

/// Find the endpoint behind a navigable path.
pub fn get_endpoint_by_path<'a>(spec: &'a ParsedSpec, nav_path: &str) -> Option<&'a Endpoint> {
    spec.endpoint_by_path(nav_path)
}

/// Find an endpoint by its `operationId`.
pub fn get_endpoint_by_operation_id<'a>(
    spec: &'a ParsedSpec,
    operation_id: &str,
) -> Option<&'a Endpoint> {
    spec.endpoint_by_operation_id(operation_id)
}
