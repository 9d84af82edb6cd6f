use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;

use super::schema::SchemaNode;
pub use crate::parse::security::SecurityRequirement;
pub use crate::parse::spec::ExternalDocs;

/// HTTP method of a documented operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Every supported method, in the order path items are walked.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

/// A path, query, header, or cookie parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    pub deprecated: bool,

    pub schema: SchemaNode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, serde_json::Value>,
}

/// The payload description for one media type.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct MediaContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, serde_json::Value>,
}

/// A request body, keyed by media type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub required: bool,

    pub content: IndexMap<String, MediaContent>,
}

/// One documented response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<IndexMap<String, MediaContent>>,
}

/// Kind of a security scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SecurityType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
    #[serde(rename = "unknown")]
    Unknown,
}

/// A security scheme declared by the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySchema {
    #[serde(rename = "type")]
    pub scheme_type: SecurityType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearer_format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// OAuth2 scopes across all flows, scope → description.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub scopes: IndexMap<String, String>,
}

/// Security schemes by name, shared between a spec and its endpoints.
pub type SecuritySchemas = Arc<IndexMap<String, SecuritySchema>>;

/// One parsed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub method: HttpMethod,

    /// The raw path template, e.g. `/users/{id}`.
    pub path: String,

    pub deprecated: bool,

    /// Never empty.
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_docs: Option<ExternalDocs>,

    pub parameters: Vec<Parameter>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBody>,

    pub responses: IndexMap<String, ResponseSchema>,

    pub base_url: String,

    /// Security declared on the operation itself. `None` inherits the
    /// document's requirements; `Some(vec![])` explicitly disables auth.
    pub security: Option<Vec<SecurityRequirement>>,

    /// The requirements that apply after inheritance. Empty means no auth.
    pub effective_security: Vec<SecurityRequirement>,

    pub security_schemas: SecuritySchemas,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    /// Navigable path assigned by the navigation generator.
    pub nav_path: String,
}

impl Endpoint {
    /// The tag this endpoint is grouped under in navigation.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or_default()
    }

    /// Requirements are alternatives; an empty one allows anonymous access.
    pub fn requires_auth(&self) -> bool {
        !self.effective_security.is_empty()
            && self.effective_security.iter().all(|req| !req.is_empty())
    }
}
