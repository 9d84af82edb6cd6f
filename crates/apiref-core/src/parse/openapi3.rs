//! The OpenAPI 3.0 / 3.1 object model, as read from a resolved document.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::HttpMethod;

use super::schema::SchemaOrRef;
use super::security::{SecurityRequirement, SecurityScheme};
use super::spec::{ExternalDocs, Info, OrInvalid, Tag};

/// Top-level OpenAPI 3.x specification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenApi3Spec {
    pub info: Info,

    #[serde(default)]
    pub servers: Vec<Server>,

    pub paths: IndexMap<String, OrInvalid<PathItem>>,

    pub components: Option<Components>,

    #[serde(default)]
    pub tags: Vec<OrInvalid<Tag>>,

    pub security: Option<Vec<SecurityRequirement>>,
}

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerVariable {
    pub default: String,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(default)]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    /// The server URL with every `{variable}` replaced by its default.
    pub fn expanded_url(&self) -> String {
        self.variables
            .iter()
            .fold(self.url.clone(), |url, (name, var)| {
                url.replace(&format!("{{{name}}}"), &var.default)
            })
    }
}

/// Components object. Only security schemes are read directly; everything
/// else is reached through resolved references.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Components {
    #[serde(rename = "securitySchemes", default)]
    pub security_schemes: IndexMap<String, OrInvalid<SecurityScheme>>,
}

/// A path item, containing operations keyed by HTTP method.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    pub get: Option<OrInvalid<Operation>>,
    pub post: Option<OrInvalid<Operation>>,
    pub put: Option<OrInvalid<Operation>>,
    pub patch: Option<OrInvalid<Operation>>,
    pub delete: Option<OrInvalid<Operation>>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&OrInvalid<Operation>> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
        }
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,

    pub summary: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(rename = "externalDocs")]
    pub external_docs: Option<OrInvalid<ExternalDocs>>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    pub deprecated: Option<bool>,

    pub security: Option<Vec<SecurityRequirement>>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

/// An API parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub deprecated: Option<bool>,

    pub schema: Option<SchemaOrRef>,

    /// Alternative to `schema` for complex serializations.
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    pub example: Option<serde_json::Value>,

    #[serde(default)]
    pub examples: IndexMap<String, serde_json::Value>,
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Box<Parameter>),
    Invalid(serde_json::Value),
}

/// A media type object.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrRef>,

    pub example: Option<serde_json::Value>,

    #[serde(default)]
    pub examples: IndexMap<String, serde_json::Value>,
}

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
    Invalid(serde_json::Value),
}

/// A response definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    pub content: Option<IndexMap<String, MediaType>>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
    Invalid(serde_json::Value),
}
