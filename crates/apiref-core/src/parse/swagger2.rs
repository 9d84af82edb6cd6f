//! The Swagger 2.0 object model, as read from a resolved document.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::model::HttpMethod;

use super::schema::{SchemaOrRef, SchemaType, SimpleSchema};
use super::security::{SecurityRequirement, Swagger2SecurityScheme};
use super::spec::{ExternalDocs, Info, OrInvalid, Tag};

/// Top-level Swagger 2.0 specification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Swagger2Spec {
    pub info: Info,

    pub host: Option<String>,

    #[serde(rename = "basePath")]
    pub base_path: Option<String>,

    #[serde(default)]
    pub schemes: Vec<String>,

    #[serde(default)]
    pub consumes: Vec<String>,

    pub paths: IndexMap<String, OrInvalid<PathItem>>,

    #[serde(rename = "securityDefinitions", default)]
    pub security_definitions: IndexMap<String, OrInvalid<Swagger2SecurityScheme>>,

    pub security: Option<Vec<SecurityRequirement>>,

    #[serde(default)]
    pub tags: Vec<OrInvalid<Tag>>,
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

    /// Overrides the document-level `consumes` when present.
    pub consumes: Option<Vec<String>>,

    #[serde(default)]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(default)]
    pub responses: IndexMap<String, ResponseOrRef>,

    pub deprecated: Option<bool>,

    pub security: Option<Vec<SecurityRequirement>>,
}

/// Parameter location, including the two Swagger-only locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum ParameterLocation {
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "formData")]
    FormData,
    #[serde(rename = "body")]
    Body,
}

/// A Swagger 2.0 parameter. Body parameters carry a nested `schema`; all
/// others describe their type with flat fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    pub description: Option<String>,

    #[serde(default)]
    pub required: bool,

    pub schema: Option<SchemaOrRef>,

    #[serde(rename = "x-example")]
    pub example: Option<serde_json::Value>,

    #[serde(flatten)]
    pub simple: SimpleSchema,
}

impl Parameter {
    pub fn is_file(&self) -> bool {
        self.simple.schema_type == Some(SchemaType::File)
    }
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

/// A response definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    pub schema: Option<SchemaOrRef>,

    /// Example payloads keyed by mime type.
    #[serde(default)]
    pub examples: IndexMap<String, serde_json::Value>,
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
