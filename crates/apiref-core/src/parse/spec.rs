use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::openapi3::OpenApi3Spec;
use super::swagger2::Swagger2Spec;
use crate::error::{Diagnostic, ParseError};

/// Info object describing the API. YAML reads `version: 1.0` as a number,
/// so every field accepts any scalar.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Info {
    #[serde(default, deserialize_with = "scalar_string")]
    pub title: String,

    #[serde(default, deserialize_with = "optional_scalar_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
}

/// A node read as `T`, or kept raw when it does not fit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrInvalid<T> {
    Valid(T),
    Invalid(Value),
}

impl<T> OrInvalid<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            OrInvalid::Valid(value) => Some(value),
            OrInvalid::Invalid(_) => None,
        }
    }

    /// The valid node, or `None` after recording a `MalformedNode`
    /// diagnostic for `location`.
    pub fn valid_or_record(
        &self,
        location: impl FnOnce() -> String,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<&T> {
        if let OrInvalid::Valid(value) = self {
            return Some(value);
        }
        let location = location();
        log::warn!("ignoring malformed {location}");
        diagnostics.push(Diagnostic::MalformedNode { location });
        None
    }
}

/// Link to external documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalDocs {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Tag definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tag {
    pub name: String,

    pub description: Option<String>,

    #[serde(rename = "externalDocs")]
    pub external_docs: Option<OrInvalid<ExternalDocs>>,
}

/// Which specification format a document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dialect {
    #[serde(rename = "swagger2")]
    Swagger2,
    #[serde(rename = "openapi3")]
    OpenApi3,
}

impl Dialect {
    /// Detect the dialect from the top-level version marker and check the
    /// fields every document needs.
    pub fn detect(document: &Value) -> Result<Self, ParseError> {
        let root = document.as_object().ok_or(ParseError::NotAnObject)?;

        let dialect = if let Some(version) = root.get("swagger") {
            let version = version_string(version);
            if !version.starts_with("2.") {
                return Err(ParseError::UnsupportedVersion(version));
            }
            Dialect::Swagger2
        } else if let Some(version) = root.get("openapi") {
            let version = version_string(version);
            if !version.starts_with("3.") {
                return Err(ParseError::UnsupportedVersion(version));
            }
            Dialect::OpenApi3
        } else {
            return Err(ParseError::MissingDialect);
        };

        for field in ["info", "paths"] {
            match root.get(field) {
                Some(Value::Object(_)) => {}
                Some(_) => {
                    return Err(ParseError::InvalidDocument(format!(
                        "`{field}` must be an object"
                    )));
                }
                None => return Err(ParseError::MissingField(field.to_string())),
            }
        }

        Ok(dialect)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Swagger2 => f.write_str("Swagger 2.0"),
            Dialect::OpenApi3 => f.write_str("OpenAPI 3.x"),
        }
    }
}

/// YAML happily reads `swagger: 2.0` as a number.
fn version_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(optional_scalar_string(deserializer)?.unwrap_or_default())
}

fn optional_scalar_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        value @ (Value::String(_) | Value::Number(_) | Value::Bool(_)) => {
            Some(version_string(&value))
        }
        _ => None,
    })
}

/// A resolved document, typed by dialect.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceDocument {
    Swagger2(Box<Swagger2Spec>),
    OpenApi3(Box<OpenApi3Spec>),
}

impl SourceDocument {
    /// Read a resolved document into the object model of its dialect.
    pub fn from_resolved(resolved: Value, dialect: Dialect) -> Result<Self, ParseError> {
        let invalid = |e: serde_json::Error| ParseError::InvalidDocument(e.to_string());
        Ok(match dialect {
            Dialect::Swagger2 => {
                SourceDocument::Swagger2(Box::new(serde_json::from_value(resolved).map_err(invalid)?))
            }
            Dialect::OpenApi3 => {
                SourceDocument::OpenApi3(Box::new(serde_json::from_value(resolved).map_err(invalid)?))
            }
        })
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            SourceDocument::Swagger2(_) => Dialect::Swagger2,
            SourceDocument::OpenApi3(_) => Dialect::OpenApi3,
        }
    }
}
