use std::fmt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document root must be an object")]
    NotAnObject,

    #[error("document declares neither `openapi` nor `swagger` version")]
    MissingDialect,

    #[error("unsupported specification version: {0}")]
    UnsupportedVersion(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid document structure: {0}")]
    InvalidDocument(String),

    #[error("endpoints `{existing}` and `{duplicate}` both map to navigation path {path}")]
    SlugCollision {
        path: String,
        existing: String,
        duplicate: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml_ng::Error,
    },
}

/// A non-fatal finding recorded while parsing a document.
///
/// Diagnostics never abort a parse; they are logged as they happen and
/// collected on [`crate::model::ParsedSpec::diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A local `$ref` whose target does not exist.
    UnresolvableReference { pointer: String },
    /// A `$ref` into another file or URL, left untouched.
    ExternalReference { reference: String },
    /// Resolution stopped at the nesting ceiling.
    DepthLimitExceeded { pointer: Option<String> },
    /// A Swagger 2.0 operation with more than one `in: body` parameter.
    DuplicateBodyParameter { method: String, path: String },
    /// A node that did not fit its expected shape and was skipped.
    MalformedNode { location: String },
    /// Two endpoints produced the same navigable path.
    SlugCollision {
        path: String,
        existing: String,
        duplicate: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvableReference { pointer } => {
                write!(f, "unresolvable reference: {pointer}")
            }
            Diagnostic::ExternalReference { reference } => {
                write!(f, "external reference left unresolved: {reference}")
            }
            Diagnostic::DepthLimitExceeded { pointer: Some(p) } => {
                write!(f, "reference depth limit exceeded while resolving {p}")
            }
            Diagnostic::DepthLimitExceeded { pointer: None } => {
                write!(f, "reference depth limit exceeded")
            }
            Diagnostic::DuplicateBodyParameter { method, path } => {
                write!(f, "{method} {path} declares more than one body parameter; using the first")
            }
            Diagnostic::MalformedNode { location } => write!(f, "ignored malformed {location}"),
            Diagnostic::SlugCollision {
                path,
                existing,
                duplicate,
            } => write!(
                f,
                "`{duplicate}` collides with `{existing}` at navigation path {path}"
            ),
        }
    }
}
