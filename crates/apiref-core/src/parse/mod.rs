pub mod openapi3;
pub mod ref_resolve;
pub mod schema;
pub mod security;
pub mod spec;
pub mod swagger2;

use serde_json::Value;

use crate::error::ParseError;
pub use spec::{Dialect, SourceDocument};

/// A specification document as received, before any resolution.
pub type RawDocument = Value;

/// Read a raw document from YAML.
pub fn from_yaml(input: &str) -> Result<RawDocument, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Read a raw document from JSON.
pub fn from_json(input: &str) -> Result<RawDocument, ParseError> {
    Ok(serde_json::from_str(input)?)
}
