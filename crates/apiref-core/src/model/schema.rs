use indexmap::IndexMap;
use serde::Serialize;

pub use crate::parse::schema::{SchemaType, TypeSet};

/// A schema position in the unified model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// The schema refers back to one of its ancestors; render it as a link
    /// to `pointer` rather than expanding it.
    CircularRef {
        #[serde(rename = "$circularRef")]
        pointer: String,
    },
    /// A reference that could not be followed. Treat as an opaque schema.
    Unresolved {
        #[serde(rename = "$ref")]
        reference: String,
    },
    Schema(Box<UnifiedSchema>),
}

impl SchemaNode {
    pub fn as_schema(&self) -> Option<&UnifiedSchema> {
        match self {
            SchemaNode::Schema(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn circular_pointer(&self) -> Option<&str> {
        match self {
            SchemaNode::CircularRef { pointer } => Some(pointer),
            _ => None,
        }
    }

    pub fn is_circular(&self) -> bool {
        matches!(self, SchemaNode::CircularRef { .. })
    }
}

impl Default for SchemaNode {
    fn default() -> Self {
        SchemaNode::Schema(Box::default())
    }
}

impl From<UnifiedSchema> for SchemaNode {
    fn from(schema: UnifiedSchema) -> Self {
        SchemaNode::Schema(Box::new(schema))
    }
}

/// A dialect-agnostic schema description.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    // Numeric constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,

    // String constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    // Array constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    /// Names of required properties.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Element schema. Only set when the type is `array`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Field schemas. Only set for objects and untyped schemas.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaNode>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaNode>,
}

impl UnifiedSchema {
    pub fn has_type(&self, ty: SchemaType) -> bool {
        self.schema_type.as_ref().is_some_and(|t| t.contains(ty))
    }

    /// The type, when exactly one is declared.
    pub fn single_type(&self) -> Option<SchemaType> {
        match &self.schema_type {
            Some(TypeSet::Single(t)) => Some(*t),
            _ => None,
        }
    }

    /// The property schema under `name`, when it is a plain schema.
    pub fn property(&self, name: &str) -> Option<&UnifiedSchema> {
        self.properties.get(name).and_then(SchemaNode::as_schema)
    }
}

/// `additionalProperties` in the unified model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Allowed(bool),
    Schema(Box<SchemaNode>),
}
