use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value. `file` only appears in Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
    File,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

impl TypeSet {
    pub fn contains(&self, ty: SchemaType) -> bool {
        match self {
            TypeSet::Single(t) => *t == ty,
            TypeSet::Multiple(types) => types.contains(&ty),
        }
    }
}

/// A schema position in a resolved document.
///
/// Variant order matters for the untagged match: a leftover `$ref` or a
/// cycle marker must win over the catch-all object shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    /// A `$ref` the resolver could not (or would not) follow.
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    /// The point where a reference cycle re-entered itself.
    Circular {
        #[serde(rename = "$circularRef")]
        pointer: String,
    },
    Schema(Box<Schema>),
    /// Anything else: boolean schemas, or objects with malformed keywords.
    Opaque(serde_json::Value),
}

/// A JSON Schema object, covering OpenAPI 3.0/3.1 schemas and Swagger 2.0
/// nested `schema` objects.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: Option<TypeSet>,

    pub format: Option<String>,

    pub title: Option<String>,

    pub description: Option<String>,

    #[serde(rename = "default")]
    pub default_value: Option<serde_json::Value>,

    pub nullable: Option<bool>,

    /// Swagger 2.0 vendor extension equivalent of `nullable`.
    #[serde(rename = "x-nullable")]
    pub x_nullable: Option<bool>,

    pub deprecated: Option<bool>,

    // Object properties
    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default)]
    pub required: Vec<String>,

    #[serde(rename = "additionalProperties")]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    pub items: Option<Box<SchemaOrRef>>,

    // Composition
    #[serde(rename = "allOf", default)]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default)]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default)]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    // Numeric constraints
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    /// A boolean in OpenAPI 3.0 / Swagger 2.0, a number in OpenAPI 3.1.
    #[serde(rename = "exclusiveMinimum")]
    pub exclusive_minimum: Option<serde_json::Value>,
    #[serde(rename = "exclusiveMaximum")]
    pub exclusive_maximum: Option<serde_json::Value>,
    #[serde(rename = "multipleOf")]
    pub multiple_of: Option<f64>,

    // String constraints
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    pub pattern: Option<String>,

    // Array constraints
    #[serde(rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(rename = "maxItems")]
    pub max_items: Option<u64>,
    #[serde(rename = "uniqueItems")]
    pub unique_items: Option<bool>,

    // Read/Write only
    #[serde(rename = "readOnly")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly")]
    pub write_only: Option<bool>,

    pub example: Option<serde_json::Value>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

/// The flat type description Swagger 2.0 uses for non-body parameters and
/// their `items` (the "Items Object").
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SimpleSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    pub format: Option<String>,

    pub items: Option<Box<SimpleSchema>>,

    #[serde(rename = "collectionFormat")]
    pub collection_format: Option<String>,

    #[serde(rename = "default")]
    pub default_value: Option<serde_json::Value>,

    pub maximum: Option<f64>,
    #[serde(rename = "exclusiveMaximum")]
    pub exclusive_maximum: Option<serde_json::Value>,
    pub minimum: Option<f64>,
    #[serde(rename = "exclusiveMinimum")]
    pub exclusive_minimum: Option<serde_json::Value>,

    #[serde(rename = "maxLength")]
    pub max_length: Option<u64>,
    #[serde(rename = "minLength")]
    pub min_length: Option<u64>,
    pub pattern: Option<String>,

    #[serde(rename = "maxItems")]
    pub max_items: Option<u64>,
    #[serde(rename = "minItems")]
    pub min_items: Option<u64>,
    #[serde(rename = "uniqueItems")]
    pub unique_items: Option<bool>,

    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "multipleOf")]
    pub multiple_of: Option<f64>,

    #[serde(rename = "x-nullable")]
    pub x_nullable: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ref_wins_over_schema() {
        let parsed: SchemaOrRef =
            serde_json::from_value(json!({"$ref": "https://example.com/pet.json"})).unwrap();
        assert!(matches!(parsed, SchemaOrRef::Ref { .. }));
    }

    #[test]
    fn test_circular_marker() {
        let parsed: SchemaOrRef =
            serde_json::from_value(json!({"$circularRef": "#/components/schemas/Node"}))
                .unwrap();
        assert_eq!(
            parsed,
            SchemaOrRef::Circular {
                pointer: "#/components/schemas/Node".to_string()
            }
        );
    }

    #[test]
    fn test_boolean_schema_is_opaque() {
        let parsed: SchemaOrRef = serde_json::from_value(json!(true)).unwrap();
        assert!(matches!(parsed, SchemaOrRef::Opaque(_)));
    }

    #[test]
    fn test_malformed_property_stays_local() {
        let parsed: SchemaOrRef = serde_json::from_value(json!({
            "type": "object",
            "properties": {
                "ok": {"type": "string"},
                "bad": {"type": "string", "required": true}
            }
        }))
        .unwrap();
        let SchemaOrRef::Schema(schema) = parsed else {
            panic!("expected schema");
        };
        assert!(matches!(schema.properties["ok"], SchemaOrRef::Schema(_)));
        assert!(matches!(schema.properties["bad"], SchemaOrRef::Opaque(_)));
    }

    #[test]
    fn test_type_list() {
        let parsed: Schema = serde_json::from_value(json!({"type": ["string", "null"]})).unwrap();
        let types = parsed.schema_type.unwrap();
        assert!(types.contains(SchemaType::String));
        assert!(types.contains(SchemaType::Null));
        assert!(!types.contains(SchemaType::Array));
    }
}
