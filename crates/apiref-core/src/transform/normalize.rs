use indexmap::IndexMap;

use crate::model::{AdditionalProperties, SchemaNode, SchemaType, TypeSet, UnifiedSchema};
use crate::parse::schema::{self, Schema, SchemaOrRef, SimpleSchema};
use crate::parse::swagger2;

/// A schema fragment, tagged with the shape it was written in.
#[derive(Debug, Clone, Copy)]
pub enum SchemaFragment<'a> {
    /// An OpenAPI 3.x schema, or a Swagger 2.0 nested `schema` object.
    Schema(&'a SchemaOrRef),
    /// A Swagger 2.0 parameter. Uses its nested `schema` when it has one,
    /// otherwise its flat type fields.
    Swagger2Parameter(&'a swagger2::Parameter),
    /// A Swagger 2.0 Items object.
    Swagger2Items(&'a SimpleSchema),
}

/// Convert a dialect-specific schema fragment into the unified model.
pub fn normalize(fragment: SchemaFragment<'_>) -> SchemaNode {
    match fragment {
        SchemaFragment::Schema(schema_or_ref) => normalize_schema_or_ref(schema_or_ref),
        SchemaFragment::Swagger2Parameter(param) => match &param.schema {
            Some(nested) => normalize_schema_or_ref(nested),
            None => normalize_simple(&param.simple).into(),
        },
        SchemaFragment::Swagger2Items(items) => normalize_simple(items).into(),
    }
}

pub fn normalize_schema_or_ref(schema_or_ref: &SchemaOrRef) -> SchemaNode {
    match schema_or_ref {
        SchemaOrRef::Ref { ref_path } => SchemaNode::Unresolved {
            reference: ref_path.clone(),
        },
        SchemaOrRef::Circular { pointer } => SchemaNode::CircularRef {
            pointer: pointer.clone(),
        },
        SchemaOrRef::Schema(schema) => normalize_schema(schema).into(),
        SchemaOrRef::Opaque(_) => SchemaNode::default(),
    }
}

/// Copy a full JSON Schema object into the unified model.
pub fn normalize_schema(schema: &Schema) -> UnifiedSchema {
    let schema_type = schema.schema_type.as_ref().map(unify_type_set);
    let nullable = match &schema_type {
        Some(types) if types.contains(SchemaType::Null) => Some(true),
        _ => schema.nullable.or(schema.x_nullable),
    };

    let unified = UnifiedSchema {
        format: file_format(schema.schema_type.as_ref()).or_else(|| schema.format.clone()),
        schema_type,
        title: schema.title.clone(),
        description: schema.description.clone(),
        enum_values: schema.enum_values.clone(),
        minimum: schema.minimum,
        maximum: schema.maximum,
        exclusive_minimum: schema.exclusive_minimum.clone(),
        exclusive_maximum: schema.exclusive_maximum.clone(),
        multiple_of: schema.multiple_of,
        min_length: schema.min_length,
        max_length: schema.max_length,
        pattern: schema.pattern.clone(),
        min_items: schema.min_items,
        max_items: schema.max_items,
        unique_items: schema.unique_items,
        default_value: schema.default_value.clone(),
        example: schema.example.clone(),
        nullable,
        deprecated: schema.deprecated,
        read_only: schema.read_only,
        write_only: schema.write_only,
        required: schema.required.clone(),
        items: schema
            .items
            .as_deref()
            .map(|items| Box::new(normalize_schema_or_ref(items))),
        properties: schema
            .properties
            .iter()
            .map(|(name, prop)| (name.clone(), normalize_schema_or_ref(prop)))
            .collect(),
        additional_properties: schema.additional_properties.as_ref().map(|ap| match ap {
            schema::AdditionalProperties::Bool(allowed) => AdditionalProperties::Allowed(*allowed),
            schema::AdditionalProperties::Schema(s) => {
                AdditionalProperties::Schema(Box::new(normalize_schema_or_ref(s)))
            }
        }),
        all_of: schema.all_of.iter().map(normalize_schema_or_ref).collect(),
        one_of: schema.one_of.iter().map(normalize_schema_or_ref).collect(),
        any_of: schema.any_of.iter().map(normalize_schema_or_ref).collect(),
    };

    enforce_shape(unified)
}

/// Map the flat fields of a Swagger 2.0 parameter or Items object.
pub fn normalize_simple(simple: &SimpleSchema) -> UnifiedSchema {
    let schema_type = simple.schema_type.map(|t| TypeSet::Single(unify_type(t)));
    let file_type = simple.schema_type.map(TypeSet::Single);

    let unified = UnifiedSchema {
        schema_type,
        format: file_format(file_type.as_ref()).or_else(|| simple.format.clone()),
        enum_values: simple.enum_values.clone(),
        minimum: simple.minimum,
        maximum: simple.maximum,
        exclusive_minimum: simple.exclusive_minimum.clone(),
        exclusive_maximum: simple.exclusive_maximum.clone(),
        multiple_of: simple.multiple_of,
        min_length: simple.min_length,
        max_length: simple.max_length,
        pattern: simple.pattern.clone(),
        min_items: simple.min_items,
        max_items: simple.max_items,
        unique_items: simple.unique_items,
        default_value: simple.default_value.clone(),
        nullable: simple.x_nullable,
        items: simple
            .items
            .as_deref()
            .map(|items| Box::new(normalize_simple(items).into())),
        ..UnifiedSchema::default()
    };

    enforce_shape(unified)
}

/// Build an object schema from named field schemas, e.g. Swagger 2.0
/// `formData` parameters.
pub fn object_schema(fields: IndexMap<String, SchemaNode>, required: Vec<String>) -> UnifiedSchema {
    UnifiedSchema {
        schema_type: Some(TypeSet::Single(SchemaType::Object)),
        properties: fields,
        required,
        ..UnifiedSchema::default()
    }
}

/// Swagger's `file` type is a binary string everywhere else.
fn unify_type(ty: SchemaType) -> SchemaType {
    match ty {
        SchemaType::File => SchemaType::String,
        other => other,
    }
}

fn unify_type_set(types: &TypeSet) -> TypeSet {
    match types {
        TypeSet::Single(t) => TypeSet::Single(unify_type(*t)),
        TypeSet::Multiple(ts) => TypeSet::Multiple(ts.iter().copied().map(unify_type).collect()),
    }
}

fn file_format(types: Option<&TypeSet>) -> Option<String> {
    types
        .filter(|t| t.contains(SchemaType::File))
        .map(|_| "binary".to_string())
}

/// `items` only under arrays, `properties` only under objects or untyped
/// schemas. `items` without a type implies an array.
fn enforce_shape(mut schema: UnifiedSchema) -> UnifiedSchema {
    if schema.items.is_some() {
        match &schema.schema_type {
            None => schema.schema_type = Some(TypeSet::Single(SchemaType::Array)),
            Some(types) if !types.contains(SchemaType::Array) => {
                log::debug!("dropping `items` from non-array schema");
                schema.items = None;
            }
            Some(_) => {}
        }
    }
    if !schema.properties.is_empty()
        && schema
            .schema_type
            .as_ref()
            .is_some_and(|types| !types.contains(SchemaType::Object))
    {
        log::debug!("dropping `properties` from non-object schema");
        schema.properties.clear();
    }
    schema
}
