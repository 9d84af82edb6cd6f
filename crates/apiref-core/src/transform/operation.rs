use std::hash::Hash;

use indexmap::IndexMap;

use crate::error::Diagnostic;
use crate::model::*;
use crate::parse::openapi3;
use crate::parse::spec::OrInvalid;
use crate::parse::swagger2;

use super::normalize::{SchemaFragment, normalize, normalize_schema_or_ref, object_schema};

const JSON_MEDIA_TYPE: &str = "application/json";
const MULTIPART_MEDIA_TYPE: &str = "multipart/form-data";
const FORM_MEDIA_TYPE: &str = "application/x-www-form-urlencoded";

/// Document-level values every operation inherits.
#[derive(Debug, Clone)]
pub struct OperationContext<'a> {
    pub base_url: &'a str,
    pub security_schemas: &'a SecuritySchemas,
    pub global_security: Option<&'a [SecurityRequirement]>,
    /// Tag for operations that declare none.
    pub default_tag: &'a str,
    /// Document-level `consumes`; empty for OpenAPI 3.x.
    pub consumes: &'a [String],
}

/// An operation together with the parameters of its enclosing path item.
#[derive(Debug, Clone, Copy)]
pub enum DialectOperation<'a> {
    Swagger2 {
        operation: &'a swagger2::Operation,
        path_parameters: &'a [swagger2::ParameterOrRef],
    },
    OpenApi3 {
        operation: &'a openapi3::Operation,
        path_parameters: &'a [openapi3::ParameterOrRef],
    },
}

/// Fields both dialects share on an operation.
struct OperationHeader<'a> {
    operation_id: Option<&'a String>,
    summary: Option<&'a String>,
    description: Option<&'a String>,
    tags: &'a [String],
    external_docs: Option<&'a ExternalDocs>,
    deprecated: Option<bool>,
    security: Option<&'a Vec<SecurityRequirement>>,
}

/// Build an [`Endpoint`] from one operation. The navigable path is left
/// empty; the navigation generator assigns it.
pub fn parse_operation(
    ctx: &OperationContext<'_>,
    path: &str,
    method: HttpMethod,
    operation: DialectOperation<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Endpoint {
    let (header, parameters, request_body, responses) = match operation {
        DialectOperation::Swagger2 {
            operation: op,
            path_parameters,
        } => {
            let merged = merge_parameters(path_parameters, &op.parameters, |p| match p {
                swagger2::ParameterOrRef::Parameter(param) => Some((param.location, &param.name)),
                _ => None,
            });
            let params: Vec<&swagger2::Parameter> = merged
                .into_iter()
                .filter_map(|p| match p {
                    swagger2::ParameterOrRef::Parameter(param) => Some(param.as_ref()),
                    _ => None,
                })
                .collect();
            let consumes = op.consumes.as_deref().unwrap_or(ctx.consumes);
            let body = swagger2_body(&op.parameters, path_parameters, method, path, diagnostics);
            (
                OperationHeader {
                    operation_id: op.operation_id.as_ref(),
                    summary: op.summary.as_ref(),
                    description: op.description.as_ref(),
                    tags: &op.tags,
                    external_docs: valid_external_docs(
                        op.external_docs.as_ref(),
                        method,
                        path,
                        diagnostics,
                    ),
                    deprecated: op.deprecated,
                    security: op.security.as_ref(),
                },
                params.iter().filter_map(|p| swagger2_parameter(p)).collect(),
                swagger2_request_body(body, &params, consumes),
                op.responses
                    .iter()
                    .map(|(status, r)| (status.clone(), swagger2_response(r)))
                    .collect(),
            )
        }
        DialectOperation::OpenApi3 {
            operation: op,
            path_parameters,
        } => {
            let merged = merge_parameters(path_parameters, &op.parameters, |p| match p {
                openapi3::ParameterOrRef::Parameter(param) => Some((param.location, &param.name)),
                _ => None,
            });
            (
                OperationHeader {
                    operation_id: op.operation_id.as_ref(),
                    summary: op.summary.as_ref(),
                    description: op.description.as_ref(),
                    tags: &op.tags,
                    external_docs: valid_external_docs(
                        op.external_docs.as_ref(),
                        method,
                        path,
                        diagnostics,
                    ),
                    deprecated: op.deprecated,
                    security: op.security.as_ref(),
                },
                merged.into_iter().filter_map(openapi3_parameter).collect(),
                op.request_body.as_ref().and_then(openapi3_request_body),
                op.responses
                    .iter()
                    .map(|(status, r)| (status.clone(), openapi3_response(r)))
                    .collect(),
            )
        }
    };

    build_endpoint(ctx, path, method, header, parameters, request_body, responses)
}

fn valid_external_docs<'a>(
    docs: Option<&'a OrInvalid<ExternalDocs>>,
    method: HttpMethod,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a ExternalDocs> {
    docs?.valid_or_record(|| format!("externalDocs of {method} {path}"), diagnostics)
}

fn build_endpoint(
    ctx: &OperationContext<'_>,
    path: &str,
    method: HttpMethod,
    header: OperationHeader<'_>,
    parameters: Vec<Parameter>,
    request_body: Option<RequestBody>,
    responses: IndexMap<String, ResponseSchema>,
) -> Endpoint {
    let title = non_empty(header.summary)
        .or(non_empty(header.operation_id))
        .cloned()
        .unwrap_or_else(|| format!("{method} {path}"));

    let tags = if header.tags.is_empty() {
        vec![ctx.default_tag.to_string()]
    } else {
        header.tags.to_vec()
    };

    let security = header.security.cloned();
    let effective_security = security
        .clone()
        .or_else(|| ctx.global_security.map(<[_]>::to_vec))
        .unwrap_or_default();

    Endpoint {
        title,
        summary: header.summary.cloned(),
        description: header.description.cloned(),
        method,
        path: path.to_string(),
        deprecated: header.deprecated.unwrap_or(false),
        tags,
        external_docs: header.external_docs.cloned(),
        parameters,
        request_body,
        responses,
        base_url: ctx.base_url.to_string(),
        security,
        effective_security,
        security_schemas: SecuritySchemas::clone(ctx.security_schemas),
        operation_id: header.operation_id.cloned(),
        nav_path: String::new(),
    }
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|s| !s.is_empty())
}

/// Merge path-level and operation-level parameters. An operation-level
/// parameter replaces the path-level one with the same key in place;
/// entries without a key (unresolved refs, malformed nodes) are dropped.
fn merge_parameters<'p, P, K>(
    path_level: &'p [P],
    operation_level: &'p [P],
    key: impl Fn(&'p P) -> Option<K>,
) -> Vec<&'p P>
where
    K: Hash + Eq,
{
    let mut merged: IndexMap<K, &'p P> = IndexMap::new();
    for param in path_level.iter().chain(operation_level) {
        match key(param) {
            Some(k) => {
                merged.insert(k, param);
            }
            None => log::debug!("skipping parameter that is not an inline object"),
        }
    }
    merged.into_values().collect()
}

fn openapi3_parameter(param: &openapi3::ParameterOrRef) -> Option<Parameter> {
    let openapi3::ParameterOrRef::Parameter(param) = param else {
        return None;
    };
    let location = match param.location {
        openapi3::ParameterLocation::Query => ParameterLocation::Query,
        openapi3::ParameterLocation::Path => ParameterLocation::Path,
        openapi3::ParameterLocation::Header => ParameterLocation::Header,
        openapi3::ParameterLocation::Cookie => ParameterLocation::Cookie,
    };
    // `content` is the alternative to `schema` for complex parameters.
    let schema = param
        .schema
        .as_ref()
        .or_else(|| param.content.values().find_map(|m| m.schema.as_ref()))
        .map(|s| normalize(SchemaFragment::Schema(s)))
        .unwrap_or_default();

    Some(Parameter {
        name: param.name.clone(),
        location,
        description: param.description.clone(),
        required: param.required || location == ParameterLocation::Path,
        deprecated: param.deprecated.unwrap_or(false),
        schema,
        example: param.example.clone(),
        examples: param.examples.clone(),
    })
}

fn openapi3_media(media: &IndexMap<String, openapi3::MediaType>) -> IndexMap<String, MediaContent> {
    media
        .iter()
        .map(|(media_type, m)| {
            (
                media_type.clone(),
                MediaContent {
                    schema: m.schema.as_ref().map(normalize_schema_or_ref),
                    example: m.example.clone(),
                    examples: m.examples.clone(),
                },
            )
        })
        .collect()
}

fn openapi3_request_body(body: &openapi3::RequestBodyOrRef) -> Option<RequestBody> {
    match body {
        openapi3::RequestBodyOrRef::RequestBody(body) => Some(RequestBody {
            description: body.description.clone(),
            required: body.required,
            content: openapi3_media(&body.content),
        }),
        openapi3::RequestBodyOrRef::Ref { ref_path } => {
            log::debug!("request body left as unresolved reference {ref_path}");
            None
        }
        openapi3::RequestBodyOrRef::Invalid(_) => None,
    }
}

fn openapi3_response(response: &openapi3::ResponseOrRef) -> ResponseSchema {
    match response {
        openapi3::ResponseOrRef::Response(r) => ResponseSchema {
            description: r.description.clone(),
            content: r.content.as_ref().map(openapi3_media),
        },
        openapi3::ResponseOrRef::Ref { .. } | openapi3::ResponseOrRef::Invalid(_) => {
            ResponseSchema {
                description: String::new(),
                content: None,
            }
        }
    }
}

/// Map a non-body, non-form Swagger parameter.
fn swagger2_parameter(param: &swagger2::Parameter) -> Option<Parameter> {
    let location = match param.location {
        swagger2::ParameterLocation::Query => ParameterLocation::Query,
        swagger2::ParameterLocation::Path => ParameterLocation::Path,
        swagger2::ParameterLocation::Header => ParameterLocation::Header,
        swagger2::ParameterLocation::Body | swagger2::ParameterLocation::FormData => {
            return None;
        }
    };
    Some(Parameter {
        name: param.name.clone(),
        location,
        description: param.description.clone(),
        required: param.required || location == ParameterLocation::Path,
        deprecated: false,
        schema: normalize(SchemaFragment::Swagger2Parameter(param)),
        example: param.example.clone(),
        examples: IndexMap::new(),
    })
}

fn body_parameters(params: &[swagger2::ParameterOrRef]) -> Vec<&swagger2::Parameter> {
    params
        .iter()
        .filter_map(|p| match p {
            swagger2::ParameterOrRef::Parameter(param)
                if param.location == swagger2::ParameterLocation::Body =>
            {
                Some(param.as_ref())
            }
            _ => None,
        })
        .collect()
}

/// Pick the `in: body` parameter. Body parameters declared on the operation
/// replace any declared on the path item, whatever their names; within one
/// level the first wins and the rest are reported.
fn swagger2_body<'p>(
    own: &'p [swagger2::ParameterOrRef],
    inherited: &'p [swagger2::ParameterOrRef],
    method: HttpMethod,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'p swagger2::Parameter> {
    let mut bodies = body_parameters(own);
    if bodies.is_empty() {
        bodies = body_parameters(inherited);
    }
    if bodies.len() > 1 {
        log::warn!("{method} {path} declares more than one body parameter; using the first");
        diagnostics.push(Diagnostic::DuplicateBodyParameter {
            method: method.to_string(),
            path: path.to_string(),
        });
    }
    bodies.into_iter().next()
}

/// Turn the body parameter, or else the `in: formData` parameters, into a
/// request body.
fn swagger2_request_body(
    body: Option<&swagger2::Parameter>,
    params: &[&swagger2::Parameter],
    consumes: &[String],
) -> Option<RequestBody> {
    if let Some(body) = body {
        let schema = body
            .schema
            .as_ref()
            .map(normalize_schema_or_ref)
            .unwrap_or_default();
        return Some(RequestBody {
            description: body.description.clone(),
            required: body.required,
            content: IndexMap::from([(
                JSON_MEDIA_TYPE.to_string(),
                MediaContent {
                    schema: Some(schema),
                    example: body.example.clone(),
                    ..MediaContent::default()
                },
            )]),
        });
    }

    let fields: Vec<&swagger2::Parameter> = params
        .iter()
        .copied()
        .filter(|p| p.location == swagger2::ParameterLocation::FormData)
        .collect();
    if fields.is_empty() {
        return None;
    }

    let multipart = fields.iter().any(|p| p.is_file())
        || consumes.iter().any(|c| c == MULTIPART_MEDIA_TYPE);
    let media_type = if multipart {
        MULTIPART_MEDIA_TYPE
    } else {
        FORM_MEDIA_TYPE
    };

    let mut properties = IndexMap::new();
    for field in &fields {
        let mut schema = normalize(SchemaFragment::Swagger2Parameter(field));
        if let (SchemaNode::Schema(s), Some(description)) = (&mut schema, &field.description) {
            s.description.get_or_insert_with(|| description.clone());
        }
        properties.insert(field.name.clone(), schema);
    }
    let required = fields
        .iter()
        .filter(|p| p.required)
        .map(|p| p.name.clone())
        .collect::<Vec<_>>();

    Some(RequestBody {
        description: None,
        required: !required.is_empty(),
        content: IndexMap::from([(
            media_type.to_string(),
            MediaContent {
                schema: Some(object_schema(properties, required).into()),
                ..MediaContent::default()
            },
        )]),
    })
}

fn swagger2_response(response: &swagger2::ResponseOrRef) -> ResponseSchema {
    match response {
        swagger2::ResponseOrRef::Response(r) => ResponseSchema {
            description: r.description.clone(),
            content: r.schema.as_ref().map(|schema| {
                IndexMap::from([(
                    JSON_MEDIA_TYPE.to_string(),
                    MediaContent {
                        schema: Some(normalize_schema_or_ref(schema)),
                        example: r.examples.get(JSON_MEDIA_TYPE).cloned(),
                        ..MediaContent::default()
                    },
                )])
            }),
        },
        swagger2::ResponseOrRef::Ref { .. } | swagger2::ResponseOrRef::Invalid(_) => {
            ResponseSchema {
                description: String::new(),
                content: None,
            }
        }
    }
}
