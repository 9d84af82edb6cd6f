use std::sync::Arc;

use indexmap::IndexMap;

use crate::config::ParserConfig;
use crate::error::{Diagnostic, ParseError};
use crate::model::*;
use crate::parse::openapi3::OpenApi3Spec;
use crate::parse::ref_resolve::{RefResolver, Resolution};
use crate::parse::spec::{Info, OrInvalid, Tag};
use crate::parse::swagger2::Swagger2Spec;
use crate::parse::{Dialect, RawDocument, SourceDocument};

use super::navigation::NavigationGenerator;
use super::operation::{DialectOperation, OperationContext, parse_operation};
use super::security::{openapi3_security_schema, swagger2_security_schema};

/// Turns raw documents of either dialect into a [`ParsedSpec`].
#[derive(Debug, Clone, Default)]
pub struct SpecParser {
    config: ParserConfig,
}

/// Document-wide pieces, before navigation.
struct DocumentParts {
    info: ApiInfo,
    base_url: String,
    security_schemas: SecuritySchemas,
    security: Option<Vec<SecurityRequirement>>,
    tags: Vec<DeclaredTag>,
    endpoints: Vec<Endpoint>,
}

impl SpecParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse one document: detect the dialect, resolve references, read
    /// every operation, then build navigation.
    pub fn parse(&self, document: &RawDocument) -> Result<ParsedSpec, ParseError> {
        let dialect = Dialect::detect(document)?;

        let Resolution {
            document: resolved,
            mut diagnostics,
        } = RefResolver::new(document)
            .with_max_depth(self.config.max_ref_depth)
            .resolve();

        let source = SourceDocument::from_resolved(resolved, dialect)?;
        let parts = match &source {
            SourceDocument::Swagger2(spec) => self.swagger2_parts(spec, &mut diagnostics),
            SourceDocument::OpenApi3(spec) => self.openapi3_parts(spec, &mut diagnostics),
        };

        let declared_tags: Vec<String> = parts.tags.iter().map(|t| t.name.clone()).collect();
        let navigation = NavigationGenerator::new(
            &self.config.navigation,
            self.config.collision_policy,
        )
        .generate(&parts.endpoints, &declared_tags)?;
        diagnostics.extend(navigation.diagnostics);

        let mut endpoints = parts.endpoints;
        for (endpoint, nav_path) in endpoints.iter_mut().zip(navigation.nav_paths) {
            endpoint.nav_path = nav_path;
        }

        log::debug!(
            "parsed {} {} with {} endpoints and {} diagnostics",
            dialect,
            parts.info.title,
            endpoints.len(),
            diagnostics.len()
        );

        Ok(ParsedSpec {
            dialect,
            info: parts.info,
            base_url: parts.base_url,
            endpoints,
            navigation: navigation.nodes,
            security_schemas: parts.security_schemas,
            security: parts.security,
            tags: parts.tags,
            diagnostics,
        })
    }

    fn openapi3_parts(
        &self,
        spec: &OpenApi3Spec,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> DocumentParts {
        let base_url = spec
            .servers
            .first()
            .map(|s| s.expanded_url())
            .unwrap_or_default();
        let mut security_schemas = IndexMap::new();
        for (name, scheme) in spec.components.iter().flat_map(|c| &c.security_schemes) {
            let location = || format!("security scheme `{name}`");
            if let Some(scheme) = scheme.valid_or_record(location, diagnostics) {
                security_schemas.insert(name.clone(), openapi3_security_schema(scheme));
            }
        }
        let security_schemas: SecuritySchemas = Arc::new(security_schemas);

        let ctx = OperationContext {
            base_url: &base_url,
            security_schemas: &security_schemas,
            global_security: spec.security.as_deref(),
            default_tag: &self.config.navigation.default_tag,
            consumes: &[],
        };
        let mut endpoints = Vec::new();
        for (path, item) in &spec.paths {
            let Some(item) = item.valid_or_record(|| format!("path item {path}"), diagnostics)
            else {
                continue;
            };
            for method in HttpMethod::ALL {
                let Some(operation) = item.operation(method).and_then(|op| {
                    op.valid_or_record(|| format!("operation {method} {path}"), diagnostics)
                }) else {
                    continue;
                };
                endpoints.push(parse_operation(
                    &ctx,
                    path,
                    method,
                    DialectOperation::OpenApi3 {
                        operation,
                        path_parameters: &item.parameters,
                    },
                    diagnostics,
                ));
            }
        }

        DocumentParts {
            info: api_info(&spec.info),
            base_url,
            security_schemas,
            security: spec.security.clone(),
            tags: declared_tags(&spec.tags, diagnostics),
            endpoints,
        }
    }

    fn swagger2_parts(
        &self,
        spec: &Swagger2Spec,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> DocumentParts {
        let base_url = swagger2_base_url(spec);
        let mut security_schemas = IndexMap::new();
        for (name, scheme) in &spec.security_definitions {
            let location = || format!("security definition `{name}`");
            if let Some(scheme) = scheme.valid_or_record(location, diagnostics) {
                security_schemas.insert(name.clone(), swagger2_security_schema(scheme));
            }
        }
        let security_schemas: SecuritySchemas = Arc::new(security_schemas);

        let ctx = OperationContext {
            base_url: &base_url,
            security_schemas: &security_schemas,
            global_security: spec.security.as_deref(),
            default_tag: &self.config.navigation.default_tag,
            consumes: &spec.consumes,
        };
        let mut endpoints = Vec::new();
        for (path, item) in &spec.paths {
            let Some(item) = item.valid_or_record(|| format!("path item {path}"), diagnostics)
            else {
                continue;
            };
            for method in HttpMethod::ALL {
                let Some(operation) = item.operation(method).and_then(|op| {
                    op.valid_or_record(|| format!("operation {method} {path}"), diagnostics)
                }) else {
                    continue;
                };
                endpoints.push(parse_operation(
                    &ctx,
                    path,
                    method,
                    DialectOperation::Swagger2 {
                        operation,
                        path_parameters: &item.parameters,
                    },
                    diagnostics,
                ));
            }
        }

        DocumentParts {
            info: api_info(&spec.info),
            base_url,
            security_schemas,
            security: spec.security.clone(),
            tags: declared_tags(&spec.tags, diagnostics),
            endpoints,
        }
    }
}

fn api_info(info: &Info) -> ApiInfo {
    ApiInfo {
        title: info.title.clone(),
        version: info.version.clone(),
        description: info.description.clone(),
    }
}

/// Top-level tags, skipping entries that are not tag objects.
fn declared_tags(tags: &[OrInvalid<Tag>], diagnostics: &mut Vec<Diagnostic>) -> Vec<DeclaredTag> {
    let mut declared = Vec::with_capacity(tags.len());
    for (index, tag) in tags.iter().enumerate() {
        let Some(tag) = tag.valid_or_record(|| format!("tag at index {index}"), diagnostics) else {
            continue;
        };
        let external_docs = tag.external_docs.as_ref().and_then(|docs| {
            docs.valid_or_record(|| format!("externalDocs of tag `{}`", tag.name), diagnostics)
        });
        declared.push(DeclaredTag {
            name: tag.name.clone(),
            description: tag.description.clone(),
            external_docs: external_docs.cloned(),
        });
    }
    declared
}

/// `scheme://host` plus `basePath` without its trailing slash. The first
/// declared scheme wins, defaulting to https. Without a host only the base
/// path remains.
fn swagger2_base_url(spec: &Swagger2Spec) -> String {
    let mut base_path = spec
        .base_path
        .as_deref()
        .unwrap_or_default()
        .trim_end_matches('/')
        .to_string();
    if !base_path.is_empty() && !base_path.starts_with('/') {
        base_path.insert(0, '/');
    }

    match spec.host.as_deref().filter(|h| !h.is_empty()) {
        Some(host) => {
            let scheme = spec.schemes.first().map(String::as_str).unwrap_or("https");
            format!("{scheme}://{host}{base_path}")
        }
        None => base_path,
    }
}

/// Parse a raw document with the default configuration.
pub fn parse(document: &RawDocument) -> Result<ParsedSpec, ParseError> {
    SpecParser::default().parse(document)
}
