use apiref_core::Diagnostic;
use apiref_core::ParseError;
use apiref_core::parse::ref_resolve::{RefResolver, circular_marker, resolve};
use apiref_core::parse::{self, Dialect, SourceDocument};
use serde_json::json;

const PETSTORE_3: &str = include_str!("fixtures/petstore-3.0.yaml");
const PETSTORE_2: &str = include_str!("fixtures/petstore-swagger-2.0.json");

#[test]
fn read_yaml_and_json_fixtures() {
    let v3 = parse::from_yaml(PETSTORE_3).expect("should read petstore yaml");
    assert_eq!(Dialect::detect(&v3).unwrap(), Dialect::OpenApi3);

    let v2 = parse::from_json(PETSTORE_2).expect("should read petstore json");
    assert_eq!(Dialect::detect(&v2).unwrap(), Dialect::Swagger2);
}

#[test]
fn typed_source_document() {
    let raw = parse::from_yaml(PETSTORE_3).unwrap();
    let resolved = resolve(&raw).document;
    let source = SourceDocument::from_resolved(resolved, Dialect::OpenApi3).unwrap();
    let SourceDocument::OpenApi3(spec) = source else {
        panic!("expected an OpenAPI 3 document");
    };
    assert_eq!(spec.info.title, "Petstore");
    assert_eq!(spec.paths.len(), 5);
    assert_eq!(spec.tags.len(), 2);
}

#[test]
fn reject_unsupported_version() {
    let raw = parse::from_yaml(
        r#"
openapi: "4.0.0"
info:
  title: Test
  version: "1"
paths: {}
"#,
    )
    .unwrap();
    let err = Dialect::detect(&raw).unwrap_err();
    assert!(matches!(err, ParseError::UnsupportedVersion(v) if v == "4.0.0"));
}

#[test]
fn reject_malformed_yaml() {
    let err = parse::from_yaml("openapi: [unclosed").unwrap_err();
    assert!(matches!(err, ParseError::Yaml(_)));
}

#[test]
fn resolve_without_refs_is_identity() {
    let raw = json!({
        "openapi": "3.0.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/a": {"get": {"responses": {"200": {"description": "ok"}}}}}
    });
    let resolution = resolve(&raw);
    assert_eq!(resolution.document, raw);
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn resolve_is_idempotent() {
    let raw = parse::from_yaml(PETSTORE_3).unwrap();
    let once = resolve(&raw).document;
    let twice = resolve(&once).document;
    assert_eq!(once, twice);
}

#[test]
fn resolve_self_reference() {
    let raw = json!({
        "components": {"schemas": {"Node": {
            "type": "object",
            "properties": {"next": {"$ref": "#/components/schemas/Node"}}
        }}},
        "root": {"$ref": "#/components/schemas/Node"}
    });
    let resolved = resolve(&raw).document;
    assert_eq!(
        resolved["root"]["properties"]["next"],
        circular_marker("#/components/schemas/Node")
    );
}

#[test]
fn resolve_mutual_cycle() {
    let raw = json!({
        "definitions": {
            "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}},
            "B": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}}
        },
        "root": {"$ref": "#/definitions/A"}
    });
    let resolved = resolve(&raw).document;
    let b = &resolved["root"]["properties"]["b"];
    assert_eq!(b["type"], "object");
    assert_eq!(b["properties"]["a"], circular_marker("#/definitions/A"));
}

/// `n` schemas whose properties each reference every other schema.
fn schema_mesh(n: usize) -> serde_json::Value {
    let schemas: serde_json::Map<String, serde_json::Value> = (0..n)
        .map(|i| {
            let properties: serde_json::Map<String, serde_json::Value> = (0..n)
                .filter(|&j| j != i)
                .map(|j| {
                    (
                        format!("s{j}"),
                        json!({"$ref": format!("#/components/schemas/S{j}")}),
                    )
                })
                .collect();
            (
                format!("S{i}"),
                json!({"type": "object", "properties": properties}),
            )
        })
        .collect();
    json!({"components": {"schemas": schemas}})
}

#[test]
fn resolve_densely_linked_schemas() {
    let raw = schema_mesh(16);
    let resolution = resolve(&raw);
    assert!(resolution.diagnostics.is_empty());

    let text = resolution.document.to_string();
    assert!(text.len() < 256 * 1024, "resolved size {}", text.len());
    assert!(!text.contains("\"$ref\""));

    let s0 = &resolution.document["components"]["schemas"]["S0"];
    let s1 = &s0["properties"]["s1"];
    assert_eq!(s1["type"], "object");
    assert_eq!(
        s1["properties"]["s0"],
        circular_marker("#/components/schemas/S0")
    );
    assert_eq!(
        s0["properties"]["s2"],
        circular_marker("#/components/schemas/S2")
    );
    for i in 0..16 {
        let schema = &resolution.document["components"]["schemas"][format!("S{i}")];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"].as_object().unwrap().len(), 15);
    }
}

#[test]
fn resolve_unresolvable_and_external() {
    let raw = json!({
        "a": {"$ref": "#/definitions/Missing"},
        "b": {"$ref": "https://example.com/schemas/pet.json"},
        "c": {"$ref": "#/definitions/Missing"}
    });
    let resolution = resolve(&raw);
    assert_eq!(resolution.document, raw);
    assert_eq!(
        resolution.diagnostics,
        vec![
            Diagnostic::UnresolvableReference {
                pointer: "#/definitions/Missing".to_string()
            },
            Diagnostic::ExternalReference {
                reference: "https://example.com/schemas/pet.json".to_string()
            },
        ]
    );
}

#[test]
fn resolve_depth_ceiling() {
    let raw = json!({"a": {"b": {"c": {"d": {"e": 1}}}}});
    let resolution = RefResolver::new(&raw).with_max_depth(2).resolve();
    assert!(
        resolution
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::DepthLimitExceeded { .. }))
    );
}
