use apiref_core::model::{Endpoint, HttpMethod, SchemaNode, SchemaType};
use apiref_core::parse_spec;
use serde_json::json;

fn only_endpoint(document: serde_json::Value) -> Endpoint {
    let mut spec = parse_spec(&document).expect("document should parse");
    assert_eq!(spec.endpoints.len(), 1);
    spec.endpoints.remove(0)
}

fn json_body_schema(endpoint: &Endpoint) -> &SchemaNode {
    endpoint
        .request_body
        .as_ref()
        .expect("should have a request body")
        .content
        .get("application/json")
        .expect("should have a JSON body")
        .schema
        .as_ref()
        .expect("body should have a schema")
}

#[test]
fn swagger_body_matches_openapi3_request_body() {
    let item = json!({"type": "object", "properties": {"name": {"type": "string"}}});

    let swagger = only_endpoint(json!({
        "swagger": "2.0",
        "info": {"title": "Items", "version": "1"},
        "paths": {"/items": {"post": {
            "parameters": [{"name": "body", "in": "body", "schema": item}],
            "responses": {"201": {"description": "Created"}}
        }}}
    }));
    let openapi = only_endpoint(json!({
        "openapi": "3.0.3",
        "info": {"title": "Items", "version": "1"},
        "paths": {"/items": {"post": {
            "requestBody": {"content": {"application/json": {"schema": item}}},
            "responses": {"201": {"description": "Created"}}
        }}}
    }));

    assert_eq!(swagger.method, HttpMethod::Post);
    let schema = json_body_schema(&swagger).as_schema().unwrap();
    assert_eq!(schema.single_type(), Some(SchemaType::Object));
    assert_eq!(
        schema.property("name").unwrap().single_type(),
        Some(SchemaType::String)
    );
    assert_eq!(json_body_schema(&swagger), json_body_schema(&openapi));
}

#[test]
fn swagger_flat_parameter_matches_openapi3_schema() {
    let swagger = only_endpoint(json!({
        "swagger": "2.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/search": {"get": {
            "parameters": [{
                "name": "q",
                "in": "query",
                "required": true,
                "type": "string",
                "minLength": 1,
                "maxLength": 64,
                "pattern": "^[a-z]+$"
            }],
            "responses": {}
        }}}
    }));
    let openapi = only_endpoint(json!({
        "openapi": "3.1.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/search": {"get": {
            "parameters": [{
                "name": "q",
                "in": "query",
                "required": true,
                "schema": {"type": "string", "minLength": 1, "maxLength": 64, "pattern": "^[a-z]+$"}
            }],
            "responses": {}
        }}}
    }));

    assert_eq!(swagger.parameters, openapi.parameters);
}

#[test]
fn swagger_array_items_match_openapi3() {
    let swagger = only_endpoint(json!({
        "swagger": "2.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/pets": {"get": {
            "parameters": [{
                "name": "ids",
                "in": "query",
                "type": "array",
                "items": {"type": "integer", "format": "int64"}
            }],
            "responses": {}
        }}}
    }));
    let openapi = only_endpoint(json!({
        "openapi": "3.0.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/pets": {"get": {
            "parameters": [{
                "name": "ids",
                "in": "query",
                "schema": {"type": "array", "items": {"type": "integer", "format": "int64"}}
            }],
            "responses": {}
        }}}
    }));

    assert_eq!(swagger.parameters[0].schema, openapi.parameters[0].schema);
}

#[test]
fn nullable_spellings_agree() {
    let openapi30 = only_endpoint(json!({
        "openapi": "3.0.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/a": {"get": {"responses": {"200": {
            "description": "ok",
            "content": {"application/json": {"schema": {"type": "string", "nullable": true}}}
        }}}}}
    }));
    let swagger = only_endpoint(json!({
        "swagger": "2.0",
        "info": {"title": "t", "version": "1"},
        "paths": {"/a": {"get": {"responses": {"200": {
            "description": "ok",
            "schema": {"type": "string", "x-nullable": true}
        }}}}}
    }));

    let nullable = |endpoint: &Endpoint| {
        endpoint.responses["200"].content.as_ref().unwrap()["application/json"]
            .schema
            .as_ref()
            .unwrap()
            .as_schema()
            .unwrap()
            .nullable
    };
    assert_eq!(nullable(&openapi30), Some(true));
    assert_eq!(nullable(&swagger), Some(true));
}

#[test]
fn self_referencing_array_items() {
    let endpoint = only_endpoint(json!({
        "openapi": "3.0.3",
        "info": {"title": "Tree", "version": "1"},
        "paths": {"/items": {"get": {"responses": {"200": {
            "description": "ok",
            "content": {"application/json": {"schema": {
                "type": "array",
                "items": {"$ref": "#/components/schemas/Item"}
            }}}
        }}}}},
        "components": {"schemas": {"Item": {
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "children": {"$ref": "#/components/schemas/Item"}
            }
        }}}
    }));

    let list = endpoint.responses["200"].content.as_ref().unwrap()["application/json"]
        .schema
        .as_ref()
        .unwrap()
        .as_schema()
        .unwrap();
    assert_eq!(list.single_type(), Some(SchemaType::Array));
    let item = list.items.as_ref().unwrap().as_schema().unwrap();
    assert_eq!(item.single_type(), Some(SchemaType::Object));
    assert_eq!(
        item.properties["children"],
        SchemaNode::CircularRef {
            pointer: "#/components/schemas/Item".to_string()
        }
    );
}
