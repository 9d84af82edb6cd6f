use indexmap::IndexMap;

use crate::model::{SecuritySchema, SecurityType};
use crate::parse::security::{
    SecurityScheme, SecuritySchemeType, Swagger2SecurityScheme, Swagger2SecurityType,
};

pub fn openapi3_security_schema(scheme: &SecurityScheme) -> SecuritySchema {
    let scheme_type = match scheme.scheme_type {
        SecuritySchemeType::ApiKey => SecurityType::ApiKey,
        SecuritySchemeType::Http => SecurityType::Http,
        SecuritySchemeType::OAuth2 => SecurityType::OAuth2,
        SecuritySchemeType::OpenIdConnect => SecurityType::OpenIdConnect,
        SecuritySchemeType::MutualTls => SecurityType::MutualTls,
        SecuritySchemeType::Unknown => SecurityType::Unknown,
    };

    let mut scopes = IndexMap::new();
    if let Some(flows) = &scheme.flows {
        for flow in flows.iter() {
            for (scope, description) in &flow.scopes {
                scopes
                    .entry(scope.clone())
                    .or_insert_with(|| description.clone());
            }
        }
    }

    SecuritySchema {
        scheme_type,
        name: scheme.name.clone(),
        location: scheme.location.clone(),
        scheme: scheme.scheme.clone(),
        bearer_format: scheme.bearer_format.clone(),
        description: scheme.description.clone(),
        scopes,
    }
}

/// Swagger `basic` is expressed as HTTP basic authentication.
pub fn swagger2_security_schema(scheme: &Swagger2SecurityScheme) -> SecuritySchema {
    let (scheme_type, http_scheme) = match scheme.scheme_type {
        Swagger2SecurityType::Basic => (SecurityType::Http, Some("basic".to_string())),
        Swagger2SecurityType::ApiKey => (SecurityType::ApiKey, None),
        Swagger2SecurityType::OAuth2 => (SecurityType::OAuth2, None),
        Swagger2SecurityType::Unknown => (SecurityType::Unknown, None),
    };

    SecuritySchema {
        scheme_type,
        name: scheme.name.clone(),
        location: scheme.location.clone(),
        scheme: http_scheme,
        bearer_format: None,
        description: scheme.description.clone(),
        scopes: scheme.scopes.clone(),
    }
}
