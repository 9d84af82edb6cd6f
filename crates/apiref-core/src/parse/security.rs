use indexmap::IndexMap;
use serde::Deserialize;

/// An OpenAPI 3.x security scheme type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SecuritySchemeType {
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "http")]
    Http,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "openIdConnect")]
    OpenIdConnect,
    #[serde(rename = "mutualTLS")]
    MutualTls,
    #[serde(other)]
    Unknown,
}

/// OAuth2 flows configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    #[serde(rename = "clientCredentials")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(rename = "authorizationCode")]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    /// Every flow that is declared, in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = &OAuthFlow> {
        [
            &self.implicit,
            &self.password,
            &self.client_credentials,
            &self.authorization_code,
        ]
        .into_iter()
        .flatten()
    }
}

/// A single OAuth2 flow.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OAuthFlow {
    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// An OpenAPI 3.x security scheme definition (`components.securitySchemes`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: SecuritySchemeType,

    pub description: Option<String>,

    pub name: Option<String>,

    #[serde(rename = "in")]
    pub location: Option<String>,

    pub scheme: Option<String>,

    #[serde(rename = "bearerFormat")]
    pub bearer_format: Option<String>,

    pub flows: Option<OAuthFlows>,
}

/// A Swagger 2.0 security definition type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Swagger2SecurityType {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(other)]
    Unknown,
}

/// A Swagger 2.0 security definition (`securityDefinitions`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Swagger2SecurityScheme {
    #[serde(rename = "type")]
    pub scheme_type: Swagger2SecurityType,

    pub description: Option<String>,

    pub name: Option<String>,

    #[serde(rename = "in")]
    pub location: Option<String>,

    pub flow: Option<String>,

    #[serde(default)]
    pub scopes: IndexMap<String, String>,
}

/// A security requirement: map of scheme name → required scopes.
pub type SecurityRequirement = IndexMap<String, Vec<String>>;
