use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A named security scheme declared by the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SecurityKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// For `apiKey`: the header or query parameter carrying the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ApiKeyLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<OAuthFlow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub scopes: IndexMap<String, String>,
}

impl Default for SecurityDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: SecurityKind::Basic,
            description: None,
            field_name: None,
            location: None,
            flow: None,
            token_url: None,
            authorization_url: None,
            scopes: IndexMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecurityKind {
    Basic,
    ApiKey,
    #[serde(rename = "oauth2")]
    OAuth2,
}

impl SecurityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityKind::Basic => "basic",
            SecurityKind::ApiKey => "apiKey",
            SecurityKind::OAuth2 => "oauth2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
}

impl ApiKeyLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiKeyLocation::Query => "query",
            ApiKeyLocation::Header => "header",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OAuthFlow {
    Implicit,
    Password,
    Application,
    AccessCode,
}

impl OAuthFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthFlow::Implicit => "implicit",
            OAuthFlow::Password => "password",
            OAuthFlow::Application => "application",
            OAuthFlow::AccessCode => "accessCode",
        }
    }
}

/// A security requirement: a scheme name plus the requested scopes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecuritySetting {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
}
