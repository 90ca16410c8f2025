pub mod document;
pub mod security;
pub mod types;

pub use document::{
    CollectionFormat, Contact, Definition, ExternalDocs, HttpVerb, Info, License, Method,
    Parameter, ParameterLocation, PathSpec, Response, Tag,
};
pub use security::{ApiKeyLocation, OAuthFlow, SecurityDefinition, SecurityKind, SecuritySetting};
pub use types::{DataType, Element, Properties, RecordType, ScalarKind, ScalarType, TypeRegistry};

use crate::error::ModelError;

/// Deserialize a definition from YAML.
pub fn from_yaml(input: &str) -> Result<Definition, ModelError> {
    let definition: Definition = serde_yaml_ng::from_str(input)?;
    validate_version(&definition)?;
    Ok(definition)
}

/// Deserialize a definition from JSON.
pub fn from_json(input: &str) -> Result<Definition, ModelError> {
    let definition: Definition = serde_json::from_str(input)?;
    validate_version(&definition)?;
    Ok(definition)
}

fn validate_version(definition: &Definition) -> Result<(), ModelError> {
    if !definition.swagger.starts_with("2.") {
        return Err(ModelError::UnsupportedVersion(definition.swagger.clone()));
    }
    Ok(())
}
