use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported swagger version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("no swagger mapping for scalar kind: {0}")]
    UnsupportedType(String),

    #[error("a complex input parameter can only exist in the body: {0}")]
    ComplexParameterOutsideBody(String),

    #[error("a complex body parameter can only exist as a reference to a defined type: {0}")]
    ComplexParameterNotDefined(String),

    #[error("a complex response can only exist as a reference to a defined type: {0}")]
    ComplexResponseNotDefined(String),

    #[error("could not format operations for path {path}: {source}")]
    Operation {
        path: String,
        #[source]
        source: Box<FormatError>,
    },

    #[error("could not format type {name}: {source}")]
    Definition {
        name: String,
        #[source]
        source: Box<FormatError>,
    },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}
