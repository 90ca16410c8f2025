mod classify;
mod closure;
mod defined;
mod document;
mod element;
mod parameter;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::{DataType, Definition};
use crate::options::FormatOptions;

use closure::ReferenceQueue;

/// Compiles a [`Definition`] into a swagger 2.0 document tree.
///
/// The formatter itself is stateless across runs; each `format` call owns its
/// own reference queue and output tree.
#[derive(Debug, Clone, Default)]
pub struct SwaggerFormatter {
    options: FormatOptions,
}

impl SwaggerFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: FormatOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormatOptions {
        &self.options
    }

    /// Build the document tree, ready for JSON or YAML serialization.
    pub fn format(&self, definition: &Definition) -> Result<JsonMap, FormatError> {
        let mut ctx = BuildContext {
            definition: Some(definition),
            options: &self.options,
            referenced: ReferenceQueue::default(),
        };
        document::build_document(&mut ctx, definition)
    }

    /// Build the document and serialize it to pretty-printed JSON.
    pub fn format_to_string(&self, definition: &Definition) -> Result<String, FormatError> {
        let map = self.format(definition)?;
        Ok(serde_json::to_string_pretty(&map)?)
    }
}

/// Build the schema tree for a single type outside any document. With no
/// document there is no namespace to reference against, so the type is
/// expanded fully inline.
pub fn format_type(ty: &DataType, options: &FormatOptions) -> Result<JsonMap, FormatError> {
    let mut ctx = BuildContext {
        definition: None,
        options,
        referenced: ReferenceQueue::default(),
    };
    defined::format_defined_type(&mut ctx, ty, true)
}

/// Render a single type as a pretty-printed JSON schema string, with default
/// options.
pub fn format_type_as_json(ty: &DataType) -> Result<String, FormatError> {
    let map = format_type(ty, &FormatOptions::default())?;
    Ok(serde_json::to_string_pretty(&map)?)
}

/// Per-run build state threaded through every builder call.
pub(crate) struct BuildContext<'a> {
    pub definition: Option<&'a Definition>,
    pub options: &'a FormatOptions,
    pub referenced: ReferenceQueue,
}

impl BuildContext<'_> {
    /// Whether the type is registered under the current document's namespace.
    pub(crate) fn is_local(&self, ty: &DataType) -> bool {
        match self.definition {
            Some(definition) => ty.namespace() == Some(definition.id.as_str()),
            None => false,
        }
    }
}

/// A same-document reference to a registered type.
pub(crate) fn local_ref(ty: &DataType) -> String {
    format!("#/definitions/{}", ty.name().unwrap_or_default())
}
