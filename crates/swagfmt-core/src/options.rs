use serde::Deserialize;

/// Rendering toggles for the formatter.
///
/// These are explicit options rather than global state so two formatters with
/// different settings can coexist in one process.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    /// Flatten single-level inheritance into one `properties` map instead of
    /// emitting `allOf` with a `$ref` to the parent.
    pub expand_inline: bool,

    /// Permit `$ref`s to defined types outside the current document. Each such
    /// reference is queued and eventually emitted into `definitions`; when
    /// disabled the type is expanded inline instead.
    pub allow_defined_type_references: bool,

    /// Emit non-standard format strings (`uri`, `uuid`, `bigDecimal`,
    /// `bigInteger`, `time`). When disabled, the nearest standard format is
    /// used instead.
    pub allow_custom_formats: bool,

    /// Include documentation fields: `info`, `tags`, `summary`, `description`,
    /// `externalDocs`.
    pub include_documentation: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            expand_inline: false,
            allow_defined_type_references: false,
            allow_custom_formats: true,
            include_documentation: true,
        }
    }
}
