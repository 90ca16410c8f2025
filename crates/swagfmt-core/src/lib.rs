pub mod error;
pub mod formatter;
pub mod model;
pub mod options;

pub use error::{FormatError, ModelError};
pub use formatter::SwaggerFormatter;
pub use options::FormatOptions;

/// An ordered JSON object, the building block of the output tree.
///
/// `serde_json` is compiled with `preserve_order`, so insertion order is
/// serialization order and repeated builds of the same model produce
/// byte-identical documents.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;
