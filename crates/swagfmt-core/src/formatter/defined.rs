use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::DataType;

use super::classify::apply_common_properties;
use super::element::format_record_children;
use super::{BuildContext, local_ref};

/// Build the `definitions` entry for a registered type.
///
/// Three renderings, in precedence order: array-via-extension (cardinality on
/// the type itself, a convention of externally parsed documents), `allOf`
/// single-level inheritance when the parent is registered in the same document
/// and inline expansion is off, and full inline expansion with inherited
/// fields flattened in.
pub(crate) fn format_defined_type(
    ctx: &mut BuildContext<'_>,
    ty: &DataType,
    is_root: bool,
) -> Result<JsonMap, FormatError> {
    let props = ty.properties();
    let mut content = JsonMap::new();

    if !is_root && props.is_list() {
        content.insert("type".to_string(), Value::from("array"));
        if let Some(max_occurs) = props.max_occurs.filter(|m| *m != 0) {
            content.insert("maxItems".to_string(), Value::from(max_occurs));
        }
        content.insert(
            "minItems".to_string(),
            Value::from(props.min_occurs.unwrap_or(1)),
        );
        // The array type extends its item type.
        let items = match ty.super_type() {
            Some(super_type) if ctx.is_local(super_type) => {
                let mut items = JsonMap::new();
                items.insert("$ref".to_string(), Value::String(local_ref(super_type)));
                items
            }
            Some(super_type) => format_defined_type(ctx, super_type, false)?,
            None => JsonMap::new(),
        };
        content.insert("items".to_string(), Value::Object(items));
        return Ok(content);
    }

    let parent = if ctx.options.expand_inline {
        None
    } else {
        ty.super_type().filter(|s| ctx.is_local(s))
    };

    // Either the content itself or the allOf extension object.
    let mut target = JsonMap::new();
    apply_common_properties(ctx.options, ty, &mut target, true, props)?;

    match ty {
        DataType::Record(record) => {
            // With a referenced parent only the directly declared fields go
            // into the extension; otherwise the inheritance chain is
            // flattened.
            let children = if parent.is_some() {
                record.elements.iter().collect::<Vec<_>>()
            } else {
                record.all_elements()
            };
            let fields = format_record_children(ctx, &children)?;
            match parent {
                Some(parent) => {
                    content.insert("type".to_string(), Value::from("object"));
                    let mut parent_map = JsonMap::new();
                    parent_map.insert("$ref".to_string(), Value::String(local_ref(parent)));
                    let mut extension = target;
                    if !fields.required.is_empty() {
                        extension.insert("required".to_string(), Value::Array(fields.required));
                    }
                    if !fields.properties.is_empty() {
                        extension
                            .insert("properties".to_string(), Value::Object(fields.properties));
                    }
                    content.insert(
                        "allOf".to_string(),
                        Value::Array(vec![Value::Object(parent_map), Value::Object(extension)]),
                    );
                    if !fields.additional.is_empty() {
                        content.insert(
                            "additionalProperties".to_string(),
                            Value::Object(fields.additional),
                        );
                    }
                }
                None => {
                    let mut merged = target;
                    fields.insert_into(&mut merged);
                    content = merged;
                }
            }
        }
        DataType::Scalar(_) => {
            content = target;
        }
    }
    Ok(content)
}
