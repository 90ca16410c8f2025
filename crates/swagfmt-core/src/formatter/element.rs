use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::{DataType, Element};

use super::classify::{apply_common_properties, attribute_xml};
use super::{BuildContext, local_ref};

/// Build the schema fragment for one element.
///
/// Repetition wraps the base schema in `{type: "array", items: ...}`; the
/// recursive call ignores cardinality so nesting never double-wraps. A type
/// registered under the current document gets a same-document `$ref`; an
/// external defined record gets a `$ref` by id and is queued for the closure
/// pass; everything else is expanded inline.
pub(crate) fn format_element(
    ctx: &mut BuildContext<'_>,
    element: &Element,
    part_of_object: bool,
    ignore_max_occurs: bool,
) -> Result<JsonMap, FormatError> {
    let mut content = JsonMap::new();

    if !ignore_max_occurs && element.properties.is_list() {
        let items = format_element(ctx, element, part_of_object, true)?;
        content.insert("type".to_string(), Value::from("array"));
        content.insert("items".to_string(), Value::Object(items));
        return Ok(content);
    }

    let ty = &element.data_type;
    let external_id = if ctx.options.allow_defined_type_references && ty.is_record() {
        ty.id()
    } else {
        None
    };

    if ctx.is_local(ty) {
        let mut schema = JsonMap::new();
        schema.insert("$ref".to_string(), Value::String(local_ref(ty)));
        content.insert("schema".to_string(), Value::Object(schema));
    } else if let Some(id) = external_id {
        let reference = format!("#/definitions/{id}");
        if part_of_object {
            content.insert("$ref".to_string(), Value::String(reference));
        } else {
            let mut schema = JsonMap::new();
            schema.insert("$ref".to_string(), Value::String(reference));
            content.insert("schema".to_string(), Value::Object(schema));
        }
        // Make sure the target is (eventually) emitted into definitions.
        ctx.referenced.enqueue(id.to_string(), ty.clone());
    } else {
        apply_common_properties(ctx.options, ty, &mut content, part_of_object, &element.properties)?;
        if let DataType::Record(record) = ty {
            let children = record.all_elements();
            let fields = format_record_children(ctx, &children)?;
            fields.insert_into(&mut content);
        }
    }
    Ok(content)
}

/// The three output pieces a record's children produce.
#[derive(Default)]
pub(crate) struct RecordFields {
    pub required: Vec<Value>,
    pub properties: JsonMap,
    pub additional: JsonMap,
}

impl RecordFields {
    /// Insert the non-empty pieces into an inline schema. The `allOf` case in
    /// the defined-type builder splits them up instead (additionalProperties
    /// belongs on the enclosing schema there, not on the extension).
    pub(crate) fn insert_into(self, target: &mut JsonMap) {
        if !self.required.is_empty() {
            target.insert("required".to_string(), Value::Array(self.required));
        }
        if !self.properties.is_empty() {
            target.insert("properties".to_string(), Value::Object(self.properties));
        }
        if !self.additional.is_empty() {
            target.insert(
                "additionalProperties".to_string(),
                Value::Object(self.additional),
            );
        }
    }
}

/// Process a record's children into properties, the required list, and the
/// merged `additionalProperties` of dynamic-name children.
pub(crate) fn format_record_children(
    ctx: &mut BuildContext<'_>,
    children: &[&Element],
) -> Result<RecordFields, FormatError> {
    let mut fields = RecordFields::default();
    for child in children {
        let min_occurs = child.properties.min_occurs;
        let (name, is_attribute) = match child.name.strip_prefix('@') {
            Some(stripped) => (stripped.to_string(), true),
            None => (child.name.clone(), false),
        };
        let mut child_schema = format_element(ctx, child, true, false)?;

        let dynamic_list = child
            .properties
            .dynamic_name
            .as_deref()
            .filter(|_| child.properties.is_list());
        match dynamic_list {
            // A repeated dynamic-name child is the wildcard/map encoding: its
            // item schema (minus the dynamic field itself) becomes the
            // parent's additionalProperties instead of a named property.
            Some(dynamic) if child_schema.contains_key("items") => {
                if let Some(Value::Object(mut items)) = child_schema.shift_remove("items") {
                    prune_dynamic_field(&mut items, dynamic);
                    for (key, value) in items {
                        fields.additional.insert(key, value);
                    }
                }
            }
            _ => {
                if is_attribute {
                    child_schema.insert("xml".to_string(), Value::Object(attribute_xml(&name)));
                }
                if min_occurs.is_none_or(|m| m != 0) {
                    fields.required.push(Value::String(name.clone()));
                }
                fields.properties.insert(name, Value::Object(child_schema));
            }
        }
    }
    Ok(fields)
}

/// Remove the dynamic field from the item schema's `required` and
/// `properties`, dropping either key if it ends up empty.
fn prune_dynamic_field(items: &mut JsonMap, dynamic: &str) {
    if let Some(Value::Array(required)) = items.get_mut("required") {
        required.retain(|name| name.as_str() != Some(dynamic));
        if required.is_empty() {
            items.shift_remove("required");
        }
    }
    if let Some(Value::Object(properties)) = items.get_mut("properties") {
        properties.shift_remove(dynamic);
        if properties.is_empty() {
            items.shift_remove("properties");
        }
    }
}
