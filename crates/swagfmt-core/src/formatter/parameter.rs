use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::{DataType, Element, Parameter, ParameterLocation, Response};

use super::classify::apply_common_properties;
use super::{BuildContext, local_ref};

/// Build one parameter object.
///
/// A record-shaped parameter is only legal in the body, and only as a
/// same-document reference; both violations fail naming the parameter.
pub(crate) fn format_parameter(
    ctx: &mut BuildContext<'_>,
    parameter: &Parameter,
) -> Result<JsonMap, FormatError> {
    let mut content = JsonMap::new();
    if let Some(location) = parameter.location {
        content.insert("in".to_string(), Value::from(location.as_str()));
    }

    let element = &parameter.element;
    if element.properties.is_list() {
        content.insert("type".to_string(), Value::from("array"));
        let target = array_item_type(element);
        let items = if ctx.is_local(target) {
            let mut items = JsonMap::new();
            items.insert("$ref".to_string(), Value::String(local_ref(target)));
            items
        } else {
            let mut items = JsonMap::new();
            apply_common_properties(ctx.options, target, &mut items, true, &element.properties)?;
            items
        };
        content.insert("items".to_string(), Value::Object(items));
    } else if element.data_type.is_record() {
        if parameter.location != Some(ParameterLocation::Body) {
            return Err(FormatError::ComplexParameterOutsideBody(
                parameter.name.clone(),
            ));
        }
        if !ctx.is_local(&element.data_type) {
            return Err(FormatError::ComplexParameterNotDefined(
                parameter.name.clone(),
            ));
        }
        content.insert(
            "schema".to_string(),
            Value::Object(ref_schema(&element.data_type)),
        );
    } else if ctx.is_local(&element.data_type) {
        content.insert(
            "schema".to_string(),
            Value::Object(ref_schema(&element.data_type)),
        );
    } else {
        apply_common_properties(
            ctx.options,
            &element.data_type,
            &mut content,
            false,
            &element.properties,
        )?;
    }

    // The declared parameter name wins over any name carried in the bag.
    content.insert("name".to_string(), Value::from(parameter.name.as_str()));
    if let Some(allow_empty) = parameter.allow_empty_value {
        content.insert("allowEmptyValue".to_string(), Value::Bool(allow_empty));
    }
    if let Some(default_value) = &parameter.default_value {
        content.insert("default".to_string(), default_value.clone());
    }
    if let Some(unique) = parameter.unique_items {
        content.insert("uniqueItems".to_string(), Value::Bool(unique));
    }
    if let Some(multiple_of) = parameter.multiple_of {
        content.insert("multipleOf".to_string(), Value::from(multiple_of));
    }
    if let Some(collection_format) = parameter.collection_format {
        content.insert(
            "collectionFormat".to_string(),
            Value::from(collection_format.as_str()),
        );
    }
    Ok(content)
}

/// Build the body schema for a response.
///
/// A record-shaped response is only legal as a same-document reference; the
/// failure names the status code.
pub(crate) fn format_response_schema(
    ctx: &mut BuildContext<'_>,
    response: &Response,
    element: &Element,
) -> Result<JsonMap, FormatError> {
    let mut schema = JsonMap::new();
    let props = &element.properties;

    if props.is_list() {
        schema.insert("type".to_string(), Value::from("array"));
        if let Some(max_occurs) = props.max_occurs.filter(|m| *m != 0) {
            schema.insert("maxItems".to_string(), Value::from(max_occurs));
        }
        schema.insert(
            "minItems".to_string(),
            Value::from(props.min_occurs.unwrap_or(1)),
        );
        let target = array_item_type(element);
        let items = if ctx.is_local(target) {
            ref_schema(target)
        } else {
            let mut items = JsonMap::new();
            apply_common_properties(ctx.options, target, &mut items, true, props)?;
            items
        };
        schema.insert("items".to_string(), Value::Object(items));
    } else if element.data_type.is_record() {
        if !ctx.is_local(&element.data_type) {
            return Err(FormatError::ComplexResponseNotDefined(code_label(response)));
        }
        schema = ref_schema(&element.data_type);
    } else if ctx.is_local(&element.data_type) {
        schema = ref_schema(&element.data_type);
    } else {
        apply_common_properties(ctx.options, &element.data_type, &mut schema, true, props)?;
    }
    Ok(schema)
}

/// The `"default"` response or the numeric status code.
pub(crate) fn code_label(response: &Response) -> String {
    match response.code {
        Some(code) => code.to_string(),
        None => "default".to_string(),
    }
}

/// The item type for an array-shaped element. When the element's type itself
/// carries list cardinality it is an array-via-extension wrapper (from an
/// externally parsed document) and the real item type is its parent.
fn array_item_type(element: &Element) -> &DataType {
    let ty = &element.data_type;
    if ty.properties().is_list() {
        ty.super_type().unwrap_or(ty)
    } else {
        ty
    }
}

fn ref_schema(ty: &DataType) -> JsonMap {
    let mut schema = JsonMap::new();
    schema.insert("$ref".to_string(), Value::String(local_ref(ty)));
    schema
}
