use serde_json::Value;

use crate::JsonMap;
use crate::error::FormatError;
use crate::model::{DataType, Properties, ScalarKind, ScalarType};
use crate::options::FormatOptions;

/// The swagger `(type, format)` pair a scalar classifies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Classified {
    pub type_name: &'static str,
    pub format: Option<&'static str>,
}

/// Temporal granularity of a date format hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    Date,
    Time,
    Timestamp,
}

fn granularity(format: &str) -> Granularity {
    match format {
        "date" => Granularity::Date,
        "time" => Granularity::Time,
        "dateTime" | "timestamp" => Granularity::Timestamp,
        pattern => {
            // Pattern sniffing for explicit date patterns like "yyyy-MM-dd".
            let has_date = pattern.contains(['y', 'd']) || pattern.contains('M');
            let has_time = pattern.contains(['H', 'h', 's']) || pattern.contains('m');
            match (has_date, has_time) {
                (true, false) => Granularity::Date,
                (false, true) => Granularity::Time,
                _ => Granularity::Timestamp,
            }
        }
    }
}

/// Map a scalar's value kind to its `(type, format)` pair.
///
/// Time-granularity dates and the big-number/uri/uuid kinds carry no standard
/// swagger format; they get a custom format string when custom formats are
/// allowed and fall back to the nearest standard rendering otherwise.
pub(crate) fn classify_scalar(
    scalar: &ScalarType,
    props: &Properties,
    allow_custom_formats: bool,
) -> Result<Classified, FormatError> {
    let (type_name, format) = match &scalar.kind {
        ScalarKind::Boolean => ("boolean", None),
        ScalarKind::Bytes => ("string", Some("byte")),
        ScalarKind::Stream => ("string", Some("binary")),
        ScalarKind::Date => {
            let format = match props.format.as_deref().map(granularity) {
                Some(Granularity::Date) => "date",
                Some(Granularity::Time) if allow_custom_formats => "time",
                _ => "date-time",
            };
            ("string", Some(format))
        }
        ScalarKind::Int32 => ("integer", Some("int32")),
        ScalarKind::Int64 => ("integer", Some("int64")),
        ScalarKind::BigInteger => ("integer", allow_custom_formats.then_some("bigInteger")),
        ScalarKind::Float32 => ("number", Some("float")),
        ScalarKind::Float64 => ("number", Some("double")),
        ScalarKind::BigDecimal => ("number", allow_custom_formats.then_some("bigDecimal")),
        ScalarKind::String => ("string", None),
        ScalarKind::Uri => ("string", allow_custom_formats.then_some("uri")),
        ScalarKind::Uuid => ("string", allow_custom_formats.then_some("uuid")),
        ScalarKind::Opaque(class) => return Err(FormatError::UnsupportedType(class.clone())),
    };
    Ok(Classified { type_name, format })
}

/// Best-effort conversion of a constraint value to a double. Bounds can carry
/// broader meanings (e.g. dates) that swagger cannot represent; those return
/// `None` and the constraint is skipped rather than failing the build.
pub(crate) fn as_double(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Render the shared schema fields for a type: parameter-level name/required
/// (when not nested in an object), value constraints, and the `type`/`format`
/// pair.
pub(crate) fn apply_common_properties(
    options: &FormatOptions,
    ty: &DataType,
    content: &mut JsonMap,
    part_of_object: bool,
    props: &Properties,
) -> Result<(), FormatError> {
    if !part_of_object {
        // "required" defaults to false, so only emit it when set.
        if props.min_occurs.is_none_or(|m| m == 1) {
            content.insert("required".to_string(), Value::Bool(true));
        }
        if let Some(name) = &props.name {
            if let Some(stripped) = name.strip_prefix('@') {
                content.insert("name".to_string(), Value::from(stripped));
                content.insert("xml".to_string(), Value::Object(attribute_xml(stripped)));
            } else {
                content.insert("name".to_string(), Value::from(name.as_str()));
            }
        }
    }

    if let Some(max) = props.max_exclusive.as_ref().and_then(as_double) {
        content.insert("maximum".to_string(), Value::from(max));
        content.insert("exclusiveMaximum".to_string(), Value::Bool(true));
    } else if let Some(max) = props.max_inclusive.as_ref().and_then(as_double) {
        content.insert("maximum".to_string(), Value::from(max));
        content.insert("exclusiveMaximum".to_string(), Value::Bool(false));
    }

    if let Some(min) = props.min_exclusive.as_ref().and_then(as_double) {
        content.insert("minimum".to_string(), Value::from(min));
        content.insert("exclusiveMinimum".to_string(), Value::Bool(true));
    } else if let Some(min) = props.min_inclusive.as_ref().and_then(as_double) {
        content.insert("minimum".to_string(), Value::from(min));
        content.insert("exclusiveMinimum".to_string(), Value::Bool(false));
    }

    if let Some(max_length) = props.max_length {
        content.insert("maxLength".to_string(), Value::from(max_length));
    }
    if let Some(min_length) = props.min_length {
        content.insert("minLength".to_string(), Value::from(min_length));
    }
    // No exact-length keyword in swagger.
    if let Some(length) = props.length {
        content.insert("minLength".to_string(), Value::from(length));
        content.insert("maxLength".to_string(), Value::from(length));
    }
    if let Some(pattern) = &props.pattern {
        content.insert("pattern".to_string(), Value::from(pattern.as_str()));
    }
    if let Some(enumeration) = &props.enumeration {
        content.insert("enum".to_string(), Value::Array(enumeration.clone()));
    }
    if let Some(comment) = &props.comment {
        content.insert("description".to_string(), Value::from(comment.as_str()));
    }

    match ty {
        DataType::Scalar(scalar) => {
            let classified = classify_scalar(scalar, props, options.allow_custom_formats)?;
            content.insert("type".to_string(), Value::from(classified.type_name));
            if let Some(format) = classified.format {
                content.insert("format".to_string(), Value::from(format));
            }
        }
        DataType::Record(_) => {
            content.insert("type".to_string(), Value::from("object"));
        }
    }
    Ok(())
}

/// The `xml` side-channel marking a field as an XML attribute.
pub(crate) fn attribute_xml(name: &str) -> JsonMap {
    let mut xml = JsonMap::new();
    xml.insert("attribute".to_string(), Value::Bool(true));
    xml.insert("name".to_string(), Value::from(name));
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scalar(kind: ScalarKind) -> ScalarType {
        ScalarType {
            kind,
            ..ScalarType::default()
        }
    }

    fn classify(kind: ScalarKind) -> Classified {
        classify_scalar(&scalar(kind), &Properties::default(), true).unwrap()
    }

    #[test]
    fn test_classification_table() {
        let cases = [
            (ScalarKind::Boolean, "boolean", None),
            (ScalarKind::Bytes, "string", Some("byte")),
            (ScalarKind::Stream, "string", Some("binary")),
            (ScalarKind::Date, "string", Some("date-time")),
            (ScalarKind::Int32, "integer", Some("int32")),
            (ScalarKind::Int64, "integer", Some("int64")),
            (ScalarKind::BigInteger, "integer", Some("bigInteger")),
            (ScalarKind::Float32, "number", Some("float")),
            (ScalarKind::Float64, "number", Some("double")),
            (ScalarKind::BigDecimal, "number", Some("bigDecimal")),
            (ScalarKind::String, "string", None),
            (ScalarKind::Uri, "string", Some("uri")),
            (ScalarKind::Uuid, "string", Some("uuid")),
        ];
        for (kind, type_name, format) in cases {
            let classified = classify(kind.clone());
            assert_eq!(classified.type_name, type_name, "{kind:?}");
            assert_eq!(classified.format, format, "{kind:?}");
        }
    }

    #[test]
    fn test_custom_formats_disabled_fall_back() {
        let props = Properties::default();
        for (kind, format) in [
            (ScalarKind::BigInteger, None),
            (ScalarKind::BigDecimal, None),
            (ScalarKind::Uri, None),
            (ScalarKind::Uuid, None),
        ] {
            let classified = classify_scalar(&scalar(kind), &props, false).unwrap();
            assert_eq!(classified.format, format);
        }
    }

    #[test]
    fn test_date_granularity() {
        let cases = [
            ("date", true, "date"),
            ("time", true, "time"),
            ("time", false, "date-time"),
            ("dateTime", true, "date-time"),
            ("yyyy-MM-dd", true, "date"),
            ("HH:mm:ss", true, "time"),
            ("yyyy-MM-dd'T'HH:mm:ss", true, "date-time"),
        ];
        for (format, allow_custom, expected) in cases {
            let props = Properties {
                format: Some(format.to_string()),
                ..Properties::default()
            };
            let classified = classify_scalar(&scalar(ScalarKind::Date), &props, allow_custom).unwrap();
            assert_eq!(classified.format, Some(expected), "{format}");
        }
    }

    #[test]
    fn test_unsupported_kind_fails() {
        let err = classify_scalar(
            &scalar(ScalarKind::Opaque("java.io.File".to_string())),
            &Properties::default(),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedType(c) if c == "java.io.File"));
    }

    #[test]
    fn test_constraint_rendering() {
        let props = Properties {
            max_exclusive: Some(json!(10)),
            min_inclusive: Some(json!(2)),
            pattern: Some("[a-z]+".to_string()),
            comment: Some("a word".to_string()),
            ..Properties::default()
        };
        let mut content = JsonMap::new();
        let ty = DataType::Scalar(scalar(ScalarKind::String));
        apply_common_properties(&FormatOptions::default(), &ty, &mut content, true, &props).unwrap();
        assert_eq!(
            Value::Object(content),
            json!({
                "maximum": 10.0,
                "exclusiveMaximum": true,
                "minimum": 2.0,
                "exclusiveMinimum": false,
                "pattern": "[a-z]+",
                "description": "a word",
                "type": "string",
            })
        );
    }

    #[test]
    fn test_exact_length_renders_both_bounds() {
        let props = Properties {
            length: Some(4),
            ..Properties::default()
        };
        let mut content = JsonMap::new();
        let ty = DataType::Scalar(scalar(ScalarKind::String));
        apply_common_properties(&FormatOptions::default(), &ty, &mut content, true, &props).unwrap();
        assert_eq!(content["minLength"], json!(4));
        assert_eq!(content["maxLength"], json!(4));
    }

    #[test]
    fn test_unconvertible_bound_is_dropped() {
        let props = Properties {
            max_inclusive: Some(json!("2024-01-01")),
            ..Properties::default()
        };
        let mut content = JsonMap::new();
        let ty = DataType::Scalar(scalar(ScalarKind::Date));
        apply_common_properties(&FormatOptions::default(), &ty, &mut content, true, &props).unwrap();
        assert!(!content.contains_key("maximum"));
        assert!(!content.contains_key("exclusiveMaximum"));
    }

    #[test]
    fn test_parameter_level_name_and_required() {
        let props = Properties {
            name: Some("@id".to_string()),
            min_occurs: Some(1),
            ..Properties::default()
        };
        let mut content = JsonMap::new();
        let ty = DataType::Scalar(scalar(ScalarKind::String));
        apply_common_properties(&FormatOptions::default(), &ty, &mut content, false, &props).unwrap();
        assert_eq!(content["required"], json!(true));
        assert_eq!(content["name"], json!("id"));
        assert_eq!(content["xml"], json!({"attribute": true, "name": "id"}));
    }
}
