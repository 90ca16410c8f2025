use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structural data type: a scalar leaf or a record with child elements.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    Scalar(ScalarType),
    Record(RecordType),
}

// Serialized as a singleton map (`scalar: {..}` / `record: {..}`) so the YAML
// form matches the JSON form; the yaml-native `!scalar` tag form is not used.
impl Serialize for DataType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        #[serde(rename_all = "snake_case")]
        enum Repr<'a> {
            Scalar(&'a ScalarType),
            Record(&'a RecordType),
        }
        let repr = match self {
            DataType::Scalar(s) => Repr::Scalar(s),
            DataType::Record(r) => Repr::Record(r),
        };
        serde_yaml_ng::with::singleton_map::serialize(&repr, serializer)
    }
}

impl<'de> Deserialize<'de> for DataType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "snake_case")]
        enum Repr {
            Scalar(ScalarType),
            Record(RecordType),
        }
        serde_yaml_ng::with::singleton_map::deserialize(deserializer).map(|repr| match repr {
            Repr::Scalar(s) => DataType::Scalar(s),
            Repr::Record(r) => DataType::Record(r),
        })
    }
}

impl DataType {
    pub fn name(&self) -> Option<&str> {
        match self {
            DataType::Scalar(s) => s.name.as_deref(),
            DataType::Record(r) => r.name.as_deref(),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        match self {
            DataType::Scalar(s) => s.namespace.as_deref(),
            DataType::Record(r) => r.namespace.as_deref(),
        }
    }

    /// The registration id, when this is a defined type. Used as the
    /// `definitions` key for types referenced across documents.
    pub fn id(&self) -> Option<&str> {
        match self {
            DataType::Scalar(s) => s.id.as_deref(),
            DataType::Record(r) => r.id.as_deref(),
        }
    }

    pub fn properties(&self) -> &Properties {
        match self {
            DataType::Scalar(s) => &s.properties,
            DataType::Record(r) => &r.properties,
        }
    }

    pub fn super_type(&self) -> Option<&DataType> {
        match self {
            DataType::Scalar(_) => None,
            DataType::Record(r) => r.extends.as_deref(),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, DataType::Record(_))
    }
}

/// A leaf type backed by a primitive value kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScalarType {
    pub kind: ScalarKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub properties: Properties,
}

impl Default for ScalarType {
    fn default() -> Self {
        Self {
            kind: ScalarKind::String,
            name: None,
            namespace: None,
            id: None,
            properties: Properties::default(),
        }
    }
}

/// A structural type with an ordered set of child elements, optionally
/// extending one parent type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub properties: Properties,
    pub elements: Vec<Element>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<Box<DataType>>,
}

impl RecordType {
    /// All child elements including inherited ones, parent chain first.
    pub fn all_elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        if let Some(DataType::Record(parent)) = self.extends.as_deref() {
            out.extend(parent.all_elements());
        }
        out.extend(self.elements.iter());
        out
    }
}

/// The primitive value kind backing a scalar type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScalarKind {
    Boolean,
    /// A byte sequence, rendered as base64.
    Bytes,
    /// A binary stream.
    Stream,
    /// A temporal value; granularity comes from the `format` property.
    Date,
    Int32,
    Int64,
    BigInteger,
    Float32,
    Float64,
    BigDecimal,
    String,
    Uri,
    Uuid,
    /// A value kind with no swagger mapping; classification fails on it.
    Opaque(String),
}

/// A named, typed field of a record.
///
/// A leading `@` on the name marks the field as an XML attribute. Cardinality
/// and the dynamic-name marker live in the property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: DataType,
    #[serde(default)]
    pub properties: Properties,
}

/// The property bag carried by types and elements: cardinality, value
/// constraints, and rendering hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Properties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_occurs: Option<u32>,
    /// `0` means unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_occurs: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_inclusive: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_inclusive: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_exclusive: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_exclusive: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Exact length; swagger has no keyword for it, so it renders as both
    /// `minLength` and `maxLength`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enumeration: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Temporal granularity hint for date scalars.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Marks this element as a wildcard/map key; the value is the name of the
    /// dynamic field inside the item type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dynamic_name: Option<String>,
}

impl Properties {
    /// Whether this cardinality marks a repeated field.
    pub fn is_list(&self) -> bool {
        self.max_occurs.is_some_and(|m| m != 1)
    }
}

/// The set of types registered under namespaces, backing `$ref` emission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    pub types: Vec<DataType>,
}

impl TypeRegistry {
    /// All record types registered under the given namespace, in order.
    pub fn record_types<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a DataType> {
        self.types
            .iter()
            .filter(move |t| t.is_record() && t.namespace() == Some(namespace))
    }

    /// All scalar types registered under the given namespace, in order.
    pub fn scalar_types<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a DataType> {
        self.types
            .iter()
            .filter(move |t| !t.is_record() && t.namespace() == Some(namespace))
    }
}
