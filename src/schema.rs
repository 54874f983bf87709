//! Schema node classification and field access
//!
//! Schema nodes stay as `serde_json::Value`. Access goes through
//! [`SchemaNode`], which turns absent or mistyped fields into named errors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseErrorKind;

/// The seven JSON Schema types a form can be rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl SchemaKind {
    /// Classify a `type` string. `None` for anything outside the seven kinds.
    pub fn parse(ty: &str) -> Option<Self> {
        match ty {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "null" => Some(Self::Null),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
        }
    }

    /// Mapping entry used to render this kind.
    ///
    /// `number` shares the `integer` template; enumerated strings use
    /// `string_enum` and are picked by the walker.
    pub fn mapping_name(&self) -> &'static str {
        match self {
            Self::Number => "integer",
            other => other.as_str(),
        }
    }
}

/// Read-only view over one schema node
#[derive(Debug, Clone, Copy)]
pub struct SchemaNode<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> SchemaNode<'a> {
    /// Wrap a JSON value, failing unless it is an object
    pub fn new(value: &'a Value) -> Result<Self, ParseErrorKind> {
        value
            .as_object()
            .map(|fields| Self { fields })
            .ok_or_else(|| ParseErrorKind::NotAnObject { found: describe(value) })
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// The `$ref` string, if this node is a reference
    pub fn reference(&self) -> Result<Option<&'a str>, ParseErrorKind> {
        self.optional_str("$ref")
    }

    /// The declared `type`, classified
    pub fn kind(&self) -> Result<SchemaKind, ParseErrorKind> {
        let ty = self.fields.get("type").ok_or(ParseErrorKind::MissingType)?;
        let ty = ty
            .as_str()
            .ok_or_else(|| ParseErrorKind::InvalidType { found: describe(ty) })?;
        SchemaKind::parse(ty).ok_or_else(|| ParseErrorKind::UnknownSchemaType { ty: ty.to_string() })
    }

    pub fn title(&self) -> Result<Option<&'a str>, ParseErrorKind> {
        self.optional_str("title")
    }

    pub fn description(&self) -> Result<Option<&'a str>, ParseErrorKind> {
        self.optional_str("description")
    }

    pub fn default_value(&self) -> Option<&'a Value> {
        self.fields.get("default")
    }

    /// `enum` values; `None` when absent
    pub fn enum_values(&self) -> Result<Option<&'a Vec<Value>>, ParseErrorKind> {
        match self.fields.get("enum") {
            None => Ok(None),
            Some(Value::Array(values)) => Ok(Some(values)),
            Some(other) => Err(ParseErrorKind::InvalidEnum { found: describe(other) }),
        }
    }

    /// `properties` in declaration order; `None` when absent
    pub fn properties(&self) -> Result<Option<&'a Map<String, Value>>, ParseErrorKind> {
        match self.fields.get("properties") {
            None => Ok(None),
            Some(props) => props.as_object().map(Some).ok_or(ParseErrorKind::InvalidProperties),
        }
    }

    pub fn items(&self) -> Option<&'a Value> {
        self.fields.get("items")
    }

    fn optional_str(&self, field: &'static str) -> Result<Option<&'a str>, ParseErrorKind> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::String(text)) => Ok(Some(text)),
            Some(other) => Err(ParseErrorKind::InvalidField {
                field,
                found: describe(other),
            }),
        }
    }
}

/// JSON truthiness: `false`, `null`, `0`, `""`, `[]` and `{}` are falsy
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Short human-readable description of a JSON value's type
pub(crate) fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(_) => "string".to_string(),
        Value::Array(_) => "array".to_string(),
        Value::Object(_) => "object".to_string(),
    }
}
