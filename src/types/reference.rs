//! Lazy references to values a stage needs at run time.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON shape a pointer promises to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
  String,
  Number,
  Boolean,
  Object,
  Array,
}

impl ValueKind {
  /// Whether `value` has this shape.
  pub fn matches(&self, value: &Value) -> bool {
    match self {
      ValueKind::String => value.is_string(),
      ValueKind::Number => value.is_number(),
      ValueKind::Boolean => value.is_boolean(),
      ValueKind::Object => value.is_object(),
      ValueKind::Array => value.is_array(),
    }
  }

  /// Shape name of an arbitrary JSON value, for error messages.
  pub(crate) fn name_of(value: &Value) -> &'static str {
    match value {
      Value::Null => "null",
      Value::Bool(_) => "boolean",
      Value::Number(_) => "number",
      Value::String(_) => "string",
      Value::Array(_) => "array",
      Value::Object(_) => "object",
    }
  }
}

impl fmt::Display for ValueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValueKind::String => write!(f, "string"),
      ValueKind::Number => write!(f, "number"),
      ValueKind::Boolean => write!(f, "boolean"),
      ValueKind::Object => write!(f, "object"),
      ValueKind::Array => write!(f, "array"),
    }
  }
}

/// A value a stage needs, described rather than carried.
///
/// `Value` embeds the datum directly. `Path` points into the context
/// event by dotted attribute path. `Pointer` names external storage
/// plus the JSON shape stored there. Nothing is fetched until the
/// resolver is asked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reference {
  Value { value: Value },
  Path { path: String },
  Pointer {
    location: String,
    #[serde(rename = "valueType")]
    value_type: ValueKind,
  },
}

impl Reference {
  /// An immediate value, resolved to itself.
  pub fn value(value: impl Into<Value>) -> Self {
    Reference::Value { value: value.into() }
  }

  /// A dotted path into the context event's wire form.
  pub fn path(path: impl Into<String>) -> Self {
    Reference::Path { path: path.into() }
  }

  /// A location in external storage expected to hold `value_type`.
  pub fn pointer(location: impl Into<String>, value_type: ValueKind) -> Self {
    Reference::Pointer {
      location: location.into(),
      value_type,
    }
  }
}
