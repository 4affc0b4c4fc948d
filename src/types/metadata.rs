//! Nested enrichment attributes carried by an envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested enrichment attributes carried by an envelope.
///
/// Wraps a JSON object keyed by attribute name. Values may be scalars,
/// arrays, or further objects. Merging is a deep union: objects merge
/// key-wise, arrays concatenate, scalars are overwritten by the patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
  pub fn new() -> Self {
    Self(Map::new())
  }

  /// Wraps a JSON value, returning `None` when it is not an object.
  pub fn from_value(value: Value) -> Option<Self> {
    match value {
      Value::Object(map) => Some(Self(map)),
      _ => None,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Looks up a top-level attribute.
  pub fn get(&self, key: &str) -> Option<&Value> {
    self.0.get(key)
  }

  /// Sets one top-level attribute, replacing any existing value.
  pub fn insert(&mut self, key: impl Into<String>, value: Value) {
    self.0.insert(key.into(), value);
  }

  /// Deep union with `patch`.
  ///
  /// Keys absent on either side are kept. Where both sides hold objects
  /// the merge recurses; where both hold arrays the patch elements are
  /// appended; everything else is overwritten by the patch side.
  pub fn merge(&mut self, patch: &Metadata) {
    merge_map(&mut self.0, &patch.0);
  }

  pub fn as_map(&self) -> &Map<String, Value> {
    &self.0
  }
}

impl From<Map<String, Value>> for Metadata {
  fn from(map: Map<String, Value>) -> Self {
    Self(map)
  }
}

fn merge_map(dst: &mut Map<String, Value>, patch: &Map<String, Value>) {
  for (key, incoming) in patch {
    match dst.get_mut(key) {
      Some(existing) => merge_value(existing, incoming),
      None => {
        dst.insert(key.clone(), incoming.clone());
      }
    }
  }
}

fn merge_value(existing: &mut Value, incoming: &Value) {
  match (existing, incoming) {
    (Value::Object(dst), Value::Object(patch)) => merge_map(dst, patch),
    (Value::Array(dst), Value::Array(patch)) => dst.extend(patch.iter().cloned()),
    (dst, patch) => *dst = patch.clone(),
  }
}
