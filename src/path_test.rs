//! Tests for dotted attribute path lookup.

use super::path::lookup;
use serde_json::json;

#[test]
fn walks_nested_objects() {
  let root = json!({ "payload": { "metadata": { "language": "en" } } });
  assert_eq!(lookup(&root, "payload.metadata.language"), Some(&json!("en")));
  assert_eq!(lookup(&root, "payload.metadata"), Some(&json!({ "language": "en" })));
}

#[test]
fn indexes_arrays_by_number() {
  let root = json!({ "payload": { "callHistory": ["ocr", "translate"] } });
  assert_eq!(lookup(&root, "payload.callHistory.0"), Some(&json!("ocr")));
  assert_eq!(lookup(&root, "payload.callHistory.1"), Some(&json!("translate")));
  assert_eq!(lookup(&root, "payload.callHistory.2"), None);
}

#[test]
fn missing_segments_resolve_to_none() {
  let root = json!({ "payload": { "metadata": {} } });
  assert_eq!(lookup(&root, "payload.metadata.language"), None);
  assert_eq!(lookup(&root, "payload.missing.language"), None);
  assert_eq!(lookup(&root, ""), None);
}

#[test]
fn scalar_prefixes_stop_the_walk() {
  let root = json!({ "type": "created" });
  assert_eq!(lookup(&root, "type.subfield"), None);
}

#[test]
fn non_numeric_array_segments_resolve_to_none() {
  let root = json!({ "items": [1, 2, 3] });
  assert_eq!(lookup(&root, "items.first"), None);
}
