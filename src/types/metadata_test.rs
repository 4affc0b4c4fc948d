//! Tests for `Metadata`.

use super::Metadata;
use serde_json::json;

fn meta(value: serde_json::Value) -> Metadata {
  Metadata::from_value(value).expect("test metadata must be an object")
}

#[test]
fn merge_adds_missing_keys() {
  let mut base = meta(json!({ "language": "en" }));
  base.merge(&meta(json!({ "pages": 12 })));
  assert_eq!(base.get("language"), Some(&json!("en")));
  assert_eq!(base.get("pages"), Some(&json!(12)));
}

#[test]
fn merge_overwrites_scalar_leaves_with_patch() {
  let mut base = meta(json!({ "language": "en", "pages": 2 }));
  base.merge(&meta(json!({ "pages": 12 })));
  assert_eq!(base.get("pages"), Some(&json!(12)));
  assert_eq!(base.get("language"), Some(&json!("en")));
}

#[test]
fn merge_recurses_into_nested_objects() {
  let mut base = meta(json!({ "stats": { "words": 100, "lines": 4 } }));
  base.merge(&meta(json!({ "stats": { "lines": 9, "bytes": 7500 } })));
  assert_eq!(
    base.get("stats"),
    Some(&json!({ "words": 100, "lines": 9, "bytes": 7500 }))
  );
}

#[test]
fn merge_concatenates_arrays() {
  let mut base = meta(json!({ "keywords": ["alpha", "beta"] }));
  base.merge(&meta(json!({ "keywords": ["gamma"] })));
  assert_eq!(base.get("keywords"), Some(&json!(["alpha", "beta", "gamma"])));
}

#[test]
fn merge_replaces_on_shape_mismatch() {
  let mut base = meta(json!({ "topic": ["a", "b"] }));
  base.merge(&meta(json!({ "topic": "news" })));
  assert_eq!(base.get("topic"), Some(&json!("news")));
}

#[test]
fn scalar_patch_is_idempotent() {
  let patch = meta(json!({ "language": "fr", "stats": { "pages": 3 } }));
  let mut once = meta(json!({ "language": "en" }));
  once.merge(&patch);
  let mut twice = once.clone();
  twice.merge(&patch);
  assert_eq!(once, twice);
}

#[test]
fn from_value_rejects_non_objects() {
  assert!(Metadata::from_value(json!([1, 2, 3])).is_none());
  assert!(Metadata::from_value(json!("plain")).is_none());
  assert!(Metadata::from_value(json!(null)).is_none());
}

#[test]
fn serializes_transparently_as_object() {
  let m = meta(json!({ "language": "en" }));
  let text = serde_json::to_string(&m).expect("serialize");
  assert_eq!(text, r#"{"language":"en"}"#);
  let back: Metadata = serde_json::from_str(&text).expect("deserialize");
  assert_eq!(back, m);
}
