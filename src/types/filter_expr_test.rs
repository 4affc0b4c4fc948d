//! Tests for `FilterExpression` construction.

use super::{CompareOp, FilterExpression};
use serde_json::json;

#[test]
fn constructors_capture_path_and_operand() {
  let expr = FilterExpression::equals("payload.metadata.language", "en");
  match expr {
    FilterExpression::Compare(cmp) => {
      assert_eq!(cmp.path(), "payload.metadata.language");
      assert_eq!(cmp.op(), &CompareOp::Equals(json!("en")));
    }
    other => panic!("expected a comparison, got {other:?}"),
  }
}

#[test]
fn numeric_constructors_carry_numbers() {
  let expr = FilterExpression::lt("payload.currentDocument.sizeBytes", 1024.0);
  match expr {
    FilterExpression::Compare(cmp) => assert_eq!(cmp.op(), &CompareOp::Lt(1024.0)),
    other => panic!("expected a comparison, got {other:?}"),
  }
}

#[test]
fn and_flattens_nested_conjunctions() {
  let expr = FilterExpression::equals("type", "created")
    .and(FilterExpression::starts_with("payload.currentDocument.mediaType", "image/"))
    .and(FilterExpression::gte("payload.currentDocument.sizeBytes", 1.0));
  match expr {
    FilterExpression::And(items) => assert_eq!(items.len(), 3),
    other => panic!("expected a conjunction, got {other:?}"),
  }
}

#[test]
fn all_collects_into_one_conjunction() {
  let expr = FilterExpression::all([
    FilterExpression::equals("type", "created"),
    FilterExpression::includes("payload.metadata.keywords", "finance"),
  ]);
  match expr {
    FilterExpression::And(items) => assert_eq!(items.len(), 2),
    other => panic!("expected a conjunction, got {other:?}"),
  }
}

#[test]
fn expressions_serialize_for_inspection() {
  let expr = FilterExpression::starts_with("payload.currentDocument.mediaType", "text/");
  let value = serde_json::to_value(&expr).expect("serialize");
  assert_eq!(
    value,
    json!({
      "compare": {
        "path": "payload.currentDocument.mediaType",
        "op": { "startsWith": "text/" }
      }
    })
  );
}
