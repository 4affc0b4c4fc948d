//! Tests for in-process filter evaluation.

use super::evaluator::evaluate;
use super::types::{DocumentRef, Event, FilterExpression, Metadata};
use serde_json::json;

fn event_with_metadata(metadata: serde_json::Value) -> Event {
  let doc = DocumentRef::new("s3://bucket/in.txt", "text/plain").expect("valid document");
  let mut event = Event::new(doc);
  event
    .payload_mut()
    .merge_metadata(&Metadata::from_value(metadata).expect("object"));
  event
}

#[test]
fn equals_matches_strings() {
  let event = event_with_metadata(json!({ "language": "en" }));
  assert!(evaluate(
    &FilterExpression::equals("payload.metadata.language", "en"),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::equals("payload.metadata.language", "fr"),
    &event
  ));
}

#[test]
fn equals_compares_numbers_numerically() {
  let event = event_with_metadata(json!({ "pages": 3 }));
  assert!(evaluate(
    &FilterExpression::equals("payload.metadata.pages", 3.0),
    &event
  ));
  assert!(evaluate(
    &FilterExpression::equals("payload.metadata.pages", 3),
    &event
  ));
}

#[test]
fn ordering_is_numeric_not_lexical() {
  // Lexically "9" > "10"; numerically 9 < 10.
  let event = event_with_metadata(json!({ "pages": 9 }));
  assert!(evaluate(
    &FilterExpression::lt("payload.metadata.pages", 10.0),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::gt("payload.metadata.pages", 10.0),
    &event
  ));
}

#[test]
fn ordering_never_applies_to_strings() {
  let event = event_with_metadata(json!({ "pages": "9" }));
  assert!(!evaluate(
    &FilterExpression::lt("payload.metadata.pages", 10.0),
    &event
  ));
}

#[test]
fn boundary_operators_are_inclusive_or_strict_as_named() {
  let event = event_with_metadata(json!({ "score": 0.5 }));
  assert!(evaluate(&FilterExpression::lte("payload.metadata.score", 0.5), &event));
  assert!(evaluate(&FilterExpression::gte("payload.metadata.score", 0.5), &event));
  assert!(!evaluate(&FilterExpression::lt("payload.metadata.score", 0.5), &event));
  assert!(!evaluate(&FilterExpression::gt("payload.metadata.score", 0.5), &event));
}

#[test]
fn missing_attribute_never_matches() {
  let event = event_with_metadata(json!({}));
  assert!(!evaluate(
    &FilterExpression::equals("payload.metadata.language", "en"),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::lt("payload.metadata.pages", 10.0),
    &event
  ));
}

#[test]
fn includes_is_substring_on_strings() {
  let event = event_with_metadata(json!({ "title": "quarterly finance report" }));
  assert!(evaluate(
    &FilterExpression::includes("payload.metadata.title", "finance"),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::includes("payload.metadata.title", "sports"),
    &event
  ));
}

#[test]
fn includes_is_membership_on_arrays() {
  let event = event_with_metadata(json!({ "keywords": ["finance", "q3"] }));
  assert!(evaluate(
    &FilterExpression::includes("payload.metadata.keywords", "q3"),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::includes("payload.metadata.keywords", "q4"),
    &event
  ));
}

#[test]
fn starts_with_applies_to_strings_only() {
  let event = event_with_metadata(json!({ "pages": 12 }));
  assert!(evaluate(
    &FilterExpression::starts_with("payload.currentDocument.mediaType", "text/"),
    &event
  ));
  assert!(!evaluate(
    &FilterExpression::starts_with("payload.metadata.pages", "1"),
    &event
  ));
}

#[test]
fn and_requires_every_branch() {
  let event = event_with_metadata(json!({ "language": "en", "pages": 3 }));
  let both = FilterExpression::equals("payload.metadata.language", "en")
    .and(FilterExpression::lt("payload.metadata.pages", 10.0));
  assert!(evaluate(&both, &event));
  let one_fails = FilterExpression::equals("payload.metadata.language", "en")
    .and(FilterExpression::gt("payload.metadata.pages", 10.0));
  assert!(!evaluate(&one_fails, &event));
}

#[test]
fn empty_conjunction_matches_everything() {
  let event = event_with_metadata(json!({}));
  assert!(evaluate(&FilterExpression::all([]), &event));
}

#[test]
fn framing_fields_are_addressable() {
  let event = event_with_metadata(json!({}));
  assert!(evaluate(&FilterExpression::equals("type", "created"), &event));
  assert!(evaluate(
    &FilterExpression::equals("payload.currentDocument.mediaType", "text/plain"),
    &event
  ));
}
