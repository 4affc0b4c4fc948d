//! Tests for error rendering and retry classification.

use std::error::Error as _;

use crate::error::{
  CompositionError, EnvelopeError, Error, PointerStoreError, ReducerError, ResolveError,
};
use crate::types::{MediaType, ValueKind};

fn decode_failure() -> serde_json::Error {
  serde_json::from_str::<serde_json::Value>("not json").expect_err("must not parse")
}

#[test]
fn incompatible_types_list_both_sides() {
  let err = CompositionError::IncompatibleTypes {
    from: "ocr".into(),
    to: "summarize".into(),
    offered: vec![MediaType::new("image/png"), MediaType::new("image/jpeg")],
    accepted: vec![MediaType::new("text/plain")],
  };
  assert_eq!(
    err.to_string(),
    "incompatible media types on edge 'ocr' -> 'summarize': \
     producer emits [image/png, image/jpeg], consumer accepts [text/plain]"
  );
}

#[test]
fn cycles_render_as_an_arrow_path() {
  let err = CompositionError::CycleDetected {
    path: vec!["a".into(), "b".into(), "a".into()],
  };
  assert_eq!(err.to_string(), "routing graph contains a cycle: a -> b -> a");
}

#[test]
fn unknown_stage_names_the_edge() {
  let err = CompositionError::UnknownStage {
    stage: "ghost".into(),
    from: "trigger".into(),
    to: "ghost".into(),
  };
  assert_eq!(
    err.to_string(),
    "edge 'trigger' -> 'ghost' references unknown stage 'ghost'"
  );
}

#[test]
fn invalid_location_shows_the_expected_shape() {
  let err = EnvelopeError::InvalidLocation("no-scheme".into());
  assert_eq!(
    err.to_string(),
    "invalid document location 'no-scheme': expected scheme://path"
  );
}

#[test]
fn only_pointer_fetches_are_retryable() {
  let fetch = ResolveError::PointerFetch {
    location: "s3://bucket/key".into(),
    source: PointerStoreError::Unavailable("timeout".into()),
  };
  assert!(fetch.retryable());

  assert!(!ResolveError::PathNotFound("payload.missing".into()).retryable());
  assert!(
    !ResolveError::PointerDecode {
      location: "s3://bucket/key".into(),
      source: decode_failure(),
    }
    .retryable()
  );
  assert!(
    !ResolveError::KindMismatch {
      location: "s3://bucket/key".into(),
      expected: ValueKind::Number,
      actual: "string",
    }
    .retryable()
  );
}

#[test]
fn umbrella_retryability_follows_the_inner_error() {
  let retryable = Error::from(ResolveError::PointerFetch {
    location: "s3://bucket/key".into(),
    source: PointerStoreError::NotFound("s3://bucket/key".into()),
  });
  assert!(retryable.retryable());

  assert!(!Error::from(CompositionError::EmptyGraph).retryable());
  assert!(!Error::from(ReducerError::OutputClosed).retryable());
  assert!(!Error::from(EnvelopeError::UnsupportedSpecVersion("2.0".into())).retryable());
}

#[test]
fn pointer_fetch_keeps_the_store_error_as_source() {
  let err = ResolveError::PointerFetch {
    location: "s3://bucket/key".into(),
    source: PointerStoreError::NotFound("s3://bucket/key".into()),
  };
  let source = err.source().expect("store error attached");
  assert_eq!(source.to_string(), "no value stored at 's3://bucket/key'");
}

#[test]
fn kind_mismatch_names_both_kinds() {
  let err = ResolveError::KindMismatch {
    location: "s3://bucket/key".into(),
    expected: ValueKind::Object,
    actual: "array",
  };
  assert_eq!(err.to_string(), "pointer 's3://bucket/key' holds array, expected object");
}
