//! Error taxonomy for envelope parsing, graph composition, reference
//! resolution, and reduction.

use thiserror::Error;

use crate::types::{MediaType, ValueKind};

/// Errors raised while parsing or constructing envelopes. Never
/// retryable: a malformed payload stays malformed.
#[derive(Debug, Error)]
pub enum EnvelopeError {
  /// The wire payload is not valid JSON or does not match the schema.
  #[error("malformed envelope: {0}")]
  Malformed(#[from] serde_json::Error),
  /// The payload names a spec version this library does not speak.
  #[error("unsupported spec version '{0}'")]
  UnsupportedSpecVersion(String),
  /// A document location is empty or lacks a URI scheme.
  #[error("invalid document location '{0}': expected scheme://path")]
  InvalidLocation(String),
}

/// Errors raised while validating a routing graph. All are composition
/// bugs and therefore fatal.
#[derive(Debug, Error)]
pub enum CompositionError {
  #[error("routing graph has no stages")]
  EmptyGraph,
  #[error("duplicate stage id '{0}'")]
  DuplicateStage(String),
  #[error("edge '{from}' -> '{to}' references unknown stage '{stage}'")]
  UnknownStage {
    stage: String,
    from: String,
    to: String,
  },
  #[error(
    "incompatible media types on edge '{from}' -> '{to}': \
     producer emits [{}], consumer accepts [{}]",
    media_list(.offered),
    media_list(.accepted)
  )]
  IncompatibleTypes {
    from: String,
    to: String,
    offered: Vec<MediaType>,
    accepted: Vec<MediaType>,
  },
  #[error("routing graph contains a cycle: {}", .path.join(" -> "))]
  CycleDetected { path: Vec<String> },
}

/// Errors raised by a pointer store backend.
#[derive(Debug, Error)]
pub enum PointerStoreError {
  /// No value exists at the location. May be transient: stores are only
  /// eventually consistent across stages.
  #[error("no value stored at '{0}'")]
  NotFound(String),
  /// The backing store could not be reached.
  #[error("pointer store unavailable: {0}")]
  Unavailable(String),
}

/// Errors raised while resolving a [`Reference`](crate::types::Reference).
#[derive(Debug, Error)]
pub enum ResolveError {
  /// The dotted path names nothing in the context event.
  #[error("path '{0}' not found in context event")]
  PathNotFound(String),
  #[error("failed to fetch pointer '{location}'")]
  PointerFetch {
    location: String,
    #[source]
    source: PointerStoreError,
  },
  #[error("pointer '{location}' does not hold valid JSON")]
  PointerDecode {
    location: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("pointer '{location}' holds {actual}, expected {expected}")]
  KindMismatch {
    location: String,
    expected: ValueKind,
    actual: &'static str,
  },
}

impl ResolveError {
  /// Whether retrying the resolution could succeed. Only pointer
  /// fetches qualify; path misses and decode failures are stable.
  pub fn retryable(&self) -> bool {
    matches!(self, ResolveError::PointerFetch { .. })
  }
}

/// Errors raised by the fan-in reducer.
#[derive(Debug, Error)]
pub enum ReducerError {
  /// The consumer of flushed aggregates dropped its receiver.
  #[error("aggregate output channel closed")]
  OutputClosed,
}

/// Umbrella error for any docweave operation.
#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Envelope(#[from] EnvelopeError),
  #[error(transparent)]
  Composition(#[from] CompositionError),
  #[error(transparent)]
  Resolve(#[from] ResolveError),
  #[error(transparent)]
  Reducer(#[from] ReducerError),
}

impl Error {
  /// Whether the failed operation is worth retrying.
  pub fn retryable(&self) -> bool {
    match self {
      Error::Resolve(e) => e.retryable(),
      Error::Envelope(_) | Error::Composition(_) | Error::Reducer(_) => false,
    }
  }
}

fn media_list(types: &[MediaType]) -> String {
  types
    .iter()
    .map(MediaType::as_str)
    .collect::<Vec<_>>()
    .join(", ")
}
