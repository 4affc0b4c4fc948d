//! Lazy resolution of references against a context event.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{PointerStoreError, ResolveError};
use crate::path;
use crate::types::{Event, Reference, ValueKind};

/// Read access to the storage that pointer references name.
///
/// Implementations wrap whatever the deployment stores shared values
/// in. Stored values are JSON documents; the resolver decodes and
/// shape-checks them. Stores may be eventually consistent across
/// stages, so a miss can be transient. The resolver never retries on
/// its own; it reports the miss as retryable and leaves the retry loop
/// to the host.
#[async_trait]
pub trait PointerStore: Send + Sync {
  async fn fetch(&self, location: &str) -> Result<Bytes, PointerStoreError>;
}

/// Resolves references on demand.
///
/// Nothing is fetched or cached ahead of time. Aside from the pointer
/// fetch itself, resolution has no side effects; the context event is
/// read, never written.
pub struct Resolver {
  store: Arc<dyn PointerStore>,
}

impl Resolver {
  pub fn new(store: Arc<dyn PointerStore>) -> Self {
    Self { store }
  }

  /// Resolves one reference against `ctx`.
  ///
  /// Value references come back as given. Path references read the
  /// context event's wire form. Pointer references fetch from the
  /// store and must decode to their declared kind.
  #[instrument(level = "trace", skip_all)]
  pub async fn resolve(&self, reference: &Reference, ctx: &Event) -> Result<Value, ResolveError> {
    match reference {
      Reference::Value { value } => Ok(value.clone()),
      Reference::Path { path: at } => {
        let root = ctx.wire_value();
        path::lookup(&root, at)
          .cloned()
          .ok_or_else(|| ResolveError::PathNotFound(at.clone()))
      }
      Reference::Pointer {
        location,
        value_type,
      } => {
        let bytes =
          self
            .store
            .fetch(location)
            .await
            .map_err(|source| ResolveError::PointerFetch {
              location: location.clone(),
              source,
            })?;
        let value: Value =
          serde_json::from_slice(&bytes).map_err(|source| ResolveError::PointerDecode {
            location: location.clone(),
            source,
          })?;
        if !value_type.matches(&value) {
          return Err(ResolveError::KindMismatch {
            location: location.clone(),
            expected: *value_type,
            actual: ValueKind::name_of(&value),
          });
        }
        debug!(%location, "resolved pointer");
        Ok(value)
      }
    }
  }
}

/// In-memory pointer store for tests and single-process pipelines.
#[derive(Debug, Default)]
pub struct MemoryPointerStore {
  entries: Mutex<HashMap<String, Bytes>>,
}

impl MemoryPointerStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores `bytes` at `location`, replacing any previous value.
  pub fn put(&self, location: impl Into<String>, bytes: impl Into<Bytes>) {
    self
      .entries
      .lock()
      .expect("store mutex poisoned")
      .insert(location.into(), bytes.into());
  }
}

#[async_trait]
impl PointerStore for MemoryPointerStore {
  async fn fetch(&self, location: &str) -> Result<Bytes, PointerStoreError> {
    self
      .entries
      .lock()
      .expect("store mutex poisoned")
      .get(location)
      .cloned()
      .ok_or_else(|| PointerStoreError::NotFound(location.to_string()))
  }
}
