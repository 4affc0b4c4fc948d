//! The envelope: everything a pipeline knows about one document chain.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DocumentRef, Metadata};
use crate::error::EnvelopeError;

/// The envelope: everything a pipeline knows about one document chain.
///
/// The chain id and source document are fixed at construction. The
/// current document, metadata, and call history only change through the
/// mutators here, which keep them append-or-merge only. Stages never
/// edit an envelope in place on the wire; they clone the carrying event,
/// mutate the clone, and forward it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Envelope {
  chain_id: Uuid,
  source_document: DocumentRef,
  current_document: DocumentRef,
  metadata: Metadata,
  call_history: Vec<String>,
}

impl Envelope {
  /// Opens a new chain around `source`. The current document starts as
  /// the source itself.
  pub fn new(source: DocumentRef) -> Self {
    Self {
      chain_id: Uuid::new_v4(),
      current_document: source.clone(),
      source_document: source,
      metadata: Metadata::new(),
      call_history: Vec::new(),
    }
  }

  pub(crate) fn from_parts(
    chain_id: Uuid,
    source_document: DocumentRef,
    current_document: DocumentRef,
    metadata: Metadata,
    call_history: Vec<String>,
  ) -> Self {
    Self {
      chain_id,
      source_document,
      current_document,
      metadata,
      call_history,
    }
  }

  /// Identifier shared by every event descending from one trigger.
  pub fn chain_id(&self) -> Uuid {
    self.chain_id
  }

  /// The original document that started the chain.
  pub fn source_document(&self) -> &DocumentRef {
    &self.source_document
  }

  /// The most recent transformation output.
  pub fn current_document(&self) -> &DocumentRef {
    &self.current_document
  }

  pub fn metadata(&self) -> &Metadata {
    &self.metadata
  }

  /// Ids of the stages the envelope has passed through, oldest first.
  pub fn call_history(&self) -> &[String] {
    &self.call_history
  }

  /// Deep-merges `patch` into the metadata. Existing enrichments are
  /// never dropped wholesale; see [`Metadata::merge`] for the rules.
  pub fn merge_metadata(&mut self, patch: &Metadata) {
    self.metadata.merge(patch);
  }

  /// Records that a stage has processed this envelope.
  pub fn append_history(&mut self, stage_id: impl Into<String>) {
    self.call_history.push(stage_id.into());
  }

  /// Swaps in a transformation output as the new current document. The
  /// source document is untouched.
  pub fn replace_current_document(&mut self, document: DocumentRef) {
    self.current_document = document;
  }

  pub(crate) fn validate(&self) -> Result<(), EnvelopeError> {
    self.source_document.validate()?;
    self.current_document.validate()?;
    Ok(())
  }
}
