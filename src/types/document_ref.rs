//! Reference to a document payload held in external storage.

use serde::{Deserialize, Serialize};

use super::MediaType;
use crate::error::EnvelopeError;

/// Reference to a document payload held in external storage.
///
/// Envelopes never carry document bytes; they carry one of these. The
/// location is a URI with an explicit scheme (`s3://...`, `https://...`,
/// `mem://...`). Size and content hash are optional hints filled in by
/// whichever stage produced the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentRef {
  location: String,
  media_type: MediaType,
  #[serde(skip_serializing_if = "Option::is_none")]
  size_bytes: Option<u64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  content_hash: Option<String>,
}

impl DocumentRef {
  /// Builds a reference, rejecting locations without a `scheme://`.
  pub fn new(
    location: impl Into<String>,
    media_type: impl Into<MediaType>,
  ) -> Result<Self, EnvelopeError> {
    let doc = Self {
      location: location.into(),
      media_type: media_type.into(),
      size_bytes: None,
      content_hash: None,
    };
    doc.validate()?;
    Ok(doc)
  }

  pub fn with_size_bytes(mut self, size_bytes: u64) -> Self {
    self.size_bytes = Some(size_bytes);
    self
  }

  pub fn with_content_hash(mut self, content_hash: impl Into<String>) -> Self {
    self.content_hash = Some(content_hash.into());
    self
  }

  pub fn location(&self) -> &str {
    &self.location
  }

  pub fn media_type(&self) -> &MediaType {
    &self.media_type
  }

  pub fn size_bytes(&self) -> Option<u64> {
    self.size_bytes
  }

  pub fn content_hash(&self) -> Option<&str> {
    self.content_hash.as_deref()
  }

  /// Checks the location shape. Deserialized values go through this via
  /// [`Event::from_wire`](crate::types::Event::from_wire).
  pub(crate) fn validate(&self) -> Result<(), EnvelopeError> {
    let scheme_ok = self
      .location
      .split_once("://")
      .is_some_and(|(scheme, rest)| !scheme.is_empty() && !rest.is_empty());
    if !scheme_ok {
      return Err(EnvelopeError::InvalidLocation(self.location.clone()));
    }
    Ok(())
  }
}
