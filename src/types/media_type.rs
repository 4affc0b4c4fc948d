//! Media type with wildcard matching.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A MIME media type such as `text/plain`, `image/*`, or `*/*`.
///
/// Comparison is ASCII case-insensitive. A trailing `*` subtype matches
/// every subtype of its primary type; `*/*` matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaType(String);

impl MediaType {
  pub fn new(raw: impl Into<String>) -> Self {
    Self(raw.into())
  }

  /// The catch-all `*/*`.
  pub fn any() -> Self {
    Self("*/*".to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn is_any(&self) -> bool {
    self.0 == "*/*"
  }

  /// True for `*/*` and for subtype wildcards such as `image/*`.
  pub fn is_wildcard(&self) -> bool {
    self.is_any() || self.subtype() == Some("*")
  }

  /// The part before the `/`, when present.
  pub fn primary(&self) -> Option<&str> {
    self.0.split_once('/').map(|(primary, _)| primary)
  }

  /// The part after the `/`, when present.
  pub fn subtype(&self) -> Option<&str> {
    self.0.split_once('/').map(|(_, subtype)| subtype)
  }

  /// Whether this (possibly wildcard) type accepts `other`.
  ///
  /// `other` is treated as concrete; a wildcard on the right side only
  /// matches an identical wildcard on the left.
  pub fn accepts(&self, other: &MediaType) -> bool {
    if self.is_any() {
      return true;
    }
    if self.subtype() == Some("*") {
      return match (self.primary(), other.primary()) {
        (Some(mine), Some(theirs)) => mine.eq_ignore_ascii_case(theirs),
        _ => false,
      };
    }
    self.0.eq_ignore_ascii_case(&other.0)
  }
}

impl From<&str> for MediaType {
  fn from(raw: &str) -> Self {
    Self::new(raw)
  }
}

impl fmt::Display for MediaType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}
