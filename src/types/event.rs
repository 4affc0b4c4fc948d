//! The event: the unit that moves between pipeline stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::{DocumentRef, Envelope};
use crate::error::EnvelopeError;

/// Wire format version stamped on every event this library creates.
pub const SPEC_VERSION: &str = "1.0";

/// Whether an event announces a document's creation or deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
  Created,
  Deleted,
}

impl std::fmt::Display for EventType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      EventType::Created => write!(f, "created"),
      EventType::Deleted => write!(f, "deleted"),
    }
  }
}

/// The event: the unit that moves between pipeline stages.
///
/// An event is an envelope plus delivery framing: a version tag, a
/// unique id minted once at the trigger, the event type, and a
/// timestamp. Stages derive new events from incoming ones with
/// [`Event::derived`] and mutate only the payload; the framing rides
/// along unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Event {
  spec_version: String,
  id: Uuid,
  #[serde(rename = "type")]
  event_type: EventType,
  created_at: DateTime<Utc>,
  payload: Envelope,
}

impl Event {
  /// Opens a new chain: a `created` event whose current document is the
  /// source itself.
  pub fn new(source: DocumentRef) -> Self {
    Self::framed(EventType::Created, Envelope::new(source))
  }

  /// A `deleted` event announcing that `source` has been removed from
  /// its origin. Downstream stages use it to withdraw derived state.
  pub fn deletion(source: DocumentRef) -> Self {
    Self::framed(EventType::Deleted, Envelope::new(source))
  }

  pub(crate) fn framed(event_type: EventType, payload: Envelope) -> Self {
    Self {
      spec_version: SPEC_VERSION.to_string(),
      id: Uuid::new_v4(),
      event_type,
      created_at: Utc::now(),
      payload,
    }
  }

  /// Clones this event for the next hop, recording `stage_id` in the
  /// call history. Id, type, and timestamp are preserved: a derived
  /// event is the same logical event further along the chain. The
  /// caller then mutates the clone's payload through [`Event::payload_mut`].
  pub fn derived(&self, stage_id: impl Into<String>) -> Event {
    let mut next = self.clone();
    next.payload.append_history(stage_id);
    next
  }

  pub fn spec_version(&self) -> &str {
    &self.spec_version
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn event_type(&self) -> EventType {
    self.event_type
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn payload(&self) -> &Envelope {
    &self.payload
  }

  pub fn payload_mut(&mut self) -> &mut Envelope {
    &mut self.payload
  }

  /// Shorthand for the payload's chain id, the partition key for
  /// ordering and reduction.
  pub fn chain_id(&self) -> Uuid {
    self.payload.chain_id()
  }

  /// Parses an event off the wire, rejecting unknown versions, schema
  /// violations, and schemeless document locations.
  pub fn from_wire(raw: &[u8]) -> Result<Event, EnvelopeError> {
    let event: Event = serde_json::from_slice(raw)?;
    if event.spec_version != SPEC_VERSION {
      return Err(EnvelopeError::UnsupportedSpecVersion(event.spec_version));
    }
    event.payload.validate()?;
    Ok(event)
  }

  /// Serializes to the wire JSON form.
  pub fn to_wire(&self) -> String {
    serde_json::to_string(self).expect("wire form is plain data")
  }

  /// The event as a wire-shaped JSON value, the root that attribute
  /// paths in filters and references are resolved against.
  pub fn wire_value(&self) -> Value {
    serde_json::to_value(self).expect("wire form is plain data")
  }
}
