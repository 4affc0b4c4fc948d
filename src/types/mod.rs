//! Data types that flow through a document pipeline.
//!
//! Events wrap envelopes; envelopes point at documents and carry
//! enrichment metadata. Filter expressions, stage descriptors, and the
//! routing graph describe how events move between stages.

mod compute_kind;
mod document_ref;
mod envelope;
mod event;
mod filter_expr;
#[cfg(test)]
mod filter_expr_test;
mod media_type;
mod metadata;
#[cfg(test)]
mod metadata_test;
mod reference;
mod routing_graph;
mod stage;

pub use compute_kind::ComputeKind;
pub use document_ref::DocumentRef;
pub use envelope::Envelope;
pub use event::{Event, EventType, SPEC_VERSION};
pub use filter_expr::{CompareOp, Comparison, FilterExpression};
pub use media_type::MediaType;
pub use metadata::Metadata;
pub use reference::{Reference, ValueKind};
pub use routing_graph::{RoutingGraph, RoutingGraphBuilder, StageEdge};
pub use stage::{StageDescriptor, StageSpec};
