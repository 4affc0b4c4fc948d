//! # docweave
//!
//! Core plumbing for event-driven document pipelines: stages exchange
//! typed event envelopes that describe documents by reference, and this
//! crate supplies everything between them.
//!
//! ## Architecture
//!
//! A pipeline is a [`RoutingGraph`](types::RoutingGraph) of stage
//! descriptors. [`validator::validate`] checks it (unique ids, known
//! endpoints, acyclic, media-type compatible) and compiles each edge's
//! [`FilterExpression`](types::FilterExpression) into a serializable
//! [`FilterPolicy`](compiler::FilterPolicy); the resulting
//! [`RoutingPlan`](validator::RoutingPlan) routes events at run time.
//! Stages read lazy [`Reference`](types::Reference)s through the
//! [`resolver`], and fan-in points collect sibling branches with the
//! [`reducer`].

pub mod compiler;
pub mod config;
pub mod error;
#[cfg(test)]
mod error_test;
pub mod evaluator;
#[cfg(test)]
mod evaluator_test;
pub mod path;
#[cfg(test)]
mod path_test;
pub mod reducer;
pub mod resolver;
pub mod types;
pub mod validator;

pub use compiler::{compile, FilterPolicy};
pub use config::{CompletionPolicy, DocumentMergePolicy, ReducerConfig, RetiredPolicy, StageConfig};
pub use error::Error;
pub use evaluator::evaluate;
pub use reducer::{Arrival, Reducer};
pub use resolver::{MemoryPointerStore, PointerStore, Resolver};
pub use types::{
  DocumentRef, Envelope, Event, EventType, FilterExpression, MediaType, Metadata, Reference,
  RoutingGraph, RoutingGraphBuilder, StageDescriptor, StageSpec,
};
pub use validator::{validate, RoutingPlan};
