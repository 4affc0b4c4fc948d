//! Composition-time validation of routing graphs.
//!
//! Everything a graph can get wrong is reported here, before anything
//! deploys: dangling stage references, duplicate ids, media type
//! mismatches, cycles. Validation compiles each edge's filter policy on
//! the way through, so a passing graph comes back as a plan ready to
//! hand to a broker.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::compiler::{compile, FilterPolicy, PolicyCondition};
use crate::error::CompositionError;
use crate::types::{Event, MediaType, RoutingGraph, StageEdge};

/// One validated connection with its compiled filter.
#[derive(Debug, Clone)]
pub struct CompiledEdge {
  from: String,
  to: String,
  media_types: Vec<MediaType>,
  policy: FilterPolicy,
}

impl CompiledEdge {
  pub fn from(&self) -> &str {
    &self.from
  }

  pub fn to(&self) -> &str {
    &self.to
  }

  /// Media types the edge can carry, as negotiated between the
  /// producer's outputs and the consumer's inputs.
  pub fn media_types(&self) -> &[MediaType] {
    &self.media_types
  }

  /// The subscription filter for this edge: negotiated media types
  /// plus the user filter, if any.
  pub fn policy(&self) -> &FilterPolicy {
    &self.policy
  }
}

/// A validated routing plan, ready to deploy.
#[derive(Debug, Clone)]
pub struct RoutingPlan {
  edges: Vec<CompiledEdge>,
}

impl RoutingPlan {
  pub fn edges(&self) -> &[CompiledEdge] {
    &self.edges
  }

  pub fn edges_from(&self, stage_id: &str) -> Vec<&CompiledEdge> {
    self.edges.iter().filter(|e| e.from == stage_id).collect()
  }

  /// Consumers whose edge from `from` accepts `event`, in graph order.
  /// This is the in-process twin of broker-side subscription matching.
  pub fn route(&self, from: &str, event: &Event) -> Vec<&str> {
    let root = event.wire_value();
    self
      .edges
      .iter()
      .filter(|e| e.from == from && e.policy.matches_value(&root))
      .map(|e| e.to.as_str())
      .collect()
  }
}

/// Validates `graph` and compiles its edges into a deployable plan.
#[instrument(level = "trace", skip(graph))]
pub fn validate(graph: &RoutingGraph) -> Result<RoutingPlan, CompositionError> {
  info!(
    stage_count = graph.stages().len(),
    edge_count = graph.edges().len(),
    "validating routing graph"
  );
  if graph.stages().is_empty() {
    return Err(CompositionError::EmptyGraph);
  }

  let mut seen = HashSet::new();
  for stage in graph.stages() {
    if !seen.insert(stage.id()) {
      return Err(CompositionError::DuplicateStage(stage.id().to_string()));
    }
  }

  for edge in graph.edges() {
    for endpoint in [&edge.from, &edge.to] {
      if graph.stage(endpoint).is_none() {
        return Err(CompositionError::UnknownStage {
          stage: endpoint.clone(),
          from: edge.from.clone(),
          to: edge.to.clone(),
        });
      }
    }
  }

  check_acyclic(graph)?;

  let mut edges = Vec::with_capacity(graph.edges().len());
  for edge in graph.edges() {
    edges.push(compile_edge(graph, edge)?);
  }

  info!(edge_count = edges.len(), "routing graph validated");
  Ok(RoutingPlan { edges })
}

fn compile_edge(graph: &RoutingGraph, edge: &StageEdge) -> Result<CompiledEdge, CompositionError> {
  let producer = graph.stage(&edge.from).expect("endpoints checked above");
  let consumer = graph.stage(&edge.to).expect("endpoints checked above");

  let media_types = negotiate(
    producer.supported_output_types(),
    consumer.supported_input_types(),
  );
  if media_types.is_empty() {
    return Err(CompositionError::IncompatibleTypes {
      from: edge.from.clone(),
      to: edge.to.clone(),
      offered: producer.supported_output_types().to_vec(),
      accepted: consumer.supported_input_types().to_vec(),
    });
  }

  let mut policy = media_policy(&media_types);
  if let Some(filter) = &edge.filter {
    policy.merge(compile(filter));
  }
  debug!(from = %edge.from, to = %edge.to, %policy, "compiled edge");

  Ok(CompiledEdge {
    from: edge.from.clone(),
    to: edge.to.clone(),
    media_types,
    policy,
  })
}

/// Intersects what a producer emits with what a consumer accepts.
///
/// Each overlapping pair contributes its concrete side, so the result
/// can be compiled into a type condition. When both sides are wildcards
/// the narrower pattern survives. Producer declaration order is kept
/// and duplicates are dropped.
pub(crate) fn negotiate(offered: &[MediaType], accepted: &[MediaType]) -> Vec<MediaType> {
  let mut out: Vec<MediaType> = Vec::new();
  for produced in offered {
    for consumed in accepted {
      let overlap = if consumed.accepts(produced) {
        Some(produced.clone())
      } else if produced.accepts(consumed) {
        Some(consumed.clone())
      } else {
        None
      };
      if let Some(media_type) = overlap
        && !out.contains(&media_type)
      {
        out.push(media_type);
      }
    }
  }
  out
}

/// Type condition for an edge. A wildcard in the negotiated set means
/// the consumer takes the producer's whole range; no condition is
/// emitted and the runtime filter stays open on type.
fn media_policy(negotiated: &[MediaType]) -> FilterPolicy {
  let mut policy = FilterPolicy::new();
  if negotiated.iter().any(MediaType::is_wildcard) {
    return policy;
  }
  policy.push(
    "payload.currentDocument.mediaType",
    PolicyCondition::AnyOf(
      negotiated
        .iter()
        .map(|t| Value::String(t.as_str().to_string()))
        .collect(),
    ),
  );
  policy
}

#[derive(Clone, Copy, PartialEq)]
enum Color {
  White,
  Gray,
  Black,
}

/// Iterative three-color depth-first search. A gray-to-gray edge is a
/// cycle; the offending path is reconstructed from the DFS stack.
fn check_acyclic(graph: &RoutingGraph) -> Result<(), CompositionError> {
  let mut color: HashMap<&str, Color> = graph
    .stages()
    .iter()
    .map(|s| (s.id(), Color::White))
    .collect();

  for start in graph.stages().iter().map(|s| s.id()) {
    if color[start] != Color::White {
      continue;
    }
    color.insert(start, Color::Gray);
    let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
    while let Some(frame) = stack.last_mut() {
      let node = frame.0;
      let outgoing = graph.outgoing_edges(node);
      if frame.1 < outgoing.len() {
        let next = outgoing[frame.1].to.as_str();
        frame.1 += 1;
        match color[next] {
          Color::White => {
            color.insert(next, Color::Gray);
            stack.push((next, 0));
          }
          Color::Gray => {
            let mut path: Vec<String> = stack.iter().map(|(n, _)| n.to_string()).collect();
            if let Some(pos) = path.iter().position(|n| n == next) {
              path.drain(..pos);
            }
            path.push(next.to_string());
            return Err(CompositionError::CycleDetected { path });
          }
          Color::Black => {}
        }
      } else {
        color.insert(node, Color::Black);
        stack.pop();
      }
    }
  }
  Ok(())
}
