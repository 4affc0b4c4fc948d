//! The routing graph: stages plus filtered connections between them.

use super::{FilterExpression, StageDescriptor};

/// One directed connection between two stages, optionally filtered.
#[derive(Debug, Clone)]
pub struct StageEdge {
  pub from: String,
  pub to: String,
  pub filter: Option<FilterExpression>,
}

/// The routing graph: stages plus filtered connections between them.
///
/// Assembly never fails. Every structural check happens in
/// [`validate`](crate::validator::validate), which reports problems as
/// errors instead of panicking mid-build. Stage order is preserved, so
/// validation output is deterministic.
#[derive(Debug, Clone)]
pub struct RoutingGraph {
  stages: Vec<Box<dyn StageDescriptor>>,
  edges: Vec<StageEdge>,
}

impl RoutingGraph {
  pub fn builder() -> RoutingGraphBuilder {
    RoutingGraphBuilder::default()
  }

  pub fn stages(&self) -> &[Box<dyn StageDescriptor>] {
    &self.stages
  }

  pub fn stage(&self, id: &str) -> Option<&dyn StageDescriptor> {
    self
      .stages
      .iter()
      .find(|s| s.id() == id)
      .map(|s| s.as_ref())
  }

  pub fn edges(&self) -> &[StageEdge] {
    &self.edges
  }

  pub fn outgoing_edges(&self, stage_id: &str) -> Vec<&StageEdge> {
    self.edges.iter().filter(|e| e.from == stage_id).collect()
  }
}

/// Assembles a [`RoutingGraph`].
#[derive(Debug, Default)]
pub struct RoutingGraphBuilder {
  stages: Vec<Box<dyn StageDescriptor>>,
  edges: Vec<StageEdge>,
}

impl RoutingGraphBuilder {
  /// Adds a stage. Duplicate ids are reported at validation time.
  pub fn stage(mut self, stage: impl StageDescriptor + 'static) -> Self {
    self.stages.push(Box::new(stage));
    self
  }

  /// Connects two stages by id with no extra filter; only the media
  /// type negotiation restricts the edge.
  pub fn connect(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
    self.edges.push(StageEdge {
      from: from.into(),
      to: to.into(),
      filter: None,
    });
    self
  }

  /// Connects two stages by id, restricted by `filter` on top of the
  /// media type negotiation.
  pub fn connect_filtered(
    mut self,
    from: impl Into<String>,
    to: impl Into<String>,
    filter: FilterExpression,
  ) -> Self {
    self.edges.push(StageEdge {
      from: from.into(),
      to: to.into(),
      filter: Some(filter),
    });
    self
  }

  pub fn build(self) -> RoutingGraph {
    RoutingGraph {
      stages: self.stages,
      edges: self.edges,
    }
  }
}
