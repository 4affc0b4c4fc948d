//! Stage descriptors: what a processing stage consumes and produces.

use std::fmt;

use dyn_clone::DynClone;

use super::{ComputeKind, MediaType};
use crate::config::StageConfig;

/// Capabilities a stage advertises to the routing validator.
///
/// The validator only needs the shapes: what a stage accepts, what it
/// emits, and what hardware it can run on. Stage execution itself lives
/// outside this crate.
pub trait StageDescriptor: DynClone + Send + Sync {
  /// Unique id within one routing graph.
  fn id(&self) -> &str;
  /// Media types the stage accepts. Wildcards widen acceptance.
  fn supported_input_types(&self) -> &[MediaType];
  /// Media types the stage can emit.
  fn supported_output_types(&self) -> &[MediaType];
  /// Hardware classes the stage can run on.
  fn supported_compute_kinds(&self) -> &[ComputeKind];
}

dyn_clone::clone_trait_object!(StageDescriptor);

impl fmt::Debug for dyn StageDescriptor + '_ {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "StageDescriptor({})", self.id())
  }
}

/// Descriptor-only stage built from configuration.
///
/// Starts out accepting and emitting anything on CPU; narrow it with
/// the builder methods. Useful on its own for declaring graph shape
/// before any real stage implementation exists.
#[derive(Debug, Clone)]
pub struct StageSpec {
  id: String,
  input_types: Vec<MediaType>,
  output_types: Vec<MediaType>,
  compute_kinds: Vec<ComputeKind>,
  config: StageConfig,
}

impl StageSpec {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      input_types: vec![MediaType::any()],
      output_types: vec![MediaType::any()],
      compute_kinds: vec![ComputeKind::Cpu],
      config: StageConfig::default(),
    }
  }

  /// Replaces the accepted input types.
  pub fn accepts<I, T>(mut self, types: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<MediaType>,
  {
    self.input_types = types.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the emitted output types.
  pub fn produces<I, T>(mut self, types: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<MediaType>,
  {
    self.output_types = types.into_iter().map(Into::into).collect();
    self
  }

  /// Replaces the supported hardware classes.
  pub fn compute(mut self, kinds: impl IntoIterator<Item = ComputeKind>) -> Self {
    self.compute_kinds = kinds.into_iter().collect();
    self
  }

  pub fn with_config(mut self, config: StageConfig) -> Self {
    self.config = config;
    self
  }

  pub fn config(&self) -> &StageConfig {
    &self.config
  }
}

impl StageDescriptor for StageSpec {
  fn id(&self) -> &str {
    &self.id
  }

  fn supported_input_types(&self) -> &[MediaType] {
    &self.input_types
  }

  fn supported_output_types(&self) -> &[MediaType] {
    &self.output_types
  }

  fn supported_compute_kinds(&self) -> &[ComputeKind] {
    &self.compute_kinds
  }
}
