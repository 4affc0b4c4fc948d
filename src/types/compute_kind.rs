//! Hardware class a stage can run on.

use std::fmt;

/// Hardware class a stage can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComputeKind {
  Cpu,
  Gpu,
  /// Purpose-built inference hardware.
  Accelerated,
}

impl fmt::Display for ComputeKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ComputeKind::Cpu => write!(f, "cpu"),
      ComputeKind::Gpu => write!(f, "gpu"),
      ComputeKind::Accelerated => write!(f, "accelerated"),
    }
  }
}
