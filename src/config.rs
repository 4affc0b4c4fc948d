//! Pipeline configuration objects and their defaults.
//!
//! Everything tunable is an explicit field on a config struct with a
//! named default; nothing in this crate reads the process environment.

use std::time::Duration;

pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15);
pub const DEFAULT_JITTER: Duration = Duration::from_secs(5);
pub const DEFAULT_GRACE: Duration = Duration::from_secs(60);
pub const DEFAULT_RETIRED_RETENTION: Duration = Duration::from_secs(15 * 60);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_STAGE_MEMORY_MIB: u32 = 512;
pub const DEFAULT_STAGE_CONCURRENCY: u32 = 10;
pub const DEFAULT_STAGE_BATCH_SIZE: usize = 10;

/// Deployment envelope for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageConfig {
  pub memory_mib: u32,
  pub max_concurrency: u32,
  pub batch_size: usize,
  pub timeout: Duration,
}

impl Default for StageConfig {
  fn default() -> Self {
    Self {
      memory_mib: DEFAULT_STAGE_MEMORY_MIB,
      max_concurrency: DEFAULT_STAGE_CONCURRENCY,
      batch_size: DEFAULT_STAGE_BATCH_SIZE,
      timeout: DEFAULT_STAGE_TIMEOUT,
    }
  }
}

/// When a collecting reducer key flushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPolicy {
  /// Flush when `window` has elapsed since the first arrival, plus a
  /// uniform random share of `jitter` to spread simultaneous flushes.
  TimeWindow { window: Duration, jitter: Duration },
  /// Flush on the arrival that brings the key's count to `count`.
  CountThreshold { count: usize },
}

impl CompletionPolicy {
  pub fn time_window(window: Duration, jitter: Duration) -> Self {
    CompletionPolicy::TimeWindow { window, jitter }
  }

  pub fn count(count: usize) -> Self {
    CompletionPolicy::CountThreshold { count }
  }
}

impl Default for CompletionPolicy {
  fn default() -> Self {
    CompletionPolicy::TimeWindow {
      window: DEFAULT_WINDOW,
      jitter: DEFAULT_JITTER,
    }
  }
}

/// What happens when an event arrives for a retired key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetiredPolicy {
  /// The arrival opens a fresh collection cycle under the same key.
  #[default]
  StartNewCycle,
  /// The arrival is dropped. The key's tombstone is kept for
  /// `retention`, after which a new cycle may start.
  Drop { retention: Duration },
}

/// Which branch's current document the aggregate carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentMergePolicy {
  #[default]
  FirstArrival,
  LastArrival,
}

/// Configuration for one reducer instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReducerConfig {
  /// Identifies the reducer in logs.
  pub reducer_id: String,
  pub policy: CompletionPolicy,
  /// How long a flushed key keeps absorbing duplicates before retiring.
  pub grace: Duration,
  pub retired: RetiredPolicy,
  pub document_merge: DocumentMergePolicy,
  /// Bound of the flushed-aggregate channel.
  pub channel_capacity: usize,
}

impl ReducerConfig {
  pub fn new(reducer_id: impl Into<String>) -> Self {
    Self {
      reducer_id: reducer_id.into(),
      policy: CompletionPolicy::default(),
      grace: DEFAULT_GRACE,
      retired: RetiredPolicy::default(),
      document_merge: DocumentMergePolicy::default(),
      channel_capacity: DEFAULT_CHANNEL_CAPACITY,
    }
  }
}
