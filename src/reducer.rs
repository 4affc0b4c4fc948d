//! Keyed fan-in reduction of parallel pipeline branches.
//!
//! Each chain id gets an independent window. Arrivals collect until the
//! completion policy fires, then one aggregate event is emitted on the
//! output stream and the key enters a grace period that absorbs late
//! duplicates. After the grace period the key retires according to the
//! configured policy.
//!
//! The state map lives behind a plain mutex that is never held across
//! an await; channel sends and timer sleeps happen outside the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{CompletionPolicy, DocumentMergePolicy, ReducerConfig, RetiredPolicy};
use crate::error::ReducerError;
use crate::types::{Envelope, Event, Metadata};

/// What the reducer did with one arrival.
#[derive(Debug, Clone, PartialEq)]
pub enum Arrival {
  /// The event joined an open window; `received` events are collected
  /// under the key so far.
  Collecting { received: usize },
  /// This arrival completed the window; the aggregate was emitted.
  Flushed(Event),
  /// The key flushed already and is inside its grace period.
  Duplicate,
  /// The key is retired and the retired policy says drop.
  DroppedRetired,
}

/// One open collection window.
#[derive(Debug)]
struct Window {
  opened_at: chrono::DateTime<chrono::Utc>,
  /// Flush deadline; `None` under a count threshold policy.
  deadline: Option<Instant>,
  received: Vec<Event>,
}

#[derive(Debug)]
enum KeyState {
  Collecting(Window),
  Flushed,
  Retired { retired_at: Instant },
}

#[derive(Debug)]
struct Inner {
  config: ReducerConfig,
  states: Mutex<HashMap<Uuid, KeyState>>,
  out_tx: mpsc::Sender<Event>,
}

enum Action {
  Collect { received: usize, armed: Option<Instant> },
  Flush(Window),
  Duplicate,
  Dropped,
}

/// Fan-in reducer keyed by chain id.
///
/// Cheap to clone; clones share the same state and output stream, so
/// one reducer can absorb arrivals from many ingest tasks.
#[derive(Debug, Clone)]
pub struct Reducer {
  inner: Arc<Inner>,
}

impl Reducer {
  /// Builds a reducer and the stream its aggregates are emitted on.
  pub fn new(config: ReducerConfig) -> (Self, ReceiverStream<Event>) {
    let capacity = config.channel_capacity.max(1);
    let (out_tx, out_rx) = mpsc::channel(capacity);
    info!(reducer = %config.reducer_id, "fan-in reducer started");
    let reducer = Self {
      inner: Arc::new(Inner {
        config,
        states: Mutex::new(HashMap::new()),
        out_tx,
      }),
    };
    (reducer, ReceiverStream::new(out_rx))
  }

  /// Feeds one event to the reducer and reports what happened to it.
  ///
  /// The first arrival for a key opens its window (and arms the flush
  /// timer under a time window policy). The arrival that completes the
  /// window gets the aggregate back; everything after that inside the
  /// grace period is a duplicate.
  #[instrument(level = "trace", skip(self, event), fields(chain = %event.chain_id()))]
  pub async fn on_arrival(&self, event: Event) -> Result<Arrival, ReducerError> {
    let key = event.chain_id();
    match self.admit(key, event) {
      Action::Dropped => Ok(Arrival::DroppedRetired),
      Action::Duplicate => {
        debug!(chain = %key, "duplicate arrival inside grace period");
        Ok(Arrival::Duplicate)
      }
      Action::Collect { received, armed } => {
        if let Some(deadline) = armed {
          self.spawn_window_timer(key, deadline);
        }
        Ok(Arrival::Collecting { received })
      }
      Action::Flush(window) => Ok(Arrival::Flushed(self.emit(key, window).await?)),
    }
  }

  /// Number of keys currently collecting.
  pub fn open_windows(&self) -> usize {
    let states = self.inner.states.lock().expect("reducer mutex poisoned");
    states
      .values()
      .filter(|s| matches!(s, KeyState::Collecting(_)))
      .count()
  }

  /// Number of keys with any tracked state, including grace-period and
  /// tombstone entries.
  pub fn tracked_keys(&self) -> usize {
    self.inner.states.lock().expect("reducer mutex poisoned").len()
  }

  /// Lock-scoped admission: classifies the arrival and updates the key
  /// state. Returns what has to happen outside the lock.
  fn admit(&self, key: Uuid, event: Event) -> Action {
    let mut states = self.inner.states.lock().expect("reducer mutex poisoned");

    if let Some(KeyState::Retired { retired_at }) = states.get(&key) {
      if let RetiredPolicy::Drop { retention } = self.inner.config.retired
        && retired_at.elapsed() < retention
      {
        return Action::Dropped;
      }
      debug!(chain = %key, "retired key opens a new cycle");
      states.remove(&key);
    }

    match states.remove(&key) {
      Some(KeyState::Flushed) => {
        states.insert(key, KeyState::Flushed);
        Action::Duplicate
      }
      Some(KeyState::Collecting(mut window)) => {
        window.received.push(event);
        self.seal_or_keep(&mut states, key, window, false)
      }
      Some(KeyState::Retired { .. }) | None => {
        let window = self.open_window(event);
        self.seal_or_keep(&mut states, key, window, true)
      }
    }
  }

  /// Flushes the window if its policy is satisfied, otherwise puts it
  /// back. A just-opened window reports its timer deadline so the
  /// caller can arm it once.
  fn seal_or_keep(
    &self,
    states: &mut HashMap<Uuid, KeyState>,
    key: Uuid,
    window: Window,
    just_opened: bool,
  ) -> Action {
    if self.window_complete(&window) {
      states.insert(key, KeyState::Flushed);
      Action::Flush(window)
    } else {
      let received = window.received.len();
      let armed = if just_opened { window.deadline } else { None };
      states.insert(key, KeyState::Collecting(window));
      Action::Collect { received, armed }
    }
  }

  fn window_complete(&self, window: &Window) -> bool {
    match self.inner.config.policy {
      CompletionPolicy::CountThreshold { count } => window.received.len() >= count.max(1),
      CompletionPolicy::TimeWindow { .. } => {
        window.deadline.is_some_and(|deadline| Instant::now() >= deadline)
      }
    }
  }

  fn open_window(&self, event: Event) -> Window {
    let deadline = match self.inner.config.policy {
      CompletionPolicy::TimeWindow { window, jitter } => {
        Some(Instant::now() + window + random_jitter(jitter))
      }
      CompletionPolicy::CountThreshold { .. } => None,
    };
    Window {
      opened_at: chrono::Utc::now(),
      deadline,
      received: vec![event],
    }
  }

  fn spawn_window_timer(&self, key: Uuid, deadline: Instant) {
    let reducer = self.clone();
    tokio::spawn(async move {
      tokio::time::sleep_until(deadline).await;
      reducer.flush_window(key).await;
    });
  }

  /// Timer-side flush. Races with an arrival-side flush are settled by
  /// the state map: whoever takes the window out emits, the other side
  /// sees `Flushed` and walks away.
  async fn flush_window(&self, key: Uuid) {
    let window = {
      let mut states = self.inner.states.lock().expect("reducer mutex poisoned");
      match states.remove(&key) {
        Some(KeyState::Collecting(window)) => {
          states.insert(key, KeyState::Flushed);
          Some(window)
        }
        Some(other) => {
          states.insert(key, other);
          None
        }
        None => None,
      }
    };
    match window {
      Some(window) => {
        if let Err(e) = self.emit(key, window).await {
          warn!(chain = %key, error = %e, "aggregate lost at timer flush");
        }
      }
      None => debug!(chain = %key, "window already flushed"),
    }
  }

  /// Synthesizes the aggregate, sends it, and schedules retirement.
  async fn emit(&self, key: Uuid, window: Window) -> Result<Event, ReducerError> {
    let branches = window.received.len();
    let opened_at = window.opened_at;
    let aggregate = self.aggregate(window);
    info!(
      reducer = %self.inner.config.reducer_id,
      chain = %key,
      branches,
      opened_at = %opened_at,
      "window flushed"
    );
    self
      .inner
      .out_tx
      .send(aggregate.clone())
      .await
      .map_err(|_| ReducerError::OutputClosed)?;
    self.spawn_retire_timer(key);
    Ok(aggregate)
  }

  /// Folds the collected branch events into one output event: shared
  /// chain id and source document, metadata deep-union and call history
  /// concatenation in arrival order, current document per the merge
  /// policy. The aggregate is a new event with a fresh id; this reducer
  /// does not write itself into the history.
  fn aggregate(&self, window: Window) -> Event {
    let received = window.received;
    let first = received.first().expect("window holds at least one event");
    let chain_id = first.chain_id();
    let source = first.payload().source_document().clone();
    let event_type = first.event_type();
    let current = match self.inner.config.document_merge {
      DocumentMergePolicy::FirstArrival => first.payload().current_document().clone(),
      DocumentMergePolicy::LastArrival => received
        .last()
        .expect("window holds at least one event")
        .payload()
        .current_document()
        .clone(),
    };

    let mut metadata = Metadata::new();
    let mut call_history = Vec::new();
    for event in &received {
      metadata.merge(event.payload().metadata());
      call_history.extend(event.payload().call_history().iter().cloned());
    }

    let envelope = Envelope::from_parts(chain_id, source, current, metadata, call_history);
    Event::framed(event_type, envelope)
  }

  fn spawn_retire_timer(&self, key: Uuid) {
    let reducer = self.clone();
    let grace = self.inner.config.grace;
    tokio::spawn(async move {
      tokio::time::sleep(grace).await;
      reducer.retire(key);
    });
  }

  /// Ends the grace period for a flushed key.
  fn retire(&self, key: Uuid) {
    let mut states = self.inner.states.lock().expect("reducer mutex poisoned");
    match self.inner.config.retired {
      RetiredPolicy::StartNewCycle => {
        states.remove(&key);
        debug!(chain = %key, "key retired");
      }
      RetiredPolicy::Drop { retention } => {
        let retired_at = Instant::now();
        states.insert(key, KeyState::Retired { retired_at });
        debug!(chain = %key, "key retired with tombstone");
        drop(states);
        self.spawn_tombstone_purge(key, retired_at, retention);
      }
    }
  }

  /// Removes the tombstone once its retention lapses, unless a newer
  /// cycle has replaced it.
  fn spawn_tombstone_purge(&self, key: Uuid, retired_at: Instant, retention: Duration) {
    let reducer = self.clone();
    tokio::spawn(async move {
      tokio::time::sleep_until(retired_at + retention).await;
      let mut states = reducer.inner.states.lock().expect("reducer mutex poisoned");
      if matches!(states.get(&key), Some(KeyState::Retired { retired_at: at }) if *at == retired_at)
      {
        states.remove(&key);
      }
    });
  }
}

fn random_jitter(jitter: Duration) -> Duration {
  if jitter.is_zero() {
    return Duration::ZERO;
  }
  let millis = rand::thread_rng().gen_range(0..=jitter.as_millis() as u64);
  Duration::from_millis(millis)
}
