//! Run event sink trait and implementations.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, Level};
use uuid::Uuid;

use crate::core::LogEntry;
use crate::pipeline::Phase;
use crate::utils::Timestamp;

/// Lifecycle event of a wizard run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// A run entered `Running`.
    RunStarted {
        /// Run identifier.
        run_id: Uuid,
        /// Project name from the submitted configuration.
        project: String,
        /// Number of stages in the timeline.
        stages: usize,
        /// When the run started.
        started_at: Timestamp,
    },
    /// A stage entry was appended to the log.
    EntryAppended {
        /// Run identifier.
        run_id: Uuid,
        /// Zero-based stage index.
        index: usize,
        /// The appended entry.
        entry: LogEntry,
    },
    /// The derived phase advanced.
    PhaseChanged {
        /// Run identifier.
        run_id: Uuid,
        /// Previous phase.
        from: Phase,
        /// New phase.
        to: Phase,
    },
    /// The run finished and the preview is available.
    RunCompleted {
        /// Run identifier.
        run_id: Uuid,
        /// Number of entries emitted.
        emitted: usize,
        /// Wall-clock duration in milliseconds.
        duration_ms: f64,
    },
    /// The run was cancelled by a reset.
    RunCancelled {
        /// Run identifier.
        run_id: Uuid,
        /// Cancellation reason.
        reason: String,
    },
}

impl RunEvent {
    /// Returns the dotted event type, e.g. `run.started`.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run.started",
            Self::EntryAppended { .. } => "run.entry_appended",
            Self::PhaseChanged { .. } => "run.phase_changed",
            Self::RunCompleted { .. } => "run.completed",
            Self::RunCancelled { .. } => "run.cancelled",
        }
    }

    /// Returns the run the event belongs to.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::EntryAppended { run_id, .. }
            | Self::PhaseChanged { run_id, .. }
            | Self::RunCompleted { run_id, .. }
            | Self::RunCancelled { run_id, .. } => *run_id,
        }
    }
}

/// Trait for sinks that observe run events.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Emits an event asynchronously.
    async fn emit(&self, event: &RunEvent);

    /// Emits an event without blocking.
    ///
    /// Implementations must not panic; failures are logged and suppressed.
    fn try_emit(&self, event: &RunEvent);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &RunEvent) {}

    fn try_emit(&self, _event: &RunEvent) {}
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }

    fn log_event(&self, event: &RunEvent) {
        let event_type = event.event_type();
        let run_id = event.run_id();
        if self.level == Level::DEBUG {
            debug!(event_type, %run_id, event = ?event, "Event: {}", event_type);
        } else {
            info!(event_type, %run_id, event = ?event, "Event: {}", event_type);
        }
    }
}

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &RunEvent) {
        self.log_event(event);
    }

    fn try_emit(&self, event: &RunEvent) {
        self.log_event(event);
    }
}

/// A collecting event sink for testing purposes.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: parking_lot::RwLock<Vec<RunEvent>>,
}

impl CollectingEventSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<RunEvent> {
        self.events.read().clone()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if no events have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Returns events whose type starts with `type_prefix`.
    #[must_use]
    pub fn events_of_type(&self, type_prefix: &str) -> Vec<RunEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.event_type().starts_with(type_prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &RunEvent) {
        self.events.write().push(event.clone());
    }

    fn try_emit(&self, event: &RunEvent) {
        self.events.write().push(event.clone());
    }
}

/// An event sink that forwards events into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<RunEvent>,
}

impl ChannelEventSink {
    /// Creates a sink and the receiver that drains it.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RunEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn forward(&self, event: &RunEvent) {
        if self.tx.send(event.clone()).is_err() {
            debug!(event_type = event.event_type(), "Event receiver dropped");
        }
    }
}

#[async_trait]
impl EventSink for ChannelEventSink {
    async fn emit(&self, event: &RunEvent) {
        self.forward(event);
    }

    fn try_emit(&self, event: &RunEvent) {
        self.forward(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cancelled(reason: &str) -> RunEvent {
        RunEvent::RunCancelled {
            run_id: Uuid::nil(),
            reason: reason.to_string(),
        }
    }

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpEventSink;
        sink.emit(&cancelled("reset")).await;
        sink.try_emit(&cancelled("reset"));
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingEventSink::debug();
        sink.emit(&cancelled("reset")).await;
        LoggingEventSink::default().try_emit(&cancelled("reset"));
    }

    #[tokio::test]
    async fn test_collecting_sink() {
        let sink = CollectingEventSink::new();
        assert!(sink.is_empty());

        sink.emit(&RunEvent::PhaseChanged {
            run_id: Uuid::nil(),
            from: Phase::Init,
            to: Phase::Design,
        })
        .await;
        sink.try_emit(&cancelled("reset"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.events_of_type("run.phase").len(), 1);
        assert_eq!(sink.events_of_type("run.cancelled")[0], cancelled("reset"));

        sink.clear();
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelEventSink::new();
        sink.emit(&cancelled("first")).await;
        sink.try_emit(&cancelled("second"));

        assert_eq!(rx.recv().await, Some(cancelled("first")));
        assert_eq!(rx.recv().await, Some(cancelled("second")));
    }

    #[test]
    fn test_channel_sink_survives_dropped_receiver() {
        let (sink, rx) = ChannelEventSink::new();
        drop(rx);
        sink.try_emit(&cancelled("reset"));
    }

    #[test]
    fn test_event_serialization() {
        let value = serde_json::to_value(cancelled("reset")).unwrap();
        assert_eq!(value["type"], "run_cancelled");
        assert_eq!(value["reason"], "reset");
        assert_eq!(cancelled("reset").event_type(), "run.cancelled");
    }
}
