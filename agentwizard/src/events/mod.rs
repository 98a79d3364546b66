//! Run log and event emission.
//!
//! This module provides the append-only [`LogSink`] that records emitted
//! entries and the [`EventSink`] observers that receive run lifecycle events.

mod log;
mod sink;

pub use log::LogSink;
pub use sink::{
    ChannelEventSink, CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink, RunEvent,
};
