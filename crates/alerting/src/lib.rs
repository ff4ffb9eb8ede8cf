//! Alerting System
//!
//! Provides alert sinks and the dispatch policy deciding when a sink hears
//! about an active alert.

mod manager;
mod sink;

pub use manager::{AlertConfig, AlertDispatcher, AlertState};
pub use sink::{AlertSink, BellSink, LogSink, MemorySink, SinkKind};
