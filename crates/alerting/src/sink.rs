//! Alert sinks

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Receiver of driver alerts (speaker, banner, log...)
pub trait AlertSink: Send {
    fn notify(&mut self, message: &str);
}

impl<S: AlertSink + ?Sized> AlertSink for Box<S> {
    fn notify(&mut self, message: &str) {
        (**self).notify(message)
    }
}

/// Sink selection for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Structured log line
    #[default]
    Log,
    /// Terminal bell on stderr
    Bell,
}

impl SinkKind {
    pub fn build(self) -> Box<dyn AlertSink> {
        match self {
            SinkKind::Log => Box::new(LogSink),
            SinkKind::Bell => Box::new(BellSink::stderr()),
        }
    }
}

/// Writes alerts to the tracing log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn notify(&mut self, message: &str) {
        warn!(alert = message, "Driver alert");
    }
}

/// Rings the terminal bell and prints the message
pub struct BellSink<W> {
    out: W,
}

impl BellSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write + Send> BellSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> AlertSink for BellSink<W> {
    fn notify(&mut self, message: &str) {
        let result = writeln!(self.out, "\x07{}", message).and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to ring alert bell: {}", e);
        }
    }
}

/// Keeps every message in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        match self.messages.lock() {
            Ok(messages) => messages.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self) -> usize {
        self.messages().len()
    }
}

impl AlertSink for MemorySink {
    fn notify(&mut self, message: &str) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_output() {
        let mut sink = BellSink::new(Vec::new());
        sink.notify("Both eyes closed!");
        assert_eq!(sink.into_inner(), b"\x07Both eyes closed!\n".to_vec());
    }

    #[test]
    fn test_memory_sink_shared() {
        let sink = MemorySink::new();
        let mut boxed: Box<dyn AlertSink> = Box::new(sink.clone());
        boxed.notify("one");
        boxed.notify("two");
        assert_eq!(sink.messages(), vec!["one".to_string(), "two".to_string()]);
    }
}
