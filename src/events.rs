//! Crawl event streams
//!
//! Crawl progress is reported as `(stream, message)` pairs to an [`EventLog`].
//! Recording is best-effort: sinks never block the crawl and never fail it.

use std::sync::{Mutex, PoisonError};

/// Page visits, skipped duplicates and non-images, extracted images
pub const VISITED_LINKS: &str = "visited_links";

/// Every catalogued image locator
pub const LINK: &str = "link";

/// Sink for crawl events
pub trait EventLog: Send + Sync {
    fn record(&self, stream: &str, message: &str);
}

/// Forwards events to `tracing` at debug level, tagged with the stream name
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventLog;

impl EventLog for TracingEventLog {
    fn record(&self, stream: &str, message: &str) {
        tracing::debug!(target: "image_harvest::events", stream, "{}", message);
    }
}

/// Keeps events in memory
#[derive(Debug, Default)]
pub struct MemoryEventLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl MemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(stream, message)` pairs in arrival order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages recorded on one stream
    pub fn messages(&self, stream: &str) -> Vec<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(s, _)| s == stream)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl EventLog for MemoryEventLog {
    fn record(&self, stream: &str, message: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((stream.to_string(), message.to_string()));
    }
}
