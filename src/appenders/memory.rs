//! In-memory sink
//!
//! Keeps emitted lines in a shared buffer instead of printing them. Useful in
//! tests and for embedders that want to inspect or forward console output.

use crate::core::{LineSink, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Sink that stores every line it receives
///
/// Clones share the same buffer, so a test can keep one handle and give
/// another to the logger.
///
/// # Example
///
/// ```
/// use rust_service_logger::appenders::MemorySink;
/// use rust_service_logger::Logger;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .context("Billing")
///     .sink(sink.clone())
///     .colors(false)
///     .build();
///
/// logger.log("invoice issued");
/// assert!(sink.contents().contains("invoice issued"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// All lines joined with newlines, as they would appear on a console
    pub fn contents(&self) -> String {
        let lines = self.lines.lock();
        let mut out = String::new();
        for line in lines.iter() {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Remove and return every stored line
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LineSink for MemorySink {
    fn write_line(&self, line: &str) -> Result<()> {
        self.lines.lock().push(line.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
