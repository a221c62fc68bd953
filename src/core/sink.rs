//! Sink trait for emitted console lines

use super::error::Result;

/// Destination for fully formatted lines
///
/// `write_line` receives one line without its trailing newline and must emit
/// it, newline included, as a single write so that lines from concurrent
/// callers never interleave.
pub trait LineSink: Send + Sync {
    fn write_line(&self, line: &str) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
