//! Console sink implementation

use crate::core::{LineSink, Result};
use std::io::Write;

/// Writes every line to the process's standard output
///
/// Each line is written with one `write_all` on a locked handle, so lines from
/// concurrent loggers never interleave.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    pub fn new() -> Self {
        Self
    }
}

impl LineSink for StdoutSink {
    fn write_line(&self, line: &str) -> Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(buf.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_sink_writes() {
        let sink = StdoutSink::new();
        sink.write_line("stdout sink smoke test").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.name(), "stdout");
    }
}
