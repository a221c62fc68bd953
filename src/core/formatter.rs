//! Console line formatting
//!
//! Produces lines of the form
//!
//! ```text
//! [billing] 4242   - 10/19/2026, 3:04:05 PM     [amqp] [Billing|Invoices] invoice issued +12ms
//! ```
//!
//! The process/pid prefix, the external source tag and the body use the
//! severity colour; the context tag and the elapsed suffix are always yellow.

use super::clock::ClockGuard;
use super::payload::Payload;
use super::severity::Severity;
use super::sink::LineSink;
use super::timestamp::TimestampFormat;
use chrono::Local;
use colored::{Color, Colorize};
use serde_json::Value;
use std::time::{Duration, Instant};

const HIGHLIGHT: Color = Color::Yellow;
const STRUCTURE_MARKER: &str = "===>";

/// Everything a single console line is built from
#[derive(Debug, Clone, Copy)]
pub struct LineParts<'a> {
    pub payload: &'a Payload,
    pub severity: Severity,
    pub context: &'a str,
    pub time_diff: bool,
    pub process_name: &'a str,
    pub external_source: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub struct MessageFormatter {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    pid: u32,
}

impl MessageFormatter {
    pub fn new(use_colors: bool, timestamp_format: TimestampFormat) -> Self {
        Self {
            use_colors,
            timestamp_format,
            pid: std::process::id(),
        }
    }

    pub fn use_colors(&self) -> bool {
        self.use_colors
    }

    pub(crate) fn paint(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    /// Render the payload body: structures as an arrow plus pretty JSON,
    /// everything else as its plain string in `color`.
    pub fn render_body(&self, payload: &Payload, color: Color) -> String {
        if payload.is_empty_structure() {
            return self.paint(&payload.primitive_string(), color);
        }

        match payload.value() {
            value @ (Value::Object(_) | Value::Array(_)) => {
                let pretty =
                    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
                format!("{}\n{}\n", self.paint(STRUCTURE_MARKER, color), pretty)
            }
            Value::String(s) => self.paint(s, color),
            other => self.paint(&other.to_string(), color),
        }
    }

    /// Compose a line from its parts, a rendered timestamp and the time since
    /// the previous emission.
    pub fn compose(&self, parts: &LineParts<'_>, timestamp: &str, elapsed: Option<Duration>) -> String {
        let color = parts.severity.color_code();

        let pid_message = self.paint(
            &format!("[{}] {}   - ", parts.process_name, self.pid),
            color,
        );

        let external_message = match parts.external_source {
            Some(source) if !source.is_empty() => self.paint(&format!("[{}] ", source), color),
            _ => String::new(),
        };

        let context_message = if parts.context.is_empty() {
            String::new()
        } else {
            self.paint(&format!("[{}] ", parts.context), HIGHLIGHT)
        };

        let elapsed_suffix = match elapsed {
            Some(gap) if parts.time_diff => {
                self.paint(&format!(" +{}ms", gap.as_millis()), HIGHLIGHT)
            }
            _ => String::new(),
        };

        format!(
            "{}{}     {}{}{}{}",
            pid_message,
            timestamp,
            external_message,
            context_message,
            self.render_body(parts.payload, color),
            elapsed_suffix
        )
    }

    /// Format a line, advance the clock and write the line to `sink`.
    ///
    /// The clock advances even when the line has time diff disabled. Write
    /// failures are reported on stderr and never propagated.
    pub fn print(&self, parts: &LineParts<'_>, clock: &mut ClockGuard<'_>, sink: &dyn LineSink) -> String {
        let elapsed = clock.tick(Instant::now());
        let timestamp = self.timestamp_format.format(&Local::now());
        let line = self.compose(parts, &timestamp, elapsed);

        if let Err(e) = sink.write_line(&line) {
            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.name(), e);
        }

        line
    }
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(true, TimestampFormat::default())
    }
}
