//! Core logger types and traits

pub mod call_site;
pub mod clock;
pub mod config;
pub mod error;
pub mod formatter;
pub mod logger;
pub mod payload;
pub mod severity;
pub mod sink;
pub mod timestamp;

pub use call_site::{BacktraceCapture, CallFrame, CallSiteResolver, SourceUnit, StackCapture};
pub use clock::EmissionClock;
pub use config::{ExcludedLevelSet, LoggerConfig};
pub use error::{LoggerError, Result};
pub use formatter::{LineParts, MessageFormatter};
pub use logger::{titleize_context, LogOptions, Logger, LoggerBuilder, LoggerIdentity};
pub use payload::Payload;
pub use severity::Severity;
pub use sink::LineSink;
pub use timestamp::TimestampFormat;
