//! # Rust Service Logger
//!
//! Console logging for services, plus self-healing connections for
//! message-queue clients.
//!
//! ## Features
//!
//! - **Call Sites**: Every line is followed by the caller's frame, or a full stack for errors and warnings
//! - **Readable Lines**: Coloured severity, process tag, titleized context and `+Nms` since the previous line
//! - **Structured Payloads**: JSON values are pretty-printed below the line
//! - **Level Filtering**: `LOG_LEVELS_IGNORE` suppresses severities before any work is done
//! - **Auto-Rebuilding Clients**: `ConnectionManager` rebuilds broken clients transparently
//!
//! ## Example
//!
//! ```
//! use rust_service_logger::prelude::*;
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder()
//!     .context("billing|invoices")
//!     .excluded_levels(ExcludedLevelSet::new())
//!     .colors(false)
//!     .sink(sink.clone())
//!     .build();
//!
//! logger.log("invoice issued");
//! assert!(sink.lines()[0].contains("[Billing|Invoices] invoice issued"));
//! assert!(sink.lines()[1].starts_with("    at "));
//! ```

pub mod appenders;
#[cfg(feature = "connection")]
pub mod connection;
pub mod core;
pub mod macros;
pub mod orm;

pub mod prelude {
    pub use crate::appenders::{MemorySink, StdoutSink};
    pub use crate::core::{
        CallFrame, EmissionClock, ExcludedLevelSet, LineSink, LogOptions, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, Payload, Result, Severity, TimestampFormat,
    };
    pub use crate::orm::OrmLogger;
}

pub use appenders::{MemorySink, StdoutSink};
pub use core::{
    titleize_context, BacktraceCapture, CallFrame, CallSiteResolver, EmissionClock,
    ExcludedLevelSet, LineSink, LogOptions, Logger, LoggerBuilder, LoggerConfig, LoggerError,
    LoggerIdentity, MessageFormatter, Payload, Result, Severity, SourceUnit, StackCapture,
    TimestampFormat,
};
pub use orm::OrmLogger;
