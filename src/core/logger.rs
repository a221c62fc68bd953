//! Main logger implementation

use super::{
    call_site::{self, BacktraceCapture, CallSiteResolver, SourceUnit, StackCapture},
    clock::EmissionClock,
    config::{ExcludedLevelSet, LoggerConfig},
    error::Result,
    formatter::{LineParts, MessageFormatter},
    payload::Payload,
    severity::Severity,
    sink::LineSink,
    timestamp::TimestampFormat,
};
use crate::appenders::StdoutSink;
use crate::orm;
use colored::Color;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Words titleization keeps lower-case unless they open the label
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "nor", "of", "on", "or",
    "per", "the", "to", "vs",
];

const FRAME_COLOR: Color = Color::BrightBlack;

const CRATE_ROOT: &str = env!("CARGO_MANIFEST_DIR");

/// Source files and modules whose frames are never reported as call sites
pub(crate) fn engine_unit() -> SourceUnit {
    SourceUnit::new()
        .crate_file(CRATE_ROOT, file!())
        .module(module_path!())
        .crate_file(CRATE_ROOT, call_site::SOURCE_FILE)
        .module(call_site::MODULE_PATH)
        .crate_file(CRATE_ROOT, orm::SOURCE_FILE)
        .module(orm::MODULE_PATH)
}

/// Who is logging: context label, process name and optional external source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerIdentity {
    /// Pipe-separated label such as `App|ClientProxy`
    pub context: String,
    pub process_name: String,
    pub external_source: Option<String>,
}

/// Per-call options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Explicit trace, used instead of a resolved call site
    pub trace: Option<String>,
    /// Context label used verbatim instead of the logger's own
    pub context: Option<String>,
    /// Append the time elapsed since the previous line
    pub time_diff: bool,
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn time_diff(mut self, enabled: bool) -> Self {
        self.time_diff = enabled;
        self
    }
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            trace: None,
            context: None,
            time_diff: true,
        }
    }
}

/// Titleize every pipe-separated segment of a context label.
///
/// ```
/// use rust_service_logger::core::logger::titleize_context;
///
/// assert_eq!(titleize_context("foo_bar|baz"), "Foo Bar|Baz");
/// ```
pub fn titleize_context(label: &str) -> String {
    label.split('|').map(titleize).collect::<Vec<_>>().join("|")
}

/// Lower-case the text, turn underscores into spaces and capitalize every
/// word (and every hyphenated part) except the small connecting words.
pub fn titleize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('_', " ");

    let titled = lowered
        .split(' ')
        .map(|word| {
            word.split('-')
                .map(|part| {
                    if SMALL_WORDS.contains(&part) {
                        part.to_string()
                    } else {
                        capitalize(part)
                    }
                })
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ");

    capitalize(&titled)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Console logger with one operation per severity
///
/// Every operation checks the excluded levels first, then formats one line,
/// writes it, and writes a trace block right after it:
///
/// - `log`, `debug`, `verbose`: the resolved call site (`    at Type.fn (file:line:col)`)
/// - `error`, `warn`: `StackTrace: <severity>` followed by the explicit trace
///   or the resolved stack
///
/// Operations return the emitted text, or `None` when the severity is
/// excluded.
///
/// # Example
///
/// ```
/// use rust_service_logger::{Logger, LogOptions};
///
/// let logger = Logger::new("orders|dispatcher");
/// logger.log("dispatcher started");
/// logger.warn_with("queue is filling up", LogOptions::new().time_diff(false));
/// ```
#[derive(Clone)]
pub struct Logger {
    identity: Arc<LoggerIdentity>,
    excluded_levels: ExcludedLevelSet,
    formatter: MessageFormatter,
    resolver: CallSiteResolver,
    sink: Arc<dyn LineSink>,
    clock: EmissionClock,
}

impl Logger {
    /// Logger with the process-wide configuration, writing to stdout
    pub fn new(context: impl Into<String>) -> Self {
        Self::builder().context(context).build()
    }

    pub fn with_external_source(context: impl Into<String>, external_source: impl Into<String>) -> Self {
        Self::builder()
            .context(context)
            .external_source(external_source)
            .build()
    }

    /// Same sink, clock and configuration, different identity
    #[must_use]
    pub fn scoped(&self, context: impl Into<String>, external_source: Option<&str>) -> Logger {
        Logger {
            identity: Arc::new(LoggerIdentity {
                context: context.into(),
                process_name: self.identity.process_name.clone(),
                external_source: external_source.map(str::to_string),
            }),
            ..self.clone()
        }
    }

    pub fn identity(&self) -> &LoggerIdentity {
        &self.identity
    }

    pub fn excluded_levels(&self) -> &ExcludedLevelSet {
        &self.excluded_levels
    }

    pub fn is_enabled(&self, severity: Severity) -> bool {
        !self.excluded_levels.contains(severity)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    #[track_caller]
    pub fn log(&self, message: impl Into<Payload>) -> Option<String> {
        self.emit(Severity::Log, message.into(), LogOptions::default(), Location::caller())
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<Payload>) -> Option<String> {
        self.emit(Severity::Error, message.into(), LogOptions::default(), Location::caller())
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<Payload>) -> Option<String> {
        self.emit(Severity::Warn, message.into(), LogOptions::default(), Location::caller())
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<Payload>) -> Option<String> {
        self.emit(Severity::Debug, message.into(), LogOptions::default(), Location::caller())
    }

    #[track_caller]
    pub fn verbose(&self, message: impl Into<Payload>) -> Option<String> {
        self.emit(Severity::Verbose, message.into(), LogOptions::default(), Location::caller())
    }

    #[track_caller]
    pub fn log_with(&self, message: impl Into<Payload>, options: LogOptions) -> Option<String> {
        self.emit(Severity::Log, message.into(), options, Location::caller())
    }

    #[track_caller]
    pub fn error_with(&self, message: impl Into<Payload>, options: LogOptions) -> Option<String> {
        self.emit(Severity::Error, message.into(), options, Location::caller())
    }

    #[track_caller]
    pub fn warn_with(&self, message: impl Into<Payload>, options: LogOptions) -> Option<String> {
        self.emit(Severity::Warn, message.into(), options, Location::caller())
    }

    #[track_caller]
    pub fn debug_with(&self, message: impl Into<Payload>, options: LogOptions) -> Option<String> {
        self.emit(Severity::Debug, message.into(), options, Location::caller())
    }

    #[track_caller]
    pub fn verbose_with(&self, message: impl Into<Payload>, options: LogOptions) -> Option<String> {
        self.emit(Severity::Verbose, message.into(), options, Location::caller())
    }

    /// Log at a severity chosen at runtime
    #[track_caller]
    pub fn dispatch(
        &self,
        severity: Severity,
        message: impl Into<Payload>,
        options: LogOptions,
    ) -> Option<String> {
        self.emit(severity, message.into(), options, Location::caller())
    }

    /// Log at a severity given by name (`"log"`, `"error"`, `"warn"`,
    /// `"debug"`, `"verbose"`).
    ///
    /// Unknown names fail with [`LoggerError::InvalidSeverity`](super::error::LoggerError::InvalidSeverity)
    /// before anything is written.
    #[track_caller]
    pub fn make_log(
        &self,
        severity: &str,
        message: impl Into<Payload>,
        trace: Option<&str>,
    ) -> Result<Option<String>> {
        let severity: Severity = severity.parse()?;
        let options = LogOptions {
            trace: trace.map(str::to_string),
            ..LogOptions::default()
        };
        Ok(self.emit(severity, message.into(), options, Location::caller()))
    }

    fn emit(
        &self,
        severity: Severity,
        payload: Payload,
        options: LogOptions,
        caller: &'static Location<'static>,
    ) -> Option<String> {
        if self.excluded_levels.contains(severity) {
            return None;
        }

        let context = options
            .context
            .unwrap_or_else(|| titleize_context(&self.identity.context));
        let trace_block = self.trace_block(severity, options.trace.as_deref(), caller);

        let parts = LineParts {
            payload: &payload,
            severity,
            context: &context,
            time_diff: options.time_diff,
            process_name: &self.identity.process_name,
            external_source: self.identity.external_source.as_deref(),
        };

        // hold the clock across both writes so line and trace stay together
        let mut clock = self.clock.lock();
        let line = self.formatter.print(&parts, &mut clock, self.sink.as_ref());
        if let Err(e) = self.sink.write_line(&trace_block) {
            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", self.sink.name(), e);
        }
        drop(clock);

        Some(format!("{}\n{}", line, trace_block))
    }

    fn trace_block(
        &self,
        severity: Severity,
        explicit: Option<&str>,
        caller: &'static Location<'static>,
    ) -> String {
        if severity.wants_full_trace() {
            let header = self
                .formatter
                .paint(&format!("StackTrace: {}", severity), severity.color_code());
            let body = match explicit {
                Some(trace) => trace.to_string(),
                None => self
                    .resolver
                    .resolve_full_trace(caller)
                    .iter()
                    .map(|frame| self.formatter.paint(&format!("    at {}", frame), FRAME_COLOR))
                    .collect::<Vec<_>>()
                    .join("\n"),
            };
            format!("{}\n{}", header, body)
        } else {
            let at = match explicit {
                Some(trace) => trace.to_string(),
                None => self.resolver.resolve(caller).to_string(),
            };
            self.formatter.paint(&format!("    at {}", at), FRAME_COLOR)
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("identity", &self.identity)
            .field("excluded_levels", &self.excluded_levels)
            .field("sink", &self.sink.name())
            .finish()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Anything not set falls back to the process-wide configuration
/// ([`LoggerConfig::global`]), stdout and the process-wide emission clock.
///
/// # Example
/// ```
/// use rust_service_logger::prelude::*;
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder()
///     .context("billing|invoices")
///     .process_name("billing")
///     .excluded_levels(ExcludedLevelSet::new().with(Severity::Debug))
///     .colors(false)
///     .sink(sink.clone())
///     .build();
///
/// logger.debug("hidden");
/// assert!(sink.is_empty());
/// ```
pub struct LoggerBuilder {
    context: String,
    process_name: Option<String>,
    external_source: Option<String>,
    config: Arc<LoggerConfig>,
    excluded_levels: Option<ExcludedLevelSet>,
    use_colors: Option<bool>,
    capture_call_sites: Option<bool>,
    timestamp_format: Option<TimestampFormat>,
    sink: Option<Arc<dyn LineSink>>,
    clock: Option<EmissionClock>,
    capture: Option<Arc<dyn StackCapture>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            context: String::new(),
            process_name: None,
            external_source: None,
            config: LoggerConfig::global(),
            excluded_levels: None,
            use_colors: None,
            capture_call_sites: None,
            timestamp_format: None,
            sink: None,
            clock: None,
            capture: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn process_name(mut self, name: impl Into<String>) -> Self {
        self.process_name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn external_source(mut self, source: impl Into<String>) -> Self {
        self.external_source = Some(source.into());
        self
    }

    /// Replace the process-wide configuration for this logger
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn excluded_levels(mut self, levels: ExcludedLevelSet) -> Self {
        self.excluded_levels = Some(levels);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.use_colors = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn capture_call_sites(mut self, enabled: bool) -> Self {
        self.capture_call_sites = Some(enabled);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = Some(format);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink<S: LineSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Use a private emission clock instead of the process-wide one
    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: EmissionClock) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_capture<C: StackCapture + 'static>(mut self, capture: C) -> Self {
        self.capture = Some(Arc::new(capture));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let config = self.config;

        let use_colors = self.use_colors.unwrap_or(config.use_colors);
        let timestamp_format = self
            .timestamp_format
            .unwrap_or_else(|| config.timestamp_format.clone());

        let resolver = if self.capture_call_sites.unwrap_or(config.capture_call_sites) {
            let capture = self
                .capture
                .unwrap_or_else(|| Arc::new(BacktraceCapture));
            CallSiteResolver::new(capture, engine_unit())
        } else {
            CallSiteResolver::location_only(engine_unit())
        };

        Logger {
            identity: Arc::new(LoggerIdentity {
                context: self.context,
                process_name: self
                    .process_name
                    .unwrap_or_else(|| config.process_name.clone()),
                external_source: self.external_source,
            }),
            excluded_levels: self
                .excluded_levels
                .unwrap_or_else(|| config.excluded_levels.clone()),
            formatter: MessageFormatter::new(use_colors, timestamp_format),
            resolver,
            sink: self.sink.unwrap_or_else(|| Arc::new(StdoutSink::new())),
            clock: self.clock.unwrap_or_else(EmissionClock::global),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
