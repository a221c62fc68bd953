//! Query logger adapter for database layers
//!
//! Translates the query/migration callbacks an ORM emits into logger calls
//! tagged with the `orm` external source.

use crate::core::{LogOptions, Logger, Payload, Result};

pub(crate) const SOURCE_FILE: &str = file!();
pub(crate) const MODULE_PATH: &str = module_path!();

const DEFAULT_CONTEXT: &str = "ORM";
const EXTERNAL_SOURCE: &str = "orm";

#[derive(Debug, Clone)]
pub struct OrmLogger {
    logger: Logger,
}

impl OrmLogger {
    pub fn new() -> Self {
        Self {
            logger: Logger::with_external_source(DEFAULT_CONTEXT, EXTERNAL_SOURCE),
        }
    }

    /// Adapter sharing `logger`'s sink, clock and configuration
    pub fn from_logger(logger: &Logger) -> Self {
        Self {
            logger: logger.scoped(DEFAULT_CONTEXT, Some(EXTERNAL_SOURCE)),
        }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    #[track_caller]
    pub fn log_query(&self, query: &str) -> Option<String> {
        self.logger.log(query)
    }

    /// The query text is printed as the error's trace.
    #[track_caller]
    pub fn log_query_error(&self, error: impl Into<Payload>, query: &str) -> Option<String> {
        self.logger.error_with(error, LogOptions::new().trace(query))
    }

    #[track_caller]
    pub fn log_query_slow(&self, seconds: f64, query: &str) -> Option<String> {
        self.logger.warn_with(
            format!("Slow query! Made {}s to be executed", seconds),
            LogOptions::new().trace(query),
        )
    }

    #[track_caller]
    pub fn log_schema_build(&self, message: &str) -> Option<String> {
        self.logger.verbose(message)
    }

    #[track_caller]
    pub fn log_migration(&self, message: &str) -> Option<String> {
        self.logger.verbose(message)
    }

    /// Generic entry point; `level` is one of `"log"`, `"info"` or `"warn"`.
    #[track_caller]
    pub fn log(&self, level: &str, message: impl Into<Payload>) -> Result<Option<String>> {
        let level = match level {
            "info" => "log",
            other => other,
        };
        self.logger.make_log(level, message, None)
    }
}

impl Default for OrmLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemorySink;
    use crate::core::{EmissionClock, ExcludedLevelSet, LoggerError};

    fn orm(sink: &MemorySink) -> OrmLogger {
        let base = Logger::builder()
            .process_name("api")
            .colors(false)
            .capture_call_sites(false)
            .excluded_levels(ExcludedLevelSet::new())
            .sink(sink.clone())
            .clock(EmissionClock::new())
            .build();
        OrmLogger::from_logger(&base)
    }

    #[test]
    fn test_query_is_logged_with_source_tag() {
        let sink = MemorySink::new();
        orm(&sink).log_query("SELECT * FROM invoices");
        assert!(sink.lines()[0].contains("[orm] [Orm] SELECT * FROM invoices"));
    }

    #[test]
    fn test_failed_query_uses_query_as_trace() {
        let sink = MemorySink::new();
        orm(&sink).log_query_error("relation does not exist", "SELECT * FROM nope");

        let lines = sink.lines();
        assert!(lines[0].contains("relation does not exist"));
        assert_eq!(lines[1], "StackTrace: error\nSELECT * FROM nope");
    }

    #[test]
    fn test_slow_query_message() {
        let sink = MemorySink::new();
        orm(&sink).log_query_slow(2.5, "SELECT pg_sleep(2.5)");

        let lines = sink.lines();
        assert!(lines[0].contains("Slow query! Made 2.5s to be executed"));
        assert_eq!(lines[1], "StackTrace: warn\nSELECT pg_sleep(2.5)");
    }

    #[test]
    fn test_call_site_is_adapter_caller() {
        use crate::core::{CallFrame, StackCapture};

        struct OrmStack;

        impl StackCapture for OrmStack {
            fn capture(&self) -> Vec<CallFrame> {
                vec![
                    CallFrame::from_symbol("rust_service_logger::core::logger::Logger::log")
                        .with_location("src/core/logger.rs", 210, 9),
                    CallFrame::from_symbol("rust_service_logger::orm::OrmLogger::log_query")
                        .with_location("src/orm.rs", 40, 9),
                    CallFrame::from_symbol("billing::db::InvoiceRepo::save")
                        .with_location("/srv/billing/src/db.rs", 61, 13),
                ]
            }
        }

        let sink = MemorySink::new();
        let base = Logger::builder()
            .colors(false)
            .excluded_levels(ExcludedLevelSet::new())
            .sink(sink.clone())
            .clock(EmissionClock::new())
            .stack_capture(OrmStack)
            .build();

        OrmLogger::from_logger(&base).log_query("INSERT INTO invoices");
        assert_eq!(
            sink.lines()[1],
            "    at InvoiceRepo.save (/srv/billing/src/db.rs:61:13)"
        );
    }

    #[test]
    fn test_schema_and_migration_are_verbose() {
        let sink = MemorySink::new();
        let base = Logger::builder()
            .colors(false)
            .excluded_levels(ExcludedLevelSet::new().with(crate::Severity::Verbose))
            .sink(sink.clone())
            .clock(EmissionClock::new())
            .build();
        let orm = OrmLogger::from_logger(&base);

        assert_eq!(orm.log_schema_build("creating table invoices"), None);
        assert_eq!(orm.log_migration("running 0042_add_totals"), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_generic_log_levels() {
        let sink = MemorySink::new();
        let orm = orm(&sink);

        assert!(orm.log("info", "pool ready").unwrap().is_some());
        assert!(orm.log("warn", "pool exhausted").unwrap().unwrap().contains("StackTrace: warn"));

        let err = orm.log("fatal", "nope").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidSeverity { .. }));
    }
}
