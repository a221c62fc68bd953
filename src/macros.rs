//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The call site
//! reported for the line is the macro invocation.
//!
//! # Examples
//!
//! ```
//! use rust_service_logger::prelude::*;
//! use rust_service_logger::log;
//!
//! let logger = Logger::new("orders");
//!
//! // Basic logging
//! log!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! log!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at a severity chosen at runtime.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::log_at;
/// log_at!(logger, Severity::Warn, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! log_at {
    ($logger:expr, $severity:expr, $($arg:tt)+) => {
        $logger.dispatch($severity, format!($($arg)+), $crate::LogOptions::default())
    };
}

/// Log a log-level message.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::log;
/// log!(logger, "Application started");
/// log!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Log, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::error;
/// error!(logger, "Failed to connect to broker");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::warn;
/// warn!(logger, "Low disk space");
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Warn, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Debug, $($arg)+)
    };
}

/// Log a verbose-level message.
///
/// # Examples
///
/// ```
/// # use rust_service_logger::prelude::*;
/// # let logger = Logger::new("orders");
/// use rust_service_logger::verbose;
/// verbose!(logger, "Handshake took {}ms", 12);
/// ```
#[macro_export]
macro_rules! verbose {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log_at!($logger, $crate::Severity::Verbose, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemorySink;
    use crate::core::{EmissionClock, ExcludedLevelSet, Logger, Severity};

    fn capture() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .colors(false)
            .excluded_levels(ExcludedLevelSet::new())
            .capture_call_sites(false)
            .sink(sink.clone())
            .clock(EmissionClock::new())
            .build();
        (logger, sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = capture();
        log!(logger, "Formatted: {}", 42);
        assert!(sink.lines()[0].contains("Formatted: 42"));
    }

    #[test]
    fn test_log_at_macro() {
        let (logger, sink) = capture();
        log_at!(logger, Severity::Warn, "Retry {} of {}", 1, 3);
        assert!(sink.lines()[0].contains("Retry 1 of 3"));
        assert!(sink.lines()[1].starts_with("StackTrace: warn"));
    }

    #[test]
    fn test_macro_reports_invocation_site() {
        let (logger, sink) = capture();
        let line = line!() + 1;
        debug!(logger, "here");
        assert!(sink.lines()[1].contains(&format!("{}:{}:", file!(), line)));
    }

    #[test]
    fn test_severity_macros() {
        let (logger, sink) = capture();
        error!(logger, "Error message");
        warn!(logger, "Warning message");
        verbose!(logger, "Verbose message");
        assert_eq!(sink.len(), 6);
    }
}
