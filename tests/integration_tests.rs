//! Integration tests for the console logger
//!
//! These tests verify:
//! - Level exclusion
//! - Payload rendering
//! - Context titleization
//! - Elapsed-time suffixes
//! - Call-site reporting
//! - Severity dispatch by name

use rust_service_logger::prelude::*;
use rust_service_logger::titleize_context;
use serde::Serialize;
use serde_json::json;
use std::thread;
use std::time::Duration;

fn capture_logger(sink: &MemorySink) -> Logger {
    Logger::builder()
        .context("billing_service|invoices")
        .process_name("billing")
        .excluded_levels(ExcludedLevelSet::new())
        .colors(false)
        .sink(sink.clone())
        .clock(EmissionClock::new())
        .build()
}

#[test]
fn test_excluded_levels_produce_no_output() {
    let sink = MemorySink::new();
    let excluded: ExcludedLevelSet = Severity::ALL.iter().copied().collect();
    let logger = Logger::builder()
        .excluded_levels(excluded)
        .sink(sink.clone())
        .clock(EmissionClock::new())
        .build();

    assert_eq!(logger.log("a"), None);
    assert_eq!(logger.error("b"), None);
    assert_eq!(logger.warn("c"), None);
    assert_eq!(logger.debug("d"), None);
    assert_eq!(logger.verbose("e"), None);
    assert!(sink.contents().is_empty());
}

#[test]
fn test_excluded_levels_from_list() {
    let sink = MemorySink::new();
    let logger = Logger::builder()
        .excluded_levels(ExcludedLevelSet::parse("debug, verbose").unwrap())
        .colors(false)
        .sink(sink.clone())
        .clock(EmissionClock::new())
        .build();

    logger.debug("hidden");
    logger.verbose("hidden");
    logger.log("shown");

    assert_eq!(sink.len(), 2);
    assert!(sink.lines()[0].contains("shown"));
}

#[test]
fn test_empty_object_payload_renders_plain_string() {
    #[derive(Serialize)]
    struct Marker {}

    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.log(Payload::json(&Marker {}));
    let line = &sink.lines()[0];
    assert!(line.ends_with("Marker"));
    assert!(!line.contains("{}"));

    let err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "broker refused");
    logger.error_with(Payload::error(&err), LogOptions::new().time_diff(false));
    assert!(sink.lines()[2].ends_with("broker refused"));
}

#[test]
fn test_bare_empty_json_object_is_not_printed_as_braces() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.log_with(json!({}), LogOptions::new().time_diff(false));
    let line = &sink.lines()[0];
    assert!(!line.ends_with("{}"), "empty object leaked: {}", line);
    assert!(line.ends_with("[Billing Service|Invoices] Object"));
}

#[test]
fn test_structured_payload_is_pretty_printed() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.log_with(json!({"invoice": 17, "paid": true}), LogOptions::new().time_diff(false));
    let line = &sink.lines()[0];

    assert!(line.contains("===>\n{\n"));
    assert!(line.contains("\"invoice\": 17"));
}

#[test]
fn test_context_titleization() {
    assert_eq!(titleize_context("foo_bar|baz"), "Foo Bar|Baz");

    let sink = MemorySink::new();
    capture_logger(&sink).log("issued");
    assert!(sink.lines()[0].contains("[Billing Service|Invoices] issued"));
}

#[test]
fn test_elapsed_suffix_tracks_wall_clock() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.log("first");
    thread::sleep(Duration::from_millis(50));
    logger.log("second");

    let line = &sink.lines()[2];
    let suffix = line.rsplit(" +").next().unwrap();
    let millis: u64 = suffix.trim_end_matches("ms").parse().unwrap();
    assert!(millis >= 50, "elapsed {}ms shorter than the sleep", millis);
    assert!(millis < 1000, "elapsed {}ms unreasonably long", millis);
}

#[test]
fn test_clock_is_shared_between_loggers() {
    let sink = MemorySink::new();
    let clock = EmissionClock::new();
    let first = Logger::builder()
        .context("a")
        .excluded_levels(ExcludedLevelSet::new())
        .colors(false)
        .sink(sink.clone())
        .clock(clock.clone())
        .build();
    let second = first.scoped("b", None);

    first.log("one");
    thread::sleep(Duration::from_millis(20));
    second.log("two");

    let millis: u64 = sink.lines()[2]
        .rsplit(" +")
        .next()
        .unwrap()
        .trim_end_matches("ms")
        .parse()
        .unwrap();
    assert!(millis >= 20);
}

#[test]
fn test_make_log_unknown_severity() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    let err = logger.make_log("critical", "boom", None).unwrap_err();
    assert!(matches!(err, LoggerError::InvalidSeverity { .. }));
    assert!(sink.is_empty());

    let output = logger.make_log("error", "boom", Some("custom trace")).unwrap();
    assert!(output.unwrap().ends_with("StackTrace: error\ncustom trace"));
}

#[test]
fn test_call_site_points_at_caller() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.log("where am I");
    let trace = &sink.lines()[1];

    assert!(trace.starts_with("    at "));
    assert!(trace.contains("integration_tests.rs"), "unexpected call site: {}", trace);
    assert!(!trace.contains("logger.rs"));
}

#[test]
fn test_error_trace_block_starts_outside_engine() {
    let sink = MemorySink::new();
    let logger = capture_logger(&sink);

    logger.error("failed");
    let block = &sink.lines()[1];
    let mut lines = block.lines();

    assert_eq!(lines.next(), Some("StackTrace: error"));
    let first_frame = lines.next().unwrap();
    assert!(first_frame.contains("integration_tests.rs"), "unexpected frame: {}", first_frame);
}

#[test]
fn test_orm_adapter_shares_sink() {
    let sink = MemorySink::new();
    let orm = OrmLogger::from_logger(&capture_logger(&sink));

    orm.log_query("SELECT 1");
    orm.log_query_slow(3.0, "SELECT pg_sleep(3)");

    let lines = sink.lines();
    assert!(lines[0].contains("[orm] [Orm] SELECT 1"));
    assert!(lines[2].contains("Slow query! Made 3s to be executed"));
    assert_eq!(lines[3], "StackTrace: warn\nSELECT pg_sleep(3)");
}
