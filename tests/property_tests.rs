//! Property-based tests for rust_service_logger using proptest

use proptest::prelude::*;
use rust_service_logger::core::logger::titleize;
use rust_service_logger::prelude::*;
use rust_service_logger::titleize_context;

fn any_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Log),
        Just(Severity::Error),
        Just(Severity::Warn),
        Just(Severity::Debug),
        Just(Severity::Verbose),
    ]
}

// ============================================================================
// Severity Tests
// ============================================================================

proptest! {
    /// Severity string conversions roundtrip
    #[test]
    fn test_severity_str_roundtrip(severity in any_severity()) {
        let parsed: Severity = severity.to_str().parse().unwrap();
        prop_assert_eq!(severity, parsed);
    }

    /// Anything that is not a lowercase severity name is rejected
    #[test]
    fn test_unknown_names_rejected(name in "[A-Za-z]{1,10}") {
        let known = Severity::ALL.iter().any(|s| s.to_str() == name);
        prop_assert_eq!(name.parse::<Severity>().is_ok(), known);
    }
}

// ============================================================================
// Context Tests
// ============================================================================

proptest! {
    /// Titleizing keeps the number of pipe-separated segments
    #[test]
    fn test_titleize_keeps_segments(segments in prop::collection::vec("[a-z_]{0,12}", 1..5)) {
        let label = segments.join("|");
        let titled = titleize_context(&label);
        prop_assert_eq!(titled.split('|').count(), segments.len());
    }

    /// Titleizing is idempotent
    #[test]
    fn test_titleize_idempotent(text in "[a-z_ ]{0,24}") {
        let once = titleize(&text);
        prop_assert_eq!(titleize(&once), once);
    }

    /// No underscores survive and the first character is upper case
    #[test]
    fn test_titleize_shape(text in "[a-z][a-z_]{0,20}") {
        let titled = titleize(&text);
        prop_assert!(!titled.contains('_'));
        prop_assert!(titled.chars().next().unwrap().is_uppercase());
    }
}

// ============================================================================
// Exclusion Tests
// ============================================================================

proptest! {
    /// A parsed list excludes exactly the listed severities
    #[test]
    fn test_excluded_set_parse(listed in prop::collection::vec(any_severity(), 0..5)) {
        let list = listed.iter().map(|s| s.to_str()).collect::<Vec<_>>().join(" , ");
        let set = ExcludedLevelSet::parse(&list).unwrap();

        for severity in Severity::ALL {
            prop_assert_eq!(set.contains(severity), listed.contains(&severity));
        }
    }

    /// Excluded severities never reach the sink
    #[test]
    fn test_excluded_never_written(listed in prop::collection::vec(any_severity(), 0..5), message in ".{0,40}") {
        let sink = MemorySink::new();
        let logger = Logger::builder()
            .excluded_levels(listed.iter().copied().collect())
            .colors(false)
            .capture_call_sites(false)
            .sink(sink.clone())
            .clock(EmissionClock::new())
            .build();

        for severity in Severity::ALL {
            let before = sink.len();
            let output = logger.dispatch(severity, message.as_str(), LogOptions::default());
            prop_assert_eq!(output.is_none(), listed.contains(&severity));
            prop_assert_eq!(sink.len() == before, listed.contains(&severity));
        }
    }
}
