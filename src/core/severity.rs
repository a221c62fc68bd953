//! Log severity definitions

use super::error::LoggerError;
use colored::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Log,
    Error,
    Warn,
    Debug,
    Verbose,
}

impl Severity {
    /// Every recognized severity, in declaration order
    pub const ALL: [Severity; 5] = [
        Severity::Log,
        Severity::Error,
        Severity::Warn,
        Severity::Debug,
        Severity::Verbose,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Severity::Log => "log",
            Severity::Error => "error",
            Severity::Warn => "warn",
            Severity::Debug => "debug",
            Severity::Verbose => "verbose",
        }
    }

    pub fn color_code(&self) -> Color {
        match self {
            Severity::Log => Color::Green,
            Severity::Error => Color::Red,
            Severity::Warn => Color::Yellow,
            Severity::Debug => Color::Magenta,
            Severity::Verbose => Color::Cyan,
        }
    }

    /// Whether this severity reports a full multi-frame stack trace
    pub fn wants_full_trace(&self) -> bool {
        matches!(self, Severity::Error | Severity::Warn)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for Severity {
    type Err = LoggerError;

    /// Case-sensitive: only the canonical lower-case names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "log" => Ok(Severity::Log),
            "error" => Ok(Severity::Error),
            "warn" => Ok(Severity::Warn),
            "debug" => Ok(Severity::Debug),
            "verbose" => Ok(Severity::Verbose),
            _ => Err(LoggerError::invalid_severity(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for severity in Severity::ALL {
            let parsed: Severity = severity.to_str().parse().unwrap();
            assert_eq!(parsed, severity);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("LOG".parse::<Severity>().is_err());
        assert!("Warn".parse::<Severity>().is_err());
        assert!("info".parse::<Severity>().is_err());
    }

    #[test]
    fn test_full_trace_levels() {
        assert!(Severity::Error.wants_full_trace());
        assert!(Severity::Warn.wants_full_trace());
        assert!(!Severity::Log.wants_full_trace());
        assert!(!Severity::Debug.wants_full_trace());
        assert!(!Severity::Verbose.wants_full_trace());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Severity::Verbose).unwrap();
        assert_eq!(json, "\"verbose\"");
    }
}
