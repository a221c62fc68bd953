//! Timestamp formatting utilities
//!
//! Console lines default to the en-US locale layout
//! (`10/19/2026, 3:04:05 PM`) in local time. ISO 8601, RFC 3339 and custom
//! strftime layouts are available for embedders that need something else.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Timestamp layout options for console lines
///
/// # Examples
///
/// ```
/// use rust_service_logger::core::TimestampFormat;
/// use chrono::Local;
///
/// let stamp = TimestampFormat::Locale.format(&Local::now());
/// assert!(stamp.ends_with("AM") || stamp.ends_with("PM"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Locale date and time: `10/19/2026, 3:04:05 PM`
    ///
    /// Four-digit year, two-digit day and month, numeric hour/minute/second.
    #[default]
    Locale,

    /// ISO 8601 with milliseconds: `2026-10-19T15:04:05.123+02:00`
    Iso8601,

    /// RFC 3339 format: `2026-10-19T15:04:05+02:00`
    Rfc3339,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_service_logger::core::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp according to this layout
    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            TimestampFormat::Locale => datetime.format("%m/%d/%Y, %-I:%M:%S %p").to_string(),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// Format the current local time
    #[must_use]
    pub fn now(&self) -> String {
        self.format(&Local::now())
    }
}
