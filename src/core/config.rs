//! Logger configuration
//!
//! Configuration is read once per process from the environment (after loading
//! a `.env` file, when present):
//!
//! | Variable            | Meaning                                            |
//! |---------------------|----------------------------------------------------|
//! | `LOG_LEVELS_IGNORE` | Comma-separated severities to suppress entirely    |
//! | `LOG_PROCESS_NAME`  | Process name shown in the line prefix              |
//! | `LOG_CALL_SITES`    | `false` disables stack capture for call sites      |

use super::error::{LoggerError, Result};
use super::severity::Severity;
use super::timestamp::TimestampFormat;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;

pub const LOG_LEVELS_IGNORE_ENV: &str = "LOG_LEVELS_IGNORE";
pub const LOG_PROCESS_NAME_ENV: &str = "LOG_PROCESS_NAME";
pub const LOG_CALL_SITES_ENV: &str = "LOG_CALL_SITES";

const DEFAULT_PROCESS_NAME: &str = "Service";

static GLOBAL_CONFIG: Lazy<Arc<LoggerConfig>> = Lazy::new(|| {
    dotenvy::dotenv().ok();
    Arc::new(LoggerConfig::from_env())
});

/// Severities that are suppressed before any formatting work happens
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludedLevelSet {
    levels: HashSet<Severity>,
}

impl ExcludedLevelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"debug, verbose"`.
    ///
    /// Names are trimmed and matched case-sensitively; empty entries are
    /// skipped. Unknown names fail the whole parse.
    pub fn parse(list: &str) -> Result<Self> {
        let mut levels = HashSet::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let severity = name.parse::<Severity>().map_err(|_| {
                LoggerError::config(LOG_LEVELS_IGNORE_ENV, format!("unknown level '{}'", name))
            })?;
            levels.insert(severity);
        }
        Ok(Self { levels })
    }

    /// Like [`parse`](Self::parse), but unknown names are reported on stderr
    /// and skipped.
    pub fn parse_lenient(list: &str) -> Self {
        let mut levels = HashSet::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.parse::<Severity>() {
                Ok(severity) => {
                    levels.insert(severity);
                }
                Err(_) => eprintln!(
                    "[LOGGER WARNING] Ignoring unknown level '{}' in {}",
                    name, LOG_LEVELS_IGNORE_ENV
                ),
            }
        }
        Self { levels }
    }

    pub fn from_env() -> Self {
        std::env::var(LOG_LEVELS_IGNORE_ENV)
            .map(|list| Self::parse_lenient(&list))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn with(mut self, severity: Severity) -> Self {
        self.levels.insert(severity);
        self
    }

    #[inline]
    pub fn contains(&self, severity: Severity) -> bool {
        self.levels.contains(&severity)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<Severity> for ExcludedLevelSet {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub excluded_levels: ExcludedLevelSet,
    pub use_colors: bool,
    pub capture_call_sites: bool,
    pub timestamp_format: TimestampFormat,
    pub process_name: String,
}

impl LoggerConfig {
    /// The process-wide configuration, read from the environment on first use
    pub fn global() -> Arc<LoggerConfig> {
        Arc::clone(&GLOBAL_CONFIG)
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let process_name = std::env::var(LOG_PROCESS_NAME_ENV)
            .ok()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(defaults.process_name);

        let capture_call_sites = std::env::var(LOG_CALL_SITES_ENV)
            .map(|value| !matches!(value.trim(), "false" | "0" | "off"))
            .unwrap_or(defaults.capture_call_sites);

        Self {
            excluded_levels: ExcludedLevelSet::from_env(),
            process_name,
            capture_call_sites,
            ..defaults
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            excluded_levels: ExcludedLevelSet::default(),
            use_colors: true,
            capture_call_sites: true,
            timestamp_format: TimestampFormat::default(),
            process_name: default_process_name(),
        }
    }
}

/// Executable name, or a generic label when it cannot be determined
fn default_process_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_PROCESS_NAME.to_string())
}
