//! Transport and retry configuration for service clients

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Where a service client connects to
///
/// # Example
///
/// ```
/// use rust_service_logger::connection::TransportConfig;
///
/// let transport = TransportConfig::new("broker.internal", 6380)
///     .with_option("db", "2");
/// assert_eq!(transport.address(), "broker.internal:6380");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl TransportConfig {
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    pub const DEFAULT_PORT: u16 = 6379;

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            options: BTreeMap::new(),
        }
    }

    /// Read `<PREFIX>_HOST` and `<PREFIX>_PORT`.
    ///
    /// Missing values use the defaults; an unparsable port is reported on
    /// stderr and replaced by the default.
    pub fn from_env(prefix: &str) -> Self {
        dotenvy::dotenv().ok();

        let host = std::env::var(format!("{}_HOST", prefix))
            .ok()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_HOST.to_string());

        let port = match std::env::var(format!("{}_PORT", prefix)) {
            Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
                eprintln!(
                    "[LOGGER WARNING] Invalid {}_PORT '{}', using {}",
                    prefix,
                    raw,
                    Self::DEFAULT_PORT
                );
                Self::DEFAULT_PORT
            }),
            Err(_) => Self::DEFAULT_PORT,
        };

        Self::new(host, port)
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST, Self::DEFAULT_PORT)
    }
}

/// How often and how fast `acquire` retries
///
/// The default retries immediately and without limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Failed attempts allowed before giving up; `None` never gives up
    pub max_attempts: Option<u32>,
    /// Pause before each rebuild
    pub backoff: Duration,
}

impl RetryPolicy {
    pub const fn unbounded() -> Self {
        Self {
            max_attempts: None,
            backoff: Duration::ZERO,
        }
    }

    pub const fn bounded(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            backoff,
        }
    }

    pub fn is_exhausted(&self, failed_attempts: u32) -> bool {
        self.max_attempts
            .is_some_and(|max| failed_attempts >= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}
