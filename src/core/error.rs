//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Severity name outside the five recognized levels
    #[error("Invalid log severity: '{value}' (expected one of log, error, warn, debug, verbose)")]
    InvalidSeverity { value: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an invalid severity error
    pub fn invalid_severity(value: impl Into<String>) -> Self {
        LoggerError::InvalidSeverity {
            value: value.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
