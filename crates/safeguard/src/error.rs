//! Error types for safeguard

use thiserror::Error;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors, raised while loading settings at startup.
///
/// Observation never produces a `ConfigError`: a value that would be invalid is
/// rejected before a monitor can be built from it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A boolean flag could not be parsed.
    #[error("invalid boolean for {var}: {value:?} (expected true/false)")]
    InvalidFlag { var: String, value: String },

    /// A threshold is not an integer number of milliseconds.
    #[error("invalid threshold for {var}: {value:?} (expected non-negative milliseconds)")]
    InvalidThreshold { var: String, value: String },

    /// A threshold is negative.
    #[error("threshold for {var} must not be negative, got {value}")]
    NegativeThreshold { var: String, value: i64 },
}

impl ConfigError {
    /// Name of the setting that failed to load.
    pub fn var(&self) -> &str {
        match self {
            Self::InvalidFlag { var, .. }
            | Self::InvalidThreshold { var, .. }
            | Self::NegativeThreshold { var, .. } => var,
        }
    }
}

/// Errors reported by a [`WarningSink`](crate::sink::WarningSink).
///
/// The monitor logs and discards these; they never reach the measured operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The sink's buffer is full and the warning was dropped.
    #[error("warning queue is full")]
    QueueFull,

    /// The sink no longer accepts warnings.
    #[error("warning sink is closed")]
    Closed,

    /// Any other sink failure.
    #[error("{0}")]
    Other(String),
}

impl SinkError {
    /// Create an `Other` error from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_names_the_variable() {
        let err = ConfigError::InvalidThreshold {
            var: "REQUEST_THRESHOLD".to_string(),
            value: "fast".to_string(),
        };
        assert_eq!(err.var(), "REQUEST_THRESHOLD");
        assert!(err.to_string().contains("REQUEST_THRESHOLD"));
        assert!(err.to_string().contains("\"fast\""));

        let err = ConfigError::NegativeThreshold {
            var: "COMMAND_THRESHOLD".to_string(),
            value: -5,
        };
        assert_eq!(
            err.to_string(),
            "threshold for COMMAND_THRESHOLD must not be negative, got -5"
        );
    }

    #[test]
    fn sink_error_display() {
        assert_eq!(SinkError::QueueFull.to_string(), "warning queue is full");
        assert_eq!(SinkError::Closed.to_string(), "warning sink is closed");
        assert_eq!(SinkError::other("disk full").to_string(), "disk full");
    }
}
