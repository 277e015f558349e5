//! Error types for the intent engine.
//!
//! Errors only surface at two points: when a configuration is constructed
//! or loaded, and when a caller-supplied [`PrefetchSink`](super::PrefetchSink)
//! fails. Motion samples and target geometry never produce errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A numeric option is NaN or infinite.
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    /// A numeric option that must be non-negative is negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    /// A numeric option that must be strictly positive is zero or negative.
    #[error("{field} must be greater than zero (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    /// Failed to read or write the configuration file.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid INI.
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// A configuration value could not be parsed for its key.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// The key does not name a known configuration setting.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// No platform configuration directory could be determined.
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

/// Error returned by a [`PrefetchSink`](super::PrefetchSink).
///
/// The engine marks the target done before calling the sink, so a failing
/// sink never causes a retrigger. The error is handed back to whoever fed
/// the motion sample.
#[derive(Debug, Error)]
#[error("prefetch sink failed: {0}")]
pub struct SinkError(#[source] Box<dyn std::error::Error + Send + Sync>);

impl SinkError {
    /// Create a sink error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self(message.into())
    }

    /// Borrow the underlying error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for SinkError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        Self(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Negative {
            field: "min_speed",
            value: -1.0,
        };
        assert!(err.to_string().contains("min_speed"));
        assert!(err.to_string().contains("-1"));
    }

    #[test]
    fn test_sink_error_from_message() {
        let err = SinkError::new("network down");
        assert_eq!(err.to_string(), "prefetch sink failed: network down");
        assert_eq!(err.inner().to_string(), "network down");
    }

    #[test]
    fn test_sink_error_from_boxed_error() {
        let io = std::io::Error::other("boom");
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(io);
        let err: SinkError = boxed.into();
        assert!(err.to_string().contains("boom"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
