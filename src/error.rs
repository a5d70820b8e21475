//! Error types for oceanwatch.
//!
//! The simulation rules themselves are total functions and never fail.
//! Errors only arise at the edges: loading configuration, parsing
//! manual-override input, writing output, driving the terminal.

use thiserror::Error;

/// Result type alias for oceanwatch operations.
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Unified error type for all oceanwatch operations.
#[derive(Debug, Error)]
pub enum MonitorError {
    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Schema validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== Input Errors =====
    /// A manual-override value was missing or not a finite number.
    #[error("Invalid override for {field}: {reason}")]
    InvalidOverride {
        /// Name of the offending input field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Terminal backend error.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl MonitorError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an override rejection for the named field.
    #[must_use]
    pub fn invalid_override(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOverride {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create a terminal error.
    #[must_use]
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal(message.into())
    }

    /// Create an I/O error with a message (wraps in `std::io::Error`).
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::other(message.into()))
    }

    /// Whether the error came from user input rather than the environment.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidOverride { .. } | Self::Config { .. } | Self::Validation(_)
        )
    }
}

impl From<serde_json::Error> for MonitorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config() {
        let err = MonitorError::config("invalid parameter");
        assert!(err.is_input_error());
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_invalid_override() {
        let err = MonitorError::invalid_override("temperature", "not a number");
        assert!(err.is_input_error());
        assert_eq!(
            err.to_string(),
            "Invalid override for temperature: not a number"
        );
    }

    #[test]
    fn test_error_serialization() {
        let err = MonitorError::serialization("failed to serialize");
        assert!(!err.is_input_error());
        let msg = err.to_string();
        assert!(msg.contains("Serialization error"));
        assert!(msg.contains("failed to serialize"));
    }

    #[test]
    fn test_error_terminal() {
        let err = MonitorError::terminal("raw mode unavailable");
        assert!(err.to_string().contains("Terminal error"));
    }

    #[test]
    fn test_error_io() {
        let err = MonitorError::io("file not found");
        assert!(!err.is_input_error());
        let msg = err.to_string();
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_error_from_yaml() {
        let yaml_err = serde_yaml::from_str::<u32>("not: [valid").unwrap_err();
        let err: MonitorError = yaml_err.into();
        assert!(err.to_string().contains("YAML parsing error"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<u32>("{").unwrap_err();
        let err: MonitorError = json_err.into();
        assert!(matches!(err, MonitorError::Serialization(_)));
    }

    #[test]
    fn test_error_debug() {
        let err = MonitorError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
