//! Domain error types
//!
//! This module defines the error hierarchy for Chainsink. All errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Chainsink error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Database-related errors (connection, statement execution, catalog lookups)
    #[error("Database error: {0}")]
    Database(String),

    /// Item conversion errors raised by an item converter
    #[error("Conversion error: {0}")]
    Conversion(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Export process errors not tied to a single insert task
    #[error("Export error: {0}")]
    Export(String),

    /// One or more insert tasks (or conversions) of an export call failed.
    ///
    /// All sibling tasks ran to completion before this was reported; chunks
    /// that succeeded stay committed.
    #[error("Export failed: {failed_tasks}/{total_tasks} task(s) failed, first failure: {first}")]
    ExportFailed {
        /// Number of failed tasks, counting each failed conversion as one
        failed_tasks: usize,
        /// Number of tasks the call attempted
        total_tasks: usize,
        /// The first failure observed
        first: Box<SinkError>,
    },

    /// The worker pool was shut down; the exporter cannot be reused
    #[error("Worker pool is closed")]
    PoolClosed,
}

impl SinkError {
    /// Returns the first underlying failure for aggregated export errors
    pub fn root(&self) -> &SinkError {
        match self {
            SinkError::ExportFailed { first, .. } => first.root(),
            other => other,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SinkError {
    fn from(err: serde_json::Error) -> Self {
        SinkError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SinkError {
    fn from(err: toml::de::Error) -> Self {
        SinkError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_error_display() {
        let err = SinkError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_export_failed_display_includes_first_failure() {
        let err = SinkError::ExportFailed {
            failed_tasks: 2,
            total_tasks: 5,
            first: Box::new(SinkError::Database("connection refused".to_string())),
        };
        let message = err.to_string();
        assert!(message.contains("2/5"));
        assert!(message.contains("connection refused"));
    }

    #[test]
    fn test_root_unwraps_export_failed() {
        let err = SinkError::ExportFailed {
            failed_tasks: 1,
            total_tasks: 1,
            first: Box::new(SinkError::Conversion("bad field".to_string())),
        };
        assert!(matches!(err.root(), SinkError::Conversion(_)));

        let plain = SinkError::PoolClosed;
        assert!(matches!(plain.root(), SinkError::PoolClosed));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SinkError = io_err.into();
        assert!(matches!(err, SinkError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SinkError = json_err.into();
        assert!(matches!(err, SinkError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SinkError = toml_err.into();
        assert!(matches!(err, SinkError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
