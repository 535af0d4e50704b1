//! Error handling module for labcheck
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Component errors (`StoreError`, `ResolutionError`, `WizardError`) convert
//! into `LabCheckError` at the application boundary.

use thiserror::Error;

/// Main error type for labcheck
#[derive(Error, Debug)]
pub enum LabCheckError {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors (loading, parsing, validation, option lists).
    /// Fatal at startup: no session is started after one of these.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors (placeholder or unknown selections)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Availability lookup failures (store unreachable, query failed, timeout)
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Wizard transition errors (action not available in the current state)
    #[error("Wizard error: {0}")]
    Wizard(String),

    /// Data import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite errors outside the lookup path (import, schema setup)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Result type alias for labcheck operations
pub type Result<T> = std::result::Result<T, LabCheckError>;

// Convenient error constructors
impl LabCheckError {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Returns true for errors that must halt the program before any session starts
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::Terminal(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LabCheckError::configuration("no rooms in schedule");
        assert_eq!(err.to_string(), "Configuration error: no rooms in schedule");

        let err = LabCheckError::validation("day not selected");
        assert_eq!(err.to_string(), "Validation error: day not selected");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LabCheckError = io_err.into();
        assert!(matches!(err, LabCheckError::Io(_)));
    }

    #[test]
    fn test_fatal_errors() {
        assert!(LabCheckError::configuration("empty").is_fatal());
        assert!(!LabCheckError::validation("placeholder").is_fatal());
        assert!(!LabCheckError::resolution("timeout").is_fatal());
    }
}
