//! Error types and handling for `defect_tracker`.
//!
//! # Design
//!
//! - Uses `thiserror` for derive-based error types
//! - Validation and not-found failures never touch persisted state
//! - Corrupt stored data is recovered by the store, never fatal
//! - Storage write failures are surfaced to the caller as-is
//! - Provides structured JSON output for scripted callers

mod structured;

pub use structured::{ErrorCode, StructuredError};

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for `defect_tracker` operations.
#[derive(Error, Debug)]
pub enum DefectError {
    // === Record Errors ===
    /// Defect with the specified ID was not found.
    #[error("Defect not found: {id}")]
    NotFound { id: String },

    /// A user-typed ID matches more than one defect.
    #[error("Ambiguous ID '{input}': matches {matches:?}")]
    AmbiguousId { input: String, matches: Vec<String> },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid severity value.
    #[error("Invalid severity: {severity}")]
    InvalidSeverity { severity: String },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    // === Persistence Errors ===
    /// Stored data under `key` could not be parsed.
    #[error("Corrupt stored state under '{key}': {reason}")]
    CorruptState { key: String, reason: String },

    /// The backing key-value store rejected a read or write.
    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// `SQLite` error from the key-value backend.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Workspace not initialized.
    #[error("Defect tracker not initialized: run 'dt init' first")]
    NotInitialized,

    /// Already initialized.
    #[error("Already initialized at '{path}'")]
    AlreadyInitialized { path: PathBuf },

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// The reason for the validation failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl DefectError {
    /// Can the user fix this without code changes?
    #[must_use]
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotInitialized
                | Self::NotFound { .. }
                | Self::AmbiguousId { .. }
                | Self::Validation { .. }
                | Self::ValidationErrors { .. }
                | Self::InvalidSeverity { .. }
                | Self::InvalidStatus { .. }
        )
    }

    /// True for the validation class of errors (no state was changed).
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::ValidationErrors { .. }
                | Self::InvalidSeverity { .. }
                | Self::InvalidStatus { .. }
        )
    }

    /// Human-friendly suggestion for fixing this error.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run: dt init"),
            Self::NotFound { .. } => Some("Run 'dt list' to see available defects"),
            Self::AmbiguousId { .. } => Some("Provide more characters of the ID"),
            Self::AlreadyInitialized { .. } => Some("Use --force to reinitialize"),
            Self::InvalidSeverity { .. } => {
                Some("Valid severities: critical, major, minor, trivial")
            }
            Self::InvalidStatus { .. } => {
                Some("Valid statuses: open, in-progress, resolved, closed")
            }
            Self::StorageUnavailable { .. } => {
                Some("Check free space and permissions of the .defects directory, then retry")
            }
            _ => None,
        }
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage-unavailable error from any displayable cause.
    #[must_use]
    pub fn storage(reason: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Create from multiple validation errors.
    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }
}

/// Result type using `DefectError`.
pub type Result<T> = std::result::Result<T, DefectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DefectError::NotFound {
            id: "DEF-1-abc".to_string(),
        };
        assert_eq!(err.to_string(), "Defect not found: DEF-1-abc");
    }

    #[test]
    fn test_validation_error() {
        let err = DefectError::validation("title", "cannot be empty");
        assert_eq!(err.to_string(), "Validation failed: title: cannot be empty");
        assert!(err.is_validation());
    }

    #[test]
    fn test_user_recoverable() {
        assert!(DefectError::NotInitialized.is_user_recoverable());
        assert!(!DefectError::storage("quota exceeded").is_user_recoverable());
    }

    #[test]
    fn test_suggestion() {
        assert_eq!(
            DefectError::NotInitialized.suggestion(),
            Some("Run: dt init")
        );
        let err = DefectError::InvalidSeverity {
            severity: "urgent".to_string(),
        };
        assert_eq!(
            err.suggestion(),
            Some("Valid severities: critical, major, minor, trivial")
        );
    }

    #[test]
    fn test_from_validation_errors_collapses_single() {
        let err =
            DefectError::from_validation_errors(vec![ValidationError::new("title", "too long")]);
        assert!(matches!(err, DefectError::Validation { ref field, .. } if field == "title"));

        let err = DefectError::from_validation_errors(vec![
            ValidationError::new("title", "cannot be empty"),
            ValidationError::new("description", "cannot be empty"),
        ]);
        assert!(matches!(err, DefectError::ValidationErrors { ref errors } if errors.len() == 2));
    }
}
