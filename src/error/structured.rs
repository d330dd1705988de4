//! Structured error output for scripted callers.
//!
//! Provides machine-parseable error information with:
//! - Error codes for categorization
//! - Hints for self-correction
//! - Retryability flags
//! - Context for debugging
//!
//! Severity and status typos are mapped to the closest valid value
//! (`"blocker"` -> `critical`, `"wip"` -> `in-progress`) so the hint can
//! name the flag value the caller most likely meant.

#![allow(clippy::option_if_let_else)]

use crate::error::DefectError;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Machine-readable error codes.
///
/// These codes are stable and can be used for programmatic error handling.
/// Format: `SCREAMING_SNAKE_CASE` for easy parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // === Storage Errors (exit code 2) ===
    /// Backing key-value store rejected a read or write
    StorageUnavailable,
    /// Stored data could not be parsed
    CorruptState,
    /// `SQLite` operation failed
    DatabaseError,
    /// Workspace not initialized
    NotInitialized,
    /// Already initialized
    AlreadyInitialized,

    // === Record Errors (exit code 3) ===
    /// Defect with specified ID not found
    DefectNotFound,
    /// Partial ID matches multiple defects
    AmbiguousId,

    // === Validation Errors (exit code 4) ===
    /// Field validation failed
    ValidationFailed,
    /// Invalid severity value
    InvalidSeverity,
    /// Invalid status value
    InvalidStatus,

    // === Config Errors (exit code 7) ===
    /// Configuration error
    ConfigError,

    // === I/O Errors (exit code 8) ===
    /// File I/O error
    IoError,
    /// JSON serialization error
    JsonError,
    /// YAML parsing error
    YamlError,
}

impl ErrorCode {
    /// Get the string representation for JSON output.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StorageUnavailable => "STORAGE_UNAVAILABLE",
            Self::CorruptState => "CORRUPT_STATE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DefectNotFound => "DEFECT_NOT_FOUND",
            Self::AmbiguousId => "AMBIGUOUS_ID",
            Self::ValidationFailed => "VALIDATION_FAILED",
            Self::InvalidSeverity => "INVALID_SEVERITY",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::YamlError => "YAML_ERROR",
        }
    }

    /// Whether retrying with corrected input (or after a transient
    /// condition clears) can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable
                | Self::ValidationFailed
                | Self::InvalidSeverity
                | Self::InvalidStatus
                | Self::AmbiguousId
        )
    }

    /// Process exit code for this category.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::StorageUnavailable
            | Self::CorruptState
            | Self::DatabaseError
            | Self::NotInitialized
            | Self::AlreadyInitialized => 2,
            Self::DefectNotFound | Self::AmbiguousId => 3,
            Self::ValidationFailed | Self::InvalidSeverity | Self::InvalidStatus => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::YamlError => 8,
        }
    }
}

/// Error payload rendered to stderr by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl StructuredError {
    #[must_use]
    pub fn from_error(err: &DefectError) -> Self {
        let (code, context) = Self::extract_code_and_context(err);
        let hint = Self::generate_hint(err);

        Self {
            code,
            message: err.to_string(),
            hint,
            retryable: code.is_retryable(),
            context,
        }
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "error": {
                "code": self.code.as_str(),
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
                "context": self.context,
            }
        })
    }

    #[must_use]
    pub fn to_human(&self, color: bool) -> String {
        let mut output = String::new();

        if color {
            output.push_str("\x1b[31mError:\x1b[0m ");
        } else {
            output.push_str("Error: ");
        }

        output.push_str(&self.message);

        if let Some(hint) = &self.hint {
            output.push('\n');
            if color {
                output.push_str("\x1b[33mHint:\x1b[0m ");
            } else {
                output.push_str("Hint: ");
            }
            output.push_str(hint);
        }

        output
    }

    fn extract_code_and_context(err: &DefectError) -> (ErrorCode, Option<Value>) {
        match err {
            DefectError::NotFound { id } => {
                (ErrorCode::DefectNotFound, Some(json!({"searched_id": id})))
            }
            DefectError::AmbiguousId { input, matches } => (
                ErrorCode::AmbiguousId,
                Some(json!({"input": input, "matches": matches})),
            ),
            DefectError::Validation { field, reason } => (
                ErrorCode::ValidationFailed,
                Some(json!({"field": field, "reason": reason})),
            ),
            DefectError::ValidationErrors { errors } => (
                ErrorCode::ValidationFailed,
                Some(json!({
                    "errors": errors.iter()
                        .map(|e| json!({"field": e.field, "message": e.message}))
                        .collect::<Vec<_>>()
                })),
            ),
            DefectError::InvalidSeverity { severity } => (
                ErrorCode::InvalidSeverity,
                Some(json!({
                    "provided": severity,
                    "valid_values": VALID_SEVERITIES,
                })),
            ),
            DefectError::InvalidStatus { status } => (
                ErrorCode::InvalidStatus,
                Some(json!({
                    "provided": status,
                    "valid_values": VALID_STATUSES,
                })),
            ),
            DefectError::CorruptState { key, reason } => (
                ErrorCode::CorruptState,
                Some(json!({"key": key, "reason": reason})),
            ),
            DefectError::StorageUnavailable { reason } => (
                ErrorCode::StorageUnavailable,
                Some(json!({"reason": reason})),
            ),
            DefectError::Database(_) => (ErrorCode::DatabaseError, None),
            DefectError::NotInitialized => (ErrorCode::NotInitialized, None),
            DefectError::AlreadyInitialized { path } => (
                ErrorCode::AlreadyInitialized,
                Some(json!({"path": path.display().to_string()})),
            ),
            DefectError::Config(_) => (ErrorCode::ConfigError, None),
            DefectError::Io(_) => (ErrorCode::IoError, None),
            DefectError::Json(_) => (ErrorCode::JsonError, None),
            DefectError::Yaml(_) => (ErrorCode::YamlError, None),
        }
    }

    fn generate_hint(err: &DefectError) -> Option<String> {
        match err {
            DefectError::InvalidSeverity { severity } => {
                if let Some(detected) = detect_severity_intent(severity) {
                    Some(format!("Did you mean --severity {detected}?"))
                } else {
                    err.suggestion().map(str::to_string)
                }
            }
            DefectError::InvalidStatus { status } => {
                if let Some(detected) = detect_status_intent(status) {
                    Some(format!("Did you mean --status {detected}?"))
                } else {
                    err.suggestion().map(str::to_string)
                }
            }
            _ => err.suggestion().map(str::to_string),
        }
    }
}

const VALID_SEVERITIES: [&str; 4] = ["critical", "major", "minor", "trivial"];
const VALID_STATUSES: [&str; 4] = ["open", "in-progress", "resolved", "closed"];

static SEVERITY_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("blocker", "critical"),
        ("urgent", "critical"),
        ("crit", "critical"),
        ("p0", "critical"),
        ("high", "major"),
        ("serious", "major"),
        ("p1", "major"),
        ("medium", "minor"),
        ("normal", "minor"),
        ("low", "minor"),
        ("p2", "minor"),
        ("cosmetic", "trivial"),
        ("lowest", "trivial"),
        ("p3", "trivial"),
    ]
    .into_iter()
    .collect()
});

static STATUS_SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("new", "open"),
        ("todo", "open"),
        ("reopened", "open"),
        ("wip", "in-progress"),
        ("working", "in-progress"),
        ("active", "in-progress"),
        ("started", "in-progress"),
        ("fixed", "resolved"),
        ("done", "resolved"),
        ("complete", "resolved"),
        ("verified", "closed"),
        ("wontfix", "closed"),
        ("duplicate", "closed"),
    ]
    .into_iter()
    .collect()
});

// === Intent Detection ===

fn detect_severity_intent(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase();

    if let Some(&canonical) = SEVERITY_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    if lower.is_empty() {
        return None;
    }
    VALID_SEVERITIES
        .iter()
        .find(|severity| severity.starts_with(&lower))
        .copied()
}

fn detect_status_intent(input: &str) -> Option<&'static str> {
    let lower = input.trim().to_lowercase().replace(['_', ' '], "-");

    if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        return Some(canonical);
    }

    if lower.is_empty() {
        return None;
    }
    VALID_STATUSES
        .iter()
        .find(|status| status.starts_with(&lower))
        .copied()
}
