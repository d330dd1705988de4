//! Validation helpers for `defect_tracker`.
//!
//! These routines enforce the record constraints and return structured
//! validation errors without mutating storage. Field values are checked
//! after normalization (see [`DefectFields::normalized`]).

use crate::error::ValidationError;
use crate::model::{Defect, DefectFields};
use crate::util::is_valid_id_format;
use std::collections::HashSet;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 500;
/// Maximum description size in bytes.
pub const MAX_DESCRIPTION_BYTES: usize = 102_400;
/// Maximum steps-to-reproduce size in bytes.
pub const MAX_STEPS_BYTES: usize = 102_400;

/// Validates defect fields and records.
pub struct DefectValidator;

impl DefectValidator {
    /// Validate submitted fields and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_fields(fields: &DefectFields) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Title: required, max 500 chars.
        if fields.title.trim().is_empty() {
            errors.push(ValidationError::new("title", "cannot be empty"));
        }
        if fields.title.chars().count() > MAX_TITLE_CHARS {
            errors.push(ValidationError::new("title", "exceeds 500 characters"));
        }

        // Description: required, max 100KB.
        if fields.description.trim().is_empty() {
            errors.push(ValidationError::new("description", "cannot be empty"));
        }
        if fields.description.len() > MAX_DESCRIPTION_BYTES {
            errors.push(ValidationError::new("description", "exceeds 100KB"));
        }

        if let Some(steps) = fields.steps.as_ref() {
            if steps.len() > MAX_STEPS_BYTES {
                errors.push(ValidationError::new("steps", "exceeds 100KB"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate a stored record.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate(defect: &Defect) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if defect.id.trim().is_empty() {
            errors.push(ValidationError::new("id", "cannot be empty"));
        } else if !is_valid_id_format(&defect.id) {
            errors.push(ValidationError::new(
                "id",
                "invalid format (expected PREFIX-millis-suffix)",
            ));
        }

        if let Err(field_errors) = Self::validate_fields(&defect.fields()) {
            errors.extend(field_errors);
        }

        // Timestamps: created_at <= updated_at.
        if defect.updated_at < defect.created_at {
            errors.push(ValidationError::new(
                "updatedAt",
                "cannot be before createdAt",
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// IDs that occur more than once in a collection, in first-seen order.
    #[must_use]
    pub fn duplicate_ids(records: &[Defect]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for record in records {
            if !seen.insert(record.id.as_str()) && !duplicates.contains(&record.id) {
                duplicates.push(record.id.clone());
            }
        }
        duplicates
    }
}
