//! Core data types for `defect_tracker`.
//!
//! This module defines the fundamental types used throughout the application:
//! - `Defect` - The tracked record, exactly as persisted
//! - `Severity` - Impact classification
//! - `Status` - Workflow state
//! - `DefectFields` - Raw form values for create/update
//! - `DefectPatch` - Partial edit merged over an existing record

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DefectError;

/// Environment recorded when the caller leaves the field blank.
pub const DEFAULT_ENVIRONMENT: &str = "production";

fn default_environment() -> String {
    DEFAULT_ENVIRONMENT.to_string()
}

/// Treat `""` the same as a missing optional field.
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn environment_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default_environment))
}

/// Defect severity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Trivial,
}

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Self; 4] = [Self::Critical, Self::Major, Self::Minor, Self::Trivial];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Trivial => "trivial",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DefectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Self::Critical),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "trivial" => Ok(Self::Trivial),
            _ => Err(DefectError::InvalidSeverity {
                severity: s.to_string(),
            }),
        }
    }
}

/// Defect workflow status.
///
/// Any status may move to any other; there is no transition graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    /// All statuses in workflow order.
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Resolved, Self::Closed];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    /// Resolved and closed both count as done work.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved | Self::Closed)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Status {
    type Err = DefectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in-progress" | "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DefectError::InvalidStatus {
                status: s.to_string(),
            }),
        }
    }
}

/// A tracked defect, in persisted form.
///
/// Optional text fields are `None` rather than empty and are omitted
/// from the serialized record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Defect {
    /// Unique ID (e.g., "DEF-1718000000000-k3j9x0a2b").
    pub id: String,

    /// Short summary.
    pub title: String,

    pub severity: Severity,

    pub status: Status,

    /// Person responsible for the fix.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    #[schemars(with = "Option<String>")]
    pub assignee: Option<String>,

    /// Where the defect was observed.
    #[serde(
        default = "default_environment",
        deserialize_with = "environment_or_default"
    )]
    #[schemars(with = "String")]
    pub environment: String,

    /// What goes wrong.
    pub description: String,

    /// Steps to reproduce, one per line.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    #[schemars(with = "Option<String>")]
    pub steps: Option<String>,

    /// Page or endpoint where the defect shows up.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    #[schemars(with = "Option<String>")]
    pub url: Option<String>,

    /// Creation timestamp; never changed by edits.
    pub created_at: DateTime<Utc>,

    /// Last save timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Defect {
    /// Build a record from already-normalized fields.
    #[must_use]
    pub fn from_fields(
        id: String,
        fields: DefectFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: fields.title,
            severity: fields.severity,
            status: fields.status,
            assignee: fields.assignee,
            environment: fields
                .environment
                .unwrap_or_else(default_environment),
            description: fields.description,
            steps: fields.steps,
            url: fields.url,
            created_at,
            updated_at,
        }
    }

    /// The editable fields of this record.
    #[must_use]
    pub fn fields(&self) -> DefectFields {
        DefectFields {
            title: self.title.clone(),
            description: self.description.clone(),
            severity: self.severity,
            status: self.status,
            assignee: self.assignee.clone(),
            environment: Some(self.environment.clone()),
            steps: self.steps.clone(),
            url: self.url.clone(),
        }
    }

    /// True once the record has been saved after creation.
    #[must_use]
    pub fn was_edited(&self) -> bool {
        self.updated_at != self.created_at
    }
}

/// Field values supplied by the presentation layer on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefectFields {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub status: Status,
    pub assignee: Option<String>,
    /// `None` (or blank) falls back to [`DEFAULT_ENVIRONMENT`].
    pub environment: Option<String>,
    pub steps: Option<String>,
    pub url: Option<String>,
}

impl DefectFields {
    /// Minimal field set; everything optional left blank.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        status: Status,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            status,
            assignee: None,
            environment: None,
            steps: None,
            url: None,
        }
    }

    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    #[must_use]
    pub fn with_steps(mut self, steps: impl Into<String>) -> Self {
        self.steps = Some(steps.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Trim every text field and collapse blank optionals to `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            severity: self.severity,
            status: self.status,
            assignee: trimmed_non_empty(self.assignee),
            environment: trimmed_non_empty(self.environment),
            steps: trimmed_non_empty(self.steps),
            url: trimmed_non_empty(self.url),
        }
    }
}

fn trimmed_non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// A partial edit. `None` keeps the current value; for optional text
/// fields `Some("")` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub status: Option<Status>,
    pub assignee: Option<String>,
    pub environment: Option<String>,
    pub steps: Option<String>,
    pub url: Option<String>,
}

impl DefectPatch {
    /// True if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.status.is_none()
            && self.assignee.is_none()
            && self.environment.is_none()
            && self.steps.is_none()
            && self.url.is_none()
    }

    /// Merge over an existing record, producing the full field set an
    /// edit form would submit.
    #[must_use]
    pub fn apply_to(&self, existing: &Defect) -> DefectFields {
        let mut fields = existing.fields();
        if let Some(title) = &self.title {
            fields.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            fields.description.clone_from(description);
        }
        if let Some(severity) = self.severity {
            fields.severity = severity;
        }
        if let Some(status) = self.status {
            fields.status = status;
        }
        if let Some(assignee) = &self.assignee {
            fields.assignee = Some(assignee.clone());
        }
        if let Some(environment) = &self.environment {
            fields.environment = Some(environment.clone());
        }
        if let Some(steps) = &self.steps {
            fields.steps = Some(steps.clone());
        }
        if let Some(url) = &self.url {
            fields.url = Some(url.clone());
        }
        fields
    }
}
