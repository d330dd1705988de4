use crate::model::Defect;
use crate::stats::{Breakdown, Summary};
use serde::Serialize;

/// Defect with derived presentation fields for the show view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefectDetails<'a> {
    #[serde(flatten)]
    pub defect: &'a Defect,
    /// Non-blank, trimmed reproduction steps.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub step_list: Vec<String>,
    /// Saved at least once after creation.
    pub edited: bool,
}

impl<'a> DefectDetails<'a> {
    #[must_use]
    pub fn new(defect: &'a Defect) -> Self {
        Self {
            defect,
            step_list: super::format_steps(defect.steps.as_deref()),
            edited: defect.was_edited(),
        }
    }
}

/// Aggregate statistics for the stats view.
#[derive(Debug, Clone, Serialize)]
pub struct StatsOutput {
    pub summary: Summary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdowns: Vec<Breakdown>,
}

/// Outcome of a (possibly multi-id) delete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeleteResult {
    pub deleted: Vec<String>,
    /// IDs the user chose not to delete at the prompt.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub declined: Vec<String>,
}
