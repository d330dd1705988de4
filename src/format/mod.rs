//! Output formatting for `defect_tracker`.
//!
//! Human-readable text for terminals and machine-parseable JSON. JSON
//! output goes to stdout; diagnostics go to stderr.
//!
//! # Output Types
//!
//! - [`DefectDetails`] - Defect with derived fields (show)
//! - [`StatsOutput`] - Summary plus optional breakdowns (stats)
//! - [`DeleteResult`] - Deleted and declined IDs (delete)

mod output;
mod text;

pub use output::{DefectDetails, DeleteResult, StatsOutput};
pub use text::{
    TextFormatOptions, empty_state_message, format_date, format_defect_card, format_defect_line,
    format_defect_line_with, format_severity_badge, format_severity_label, format_status_icon,
    format_status_icon_colored, format_status_label, format_steps, terminal_width,
    truncate_title,
};
