//! Text formatting functions for `defect_tracker`.
//!
//! Provides terminal formatting, colored when requested:
//! - Status icons (○ ◐ ✓ ●)
//! - Severity badges ([critical], [major], ...)
//! - One-line summaries for lists and full cards for `show`

use crate::model::{Defect, Severity, Status};
use chrono::{DateTime, Local, Utc};
use crossterm::style::Stylize;
use std::fmt::Write as _;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Status icon characters.
pub mod icons {
    /// Open - reported, nobody on it yet (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - being fixed (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Resolved - fix landed (checkmark).
    pub const RESOLVED: &str = "✓";
    /// Closed - done (filled circle).
    pub const CLOSED: &str = "●";
}

/// Heading shown when a list comes back empty.
pub const EMPTY_TITLE: &str = "No defects found";
/// Hint under [`EMPTY_TITLE`] when the collection itself is empty.
pub const EMPTY_HINT_ADD: &str = "Create your first defect with: dt create --title <TITLE> --description <TEXT>";
/// Hint under [`EMPTY_TITLE`] when filters hid everything.
pub const EMPTY_HINT_FILTERED: &str = "Try adjusting your filters or search query.";

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: &Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Resolved => icons::RESOLVED,
        Status::Closed => icons::CLOSED,
    }
}

/// Format status label with optional color.
#[must_use]
pub fn format_status_label(status: &Status, use_color: bool) -> String {
    let label = status.as_str();
    if !use_color {
        return label.to_string();
    }

    match status {
        Status::Open => label.blue().to_string(),
        Status::InProgress => label.yellow().to_string(),
        Status::Resolved => label.green().to_string(),
        Status::Closed => label.dark_grey().to_string(),
    }
}

/// Format status icon with optional color.
#[must_use]
pub fn format_status_icon_colored(status: &Status, use_color: bool) -> String {
    let icon = format_status_icon(status);
    if !use_color {
        return icon.to_string();
    }

    match status {
        Status::Open => icon.blue().to_string(),
        Status::InProgress => icon.yellow().to_string(),
        Status::Resolved => icon.green().to_string(),
        Status::Closed => icon.dark_grey().to_string(),
    }
}

/// Format severity label with optional color.
#[must_use]
pub fn format_severity_label(severity: &Severity, use_color: bool) -> String {
    let label = severity.as_str();
    if !use_color {
        return label.to_string();
    }

    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Major => label.red().to_string(),
        Severity::Minor => label.yellow().to_string(),
        Severity::Trivial => label.dark_grey().to_string(),
    }
}

/// Format severity as a bracketed badge.
#[must_use]
pub fn format_severity_badge(severity: &Severity, use_color: bool) -> String {
    format!("[{}]", format_severity_label(severity, use_color))
}

/// Split steps into trimmed, non-empty lines.
#[must_use]
pub fn format_steps(steps: Option<&str>) -> Vec<String> {
    steps
        .unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a timestamp as a local calendar date.
#[must_use]
pub fn format_date(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

/// Determine terminal width (falls back to 80).
///
/// `COLUMNS` wins when set, then the size reported by the terminal.
#[must_use]
pub fn terminal_width() -> usize {
    if let Some(value) = std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
    {
        return value;
    }
    crossterm::terminal::size()
        .ok()
        .map(|(columns, _)| usize::from(columns))
        .filter(|columns| *columns > 0)
        .unwrap_or(80)
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }

    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }

    if max_len <= 3 {
        return take_columns(title, max_len);
    }

    let mut truncated = take_columns(title, max_len - 3);
    truncated.push_str("...");
    truncated
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let cw = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + cw > columns {
            break;
        }
        used += cw;
        out.push(c);
    }
    out
}

/// Format a single-line defect summary with options.
///
/// Format: `{icon} {id} [{severity}] {title}` plus `@assignee` when set.
#[must_use]
pub fn format_defect_line_with(defect: &Defect, options: TextFormatOptions) -> String {
    let badge_plain = format_severity_badge(&defect.severity, false);
    let assignee_suffix = defect
        .assignee
        .as_deref()
        .map(|assignee| format!(" @{assignee}"))
        .unwrap_or_default();

    let reserved = UnicodeWidthStr::width(format_status_icon(&defect.status))
        + 1
        + UnicodeWidthStr::width(defect.id.as_str())
        + 1
        + UnicodeWidthStr::width(badge_plain.as_str())
        + 1
        + UnicodeWidthStr::width(assignee_suffix.as_str());

    let title = options.max_width.map_or_else(
        || defect.title.clone(),
        |width| truncate_title(&defect.title, width.saturating_sub(reserved)),
    );

    let icon = format_status_icon_colored(&defect.status, options.use_color);
    let badge = format_severity_badge(&defect.severity, options.use_color);

    format!("{icon} {} {badge} {title}{assignee_suffix}", defect.id)
}

/// Format a single-line defect summary without color or truncation.
#[must_use]
pub fn format_defect_line(defect: &Defect) -> String {
    format_defect_line_with(defect, TextFormatOptions::plain())
}

/// Format the full card shown by `show`.
///
/// The updated date only appears once the record has been edited.
#[must_use]
pub fn format_defect_card(defect: &Defect, options: TextFormatOptions) -> String {
    let use_color = options.use_color;
    let mut out = String::new();

    let title = if use_color {
        defect.title.as_str().bold().to_string()
    } else {
        defect.title.clone()
    };
    let _ = writeln!(out, "{} {title}", defect.id);
    let _ = writeln!(
        out,
        "{} {}",
        format_severity_badge(&defect.severity, use_color),
        format_status_label(&defect.status, use_color)
    );

    let _ = writeln!(out, "Environment: {}", defect.environment);
    if let Some(assignee) = &defect.assignee {
        let _ = writeln!(out, "Assignee:    {assignee}");
    }
    if let Some(url) = &defect.url {
        let _ = writeln!(out, "URL:         {url}");
    }
    let _ = writeln!(out, "Created:     {}", format_date(&defect.created_at));
    if defect.was_edited() {
        let _ = writeln!(out, "Updated:     {}", format_date(&defect.updated_at));
    }

    out.push('\n');
    for line in defect.description.lines() {
        let _ = writeln!(out, "  {line}");
    }

    let steps = format_steps(defect.steps.as_deref());
    if !steps.is_empty() {
        out.push_str("\nSteps to reproduce:\n");
        for (n, step) in steps.iter().enumerate() {
            let _ = writeln!(out, "  {}. {step}", n + 1);
        }
    }

    out
}

/// Heading and hint for an empty list. `filtered` is true when records
/// exist but none matched.
#[must_use]
pub const fn empty_state_message(filtered: bool) -> (&'static str, &'static str) {
    if filtered {
        (EMPTY_TITLE, EMPTY_HINT_FILTERED)
    } else {
        (EMPTY_TITLE, EMPTY_HINT_ADD)
    }
}
