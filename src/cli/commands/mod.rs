//! Command implementations. Each command opens the store, runs one
//! operation, prints the result and drops the store.

pub mod completions;
pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod schema;
pub mod show;
pub mod stats;
pub mod update;

use crate::config::{self, ConfigLayer};
use crate::error::Result;
use crate::format::{TextFormatOptions, terminal_width};
use crate::model::{Severity, Status};
use std::io::IsTerminal;
use std::str::FromStr;

/// Text options from config: color per `color` setting, truncation only on a TTY.
pub(crate) fn text_options(layer: &ConfigLayer) -> TextFormatOptions {
    let max_width = if std::io::stdout().is_terminal() {
        Some(terminal_width())
    } else {
        None
    };
    TextFormatOptions {
        use_color: config::should_use_color(layer),
        max_width,
    }
}

pub(crate) fn parse_severity(value: Option<&str>) -> Result<Option<Severity>> {
    value.map(Severity::from_str).transpose()
}

pub(crate) fn parse_status(value: Option<&str>) -> Result<Option<Status>> {
    value.map(Status::from_str).transpose()
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json_output = serde_json::to_string_pretty(value)?;
    println!("{json_output}");
    Ok(())
}
