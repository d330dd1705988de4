//! List command implementation.
//!
//! Applies the status, severity and search filters and prints the
//! matching defects in stored order (newest first).

use crate::cli::ListArgs;
use crate::cli::commands::{print_json, text_options};
use crate::config;
use crate::error::Result;
use crate::format::{empty_state_message, format_defect_line_with};
use crate::query::{Criteria, filter};
use crate::stats::summarize;
use tracing::debug;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if a filter value is invalid or the workspace cannot
/// be opened.
pub fn execute(args: &ListArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let criteria = build_criteria(args)?;
    let opened = config::open_store_with_cli(cli)?;
    let records = opened.store.records();

    let matched = filter(records, &criteria);
    debug!(total = records.len(), matched = matched.len(), ?criteria, "Filtered defects");

    if json {
        return print_json(&matched);
    }

    if matched.is_empty() {
        let (title, hint) = empty_state_message(!records.is_empty());
        println!("{title}");
        println!("{hint}");
    } else {
        let options = text_options(&opened.layer);
        for defect in &matched {
            println!("{}", format_defect_line_with(defect, options));
        }
        println!("\n{} of {} defect(s)", matched.len(), records.len());
    }

    if args.summary {
        let summary = summarize(records);
        println!(
            "Total: {}  Critical: {}  Open: {}  Resolved: {}",
            summary.total, summary.critical, summary.open, summary.resolved
        );
    }

    Ok(())
}

/// Convert CLI args to filter criteria.
///
/// # Errors
///
/// Returns `InvalidStatus`/`InvalidSeverity` for unknown filter values.
pub fn build_criteria(args: &ListArgs) -> Result<Criteria> {
    Ok(Criteria {
        status: args.status.parse()?,
        severity: args.severity.parse()?,
        search_text: args.search.clone(),
    })
}
