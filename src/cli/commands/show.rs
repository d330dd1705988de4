use crate::cli::commands::{print_json, text_options};
use crate::config;
use crate::error::{DefectError, Result};
use crate::format::{DefectDetails, format_defect_card};

/// Execute the show command.
///
/// # Errors
///
/// Returns an error if the ID does not resolve or the workspace cannot
/// be opened.
pub fn execute(id: &str, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let opened = config::open_store_with_cli(cli)?;
    let id = opened.store.resolve_id(id)?;
    let defect = opened
        .store
        .get(&id)
        .ok_or_else(|| DefectError::NotFound { id: id.clone() })?;

    if json {
        print_json(&DefectDetails::new(defect))?;
    } else {
        print!("{}", format_defect_card(defect, text_options(&opened.layer)));
    }

    Ok(())
}
