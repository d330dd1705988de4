use crate::cli::UpdateArgs;
use crate::cli::commands::{parse_severity, parse_status, print_json};
use crate::config;
use crate::error::{DefectError, Result};
use crate::model::DefectPatch;

/// Execute the update command.
///
/// Only the flags given change; everything else keeps its current value.
///
/// # Errors
///
/// Returns an error if no field flag is given, the ID does not resolve,
/// a value is invalid, or the collection cannot be written.
pub fn execute(args: &UpdateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let patch = build_patch(args)?;
    if patch.is_empty() {
        return Err(DefectError::validation(
            "fields",
            "nothing to update (pass at least one field flag)",
        ));
    }

    let mut opened = config::open_store_with_cli(cli)?;
    let id = opened.store.resolve_id(&args.id)?;
    let defect = opened.store.edit(&id, &patch)?;

    if json {
        print_json(&defect)?;
    } else {
        println!("Updated {}: {}", defect.id, defect.title);
    }

    Ok(())
}

/// Translate flags into a patch.
///
/// # Errors
///
/// Returns `InvalidSeverity`/`InvalidStatus` for unknown values.
pub fn build_patch(args: &UpdateArgs) -> Result<DefectPatch> {
    Ok(DefectPatch {
        title: args.title.clone(),
        description: args.description.clone(),
        severity: parse_severity(args.severity.as_deref())?,
        status: parse_status(args.status.as_deref())?,
        assignee: args.assignee.clone(),
        environment: args.environment.clone(),
        steps: args.steps.clone(),
        url: args.url.clone(),
    })
}
