use crate::cli::CreateArgs;
use crate::cli::commands::{parse_severity, parse_status, print_json};
use crate::config;
use crate::error::Result;
use crate::model::DefectFields;

/// Execute the create command.
///
/// # Errors
///
/// Returns an error if a field is invalid, the workspace cannot be
/// opened, or the collection cannot be written.
pub fn execute(args: &CreateArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut opened = config::open_store_with_cli(cli)?;
    let fields = build_fields(args, &opened.layer)?;
    let defect = opened.store.create(fields)?;

    if args.silent {
        println!("{}", defect.id);
    } else if json {
        print_json(&defect)?;
    } else {
        println!("Created {}: {}", defect.id, defect.title);
    }

    Ok(())
}

/// Fill unset flags from config defaults.
///
/// # Errors
///
/// Returns `InvalidSeverity`/`InvalidStatus` for unknown values, from the
/// flags or from config.
pub fn build_fields(args: &CreateArgs, layer: &config::ConfigLayer) -> Result<DefectFields> {
    let severity = match parse_severity(args.severity.as_deref())? {
        Some(severity) => severity,
        None => config::default_severity_from_layer(layer)?,
    };
    let status = match parse_status(args.status.as_deref())? {
        Some(status) => status,
        None => config::default_status_from_layer(layer)?,
    };
    let environment = args
        .environment
        .clone()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config::default_environment_from_layer(layer));

    Ok(DefectFields {
        title: args.title.clone(),
        description: args.description.clone(),
        severity,
        status,
        assignee: args.assignee.clone(),
        environment: Some(environment),
        steps: args.steps.clone(),
        url: args.url.clone(),
    })
}
