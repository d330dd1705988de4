//! Delete command implementation.
//!
//! Asks for confirmation per record unless `--yes` is given. A closed or
//! non-interactive stdin counts as "no".

use crate::cli::DeleteArgs;
use crate::cli::commands::print_json;
use crate::config;
use crate::error::Result;
use crate::format::{DeleteResult, format_defect_line};
use crate::model::Defect;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Question shown before each delete.
pub const CONFIRM_PROMPT: &str = "Are you sure you want to delete this defect?";

/// Execute the delete command.
///
/// # Errors
///
/// Returns an error if an ID does not resolve or the collection cannot
/// be written. IDs before the failing one stay deleted.
pub fn execute(args: &DeleteArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let mut opened = config::open_store_with_cli(cli)?;
    let store = &mut opened.store;
    let mut result = DeleteResult::default();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt_out = io::stderr();

    for raw_id in &args.ids {
        let id = store.resolve_id(raw_id)?;
        let removed = if args.yes {
            Some(store.delete(&id)?)
        } else {
            store.delete_confirmed(&id, |defect| confirm(&mut input, &mut prompt_out, defect))?
        };

        match removed {
            Some(defect) => result.deleted.push(defect.id),
            None => result.declined.push(id),
        }
    }

    if json {
        print_json(&result)?;
    } else {
        for id in &result.deleted {
            println!("Deleted {id}");
        }
        for id in &result.declined {
            println!("Kept {id}");
        }
    }

    Ok(())
}

/// Show the record and ask; only an explicit yes confirms.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W, defect: &Defect) -> bool {
    let _ = writeln!(output, "{}", format_defect_line(defect));
    let _ = write!(output, "{CONFIRM_PROMPT} [y/N] ");
    let _ = output.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => {
            debug!(id = %defect.id, "No answer at delete prompt");
            false
        }
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
    }
}
