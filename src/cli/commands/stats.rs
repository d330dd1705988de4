//! Stats command implementation.
//!
//! Shows the headline counts (total, critical, open, resolved) and,
//! on request, per-severity, per-status and per-assignee breakdowns.

use crate::cli::StatsArgs;
use crate::cli::commands::print_json;
use crate::config;
use crate::error::Result;
use crate::format::StatsOutput;
use crate::model::Defect;
use crate::stats::{breakdown_by_assignee, breakdown_by_severity, breakdown_by_status, summarize};
use tracing::{debug, info};

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if the workspace cannot be opened.
pub fn execute(args: &StatsArgs, json: bool, cli: &config::CliOverrides) -> Result<()> {
    let opened = config::open_store_with_cli(cli)?;

    info!("Computing defect statistics");
    let records = opened.store.records();
    debug!(total = records.len(), "Loaded all defects for stats");

    let output = build_output(args, records);

    if json {
        print_json(&output)?;
    } else {
        print_text_output(&output);
    }

    Ok(())
}

/// Summary plus the requested breakdowns.
#[must_use]
pub fn build_output(args: &StatsArgs, records: &[Defect]) -> StatsOutput {
    let mut breakdowns = Vec::new();

    if args.by_severity || args.all {
        breakdowns.push(breakdown_by_severity(records));
    }
    if args.by_status || args.all {
        breakdowns.push(breakdown_by_status(records));
    }
    if args.by_assignee || args.all {
        breakdowns.push(breakdown_by_assignee(records));
    }

    StatsOutput {
        summary: summarize(records),
        breakdowns,
    }
}

fn print_text_output(output: &StatsOutput) {
    println!("Defect Statistics");
    println!("=================\n");

    let s = &output.summary;
    println!("Summary:");
    println!("  Total:     {}", s.total);
    println!("  Critical:  {}", s.critical);
    println!("  Open:      {}", s.open);
    println!("  Resolved:  {}", s.resolved);

    for breakdown in &output.breakdowns {
        println!("\nBy {}:", breakdown.dimension);
        for entry in &breakdown.counts {
            println!("  {}: {}", entry.label(), entry.count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefectFields, Severity, Status};
    use crate::storage::MemoryKv;
    use crate::store::DefectStore;

    #[test]
    fn test_breakdowns_only_when_requested() {
        let mut store = DefectStore::open(MemoryKv::new()).unwrap();
        store
            .create(DefectFields::new("a", "d", Severity::Critical, Status::Open))
            .unwrap();

        let plain = build_output(&StatsArgs::default(), store.records());
        assert!(plain.breakdowns.is_empty());
        assert_eq!(plain.summary.critical, 1);

        let args = StatsArgs {
            by_assignee: true,
            ..Default::default()
        };
        let output = build_output(&args, store.records());
        assert_eq!(output.breakdowns.len(), 1);
        assert_eq!(output.breakdowns[0].dimension, "assignee");

        let all = StatsArgs {
            all: true,
            ..Default::default()
        };
        let dimensions: Vec<String> = build_output(&all, store.records())
            .breakdowns
            .into_iter()
            .map(|b| b.dimension)
            .collect();
        assert_eq!(dimensions, vec!["severity", "status", "assignee"]);
    }
}
