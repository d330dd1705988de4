use clap::Parser;
use defect_tracker::cli::commands;
use defect_tracker::cli::{Cli, Commands};
use defect_tracker::config;
use defect_tracker::logging::init_logging;
use defect_tracker::{DefectError, StructuredError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);

    let result = match cli.command {
        Commands::Init { force } => {
            commands::init::execute(cli.backend, force, cli.dir.as_deref(), cli.json).map(|_| ())
        }
        Commands::Create(args) => commands::create::execute(&args, cli.json, &overrides),
        Commands::Update(args) => commands::update::execute(&args, cli.json, &overrides),
        Commands::Delete(args) => commands::delete::execute(&args, cli.json, &overrides),
        Commands::List(args) => commands::list::execute(&args, cli.json, &overrides),
        Commands::Show { id } => commands::show::execute(&id, cli.json, &overrides),
        Commands::Stats(args) => commands::stats::execute(&args, cli.json, &overrides),
        Commands::Schema => commands::schema::execute(),
        Commands::Completions(args) => commands::completions::execute(&args),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &DefectError, json_mode: bool) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        dir: cli.dir.clone(),
        backend: cli.backend,
        key: cli.key.clone(),
        no_color: Some(cli.no_color),
    }
}
