//! CLI definitions and entry point.

use crate::config::Backend;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Local defect tracker (key-value snapshot store)
#[derive(Parser, Debug)]
#[command(name = "dt", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root containing .defects/ (auto-discover if not set)
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Storage backend (overrides config)
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    /// Storage key holding the collection (overrides config)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Append JSON logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a defects workspace (records `--backend` in config.yaml)
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },

    /// Report a new defect
    Create(CreateArgs),

    /// Edit a defect (unspecified fields keep their values)
    Update(UpdateArgs),

    /// Delete defects
    Delete(DeleteArgs),

    /// List defects, newest first
    List(ListArgs),

    /// Show defect details
    Show {
        /// Defect ID (full, or a unique suffix)
        id: String,
    },

    /// Show summary statistics
    Stats(StatsArgs),

    /// Print the JSON Schema of the stored collection
    Schema,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CreateArgs {
    /// Short summary
    #[arg(long)]
    pub title: String,

    /// What goes wrong
    #[arg(long, short = 'd')]
    pub description: String,

    /// critical, major, minor or trivial (default from config: minor)
    #[arg(long, short = 's')]
    pub severity: Option<String>,

    /// open, in-progress, resolved or closed (default from config: open)
    #[arg(long)]
    pub status: Option<String>,

    /// Person responsible for the fix
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// Where it was observed (default from config: production)
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// Steps to reproduce, one per line
    #[arg(long)]
    pub steps: Option<String>,

    /// Page or endpoint where it shows up
    #[arg(long)]
    pub url: Option<String>,

    /// Output only the new ID
    #[arg(long)]
    pub silent: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct UpdateArgs {
    /// Defect ID (full, or a unique suffix)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    #[arg(long, short = 's')]
    pub severity: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// New assignee (empty string clears)
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,

    /// New environment (empty string resets to the default)
    #[arg(long, short = 'e')]
    pub environment: Option<String>,

    /// New steps (empty string clears)
    #[arg(long)]
    pub steps: Option<String>,

    /// New URL (empty string clears)
    #[arg(long)]
    pub url: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DeleteArgs {
    /// Defect IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Status filter ("all" or a status)
    #[arg(long, default_value = "all")]
    pub status: String,

    /// Severity filter ("all" or a severity)
    #[arg(long, default_value = "all")]
    pub severity: String,

    /// Case-insensitive text in title, description, assignee or URL
    #[arg(long, default_value = "")]
    pub search: String,

    /// Print the summary counts after the list
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args, Debug, Clone, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct StatsArgs {
    /// Break down by severity
    #[arg(long)]
    pub by_severity: bool,

    /// Break down by status
    #[arg(long)]
    pub by_status: bool,

    /// Break down by assignee
    #[arg(long)]
    pub by_assignee: bool,

    /// All breakdowns
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: ShellType,

    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    #[value(name = "powershell")]
    #[value(alias = "pwsh")]
    /// `PowerShell`
    PowerShell,
    /// Elvish
    Elvish,
}
