//! Logging setup for the `dt` binary and for tests.
//!
//! `RUST_LOG` takes precedence over the `-v`/`-q` flags. Logs go to
//! stderr so stdout stays clean for command output.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-v` count and `-q` to a level.
#[must_use]
pub const fn level_from_flags(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the global subscriber.
///
/// With `log_file`, events are appended there as JSON lines instead of
/// going to stderr.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global
/// subscriber is already installed.
pub fn init_logging(
    verbosity: u8,
    quiet: bool,
    log_file: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::builder()
        .with_default_directive(level_from_flags(verbosity, quiet).into())
        .from_env_lossy();

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .try_init()?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(verbosity >= 2)
            .without_time()
            .try_init()?;
    }

    Ok(())
}

/// Subscriber for unit and integration tests: output is captured by the
/// test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::DEBUG.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(level_from_flags(3, true), LevelFilter::ERROR);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(level_from_flags(0, false), LevelFilter::WARN);
        assert_eq!(level_from_flags(1, false), LevelFilter::INFO);
        assert_eq!(level_from_flags(2, false), LevelFilter::DEBUG);
        assert_eq!(level_from_flags(9, false), LevelFilter::TRACE);
    }

    #[test]
    fn test_logging_can_be_initialized_twice() {
        init_test_logging();
        init_test_logging();
        tracing::info!("test_logging_can_be_initialized_twice: assertions passed");
    }
}
