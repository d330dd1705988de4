use crate::cli::commands::print_json;
use crate::config::{Backend, CONFIG_FILENAME, DEFAULT_DB_FILENAME, DEFECTS_DIR_NAME};
use crate::error::{DefectError, Result};
use crate::storage::SqliteKv;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Execute the init command.
///
/// Creates `.defects/` under `root_dir` (or the CWD) with a config
/// template and a `.gitignore`, and for the `SQLite` backend an empty
/// database.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if a config exists and `force` is not
/// set, or an error if files cannot be written.
pub fn execute(
    backend: Option<Backend>,
    force: bool,
    root_dir: Option<&Path>,
    json: bool,
) -> Result<PathBuf> {
    let base_dir = root_dir.unwrap_or_else(|| Path::new("."));
    let defects_dir = base_dir.join(DEFECTS_DIR_NAME);
    let config_path = defects_dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(DefectError::AlreadyInitialized { path: config_path });
    }
    fs::create_dir_all(&defects_dir)?;

    let backend = backend.unwrap_or_default();
    fs::write(&config_path, config_template(backend))?;

    if backend == Backend::Sqlite {
        // Creates the file and applies the schema.
        SqliteKv::open(&defects_dir.join(DEFAULT_DB_FILENAME))?;
    }

    let gitignore_path = defects_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore = r"# Database
*.db
*.db-shm
*.db-wal

# Temporary
*.tmp
";
        fs::write(gitignore_path, gitignore)?;
    }

    info!(path = %defects_dir.display(), %backend, "Initialized workspace");
    if json {
        print_json(&serde_json::json!({
            "path": defects_dir.display().to_string(),
            "backend": backend.as_str(),
        }))?;
    } else {
        println!("Initialized defects workspace in {}", defects_dir.display());
    }
    Ok(defects_dir)
}

fn config_template(backend: Backend) -> String {
    format!(
        r"# Defect Tracker Project Configuration
storage:
  backend: {backend}
  # key: blendDefects
# defaults:
#   environment: production
#   severity: minor
#   status: open
# id:
#   prefix: DEF
# color: true
"
    )
}
