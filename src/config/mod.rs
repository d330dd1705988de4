//! Configuration management for `defect_tracker`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI overrides
//! 2. Project config (.defects/config.yaml)
//! 3. User config (~/.config/dt/config.yaml)
//! 4. Defaults

use crate::error::{DefectError, Result};
use crate::model::{DEFAULT_ENVIRONMENT, Severity, Status};
use crate::storage::{FileKv, KeyValueStore, SqliteKv};
use crate::store::{DEFAULT_STORAGE_KEY, DefectStore, StoreOptions};
use crate::util::id::{DEFAULT_PREFIX, IdGenerator};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Name of the workspace directory.
pub const DEFECTS_DIR_NAME: &str = ".defects";
/// Project config file inside the workspace directory.
pub const CONFIG_FILENAME: &str = "config.yaml";
/// Database file used by the `SQLite` backend.
pub const DEFAULT_DB_FILENAME: &str = "defects.db";

/// Which key-value backend holds the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Backend {
    #[default]
    Sqlite,
    File,
}

impl Backend {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::File => "file",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = DefectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "db" => Ok(Self::Sqlite),
            "file" | "json" => Ok(Self::File),
            other => Err(DefectError::Config(format!(
                "unknown storage backend '{other}' (expected sqlite or file)"
            ))),
        }
    }
}

/// Discover the active `.defects` directory, walking up from `start` (or CWD).
///
/// # Errors
///
/// Returns `NotInitialized` if no workspace is found, or an I/O error if
/// the CWD cannot be read.
pub fn discover_defects_dir(start: Option<&Path>) -> Result<PathBuf> {
    let mut current = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    loop {
        let candidate = current.join(DEFECTS_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            break;
        }
    }

    Err(DefectError::NotInitialized)
}

/// Resolve the workspace directory: `--dir` if given (no walking up),
/// otherwise discovery from the CWD.
///
/// # Errors
///
/// Returns `NotInitialized` if the workspace does not exist.
pub fn resolve_defects_dir(cli: &CliOverrides) -> Result<PathBuf> {
    match &cli.dir {
        Some(root) => {
            let candidate = root.join(DEFECTS_DIR_NAME);
            if candidate.is_dir() {
                Ok(candidate)
            } else {
                Err(DefectError::NotInitialized)
            }
        }
        None => discover_defects_dir(None),
    }
}

/// A flat configuration layer of dotted keys (`storage.backend`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Build a layer from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid YAML.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(contents)?;
        let mut flat = HashMap::new();
        flatten_yaml(&value, "", &mut flat);

        let mut layer = Self::default();
        for (key, value) in flat {
            layer.insert(&key, value);
        }
        Ok(layer)
    }

    /// Set a key, normalizing its spelling.
    pub fn insert(&mut self, key: &str, value: String) {
        self.values.insert(normalize_key(key), value);
    }

    /// Look up a key (any spelling), ignoring blank values.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// CLI overrides for config loading (optional).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Workspace root containing `.defects/`.
    pub dir: Option<PathBuf>,
    pub backend: Option<Backend>,
    pub key: Option<String>,
    pub no_color: Option<bool>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(backend) = self.backend {
            layer.insert("storage.backend", backend.to_string());
        }
        if let Some(key) = &self.key {
            layer.insert("storage.key", key.clone());
        }
        if self.no_color == Some(true) {
            layer.insert("color", "false".to_string());
        }

        layer
    }
}

/// Load project config (.defects/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(defects_dir: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&defects_dir.join(CONFIG_FILENAME))
}

/// Load user config (~/.config/dt/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("dt")
        .join(CONFIG_FILENAME);
    ConfigLayer::from_yaml(&path)
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.insert("storage.backend", Backend::default().to_string());
    layer.insert("storage.key", DEFAULT_STORAGE_KEY.to_string());
    layer.insert("defaults.environment", DEFAULT_ENVIRONMENT.to_string());
    layer.insert("defaults.severity", Severity::Minor.to_string());
    layer.insert("defaults.status", Status::Open.to_string());
    layer.insert("id.prefix", DEFAULT_PREFIX.to_string());
    layer
}

/// Load configuration with the documented precedence order.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(defects_dir: &Path, cli: &CliOverrides) -> Result<ConfigLayer> {
    let defaults = default_config_layer();
    let user = load_user_config()?;
    let project = load_project_config(defects_dir)?;
    let cli_layer = cli.as_layer();

    Ok(ConfigLayer::merge_layers(&[defaults, user, project, cli_layer]))
}

/// Resolve the storage backend.
///
/// # Errors
///
/// Returns a `Config` error for an unknown backend name.
pub fn backend_from_layer(layer: &ConfigLayer) -> Result<Backend> {
    layer
        .get("storage.backend")
        .map_or_else(|| Ok(Backend::default()), Backend::from_str)
}

/// Resolve the storage key of the collection.
#[must_use]
pub fn storage_key_from_layer(layer: &ConfigLayer) -> String {
    layer
        .get("storage.key")
        .unwrap_or(DEFAULT_STORAGE_KEY)
        .to_string()
}

/// Resolve the environment used when a new defect leaves it blank.
#[must_use]
pub fn default_environment_from_layer(layer: &ConfigLayer) -> String {
    layer
        .get("defaults.environment")
        .unwrap_or(DEFAULT_ENVIRONMENT)
        .to_string()
}

/// Resolve default severity for new defects.
///
/// # Errors
///
/// Returns `InvalidSeverity` if the configured value is unknown.
pub fn default_severity_from_layer(layer: &ConfigLayer) -> Result<Severity> {
    layer
        .get("defaults.severity")
        .map_or_else(|| Ok(Severity::Minor), Severity::from_str)
}

/// Resolve default status for new defects.
///
/// # Errors
///
/// Returns `InvalidStatus` if the configured value is unknown.
pub fn default_status_from_layer(layer: &ConfigLayer) -> Result<Status> {
    layer
        .get("defaults.status")
        .map_or_else(|| Ok(Status::Open), Status::from_str)
}

/// Resolve the ID prefix for new defects.
#[must_use]
pub fn id_prefix_from_layer(layer: &ConfigLayer) -> String {
    layer.get("id.prefix").unwrap_or(DEFAULT_PREFIX).to_string()
}

/// Color output: an explicit `color` setting wins, otherwise only on a TTY.
#[must_use]
pub fn should_use_color(layer: &ConfigLayer) -> bool {
    layer
        .get("color")
        .and_then(parse_bool)
        .unwrap_or_else(|| std::io::stdout().is_terminal())
}

/// Open the configured backend inside `defects_dir`.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub fn open_backend(defects_dir: &Path, backend: Backend) -> Result<Box<dyn KeyValueStore>> {
    Ok(match backend {
        Backend::Sqlite => Box::new(SqliteKv::open(&defects_dir.join(DEFAULT_DB_FILENAME))?),
        Backend::File => Box::new(FileKv::new(defects_dir)),
    })
}

/// An opened store together with the configuration it was opened with.
pub struct OpenStoreResult {
    pub store: DefectStore<Box<dyn KeyValueStore>>,
    pub layer: ConfigLayer,
    pub defects_dir: PathBuf,
}

/// Resolve the workspace, load config, and open the store.
///
/// # Errors
///
/// Returns an error if the workspace is missing, config is invalid, or
/// the backend cannot be opened or read.
pub fn open_store_with_cli(cli: &CliOverrides) -> Result<OpenStoreResult> {
    let defects_dir = resolve_defects_dir(cli)?;
    let layer = load_config(&defects_dir, cli)?;
    let backend = open_backend(&defects_dir, backend_from_layer(&layer)?)?;
    let options = StoreOptions {
        key: storage_key_from_layer(&layer),
        ids: IdGenerator::new(id_prefix_from_layer(&layer)),
    };
    let store = DefectStore::open_with(backend, options)?;

    Ok(OpenStoreResult {
        store,
        layer,
        defects_dir,
    })
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace('_', "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" | "always" => Some(true),
        "0" | "false" | "no" | "n" | "off" | "never" => Some(false),
        _ => None,
    }
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Tagged(tagged) => flatten_yaml(&tagged.value, prefix, out),
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
