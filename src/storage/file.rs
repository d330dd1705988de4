//! File-per-key backend.
//!
//! Each key maps to `<dir>/<key>.json`. Writes go to a temp file in the
//! same directory, are synced, then renamed over the target, so a crash
//! leaves either the old or the new snapshot.

use crate::error::{DefectError, Result};
use crate::storage::KeyValueStore;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Directory of `<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Use `dir` as the store directory. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the key contains anything other than
    /// ASCII letters, digits, `-`, `_` or `.`, or starts with a dot.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(DefectError::Config(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DefectError::storage(format!(
                "cannot read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        let temp_path = path.with_extension("json.tmp");

        let write = || -> io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let temp_file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(temp_file);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&temp_path, &path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            DefectError::storage(format!("cannot write {}: {e}", path.display()))
        })?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "Wrote snapshot file");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.dir.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let kv = FileKv::new(temp.path());
        assert_eq!(kv.get("blendDefects").unwrap(), None);
    }

    #[test]
    fn set_creates_directory_and_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join(".defects");
        let mut kv = FileKv::new(&dir);

        kv.set("blendDefects", "[]").unwrap();

        assert_eq!(kv.get("blendDefects").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("blendDefects.json").is_file());
        assert!(!dir.join("blendDefects.json.tmp").exists());
    }

    #[test]
    fn rejects_path_like_keys() {
        let kv = FileKv::new("/tmp/unused");
        assert!(kv.path_for("../escape").is_err());
        assert!(kv.path_for("a/b").is_err());
        assert!(kv.path_for("").is_err());
        assert!(kv.path_for("blendDefects").is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_is_storage_unavailable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("ro");
        fs::create_dir(&dir).unwrap();
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o500)).unwrap();

        let mut kv = FileKv::new(&dir);
        let result = kv.set("blendDefects", "[]");

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o700)).unwrap();
        // Root ignores directory permissions.
        if result.is_ok() {
            return;
        }
        assert!(matches!(
            result,
            Err(DefectError::StorageUnavailable { .. })
        ));
    }
}
