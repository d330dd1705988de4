//! Key-value persistence backends.
//!
//! The record store keeps its whole collection as one serialized blob
//! under one key. Backends only need to get, set and remove whole
//! values; each `set` must replace the previous value atomically.
//!
//! - [`SqliteKv`] - a single `kv` table in `.defects/defects.db`
//! - [`FileKv`] - one `<key>.json` file per key, written via temp + rename
//! - [`MemoryKv`] - in-process map with an optional byte quota

mod file;
mod memory;
pub mod schema;
mod sqlite;

pub use file::FileKv;
pub use memory::MemoryKv;
pub use sqlite::SqliteKv;

use crate::error::Result;

/// A string-keyed store of string blobs.
///
/// Read and write failures are reported as
/// [`DefectError::StorageUnavailable`](crate::error::DefectError::StorageUnavailable).
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Short description for log lines (e.g. `sqlite:.defects/defects.db`).
    fn describe(&self) -> String;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
