//! The record store.
//!
//! [`DefectStore`] owns the authoritative, ordered collection of defects
//! and is the only writer of the persisted snapshot. Every successful
//! mutation writes the full collection back under one key; there are no
//! partial or append writes.
//!
//! Ordering: new records go to the front, edits keep their slot.

use crate::error::{DefectError, Result};
use crate::model::{Defect, DefectFields, DefectPatch};
use crate::storage::KeyValueStore;
use crate::util::id::{IdGenerator, resolve_id};
use crate::validation::DefectValidator;
use chrono::Utc;
use tracing::{debug, info, warn};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "blendDefects";

/// Options for [`DefectStore::open_with`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Storage key holding the serialized collection.
    pub key: String,
    /// Generator used for new record IDs.
    pub ids: IdGenerator,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            ids: IdGenerator::with_defaults(),
        }
    }
}

/// Read and parse the collection stored under `key`.
///
/// A missing key yields an empty collection.
///
/// # Errors
///
/// Returns `CorruptState` if the stored value is not a valid collection
/// (unparsable JSON or duplicate IDs), or `StorageUnavailable` if the
/// backend cannot be read.
pub fn read_records<S: KeyValueStore + ?Sized>(backend: &S, key: &str) -> Result<Vec<Defect>> {
    let Some(raw) = backend.get(key)? else {
        debug!(key, "No stored collection, starting empty");
        return Ok(Vec::new());
    };

    let records: Vec<Defect> =
        serde_json::from_str(&raw).map_err(|e| DefectError::CorruptState {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

    let duplicates = DefectValidator::duplicate_ids(&records);
    if !duplicates.is_empty() {
        return Err(DefectError::CorruptState {
            key: key.to_string(),
            reason: format!("duplicate ids: {}", duplicates.join(", ")),
        });
    }

    for record in &records {
        if let Err(errors) = DefectValidator::validate(record) {
            warn!(id = %record.id, ?errors, "Stored defect fails validation; keeping it as-is");
        }
    }

    Ok(records)
}

/// Serialize and write the full collection under `key`.
///
/// # Errors
///
/// Returns `StorageUnavailable` if the backend rejects the write.
pub fn write_records<S: KeyValueStore + ?Sized>(
    backend: &mut S,
    key: &str,
    records: &[Defect],
) -> Result<()> {
    let json = serde_json::to_string(records)?;
    backend.set(key, &json)?;
    debug!(key, count = records.len(), bytes = json.len(), "Persisted collection");
    Ok(())
}

/// Owned store instance: construct with [`open`](Self::open), drop when done.
#[derive(Debug)]
pub struct DefectStore<S: KeyValueStore> {
    backend: S,
    key: String,
    ids: IdGenerator,
    records: Vec<Defect>,
    dirty: bool,
}

impl<S: KeyValueStore> DefectStore<S> {
    /// Open a store over `backend` using the default key and ID prefix,
    /// loading the current collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be read.
    /// Corrupt stored data is not an error (see [`load`](Self::load)).
    pub fn open(backend: S) -> Result<Self> {
        Self::open_with(backend, StoreOptions::default())
    }

    /// Open a store with explicit options.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be read.
    pub fn open_with(backend: S, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            backend,
            key: options.key,
            ids: options.ids,
            records: Vec::new(),
            dirty: false,
        };
        store.load()?;
        info!(
            backend = %store.backend.describe(),
            key = %store.key,
            count = store.records.len(),
            "Opened defect store"
        );
        Ok(store)
    }

    /// Re-read the collection from the backend, replacing in-memory state.
    ///
    /// Corrupt stored data is logged and replaced by an empty collection;
    /// the stored bytes are left untouched until the next successful write.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend cannot be read.
    pub fn load(&mut self) -> Result<&[Defect]> {
        self.records = match read_records(&self.backend, &self.key) {
            Ok(records) => records,
            Err(DefectError::CorruptState { key, reason }) => {
                warn!(%key, %reason, "Stored defects are corrupt; starting with an empty collection");
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        self.dirty = false;
        Ok(&self.records)
    }

    /// Write the full current collection.
    ///
    /// On failure the in-memory state is kept and the store is marked
    /// dirty until a later write succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend rejects the write.
    pub fn persist(&mut self) -> Result<()> {
        match write_records(&mut self.backend, &self.key, &self.records) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                warn!(error = %e, "Persist failed; in-memory changes are not saved");
                Err(e)
            }
        }
    }

    /// Retry persisting if an earlier write failed. No-op when clean.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the backend still rejects the write.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.persist()?;
        }
        Ok(())
    }

    /// Validate `fields`, assign a fresh ID, insert at the front and persist.
    ///
    /// # Errors
    ///
    /// Returns a validation error (nothing changed, nothing written) or
    /// `StorageUnavailable` (record kept in memory, store dirty).
    pub fn create(&mut self, fields: DefectFields) -> Result<Defect> {
        let fields = fields.normalized();
        DefectValidator::validate_fields(&fields).map_err(DefectError::from_validation_errors)?;

        let id = self
            .ids
            .generate_unique(|candidate| self.records.iter().any(|d| d.id == candidate));
        let now = Utc::now();
        let defect = Defect::from_fields(id, fields, now, now);

        self.records.insert(0, defect.clone());
        info!(id = %defect.id, severity = %defect.severity, "Created defect");
        self.persist()?;
        Ok(defect)
    }

    /// Replace the fields of an existing record in place.
    ///
    /// Position and `created_at` are kept; `updated_at` is refreshed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a validation error (nothing changed, nothing
    /// written), or `StorageUnavailable` (change kept in memory, store dirty).
    pub fn update(&mut self, id: &str, fields: DefectFields) -> Result<Defect> {
        let index = self.index_of(id)?;
        let fields = fields.normalized();
        DefectValidator::validate_fields(&fields).map_err(DefectError::from_validation_errors)?;

        let existing = &self.records[index];
        let created_at = existing.created_at;
        let updated_at = Utc::now().max(created_at);
        let defect = Defect::from_fields(existing.id.clone(), fields, created_at, updated_at);

        self.records[index] = defect.clone();
        info!(id = %defect.id, status = %defect.status, "Updated defect");
        self.persist()?;
        Ok(defect)
    }

    /// Merge `patch` over the current record, then [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Same as [`update`](Self::update).
    pub fn edit(&mut self, id: &str, patch: &DefectPatch) -> Result<Defect> {
        let index = self.index_of(id)?;
        let fields = patch.apply_to(&self.records[index]);
        self.update(id, fields)
    }

    /// Remove a record and persist.
    ///
    /// Deleting an ID twice reports `NotFound` the second time.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` (nothing changed) or `StorageUnavailable`
    /// (record removed from memory, store dirty).
    pub fn delete(&mut self, id: &str) -> Result<Defect> {
        let index = self.index_of(id)?;
        let removed = self.records.remove(index);
        info!(id = %removed.id, "Deleted defect");
        self.persist()?;
        Ok(removed)
    }

    /// Ask `confirm` about the record first; delete only on `true`.
    ///
    /// Returns the removed record, or `None` when the caller declined.
    ///
    /// # Errors
    ///
    /// Same as [`delete`](Self::delete).
    pub fn delete_confirmed<F>(&mut self, id: &str, confirm: F) -> Result<Option<Defect>>
    where
        F: FnOnce(&Defect) -> bool,
    {
        let index = self.index_of(id)?;
        if !confirm(&self.records[index]) {
            debug!(id, "Delete declined");
            return Ok(None);
        }
        self.delete(id).map(Some)
    }

    /// Look up a record by exact ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Defect> {
        self.records.iter().find(|d| d.id == id)
    }

    /// Resolve a user-typed (possibly partial) ID to a stored one.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AmbiguousId` or a validation error for blank input.
    pub fn resolve_id(&self, input: &str) -> Result<String> {
        resolve_id(input, self.records.iter().map(|d| d.id.as_str()))
    }

    /// The collection, newest-created first.
    #[must_use]
    pub fn records(&self) -> &[Defect] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True if in-memory changes have not been written.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Storage key of the collection.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub const fn backend(&self) -> &S {
        &self.backend
    }

    /// Mutable access to the backend (tests use it to change quotas).
    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Drop the store, handing back the backend.
    #[must_use]
    pub fn into_backend(self) -> S {
        self.backend
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.records
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DefectError::NotFound { id: id.to_string() })
    }
}
