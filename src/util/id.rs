//! ID generation for defects.
//!
//! IDs look like `DEF-<millis>-<suffix>`: a millisecond timestamp that
//! never goes backwards within the process, then nine random base36
//! characters (0-9, a-z).

use crate::error::{DefectError, Result};
use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Default ID prefix.
pub const DEFAULT_PREFIX: &str = "DEF";

/// Length of the random suffix.
pub const SUFFIX_LENGTH: usize = 9;

/// Shortest input accepted for suffix matching.
pub const MIN_SUFFIX_MATCH: usize = 4;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Highest timestamp handed out so far.
static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// ID generator that produces unique defect IDs.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl IdGenerator {
    /// Create a new ID generator with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Create a new ID generator using [`DEFAULT_PREFIX`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PREFIX)
    }

    /// Get the configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a fresh ID.
    #[must_use]
    pub fn generate(&self) -> String {
        let millis = monotonic_millis(Utc::now().timestamp_millis());
        format!("{}-{millis}-{}", self.prefix, random_suffix(SUFFIX_LENGTH))
    }

    /// Generate an ID, retrying while the checker reports a collision.
    ///
    /// The checker function should return `true` if the ID already exists.
    pub fn generate_unique<F>(&self, exists: F) -> String
    where
        F: Fn(&str) -> bool,
    {
        loop {
            let id = self.generate();
            if !exists(&id) {
                return id;
            }
            tracing::debug!(id = %id, "Generated ID collided, retrying");
        }
    }
}

/// Generate an ID with the default prefix.
#[must_use]
pub fn generate_id() -> String {
    IdGenerator::with_defaults().generate()
}

/// Clamp `now_ms` so successive calls never go backwards.
fn monotonic_millis(now_ms: i64) -> i64 {
    let previous = LAST_MILLIS.fetch_max(now_ms, Ordering::SeqCst);
    previous.max(now_ms)
}

fn random_suffix(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect()
}

/// Check the `<prefix>-<digits>-<base36>` shape.
///
/// Suffixes shorter than [`SUFFIX_LENGTH`] are accepted; older records
/// sometimes carry them.
#[must_use]
pub fn is_valid_id_format(id: &str) -> bool {
    let mut parts = id.rsplitn(3, '-');
    let (Some(suffix), Some(millis), Some(prefix)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    !prefix.is_empty()
        && prefix.chars().all(|c| c.is_ascii_alphanumeric())
        && !millis.is_empty()
        && millis.chars().all(|c| c.is_ascii_digit())
        && !suffix.is_empty()
        && suffix.len() <= 12
        && suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
}

/// Resolve a user-typed ID against the known IDs.
///
/// Resolution order: exact match, case-insensitive match, then a unique
/// case-insensitive suffix match (so `k3j9x0a2b` finds
/// `DEF-1718000000000-k3j9x0a2b`). Suffixes shorter than
/// [`MIN_SUFFIX_MATCH`] characters never match.
///
/// # Errors
///
/// Returns `Validation` for blank input or a too-short suffix, `NotFound`
/// when nothing matches and `AmbiguousId` when several IDs share the suffix.
pub fn resolve_id<'a, I>(input: &str, ids: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input = input.trim();
    if input.is_empty() {
        return Err(DefectError::validation("id", "cannot be empty"));
    }

    let ids: Vec<&str> = ids.into_iter().collect();
    if let Some(exact) = ids.iter().find(|id| **id == input) {
        return Ok((*exact).to_string());
    }

    let needle = input.to_lowercase();
    if let Some(found) = ids.iter().find(|id| id.to_lowercase() == needle) {
        return Ok((*found).to_string());
    }

    if needle.chars().count() < MIN_SUFFIX_MATCH {
        return Err(DefectError::validation(
            "id",
            format!("suffix must be at least {MIN_SUFFIX_MATCH} characters"),
        ));
    }

    let matches: Vec<String> = ids
        .iter()
        .filter(|id| id.to_lowercase().ends_with(&needle))
        .map(|id| (*id).to_string())
        .collect();

    match matches.len() {
        0 => Err(DefectError::NotFound {
            id: input.to_string(),
        }),
        1 => Ok(matches.into_iter().next().unwrap_or_default()),
        _ => Err(DefectError::AmbiguousId {
            input: input.to_string(),
            matches,
        }),
    }
}
