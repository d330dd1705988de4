//! `defect_tracker`: a local defect tracker.
//!
//! Defects live in memory in a [`DefectStore`], which writes the whole
//! collection as one JSON snapshot to a [`KeyValueStore`] backend after
//! every change. [`query::filter`] and [`stats::summarize`] work on the
//! loaded collection; the `dt` binary in [`cli`] is a thin front end.

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod query;
pub mod stats;
pub mod storage;
pub mod store;
pub mod util;
pub mod validation;

pub use error::{DefectError, ErrorCode, Result, StructuredError};
pub use model::{Defect, DefectFields, DefectPatch, Severity, Status};
pub use query::{Criteria, Selector, filter};
pub use stats::{Summary, summarize};
pub use storage::{FileKv, KeyValueStore, MemoryKv, SqliteKv};
pub use store::{DefectStore, StoreOptions};
