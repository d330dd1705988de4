//! Shared utilities for `defect_tracker`.
//!
//! - ID generation and resolution (`DEF-<millis>-<base36>`)

pub mod id;

pub use id::{IdGenerator, generate_id, is_valid_id_format, resolve_id};
