#![allow(dead_code)]

use defect_tracker::storage::{FileKv, SqliteKv};
use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;
use tracing::info;

pub mod cli;
pub mod fixtures;

static INIT: Once = Once::new();

pub fn init_test_logging() {
    INIT.call_once(|| {
        defect_tracker::logging::init_test_logging();
    });
}

pub struct TestLogGuard {
    name: String,
    start: Instant,
}

impl TestLogGuard {
    fn new(name: &str) -> Self {
        init_test_logging();
        info!("{name}: starting");
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for TestLogGuard {
    fn drop(&mut self) {
        info!(
            "{}: assertions passed (elapsed {:?})",
            self.name,
            self.start.elapsed()
        );
    }
}

pub fn test_log(name: &str) -> TestLogGuard {
    TestLogGuard::new(name)
}

pub fn test_db() -> SqliteKv {
    init_test_logging();
    SqliteKv::open_memory().expect("Failed to create test database")
}

pub fn test_db_with_dir() -> (SqliteKv, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join(".defects").join("defects.db");
    std::fs::create_dir_all(db_path.parent().unwrap()).unwrap();
    let backend = SqliteKv::open(&db_path).expect("Failed to create test database");
    (backend, dir)
}

pub fn test_files() -> (FileKv, TempDir) {
    init_test_logging();
    let dir = TempDir::new().expect("Failed to create temp dir");
    (FileKv::new(dir.path()), dir)
}
