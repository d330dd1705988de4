// Query and persistence performance benchmarks.
//
// Run with: cargo bench
//
// Performance Targets:
// | Operation             | Target    | Description                        |
// |-----------------------|-----------|------------------------------------|
// | Filter (10k)          | < 5ms     | Status + severity + search, 10k    |
// | Summarize (10k)       | < 1ms     | Headline counts over 10k records   |
// | Create (1k, sqlite)   | < 5ms     | One create = full snapshot rewrite |
// | Load (10k, sqlite)    | < 50ms    | Parse a 10k-record snapshot        |

use chrono::{Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use defect_tracker::model::{Defect, DefectFields, Severity, Status};
use defect_tracker::query::{Criteria, filter};
use defect_tracker::stats::{breakdown_by_assignee, summarize};
use defect_tracker::storage::SqliteKv;
use defect_tracker::store::{DEFAULT_STORAGE_KEY, DefectStore, read_records, write_records};
use std::hint::black_box;
use std::sync::Once;
use std::time::Instant;
use tempfile::TempDir;
use tracing::info;

/// Create a test defect with the given index.
fn create_test_defect(i: usize) -> Defect {
    let offset = Duration::seconds(i64::try_from(i).expect("index fits i64"));
    let created = Utc.timestamp_opt(1_735_689_600, 0).unwrap() + offset;
    Defect {
        id: format!("DEF-1735689600000-{i:09}"),
        title: format!("Benchmark defect {i}"),
        severity: Severity::ALL[i % Severity::ALL.len()],
        status: Status::ALL[i % Status::ALL.len()],
        assignee: if i % 3 == 0 {
            Some(format!("user{}", i % 10))
        } else {
            None
        },
        environment: "production".to_string(),
        description: format!("Description for benchmark defect {i}"),
        steps: Some("Open the page\nClick the button".to_string()),
        url: (i % 2 == 0).then(|| format!("https://example.com/page/{i}")),
        created_at: created,
        updated_at: created,
    }
}

fn create_test_collection(count: usize) -> Vec<Defect> {
    (0..count).map(create_test_defect).collect()
}

fn init_bench_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = defect_tracker::logging::init_logging(0, false, None);
    });
}

fn log_group_start(name: &str) {
    info!("benchmark_group_start: name={name}");
}

fn log_group_end(name: &str) {
    info!("benchmark_group_end: name={name}");
}

fn log_bench_start(name: &str) -> Instant {
    info!("benchmark_start: {name}");
    Instant::now()
}

fn log_bench_end(name: &str, started_at: Instant) {
    info!("benchmark_end: {name} duration={:?}", started_at.elapsed());
}

/// Set up a database holding a snapshot of `count` defects.
fn setup_db_with_defects(count: usize) -> (TempDir, SqliteKv) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("bench.db");
    let mut backend = SqliteKv::open(&db_path).expect("Failed to open db");
    write_records(&mut backend, DEFAULT_STORAGE_KEY, &create_test_collection(count))
        .expect("Failed to write snapshot");
    (dir, backend)
}

// =============================================================================
// Query Benchmarks
// =============================================================================

/// Benchmark filtering with all three criteria set.
fn bench_filter(c: &mut Criterion) {
    init_bench_logging();
    let group_name = "query/filter";
    log_group_start(group_name);
    let mut group = c.benchmark_group(group_name);
    let criteria = Criteria::all()
        .with_status(Status::Open)
        .with_severity(Severity::Major)
        .with_search("defect 1");

    for size in [100, 1_000, 10_000] {
        let records = create_test_collection(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &records, |b, records| {
            let bench_name = format!("query/filter/size={size}");
            let bench_start = log_bench_start(&bench_name);
            b.iter(|| filter(black_box(records), black_box(&criteria)).len());
            log_bench_end(&bench_name, bench_start);
        });
    }

    group.finish();
    log_group_end(group_name);
}

/// Benchmark search-only filtering (the search box path).
fn bench_search(c: &mut Criterion) {
    init_bench_logging();
    let group_name = "query/search";
    log_group_start(group_name);
    let mut group = c.benchmark_group(group_name);
    let records = create_test_collection(10_000);

    for needle in ["user7", "EXAMPLE.COM/PAGE/99", "no such text"] {
        let criteria = Criteria::all().with_search(needle);
        group.bench_with_input(BenchmarkId::from_parameter(needle), &criteria, |b, criteria| {
            b.iter(|| filter(black_box(&records), criteria).len());
        });
    }

    group.finish();
    log_group_end(group_name);
}

/// Benchmark summary counts and the assignee breakdown.
fn bench_summarize(c: &mut Criterion) {
    init_bench_logging();
    let group_name = "stats/summarize";
    log_group_start(group_name);
    let mut group = c.benchmark_group(group_name);

    for size in [1_000, 10_000] {
        let records = create_test_collection(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("summary", size), &records, |b, records| {
            b.iter(|| summarize(black_box(records)));
        });
        group.bench_with_input(BenchmarkId::new("by_assignee", size), &records, |b, records| {
            b.iter(|| breakdown_by_assignee(black_box(records)));
        });
    }

    group.finish();
    log_group_end(group_name);
}

// =============================================================================
// Persistence Benchmarks
// =============================================================================

/// Benchmark one create against an existing collection; every create
/// rewrites the whole snapshot.
fn bench_create_into_collection(c: &mut Criterion) {
    init_bench_logging();
    let group_name = "store/create";
    log_group_start(group_name);
    let mut group = c.benchmark_group(group_name);

    for size in [100, 1_000] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let bench_name = format!("store/create/size={size}");
            let bench_start = log_bench_start(&bench_name);
            let (dir, backend) = setup_db_with_defects(size);
            let mut store = DefectStore::open(backend).unwrap();
            let mut counter = 0usize;

            b.iter(|| {
                let fields = DefectFields::new(
                    format!("New defect {counter}"),
                    "Created during benchmark",
                    Severity::Minor,
                    Status::Open,
                );
                store.create(black_box(fields)).unwrap();
                counter += 1;
            });
            drop(dir);
            log_bench_end(&bench_name, bench_start);
        });
    }

    group.finish();
    log_group_end(group_name);
}

/// Benchmark reading and parsing a stored snapshot.
fn bench_load(c: &mut Criterion) {
    init_bench_logging();
    let group_name = "store/load";
    log_group_start(group_name);
    let mut group = c.benchmark_group(group_name);

    for size in [1_000, 10_000] {
        let (dir, backend) = setup_db_with_defects(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &backend, |b, backend| {
            b.iter(|| read_records(black_box(backend), DEFAULT_STORAGE_KEY).unwrap().len());
        });
        drop(dir);
    }

    group.finish();
    log_group_end(group_name);
}

// =============================================================================
// Criterion Groups
// =============================================================================

criterion_group!(query_benches, bench_filter, bench_search, bench_summarize);

criterion_group!(store_benches, bench_create_into_collection, bench_load);

criterion_main!(query_benches, store_benches);
