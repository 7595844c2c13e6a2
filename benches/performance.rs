//! Performance benchmarks for the filter store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use logsift::{FilterStore, FilterUpdate, LogEntry, LogLevel, LogType};

const CATEGORIES: [&str; 4] = ["LogNet", "LogInit", "LogRenderer", "LogTemp"];

fn create_store(entry_count: usize) -> FilterStore {
    let entries = (0..entry_count)
        .map(|i| {
            let content = match i % 4 {
                0 => format!("Display: frame {} rendered", i),
                1 => format!("Warning: packet {} delayed", i),
                2 => format!("Error: asset {} failed to load", i),
                _ => format!("tick {}", i),
            };
            LogEntry::new(CATEGORIES[i % CATEGORIES.len()], content)
        })
        .collect();
    let log_types = CATEGORIES
        .iter()
        .map(|t| LogType::new(*t, entry_count / CATEGORIES.len()))
        .collect();

    let mut store = FilterStore::default();
    store.set_entries(entries, log_types, "bench.log");
    store
}

/// Benchmark filtering with each search mode
fn bench_filtered_entries(c: &mut Criterion) {
    let mut group = c.benchmark_group("filtered_entries");

    let modes: [(&str, FilterUpdate); 4] = [
        ("default", FilterUpdate::new()),
        ("literal", FilterUpdate::new().search("asset 1")),
        ("regex", FilterUpdate::new().search(r"packet \d+5 ").use_regex(true)),
        (
            "type_and_level",
            FilterUpdate::new()
                .types(["LogNet", "LogTemp"])
                .levels([LogLevel::Error]),
        ),
    ];

    for entry_count in [1_000, 10_000, 100_000] {
        for (name, update) in &modes {
            let mut store = create_store(entry_count);
            store.update_filters(update.clone());

            group.bench_with_input(BenchmarkId::new(*name, entry_count), &store, |b, store| {
                b.iter(|| black_box(store.filtered_entries()))
            });
        }
    }

    group.finish();
}

/// Benchmark level detection on its own
fn bench_detect_level(c: &mut Criterion) {
    let lines = [
        "Display: frame 12 rendered",
        "nothing interesting on this line at all",
        "Warning and Error both present",
    ];

    c.bench_function("detect_level", |b| {
        b.iter(|| {
            for line in &lines {
                black_box(logsift::detect_level(black_box(line)));
            }
        })
    });
}

criterion_group!(benches, bench_filtered_entries, bench_detect_level);
criterion_main!(benches);
