//! State store performance benchmarks.
//!
//! Measures merge throughput, status queries and full adapter passes.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use cellstate::{
    CellRecord, CellStatus, Coordinate, CorrectionAdapter, CorrectionSuggestion, StateStore,
    ValidationAdapter, ValidationResultSet, ValidationStatus,
};

const COLUMNS: &[&str] = &["sample_id", "collection_date", "host", "country", "depth"];

/// Validation results where every third cell is invalid.
fn results(rows: usize) -> ValidationResultSet {
    let mut results = ValidationResultSet::new();
    for row in 0..rows {
        for (i, column) in COLUMNS.iter().enumerate() {
            if (row + i) % 3 == 0 {
                results.set_cell(row, column, ValidationStatus::Invalid, "value out of range");
            } else {
                results.set_cell(row, column, ValidationStatus::Valid, "");
            }
        }
    }
    results
}

fn populated(rows: usize) -> StateStore {
    let mut store = StateStore::with_columns(COLUMNS.iter().copied());
    ValidationAdapter::new(COLUMNS.iter().copied()).apply(&mut store, &results(rows));
    store
}

/// Benchmark raw merges through apply_changes.
fn bench_apply_changes(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_changes");

    for rows in [100, 1_000, 10_000] {
        let updates: Vec<(Coordinate, CellRecord)> = (0..rows)
            .map(|row| {
                (
                    Coordinate::new(row, row % COLUMNS.len()),
                    CellRecord::new(CellStatus::Warning).with_detail("check unit"),
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("fresh", rows), &updates, |b, updates| {
            b.iter(|| {
                let mut store = StateStore::new();
                black_box(store.apply_changes(updates.clone()))
            })
        });

        group.bench_with_input(BenchmarkId::new("no_op", rows), &updates, |b, updates| {
            let mut store = StateStore::new();
            store.apply_changes(updates.clone());
            b.iter(|| black_box(store.apply_changes(updates.clone())))
        });
    }

    group.finish();
}

/// Benchmark a full validation pass.
fn bench_validation_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_pass");
    let adapter = ValidationAdapter::new(COLUMNS.iter().copied());

    for rows in [100, 1_000] {
        let results = results(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &results, |b, results| {
            b.iter(|| {
                let mut store = StateStore::with_columns(COLUMNS.iter().copied());
                black_box(adapter.apply(&mut store, results))
            })
        });
    }

    group.finish();
}

/// Benchmark a correction pass over a validated store.
fn bench_correction_pass(c: &mut Criterion) {
    let suggestions: Vec<_> = populated(1_000)
        .get_by_status(CellStatus::Invalid)
        .into_iter()
        .map(|coord| (coord, vec![CorrectionSuggestion::new("10 m", "10")]))
        .collect();

    c.bench_function("correction_pass_1000", |b| {
        b.iter_batched(
            || populated(1_000),
            |mut store| black_box(CorrectionAdapter::new().apply(&mut store, suggestions.clone())),
            BatchSize::LargeInput,
        )
    });
}

/// Benchmark status queries.
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let store = populated(10_000);

    group.bench_function("get_status", |b| {
        b.iter(|| black_box(store.get_status(Coordinate::new(5_000, 2))))
    });
    group.bench_function("get_by_status", |b| {
        b.iter(|| black_box(store.get_by_status(CellStatus::Invalid)))
    });
    group.bench_function("summary", |b| b.iter(|| black_box(store.summary())));

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_changes,
    bench_validation_pass,
    bench_correction_pass,
    bench_queries,
);
criterion_main!(benches);
