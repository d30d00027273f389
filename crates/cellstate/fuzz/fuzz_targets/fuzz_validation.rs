//! Fuzz target for the validation adapter.
//!
//! This fuzzer tests that the adapter:
//! 1. Never panics on arbitrary JSON result payloads
//! 2. Degrades garbled statuses and messages instead of failing
//! 3. Leaves the store unchanged when the same pass runs twice

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cellstate::{StateStore, ValidationAdapter, ValidationResultSet, ValidationStatus};

#[derive(Debug, Arbitrary)]
struct Input {
    payload: String,
    status_token: String,
    columns: Vec<String>,
}

fuzz_target!(|input: Input| {
    if input.payload.len() > 50_000 || input.columns.len() > 32 {
        return;
    }

    let _ = ValidationStatus::parse(&input.status_token);

    let Ok(results) = ValidationResultSet::from_json(&input.payload) else {
        return;
    };

    let mut store = StateStore::with_columns(input.columns.iter().cloned());
    let adapter = ValidationAdapter::new(input.columns.iter().cloned());
    adapter.apply(&mut store, &results);

    let second = adapter.apply(&mut store, &results);
    assert_eq!(second.changed, 0);
});
