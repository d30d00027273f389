//! Fuzz target for table fingerprints and diff.
//!
//! This fuzzer tests that:
//! 1. Any table diffs as empty against itself
//! 2. Equal fingerprints never hide a differing cell

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use cellstate::{DataTable, diff_tables};

#[derive(Debug, Arbitrary)]
struct Tables {
    headers: Vec<String>,
    old: Vec<Vec<String>>,
    new: Vec<Vec<String>>,
}

fuzz_target!(|input: Tables| {
    // Keep tables small to avoid OOM
    if input.headers.len() > 16 || input.old.len() > 64 || input.new.len() > 64 {
        return;
    }

    let old = DataTable::new(input.headers.clone(), input.old);
    let new = DataTable::new(input.headers, input.new);

    assert!(diff_tables(&old, &old.clone()).is_empty());
    assert_eq!(old.fingerprint(), old.clone().fingerprint());

    if old.row_count() == new.row_count() && old.fingerprint() == new.fingerprint() {
        for row in 0..old.row_count() {
            for column in 0..old.column_count() {
                let read = |table: &DataTable| {
                    table
                        .get(row, column)
                        .filter(|value| !DataTable::is_null_value(value))
                };
                assert_eq!(read(&old), read(&new));
            }
        }
    }
});
