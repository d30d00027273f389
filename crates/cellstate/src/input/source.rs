//! In-memory table snapshots.

use sha2::{Digest, Sha256};

/// Represents a full-table snapshot: headers plus string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string slices; handy for callers assembling snapshots by hand.
    pub fn from_rows<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }

    /// Content hash of headers and cells, formatted as `sha256:<hex>`.
    ///
    /// Every header, row and cell is length-prefixed, so no two distinct
    /// layouts share an encoding. Null-like cells hash as a single tag and
    /// therefore compare equal regardless of how "missing" is spelled.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.headers.len() as u64).to_le_bytes());
        for header in &self.headers {
            hash_bytes(&mut hasher, header.as_bytes());
        }
        hasher.update((self.rows.len() as u64).to_le_bytes());
        for row in &self.rows {
            hasher.update((row.len() as u64).to_le_bytes());
            for cell in row {
                if Self::is_null_value(cell) {
                    hasher.update([CELL_MISSING]);
                } else {
                    hasher.update([CELL_PRESENT]);
                    hash_bytes(&mut hasher, cell.as_bytes());
                }
            }
        }
        format!("sha256:{:x}", hasher.finalize())
    }
}

const CELL_MISSING: u8 = 0;
const CELL_PRESENT: u8 = 1;

fn hash_bytes(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_null_value() {
        assert!(DataTable::is_null_value(""));
        assert!(DataTable::is_null_value("NA"));
        assert!(DataTable::is_null_value("NaN"));
        assert!(DataTable::is_null_value("N/A"));
        assert!(DataTable::is_null_value("null"));
        assert!(DataTable::is_null_value("."));
        assert!(!DataTable::is_null_value("value"));
        assert!(!DataTable::is_null_value("0"));
    }

    #[test]
    fn test_from_rows() {
        let table = DataTable::from_rows(["id", "name"], [["1", "Alice"], ["2", "Bob"]]);

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(1, 1), Some("Bob"));
        assert_eq!(table.get(2, 0), None);
        assert_eq!(table.column_index("name"), Some(1));
    }

    #[test]
    fn test_fingerprint_ignores_null_spelling() {
        let a = DataTable::from_rows(["x"], [["NA"], ["1"]]);
        let b = DataTable::from_rows(["x"], [[""], ["1"]]);
        let c = DataTable::from_rows(["x"], [["2"], ["1"]]);

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
        assert!(a.fingerprint().starts_with("sha256:"));
    }

    #[test]
    fn test_fingerprint_separates_cell_boundaries() {
        let joined = DataTable::from_rows(["a", "b"], [vec!["x\u{1f}y"]]);
        let split = DataTable::from_rows(["a", "b"], [vec!["x", "y"]]);
        assert_ne!(joined.fingerprint(), split.fingerprint());

        let control = DataTable::from_rows(["a"], [["\u{0}"]]);
        let empty = DataTable::from_rows(["a"], [[""]]);
        assert_ne!(control.fingerprint(), empty.fingerprint());

        let header_split = DataTable::from_rows(["ab", "c"], Vec::<Vec<&str>>::new());
        let header_joined = DataTable::from_rows(["a", "bc"], Vec::<Vec<&str>>::new());
        assert_ne!(header_split.fingerprint(), header_joined.fingerprint());
    }
}
