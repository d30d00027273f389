//! The validator's status vocabulary and how it maps onto cell states.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::input::DataTable;
use crate::state::CellStatus;

/// Accepts bare tokens (`invalid_row`) and enum-style reprs (`ValidationStatus.INVALID_ROW`).
static STATUS_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_]*\.)?([A-Za-z][A-Za-z _-]*)$").unwrap()
});

/// Status values emitted by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// The value passed validation.
    Valid,
    /// The value failed validation.
    Invalid,
    /// The row as a whole failed validation.
    InvalidRow,
    /// The validator did not look at the value.
    NotValidated,
    /// The value failed but a correction may exist.
    Correctable,
}

impl ValidationStatus {
    /// Token written into result sets.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Valid => "valid",
            ValidationStatus::Invalid => "invalid",
            ValidationStatus::InvalidRow => "invalid_row",
            ValidationStatus::NotValidated => "not_validated",
            ValidationStatus::Correctable => "correctable",
        }
    }

    /// Parse a status token, ignoring case, separators and an enum-name prefix.
    pub fn parse(token: &str) -> Option<Self> {
        let captures = STATUS_TOKEN.captures(token.trim())?;
        let normalized: String = captures[1]
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match normalized.as_str() {
            "valid" => Some(ValidationStatus::Valid),
            "invalid" => Some(ValidationStatus::Invalid),
            "invalidrow" => Some(ValidationStatus::InvalidRow),
            "notvalidated" => Some(ValidationStatus::NotValidated),
            "correctable" => Some(ValidationStatus::Correctable),
            _ => None,
        }
    }

    /// Cell state shown for this validation outcome.
    pub fn cell_status(&self) -> CellStatus {
        match self {
            ValidationStatus::Valid => CellStatus::Valid,
            ValidationStatus::Invalid | ValidationStatus::InvalidRow => CellStatus::Invalid,
            ValidationStatus::Correctable => CellStatus::Correctable,
            ValidationStatus::NotValidated => CellStatus::Normal,
        }
    }
}

/// Outcome of reading one `{column}_status` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReading {
    /// A known status token.
    Recognized(ValidationStatus),
    /// No value, or a null-like placeholder.
    Missing,
    /// Something that is not a status token; carries its text for logging.
    Unrecognized(String),
}

impl StatusReading {
    /// Read a status field. Never fails; anything odd becomes `Unrecognized`.
    pub fn from_field(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => StatusReading::Missing,
            Some(Value::String(s)) if DataTable::is_null_value(s) => StatusReading::Missing,
            Some(Value::String(s)) => match ValidationStatus::parse(s) {
                Some(status) => StatusReading::Recognized(status),
                None => StatusReading::Unrecognized(s.clone()),
            },
            Some(other) => StatusReading::Unrecognized(other.to_string()),
        }
    }

    /// Cell state for this reading; everything but a recognized token is `Normal`.
    pub fn cell_status(&self) -> CellStatus {
        match self {
            StatusReading::Recognized(status) => status.cell_status(),
            StatusReading::Missing | StatusReading::Unrecognized(_) => CellStatus::Normal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mapping_table() {
        assert_eq!(ValidationStatus::Valid.cell_status(), CellStatus::Valid);
        assert_eq!(ValidationStatus::Invalid.cell_status(), CellStatus::Invalid);
        assert_eq!(ValidationStatus::InvalidRow.cell_status(), CellStatus::Invalid);
        assert_eq!(ValidationStatus::Correctable.cell_status(), CellStatus::Correctable);
        assert_eq!(ValidationStatus::NotValidated.cell_status(), CellStatus::Normal);
    }

    #[test]
    fn test_parse_token_variants() {
        assert_eq!(ValidationStatus::parse("valid"), Some(ValidationStatus::Valid));
        assert_eq!(ValidationStatus::parse("INVALID"), Some(ValidationStatus::Invalid));
        assert_eq!(ValidationStatus::parse("invalid_row"), Some(ValidationStatus::InvalidRow));
        assert_eq!(
            ValidationStatus::parse("ValidationStatus.NOT_VALIDATED"),
            Some(ValidationStatus::NotValidated)
        );
        assert_eq!(ValidationStatus::parse(" Correctable "), Some(ValidationStatus::Correctable));
        assert_eq!(ValidationStatus::parse("Invalid Row"), Some(ValidationStatus::InvalidRow));
        assert_eq!(ValidationStatus::parse("maybe"), None);
        assert_eq!(ValidationStatus::parse("42"), None);
        assert_eq!(ValidationStatus::parse(""), None);
    }

    #[test]
    fn test_as_str_parses_back() {
        for status in [
            ValidationStatus::Valid,
            ValidationStatus::Invalid,
            ValidationStatus::InvalidRow,
            ValidationStatus::NotValidated,
            ValidationStatus::Correctable,
        ] {
            assert_eq!(ValidationStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_reading_fields() {
        assert_eq!(StatusReading::from_field(None), StatusReading::Missing);
        assert_eq!(StatusReading::from_field(Some(&Value::Null)), StatusReading::Missing);
        assert_eq!(StatusReading::from_field(Some(&json!("nan"))), StatusReading::Missing);
        assert_eq!(
            StatusReading::from_field(Some(&json!("invalid"))),
            StatusReading::Recognized(ValidationStatus::Invalid)
        );
        assert_eq!(
            StatusReading::from_field(Some(&json!(3))),
            StatusReading::Unrecognized("3".to_string())
        );
        assert_eq!(
            StatusReading::from_field(Some(&json!({"bad": true}))).cell_status(),
            CellStatus::Normal
        );
    }
}
