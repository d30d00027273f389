//! Per-cell state values and the merge rule.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Address of one cell in the current backing table.
///
/// The store never interprets rows or columns; bounds are the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub column: usize,
}

impl Coordinate {
    /// Create a coordinate.
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<(usize, usize)> for Coordinate {
    fn from((row, column): (usize, usize)) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Display state of a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellStatus {
    /// State could not be determined.
    Unknown,
    /// Validated and found acceptable.
    Valid,
    /// No assertion made. Implicit for cells without a record.
    #[default]
    Normal,
    /// Validated and rejected.
    Invalid,
    /// Has correction suggestions available.
    Correctable,
    /// A correction has been applied.
    Corrected,
    /// Work on the cell is in flight.
    Processing,
    /// Non-blocking issue.
    Warning,
    /// Informational annotation.
    Info,
}

impl CellStatus {
    /// Every status, in declaration order.
    pub const ALL: [CellStatus; 9] = [
        CellStatus::Unknown,
        CellStatus::Valid,
        CellStatus::Normal,
        CellStatus::Invalid,
        CellStatus::Correctable,
        CellStatus::Corrected,
        CellStatus::Processing,
        CellStatus::Warning,
        CellStatus::Info,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            CellStatus::Unknown => "Unknown",
            CellStatus::Valid => "Valid",
            CellStatus::Normal => "Normal",
            CellStatus::Invalid => "Invalid",
            CellStatus::Correctable => "Correctable",
            CellStatus::Corrected => "Corrected",
            CellStatus::Processing => "Processing",
            CellStatus::Warning => "Warning",
            CellStatus::Info => "Info",
        }
    }

    /// Check if the status flags something a reviewer should look at.
    pub fn needs_attention(&self) -> bool {
        matches!(
            self,
            CellStatus::Invalid | CellStatus::Correctable | CellStatus::Warning
        )
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A proposed replacement value for a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionSuggestion {
    /// Value currently in the cell.
    pub original_value: String,
    /// Proposed replacement.
    pub corrected_value: String,
    /// Producer's confidence (0.0-1.0), when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// What produced this suggestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CorrectionSuggestion {
    /// Create a new suggestion.
    pub fn new(original_value: impl Into<String>, corrected_value: impl Into<String>) -> Self {
        Self {
            original_value: original_value.into(),
            corrected_value: corrected_value.into(),
            confidence: None,
            source: None,
        }
    }

    /// Set the confidence.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the producer name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// The full merged state for one cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellRecord {
    /// Display status.
    pub status: CellStatus,
    /// Human-readable explanation, usually a validation message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Correction suggestions, in producer order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<CorrectionSuggestion>,
}

impl CellRecord {
    /// Create a record with the given status and default fields.
    pub fn new(status: CellStatus) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Set the detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the suggestions.
    pub fn with_suggestions(mut self, suggestions: Vec<CorrectionSuggestion>) -> Self {
        self.suggestions = suggestions;
        self
    }

    /// Check if every field holds its default.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Apply a partial update, keeping every field the update leaves unset.
    pub fn merge(&self, update: CellUpdate) -> CellRecord {
        let CellUpdate {
            status,
            detail,
            suggestions,
        } = update;

        CellRecord {
            status: status.unwrap_or(self.status),
            detail: match detail {
                Some(detail) => detail,
                None => self.detail.clone(),
            },
            suggestions: match suggestions {
                Some(suggestions) => suggestions,
                None => self.suggestions.clone(),
            },
        }
    }
}

/// A partial change to a [`CellRecord`]. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellUpdate {
    /// New status.
    pub status: Option<CellStatus>,
    /// New detail; `Some(None)` clears it.
    pub detail: Option<Option<String>>,
    /// Replacement suggestion list.
    pub suggestions: Option<Vec<CorrectionSuggestion>>,
}

impl CellUpdate {
    /// Create an update that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the status.
    pub fn status(mut self, status: CellStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set the detail; `None` clears it.
    pub fn detail(mut self, detail: Option<String>) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Replace the suggestion list.
    pub fn suggestions(mut self, suggestions: Vec<CorrectionSuggestion>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    /// Check if the update supplies no fields.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.detail.is_none() && self.suggestions.is_none()
    }
}

impl From<CellRecord> for CellUpdate {
    fn from(record: CellRecord) -> Self {
        let CellRecord {
            status,
            detail,
            suggestions,
        } = record;
        Self {
            status: Some(status),
            detail: Some(detail),
            suggestions: Some(suggestions),
        }
    }
}

impl From<CellStatus> for CellUpdate {
    fn from(status: CellStatus) -> Self {
        Self::new().status(status)
    }
}
