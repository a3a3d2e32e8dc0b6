pub mod date;
pub mod loader;
pub mod validate;

pub use self::date::{normalize_date, Clock, FixedClock, SystemClock};
pub use self::loader::{load_rows, load_rows_from_reader, load_rows_from_workbook};
pub use self::validate::{validate_rows, RangeViolation, ValidationReport};

use crate::schema::ScoreField;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// A score cell as it appeared in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreCell {
    Number(f64),
    Text(String),
}

impl ScoreCell {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => ScoreCell::Number(v),
            _ => ScoreCell::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScoreCell::Number(v) => Some(*v),
            ScoreCell::Text(_) => None,
        }
    }
}

/// A date cell of unknown shape: spreadsheet serial, free text or a real date.
#[derive(Debug, Clone, PartialEq)]
pub enum DateCell {
    Serial(f64),
    Text(String),
    Native(NaiveDate),
    Missing,
}

impl DateCell {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return DateCell::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => DateCell::Serial(v),
            _ => DateCell::Text(trimmed.to_string()),
        }
    }
}

/// One assessment row: a person, a date and the 14 scores.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub name: String,
    pub date: DateCell,
    pub scores: BTreeMap<ScoreField, ScoreCell>,
}

impl RawRow {
    pub fn score(&self, field: ScoreField) -> Option<&ScoreCell> {
        self.scores.get(&field)
    }

    /// Numeric value used for derivation. Non-numeric or absent cells count as zero.
    pub fn value(&self, field: ScoreField) -> f64 {
        self.score(field).and_then(ScoreCell::as_number).unwrap_or(0.0)
    }

    /// Convenience constructor for fully numeric rows.
    pub fn from_values(name: &str, date: DateCell, values: &[(ScoreField, f64)]) -> Self {
        Self {
            name: name.to_string(),
            date,
            scores: values
                .iter()
                .map(|(f, v)| (*f, ScoreCell::Number(*v)))
                .collect(),
        }
    }
}
