use super::{RawRow, ScoreCell};
use crate::schema::ScoreField;
use serde::Serialize;
use std::fmt;
use strum::IntoEnumIterator;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

/// Sheet rows are 1-based and the first one holds the header.
const DISPLAY_ROW_OFFSET: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeViolation {
    pub display_row: usize,
    pub field: String,
    pub value: f64,
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}: {} out of range ({}-{}): {}",
            self.display_row, self.field, SCORE_MIN, SCORE_MAX, self.value
        )
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub violations: Vec<RangeViolation>,
}

/// Flags every numeric score outside `[0, 100]`. Text cells are not checked.
pub fn validate_rows(rows: &[RawRow]) -> ValidationReport {
    let mut violations = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        for field in ScoreField::iter() {
            if let Some(ScoreCell::Number(value)) = row.score(field) {
                if *value < SCORE_MIN || *value > SCORE_MAX {
                    violations.push(RangeViolation {
                        display_row: index + DISPLAY_ROW_OFFSET,
                        field: field.label().to_string(),
                        value: *value,
                    });
                }
            }
        }
    }

    let errors: Vec<String> = violations.iter().map(ToString::to_string).collect();

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        violations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::DateCell;

    fn row_with(value: f64, field: ScoreField) -> RawRow {
        let values: Vec<(ScoreField, f64)> = ScoreField::iter()
            .map(|f| (f, if f == field { value } else { 50.0 }))
            .collect();
        RawRow::from_values("测试", DateCell::Missing, &values)
    }

    #[test]
    fn test_in_range_rows_are_valid() {
        let rows = vec![row_with(0.0, ScoreField::Execute), row_with(100.0, ScoreField::NiceGuy)];
        let report = validate_rows(&rows);
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_out_of_range_reports_display_row() {
        let rows = vec![
            row_with(50.0, ScoreField::Execute),
            row_with(101.0, ScoreField::ManageTeam),
        ];
        let report = validate_rows(&rows);
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.violations[0].display_row, 3);
        assert_eq!(report.violations[0].field, "管团队");
        assert!(report.errors[0].contains("Row 3"));
        assert!(report.errors[0].contains("管团队"));
    }

    #[test]
    fn test_negative_and_text_cells() {
        let mut row = row_with(-1.0, ScoreField::Strategist);
        row.scores
            .insert(ScoreField::Execute, ScoreCell::Text("缺考".into()));
        let report = validate_rows(&[row]);
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].field, "军师型");
    }
}
