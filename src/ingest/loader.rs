use super::{DateCell, RawRow, ScoreCell};
use crate::error::{ReportError, ReportResult};
use crate::schema::{required_fields, ScoreField, DATE_FIELD, NAME_FIELD};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info};

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A cell before it is read as a name, date or score.
#[derive(Debug, Clone, PartialEq)]
enum SheetCell {
    Raw(String),
    Number(f64),
    Date(NaiveDate),
    Empty,
}

impl SheetCell {
    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => SheetCell::Empty,
            Data::Float(v) => SheetCell::Number(*v),
            Data::Int(v) => SheetCell::Number(*v as f64),
            Data::String(s) => SheetCell::Raw(s.clone()),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => SheetCell::Date(datetime.date()),
                None => SheetCell::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => s
                .get(..10)
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
                .map_or_else(|| SheetCell::Raw(s.clone()), SheetCell::Date),
            other => SheetCell::Raw(other.to_string()),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            SheetCell::Empty => true,
            SheetCell::Raw(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    fn text(&self) -> String {
        match self {
            SheetCell::Raw(s) => s.trim().to_string(),
            SheetCell::Number(v) => v.to_string(),
            SheetCell::Date(d) => d.to_string(),
            SheetCell::Empty => String::new(),
        }
    }

    fn score(&self) -> ScoreCell {
        match self {
            SheetCell::Number(v) if v.is_finite() => ScoreCell::Number(*v),
            other => ScoreCell::parse(&other.text()),
        }
    }

    fn date(&self) -> DateCell {
        match self {
            SheetCell::Number(v) if v.is_finite() => DateCell::Serial(*v),
            SheetCell::Date(d) => DateCell::Native(*d),
            other => DateCell::parse(&other.text()),
        }
    }
}

/// Loads assessment rows from a table with a header row.
///
/// Spreadsheet workbooks (`.xlsx`, `.xls`, `.ods`, ...) are read from their
/// first sheet. `.tsv` files are read tab-separated, everything else
/// comma-separated.
pub fn load_rows<P: AsRef<Path>>(path: P) -> ReportResult<Vec<RawRow>> {
    let path = path.as_ref();
    info!("📂 Loading assessment rows from {:?}", path);

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
        return rows_from_workbook(open_workbook_auto(path)?);
    }

    let delimiter = if ext == "tsv" { b'\t' } else { b',' };
    let file = File::open(path)?;
    load_rows_from_reader(file, delimiter)
}

pub fn load_rows_from_reader<R: Read>(reader: R, delimiter: u8) -> ReportResult<Vec<RawRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let records = rdr.records().map(|result| {
        result
            .map(|rec| rec.iter().map(|c| SheetCell::Raw(c.to_string())).collect())
            .map_err(ReportError::from)
    });

    build_rows(headers, records)
}

/// Reads the first sheet of an in-memory workbook of any supported format.
pub fn load_rows_from_workbook<RS: Read + Seek + Clone>(reader: RS) -> ReportResult<Vec<RawRow>> {
    rows_from_workbook(open_workbook_auto_from_rs(reader)?)
}

fn rows_from_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>) -> ReportResult<Vec<RawRow>> {
    if let Some(name) = workbook.sheet_names().first() {
        debug!("Reading sheet '{}'", name);
    }

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReportError::EmptyInput)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let records = rows.map(|row| Ok(row.iter().map(SheetCell::from_data).collect()));

    build_rows(headers, records)
}

fn build_rows<I>(headers: Vec<String>, records: I) -> ReportResult<Vec<RawRow>>
where
    I: Iterator<Item = ReportResult<Vec<SheetCell>>>,
{
    let headers: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let columns: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let missing: Vec<String> = required_fields()
        .into_iter()
        .filter(|f| !columns.contains_key(f))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        return Err(ReportError::Schema { missing });
    }

    let name_idx = columns[NAME_FIELD];
    let date_idx = columns[DATE_FIELD];
    let score_idx: Vec<(ScoreField, usize)> = ScoreField::iter()
        .map(|f| (f, columns[f.label()]))
        .collect();

    let empty = SheetCell::Empty;
    let mut rows = Vec::new();
    let mut blank = 0;

    for result in records {
        let rec = result?;
        if rec.iter().all(SheetCell::is_blank) {
            blank += 1;
            continue;
        }

        let cell = |idx: usize| rec.get(idx).unwrap_or(&empty);

        let scores: BTreeMap<ScoreField, ScoreCell> = score_idx
            .iter()
            .map(|(field, idx)| (*field, cell(*idx).score()))
            .collect();

        rows.push(RawRow {
            name: cell(name_idx).text(),
            date: cell(date_idx).date(),
            scores,
        });
    }

    if blank > 0 {
        debug!("Skipped {} blank rows", blank);
    }

    if rows.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    info!("   -> Loaded {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "姓名,日期,想明白,讲清楚,执行到位,管自己,管业务,管团队,劳模型,好人型,严师型,遥控型,隐身型,黄牛型,军师型,内敛型";

    #[test]
    fn test_reads_rows_in_order() {
        let data = format!(
            "{}\n张三,45292,90,80,70,60,50,40,10,20,30,40,50,60,70,80\n李四,2024-1-5,1,2,3,4,5,6,7,8,9,10,11,12,13,14\n",
            HEADER
        );
        let rows = load_rows_from_reader(data.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "张三");
        assert_eq!(rows[0].date, DateCell::Serial(45292.0));
        assert_eq!(rows[0].value(ScoreField::ThinkClearly), 90.0);
        assert_eq!(rows[1].date, DateCell::Text("2024-1-5".into()));
        assert_eq!(rows[1].value(ScoreField::Reserved), 14.0);
    }

    #[test]
    fn test_missing_columns_are_listed() {
        let data = "姓名,日期,想明白\n张三,1,2\n";
        let err = load_rows_from_reader(data.as_bytes(), b',').unwrap_err();
        match err {
            ReportError::Schema { missing } => {
                assert_eq!(missing.len(), 13);
                assert!(missing.contains(&"讲清楚".to_string()));
                assert!(!missing.contains(&"想明白".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_workbook_cells_keep_their_shape() {
        let bytes = include_bytes!("../../tests/fixtures/batch.xlsx");
        let rows = load_rows_from_workbook(std::io::Cursor::new(bytes.to_vec())).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "张三");
        assert_eq!(
            rows[0].date,
            DateCell::Native(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(rows[0].value(ScoreField::ThinkClearly), 90.0);
        assert_eq!(rows[1].date, DateCell::Text("2024-3-8".into()));
        assert_eq!(
            rows[1].score(ScoreField::Reserved),
            Some(&ScoreCell::Text("缺考".into()))
        );
        assert_eq!(rows[2].date, DateCell::Serial(45293.0));
    }

    #[test]
    fn test_sheet_cell_conversions() {
        assert_eq!(SheetCell::from_data(&Data::Int(7)).score(), ScoreCell::Number(7.0));
        assert_eq!(SheetCell::from_data(&Data::Empty).date(), DateCell::Missing);
        assert_eq!(
            SheetCell::from_data(&Data::DateTimeIso("2024-02-03T00:00:00".into())).date(),
            DateCell::Native(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap())
        );
        assert_eq!(SheetCell::Raw(" 12 ".into()).score(), ScoreCell::Number(12.0));
    }

    #[test]
    fn test_header_only_is_empty_input() {
        let data = format!("{}\n", HEADER);
        let err = load_rows_from_reader(data.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, ReportError::EmptyInput));
    }

    #[test]
    fn test_bom_and_blank_rows() {
        let data = format!(
            "\u{feff}{}\n,,,,,,,,,,,,,,,\n王五,,1,2,3,4,5,6,7,8,9,10,11,12,13,x\n",
            HEADER
        );
        let rows = load_rows_from_reader(data.as_bytes(), b',').unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, DateCell::Missing);
        assert_eq!(
            rows[0].score(ScoreField::Reserved),
            Some(&ScoreCell::Text("x".into()))
        );
    }
}
