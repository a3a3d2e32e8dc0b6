use super::DateCell;
use chrono::{Local, NaiveDate, TimeDelta};

pub const CANONICAL_FORMAT: &str = "%Y/%m/%d";

/// First serial day where the 1900 phantom leap day has already been counted.
const LEAP_BUG_SERIAL: f64 = 60.0;

/// Largest serial a spreadsheet can hold (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Source of "today" for the fallback branch of [`normalize_date`].
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Converts a sheet date cell into `YYYY/MM/DD`.
///
/// Numeric cells are spreadsheet day counts where day 1 is 1900-01-01. Counts
/// from 60 upward are shifted back by one to cancel the non-existent
/// 1900-02-29. Text cells using `/` or `-` are re-separated and zero-padded,
/// with two-digit years pivoting at 50. Anything unrecognised falls back to the
/// clock's current date.
pub fn normalize_date(cell: &DateCell, clock: &dyn Clock) -> String {
    match cell {
        DateCell::Text(text) if text.contains('/') || text.contains('-') => normalize_text(text),
        DateCell::Serial(serial) => match serial_to_date(*serial) {
            Some(date) => date.format(CANONICAL_FORMAT).to_string(),
            None => clock.today().format(CANONICAL_FORMAT).to_string(),
        },
        DateCell::Native(date) => date.format(CANONICAL_FORMAT).to_string(),
        DateCell::Text(_) | DateCell::Missing => clock.today().format(CANONICAL_FORMAT).to_string(),
    }
}

pub fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial.abs() > MAX_SERIAL {
        return None;
    }

    let mut days = serial.floor() as i64;
    if serial >= LEAP_BUG_SERIAL {
        days -= 1;
    }

    let epoch = NaiveDate::from_ymd_opt(1900, 1, 1)?;
    TimeDelta::try_days(days - 1).and_then(|delta| epoch.checked_add_signed(delta))
}

fn normalize_text(text: &str) -> String {
    let normalized = text.replace('-', "/");
    let parts: Vec<&str> = normalized.split('/').collect();

    if parts.len() != 3 {
        return text.to_string();
    }

    let year = if parts[0].chars().count() == 2 {
        match parts[0].parse::<u32>() {
            Ok(y) if y < 50 => format!("20{}", parts[0]),
            _ => format!("19{}", parts[0]),
        }
    } else {
        parts[0].to_string()
    };

    format!("{}/{:0>2}/{:0>2}", year, parts[1], parts[2])
}
