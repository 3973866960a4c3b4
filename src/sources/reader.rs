//! Spreadsheet reading.
//!
//! Reads the first worksheet of a workbook (xlsx, xls, xlsb, ods) into a
//! [`Table`], taking the first row as headers.

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::table::{Cell, Table};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Reads the first worksheet of `path`.
///
/// Fully blank rows are dropped. Fails with `SourceNotFound` when the file
/// does not exist and `SourceMalformed` when it cannot be opened as a
/// workbook.
pub fn read_table(path: &Path) -> EngineResult<Table> {
    let path_str = path.display().to_string();

    if !path.is_file() {
        return Err(EngineError::SourceNotFound { path: path_str });
    }

    let mut workbook: Sheets<_> =
        open_workbook_auto(path).map_err(|e| EngineError::SourceMalformed {
            path: path_str.clone(),
            message: e.to_string(),
        })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| EngineError::SourceMalformed {
            path: path_str.clone(),
            message: "workbook contains no sheets".to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| EngineError::SourceMalformed {
            path: path_str.clone(),
            message: format!("failed to read sheet '{}': {}", sheet_name, e),
        })?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|row| row.iter().map(|cell| convert_cell(cell).as_text()).collect())
        .unwrap_or_default();

    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    Ok(Table::new(headers, body))
}

fn convert_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            serial_to_datetime(dt.as_f64()).map_or(Cell::Number(dt.as_f64()), Cell::DateTime)
        }
        Data::DateTimeIso(s) => parse_iso(s).map_or_else(|| Cell::Text(s.clone()), Cell::DateTime),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        // Formula errors (#N/A, #REF!) read as missing values
        Data::Error(_) => Cell::Empty,
    }
}

/// Converts a spreadsheet serial number (1900 date system) to a timestamp.
///
/// # Examples
///
/// ```
/// use vr_engine::sources::serial_to_datetime;
/// use chrono::NaiveDate;
///
/// let dt = serial_to_datetime(45792.5).unwrap();
/// assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 5, 15).unwrap());
/// ```
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * SECONDS_PER_DAY).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
