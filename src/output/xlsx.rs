//! Workbook writing with `rust_xlsxwriter`.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, ExcelDateTime, Format, FormatAlign, Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::Path;
use std::time::Instant;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{PAYOUT_COLUMNS, PayoutRow, VALIDATION_COLUMNS, ValidationRow};

/// Sheet name of the payout table.
pub const PAYOUT_SHEET: &str = "Resultado";

/// Sheet name of the validation report.
pub const VALIDATION_SHEET: &str = "Validacao";

const DEFAULT_WIDTH: f64 = 15.0;
const COMPETENCE_WIDTH: f64 = 12.0;
const MONEY_WIDTH: f64 = 18.0;

const ADMISSION_COL: u16 = 1;
const COMPETENCE_COL: u16 = 3;
const MONEY_COLS: [u16; 4] = [5, 6, 7, 8];

struct Formats {
    header: Format,
    date: Format,
    competence: Format,
    money: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(Color::Black)
                .set_align(FormatAlign::Center),
            date: Format::new().set_num_format("dd/mm/yyyy"),
            competence: Format::new().set_num_format("mm/yyyy"),
            money: Format::new().set_num_format("R$ #,##0.00"),
        }
    }
}

fn output_error(path: &Path) -> impl Fn(XlsxError) -> EngineError + '_ {
    move |e| EngineError::OutputWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn ensure_parent(path: &Path) -> EngineResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| EngineError::OutputWrite {
                path: path.display().to_string(),
                message: format!("failed to create directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, XlsxError> {
    ExcelDateTime::from_ymd(
        u16::try_from(date.year()).unwrap_or_default(),
        date.month() as u8,
        date.day() as u8,
    )
}

fn money(amount: Decimal) -> f64 {
    amount.to_f64().unwrap_or_default()
}

fn write_header(
    worksheet: &mut Worksheet,
    columns: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, format)?;
    }
    Ok(())
}

fn write_payout_rows(
    worksheet: &mut Worksheet,
    rows: &[PayoutRow],
    formats: &Formats,
) -> Result<(), XlsxError> {
    worksheet.set_name(PAYOUT_SHEET)?;
    write_header(worksheet, &PAYOUT_COLUMNS, &formats.header)?;

    for (index, row) in rows.iter().enumerate() {
        let r = index as u32 + 1;
        worksheet.write_number(r, 0, row.employee_id as f64)?;
        if let Some(admission) = row.admission_date {
            worksheet.write_datetime_with_format(
                r,
                ADMISSION_COL,
                &excel_date(admission)?,
                &formats.date,
            )?;
        }
        worksheet.write_string(r, 2, &row.union)?;
        worksheet.write_datetime_with_format(
            r,
            COMPETENCE_COL,
            &excel_date(row.competence)?,
            &formats.competence,
        )?;
        worksheet.write_number(r, 4, f64::from(row.eligible_days))?;
        let amounts = [
            row.daily_rate,
            row.total,
            row.employer_share,
            row.employee_share,
        ];
        for (col, amount) in MONEY_COLS.iter().zip(amounts) {
            worksheet.write_number_with_format(r, *col, money(amount), &formats.money)?;
        }
        if !row.observation.is_empty() {
            worksheet.write_string(r, 9, &row.observation)?;
        }
    }

    for col in 0..PAYOUT_COLUMNS.len() as u16 {
        let width = if col == COMPETENCE_COL {
            COMPETENCE_WIDTH
        } else if MONEY_COLS.contains(&col) {
            MONEY_WIDTH
        } else {
            DEFAULT_WIDTH
        };
        worksheet.set_column_width(col, width)?;
    }
    Ok(())
}

/// Writes the payout table to `path`, creating parent directories.
///
/// Fails with `OutputWrite` when the workbook cannot be saved.
pub fn write_payout_table(rows: &[PayoutRow], path: &Path) -> EngineResult<()> {
    let start_time = Instant::now();
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let formats = Formats::new();
    write_payout_rows(workbook.add_worksheet(), rows, &formats).map_err(output_error(path))?;
    workbook.save(path).map_err(output_error(path))?;

    info!(
        path = %path.display(),
        rows = rows.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Payout table written"
    );
    Ok(())
}

/// Writes the validation report to `path`, creating parent directories.
pub fn write_validation_report(rows: &[ValidationRow], path: &Path) -> EngineResult<()> {
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let write = |worksheet: &mut Worksheet| -> Result<(), XlsxError> {
        worksheet.set_name(VALIDATION_SHEET)?;
        for (col, name) in VALIDATION_COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *name)?;
        }
        for (index, row) in rows.iter().enumerate() {
            let r = index as u32 + 1;
            worksheet.write_number(r, 0, row.employee_id as f64)?;
            worksheet.write_string(r, 1, &row.text)?;
        }
        Ok(())
    };
    write(worksheet).map_err(output_error(path))?;
    workbook.save(path).map_err(output_error(path))?;

    info!(path = %path.display(), rows = rows.len(), "Validation report written");
    Ok(())
}
