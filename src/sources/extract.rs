//! Typed extraction of the loaded tables.
//!
//! Turns the loosely-typed spreadsheets into the records the calculation
//! stages work on. Missing optional columns default; a missing join key is
//! `JoinKeyUnresolved`. Joins are left joins keyed by employee ID, and a
//! duplicated ID in a source keeps its first row so joins never fan out.

use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};

use tracing::warn;

use crate::calculation::{normalize_text, parse_date};
use crate::error::{EngineError, EngineResult};
use crate::models::{EmployeeId, EmployeeRecord};

use super::registry::{SourceKind, SourceStore};
use super::table::{Cell, Table};

/// Employee ID column shared by most extracts.
pub const ID_COLUMN: &str = "MATRICULA";
/// Employee ID column of the expatriate extract.
pub const EXPATRIATE_ID_COLUMN: &str = "Cadastro";

const ROLE_TITLE_COLUMN: &str = "TITULO DO CARGO";
const UNION_COLUMN: &str = "Sindicato";
const ADMISSION_COLUMN: &str = "Admissão";
const TERMINATION_COLUMN: &str = "DATA DEMISSÃO";
const NOTICE_COLUMN: &str = "COMUNICADO DE DESLIGAMENTO";
const VACATION_COLUMN: &str = "DIAS DE FÉRIAS";
const STATE_COLUMN_FRAGMENT: &str = "ESTADO";
const RATE_COLUMN: &str = "VALOR";

/// Business days per normalized union name.
pub type UnionCalendar = HashMap<String, u32>;

/// Daily voucher rate per normalized state name.
pub type RateTable = HashMap<String, Decimal>;

/// Termination dates of one employee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TerminationInfo {
    termination_date: Option<chrono::NaiveDate>,
    notice_date: Option<chrono::NaiveDate>,
}

fn require_column(table: &Table, kind: SourceKind, column: &str) -> EngineResult<usize> {
    table
        .column(column)
        .ok_or_else(|| EngineError::JoinKeyUnresolved {
            source_name: kind.key().to_string(),
            column: format!("missing column '{}'", column),
        })
}

/// Maps each employee ID in `table` to a value read from its row.
///
/// Rows without a usable ID are skipped; duplicate IDs keep the first row.
fn keyed_rows<T, F>(
    table: &Table,
    kind: SourceKind,
    id_col: usize,
    read: F,
) -> HashMap<EmployeeId, T>
where
    F: Fn(&[Cell]) -> T,
{
    let mut map = HashMap::with_capacity(table.len());
    let mut duplicates = 0usize;
    for row in table.rows() {
        let Some(id) = row.get(id_col).and_then(Cell::as_integer) else {
            continue;
        };
        if map.contains_key(&id) {
            duplicates += 1;
            continue;
        }
        map.insert(id, read(row));
    }
    if duplicates > 0 {
        warn!(source = %kind, duplicates, "Duplicate employee IDs; keeping first occurrence");
    }
    map
}

fn cell_at(row: &[Cell], col: Option<usize>) -> Option<&Cell> {
    col.and_then(|c| row.get(c))
}

/// Reads a non-negative whole count, treating anything non-numeric as absent.
fn count_value(cell: &Cell) -> Option<u32> {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok()?,
        _ => return None,
    };
    if !value.is_finite() {
        return None;
    }
    Some(value.trunc().clamp(0.0, f64::from(u32::MAX)) as u32)
}

/// Builds the joined roster from the active, admission, termination and
/// vacation extracts, in active-roster order.
pub fn roster(store: &SourceStore) -> EngineResult<Vec<EmployeeRecord>> {
    let active = store.table(SourceKind::Active);
    if active.is_empty() {
        return Ok(Vec::new());
    }

    let id_col = require_column(active, SourceKind::Active, ID_COLUMN)?;
    let title_col = active.column(ROLE_TITLE_COLUMN);
    let union_col = active.column(UNION_COLUMN);

    let admissions = admission_dates(store)?;
    let terminations = termination_info(store)?;
    let vacations = vacation_days(store)?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(active.len());
    let mut skipped = 0usize;

    for row in active.rows() {
        let Some(id) = row.get(id_col).and_then(Cell::as_integer) else {
            skipped += 1;
            continue;
        };
        if !seen.insert(id) {
            warn!(employee_id = id, "Duplicate employee in active roster; keeping first row");
            continue;
        }

        let termination = terminations.get(&id).copied().unwrap_or_default();
        records.push(EmployeeRecord {
            id,
            role_title: cell_at(row, title_col).map(Cell::as_text).unwrap_or_default(),
            union: cell_at(row, union_col)
                .map(|c| normalize_text(&c.as_text()))
                .unwrap_or_default(),
            admission_date: admissions.get(&id).copied().flatten(),
            termination_date: termination.termination_date,
            termination_notice_date: termination.notice_date,
            vacation_days: vacations.get(&id).copied().unwrap_or(0),
        });
    }

    if skipped > 0 {
        warn!(skipped, "Active roster rows without a usable employee ID were skipped");
    }

    Ok(records)
}

fn admission_dates(
    store: &SourceStore,
) -> EngineResult<HashMap<EmployeeId, Option<chrono::NaiveDate>>> {
    let table = store.table(SourceKind::Admissions);
    // Without an admission date column there is nothing to join
    let Some(date_col) = table.column(ADMISSION_COLUMN) else {
        return Ok(HashMap::new());
    };
    let id_col = require_column(table, SourceKind::Admissions, ID_COLUMN)?;
    Ok(keyed_rows(table, SourceKind::Admissions, id_col, |row| {
        cell_at(row, Some(date_col)).and_then(parse_date)
    }))
}

fn termination_info(store: &SourceStore) -> EngineResult<HashMap<EmployeeId, TerminationInfo>> {
    let table = store.table(SourceKind::Terminations);
    if table.is_empty() {
        return Ok(HashMap::new());
    }
    let id_col = require_column(table, SourceKind::Terminations, ID_COLUMN)?;
    let termination_col = table.column(TERMINATION_COLUMN);
    let notice_col = table.column(NOTICE_COLUMN);
    Ok(keyed_rows(table, SourceKind::Terminations, id_col, |row| {
        TerminationInfo {
            termination_date: cell_at(row, termination_col).and_then(parse_date),
            notice_date: cell_at(row, notice_col).and_then(parse_date),
        }
    }))
}

fn vacation_days(store: &SourceStore) -> EngineResult<HashMap<EmployeeId, u32>> {
    let table = store.table(SourceKind::Vacations);
    if table.is_empty() {
        return Ok(HashMap::new());
    }
    let id_col = require_column(table, SourceKind::Vacations, ID_COLUMN)?;
    let days_col = table.column(VACATION_COLUMN);
    Ok(keyed_rows(table, SourceKind::Vacations, id_col, |row| {
        cell_at(row, days_col).and_then(count_value).unwrap_or(0)
    }))
}

/// Collects the employee IDs in `column` of the `kind` extract.
///
/// Missing values and non-numeric IDs are dropped. When `required` is false
/// an absent column yields an empty set instead of `JoinKeyUnresolved`.
pub fn id_set(
    store: &SourceStore,
    kind: SourceKind,
    column: &str,
    required: bool,
) -> EngineResult<BTreeSet<EmployeeId>> {
    let table = store.table(kind);
    let col = match table.column(column) {
        Some(col) => col,
        None if !required || table.is_empty() => return Ok(BTreeSet::new()),
        None => return require_column(table, kind, column).map(|_| BTreeSet::new()),
    };
    Ok(table.values(col).filter_map(Cell::as_integer).collect())
}

/// Reads the union calendar: first column is the union, second its days.
///
/// Rows whose day count is not numeric are skipped.
pub fn union_calendar(store: &SourceStore) -> EngineResult<UnionCalendar> {
    let table = store.table(SourceKind::BusinessDays);
    if table.headers().len() < 2 {
        if table.is_empty() {
            return Ok(UnionCalendar::new());
        }
        return Err(EngineError::JoinKeyUnresolved {
            source_name: SourceKind::BusinessDays.key().to_string(),
            column: "expected union and business-day columns".to_string(),
        });
    }

    let mut calendar = UnionCalendar::with_capacity(table.len());
    for row in table.rows() {
        let union = row.first().map(|c| normalize_text(&c.as_text())).unwrap_or_default();
        let Some(days) = row.get(1).and_then(count_value) else {
            continue;
        };
        calendar.entry(union).or_insert(days);
    }
    Ok(calendar)
}

/// Reads the state rate table.
///
/// The state column is the first whose header contains `ESTADO`; the rate
/// column is `VALOR`. Both are required.
pub fn state_rates(store: &SourceStore) -> EngineResult<RateTable> {
    let table = store.table(SourceKind::UnionRates);
    let state_col = table
        .column_containing(STATE_COLUMN_FRAGMENT)
        .ok_or_else(|| EngineError::JoinKeyUnresolved {
            source_name: SourceKind::UnionRates.key().to_string(),
            column: format!("no column containing '{}'", STATE_COLUMN_FRAGMENT),
        })?;
    let rate_col = require_column(table, SourceKind::UnionRates, RATE_COLUMN)?;

    let mut rates = RateTable::with_capacity(table.len());
    for row in table.rows() {
        let state = row.get(state_col).map(|c| normalize_text(&c.as_text())).unwrap_or_default();
        let Some(rate) = row.get(rate_col).and_then(Cell::as_decimal) else {
            continue;
        };
        if state.is_empty() {
            continue;
        }
        rates.entry(state).or_insert(rate);
    }
    Ok(rates)
}
