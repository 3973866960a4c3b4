//! In-memory tabular data.
//!
//! A [`Table`] is the first worksheet of a source file: one header row plus
//! typed [`Cell`]s. Headers are whitespace-normalized on construction so
//! lookups are insensitive to stray spaces in the extracts.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use std::str::FromStr;

use crate::calculation::normalize_text;

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// No value.
    Empty,
    /// Free text.
    Text(String),
    /// Any numeric value (spreadsheets do not distinguish integers).
    Number(f64),
    /// Boolean value.
    Bool(bool),
    /// A date or timestamp typed as such in the source.
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Returns true for missing values: empty cells, blank text and NaN.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n) => n.is_nan(),
            Cell::Bool(_) | Cell::DateTime(_) => false,
        }
    }

    /// Coerces the cell to an integer identity, truncating fractions.
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_engine::sources::Cell;
    ///
    /// assert_eq!(Cell::Number(34941.0).as_integer(), Some(34941));
    /// assert_eq!(Cell::Text(" 1203 ".into()).as_integer(), Some(1203));
    /// assert_eq!(Cell::Text("n/a".into()).as_integer(), None);
    /// assert_eq!(Cell::Empty.as_integer(), None);
    /// ```
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite())
                        .map(|n| n.trunc() as i64)
                })
            }
            _ => None,
        }
    }

    /// Renders the cell as text; integral numbers drop their decimals.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => format!("{}", n),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Reads a monetary amount.
    ///
    /// Text accepts an optional `R$` prefix and Brazilian separators
    /// (`1.234,56`).
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_engine::sources::Cell;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Cell::Number(37.5).as_decimal(), Some(Decimal::new(375, 1)));
    /// assert_eq!(Cell::Text("R$ 35,00".into()).as_decimal(), Some(Decimal::new(3500, 2)));
    /// ```
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) if n.is_finite() => Decimal::from_f64(*n),
            Cell::Text(s) => parse_amount(s),
            _ => None,
        }
    }
}

fn parse_amount(text: &str) -> Option<Decimal> {
    let trimmed = text.trim().trim_start_matches("R$").trim();
    if trimmed.is_empty() {
        return None;
    }
    let canonical = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&canonical).ok()
}

/// The first worksheet of a source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Creates a table, normalizing header whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use vr_engine::sources::{Cell, Table};
    ///
    /// let table = Table::new(
    ///     vec!["MATRICULA".into(), "  TITULO   DO CARGO ".into()],
    ///     vec![vec![Cell::Number(1.0), Cell::Text("ANALISTA".into())]],
    /// );
    /// assert_eq!(table.column("TITULO DO CARGO"), Some(1));
    /// assert_eq!(table.len(), 1);
    /// ```
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            headers: headers.iter().map(|h| normalize_text(h)).collect(),
            rows,
        }
    }

    /// A table with no headers and no rows.
    pub const fn empty() -> Self {
        Self {
            headers: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// The normalized header names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column whose header equals `name`, ignoring case.
    pub fn column(&self, name: &str) -> Option<usize> {
        let wanted = normalize_text(name).to_uppercase();
        self.headers.iter().position(|h| h.to_uppercase() == wanted)
    }

    /// Index of the first column whose header contains `fragment`, ignoring case.
    pub fn column_containing(&self, fragment: &str) -> Option<usize> {
        let wanted = fragment.to_uppercase();
        self.headers
            .iter()
            .position(|h| h.to_uppercase().contains(&wanted))
    }

    /// The cell at `row`, `col`; short rows read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Iterates over the data rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Iterates over one column, padding short rows with empty cells.
    pub fn values(&self, col: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |r| r.get(col).unwrap_or(&EMPTY_CELL))
    }
}
