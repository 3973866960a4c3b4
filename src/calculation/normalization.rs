//! Text and date normalization.
//!
//! These are the pure helpers every extract goes through before joining:
//! whitespace normalization of free text, day-first date parsing, and the
//! union name → state code → state name chain used for pricing.

use chrono::NaiveDate;

use crate::sources::{Cell, serial_to_datetime};

/// The Brazilian state codes recognized in union names, in match priority.
pub const STATE_CODES: [&str; 25] = [
    "SP", "RJ", "RS", "PR", "SC", "MG", "ES", "BA", "PE", "CE", "DF", "GO", "MT", "MS", "PA", "AM",
    "RN", "PB", "AL", "PI", "RO", "RR", "AP", "AC", "TO",
];

/// Collapses runs of whitespace to one space and trims both ends.
///
/// # Example
///
/// ```
/// use vr_engine::calculation::normalize_text;
///
/// assert_eq!(normalize_text("  SINDPD   SP \t"), "SINDPD SP");
/// assert_eq!(normalize_text(""), "");
/// ```
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads a calendar date from a cell.
///
/// Typed timestamps keep only their date. Numbers are spreadsheet serials in
/// the 1900 date system. Text is parsed day-first (`15/05/2025`), with ISO
/// `2025-05-15` also accepted. Anything else yields `None`; callers treat
/// that as "the rule does not apply".
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::parse_date;
/// use vr_engine::sources::Cell;
/// use chrono::NaiveDate;
///
/// let may_15 = NaiveDate::from_ymd_opt(2025, 5, 15);
/// assert_eq!(parse_date(&Cell::Text("15/05/2025".into())), may_15);
/// assert_eq!(parse_date(&Cell::Text("2025-05-15 08:30:00".into())), may_15);
/// assert_eq!(parse_date(&Cell::Number(45792.0)), may_15);
/// assert_eq!(parse_date(&Cell::Text("sem data".into())), None);
/// assert_eq!(parse_date(&Cell::Empty), None);
/// ```
pub fn parse_date(value: &Cell) -> Option<NaiveDate> {
    match value {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Number(serial) => serial_to_datetime(*serial).map(|dt| dt.date()),
        Cell::Text(text) => parse_date_text(text),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

/// Parses free-text dates with day-before-month precedence.
///
/// A day-first reading that is not a valid date (`05/25/2025`) falls back to
/// month-first. Two-digit years are taken as 20xx. Any time-of-day suffix is
/// discarded.
pub fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = normalize_text(text);
    let date_part = text.split([' ', 'T']).next()?;
    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let numbers: Vec<u32> = parts
        .iter()
        .map(|p| p.parse::<u32>().ok())
        .collect::<Option<_>>()?;

    if parts[0].len() == 4 {
        let year = i32::try_from(numbers[0]).ok()?;
        return NaiveDate::from_ymd_opt(year, numbers[1], numbers[2]);
    }

    let year = match numbers[2] {
        y if parts[2].len() <= 2 => 2000 + i32::try_from(y).ok()?,
        y => i32::try_from(y).ok()?,
    };
    NaiveDate::from_ymd_opt(year, numbers[1], numbers[0])
        .or_else(|| NaiveDate::from_ymd_opt(year, numbers[0], numbers[1]))
}

/// Finds the state code embedded in a union name.
///
/// A code only matches as a whole word. Codes are tried in
/// [`STATE_CODES`] order and the first match wins, regardless of where in
/// the text it appears.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::extract_state_code;
///
/// assert_eq!(extract_state_code("SINDPD SP - SIND.TRAB.EM PROC DADOS"), Some("SP"));
/// assert_eq!(extract_state_code("SITEPD PR - SIND. DOS TRAB."), Some("PR"));
/// assert_eq!(extract_state_code("SINDESPORTE"), None);
/// ```
pub fn extract_state_code(union_text: &str) -> Option<&'static str> {
    let normalized = normalize_text(union_text);
    let tokens: Vec<&str> = normalized
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect();

    STATE_CODES
        .iter()
        .copied()
        .find(|code| tokens.contains(code))
}

/// Maps a state code to the state name used by the rate table.
///
/// Only São Paulo, Rio de Janeiro, Rio Grande do Sul and Paraná are mapped;
/// every other code, valid or not, is unresolved and prices at the fallback
/// rate.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::state_code_to_name;
///
/// assert_eq!(state_code_to_name("RJ"), Some("Rio de Janeiro"));
/// assert_eq!(state_code_to_name("MG"), None);
/// ```
pub fn state_code_to_name(code: &str) -> Option<&'static str> {
    match code {
        "SP" => Some("São Paulo"),
        "RJ" => Some("Rio de Janeiro"),
        "RS" => Some("Rio Grande do Sul"),
        "PR" => Some("Paraná"),
        _ => None,
    }
}
