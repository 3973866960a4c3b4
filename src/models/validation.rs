//! Validation report models.
//!
//! The validation report lists, for every employee on the pre-exclusion
//! roster, each reason that affected (or removed) their payout.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::EmployeeId;

/// Column headers of the validation report, in output order.
pub const VALIDATION_COLUMNS: [&str; 2] = ["Matricula", "Motivos"];

/// Separator used when joining reasons into report text.
pub const REASON_SEPARATOR: &str = "; ";

/// A reason recorded against an employee.
///
/// Variants are declared in report precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ReasonTag {
    /// Listed in the apprentice extract.
    Apprentice,
    /// Listed in the intern extract.
    Intern,
    /// Listed in the leave-of-absence extract.
    LeaveOfAbsence,
    /// Listed in the expatriate extract.
    Expatriate,
    /// Role title marks a director.
    Director,
    /// Termination notice on or before the cutoff zeroed the period.
    EarlyTerminationZeroed {
        /// The cutoff date that applied.
        cutoff: NaiveDate,
    },
    /// Vacation days were subtracted.
    VacationDays {
        /// Number of days taken.
        days: u32,
    },
    /// Nothing applied.
    NoAdjustments,
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonTag::Apprentice => write!(f, "Aprendiz"),
            ReasonTag::Intern => write!(f, "Estagiário"),
            ReasonTag::LeaveOfAbsence => write!(f, "Afastamento"),
            ReasonTag::Expatriate => write!(f, "Exterior"),
            ReasonTag::Director => write!(f, "Diretor"),
            ReasonTag::EarlyTerminationZeroed { cutoff } => {
                write!(f, "Comunicado até {} → zerado", cutoff.format("%d/%m"))
            }
            ReasonTag::VacationDays { days } => write!(f, "Férias {} dias", days),
            ReasonTag::NoAdjustments => write!(f, "Sem ajustes"),
        }
    }
}

/// One row of the validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRow {
    /// Employee registration number.
    pub employee_id: EmployeeId,
    /// Matching reasons in precedence order.
    pub reasons: Vec<ReasonTag>,
    /// Reasons joined with `"; "`.
    pub text: String,
}

impl ValidationRow {
    /// Builds a row and renders its text.
    ///
    /// # Example
    ///
    /// ```
    /// use vr_engine::models::{ReasonTag, ValidationRow};
    ///
    /// let row = ValidationRow::new(7, vec![ReasonTag::Apprentice, ReasonTag::LeaveOfAbsence]);
    /// assert_eq!(row.text, "Aprendiz; Afastamento");
    /// ```
    pub fn new(employee_id: EmployeeId, reasons: Vec<ReasonTag>) -> Self {
        let text = reasons
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(REASON_SEPARATOR);
        Self {
            employee_id,
            reasons,
            text,
        }
    }
}
