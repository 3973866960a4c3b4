//! Employee model.
//!
//! This module defines the [`EmployeeRecord`] produced by joining the active
//! roster with the admission, termination and vacation extracts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::is_director;

/// Employee registration number (`MATRICULA`).
pub type EmployeeId = i64;

/// One employee after the roster joins.
///
/// Every optional date means "the rule does not apply" when absent, never a
/// zero or epoch date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// Unique registration number.
    pub id: EmployeeId,
    /// The role title (`TITULO DO CARGO`), used for the director rule.
    pub role_title: String,
    /// The whitespace-normalized union name.
    pub union: String,
    /// Admission date from the admissions extract.
    pub admission_date: Option<NaiveDate>,
    /// Termination date from the terminations extract.
    pub termination_date: Option<NaiveDate>,
    /// Date the termination was communicated.
    pub termination_notice_date: Option<NaiveDate>,
    /// Vacation days taken in the period.
    #[serde(default)]
    pub vacation_days: u32,
}

impl EmployeeRecord {
    /// Creates a record with no dates and no vacation.
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_engine::models::EmployeeRecord;
    ///
    /// let employee = EmployeeRecord::new(1001, "ANALISTA", "SINDPD SP");
    /// assert_eq!(employee.vacation_days, 0);
    /// assert!(employee.admission_date.is_none());
    /// ```
    pub fn new(id: EmployeeId, role_title: impl Into<String>, union: impl Into<String>) -> Self {
        Self {
            id,
            role_title: role_title.into(),
            union: union.into(),
            admission_date: None,
            termination_date: None,
            termination_notice_date: None,
            vacation_days: 0,
        }
    }

    /// Returns true if the role title marks the employee as a director.
    ///
    /// # Examples
    ///
    /// ```
    /// use vr_engine::models::EmployeeRecord;
    ///
    /// assert!(EmployeeRecord::new(1, "Diretor Comercial", "").is_director());
    /// assert!(!EmployeeRecord::new(2, "ANALISTA", "").is_director());
    /// ```
    pub fn is_director(&self) -> bool {
        is_director(&self.role_title)
    }
}
