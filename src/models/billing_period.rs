//! Billing period model.
//!
//! This module contains the [`BillingPeriod`] type that fixes the window a
//! VR payout is computed for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The billing window for one competence month.
///
/// `start` is inclusive and `end` is the exclusive bound used when counting
/// business days, so a window of `2025-04-15..2025-05-16` covers business
/// days up to and including 2025-05-15. A termination-notice date on or before
/// `notice_cutoff` zeroes the employee's benefit for the whole period.
///
/// # Example
///
/// ```
/// use vr_engine::models::BillingPeriod;
/// use chrono::NaiveDate;
///
/// let period = BillingPeriod::default();
/// assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 4, 15).unwrap());
/// assert!(period.is_zeroed_by_notice(NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()));
/// assert!(!period.is_zeroed_by_notice(NaiveDate::from_ymd_opt(2025, 5, 16).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingPeriod {
    /// First day of the window (inclusive).
    pub start: NaiveDate,
    /// Exclusive bound of the window.
    pub end: NaiveDate,
    /// Termination notices on or before this date zero the benefit.
    pub notice_cutoff: NaiveDate,
    /// The competence month stamp written on every payout row.
    pub competence: NaiveDate,
}

impl Default for BillingPeriod {
    fn default() -> Self {
        Self {
            start: ymd(2025, 4, 15),
            end: ymd(2025, 5, 16),
            notice_cutoff: ymd(2025, 5, 15),
            competence: ymd(2025, 5, 1),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

impl BillingPeriod {
    /// Checks that the window is non-empty.
    pub fn validate(&self) -> EngineResult<()> {
        if self.end <= self.start {
            return Err(EngineError::InvalidBillingPeriod {
                message: format!(
                    "end {} must be after start {}",
                    self.end, self.start
                ),
            });
        }
        Ok(())
    }

    /// Returns true when a termination notice on `notice` zeroes the period.
    ///
    /// The boundary is inclusive: a notice dated exactly on the cutoff zeroes.
    pub fn is_zeroed_by_notice(&self, notice: NaiveDate) -> bool {
        notice <= self.notice_cutoff
    }

    /// The cutoff rendered as `DD/MM`, as used in report text.
    pub fn cutoff_label(&self) -> String {
        self.notice_cutoff.format("%d/%m").to_string()
    }
}
