//! Calculation result models for the VR engine.
//!
//! This module contains the [`PayoutRow`] written to the settlement table,
//! the [`PayoutComputation`] that pairs each row with its audit trace, and
//! the [`PayoutTotals`] summary returned by the API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmployeeId;

/// Column headers of the payout table, in output order.
pub const PAYOUT_COLUMNS: [&str; 10] = [
    "Matricula",
    "Admissão",
    "Sindicato do Colaborador",
    "Competência",
    "Dias",
    "VALOR DIÁRIO VR",
    "TOTAL",
    "Custo empresa",
    "Desconto profissional",
    "OBS GERAL",
];

/// One row of the payout table.
///
/// # Example
///
/// ```
/// use vr_engine::models::PayoutRow;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let row = PayoutRow {
///     employee_id: 1001,
///     admission_date: None,
///     union: "SINDPD SP".to_string(),
///     competence: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
///     eligible_days: 16,
///     daily_rate: Decimal::new(3750, 2),
///     total: Decimal::new(60000, 2),
///     employer_share: Decimal::new(48000, 2),
///     employee_share: Decimal::new(12000, 2),
///     observation: String::new(),
/// };
/// assert_eq!(row.employer_share + row.employee_share, row.total);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRow {
    /// Employee registration number.
    pub employee_id: EmployeeId,
    /// Admission date, when the employee was admitted in the period.
    pub admission_date: Option<NaiveDate>,
    /// Normalized union name.
    pub union: String,
    /// Competence month stamp.
    pub competence: NaiveDate,
    /// Eligible days after pro-ration and vacation.
    pub eligible_days: u32,
    /// Daily voucher rate applied.
    pub daily_rate: Decimal,
    /// Eligible days times daily rate, rounded to cents.
    pub total: Decimal,
    /// Company cost share (80% of total).
    pub employer_share: Decimal,
    /// Employee discount share (20% of total).
    pub employee_share: Decimal,
    /// Free-text observation, empty by default.
    pub observation: String,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag per-row gaps that were resolved by a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for one employee's payout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// A payout row together with the trace that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutComputation {
    /// The row written to the payout table.
    pub row: PayoutRow,
    /// How the row was derived.
    pub audit_trace: AuditTrace,
}

/// Aggregated totals over a payout table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutTotals {
    /// Number of payout rows.
    pub employees: usize,
    /// Sum of eligible days.
    pub eligible_days: u64,
    /// Sum of totals.
    pub total: Decimal,
    /// Sum of employer shares.
    pub employer_share: Decimal,
    /// Sum of employee shares.
    pub employee_share: Decimal,
}

impl PayoutTotals {
    /// Sums a slice of payout rows.
    pub fn from_rows(rows: &[PayoutRow]) -> Self {
        rows.iter().fold(
            Self {
                employees: rows.len(),
                ..Self::default()
            },
            |mut acc, row| {
                acc.eligible_days += u64::from(row.eligible_days);
                acc.total += row.total;
                acc.employer_share += row.employer_share;
                acc.employee_share += row.employee_share;
                acc
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    /// Helper function to create Decimal values from strings
    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_row(id: EmployeeId, days: u32, total: &str) -> PayoutRow {
        let total = dec(total);
        PayoutRow {
            employee_id: id,
            admission_date: None,
            union: "SINDPD SP".to_string(),
            competence: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            eligible_days: days,
            daily_rate: dec("37.50"),
            total,
            employer_share: (total * dec("0.8")).round_dp(2),
            employee_share: (total * dec("0.2")).round_dp(2),
            observation: String::new(),
        }
    }

    #[test]
    fn test_payout_columns_order() {
        assert_eq!(PAYOUT_COLUMNS[0], "Matricula");
        assert_eq!(PAYOUT_COLUMNS[3], "Competência");
        assert_eq!(PAYOUT_COLUMNS[9], "OBS GERAL");
    }

    #[test]
    fn test_totals_sum_rows() {
        let rows = vec![
            create_sample_row(1, 16, "600.00"),
            create_sample_row(2, 10, "375.00"),
        ];
        let totals = PayoutTotals::from_rows(&rows);
        assert_eq!(totals.employees, 2);
        assert_eq!(totals.eligible_days, 26);
        assert_eq!(totals.total, dec("975.00"));
        assert_eq!(totals.employer_share, dec("780.00"));
        assert_eq!(totals.employee_share, dec("195.00"));
    }

    #[test]
    fn test_totals_of_empty_table() {
        let totals = PayoutTotals::from_rows(&[]);
        assert_eq!(totals, PayoutTotals::default());
    }

    #[test]
    fn test_payout_row_serialization() {
        let row = create_sample_row(1001, 16, "600.00");
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"employee_id\":1001"));
        assert!(json.contains("\"competence\":\"2025-05-01\""));
        assert!(json.contains("\"daily_rate\":\"37.50\""));
        assert!(json.contains("\"admission_date\":null"));
    }

    #[test]
    fn test_audit_trace_default_is_empty() {
        let trace = AuditTrace::default();
        assert!(trace.steps.is_empty());
        assert!(trace.warnings.is_empty());
    }
}
