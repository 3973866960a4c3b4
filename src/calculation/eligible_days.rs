//! Eligible-day calculation.
//!
//! An employee's union calendar grants a number of business days for the
//! period. That entitlement is pro-rated by the share of the period's
//! business days the employee actually worked, then reduced by vacation
//! days. A termination notice on or before the cutoff zeroes everything.

use chrono::NaiveDate;

use crate::models::{AuditStep, BillingPeriod, EmployeeRecord};

use super::business_days::{business_day_count, next_day};

/// The result of the eligible-day calculation, including audit steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibleDaysResult {
    /// Final eligible days after pro-ration and vacation.
    pub eligible_days: u32,
    /// Business days worked inside the period.
    pub worked_days: u32,
    /// Business days in the whole period.
    pub total_days: u32,
    /// Pro-rated entitlement before vacation.
    pub base_days: u32,
    /// Whether an early termination notice zeroed the period.
    pub zeroed_by_notice: bool,
    /// The audit steps recording this calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Rounds `worked / total × entitlement` to the nearest integer, ties to even.
///
/// Computed in exact integer arithmetic. Returns 0 when `total` is 0.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::prorate;
///
/// // 20/21 × 22 = 20.95 → 21
/// assert_eq!(prorate(20, 21, 22), 21);
/// // 1/4 × 2 = 0.5 → 0, 3/4 × 2 = 1.5 → 2
/// assert_eq!(prorate(1, 4, 2), 0);
/// assert_eq!(prorate(3, 4, 2), 2);
/// assert_eq!(prorate(5, 0, 22), 0);
/// ```
pub fn prorate(worked: u32, total: u32, entitlement: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let numerator = u64::from(worked) * u64::from(entitlement);
    let denominator = u64::from(total);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;

    let rounded = match (2 * remainder).cmp(&denominator) {
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 1 => quotient + 1,
        _ => quotient,
    };
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Computes the eligible days for one employee.
///
/// Steps:
/// 1. A notice date on or before the period's cutoff yields 0.
/// 2. The effective window starts at the later of the period start and the
///    admission date, and ends at the earlier of the period end and the day
///    after termination.
/// 3. Worked days are the business days in that window.
/// 4. The union entitlement is pro-rated by worked/total, ties to even.
/// 5. Vacation days are subtracted, flooring at zero.
///
/// # Arguments
///
/// * `period` - The billing window
/// * `employee` - The joined employee record
/// * `union_entitlement` - Business days granted by the employee's union calendar
/// * `step_number` - The first step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::compute_eligible_days;
/// use vr_engine::models::{BillingPeriod, EmployeeRecord};
///
/// let period = BillingPeriod::default();
/// let employee = EmployeeRecord::new(1001, "ANALISTA", "SINDPD SP");
///
/// let result = compute_eligible_days(&period, &employee, 22, 1);
/// assert_eq!(result.eligible_days, 22);
/// assert_eq!(result.worked_days, result.total_days);
/// ```
pub fn compute_eligible_days(
    period: &BillingPeriod,
    employee: &EmployeeRecord,
    union_entitlement: u32,
    step_number: u32,
) -> EligibleDaysResult {
    let total_days = business_day_count(period.start, period.end);

    if let Some(notice) = employee
        .termination_notice_date
        .filter(|notice| period.is_zeroed_by_notice(*notice))
    {
        let audit_step = AuditStep {
            step_number,
            rule_id: "early_termination_notice".to_string(),
            rule_name: "Early Termination Notice".to_string(),
            input: serde_json::json!({
                "notice_date": notice.to_string(),
                "notice_cutoff": period.notice_cutoff.to_string()
            }),
            output: serde_json::json!({
                "eligible_days": 0,
                "zeroed": true
            }),
            reasoning: format!(
                "Termination notice on {} is on or before cutoff {}; benefit zeroed",
                notice, period.notice_cutoff
            ),
        };
        return EligibleDaysResult {
            eligible_days: 0,
            worked_days: 0,
            total_days,
            base_days: 0,
            zeroed_by_notice: true,
            audit_steps: vec![audit_step],
        };
    }

    let (window_start, window_end) = effective_window(period, employee);
    let worked_days = if window_end > window_start {
        business_day_count(window_start, window_end)
    } else {
        0
    };

    let window_step = AuditStep {
        step_number,
        rule_id: "effective_window".to_string(),
        rule_name: "Effective Work Window".to_string(),
        input: serde_json::json!({
            "period_start": period.start.to_string(),
            "period_end": period.end.to_string(),
            "admission_date": employee.admission_date.map(|d| d.to_string()),
            "termination_date": employee.termination_date.map(|d| d.to_string())
        }),
        output: serde_json::json!({
            "window_start": window_start.to_string(),
            "window_end": window_end.to_string(),
            "worked_days": worked_days,
            "total_days": total_days
        }),
        reasoning: format!(
            "Worked {} of {} business days between {} and {} (exclusive)",
            worked_days, total_days, window_start, window_end
        ),
    };

    let base_days = prorate(worked_days, total_days, union_entitlement);
    let prorate_step = AuditStep {
        step_number: step_number + 1,
        rule_id: "prorate_entitlement".to_string(),
        rule_name: "Pro-rated Union Entitlement".to_string(),
        input: serde_json::json!({
            "union": employee.union,
            "union_entitlement": union_entitlement,
            "worked_days": worked_days,
            "total_days": total_days
        }),
        output: serde_json::json!({
            "base_days": base_days
        }),
        reasoning: format!(
            "round({} / {} x {}) = {} (ties to even)",
            worked_days, total_days, union_entitlement, base_days
        ),
    };

    let eligible_days = base_days.saturating_sub(employee.vacation_days);
    let vacation_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "vacation_deduction".to_string(),
        rule_name: "Vacation Deduction".to_string(),
        input: serde_json::json!({
            "base_days": base_days,
            "vacation_days": employee.vacation_days
        }),
        output: serde_json::json!({
            "eligible_days": eligible_days
        }),
        reasoning: if employee.vacation_days == 0 {
            "No vacation days taken".to_string()
        } else {
            format!(
                "max(0, {} - {}) = {}",
                base_days, employee.vacation_days, eligible_days
            )
        },
    };

    EligibleDaysResult {
        eligible_days,
        worked_days,
        total_days,
        base_days,
        zeroed_by_notice: false,
        audit_steps: vec![window_step, prorate_step, vacation_step],
    }
}

/// The `[start, end)` window the employee was employed in during the period.
fn effective_window(period: &BillingPeriod, employee: &EmployeeRecord) -> (NaiveDate, NaiveDate) {
    let start = employee
        .admission_date
        .map_or(period.start, |admission| admission.max(period.start));
    let end = employee
        .termination_date
        .map_or(period.end, |termination| next_day(termination).min(period.end));
    (start, end)
}
