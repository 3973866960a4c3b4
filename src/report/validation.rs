//! Validation report assembly.

use tracing::info;

use crate::calculation::{ExclusionSets, exclusion_sets};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{BillingPeriod, EmployeeRecord, ReasonTag, ValidationRow};
use crate::sources::{SourceStore, roster};

/// Every reason that applies to `employee`, in precedence order.
///
/// Returns `[NoAdjustments]` when nothing applies.
pub fn reasons_for(
    employee: &EmployeeRecord,
    sets: &ExclusionSets,
    period: &BillingPeriod,
) -> Vec<ReasonTag> {
    let mut reasons = sets.reasons_for(employee.id);

    if employee.is_director() {
        reasons.push(ReasonTag::Director);
    }
    if employee
        .termination_notice_date
        .is_some_and(|notice| period.is_zeroed_by_notice(notice))
    {
        reasons.push(ReasonTag::EarlyTerminationZeroed {
            cutoff: period.notice_cutoff,
        });
    }
    if employee.vacation_days > 0 {
        reasons.push(ReasonTag::VacationDays {
            days: employee.vacation_days,
        });
    }

    if reasons.is_empty() {
        reasons.push(ReasonTag::NoAdjustments);
    }
    reasons
}

/// One validation row per employee of the pre-exclusion roster.
pub fn validation_report(
    roster: &[EmployeeRecord],
    sets: &ExclusionSets,
    period: &BillingPeriod,
) -> Vec<ValidationRow> {
    roster
        .iter()
        .map(|employee| ValidationRow::new(employee.id, reasons_for(employee, sets, period)))
        .collect()
}

/// Builds the validation report from a loaded store.
pub fn compute_validation(
    store: &SourceStore,
    config: &EngineConfig,
) -> EngineResult<Vec<ValidationRow>> {
    let roster = roster(store)?;
    let sets = exclusion_sets(store)?;
    let rows = validation_report(&roster, &sets, &config.period);

    let unadjusted = rows
        .iter()
        .filter(|r| r.reasons == [ReasonTag::NoAdjustments])
        .count();
    info!(
        employees = rows.len(),
        adjusted = rows.len() - unadjusted,
        "Validation report assembled"
    );
    Ok(rows)
}
