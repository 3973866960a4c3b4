//! Payout table assembly.

use std::time::Instant;

use tracing::{info, warn};

use crate::calculation::{
    ExclusionSets, apply_exclusions, compute_eligible_days, exclusion_sets, price,
    pricing_audit_step, resolve_daily_rate,
};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::models::{AuditTrace, AuditWarning, EmployeeRecord, PayoutComputation, PayoutRow};
use crate::sources::{RateTable, SourceStore, UnionCalendar, roster, state_rates, union_calendar};

/// Everything extracted from the sources that a payout run needs.
#[derive(Debug, Clone, Default)]
pub struct PayoutInputs {
    /// The joined roster, before exclusions.
    pub roster: Vec<EmployeeRecord>,
    /// The exclusion ID sets.
    pub exclusions: ExclusionSets,
    /// Business days per union.
    pub calendar: UnionCalendar,
    /// Daily rate per state.
    pub rates: RateTable,
}

impl PayoutInputs {
    /// Extracts the typed inputs from a loaded store.
    ///
    /// Fails with `JoinKeyUnresolved` when a required column is missing.
    pub fn extract(store: &SourceStore) -> EngineResult<Self> {
        Ok(Self {
            roster: roster(store)?,
            exclusions: exclusion_sets(store)?,
            calendar: union_calendar(store)?,
            rates: state_rates(store)?,
        })
    }

    /// The roster without excluded employees and directors.
    pub fn eligible(&self) -> Vec<EmployeeRecord> {
        apply_exclusions(&self.roster, &self.exclusions)
    }
}

/// Computes the payout row and audit trace for one eligible employee.
///
/// A union absent from the calendar is entitled to zero days and a union
/// whose state does not resolve is priced at the fallback rate; both are
/// recorded as warnings on the trace.
pub fn compute_payout(
    employee: &EmployeeRecord,
    inputs: &PayoutInputs,
    config: &EngineConfig,
) -> PayoutComputation {
    let mut trace = AuditTrace::default();

    let entitlement = match inputs.calendar.get(&employee.union) {
        Some(days) => *days,
        None => {
            warn!(
                employee_id = employee.id,
                union = %employee.union,
                "Union not found in business-day calendar; entitlement is zero"
            );
            trace.warnings.push(AuditWarning {
                code: "UNION_NOT_IN_CALENDAR".to_string(),
                message: format!(
                    "Union '{}' has no business-day entry; entitlement set to 0",
                    employee.union
                ),
                severity: "medium".to_string(),
            });
            0
        }
    };

    let days = compute_eligible_days(&config.period, employee, entitlement, 1);
    let mut step_number = days.audit_steps.len() as u32 + 1;
    trace.steps.extend(days.audit_steps);

    let rate = resolve_daily_rate(
        &employee.union,
        &inputs.rates,
        config.pricing.fallback_daily_rate,
        step_number,
    );
    if rate.source.is_fallback() {
        trace.warnings.push(AuditWarning {
            code: "RATE_FALLBACK".to_string(),
            message: rate.audit_step.reasoning.clone(),
            severity: "low".to_string(),
        });
    }
    trace.steps.push(rate.audit_step);
    step_number += 1;

    let breakdown = price(days.eligible_days, rate.daily_rate, &config.pricing);
    trace.steps.push(pricing_audit_step(
        days.eligible_days,
        rate.daily_rate,
        &breakdown,
        &config.pricing,
        step_number,
    ));

    PayoutComputation {
        row: PayoutRow {
            employee_id: employee.id,
            admission_date: employee.admission_date,
            union: employee.union.clone(),
            competence: config.period.competence,
            eligible_days: days.eligible_days,
            daily_rate: rate.daily_rate,
            total: breakdown.total,
            employer_share: breakdown.employer_share,
            employee_share: breakdown.employee_share,
            observation: String::new(),
        },
        audit_trace: trace,
    }
}

/// Computes the payout for every eligible employee, in roster order.
pub fn compute_payouts(
    store: &SourceStore,
    config: &EngineConfig,
) -> EngineResult<Vec<PayoutComputation>> {
    let start_time = Instant::now();
    let inputs = PayoutInputs::extract(store)?;
    let eligible = inputs.eligible();

    let computations: Vec<PayoutComputation> = eligible
        .iter()
        .map(|employee| compute_payout(employee, &inputs, config))
        .collect();

    let fallbacks = computations
        .iter()
        .filter(|c| c.audit_trace.warnings.iter().any(|w| w.code == "RATE_FALLBACK"))
        .count();
    info!(
        roster = inputs.roster.len(),
        eligible = eligible.len(),
        rate_fallbacks = fallbacks,
        duration_us = start_time.elapsed().as_micros(),
        "Payouts computed"
    );

    Ok(computations)
}
