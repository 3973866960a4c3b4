//! Daily rate resolution and payout pricing.
//!
//! A union is priced by the state code embedded in its name: code to state
//! name, state name to the rate table. Any unresolved step prices the union
//! at the fallback rate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::models::AuditStep;
use crate::sources::RateTable;

use super::normalization::{extract_state_code, state_code_to_name};

/// Where a daily rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    /// Found in the rate table.
    RateTable,
    /// The union has no recognizable state code.
    FallbackNoStateCode,
    /// The state code has no state name mapping.
    FallbackUnmappedState,
    /// The state name is absent from the rate table.
    FallbackMissingRate,
}

impl RateSource {
    /// Returns true for any fallback resolution.
    pub fn is_fallback(self) -> bool {
        !matches!(self, RateSource::RateTable)
    }
}

/// The result of resolving a union's daily rate, including the audit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRateResult {
    /// The daily rate to apply.
    pub daily_rate: Decimal,
    /// How the rate was resolved.
    pub source: RateSource,
    /// The state code found in the union name, if any.
    pub state_code: Option<&'static str>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Total and cost split of one payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Days times rate.
    pub total: Decimal,
    /// Company share.
    pub employer_share: Decimal,
    /// Employee share.
    pub employee_share: Decimal,
}

/// Rounds a monetary amount to cents, ties to even, always at scale 2.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_money(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.12").unwrap());
/// assert_eq!(round_money(Decimal::from_str("0.135").unwrap()), Decimal::from_str("0.14").unwrap());
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(2);
    rounded
}

/// Resolves the daily voucher rate for a union.
///
/// # Arguments
///
/// * `union` - The normalized union name
/// * `rates` - The state rate table
/// * `fallback` - Rate used when resolution fails
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::resolve_daily_rate;
/// use vr_engine::sources::RateTable;
/// use rust_decimal::Decimal;
///
/// let mut rates = RateTable::new();
/// rates.insert("São Paulo".to_string(), Decimal::new(3750, 2));
///
/// let fallback = Decimal::new(3500, 2);
/// let sp = resolve_daily_rate("SINDPD SP", &rates, fallback, 1);
/// assert_eq!(sp.daily_rate, Decimal::new(3750, 2));
///
/// let none = resolve_daily_rate("SINDICATO GERAL", &rates, fallback, 1);
/// assert_eq!(none.daily_rate, fallback);
/// ```
pub fn resolve_daily_rate(
    union: &str,
    rates: &RateTable,
    fallback: Decimal,
    step_number: u32,
) -> DailyRateResult {
    let state_code = extract_state_code(union);
    let state_name = state_code.and_then(state_code_to_name);
    let table_rate = state_name.and_then(|name| rates.get(name)).copied();

    let (daily_rate, source) = match (state_code, state_name, table_rate) {
        (_, _, Some(rate)) => (rate, RateSource::RateTable),
        (None, _, _) => (fallback, RateSource::FallbackNoStateCode),
        (Some(_), None, _) => (fallback, RateSource::FallbackUnmappedState),
        (Some(_), Some(_), None) => (fallback, RateSource::FallbackMissingRate),
    };

    let reasoning = match source {
        RateSource::RateTable => format!(
            "Union '{}' -> {} -> {}: R$ {}",
            union,
            state_code.unwrap_or_default(),
            state_name.unwrap_or_default(),
            daily_rate
        ),
        RateSource::FallbackNoStateCode => format!(
            "No state code in union '{}'; fallback R$ {}",
            union, daily_rate
        ),
        RateSource::FallbackUnmappedState => format!(
            "State code {} has no state mapping; fallback R$ {}",
            state_code.unwrap_or_default(),
            daily_rate
        ),
        RateSource::FallbackMissingRate => format!(
            "{} not in rate table; fallback R$ {}",
            state_name.unwrap_or_default(),
            daily_rate
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_rate".to_string(),
        rule_name: "Daily Rate Resolution".to_string(),
        input: serde_json::json!({
            "union": union,
            "state_code": state_code,
            "state_name": state_name
        }),
        output: serde_json::json!({
            "daily_rate": daily_rate.to_string(),
            "source": source
        }),
        reasoning,
    };

    DailyRateResult {
        daily_rate,
        source,
        state_code,
        audit_step,
    }
}

/// Prices `days` at `rate` and splits the total.
///
/// Each amount is rounded to cents independently, so the shares may differ
/// from the total by one cent.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::price;
/// use vr_engine::config::PricingConfig;
/// use rust_decimal::Decimal;
///
/// let breakdown = price(16, Decimal::new(3750, 2), &PricingConfig::default());
/// assert_eq!(breakdown.total, Decimal::new(60000, 2));
/// assert_eq!(breakdown.employer_share, Decimal::new(48000, 2));
/// assert_eq!(breakdown.employee_share, Decimal::new(12000, 2));
/// ```
pub fn price(days: u32, rate: Decimal, pricing: &PricingConfig) -> PriceBreakdown {
    let total = round_money(Decimal::from(days) * rate);
    PriceBreakdown {
        total,
        employer_share: round_money(total * pricing.employer_share),
        employee_share: round_money(total * pricing.employee_share),
    }
}

/// Builds the audit step for a priced payout.
pub fn pricing_audit_step(
    days: u32,
    rate: Decimal,
    breakdown: &PriceBreakdown,
    pricing: &PricingConfig,
    step_number: u32,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "pricing".to_string(),
        rule_name: "Payout Pricing".to_string(),
        input: serde_json::json!({
            "eligible_days": days,
            "daily_rate": rate.to_string(),
            "employer_share": pricing.employer_share.to_string(),
            "employee_share": pricing.employee_share.to_string()
        }),
        output: serde_json::json!({
            "total": breakdown.total.to_string(),
            "employer_share": breakdown.employer_share.to_string(),
            "employee_share": breakdown.employee_share.to_string()
        }),
        reasoning: format!(
            "{} days x R$ {} = R$ {} (company R$ {}, employee R$ {})",
            days, rate, breakdown.total, breakdown.employer_share, breakdown.employee_share
        ),
    }
}
