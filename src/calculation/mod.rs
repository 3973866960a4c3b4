//! Calculation logic for the VR engine.
//!
//! This module contains the pure stages of the payout pipeline: text and
//! date normalization, business-day counting, eligibility filtering,
//! eligible-day pro-ration, and daily rate resolution and pricing.

mod business_days;
mod eligibility;
mod eligible_days;
mod normalization;
mod pricing;

pub use business_days::{business_day_count, is_business_day, next_day};
pub use eligibility::{DIRECTOR_MARKER, ExclusionSets, apply_exclusions, exclusion_sets, is_director};
pub use eligible_days::{EligibleDaysResult, compute_eligible_days, prorate};
pub use normalization::{
    STATE_CODES, extract_state_code, normalize_text, parse_date, parse_date_text,
    state_code_to_name,
};
pub use pricing::{
    DailyRateResult, PriceBreakdown, RateSource, price, pricing_audit_step, resolve_daily_rate,
    round_money,
};
