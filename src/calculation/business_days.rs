//! Business-day counting.
//!
//! Business days are Monday through Friday. There is no holiday table;
//! union calendars already carry their own entitlement.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Counts business days in the half-open range `[start, end)`.
///
/// Returns 0 when `end` is not after `start`.
///
/// # Examples
///
/// ```
/// use vr_engine::calculation::business_day_count;
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
///
/// // Mon 2 June .. Mon 9 June: one full week
/// assert_eq!(business_day_count(d(6, 2), d(6, 9)), 5);
/// // Saturday to Monday: no business days
/// assert_eq!(business_day_count(d(6, 7), d(6, 9)), 0);
/// // The default May/2025 window
/// assert_eq!(business_day_count(d(4, 15), d(5, 16)), 23);
/// ```
pub fn business_day_count(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }

    let span = (end - start).num_days();
    let full_weeks = span / 7;
    let mut count = full_weeks * 5;

    let mut day = start + Days::new((full_weeks * 7) as u64);
    while day < end {
        if is_business_day(day) {
            count += 1;
        }
        day = day + Days::new(1);
    }

    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Returns true for Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// The day after `date`, saturating at the calendar maximum.
pub fn next_day(date: NaiveDate) -> NaiveDate {
    date.succ_opt().unwrap_or(date)
}
