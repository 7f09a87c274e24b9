//! Calendar-day predicates and ranges shared by the calculator and the planner.

use chrono::{Datelike, Days, NaiveDate, Weekday};

pub fn is_weekend<D: Datelike>(date: &D) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Every date of `month` (1-based) in ascending order.
///
/// An out-of-range month yields an empty list.
pub fn days_in_month(year: i32, month: u32) -> Vec<NaiveDate> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|date| date.month() == month && date.year() == year)
        .collect()
}

/// Shifts `date` by `months`, rolling an overflowing day forward into the
/// following month (Jan 31 + 1 month lands on Mar 3 in a common year).
///
/// Returns `None` only when the result falls outside the supported range.
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + i64::from(months);
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;

    NaiveDate::from_ymd_opt(year, month, 1)?.checked_add_days(Days::new(u64::from(date.day0())))
}

/// Same calendar day, ignoring any time-of-day component.
pub fn dates_equal<A: Datelike, B: Datelike>(a: &A, b: &B) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// Counts non-weekend days in the inclusive range `[start, end]`.
///
/// A reversed range counts nothing; request validation rejects those earlier.
pub fn working_days(start: NaiveDate, end: NaiveDate) -> u32 {
    if start > end {
        return 0;
    }

    let count = start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !is_weekend(date))
        .count();

    u32::try_from(count).unwrap_or(u32::MAX)
}
