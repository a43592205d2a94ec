//! Calendar arithmetic on plain dates.
//!
//! Everything here works on calendar fields (year, month, day). No function
//! multiplies a day count by a fixed number of hours, so results are the same
//! in every time zone and on DST transition days.

use chrono::{Datelike, Months, NaiveDate};

const ISO_DATE: &str = "%Y-%m-%d";

/// Parse an ISO `yyyy-mm-dd` date.
///
/// Empty input and unparseable input both yield `None`. An RFC 3339
/// date-time (`2025-03-09T12:00:00Z`) is accepted and truncated to its date
/// part, since feature records sometimes carry full timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let date_part = match value.split_once('T') {
        Some((date, _)) => date,
        None => value,
    };
    NaiveDate::parse_from_str(date_part, ISO_DATE).ok()
}

/// Format a date as `yyyy-mm-dd`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Advance `date` by `n` calendar days (negative moves backwards).
///
/// Saturates at the representable date range instead of panicking.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    date.checked_add_signed(chrono::Duration::days(n))
        .unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Advance `date` by `n` calendar months, clamping the day-of-month to the
/// last day of the resulting month (Jan 31 + 1 month is Feb 28/29).
pub fn add_months(date: NaiveDate, n: i32) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Number of days in the given month: "day 0 of the next month".
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// Day count of the month containing `date`.
pub fn days_in_month_of(date: NaiveDate) -> u32 {
    days_in_month(date.year(), date.month())
}

/// Signed calendar-day difference `to - from`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Month markers (day 1) from `start`'s month through `end`'s month,
/// inclusive. Empty when `end` falls in an earlier month than `start`.
pub fn date_range_inclusive_months(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(start);
    let last = first_of_month(end);
    let mut months = Vec::new();
    let mut cursor = first;
    while cursor <= last {
        months.push(cursor);
        let next = add_months(cursor, 1);
        if next == cursor {
            break;
        }
        cursor = next;
    }
    months
}
