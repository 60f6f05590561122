// src/dates.rs

use chrono::{DateTime, Datelike, Months, NaiveDate};
use serde::Serialize;

/// Format used when dates are shown to people (error messages, exports).
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid date '{input}'")]
pub struct DateParseError {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DayCountError {
    #[error(transparent)]
    Parse(#[from] DateParseError),
    #[error("offset {0} is out of range")]
    OffsetOutOfRange(i64),
}

/// Whole months plus remaining days between two calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthDayInterval {
    pub months: u32,
    pub days: i64,
}

/// Parses a calendar date. Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY`
/// and RFC 3339 timestamps (the time part is dropped, no zone conversion).
pub fn parse_date(input: &str) -> Result<NaiveDate, DateParseError> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(s, DISPLAY_FORMAT))
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.date_naive()))
        .map_err(|_| DateParseError { input: input.to_owned() })
}

/// Days from `start` to `end` plus `offset`; an offset of 1 counts both ends.
pub fn diff_date_days(start: &str, end: &str, offset: i64) -> Result<i64, DayCountError> {
    day_span(parse_date(start)?, parse_date(end)?, offset).ok_or(DayCountError::OffsetOutOfRange(offset))
}

/// `None` when `offset` pushes the count past `i64`.
pub fn day_span(start: NaiveDate, end: NaiveDate, offset: i64) -> Option<i64> {
    (end - start).num_days().checked_add(offset)
}

/// Calendar interval from the earlier to the later of `a` and `b`.
pub fn month_day_interval(a: NaiveDate, b: NaiveDate) -> MonthDayInterval {
    let (from, to) = if a <= b { (a, b) } else { (b, a) };

    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    // `from <= to` keeps this non-negative
    let months = months.max(0) as u32;

    // chrono clamps to the end of shorter months (Jan 31 + 1 month = Feb 29)
    let anchor = from.checked_add_months(Months::new(months)).unwrap_or(to);
    MonthDayInterval { months, days: (to - anchor).num_days() }
}

pub fn is_more_than_two_months_and_one_day(date1: NaiveDate, date2: NaiveDate) -> bool {
    let interval = month_day_interval(date1, date2);
    interval.months > 2 || (interval.months == 2 && interval.days > 1)
}

/// Renders a date with a chrono format pattern, e.g. [`DISPLAY_FORMAT`].
pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(pattern).to_string()
}
