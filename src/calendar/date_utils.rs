//! Pure calendar-date arithmetic shared by the store and the recurrence
//! generator. All functions operate on naive local dates; there is no
//! timezone conversion anywhere in this crate.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};

/// Number of days in the given month (1-12), correct for leap years.
/// Returns 0 when the month is out of range.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    // Day zero of the next month is the last day of this one.
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// First calendar day of the given month, or `None` when out of range.
pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last calendar day of the given month, or `None` when out of range.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let day = days_in_month(year, month);
    NaiveDate::from_ymd_opt(year, month, day)
}

/// First day of the 7-day window containing `date`, for an arbitrary week
/// start day.
pub fn start_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    let day = date.weekday().num_days_from_sunday();
    let anchor = week_start.num_days_from_sunday();
    let diff = (7 + day - anchor) % 7;
    date - Duration::days(i64::from(diff))
}

/// Last day of the 7-day window containing `date`.
pub fn end_of_week(date: NaiveDate, week_start: Weekday) -> NaiveDate {
    start_of_week(date, week_start) + Duration::days(6)
}

/// Whether two timestamps fall on the same calendar day, ignoring
/// time-of-day.
pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

/// Whether two timestamps fall in the same calendar month.
pub fn is_same_month(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// Clock style for [`format_time`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    TwelveHour,
    TwentyFourHour,
}

/// Locale-free ISO date formatting.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Locale-free time formatting in a 12-hour or 24-hour clock.
pub fn format_time(datetime: NaiveDateTime, format: TimeFormat) -> String {
    match format {
        TimeFormat::TwelveHour => datetime.format("%-I:%M %p").to_string(),
        TimeFormat::TwentyFourHour => datetime.format("%H:%M").to_string(),
    }
}
