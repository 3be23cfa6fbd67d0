//! Pure date helpers for the calendar and planner
//!
//! Everything here is stateless. Functions that depend on the current time
//! come in `*_at` form taking an explicit `now`, with a thin `Utc::now()`
//! wrapper for callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use super::models::CalendarEvent;

/// Number of cells in a month grid: 6 weeks of 7 days
pub const GRID_CELLS: usize = 42;

/// Format a date as e.g. "Mon, Nov 7"
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Format a date with time as e.g. "Mon, Nov 7 at 2:30 PM"
pub fn format_date_time(date: DateTime<Utc>) -> String {
    date.format("%a, %b %-d at %-I:%M %p").to_string()
}

/// Whole days from `now` until `target`, rounding partial days up.
///
/// A target 36 hours out counts as 2 days; a target earlier today (or
/// slightly past) counts as 0. Results are negative once the target is a
/// full day or more behind `now`.
pub fn days_until_at(now: DateTime<Utc>, target: DateTime<Utc>) -> i64 {
    let seconds = (target - now).num_seconds();
    (seconds as f64 / 86_400.0).ceil() as i64
}

/// Days until `target` from the current instant
pub fn days_until(target: DateTime<Utc>) -> i64 {
    days_until_at(Utc::now(), target)
}

/// Human-readable countdown, e.g. "today", "tomorrow", "in 5 days", "in 2 weeks"
pub fn time_until_string_at(now: DateTime<Utc>, target: DateTime<Utc>) -> String {
    let days = days_until_at(now, target);

    match days {
        d if d < 0 => "past".to_string(),
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        d if d <= 7 => format!("in {} days", d),
        d => {
            let weeks = d / 7;
            format!("in {} week{}", weeks, if weeks > 1 { "s" } else { "" })
        }
    }
}

/// Countdown string from the current instant
pub fn time_until_string(target: DateTime<Utc>) -> String {
    time_until_string_at(Utc::now(), target)
}

/// Check if a date falls on today (UTC)
pub fn is_today(date: DateTime<Utc>) -> bool {
    date.date_naive() == Utc::now().date_naive()
}

/// Check if a date is in the past
pub fn is_past(date: DateTime<Utc>) -> bool {
    date < Utc::now()
}

/// Midnight at the start of today (UTC)
pub fn start_of_today() -> DateTime<Utc> {
    let today = Utc::now().date_naive();
    Utc.from_utc_datetime(&today.and_hms_opt(0, 0, 0).unwrap())
}

/// Last instant of the day containing `date`
pub fn end_of_day(date: DateTime<Utc>) -> DateTime<Utc> {
    let day = date.date_naive();
    Utc.from_utc_datetime(&day.and_hms_opt(23, 59, 59).unwrap())
}

/// Generate the 42-cell month grid for a calendar view.
///
/// The grid is six Sunday-first weeks covering the month that contains
/// `month`, padded with trailing days of the previous month and leading
/// days of the next month.
pub fn month_grid(month: NaiveDate) -> Vec<NaiveDate> {
    let first = month.with_day(1).unwrap();
    let offset = first.weekday().num_days_from_sunday() as i64;
    let grid_start = first - Duration::days(offset);

    (0..GRID_CELLS as i64)
        .map(|i| grid_start + Duration::days(i))
        .collect()
}

/// Group events by the UTC date they start on.
///
/// Input order is preserved within each day.
pub fn group_events_by_date(events: &[CalendarEvent]) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events {
        grouped
            .entry(event.start_time.date_naive())
            .or_default()
            .push(event.clone());
    }
    grouped
}
