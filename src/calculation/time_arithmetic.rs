//! Time arithmetic over `"HH:MM"` strings.
//!
//! Times are converted to minutes since midnight. A span whose end precedes
//! its start wraps past midnight. Malformed or missing times never raise: they
//! contribute zero minutes.

use chrono::{NaiveTime, Timelike};
use rust_decimal::Decimal;

use crate::models::TimeSpan;

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 1440;

/// Parses `"HH:MM"` into minutes since midnight.
///
/// Returns `None` for empty or malformed input.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::parse_time;
///
/// assert_eq!(parse_time("08:30"), Some(510));
/// assert_eq!(parse_time("25:00"), None);
/// assert_eq!(parse_time(""), None);
/// ```
pub fn parse_time(raw: &str) -> Option<u32> {
    let time = NaiveTime::parse_from_str(raw.trim(), "%H:%M").ok()?;
    Some(time.hour() * 60 + time.minute())
}

/// Minutes from `start` to `end`, wrapping past midnight when `end < start`.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::duration_minutes;
///
/// assert_eq!(duration_minutes(8 * 60, 17 * 60), 540);
/// assert_eq!(duration_minutes(22 * 60, 6 * 60), 480);
/// ```
pub fn duration_minutes(start: u32, end: u32) -> u32 {
    if end < start {
        end + MINUTES_PER_DAY - start
    } else {
        end - start
    }
}

/// Start minute and duration of a span, or `None` if either end is unusable.
pub fn span_bounds(span: &TimeSpan) -> Option<(u32, u32)> {
    let start = parse_time(&span.start)?;
    let end = parse_time(&span.end)?;
    Some((start, duration_minutes(start, end)))
}

/// Duration of a span in minutes; zero when either end is unusable.
pub fn span_minutes(span: &TimeSpan) -> u32 {
    span_bounds(span).map_or(0, |(_, minutes)| minutes)
}

/// Whether a span was partly filled in but cannot be used.
///
/// A span with both ends blank is simply absent and is not reported.
pub fn is_incomplete(span: &TimeSpan) -> bool {
    let blank = span.start.trim().is_empty() && span.end.trim().is_empty();
    !blank && span_bounds(span).is_none()
}

/// Converts minutes to decimal hours.
pub fn minutes_to_hours(minutes: u32) -> Decimal {
    Decimal::from(minutes) / Decimal::from(60)
}
