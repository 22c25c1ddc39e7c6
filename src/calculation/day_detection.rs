//! Calendar classification.
//!
//! This module decides whether a date is a weekday, Saturday, Sunday or public
//! holiday under the Italian calendar, and whether an hour of the day falls in
//! the night window.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::{NightWindow, Settings};

/// Fixed-date national holidays as (month, day).
const FIXED_HOLIDAYS: [(u32, u32); 10] = [
    (1, 1),   // Capodanno
    (1, 6),   // Epifania
    (4, 25),  // Liberazione
    (5, 1),   // Festa del Lavoro
    (6, 2),   // Festa della Repubblica
    (8, 15),  // Ferragosto
    (11, 1),  // Ognissanti
    (12, 8),  // Immacolata
    (12, 25), // Natale
    (12, 26), // Santo Stefano
];

/// Represents the type of day for rate selection.
///
/// A holiday takes precedence over the weekday it falls on.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::DayType;
///
/// let day_type = DayType::Holiday;
/// assert_eq!(day_type.to_string(), "Holiday");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    /// Monday through Friday, not a holiday (feriale).
    Weekday,
    /// Saturday, not a holiday.
    Saturday,
    /// Sunday, not a holiday.
    Sunday,
    /// A national or configured public holiday.
    Holiday,
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DayType::Weekday => write!(f, "Weekday"),
            DayType::Saturday => write!(f, "Saturday"),
            DayType::Sunday => write!(f, "Sunday"),
            DayType::Holiday => write!(f, "Holiday"),
        }
    }
}

/// The calendar facts about one date.
///
/// Saturday and Sunday flags are kept even when the date is also a holiday,
/// so callers can report all three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayClassification {
    /// The date is a Saturday.
    pub is_saturday: bool,
    /// The date is a Sunday.
    pub is_sunday: bool,
    /// The date is a public holiday.
    pub is_holiday: bool,
}

impl DayClassification {
    /// The single day type, holidays first.
    pub fn day_type(&self) -> DayType {
        if self.is_holiday {
            DayType::Holiday
        } else if self.is_sunday {
            DayType::Sunday
        } else if self.is_saturday {
            DayType::Saturday
        } else {
            DayType::Weekday
        }
    }

    /// Saturday, Sunday or holiday.
    pub fn is_special(&self) -> bool {
        self.is_saturday || self.is_sunday || self.is_holiday
    }

    /// Sunday or holiday: the days that carry holiday rates.
    pub fn is_festive(&self) -> bool {
        self.is_sunday || self.is_holiday
    }
}

/// Easter Sunday of `year` (Gregorian computus).
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2025), NaiveDate::from_ymd_opt(2025, 4, 20));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Whether `date` is a public holiday.
///
/// Covers the fixed national holidays, Easter Monday, and any `extra` dates
/// (such as a local patron saint's day).
pub fn is_holiday(date: NaiveDate, extra: &[NaiveDate]) -> bool {
    if FIXED_HOLIDAYS.contains(&(date.month(), date.day())) {
        return true;
    }
    let easter_monday = easter_sunday(date.year()).and_then(|easter| easter.succ_opt());
    easter_monday == Some(date) || extra.contains(&date)
}

/// Whether `date` is a Sunday.
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Whether `date` is a Saturday.
pub fn is_saturday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Classifies a date against the national calendar and the configured extras.
pub fn classify_day(date: NaiveDate, settings: &Settings) -> DayClassification {
    DayClassification {
        is_saturday: is_saturday(date),
        is_sunday: is_sunday(date),
        is_holiday: is_holiday(date, &settings.extra_holidays),
    }
}

/// Determines the day type for a date.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::{get_day_type, DayType};
/// use ccnl_earnings_engine::config::Settings;
/// use chrono::NaiveDate;
///
/// let settings = Settings::default();
/// // 2025-12-25 is a Thursday
/// let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
/// assert_eq!(get_day_type(christmas, &settings), DayType::Holiday);
/// ```
pub fn get_day_type(date: NaiveDate, settings: &Settings) -> DayType {
    classify_day(date, settings).day_type()
}

/// Whether `hour` (0-23) lies in the night window.
///
/// The window is `[start_hour, end_hour)`, wrapping past midnight when the
/// start is later than the end. An empty window never matches.
pub fn is_night_hour(hour: u32, window: &NightWindow) -> bool {
    let (start, end) = (window.start_hour, window.end_hour);
    if start > end {
        hour >= start || hour < end
    } else {
        hour >= start && hour < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easter_known_years() {
        assert_eq!(easter_sunday(2024), Some(date(2024, 3, 31)));
        assert_eq!(easter_sunday(2025), Some(date(2025, 4, 20)));
        assert_eq!(easter_sunday(2026), Some(date(2026, 4, 5)));
        assert_eq!(easter_sunday(2000), Some(date(2000, 4, 23)));
    }

    #[test]
    fn test_fixed_holidays() {
        for (m, d) in FIXED_HOLIDAYS {
            assert!(is_holiday(date(2025, m, d), &[]), "{}-{} should be a holiday", m, d);
        }
        assert!(!is_holiday(date(2025, 3, 4), &[]));
    }

    #[test]
    fn test_easter_monday_is_holiday_but_easter_sunday_is_not() {
        assert!(is_holiday(date(2025, 4, 21), &[]));
        assert!(!is_holiday(date(2025, 4, 20), &[]));
    }

    #[test]
    fn test_extra_holidays() {
        // Sant'Ambrogio, Milan
        let extra = [date(2025, 12, 7)];
        assert!(is_holiday(date(2025, 12, 7), &extra));
        assert!(!is_holiday(date(2025, 12, 7), &[]));
    }

    #[test]
    fn test_day_type_precedence() {
        let settings = Settings::default();
        // 2025-03-08 Saturday, 2025-03-09 Sunday, 2025-03-10 Monday
        assert_eq!(get_day_type(date(2025, 3, 8), &settings), DayType::Saturday);
        assert_eq!(get_day_type(date(2025, 3, 9), &settings), DayType::Sunday);
        assert_eq!(get_day_type(date(2025, 3, 10), &settings), DayType::Weekday);
        // 2027-12-26 is a Sunday and Santo Stefano
        let classification = classify_day(date(2027, 12, 26), &settings);
        assert!(classification.is_sunday);
        assert_eq!(classification.day_type(), DayType::Holiday);
    }

    #[test]
    fn test_special_and_festive() {
        let saturday = DayClassification {
            is_saturday: true,
            ..DayClassification::default()
        };
        assert!(saturday.is_special());
        assert!(!saturday.is_festive());
        assert!(!DayClassification::default().is_special());
    }

    #[test]
    fn test_night_hour_wrapping_window() {
        let window = NightWindow::default();
        assert!(is_night_hour(22, &window));
        assert!(is_night_hour(23, &window));
        assert!(is_night_hour(0, &window));
        assert!(is_night_hour(5, &window));
        assert!(!is_night_hour(6, &window));
        assert!(!is_night_hour(21, &window));
    }

    #[test]
    fn test_night_hour_non_wrapping_and_empty_window() {
        let window = NightWindow {
            start_hour: 0,
            end_hour: 5,
        };
        assert!(is_night_hour(0, &window));
        assert!(!is_night_hour(5, &window));

        let empty = NightWindow {
            start_hour: 3,
            end_hour: 3,
        };
        assert!((0..24).all(|hour| !is_night_hour(hour, &empty)));
    }
}
