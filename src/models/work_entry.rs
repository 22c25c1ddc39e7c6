//! Work entry model and related types.
//!
//! A [`WorkEntry`] is one day of recorded activity as supplied by the
//! persistence layer: work shifts, travel legs, on-call interventions, meals
//! and leave. Times are kept as the caller's raw `"HH:MM"` text and the date
//! as `"YYYY-MM-DD"` text, so incomplete records stay computable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest cash amount accepted for a single meal.
pub const MAX_MEAL_CASH: Decimal = Decimal::from_parts(100_000, 0, 0, false, 2);

/// A start/end pair of `"HH:MM"` times. Either side may be empty or malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// The start time.
    #[serde(default)]
    pub start: String,
    /// The end time. An end before the start wraps past midnight.
    #[serde(default)]
    pub end: String,
}

impl TimeSpan {
    /// Creates a span from two time strings.
    ///
    /// # Example
    ///
    /// ```
    /// use ccnl_earnings_engine::models::TimeSpan;
    ///
    /// let span = TimeSpan::new("08:00", "12:00");
    /// assert_eq!(span.start, "08:00");
    /// ```
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// One on-call response event with its own travel and work legs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intervention {
    /// Travel from home or company to the site.
    pub outbound_travel: Option<TimeSpan>,
    /// Up to two work sub-shifts; extra shifts are ignored.
    pub work_shifts: Vec<TimeSpan>,
    /// Travel back from the site.
    pub return_travel: Option<TimeSpan>,
}

/// Meal record for a single meal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MealRecord {
    /// A meal voucher was granted.
    pub voucher: bool,
    /// A specific cash amount was paid. Takes precedence over the voucher.
    pub cash: Option<Decimal>,
}

/// Full-day leave that replaces the working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveKind {
    /// Vacation (ferie).
    Vacation,
    /// Paid permit (permesso).
    Permit,
}

/// How the missing hours of a partial day are covered.
///
/// An annotation only: it is carried into the breakdown but does not change
/// the amounts computed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    /// Covered with vacation hours.
    Vacation,
    /// Covered with permit hours.
    Permit,
    /// Covered with sick leave.
    Sick,
    /// Covered with compensatory rest.
    CompensatoryRest,
}

/// One day of recorded activity.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::models::{TimeSpan, WorkEntry};
///
/// let entry = WorkEntry {
///     date: "2025-03-04".to_string(),
///     work_shifts: vec![TimeSpan::new("08:00", "17:00")],
///     ..WorkEntry::default()
/// };
/// assert!(entry.parsed_date().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkEntry {
    /// The day, as `"YYYY-MM-DD"`.
    pub date: String,
    /// Up to two work shifts; extra shifts are ignored.
    pub work_shifts: Vec<TimeSpan>,
    /// Outbound travel leg.
    pub outbound_travel: Option<TimeSpan>,
    /// Return travel leg.
    pub return_travel: Option<TimeSpan>,
    /// Explicit on-call flag. `None` defers to the settings calendar.
    pub standby: Option<bool>,
    /// On-call interventions, in the order they happened.
    pub interventions: Vec<Intervention>,
    /// The ordinary work of the day was a night shift.
    pub is_night_shift: bool,
    /// Lunch record.
    pub lunch: MealRecord,
    /// Dinner record.
    pub dinner: MealRecord,
    /// Full-day leave.
    pub leave: Option<LeaveKind>,
    /// How a partial day is completed.
    pub completion_type: Option<CompletionType>,
    /// Fraction of the travel allowance granted (1 = full).
    pub travel_allowance_percent: Decimal,
    /// Grant the travel allowance even on special days.
    pub travel_allowance_override: bool,
}

impl Default for WorkEntry {
    fn default() -> Self {
        Self {
            date: String::new(),
            work_shifts: Vec::new(),
            outbound_travel: None,
            return_travel: None,
            standby: None,
            interventions: Vec::new(),
            is_night_shift: false,
            lunch: MealRecord::default(),
            dinner: MealRecord::default(),
            leave: None,
            completion_type: None,
            travel_allowance_percent: Decimal::ONE,
            travel_allowance_override: false,
        }
    }
}

impl WorkEntry {
    /// Parses the entry date, returning `None` when it is not a valid date.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    /// Whether the day is covered by full-day leave.
    pub fn is_leave(&self) -> bool {
        self.leave.is_some()
    }

    /// Checks the fields a calculation cannot degrade around.
    ///
    /// Returns an `InvalidEntry` error if:
    /// - The date cannot be parsed
    /// - A meal cash amount is negative or above [`MAX_MEAL_CASH`]
    /// - The travel allowance percentage is outside 0..=1
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::InvalidEntry {
            date: self.date.clone(),
            message: message.to_string(),
        };

        if self.parsed_date().is_none() {
            return Err(invalid("unparseable date"));
        }
        for (meal, record) in [("lunch", &self.lunch), ("dinner", &self.dinner)] {
            if record.cash.is_some_and(|cash| cash.is_sign_negative()) {
                return Err(invalid(&format!("negative {} cash amount", meal)));
            }
            if record.cash.is_some_and(|cash| cash > MAX_MEAL_CASH) {
                return Err(invalid(&format!(
                    "{} cash amount exceeds {}",
                    meal, MAX_MEAL_CASH
                )));
            }
        }
        if self.travel_allowance_percent.is_sign_negative() {
            return Err(invalid("negative travel allowance percentage"));
        }
        if self.travel_allowance_percent > Decimal::ONE {
            return Err(invalid("travel allowance percentage above 1"));
        }
        Ok(())
    }
}
