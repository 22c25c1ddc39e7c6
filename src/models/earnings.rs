//! Earnings breakdown models.
//!
//! This module contains the [`EarningsBreakdown`] produced for a single day and
//! the coarser [`DailyEarnings`] projection of it. Values are kept unrounded;
//! [`EarningsBreakdown::rounded`] and [`round_currency`] are for output layers.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{CompletionType, LeaveKind};

/// Rounds a monetary amount to cents, half away from zero.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::models::round_currency;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("127.998").unwrap();
/// assert_eq!(round_currency(amount), Decimal::from_str("128.00").unwrap());
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Hour buckets of the ordinary day. They partition the recorded hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinaryHours {
    /// Work hours within the 8-hour day.
    pub daily_work: Decimal,
    /// Travel hours filling the remaining capacity of the 8-hour day.
    pub daily_travel: Decimal,
    /// Work hours beyond the 8-hour day.
    pub extra_work: Decimal,
    /// Travel hours beyond the 8-hour day.
    pub extra_travel: Decimal,
}

impl OrdinaryHours {
    /// Sum of all buckets.
    pub fn total(&self) -> Decimal {
        self.daily_work + self.daily_travel + self.extra_work + self.extra_travel
    }
}

/// Earning buckets of the ordinary day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinaryEarnings {
    /// Daily rate (full day) or proportional pay (partial day).
    pub daily_rate: Decimal,
    /// Pay for excess work hours.
    pub extra_work: Decimal,
    /// Pay for excess travel hours.
    pub extra_travel: Decimal,
    /// Saturday bonus over the base rate.
    pub saturday_bonus: Decimal,
    /// Sunday bonus over the base rate.
    pub sunday_bonus: Decimal,
    /// Holiday bonus over the base rate.
    pub holiday_bonus: Decimal,
    /// Night-shift differential on a weekday.
    pub night_bonus: Decimal,
}

impl OrdinaryEarnings {
    /// Sum of all buckets.
    pub fn total(&self) -> Decimal {
        self.daily_rate
            + self.extra_work
            + self.extra_travel
            + self.saturday_bonus
            + self.sunday_bonus
            + self.holiday_bonus
            + self.night_bonus
    }

    pub(crate) fn rounded(&self) -> Self {
        Self {
            daily_rate: round_currency(self.daily_rate),
            extra_work: round_currency(self.extra_work),
            extra_travel: round_currency(self.extra_travel),
            saturday_bonus: round_currency(self.saturday_bonus),
            sunday_bonus: round_currency(self.sunday_bonus),
            holiday_bonus: round_currency(self.holiday_bonus),
            night_bonus: round_currency(self.night_bonus),
        }
    }
}

/// Ordinary part of a day's earnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinaryBreakdown {
    /// Hour buckets.
    pub hours: OrdinaryHours,
    /// Earning buckets.
    pub earnings: OrdinaryEarnings,
    /// Sum of the earning buckets.
    pub total: Decimal,
}

/// The four on-call time bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBand {
    /// Weekday daytime.
    Ordinary,
    /// Weekday night.
    Night,
    /// Sunday or holiday daytime.
    Holiday,
    /// Sunday or holiday night.
    NightHoliday,
}

impl TimeBand {
    /// All bands, in reporting order.
    pub const ALL: [TimeBand; 4] = [
        TimeBand::Ordinary,
        TimeBand::Night,
        TimeBand::Holiday,
        TimeBand::NightHoliday,
    ];

    /// Band of a minute given its night and holiday status.
    pub fn classify(is_night: bool, is_holiday: bool) -> Self {
        match (is_night, is_holiday) {
            (false, false) => TimeBand::Ordinary,
            (true, false) => TimeBand::Night,
            (false, true) => TimeBand::Holiday,
            (true, true) => TimeBand::NightHoliday,
        }
    }
}

/// A value per time band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandValues {
    /// Ordinary band.
    pub ordinary: Decimal,
    /// Night band.
    pub night: Decimal,
    /// Holiday band.
    pub holiday: Decimal,
    /// Night-holiday band.
    pub night_holiday: Decimal,
}

impl BandValues {
    /// Value for one band.
    pub fn get(&self, band: TimeBand) -> Decimal {
        match band {
            TimeBand::Ordinary => self.ordinary,
            TimeBand::Night => self.night,
            TimeBand::Holiday => self.holiday,
            TimeBand::NightHoliday => self.night_holiday,
        }
    }

    /// Mutable slot for one band.
    pub fn get_mut(&mut self, band: TimeBand) -> &mut Decimal {
        match band {
            TimeBand::Ordinary => &mut self.ordinary,
            TimeBand::Night => &mut self.night,
            TimeBand::Holiday => &mut self.holiday,
            TimeBand::NightHoliday => &mut self.night_holiday,
        }
    }

    /// Adds `other` band by band.
    pub fn accumulate(&mut self, other: &BandValues) {
        for band in TimeBand::ALL {
            *self.get_mut(band) += other.get(band);
        }
    }

    /// Sum across bands.
    pub fn total(&self) -> Decimal {
        self.ordinary + self.night + self.holiday + self.night_holiday
    }

    pub(crate) fn map(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self {
            ordinary: f(self.ordinary),
            night: f(self.night),
            holiday: f(self.holiday),
            night_holiday: f(self.night_holiday),
        }
    }
}

/// On-call part of a day's earnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbyBreakdown {
    /// Intervention work hours per band.
    pub work_hours: BandValues,
    /// Intervention travel hours per band.
    pub travel_hours: BandValues,
    /// Intervention work pay per band.
    pub work_earnings: BandValues,
    /// Intervention travel pay per band.
    pub travel_earnings: BandValues,
    /// Daily indemnity included in this component.
    pub daily_indemnity: Decimal,
    /// Work pay + travel pay + included indemnity.
    pub total_earnings: Decimal,
}

/// Allowances of the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// Travel allowance (indennità di trasferta).
    pub travel: Decimal,
    /// On-call indemnity not already included in the standby component.
    pub standby: Decimal,
    /// Meal allowance. Non-taxable and excluded from the day total.
    pub meal: Decimal,
}

/// How weekday hours beyond the threshold were paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExcessRouting {
    /// No weekday excess.
    #[default]
    None,
    /// Paid at the travel compensation rate.
    Travel,
    /// Paid as daytime overtime.
    OvertimeDay,
    /// Paid as night overtime.
    OvertimeNight,
}

/// Classification and threshold facts about the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetails {
    /// The day is a Saturday.
    pub is_saturday: bool,
    /// The day is a Sunday.
    pub is_sunday: bool,
    /// The day is a public holiday.
    pub is_holiday: bool,
    /// The day counts as on call.
    pub is_standby_day: bool,
    /// Hours within the 8-hour day.
    pub regular_hours: Decimal,
    /// Hours beyond the 8-hour day.
    pub extra_hours: Decimal,
    /// A weekday with fewer than 8 recorded hours.
    pub is_partial_day: bool,
    /// Hours missing to complete the 8-hour day.
    pub missing_hours: Decimal,
    /// How a partial day is completed (annotation only).
    pub completion_type: Option<CompletionType>,
    /// Full-day leave.
    pub leave: Option<LeaveKind>,
    /// How weekday excess was paid.
    pub excess_routing: ExcessRouting,
    /// Multiplier applied to every hour of a special day.
    pub special_day_multiplier: Option<Decimal>,
}

/// The itemized earnings of one day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsBreakdown {
    /// The entry date as supplied.
    pub date: String,
    /// Ordinary work and travel.
    pub ordinary: OrdinaryBreakdown,
    /// On-call interventions, present on standby days.
    pub standby: Option<StandbyBreakdown>,
    /// Allowances.
    pub allowances: Allowances,
    /// ordinary + standby + travel allowance + standby allowance.
    pub total_earnings: Decimal,
    /// Day classification and thresholds.
    pub details: DayDetails,
}

impl EarningsBreakdown {
    /// Recomputes the day total from its components.
    pub fn component_total(&self) -> Decimal {
        self.ordinary.total
            + self
                .standby
                .as_ref()
                .map_or(Decimal::ZERO, |standby| standby.total_earnings)
            + self.allowances.travel
            + self.allowances.standby
    }

    /// A copy with money rounded to cents and hours to two decimals, for display.
    pub fn rounded(&self) -> Self {
        let hours = |h: Decimal| h.round_dp(2);
        Self {
            date: self.date.clone(),
            ordinary: OrdinaryBreakdown {
                hours: OrdinaryHours {
                    daily_work: hours(self.ordinary.hours.daily_work),
                    daily_travel: hours(self.ordinary.hours.daily_travel),
                    extra_work: hours(self.ordinary.hours.extra_work),
                    extra_travel: hours(self.ordinary.hours.extra_travel),
                },
                earnings: self.ordinary.earnings.rounded(),
                total: round_currency(self.ordinary.total),
            },
            standby: self.standby.as_ref().map(|standby| StandbyBreakdown {
                work_hours: standby.work_hours.map(hours),
                travel_hours: standby.travel_hours.map(hours),
                work_earnings: standby.work_earnings.map(round_currency),
                travel_earnings: standby.travel_earnings.map(round_currency),
                daily_indemnity: round_currency(standby.daily_indemnity),
                total_earnings: round_currency(standby.total_earnings),
            }),
            allowances: Allowances {
                travel: round_currency(self.allowances.travel),
                standby: round_currency(self.allowances.standby),
                meal: round_currency(self.allowances.meal),
            },
            total_earnings: round_currency(self.total_earnings),
            details: DayDetails {
                regular_hours: hours(self.details.regular_hours),
                extra_hours: hours(self.details.extra_hours),
                missing_hours: hours(self.details.missing_hours),
                ..self.details.clone()
            },
        }
    }
}

/// Coarser single-day totals, projected from an [`EarningsBreakdown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEarnings {
    /// Daily rate or proportional pay, plus special-day bonuses.
    pub regular_pay: Decimal,
    /// Excess hours paid as overtime.
    pub overtime_pay: Decimal,
    /// Weekday night-shift differential.
    pub ordinary_bonus_pay: Decimal,
    /// Excess hours paid at the travel rate.
    pub travel_pay: Decimal,
    /// On-call work pay.
    pub standby_work_pay: Decimal,
    /// On-call travel pay.
    pub standby_travel_pay: Decimal,
    /// On-call indemnity paid on the day.
    pub standby_allowance: Decimal,
    /// Travel allowance.
    pub travel_allowance: Decimal,
    /// Day total (meal allowance excluded).
    pub total: Decimal,
    /// The canonical breakdown the totals were projected from.
    pub breakdown: EarningsBreakdown,
    /// Meal allowance, reported apart from the total.
    pub meal_allowances: Decimal,
}

impl DailyEarnings {
    /// A copy rounded for display.
    pub fn rounded(&self) -> Self {
        Self {
            regular_pay: round_currency(self.regular_pay),
            overtime_pay: round_currency(self.overtime_pay),
            ordinary_bonus_pay: round_currency(self.ordinary_bonus_pay),
            travel_pay: round_currency(self.travel_pay),
            standby_work_pay: round_currency(self.standby_work_pay),
            standby_travel_pay: round_currency(self.standby_travel_pay),
            standby_allowance: round_currency(self.standby_allowance),
            travel_allowance: round_currency(self.travel_allowance),
            total: round_currency(self.total),
            breakdown: self.breakdown.rounded(),
            meal_allowances: round_currency(self.meal_allowances),
        }
    }
}
