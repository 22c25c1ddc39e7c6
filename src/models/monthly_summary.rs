//! Monthly summary models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{BandValues, EarningsBreakdown, OrdinaryEarnings, OrdinaryHours, round_currency};

/// Number of days per category in a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounts {
    /// Days with recorded work or travel.
    pub worked_days: u32,
    /// Saturdays, Sundays and holidays with recorded hours.
    pub weekend_holiday_days: u32,
    /// Days counted as on call.
    pub standby_days: u32,
    /// Days paid a travel allowance.
    pub travel_allowance_days: u32,
    /// Days with at least one meal voucher.
    pub meal_voucher_days: u32,
    /// Days with at least one cash meal payment.
    pub meal_cash_days: u32,
    /// Weekdays with fewer than 8 recorded hours.
    pub partial_days: u32,
    /// Vacation or permit days.
    pub leave_days: u32,
}

/// Pay for hours beyond the 8-hour day, by how it was paid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeBreakdown {
    /// Weekday daytime overtime.
    pub day: Decimal,
    /// Weekday night overtime.
    pub night: Decimal,
    /// Weekday excess paid at the travel rate.
    pub travel_excess: Decimal,
    /// Saturday hours beyond 8.
    pub saturday: Decimal,
    /// Sunday and holiday hours beyond 8.
    pub holiday: Decimal,
}

impl OvertimeBreakdown {
    /// Sum of all sub-types.
    pub fn total(&self) -> Decimal {
        self.day + self.night + self.travel_excess + self.saturday + self.holiday
    }

    fn rounded(&self) -> Self {
        Self {
            day: round_currency(self.day),
            night: round_currency(self.night),
            travel_excess: round_currency(self.travel_excess),
            saturday: round_currency(self.saturday),
            holiday: round_currency(self.holiday),
        }
    }
}

/// An entry the monthly fold could not process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// The entry date as supplied.
    pub date: String,
    /// Why it was skipped.
    pub reason: String,
}

/// The on-call indemnity of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandbyAllowanceDay {
    /// The day.
    pub date: NaiveDate,
    /// The indemnity amount.
    pub allowance: Decimal,
}

/// Totals and per-day drill-down for one month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Calendar year.
    pub year: i32,
    /// Calendar month (1-12).
    pub month: u32,
    /// Summed ordinary hour buckets.
    pub ordinary_hours: OrdinaryHours,
    /// Summed ordinary earning buckets.
    pub ordinary_earnings: OrdinaryEarnings,
    /// Summed ordinary totals.
    pub ordinary_total: Decimal,
    /// Summed on-call work hours per band.
    pub standby_work_hours: BandValues,
    /// Summed on-call travel hours per band.
    pub standby_travel_hours: BandValues,
    /// Summed on-call work pay per band.
    pub standby_work_earnings: BandValues,
    /// Summed on-call travel pay per band.
    pub standby_travel_earnings: BandValues,
    /// Summed on-call component totals.
    pub standby_total: Decimal,
    /// Indemnity paid, whether inside the on-call component or as an allowance.
    pub standby_indemnity: Decimal,
    /// Summed travel allowances.
    pub travel_allowance: Decimal,
    /// Summed standby allowances.
    pub standby_allowance: Decimal,
    /// Summed meal allowances (excluded from the total).
    pub meal_allowance: Decimal,
    /// Excess-hour pay by sub-type.
    pub overtime: OvertimeBreakdown,
    /// Day counts by category.
    pub day_counts: DayCounts,
    /// Sum of the day totals.
    pub total_earnings: Decimal,
    /// Per-day breakdowns in entry order.
    pub days: Vec<EarningsBreakdown>,
    /// Entries that were skipped.
    pub skipped: Vec<SkippedEntry>,
}

impl MonthlySummary {
    /// A copy with money rounded to cents and hours to two decimals, for display.
    ///
    /// Totals are rounded from the unrounded sums, so they may differ by a cent
    /// from the sum of the rounded days.
    pub fn rounded(&self) -> Self {
        let hours = |h: Decimal| h.round_dp(2);
        Self {
            year: self.year,
            month: self.month,
            ordinary_hours: OrdinaryHours {
                daily_work: hours(self.ordinary_hours.daily_work),
                daily_travel: hours(self.ordinary_hours.daily_travel),
                extra_work: hours(self.ordinary_hours.extra_work),
                extra_travel: hours(self.ordinary_hours.extra_travel),
            },
            ordinary_earnings: self.ordinary_earnings.rounded(),
            ordinary_total: round_currency(self.ordinary_total),
            standby_work_hours: self.standby_work_hours.map(hours),
            standby_travel_hours: self.standby_travel_hours.map(hours),
            standby_work_earnings: self.standby_work_earnings.map(round_currency),
            standby_travel_earnings: self.standby_travel_earnings.map(round_currency),
            standby_total: round_currency(self.standby_total),
            standby_indemnity: round_currency(self.standby_indemnity),
            travel_allowance: round_currency(self.travel_allowance),
            standby_allowance: round_currency(self.standby_allowance),
            meal_allowance: round_currency(self.meal_allowance),
            overtime: self.overtime.rounded(),
            day_counts: self.day_counts.clone(),
            total_earnings: round_currency(self.total_earnings),
            days: self.days.iter().map(EarningsBreakdown::rounded).collect(),
            skipped: self.skipped.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_overtime_breakdown_total() {
        let overtime = OvertimeBreakdown {
            day: dec("19.69"),
            night: dec("24.62"),
            travel_excess: dec("16.41"),
            saturday: dec("18.87"),
            holiday: Decimal::ZERO,
        };
        assert_eq!(overtime.total(), dec("79.59"));
    }

    #[test]
    fn test_rounded_summary() {
        let summary = MonthlySummary {
            ordinary_total: dec("255.5985"),
            total_earnings: dec("255.5985"),
            overtime: OvertimeBreakdown {
                saturday: dec("18.8715"),
                ..OvertimeBreakdown::default()
            },
            ..MonthlySummary::default()
        };
        let rounded = summary.rounded();

        assert_eq!(rounded.total_earnings, dec("255.60"));
        assert_eq!(rounded.overtime.saturday, dec("18.87"));
    }

    #[test]
    fn test_summary_serialization_has_counts() {
        let summary = MonthlySummary {
            year: 2025,
            month: 3,
            ..MonthlySummary::default()
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["month"], 3);
        assert_eq!(json["day_counts"]["standby_days"], 0);
        assert!(json["days"].as_array().unwrap().is_empty());
    }
}
