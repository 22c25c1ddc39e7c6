//! Monthly aggregation.
//!
//! The summary is a fold over the entries of one month, in entry order. Each
//! entry is computed independently, so [`calculate_monthly_summary_parallel`]
//! computes them with rayon and then runs the same ordered fold.

use chrono::Datelike;
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::models::{EarningsBreakdown, ExcessRouting, MonthlySummary, SkippedEntry, WorkEntry};

use super::{MealAllowanceResult, calculate_earnings_breakdown, calculate_meal_allowance};

enum Prepared {
    Day(Box<EarningsBreakdown>, MealAllowanceResult),
    Skipped(SkippedEntry),
    OutOfPeriod,
}

fn prepare(entry: &WorkEntry, settings: &Settings, year: i32, month: u32) -> Prepared {
    if let Err(err) = entry.validate() {
        return Prepared::Skipped(SkippedEntry {
            date: entry.date.clone(),
            reason: err.to_string(),
        });
    }
    match entry.parsed_date() {
        Some(date) if date.year() == year && date.month() == month => {}
        _ => return Prepared::OutOfPeriod,
    }

    let breakdown = calculate_earnings_breakdown(entry, settings);
    let meals = if entry.is_leave() {
        MealAllowanceResult::default()
    } else {
        calculate_meal_allowance(&entry.lunch, &entry.dinner, &settings.meal_allowances)
    };
    Prepared::Day(Box::new(breakdown), meals)
}

fn fold_day(
    summary: &mut MonthlySummary,
    breakdown: EarningsBreakdown,
    meals: &MealAllowanceResult,
    settings: &Settings,
) {
    let hours = &breakdown.ordinary.hours;
    let earnings = &breakdown.ordinary.earnings;
    let details = &breakdown.details;

    summary.ordinary_hours.daily_work += hours.daily_work;
    summary.ordinary_hours.daily_travel += hours.daily_travel;
    summary.ordinary_hours.extra_work += hours.extra_work;
    summary.ordinary_hours.extra_travel += hours.extra_travel;

    let totals = &mut summary.ordinary_earnings;
    totals.daily_rate += earnings.daily_rate;
    totals.extra_work += earnings.extra_work;
    totals.extra_travel += earnings.extra_travel;
    totals.saturday_bonus += earnings.saturday_bonus;
    totals.sunday_bonus += earnings.sunday_bonus;
    totals.holiday_bonus += earnings.holiday_bonus;
    totals.night_bonus += earnings.night_bonus;
    summary.ordinary_total += breakdown.ordinary.total;

    if let Some(standby) = &breakdown.standby {
        summary.standby_work_hours.accumulate(&standby.work_hours);
        summary.standby_travel_hours.accumulate(&standby.travel_hours);
        summary.standby_work_earnings.accumulate(&standby.work_earnings);
        summary.standby_travel_earnings.accumulate(&standby.travel_earnings);
        summary.standby_total += standby.total_earnings;
        summary.standby_indemnity += standby.daily_indemnity;
    }
    summary.standby_indemnity += breakdown.allowances.standby;
    summary.travel_allowance += breakdown.allowances.travel;
    summary.standby_allowance += breakdown.allowances.standby;
    summary.meal_allowance += breakdown.allowances.meal;

    let excess = earnings.extra_work + earnings.extra_travel;
    match details.excess_routing {
        ExcessRouting::Travel => summary.overtime.travel_excess += excess,
        ExcessRouting::OvertimeDay => summary.overtime.day += excess,
        ExcessRouting::OvertimeNight => summary.overtime.night += excess,
        ExcessRouting::None => {
            if let Some(multiplier) = details.special_day_multiplier {
                let pay = details.extra_hours * settings.base_rate() * multiplier;
                if details.is_holiday || details.is_sunday {
                    summary.overtime.holiday += pay;
                } else {
                    summary.overtime.saturday += pay;
                }
            }
        }
    }

    let counts = &mut summary.day_counts;
    let worked = hours.total() > Decimal::ZERO;
    let special = details.is_saturday || details.is_sunday || details.is_holiday;
    counts.worked_days += u32::from(worked);
    counts.weekend_holiday_days += u32::from(worked && special);
    counts.standby_days += u32::from(details.is_standby_day);
    counts.travel_allowance_days += u32::from(breakdown.allowances.travel > Decimal::ZERO);
    counts.meal_voucher_days += u32::from(meals.voucher_meals > 0);
    counts.meal_cash_days += u32::from(meals.cash_meals > 0);
    counts.partial_days += u32::from(details.is_partial_day);
    counts.leave_days += u32::from(details.leave.is_some());

    summary.total_earnings += breakdown.total_earnings;
    summary.days.push(breakdown);
}

fn fold(
    prepared: impl IntoIterator<Item = Prepared>,
    settings: &Settings,
    month: u32,
    year: i32,
) -> MonthlySummary {
    let mut summary = MonthlySummary {
        year,
        month,
        ..MonthlySummary::default()
    };
    let mut out_of_period = 0usize;

    for item in prepared {
        match item {
            Prepared::Day(breakdown, meals) => fold_day(&mut summary, *breakdown, &meals, settings),
            Prepared::Skipped(skipped) => {
                warn!(date = %skipped.date, reason = %skipped.reason, "Skipping entry in monthly summary");
                summary.skipped.push(skipped);
            }
            Prepared::OutOfPeriod => out_of_period += 1,
        }
    }

    debug!(
        year,
        month,
        days = summary.days.len(),
        skipped = summary.skipped.len(),
        out_of_period,
        total = %summary.total_earnings,
        "Monthly summary computed"
    );
    summary
}

/// Aggregates the entries of one month into a summary.
///
/// Entries dated outside the month are ignored. Entries that fail
/// [`WorkEntry::validate`] are reported in `skipped` and do not stop the fold.
/// Values are summed unrounded.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::calculate_monthly_summary;
/// use ccnl_earnings_engine::config::Settings;
/// use ccnl_earnings_engine::models::{TimeSpan, WorkEntry};
///
/// let entries = vec![WorkEntry {
///     date: "2025-03-04".to_string(),
///     work_shifts: vec![TimeSpan::new("08:00", "16:00")],
///     ..WorkEntry::default()
/// }];
/// let summary = calculate_monthly_summary(&entries, &Settings::default(), 3, 2025);
/// assert_eq!(summary.day_counts.worked_days, 1);
/// ```
pub fn calculate_monthly_summary(
    entries: &[WorkEntry],
    settings: &Settings,
    month: u32,
    year: i32,
) -> MonthlySummary {
    fold(
        entries.iter().map(|entry| prepare(entry, settings, year, month)),
        settings,
        month,
        year,
    )
}

/// Same result as [`calculate_monthly_summary`], computing the days in parallel.
pub fn calculate_monthly_summary_parallel(
    entries: &[WorkEntry],
    settings: &Settings,
    month: u32,
    year: i32,
) -> MonthlySummary {
    let prepared: Vec<Prepared> = entries
        .par_iter()
        .map(|entry| prepare(entry, settings, year, month))
        .collect();
    fold(prepared, settings, month, year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StandbyIndemnityPolicy, TravelAllowanceOption, TravelHoursPolicy};
    use crate::models::{Intervention, LeaveKind, MealRecord, TimeSpan};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn entry(date: &str, shifts: &[(&str, &str)]) -> WorkEntry {
        WorkEntry {
            date: date.to_string(),
            work_shifts: shifts.iter().map(|(s, e)| TimeSpan::new(*s, *e)).collect(),
            ..WorkEntry::default()
        }
    }

    fn march_entries() -> Vec<WorkEntry> {
        let mut standby = entry("2025-03-05", &[("08:00", "16:00")]);
        standby.standby = Some(true);
        standby.interventions = vec![Intervention {
            outbound_travel: Some(TimeSpan::new("22:00", "22:30")),
            work_shifts: vec![TimeSpan::new("22:30", "00:30")],
            return_travel: Some(TimeSpan::new("00:30", "01:00")),
        }];
        standby.dinner = MealRecord {
            voucher: true,
            cash: None,
        };

        let mut partial = entry("2025-03-06", &[("08:00", "12:00")]);
        partial.lunch = MealRecord {
            voucher: false,
            cash: Some(dec("12.50")),
        };

        let mut vacation = entry("2025-03-07", &[]);
        vacation.leave = Some(LeaveKind::Vacation);

        let mut travel = entry("2025-03-10", &[("08:00", "17:00")]);
        travel.outbound_travel = Some(TimeSpan::new("07:00", "08:00"));

        vec![
            entry("2025-03-04", &[("08:00", "17:00")]),
            standby,
            partial,
            vacation,
            entry("2025-03-08", &[("08:00", "17:00")]),
            entry("2025-03-09", &[("08:00", "14:00")]),
            travel,
            entry("2025-04-01", &[("08:00", "16:00")]),
        ]
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.travel_allowance.enabled = true;
        settings.travel_allowance.daily_amount = dec("15.00");
        settings.travel_allowance.option = TravelAllowanceOption::WithTravel;
        settings.meal_allowances.dinner.voucher_amount = dec("8.00");
        settings
    }

    #[test]
    fn test_total_equals_sum_of_days() {
        let entries = march_entries();
        let settings = settings();
        let summary = calculate_monthly_summary(&entries, &settings, 3, 2025);

        let expected: Decimal = entries
            .iter()
            .filter(|e| e.date.starts_with("2025-03"))
            .map(|e| calculate_earnings_breakdown(e, &settings).total_earnings)
            .sum();
        assert_eq!(summary.total_earnings, expected);
        assert_eq!(summary.days.len(), 7);
    }

    #[test]
    fn test_day_counts() {
        let summary = calculate_monthly_summary(&march_entries(), &settings(), 3, 2025);
        let counts = &summary.day_counts;

        assert_eq!(counts.worked_days, 6);
        assert_eq!(counts.weekend_holiday_days, 2);
        assert_eq!(counts.standby_days, 1);
        assert_eq!(counts.travel_allowance_days, 1);
        assert_eq!(counts.meal_voucher_days, 1);
        assert_eq!(counts.meal_cash_days, 1);
        assert_eq!(counts.partial_days, 1);
        assert_eq!(counts.leave_days, 1);
    }

    #[test]
    fn test_overtime_buckets() {
        let summary = calculate_monthly_summary(&march_entries(), &settings(), 3, 2025);
        let overtime = &summary.overtime;

        // 03-04: 1h excess; 03-10: 2h excess (9h work + 1h travel)
        assert_eq!(overtime.travel_excess, dec("49.23"));
        // 03-08 Saturday: 1h beyond 8 at 16.41 * 1.15
        assert_eq!(overtime.saturday, dec("18.8715"));
        assert_eq!(overtime.holiday, Decimal::ZERO);
        assert_eq!(overtime.day + overtime.night, Decimal::ZERO);
    }

    #[test]
    fn test_overtime_policy_buckets() {
        let mut settings = settings();
        settings.travel_hours_setting = TravelHoursPolicy::ExcessAsOvertime;
        let mut night = entry("2025-03-11", &[("20:00", "06:00")]);
        night.is_night_shift = true;
        let entries = vec![entry("2025-03-04", &[("08:00", "17:00")]), night];
        let summary = calculate_monthly_summary(&entries, &settings, 3, 2025);

        assert_eq!(summary.overtime.day, dec("19.692"));
        assert_eq!(summary.overtime.night, dec("49.23"));
        assert_eq!(summary.overtime.travel_excess, Decimal::ZERO);
    }

    #[test]
    fn test_standby_totals() {
        let summary = calculate_monthly_summary(&march_entries(), &settings(), 3, 2025);

        assert_eq!(summary.standby_work_hours.night, dec("2"));
        assert_eq!(summary.standby_travel_hours.night, dec("1"));
        assert_eq!(summary.standby_indemnity, dec("4.22"));
        assert_eq!(summary.meal_allowance, dec("20.50"));
    }

    #[test]
    fn test_invalid_entry_is_skipped_not_fatal() {
        let mut entries = march_entries();
        let mut bad = entry("2025-03-12", &[("08:00", "16:00")]);
        bad.lunch.cash = Some(dec("-1"));
        entries.push(bad);
        entries.push(entry("not-a-date", &[("08:00", "16:00")]));

        let summary = calculate_monthly_summary(&entries, &settings(), 3, 2025);
        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.skipped[1].date, "not-a-date");
        assert_eq!(summary.days.len(), 7);
    }

    #[test]
    fn test_any_standby_day_counts_indemnity_once() {
        let mut settings = settings();
        settings.standby_settings.enabled = true;
        settings.standby_settings.indemnity_policy = StandbyIndemnityPolicy::AnyStandbyDay;
        settings.standby_settings.standby_days.insert(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            crate::config::StandbyDay { selected: true },
        );
        let summary = calculate_monthly_summary(&march_entries(), &settings, 3, 2025);

        assert_eq!(summary.standby_allowance, dec("4.22"));
        assert_eq!(summary.standby_indemnity, dec("8.44"));
        assert_eq!(summary.day_counts.standby_days, 2);
    }

    #[test]
    fn test_deterministic_and_parallel_identical() {
        let entries = march_entries();
        let settings = settings();
        let first = calculate_monthly_summary(&entries, &settings, 3, 2025);
        let second = calculate_monthly_summary(&entries, &settings, 3, 2025);
        let parallel = calculate_monthly_summary_parallel(&entries, &settings, 3, 2025);

        assert_eq!(first, second);
        assert_eq!(first, parallel);
    }

    #[test]
    fn test_empty_month() {
        let summary = calculate_monthly_summary(&[], &settings(), 2, 2025);
        assert_eq!(summary.total_earnings, Decimal::ZERO);
        assert_eq!(summary.month, 2);
        assert!(summary.days.is_empty());
    }
}
