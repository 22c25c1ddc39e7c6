//! Ordinary day calculation.
//!
//! This module splits the recorded work and travel of a day into the 8-hour
//! day and its excess, and prices them. Three paths exist:
//!
//! - Saturday, Sunday or holiday: every hour at one special-day multiplier.
//! - Weekday with 8 hours or more: the flat daily rate, with the excess paid as
//!   travel or as overtime per [`TravelHoursPolicy`].
//! - Weekday under 8 hours: proportional pay, flagged as a partial day.

use rust_decimal::Decimal;

use crate::config::{Settings, TravelHoursPolicy};
use crate::models::{
    AuditStep, AuditWarning, ExcessRouting, OrdinaryBreakdown, OrdinaryEarnings, OrdinaryHours,
    TimeSpan, WorkEntry,
};

use super::{
    BonusFlags, DayClassification, DayType, is_incomplete, minutes_to_hours,
    resolve_bonus_multiplier, span_minutes,
};

/// Length of the ordinary working day in minutes.
pub const DAILY_THRESHOLD_MINUTES: u32 = 8 * 60;

/// Maximum number of work shifts (or intervention sub-shifts) read from an entry.
pub const MAX_WORK_SHIFTS: usize = 2;

/// Recorded minutes of an entry, with warnings for spans that could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedMinutes {
    /// Minutes of ordinary work.
    pub work: u32,
    /// Minutes of ordinary travel.
    pub travel: u32,
    /// One warning per incomplete or malformed span.
    pub warnings: Vec<AuditWarning>,
}

/// Sums the work shifts and travel legs of an entry.
///
/// Shifts beyond the second are ignored. Malformed spans count as zero and
/// produce a `MALFORMED_TIME` warning.
pub fn recorded_minutes(entry: &WorkEntry) -> RecordedMinutes {
    let mut recorded = RecordedMinutes::default();
    let mut check = |label: &str, span: &TimeSpan| {
        if is_incomplete(span) {
            recorded.warnings.push(AuditWarning::new(
                "MALFORMED_TIME",
                format!(
                    "{} {:?}-{:?} is incomplete and counts as zero",
                    label, span.start, span.end
                ),
                "low",
            ));
        }
        span_minutes(span)
    };

    let mut work = 0;
    for span in entry.work_shifts.iter().take(MAX_WORK_SHIFTS) {
        work += check("work shift", span);
    }
    let mut travel = 0;
    for span in [&entry.outbound_travel, &entry.return_travel].into_iter().flatten() {
        travel += check("travel leg", span);
    }

    recorded.work = work;
    recorded.travel = travel;
    recorded
}

/// Decimal places kept by every hour bucket but the last.
const BUCKET_SCALE: u32 = 20;

/// Converts minute buckets to hours that add up to `total_hours` exactly.
///
/// Durations like 1/60 h have no finite decimal form, so converting each
/// bucket on its own drifts in the last digit. Every bucket but the last
/// non-empty one is cut to [`BUCKET_SCALE`] places; the last one takes the
/// remainder of the total.
fn partition_hours(minutes: [u32; 4], total_hours: Decimal) -> [Decimal; 4] {
    let mut hours = minutes.map(|m| minutes_to_hours(m).round_dp(BUCKET_SCALE));
    if let Some(last) = minutes.iter().rposition(|&m| m > 0) {
        let others: Decimal = hours[..last].iter().sum();
        hours[last] = total_hours - others;
    }
    hours
}

/// Inputs of the ordinary day calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrdinaryDayInput {
    /// Minutes of ordinary work.
    pub work_minutes: u32,
    /// Minutes of ordinary travel.
    pub travel_minutes: u32,
    /// Calendar facts of the day. All-false when the date is unknown.
    pub day: DayClassification,
    /// The entry is flagged as a night shift.
    pub is_night_shift: bool,
}

/// The result of an ordinary day calculation.
#[derive(Debug, Clone, Default)]
pub struct OrdinaryDayResult {
    /// Hour and earning buckets.
    pub breakdown: OrdinaryBreakdown,
    /// Hours within the 8-hour day.
    pub regular_hours: Decimal,
    /// Hours beyond the 8-hour day.
    pub extra_hours: Decimal,
    /// Weekday with fewer than 8 hours recorded.
    pub is_partial_day: bool,
    /// Hours missing to complete the day.
    pub missing_hours: Decimal,
    /// How the weekday excess was paid.
    pub excess_routing: ExcessRouting,
    /// The special-day multiplier, when the special-day path was taken.
    pub special_day_multiplier: Option<Decimal>,
    /// The audit steps recording this calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Prices the ordinary work and travel of one day.
///
/// # Arguments
///
/// * `input` - Recorded minutes and the calendar facts of the day
/// * `settings` - The contract and policy settings
/// * `step_number` - The step number of the first audit step
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::{calculate_ordinary_day, OrdinaryDayInput};
/// use ccnl_earnings_engine::config::Settings;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // 9 hours on a weekday, excess paid as travel
/// let input = OrdinaryDayInput { work_minutes: 540, ..OrdinaryDayInput::default() };
/// let result = calculate_ordinary_day(&input, &Settings::default(), 1);
/// assert_eq!(result.breakdown.total, Decimal::from_str("125.60").unwrap());
/// ```
pub fn calculate_ordinary_day(
    input: &OrdinaryDayInput,
    settings: &Settings,
    step_number: u32,
) -> OrdinaryDayResult {
    let base_rate = settings.base_rate();
    let rates = &settings.contract.overtime_rates;

    let total_minutes = input.work_minutes + input.travel_minutes;
    let daily_work = input.work_minutes.min(DAILY_THRESHOLD_MINUTES);
    let daily_travel = input
        .travel_minutes
        .min(DAILY_THRESHOLD_MINUTES - daily_work);
    let extra_work = input.work_minutes - daily_work;
    let extra_travel = input.travel_minutes - daily_travel;

    let total_hours = minutes_to_hours(total_minutes);
    let [bucket_work, bucket_travel, bucket_extra_work, bucket_extra_travel] =
        partition_hours([daily_work, daily_travel, extra_work, extra_travel], total_hours);
    let hours = OrdinaryHours {
        daily_work: bucket_work,
        daily_travel: bucket_travel,
        extra_work: bucket_extra_work,
        extra_travel: bucket_extra_travel,
    };
    let regular_hours = hours.daily_work + hours.daily_travel;
    let extra_hours = hours.extra_work + hours.extra_travel;

    let mut steps = vec![AuditStep::new(
        step_number,
        "daily_threshold",
        "Daily Threshold",
        serde_json::json!({
            "work_hours": minutes_to_hours(input.work_minutes).round_dp(4).normalize().to_string(),
            "travel_hours": minutes_to_hours(input.travel_minutes).round_dp(4).normalize().to_string(),
            "day_type": input.day.day_type().to_string(),
        }),
        serde_json::json!({
            "regular_hours": regular_hours.round_dp(4).normalize().to_string(),
            "extra_hours": extra_hours.round_dp(4).normalize().to_string(),
        }),
        format!(
            "{} of {} recorded hours fall within the 8 hour day",
            regular_hours.round_dp(2).normalize(),
            total_hours.round_dp(2).normalize()
        ),
    )];
    let mut next_step = step_number + 1;

    let mut result = OrdinaryDayResult {
        regular_hours,
        extra_hours,
        ..OrdinaryDayResult::default()
    };
    let mut earnings = OrdinaryEarnings::default();

    if input.day.is_special() {
        let multiplier = if input.day.is_festive() {
            rates.holiday
        } else {
            rates.saturday
        };
        earnings.daily_rate = base_rate * regular_hours;
        earnings.extra_work = base_rate * hours.extra_work;
        earnings.extra_travel = base_rate * hours.extra_travel;

        let bonus = (multiplier - Decimal::ONE) * base_rate * total_hours;
        let day_type = input.day.day_type();
        match day_type {
            DayType::Holiday => earnings.holiday_bonus = bonus,
            DayType::Sunday => earnings.sunday_bonus = bonus,
            _ => earnings.saturday_bonus = bonus,
        }
        result.special_day_multiplier = Some(multiplier);

        steps.push(AuditStep::new(
            next_step,
            "special_day_rate",
            "Special Day Rate",
            serde_json::json!({
                "day_type": day_type.to_string(),
                "total_hours": total_hours.round_dp(4).normalize().to_string(),
                "base_rate": base_rate.normalize().to_string(),
            }),
            serde_json::json!({
                "multiplier": multiplier.normalize().to_string(),
                "bonus": bonus.normalize().to_string(),
            }),
            format!(
                "{} hours on a {} paid at {} x base rate",
                total_hours.round_dp(2).normalize(),
                day_type,
                multiplier.normalize()
            ),
        ));
        next_step += 1;
    } else if total_minutes >= DAILY_THRESHOLD_MINUTES {
        earnings.daily_rate = settings.contract.daily_rate;
        steps.push(AuditStep::new(
            next_step,
            "full_day_rate",
            "Full Day Rate",
            serde_json::json!({ "total_hours": total_hours.round_dp(4).normalize().to_string() }),
            serde_json::json!({ "daily_rate": earnings.daily_rate.normalize().to_string() }),
            "A full weekday is paid at the flat daily rate",
        ));
        next_step += 1;

        if extra_work + extra_travel > 0 {
            let (rate, routing) = match settings.travel_hours_setting {
                TravelHoursPolicy::ExcessAsTravel => (
                    base_rate * settings.travel_compensation_rate,
                    ExcessRouting::Travel,
                ),
                TravelHoursPolicy::ExcessAsOvertime => {
                    let flags = BonusFlags {
                        is_overtime: true,
                        is_night: input.is_night_shift,
                        ..BonusFlags::default()
                    };
                    let routing = if input.is_night_shift {
                        ExcessRouting::OvertimeNight
                    } else {
                        ExcessRouting::OvertimeDay
                    };
                    (base_rate * resolve_bonus_multiplier(flags, rates), routing)
                }
            };
            earnings.extra_work = rate * hours.extra_work;
            earnings.extra_travel = rate * hours.extra_travel;
            result.excess_routing = routing;

            steps.push(AuditStep::new(
                next_step,
                "excess_routing",
                "Excess Hour Routing",
                serde_json::json!({
                    "extra_hours": extra_hours.round_dp(4).normalize().to_string(),
                    "policy": settings.travel_hours_setting,
                }),
                serde_json::json!({
                    "routing": routing,
                    "rate": rate.normalize().to_string(),
                    "amount": (earnings.extra_work + earnings.extra_travel).normalize().to_string(),
                }),
                format!(
                    "{} excess hours paid at {} per hour",
                    extra_hours.round_dp(2).normalize(),
                    rate.normalize()
                ),
            ));
            next_step += 1;
        }
    } else {
        earnings.daily_rate = base_rate * total_hours;
        if total_minutes > 0 {
            result.is_partial_day = true;
            result.missing_hours = minutes_to_hours(DAILY_THRESHOLD_MINUTES - total_minutes);
        }
        steps.push(AuditStep::new(
            next_step,
            "partial_day",
            "Partial Day",
            serde_json::json!({
                "total_hours": total_hours.round_dp(4).normalize().to_string(),
                "base_rate": base_rate.normalize().to_string(),
            }),
            serde_json::json!({
                "pay": earnings.daily_rate.normalize().to_string(),
                "missing_hours": result.missing_hours.round_dp(4).normalize().to_string(),
            }),
            "Hours below the 8 hour day are paid proportionally",
        ));
        next_step += 1;
    }

    let overtime_routed = matches!(
        result.excess_routing,
        ExcessRouting::OvertimeDay | ExcessRouting::OvertimeNight
    );
    if !input.day.is_special() && input.is_night_shift && !overtime_routed && total_minutes > 0 {
        let flags = BonusFlags {
            is_night: true,
            ..BonusFlags::default()
        };
        let bonus_rate = base_rate * resolve_bonus_multiplier(flags, rates);
        earnings.night_bonus = (bonus_rate - base_rate) * total_hours;

        steps.push(AuditStep::new(
            next_step,
            "night_shift_bonus",
            "Night Shift Bonus",
            serde_json::json!({
                "total_hours": total_hours.round_dp(4).normalize().to_string(),
                "bonus_rate": bonus_rate.normalize().to_string(),
            }),
            serde_json::json!({ "night_bonus": earnings.night_bonus.normalize().to_string() }),
            "Night shift differential over the base rate for every recorded hour",
        ));
    }

    result.breakdown = OrdinaryBreakdown {
        hours,
        total: earnings.total(),
        earnings,
    };
    result.audit_steps = steps;
    result
}
