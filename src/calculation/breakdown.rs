//! Single-day earnings breakdown.
//!
//! [`calculate_earnings_breakdown`] is the one canonical single-day calculation.
//! [`calculate_daily_earnings`] projects its result onto coarser totals, so the
//! two can never disagree.
//!
//! # Calculation Flow
//!
//! 1. Parse the date and classify the day (skipped for an invalid date)
//! 2. Leave days stop here with a zero breakdown
//! 3. Price the ordinary work and travel
//! 4. Decide whether the day is on call and price its interventions
//! 5. Resolve the travel, on-call and meal allowances
//! 6. Sum the components

use rust_decimal::Decimal;

use crate::config::{Settings, StandbyIndemnityPolicy};
use crate::models::{
    Allowances, AuditStep, AuditTrace, AuditWarning, DailyEarnings, DayDetails, EarningsBreakdown,
    ExcessRouting, NoTrace, TraceHook, WorkEntry,
};

use super::{
    ALLOWANCE_OVERFLOW, OrdinaryDayInput, TravelAllowanceInput, calculate_meal_allowance, calculate_ordinary_day,
    calculate_standby_breakdown, calculate_travel_allowance, classify_day, is_standby_day,
    recorded_minutes, resolve_standby_indemnity,
};

/// Computes the itemized earnings of one day.
///
/// Never fails: malformed times count as zero and an invalid date skips the
/// calendar-dependent parts.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::calculate_earnings_breakdown;
/// use ccnl_earnings_engine::config::Settings;
/// use ccnl_earnings_engine::models::{TimeSpan, WorkEntry};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// // Tuesday 2025-03-04, 08:00-17:00
/// let entry = WorkEntry {
///     date: "2025-03-04".to_string(),
///     work_shifts: vec![TimeSpan::new("08:00", "17:00")],
///     ..WorkEntry::default()
/// };
/// let breakdown = calculate_earnings_breakdown(&entry, &Settings::default());
/// assert_eq!(breakdown.ordinary.total, Decimal::from_str("125.60").unwrap());
/// ```
pub fn calculate_earnings_breakdown(entry: &WorkEntry, settings: &Settings) -> EarningsBreakdown {
    calculate_earnings_breakdown_with(entry, settings, &mut NoTrace)
}

/// Computes the breakdown and collects its audit trace.
pub fn calculate_earnings_breakdown_traced(
    entry: &WorkEntry,
    settings: &Settings,
) -> (EarningsBreakdown, AuditTrace) {
    let mut trace = AuditTrace::default();
    let breakdown = calculate_earnings_breakdown_with(entry, settings, &mut trace);
    (breakdown, trace)
}

/// Computes the breakdown, reporting every audit step and warning to `hook`.
pub fn calculate_earnings_breakdown_with(
    entry: &WorkEntry,
    settings: &Settings,
    hook: &mut dyn TraceHook,
) -> EarningsBreakdown {
    let mut steps: Vec<AuditStep> = Vec::new();
    let mut warnings: Vec<AuditWarning> = Vec::new();

    let date = entry.parsed_date();
    if date.is_none() {
        warnings.push(AuditWarning::new(
            "INVALID_DATE",
            format!(
                "date {:?} cannot be parsed; calendar rules are skipped",
                entry.date
            ),
            "medium",
        ));
    }
    let day = date.map(|date| classify_day(date, settings));
    let calendar = day.unwrap_or_default();

    let mut details = DayDetails {
        is_saturday: calendar.is_saturday,
        is_sunday: calendar.is_sunday,
        is_holiday: calendar.is_holiday,
        completion_type: entry.completion_type,
        leave: entry.leave,
        ..DayDetails::default()
    };

    if let Some(leave) = entry.leave {
        let step = AuditStep::new(
            1,
            "leave_day",
            "Leave Day",
            serde_json::json!({ "leave": leave }),
            serde_json::json!({ "total_earnings": "0" }),
            "A vacation or permit day earns nothing in this engine",
        );
        hook.on_step(&step);
        for warning in &warnings {
            hook.on_warning(warning);
        }
        return EarningsBreakdown {
            date: entry.date.clone(),
            details,
            ..EarningsBreakdown::default()
        };
    }

    let recorded = recorded_minutes(entry);
    warnings.extend(recorded.warnings.iter().cloned());

    let ordinary = calculate_ordinary_day(
        &OrdinaryDayInput {
            work_minutes: recorded.work,
            travel_minutes: recorded.travel,
            day: calendar,
            is_night_shift: entry.is_night_shift,
        },
        settings,
        1,
    );
    steps.extend(ordinary.audit_steps.iter().cloned());

    let standby_day = is_standby_day(entry, date, settings);
    let indemnity = day.map(|day| resolve_standby_indemnity(&day, &settings.standby_settings));
    let explicit_flag = entry.standby == Some(true);

    let standby = if standby_day {
        let included = if explicit_flag {
            indemnity.map_or(Decimal::ZERO, |resolved| resolved.amount)
        } else {
            Decimal::ZERO
        };
        let result = calculate_standby_breakdown(
            &entry.interventions,
            day,
            included,
            settings,
            next_step(&steps),
        );
        steps.extend(result.audit_steps.iter().cloned());
        warnings.extend(result.warnings.iter().cloned());
        Some(result)
    } else {
        if !entry.interventions.is_empty() {
            warnings.push(AuditWarning::new(
                "INTERVENTIONS_IGNORED",
                format!(
                    "{} interventions recorded on a day that is not on call",
                    entry.interventions.len()
                ),
                "medium",
            ));
        }
        None
    };

    let standby_allowance = match (settings.standby_settings.indemnity_policy, indemnity) {
        (StandbyIndemnityPolicy::AnyStandbyDay, Some(resolved)) if standby_day && !explicit_flag => {
            resolved.amount
        }
        _ => Decimal::ZERO,
    };
    if standby_day {
        steps.push(AuditStep::new(
            next_step(&steps),
            "standby_indemnity",
            "On-Call Indemnity",
            serde_json::json!({
                "explicit_flag": explicit_flag,
                "policy": settings.standby_settings.indemnity_policy,
            }),
            serde_json::json!({
                "resolved": indemnity,
                "in_standby_component": standby
                    .as_ref()
                    .map_or(Decimal::ZERO, |s| s.breakdown.daily_indemnity)
                    .normalize()
                    .to_string(),
                "as_allowance": standby_allowance.normalize().to_string(),
            }),
            "The indemnity is paid once: in the on-call component on an explicitly flagged day, otherwise as an allowance when the policy allows it",
        ));
    }

    let travel = calculate_travel_allowance(
        &TravelAllowanceInput {
            work_minutes: recorded.work,
            travel_minutes: recorded.travel,
            is_standby_day: standby_day,
            standby_work_minutes: standby.as_ref().map_or(0, |s| s.work_minutes.total()),
            is_special_day: calendar.is_special(),
            percent: entry.travel_allowance_percent,
            override_special_days: entry.travel_allowance_override,
        },
        &settings.travel_allowance,
        next_step(&steps),
    );
    steps.push(travel.audit_step.clone());
    warnings.extend(travel.warning.iter().cloned());

    let meals = calculate_meal_allowance(&entry.lunch, &entry.dinner, &settings.meal_allowances);
    warnings.extend(meals.warnings.iter().cloned());

    let mut allowances = Allowances {
        travel: travel.amount,
        standby: standby_allowance,
        meal: meals.total,
    };
    let standby = standby.map(|result| result.breakdown);
    let earned = ordinary.breakdown.total
        + standby
            .as_ref()
            .map_or(Decimal::ZERO, |s| s.total_earnings)
        + allowances.standby;
    let total_earnings = match earned.checked_add(allowances.travel) {
        Some(total) => total,
        None => {
            warnings.push(AuditWarning::new(
                ALLOWANCE_OVERFLOW,
                format!(
                    "travel allowance {} cannot be added to the day total; nothing paid",
                    allowances.travel.normalize()
                ),
                "high",
            ));
            allowances.travel = Decimal::ZERO;
            earned
        }
    };

    steps.push(AuditStep::new(
        next_step(&steps),
        "day_total",
        "Day Total",
        serde_json::json!({
            "ordinary": ordinary.breakdown.total.normalize().to_string(),
            "standby": standby.as_ref().map(|s| s.total_earnings.normalize().to_string()),
            "travel_allowance": allowances.travel.normalize().to_string(),
            "standby_allowance": allowances.standby.normalize().to_string(),
            "meal_allowance": meals.total.normalize().to_string(),
        }),
        serde_json::json!({ "total_earnings": total_earnings.normalize().to_string() }),
        "Ordinary, on-call and allowances summed; the meal allowance is reported apart",
    ));

    for step in &steps {
        hook.on_step(step);
    }
    for warning in &warnings {
        hook.on_warning(warning);
    }

    details.is_standby_day = standby_day;
    details.regular_hours = ordinary.regular_hours;
    details.extra_hours = ordinary.extra_hours;
    details.is_partial_day = ordinary.is_partial_day;
    details.missing_hours = ordinary.missing_hours;
    details.excess_routing = ordinary.excess_routing;
    details.special_day_multiplier = ordinary.special_day_multiplier;

    EarningsBreakdown {
        date: entry.date.clone(),
        ordinary: ordinary.breakdown,
        standby,
        allowances,
        total_earnings,
        details,
    }
}

fn next_step(steps: &[AuditStep]) -> u32 {
    steps.last().map_or(1, |step| step.step_number + 1)
}

/// Projects a breakdown onto the coarser daily totals.
pub fn daily_earnings_from_breakdown(breakdown: EarningsBreakdown) -> DailyEarnings {
    let earnings = &breakdown.ordinary.earnings;
    let excess = earnings.extra_work + earnings.extra_travel;
    let mut regular_pay = earnings.daily_rate
        + earnings.saturday_bonus
        + earnings.sunday_bonus
        + earnings.holiday_bonus;
    let mut overtime_pay = Decimal::ZERO;
    let mut travel_pay = Decimal::ZERO;
    match breakdown.details.excess_routing {
        ExcessRouting::Travel => travel_pay = excess,
        ExcessRouting::OvertimeDay | ExcessRouting::OvertimeNight => overtime_pay = excess,
        // Special days pay hours beyond 8 at the same rate as the rest of the day.
        ExcessRouting::None => regular_pay += excess,
    }

    let (standby_work_pay, standby_travel_pay, included_indemnity) =
        breakdown.standby.as_ref().map_or(
            (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
            |s| (s.work_earnings.total(), s.travel_earnings.total(), s.daily_indemnity),
        );

    DailyEarnings {
        regular_pay,
        overtime_pay,
        ordinary_bonus_pay: earnings.night_bonus,
        travel_pay,
        standby_work_pay,
        standby_travel_pay,
        standby_allowance: included_indemnity + breakdown.allowances.standby,
        travel_allowance: breakdown.allowances.travel,
        total: breakdown.total_earnings,
        meal_allowances: breakdown.allowances.meal,
        breakdown,
    }
}

/// Computes the coarser single-day totals.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::calculate_daily_earnings;
/// use ccnl_earnings_engine::config::Settings;
/// use ccnl_earnings_engine::models::{TimeSpan, WorkEntry};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let entry = WorkEntry {
///     date: "2025-03-04".to_string(),
///     work_shifts: vec![TimeSpan::new("08:00", "17:00")],
///     ..WorkEntry::default()
/// };
/// let daily = calculate_daily_earnings(&entry, &Settings::default());
/// assert_eq!(daily.regular_pay, Decimal::from_str("109.19").unwrap());
/// assert_eq!(daily.travel_pay, Decimal::from_str("16.41").unwrap());
/// ```
pub fn calculate_daily_earnings(entry: &WorkEntry, settings: &Settings) -> DailyEarnings {
    daily_earnings_from_breakdown(calculate_earnings_breakdown(entry, settings))
}
