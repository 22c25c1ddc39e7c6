//! Calculation logic for the earnings engine.
//!
//! This module contains the calculators, leaf-first: time arithmetic, calendar
//! classification, bonus multiplier resolution, the ordinary day, on-call
//! interventions, allowances, the single-day breakdown that combines them,
//! and the monthly aggregation.
//!
//! Every calculator is a pure function of its inputs and the settings.

mod allowances;
mod bonus_rate;
mod breakdown;
mod day_detection;
mod monthly;
mod ordinary_day;
mod standby;
mod time_arithmetic;

pub use allowances::{
    ALLOWANCE_OVERFLOW, CCNL_FERIALE_16H, CCNL_FERIALE_24H, CCNL_FESTIVO, IndemnityResolution, IndemnitySource,
    MealAllowanceResult, TravelAllowanceInput, TravelAllowanceResult, calculate_meal_allowance,
    calculate_monthly_standby_allowances, calculate_standby_allowance_for_date,
    calculate_travel_allowance, resolve_standby_indemnity,
};
pub use bonus_rate::{BonusCategory, BonusFlags, resolve_bonus_multiplier};
pub use breakdown::{
    calculate_daily_earnings, calculate_earnings_breakdown, calculate_earnings_breakdown_traced,
    calculate_earnings_breakdown_with, daily_earnings_from_breakdown,
};
pub use day_detection::{
    DayClassification, DayType, classify_day, easter_sunday, get_day_type, is_holiday,
    is_night_hour, is_saturday, is_sunday,
};
pub use monthly::{calculate_monthly_summary, calculate_monthly_summary_parallel};
pub use ordinary_day::{
    DAILY_THRESHOLD_MINUTES, MAX_WORK_SHIFTS, OrdinaryDayInput, OrdinaryDayResult,
    RecordedMinutes, calculate_ordinary_day, recorded_minutes,
};
pub use standby::{
    BandMinutes, SegmentKind, StandbyResult, StandbySegment, band_multiplier,
    calculate_standby_breakdown, classify_segment, classify_segment_by_minute, extract_segments,
    is_standby_day,
};
pub use time_arithmetic::{
    MINUTES_PER_DAY, duration_minutes, is_incomplete, minutes_to_hours, parse_time, span_bounds,
    span_minutes,
};
