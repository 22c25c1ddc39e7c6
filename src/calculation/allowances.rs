//! Allowance calculation: travel allowance, on-call indemnity and meals.
//!
//! This module also provides the standalone indemnity lookups used for
//! calendar views, independent of any recorded entry.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{
    MealAllowance, MealAllowances, Settings, StandbyAllowanceType, StandbySettings,
    TravelAllowanceOption, TravelAllowanceSettings,
};
use crate::models::{AuditStep, AuditWarning, MealRecord, StandbyAllowanceDay};

use super::{DAILY_THRESHOLD_MINUTES, DayClassification, classify_day, minutes_to_hours};

/// Warning code for an allowance too large to represent.
pub const ALLOWANCE_OVERFLOW: &str = "ALLOWANCE_OVERFLOW";

/// CCNL indemnity for 16-hour coverage on a working day.
pub const CCNL_FERIALE_16H: Decimal = Decimal::from_parts(422, 0, 0, false, 2);

/// CCNL indemnity for 24-hour coverage on a working day.
pub const CCNL_FERIALE_24H: Decimal = Decimal::from_parts(703, 0, 0, false, 2);

/// CCNL indemnity for a rest day or holiday.
pub const CCNL_FESTIVO: Decimal = Decimal::from_parts(1063, 0, 0, false, 2);

/// Inputs of the travel allowance decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelAllowanceInput {
    /// Minutes of ordinary work.
    pub work_minutes: u32,
    /// Minutes of ordinary travel.
    pub travel_minutes: u32,
    /// The day counts as on call.
    pub is_standby_day: bool,
    /// Minutes of intervention work.
    pub standby_work_minutes: u32,
    /// Saturday, Sunday or holiday.
    pub is_special_day: bool,
    /// Fraction of the allowance granted.
    pub percent: Decimal,
    /// Grant the allowance even on a special day.
    pub override_special_days: bool,
}

impl Default for TravelAllowanceInput {
    fn default() -> Self {
        Self {
            work_minutes: 0,
            travel_minutes: 0,
            is_standby_day: false,
            standby_work_minutes: 0,
            is_special_day: false,
            percent: Decimal::ONE,
            override_special_days: false,
        }
    }
}

/// The result of a travel allowance calculation.
#[derive(Debug, Clone)]
pub struct TravelAllowanceResult {
    /// The allowance paid.
    pub amount: Decimal,
    /// The eligibility mode matched.
    pub eligible: bool,
    /// An eligible allowance was withheld because the day is special.
    pub suppressed_on_special_day: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
    /// Set when the scaled amount overflowed and zero was paid instead.
    pub warning: Option<AuditWarning>,
}

/// Decides the travel allowance for one day.
///
/// The eligibility mode gives the amount before scaling:
///
/// | Mode | Paid when | Amount |
/// |------|-----------|--------|
/// | `WITH_TRAVEL` | any travel | full |
/// | `ALWAYS` | always | full |
/// | `FULL_DAY_ONLY` | at least 8 hours | full |
/// | `ALSO_ON_STANDBY` | travel, or on-call work with no ordinary hours | full |
/// | `FULL_ALLOWANCE_HALF_DAY` | any hours | full |
/// | `HALF_ALLOWANCE_HALF_DAY` | any hours | half below 8 hours |
///
/// On a Saturday, Sunday or holiday the allowance is then withheld unless the
/// settings or the entry allow it. The entry percentage scales what remains;
/// a product too large for a `Decimal` pays zero with an
/// [`ALLOWANCE_OVERFLOW`] warning.
pub fn calculate_travel_allowance(
    input: &TravelAllowanceInput,
    settings: &TravelAllowanceSettings,
    step_number: u32,
) -> TravelAllowanceResult {
    let total_minutes = input.work_minutes + input.travel_minutes;
    let full = settings.daily_amount;

    let base_amount = if !settings.enabled {
        Decimal::ZERO
    } else {
        match settings.option {
            TravelAllowanceOption::WithTravel if input.travel_minutes > 0 => full,
            TravelAllowanceOption::Always => full,
            TravelAllowanceOption::FullDayOnly if total_minutes >= DAILY_THRESHOLD_MINUTES => full,
            TravelAllowanceOption::AlsoOnStandby
                if input.travel_minutes > 0
                    || (input.is_standby_day
                        && input.standby_work_minutes > 0
                        && total_minutes == 0) =>
            {
                full
            }
            TravelAllowanceOption::FullAllowanceHalfDay if total_minutes > 0 => full,
            TravelAllowanceOption::HalfAllowanceHalfDay if total_minutes > 0 => {
                if total_minutes < DAILY_THRESHOLD_MINUTES {
                    full / Decimal::TWO
                } else {
                    full
                }
            }
            _ => Decimal::ZERO,
        }
    };
    let eligible = base_amount > Decimal::ZERO;

    let suppressed = eligible
        && input.is_special_day
        && !settings.apply_on_special_days
        && !input.override_special_days;
    let mut warning = None;
    let amount = if suppressed {
        Decimal::ZERO
    } else {
        base_amount.checked_mul(input.percent).unwrap_or_else(|| {
            warning = Some(AuditWarning::new(
                ALLOWANCE_OVERFLOW,
                format!(
                    "travel allowance {} x {} overflows; nothing paid",
                    base_amount.normalize(),
                    input.percent.normalize()
                ),
                "high",
            ));
            Decimal::ZERO
        })
    };

    let reasoning = if !settings.enabled {
        "Travel allowance is disabled".to_string()
    } else if suppressed {
        "Travel allowance withheld on a Saturday, Sunday or holiday".to_string()
    } else if warning.is_some() {
        "Travel allowance scaling overflowed; nothing paid".to_string()
    } else if eligible {
        format!(
            "{:?} matched; {} x {} paid",
            settings.option,
            base_amount.normalize(),
            input.percent.normalize()
        )
    } else {
        format!("{:?} not matched", settings.option)
    };

    let audit_step = AuditStep::new(
        step_number,
        "travel_allowance",
        "Travel Allowance",
        serde_json::json!({
            "option": settings.option,
            "total_hours": minutes_to_hours(total_minutes).round_dp(4).normalize().to_string(),
            "travel_hours": minutes_to_hours(input.travel_minutes).round_dp(4).normalize().to_string(),
            "is_special_day": input.is_special_day,
            "percent": input.percent.normalize().to_string(),
        }),
        serde_json::json!({
            "eligible": eligible,
            "suppressed_on_special_day": suppressed,
            "amount": amount.normalize().to_string(),
        }),
        reasoning,
    );

    TravelAllowanceResult {
        amount,
        eligible,
        suppressed_on_special_day: suppressed,
        audit_step,
        warning,
    }
}

/// Where a resolved indemnity amount came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndemnitySource {
    /// A custom per-day-type rate.
    CustomRate,
    /// The flat daily allowance.
    DailyAllowance,
    /// The legacy daily indemnity field.
    DailyIndemnity,
    /// The CCNL table.
    CcnlTable,
}

/// A resolved daily on-call indemnity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndemnityResolution {
    /// The amount.
    pub amount: Decimal,
    /// The day was treated as a rest day or holiday.
    pub festivo: bool,
    /// Where the amount came from.
    pub source: IndemnitySource,
}

fn ccnl_indemnity(festivo: bool, allowance_type: StandbyAllowanceType) -> Decimal {
    match (festivo, allowance_type) {
        (true, _) => CCNL_FESTIVO,
        (false, StandbyAllowanceType::Hours16) => CCNL_FERIALE_16H,
        (false, StandbyAllowanceType::Hours24) => CCNL_FERIALE_24H,
    }
}

/// Resolves the daily on-call indemnity for a day.
///
/// Custom per-day-type rates win when any is configured, with missing ones
/// falling back to the CCNL table. Otherwise the flat daily allowance, then
/// the legacy daily indemnity, then the CCNL table. Sundays and holidays are
/// festivo, as are Saturdays when `saturday_as_rest` is set.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::{resolve_standby_indemnity, DayClassification};
/// use ccnl_earnings_engine::config::StandbySettings;
/// use rust_decimal::Decimal;
///
/// let sunday = DayClassification { is_sunday: true, ..DayClassification::default() };
/// let resolved = resolve_standby_indemnity(&sunday, &StandbySettings::default());
/// assert_eq!(resolved.amount, Decimal::new(1063, 2));
/// ```
pub fn resolve_standby_indemnity(
    day: &DayClassification,
    standby: &StandbySettings,
) -> IndemnityResolution {
    let festivo = day.is_festive() || (day.is_saturday && standby.saturday_as_rest);
    let table = ccnl_indemnity(festivo, standby.allowance_type);

    let (amount, source) = if standby.has_custom_rates() {
        let custom = if festivo {
            standby.custom_festivo
        } else {
            match standby.allowance_type {
                StandbyAllowanceType::Hours16 => standby.custom_feriale16,
                StandbyAllowanceType::Hours24 => standby.custom_feriale24,
            }
        };
        match custom {
            Some(amount) => (amount, IndemnitySource::CustomRate),
            None => (table, IndemnitySource::CcnlTable),
        }
    } else if let Some(amount) = standby.daily_allowance {
        (amount, IndemnitySource::DailyAllowance)
    } else if let Some(amount) = standby.daily_indemnity {
        (amount, IndemnitySource::DailyIndemnity)
    } else {
        (table, IndemnitySource::CcnlTable)
    };

    IndemnityResolution {
        amount,
        festivo,
        source,
    }
}

/// The on-call indemnity of a calendar day, independent of any entry.
///
/// Zero unless the day is selected in an enabled on-call calendar.
pub fn calculate_standby_allowance_for_date(date: NaiveDate, settings: &Settings) -> Decimal {
    if !settings.standby_settings.is_calendar_standby(date) {
        return Decimal::ZERO;
    }
    let day = classify_day(date, settings);
    resolve_standby_indemnity(&day, &settings.standby_settings).amount
}

/// The on-call indemnity of every selected day of a month, in date order.
///
/// An invalid month yields an empty list.
pub fn calculate_monthly_standby_allowances(
    year: i32,
    month: u32,
    settings: &Settings,
) -> Vec<StandbyAllowanceDay> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    settings
        .standby_settings
        .standby_days
        .range(first..)
        .take_while(|(date, _)| date.month() == month && date.year() == year)
        .filter(|(date, _)| settings.standby_settings.is_calendar_standby(**date))
        .map(|(date, _)| StandbyAllowanceDay {
            date: *date,
            allowance: calculate_standby_allowance_for_date(*date, settings),
        })
        .collect()
}

/// The meal allowance of a day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealAllowanceResult {
    /// Lunch contribution.
    pub lunch: Decimal,
    /// Dinner contribution.
    pub dinner: Decimal,
    /// Lunch plus dinner.
    pub total: Decimal,
    /// Meals paid through the voucher path.
    pub voucher_meals: u32,
    /// Meals paid with a recorded cash amount.
    pub cash_meals: u32,
    /// Meals dropped because their amount overflowed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<AuditWarning>,
}

enum MealPayment {
    Cash(Decimal),
    Voucher(Decimal),
    Overflow,
    None,
}

fn meal_payment(record: &MealRecord, configured: &MealAllowance) -> MealPayment {
    match record.cash {
        Some(cash) if cash > Decimal::ZERO => MealPayment::Cash(cash),
        _ if record.voucher => configured
            .voucher_amount
            .checked_add(configured.cash_amount)
            .map_or(MealPayment::Overflow, MealPayment::Voucher),
        _ => MealPayment::None,
    }
}

/// Computes lunch and dinner independently.
///
/// A recorded cash amount is paid exactly and the settings are ignored.
/// Otherwise a voucher pays the configured voucher amount plus the configured
/// flat cash amount for that meal. A meal whose amount cannot be represented,
/// alone or added to the other meal, pays zero with an [`ALLOWANCE_OVERFLOW`]
/// warning.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::calculate_meal_allowance;
/// use ccnl_earnings_engine::config::{MealAllowance, MealAllowances};
/// use ccnl_earnings_engine::models::MealRecord;
/// use rust_decimal::Decimal;
///
/// let settings = MealAllowances {
///     lunch: MealAllowance { voucher_amount: Decimal::new(800, 2), cash_amount: Decimal::ZERO },
///     ..MealAllowances::default()
/// };
/// let lunch = MealRecord { voucher: true, cash: Some(Decimal::new(1200, 2)) };
/// let result = calculate_meal_allowance(&lunch, &MealRecord::default(), &settings);
/// assert_eq!(result.lunch, Decimal::new(1200, 2));
/// ```
pub fn calculate_meal_allowance(
    lunch: &MealRecord,
    dinner: &MealRecord,
    settings: &MealAllowances,
) -> MealAllowanceResult {
    let mut result = MealAllowanceResult::default();
    for (meal, record, configured, slot) in [
        ("lunch", lunch, &settings.lunch, &mut result.lunch),
        ("dinner", dinner, &settings.dinner, &mut result.dinner),
    ] {
        let (amount, counter) = match meal_payment(record, configured) {
            MealPayment::Cash(amount) => (amount, &mut result.cash_meals),
            MealPayment::Voucher(amount) => (amount, &mut result.voucher_meals),
            MealPayment::Overflow => {
                result.warnings.push(meal_overflow(meal));
                continue;
            }
            MealPayment::None => continue,
        };
        match result.total.checked_add(amount) {
            Some(total) => {
                *slot = amount;
                *counter += 1;
                result.total = total;
            }
            None => result.warnings.push(meal_overflow(meal)),
        }
    }
    result
}

fn meal_overflow(meal: &str) -> AuditWarning {
    AuditWarning::new(
        ALLOWANCE_OVERFLOW,
        format!("{} allowance overflows; nothing paid", meal),
        "high",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StandbyDay;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn travel_settings(option: TravelAllowanceOption) -> TravelAllowanceSettings {
        TravelAllowanceSettings {
            enabled: true,
            daily_amount: dec("15.00"),
            option,
            apply_on_special_days: false,
        }
    }

    fn hours(work_minutes: u32, travel_minutes: u32) -> TravelAllowanceInput {
        TravelAllowanceInput {
            work_minutes,
            travel_minutes,
            ..TravelAllowanceInput::default()
        }
    }

    #[test]
    fn test_with_travel_requires_travel() {
        let settings = travel_settings(TravelAllowanceOption::WithTravel);
        assert_eq!(calculate_travel_allowance(&hours(480, 0), &settings, 1).amount, Decimal::ZERO);
        assert_eq!(calculate_travel_allowance(&hours(420, 60), &settings, 1).amount, dec("15.00"));
    }

    #[test]
    fn test_full_day_only() {
        let settings = travel_settings(TravelAllowanceOption::FullDayOnly);
        assert_eq!(calculate_travel_allowance(&hours(479, 0), &settings, 1).amount, Decimal::ZERO);
        assert_eq!(calculate_travel_allowance(&hours(480, 0), &settings, 1).amount, dec("15.00"));
    }

    #[test]
    fn test_also_on_standby() {
        let settings = travel_settings(TravelAllowanceOption::AlsoOnStandby);
        let standby_only = TravelAllowanceInput {
            is_standby_day: true,
            standby_work_minutes: 90,
            ..TravelAllowanceInput::default()
        };
        assert_eq!(calculate_travel_allowance(&standby_only, &settings, 1).amount, dec("15.00"));

        let with_ordinary_hours = TravelAllowanceInput {
            work_minutes: 240,
            ..standby_only
        };
        assert_eq!(
            calculate_travel_allowance(&with_ordinary_hours, &settings, 1).amount,
            Decimal::ZERO
        );
    }

    #[test]
    fn test_half_allowance_half_day() {
        let settings = travel_settings(TravelAllowanceOption::HalfAllowanceHalfDay);
        assert_eq!(calculate_travel_allowance(&hours(240, 0), &settings, 1).amount, dec("7.50"));
        assert_eq!(calculate_travel_allowance(&hours(480, 0), &settings, 1).amount, dec("15.00"));
        assert_eq!(calculate_travel_allowance(&hours(0, 0), &settings, 1).amount, Decimal::ZERO);
    }

    #[test]
    fn test_full_allowance_half_day_and_always() {
        let full = travel_settings(TravelAllowanceOption::FullAllowanceHalfDay);
        assert_eq!(calculate_travel_allowance(&hours(60, 0), &full, 1).amount, dec("15.00"));
        let always = travel_settings(TravelAllowanceOption::Always);
        assert_eq!(calculate_travel_allowance(&hours(0, 0), &always, 1).amount, dec("15.00"));
    }

    #[test]
    fn test_percent_scales_amount() {
        let settings = travel_settings(TravelAllowanceOption::Always);
        let input = TravelAllowanceInput {
            percent: dec("0.5"),
            ..hours(480, 0)
        };
        assert_eq!(calculate_travel_allowance(&input, &settings, 1).amount, dec("7.50"));
    }

    #[test]
    fn test_percent_overflow_pays_nothing() {
        let settings = travel_settings(TravelAllowanceOption::Always);
        let input = TravelAllowanceInput {
            percent: Decimal::MAX,
            ..hours(480, 0)
        };
        let result = calculate_travel_allowance(&input, &settings, 1);

        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.eligible);
        let warning = result.warning.expect("overflow warning");
        assert_eq!(warning.code, ALLOWANCE_OVERFLOW);
        assert_eq!(result.audit_step.output["amount"], "0");
    }

    #[test]
    fn test_special_day_suppression_and_override() {
        let mut settings = travel_settings(TravelAllowanceOption::Always);
        let special = TravelAllowanceInput {
            is_special_day: true,
            ..hours(480, 0)
        };
        let result = calculate_travel_allowance(&special, &settings, 1);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.suppressed_on_special_day);

        let overridden = TravelAllowanceInput {
            override_special_days: true,
            ..special
        };
        assert_eq!(calculate_travel_allowance(&overridden, &settings, 1).amount, dec("15.00"));

        settings.apply_on_special_days = true;
        assert_eq!(calculate_travel_allowance(&special, &settings, 1).amount, dec("15.00"));
    }

    #[test]
    fn test_disabled_pays_nothing() {
        let settings = TravelAllowanceSettings {
            enabled: false,
            ..travel_settings(TravelAllowanceOption::Always)
        };
        let result = calculate_travel_allowance(&hours(480, 60), &settings, 3);
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.audit_step.step_number, 3);
    }

    #[test]
    fn test_indemnity_ccnl_table() {
        let standby = StandbySettings::default();
        let weekday = DayClassification::default();
        let saturday = DayClassification {
            is_saturday: true,
            ..DayClassification::default()
        };
        let holiday = DayClassification {
            is_holiday: true,
            ..DayClassification::default()
        };

        assert_eq!(resolve_standby_indemnity(&weekday, &standby).amount, dec("4.22"));
        assert_eq!(resolve_standby_indemnity(&saturday, &standby).amount, dec("4.22"));
        assert_eq!(resolve_standby_indemnity(&holiday, &standby).amount, dec("10.63"));

        let rest_saturday = StandbySettings {
            saturday_as_rest: true,
            allowance_type: StandbyAllowanceType::Hours24,
            ..StandbySettings::default()
        };
        assert_eq!(resolve_standby_indemnity(&weekday, &rest_saturday).amount, dec("7.03"));
        assert_eq!(resolve_standby_indemnity(&saturday, &rest_saturday).amount, dec("10.63"));
    }

    #[test]
    fn test_indemnity_custom_rates_win() {
        let standby = StandbySettings {
            daily_allowance: Some(dec("20.00")),
            custom_feriale16: Some(dec("5.00")),
            ..StandbySettings::default()
        };
        let weekday = resolve_standby_indemnity(&DayClassification::default(), &standby);
        assert_eq!(weekday.amount, dec("5.00"));
        assert_eq!(weekday.source, IndemnitySource::CustomRate);

        // No custom festivo: falls back to the table, not the flat allowance
        let sunday = DayClassification {
            is_sunday: true,
            ..DayClassification::default()
        };
        let resolved = resolve_standby_indemnity(&sunday, &standby);
        assert_eq!(resolved.amount, dec("10.63"));
        assert_eq!(resolved.source, IndemnitySource::CcnlTable);
    }

    #[test]
    fn test_indemnity_flat_then_legacy() {
        let flat = StandbySettings {
            daily_allowance: Some(dec("12.00")),
            daily_indemnity: Some(dec("9.00")),
            ..StandbySettings::default()
        };
        assert_eq!(
            resolve_standby_indemnity(&DayClassification::default(), &flat).source,
            IndemnitySource::DailyAllowance
        );

        let legacy = StandbySettings {
            daily_indemnity: Some(dec("9.00")),
            ..StandbySettings::default()
        };
        assert_eq!(
            resolve_standby_indemnity(&DayClassification::default(), &legacy).amount,
            dec("9.00")
        );
    }

    fn calendar_settings() -> Settings {
        let mut settings = Settings::default();
        settings.standby_settings.enabled = true;
        for (d, selected) in [
            (date(2025, 2, 28), true),
            (date(2025, 3, 4), true),
            (date(2025, 3, 9), true),
            (date(2025, 3, 20), false),
            (date(2025, 4, 1), true),
        ] {
            settings
                .standby_settings
                .standby_days
                .insert(d, StandbyDay { selected });
        }
        settings
    }

    #[test]
    fn test_allowance_for_date() {
        let settings = calendar_settings();
        assert_eq!(calculate_standby_allowance_for_date(date(2025, 3, 4), &settings), dec("4.22"));
        assert_eq!(calculate_standby_allowance_for_date(date(2025, 3, 9), &settings), dec("10.63"));
        assert_eq!(
            calculate_standby_allowance_for_date(date(2025, 3, 20), &settings),
            Decimal::ZERO
        );
        assert_eq!(
            calculate_standby_allowance_for_date(date(2025, 3, 5), &settings),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_monthly_standby_allowances() {
        let settings = calendar_settings();
        let days = calculate_monthly_standby_allowances(2025, 3, &settings);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2025, 3, 4));
        assert_eq!(days[1].allowance, dec("10.63"));
        assert!(calculate_monthly_standby_allowances(2025, 13, &settings).is_empty());
    }

    #[test]
    fn test_meal_cash_takes_precedence() {
        let settings = MealAllowances {
            lunch: MealAllowance {
                voucher_amount: dec("8.00"),
                cash_amount: dec("2.00"),
            },
            ..MealAllowances::default()
        };
        let lunch = MealRecord {
            voucher: true,
            cash: Some(dec("12.00")),
        };
        let result = calculate_meal_allowance(&lunch, &MealRecord::default(), &settings);

        assert_eq!(result.lunch, dec("12.00"));
        assert_eq!(result.total, dec("12.00"));
        assert_eq!(result.cash_meals, 1);
        assert_eq!(result.voucher_meals, 0);
    }

    #[test]
    fn test_meal_voucher_adds_configured_cash() {
        let settings = MealAllowances {
            dinner: MealAllowance {
                voucher_amount: dec("8.00"),
                cash_amount: dec("2.00"),
            },
            ..MealAllowances::default()
        };
        let dinner = MealRecord {
            voucher: true,
            cash: None,
        };
        let result = calculate_meal_allowance(&MealRecord::default(), &dinner, &settings);

        assert_eq!(result.dinner, dec("10.00"));
        assert_eq!(result.lunch, Decimal::ZERO);
        assert_eq!(result.voucher_meals, 1);
    }

    #[test]
    fn test_meal_total_overflow_drops_second_meal() {
        let record = MealRecord {
            voucher: false,
            cash: Some(Decimal::MAX),
        };
        let result = calculate_meal_allowance(&record, &record, &MealAllowances::default());

        assert_eq!(result.lunch, Decimal::MAX);
        assert_eq!(result.dinner, Decimal::ZERO);
        assert_eq!(result.total, Decimal::MAX);
        assert_eq!(result.cash_meals, 1);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, ALLOWANCE_OVERFLOW);
    }

    #[test]
    fn test_meal_voucher_overflow_pays_nothing() {
        let settings = MealAllowances {
            lunch: MealAllowance {
                voucher_amount: Decimal::MAX,
                cash_amount: Decimal::MAX,
            },
            ..MealAllowances::default()
        };
        let lunch = MealRecord {
            voucher: true,
            cash: None,
        };
        let result = calculate_meal_allowance(&lunch, &MealRecord::default(), &settings);

        assert_eq!(result.total, Decimal::ZERO);
        assert_eq!(result.voucher_meals, 0);
        assert_eq!(result.warnings[0].code, ALLOWANCE_OVERFLOW);
    }
}
