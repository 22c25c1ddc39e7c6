//! Configuration types for earnings calculation.
//!
//! This module contains the strongly-typed settings structures that are
//! deserialized from YAML (or JSON) documents. Every field is optional in the
//! document: missing values are filled with the CCNL Metalmeccanico PMI defaults
//! once, at deserialization, so calculators never merge defaults themselves.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

fn dec(units: i64, scale: u32) -> Decimal {
    Decimal::new(units, scale)
}

/// Multipliers applied over the base hourly rate for bonus-bearing hours.
///
/// Field names follow the contract's own categories. `holiday_overtime` has no
/// contract counterpart and covers overtime worked on a holiday or Sunday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OvertimeRates {
    /// Daytime overtime on a weekday.
    pub day: Decimal,
    /// Night work without overtime.
    pub night_until_22: Decimal,
    /// Overtime worked at night.
    pub night_after_22: Decimal,
    /// Ordinary hours on a Sunday or public holiday.
    pub holiday: Decimal,
    /// Night work on a Sunday or public holiday.
    pub night_holiday: Decimal,
    /// Ordinary hours on a Saturday.
    pub saturday: Decimal,
    /// Overtime on a Sunday or public holiday.
    pub holiday_overtime: Decimal,
}

impl Default for OvertimeRates {
    fn default() -> Self {
        Self {
            day: dec(12, 1),
            night_until_22: dec(125, 2),
            night_after_22: dec(15, 1),
            holiday: dec(13, 1),
            night_holiday: dec(16, 1),
            saturday: dec(115, 2),
            holiday_overtime: dec(15, 1),
        }
    }
}

/// Multipliers for the on-call time bands. The ordinary band is always 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandbyRates {
    /// Night band (weekday night minutes).
    pub night: Decimal,
    /// Holiday band (Sunday or holiday daytime minutes).
    pub holiday: Decimal,
    /// Night band on a Sunday or holiday.
    pub night_holiday: Decimal,
}

impl Default for StandbyRates {
    fn default() -> Self {
        Self {
            night: dec(12, 1),
            holiday: dec(13, 1),
            night_holiday: dec(15, 1),
        }
    }
}

/// Pay terms of the employment contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Contract {
    /// Base hourly rate.
    pub hourly_rate: Decimal,
    /// Flat pay for a full 8-hour weekday.
    pub daily_rate: Decimal,
    /// Bonus multipliers over the hourly rate.
    pub overtime_rates: OvertimeRates,
    /// On-call band multipliers.
    pub standby_rates: StandbyRates,
}

impl Default for Contract {
    fn default() -> Self {
        Self {
            hourly_rate: dec(1641, 2),
            daily_rate: dec(10919, 2),
            overtime_rates: OvertimeRates::default(),
            standby_rates: StandbyRates::default(),
        }
    }
}

/// How hours beyond the 8-hour threshold are paid on a weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelHoursPolicy {
    /// Excess hours are paid at the travel compensation rate.
    #[default]
    ExcessAsTravel,
    /// Excess hours are paid as overtime.
    ExcessAsOvertime,
}

/// Coverage of the on-call duty, which selects the weekday indemnity rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandbyAllowanceType {
    /// 16-hour coverage on a working day.
    #[default]
    #[serde(rename = "16h")]
    Hours16,
    /// 24-hour coverage.
    #[serde(rename = "24h")]
    Hours24,
}

/// Which standby days receive the daily indemnity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandbyIndemnityPolicy {
    /// Only days whose entry carries the explicit on-call flag.
    #[default]
    ExplicitFlagOnly,
    /// Every standby day, including days selected only in the calendar.
    AnyStandbyDay,
}

/// One day in the on-call calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandbyDay {
    /// Whether the employee is on call that day.
    pub selected: bool,
}

/// On-call (reperibilità) settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandbySettings {
    /// Whether the on-call calendar is active.
    pub enabled: bool,
    /// Flat daily indemnity.
    pub daily_allowance: Option<Decimal>,
    /// Legacy name for the flat daily indemnity.
    pub daily_indemnity: Option<Decimal>,
    /// Custom weekday rate for 16-hour coverage.
    pub custom_feriale16: Option<Decimal>,
    /// Custom weekday rate for 24-hour coverage.
    pub custom_feriale24: Option<Decimal>,
    /// Custom rate for Sundays and holidays.
    pub custom_festivo: Option<Decimal>,
    /// Coverage used for weekday rates.
    pub allowance_type: StandbyAllowanceType,
    /// Treat Saturday as a rest day (festivo rate).
    pub saturday_as_rest: bool,
    /// Which days receive the indemnity.
    pub indemnity_policy: StandbyIndemnityPolicy,
    /// Per-date on-call calendar.
    pub standby_days: BTreeMap<NaiveDate, StandbyDay>,
}

impl StandbySettings {
    /// Whether any custom per-day-type rate is configured.
    pub fn has_custom_rates(&self) -> bool {
        self.custom_feriale16.is_some()
            || self.custom_feriale24.is_some()
            || self.custom_festivo.is_some()
    }

    /// Whether `date` is marked as on call in the calendar.
    ///
    /// Returns `false` when the calendar is disabled.
    pub fn is_calendar_standby(&self, date: NaiveDate) -> bool {
        self.enabled
            && self
                .standby_days
                .get(&date)
                .is_some_and(|day| day.selected)
    }
}

/// Eligibility rule for the daily travel allowance (indennità di trasferta).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TravelAllowanceOption {
    /// Any recorded travel.
    #[default]
    WithTravel,
    /// Every recorded day.
    Always,
    /// Only days with at least 8 hours.
    FullDayOnly,
    /// Travel, or on-call work on a day without ordinary hours.
    AlsoOnStandby,
    /// Any recorded hours, full amount.
    FullAllowanceHalfDay,
    /// Any recorded hours, halved below 8 hours.
    HalfAllowanceHalfDay,
}

/// Travel allowance settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TravelAllowanceSettings {
    /// Whether the allowance is paid at all.
    pub enabled: bool,
    /// Full daily amount.
    pub daily_amount: Decimal,
    /// Eligibility mode.
    pub option: TravelAllowanceOption,
    /// Pay the allowance on Saturdays, Sundays and holidays.
    pub apply_on_special_days: bool,
}

/// Configured amounts for one meal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MealAllowance {
    /// Value of a meal voucher.
    pub voucher_amount: Decimal,
    /// Flat cash paid together with the voucher.
    pub cash_amount: Decimal,
}

/// Meal allowance settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MealAllowances {
    /// Lunch amounts.
    pub lunch: MealAllowance,
    /// Dinner amounts.
    pub dinner: MealAllowance,
}

/// The hours that count as night work. The window wraps past midnight when
/// `start_hour > end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NightWindow {
    /// First night hour (inclusive).
    pub start_hour: u32,
    /// First day hour after the night (exclusive end).
    pub end_hour: u32,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 22,
            end_hour: 6,
        }
    }
}

/// The complete, validated settings snapshot for a calculation.
///
/// Build one with [`crate::config::ConfigLoader`] or [`Settings::from_json_str`];
/// both validate before returning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Contract pay terms.
    pub contract: Contract,
    /// Multiplier on the base rate for travel pay.
    pub travel_compensation_rate: Decimal,
    /// Routing of weekday hours beyond the threshold.
    pub travel_hours_setting: TravelHoursPolicy,
    /// On-call settings.
    pub standby_settings: StandbySettings,
    /// Travel allowance settings.
    pub travel_allowance: TravelAllowanceSettings,
    /// Meal allowance settings.
    pub meal_allowances: MealAllowances,
    /// Night-hour window.
    pub night_window: NightWindow,
    /// Local holidays added to the national table.
    pub extra_holidays: Vec<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            contract: Contract::default(),
            travel_compensation_rate: Decimal::ONE,
            travel_hours_setting: TravelHoursPolicy::default(),
            standby_settings: StandbySettings::default(),
            travel_allowance: TravelAllowanceSettings::default(),
            meal_allowances: MealAllowances::default(),
            night_window: NightWindow::default(),
            extra_holidays: Vec::new(),
        }
    }
}

impl Settings {
    /// Parses and validates settings from a JSON document.
    pub fn from_json_str(json: &str) -> EngineResult<Self> {
        let settings: Settings =
            serde_json::from_str(json).map_err(|e| EngineError::ConfigParseError {
                path: "<json>".to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// The base hourly rate.
    pub fn base_rate(&self) -> Decimal {
        self.contract.hourly_rate
    }

    /// Checks every amount and multiplier for admissible values.
    pub fn validate(&self) -> EngineResult<()> {
        let rates = &self.contract.overtime_rates;
        let standby_rates = &self.contract.standby_rates;
        let standby = &self.standby_settings;

        let mut checks: Vec<(&str, Decimal)> = vec![
            ("contract.hourly_rate", self.contract.hourly_rate),
            ("contract.daily_rate", self.contract.daily_rate),
            ("contract.overtime_rates.day", rates.day),
            ("contract.overtime_rates.night_until_22", rates.night_until_22),
            ("contract.overtime_rates.night_after_22", rates.night_after_22),
            ("contract.overtime_rates.holiday", rates.holiday),
            ("contract.overtime_rates.night_holiday", rates.night_holiday),
            ("contract.overtime_rates.saturday", rates.saturday),
            ("contract.overtime_rates.holiday_overtime", rates.holiday_overtime),
            ("contract.standby_rates.night", standby_rates.night),
            ("contract.standby_rates.holiday", standby_rates.holiday),
            ("contract.standby_rates.night_holiday", standby_rates.night_holiday),
            ("travel_compensation_rate", self.travel_compensation_rate),
            ("travel_allowance.daily_amount", self.travel_allowance.daily_amount),
            ("meal_allowances.lunch.voucher_amount", self.meal_allowances.lunch.voucher_amount),
            ("meal_allowances.lunch.cash_amount", self.meal_allowances.lunch.cash_amount),
            ("meal_allowances.dinner.voucher_amount", self.meal_allowances.dinner.voucher_amount),
            ("meal_allowances.dinner.cash_amount", self.meal_allowances.dinner.cash_amount),
        ];

        let optional = [
            ("standby_settings.daily_allowance", standby.daily_allowance),
            ("standby_settings.daily_indemnity", standby.daily_indemnity),
            ("standby_settings.custom_feriale16", standby.custom_feriale16),
            ("standby_settings.custom_feriale24", standby.custom_feriale24),
            ("standby_settings.custom_festivo", standby.custom_festivo),
        ];
        checks.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| value.map(|v| (field, v))),
        );

        if let Some((field, _)) = checks.iter().find(|(_, value)| value.is_sign_negative()) {
            return Err(EngineError::InvalidSettings {
                field: field.to_string(),
                message: "must not be negative".to_string(),
            });
        }

        for (field, hour) in [
            ("night_window.start_hour", self.night_window.start_hour),
            ("night_window.end_hour", self.night_window.end_hour),
        ] {
            if hour > 23 {
                return Err(EngineError::InvalidSettings {
                    field: field.to_string(),
                    message: format!("hour {} is outside 0..=23", hour),
                });
            }
        }

        Ok(())
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
    fn test_defaults_carry_contract_values() {
        let settings = Settings::default();
        assert_eq!(settings.contract.hourly_rate, dec("16.41"));
        assert_eq!(settings.contract.daily_rate, dec("109.19"));
        assert_eq!(settings.contract.overtime_rates.day, dec("1.2"));
        assert_eq!(settings.contract.overtime_rates.saturday, dec("1.15"));
        assert_eq!(settings.travel_hours_setting, TravelHoursPolicy::ExcessAsTravel);
        assert_eq!(settings.night_window.start_hour, 22);
    }

    #[test]
    fn test_missing_travel_compensation_rate_defaults_to_one() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.travel_compensation_rate, Decimal::ONE);
    }

    #[test]
    fn test_partial_document_fills_missing_fields() {
        let json = r#"{
            "contract": { "hourly_rate": "18.00", "overtime_rates": { "day": "1.25" } }
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.contract.hourly_rate, dec("18.00"));
        assert_eq!(settings.contract.daily_rate, dec("109.19"));
        assert_eq!(settings.contract.overtime_rates.day, dec("1.25"));
        assert_eq!(settings.contract.overtime_rates.holiday, dec("1.3"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = Settings::from_json_str(r#"{ "contract": { "hourlyRat": "1" } }"#);
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result = Settings::from_json_str(r#"{ "contract": { "daily_rate": "-1" } }"#);
        match result {
            Err(EngineError::InvalidSettings { field, .. }) => {
                assert_eq!(field, "contract.daily_rate");
            }
            other => panic!("Expected InvalidSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_optional_indemnity_is_rejected() {
        let result = Settings::from_json_str(
            r#"{ "standby_settings": { "custom_festivo": "-10.63" } }"#,
        );
        match result {
            Err(EngineError::InvalidSettings { field, .. }) => {
                assert_eq!(field, "standby_settings.custom_festivo");
            }
            other => panic!("Expected InvalidSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_night_window_hour_out_of_range_is_rejected() {
        let result = Settings::from_json_str(r#"{ "night_window": { "start_hour": 24 } }"#);
        assert!(matches!(result, Err(EngineError::InvalidSettings { .. })));
    }

    #[test]
    fn test_enum_wire_names() {
        let json = r#"{
            "travel_hours_setting": "EXCESS_AS_OVERTIME",
            "travel_allowance": { "option": "HALF_ALLOWANCE_HALF_DAY" },
            "standby_settings": { "allowance_type": "24h", "indemnity_policy": "any_standby_day" }
        }"#;
        let settings = Settings::from_json_str(json).unwrap();
        assert_eq!(settings.travel_hours_setting, TravelHoursPolicy::ExcessAsOvertime);
        assert_eq!(
            settings.travel_allowance.option,
            TravelAllowanceOption::HalfAllowanceHalfDay
        );
        assert_eq!(
            settings.standby_settings.allowance_type,
            StandbyAllowanceType::Hours24
        );
        assert_eq!(
            settings.standby_settings.indemnity_policy,
            StandbyIndemnityPolicy::AnyStandbyDay
        );
    }

    #[test]
    fn test_calendar_lookup_requires_enabled() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let mut standby = StandbySettings::default();
        standby
            .standby_days
            .insert(date, StandbyDay { selected: true });

        assert!(!standby.is_calendar_standby(date));
        standby.enabled = true;
        assert!(standby.is_calendar_standby(date));
        assert!(!standby.is_calendar_standby(date.succ_opt().unwrap()));
    }
}
