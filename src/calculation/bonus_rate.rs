//! Bonus multiplier resolution.
//!
//! Overtime, night work and holiday work each carry a contract multiplier.
//! They are never stacked: a combination of conditions maps to exactly one
//! category, and the category to one multiplier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::OvertimeRates;

/// The conditions under which an hour was worked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusFlags {
    /// The hour is beyond the daily threshold.
    pub is_overtime: bool,
    /// The hour is night work.
    pub is_night: bool,
    /// The day is a public holiday.
    pub is_holiday: bool,
    /// The day is a Sunday.
    pub is_sunday: bool,
}

/// The single rate category selected for a combination of conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusCategory {
    /// Night overtime.
    OvertimeNight,
    /// Overtime on a Sunday or holiday.
    OvertimeHoliday,
    /// Daytime weekday overtime.
    Overtime,
    /// Night work on a Sunday or holiday.
    NightHoliday,
    /// Night work.
    Night,
    /// Sunday or holiday work.
    Holiday,
    /// No bonus applies.
    None,
}

impl BonusCategory {
    /// Selects the category, first match wins:
    ///
    /// 1. overtime at night
    /// 2. overtime on a Sunday or holiday
    /// 3. overtime
    /// 4. night on a Sunday or holiday
    /// 5. night
    /// 6. Sunday or holiday
    pub fn resolve(flags: BonusFlags) -> Self {
        let festive = flags.is_holiday || flags.is_sunday;
        match (flags.is_overtime, flags.is_night, festive) {
            (true, true, _) => BonusCategory::OvertimeNight,
            (true, false, true) => BonusCategory::OvertimeHoliday,
            (true, false, false) => BonusCategory::Overtime,
            (false, true, true) => BonusCategory::NightHoliday,
            (false, true, false) => BonusCategory::Night,
            (false, false, true) => BonusCategory::Holiday,
            (false, false, false) => BonusCategory::None,
        }
    }

    /// The multiplier of this category.
    pub fn multiplier(self, rates: &OvertimeRates) -> Decimal {
        match self {
            BonusCategory::OvertimeNight => rates.night_after_22,
            BonusCategory::OvertimeHoliday => rates.holiday_overtime,
            BonusCategory::Overtime => rates.day,
            BonusCategory::NightHoliday => rates.night_holiday,
            BonusCategory::Night => rates.night_until_22,
            BonusCategory::Holiday => rates.holiday,
            BonusCategory::None => Decimal::ONE,
        }
    }
}

/// Resolves the multiplier for a combination of conditions.
///
/// # Example
///
/// ```
/// use ccnl_earnings_engine::calculation::{resolve_bonus_multiplier, BonusFlags};
/// use ccnl_earnings_engine::config::OvertimeRates;
/// use rust_decimal::Decimal;
///
/// let rates = OvertimeRates::default();
/// let flags = BonusFlags { is_overtime: true, is_night: true, ..BonusFlags::default() };
/// assert_eq!(resolve_bonus_multiplier(flags, &rates), Decimal::new(15, 1));
/// ```
pub fn resolve_bonus_multiplier(flags: BonusFlags, rates: &OvertimeRates) -> Decimal {
    BonusCategory::resolve(flags).multiplier(rates)
}
