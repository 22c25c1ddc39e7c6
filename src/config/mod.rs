//! Configuration loading and management for the earnings engine.
//!
//! This module loads the contract settings (rates, bonus multipliers, on-call,
//! travel and meal allowances) from YAML and validates them once, so every
//! calculation receives an immutable, fully-populated [`Settings`] snapshot.
//!
//! # Example
//!
//! ```no_run
//! use ccnl_earnings_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/ccnl_metalmeccanico_pmi").unwrap();
//! println!("Hourly rate: {}", config.settings().contract.hourly_rate);
//! ```

mod loader;
mod types;

pub use loader::{ConfigLoader, SETTINGS_FILE};
pub use types::{
    Contract, MealAllowance, MealAllowances, NightWindow, OvertimeRates, Settings,
    StandbyAllowanceType, StandbyDay, StandbyIndemnityPolicy, StandbyRates, StandbySettings,
    TravelAllowanceOption, TravelAllowanceSettings, TravelHoursPolicy,
};
