//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading contract
//! settings from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};

use super::types::Settings;

/// The settings file expected inside a configuration directory.
pub const SETTINGS_FILE: &str = "settings.yaml";

/// Loads and provides access to validated settings.
///
/// # Directory Structure
///
/// ```text
/// config/ccnl_metalmeccanico_pmi/
/// └── settings.yaml   # Contract, standby, travel and meal settings
/// ```
///
/// # Example
///
/// ```no_run
/// use ccnl_earnings_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/ccnl_metalmeccanico_pmi").unwrap();
/// println!("Daily rate: {}", loader.settings().contract.daily_rate);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: Settings,
}

impl ConfigLoader {
    /// Loads settings from `<path>/settings.yaml`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing (`ConfigNotFound`)
    /// - The file contains invalid YAML or unknown fields (`ConfigParseError`)
    /// - A value is out of range (`InvalidSettings`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let settings_path = path.as_ref().join(SETTINGS_FILE);
        let settings: Settings = Self::load_yaml(&settings_path)?;
        settings.validate()?;

        info!(
            path = %settings_path.display(),
            standby_days = settings.standby_settings.standby_days.len(),
            "Loaded earnings settings"
        );

        Ok(Self { settings })
    }

    /// Builds a loader from an in-memory YAML document.
    ///
    /// # Example
    ///
    /// ```
    /// use ccnl_earnings_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::from_yaml_str("contract:\n  hourly_rate: \"17.20\"\n")?;
    /// assert_eq!(loader.settings().contract.hourly_rate.to_string(), "17.20");
    /// # Ok::<(), ccnl_earnings_engine::error::EngineError>(())
    /// ```
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        let settings: Settings =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParseError {
                path: "<yaml>".to_string(),
                message: e.to_string(),
            })?;
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Wraps an already-built settings value after validating it.
    pub fn from_settings(settings: Settings) -> EngineResult<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the validated settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Consumes the loader, returning the settings.
    pub fn into_settings(self) -> Settings {
        self.settings
    }
}
