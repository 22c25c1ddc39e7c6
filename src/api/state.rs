//! Application state for the earnings API.

use std::sync::Arc;

use crate::config::{ConfigLoader, Settings};

/// Shared application state.
///
/// Holds the settings snapshot every request is calculated against.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    /// A shared handle to the configuration, for blocking tasks.
    pub fn shared_config(&self) -> Arc<ConfigLoader> {
        Arc::clone(&self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_settings_accessor() {
        let state = AppState::new(ConfigLoader::from_settings(Settings::default()).unwrap());
        assert_eq!(state.settings(), &Settings::default());
    }
}
