//! Configuration for the settings service

use std::env;

use common::model::settings::{DisplayCurrency, Settings};
use tracing::warn;

/// Configuration for the settings service
#[derive(Debug, Clone)]
pub struct SettingsConfig {
    /// Preferences on first launch and after a reset
    pub defaults: Settings,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let currency = match env::var("DEFAULT_CURRENCY") {
            Ok(code) => code.parse().unwrap_or_else(|e| {
                warn!("Ignoring DEFAULT_CURRENCY: {}", e);
                DisplayCurrency::default()
            }),
            Err(_) => DisplayCurrency::default(),
        };

        Self {
            defaults: Settings {
                notifications: env_flag("DEFAULT_NOTIFICATIONS"),
                dark_mode: env_flag("DEFAULT_DARK_MODE"),
                currency,
            },
        }
    }
}

impl SettingsConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom defaults
    pub fn new(defaults: Settings) -> Self {
        Self { defaults }
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}
