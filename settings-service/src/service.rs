//! Settings service implementation

use std::sync::Arc;

use common::error::{ErrorExt, Result};
use common::model::settings::{DisplayCurrency, Settings, SettingsUpdate};
use tokio::sync::Mutex;
use tracing::info;

use crate::config::SettingsConfig;
use crate::repository::{InMemorySettingsRepository, SettingsRepository};

/// Settings service for reading and changing display preferences
pub struct SettingsService {
    /// Repository for preference data
    repo: Arc<dyn SettingsRepository>,
    /// Values restored by `reset`
    defaults: Settings,
    /// Serializes read-modify-write cycles
    write_lock: Mutex<()>,
}

impl SettingsService {
    /// Create a service over an in-memory repository
    pub fn new() -> Self {
        Self::with_config(&SettingsConfig::new(Settings::default()))
    }

    /// Create a service over an in-memory repository seeded from `config`
    pub fn with_config(config: &SettingsConfig) -> Self {
        Self::with_repository(
            Arc::new(InMemorySettingsRepository::new(config.defaults.clone())),
            config.defaults.clone(),
        )
    }

    /// Create a service over a specific repository
    pub fn with_repository(repo: Arc<dyn SettingsRepository>, defaults: Settings) -> Self {
        Self {
            repo,
            defaults,
            write_lock: Mutex::new(()),
        }
    }

    /// Current preferences
    pub async fn get(&self) -> Result<Settings> {
        self.repo.load().await
    }

    pub async fn set_notifications(&self, enabled: bool) -> Result<Settings> {
        self.modify(|settings| settings.notifications = enabled).await
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<Settings> {
        self.modify(|settings| settings.dark_mode = enabled).await
    }

    /// Set the display currency from its code
    ///
    /// Unknown codes are rejected and leave the preferences unchanged.
    pub async fn set_currency(&self, code: &str) -> Result<Settings> {
        let currency: DisplayCurrency = code.parse()?;
        info!("Setting display currency to {}", currency);
        self.modify(|settings| settings.currency = currency).await
    }

    pub async fn toggle_notifications(&self) -> Result<Settings> {
        self.modify(|settings| settings.notifications = !settings.notifications).await
    }

    pub async fn toggle_dark_mode(&self) -> Result<Settings> {
        self.modify(|settings| settings.dark_mode = !settings.dark_mode).await
    }

    /// Apply a partial update
    ///
    /// The currency is validated before anything is written, so a bad code
    /// leaves every field unchanged.
    pub async fn update(&self, update: SettingsUpdate) -> Result<Settings> {
        let currency = update
            .currency
            .as_deref()
            .map(str::parse::<DisplayCurrency>)
            .transpose()?;

        self.modify(|settings| {
            if let Some(notifications) = update.notifications {
                settings.notifications = notifications;
            }
            if let Some(dark_mode) = update.dark_mode {
                settings.dark_mode = dark_mode;
            }
            if let Some(currency) = currency {
                settings.currency = currency;
            }
        })
        .await
    }

    /// Restore the configured defaults
    pub async fn reset(&self) -> Result<Settings> {
        info!("Resetting settings to defaults");
        let _guard = self.write_lock.lock().await;
        self.repo
            .save(self.defaults.clone())
            .await
            .with_context(|| "Failed to reset settings")
    }

    async fn modify<F>(&self, change: F) -> Result<Settings>
    where
        F: FnOnce(&mut Settings),
    {
        let _guard = self.write_lock.lock().await;
        let mut settings = self
            .repo
            .load()
            .await
            .with_context(|| "Failed to load settings")?;
        change(&mut settings);
        self.repo
            .save(settings)
            .await
            .with_context(|| "Failed to save settings")
    }
}

impl Default for SettingsService {
    fn default() -> Self {
        Self::new()
    }
}
