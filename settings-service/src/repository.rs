//! Storage for display preferences

use async_trait::async_trait;
use common::error::Result;
use common::model::settings::Settings;
use tokio::sync::RwLock;
use tracing::debug;

/// Settings repository trait defining the interface for preference storage
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the current preferences
    async fn load(&self) -> Result<Settings>;

    /// Replace the stored preferences
    async fn save(&self, settings: Settings) -> Result<Settings>;
}

/// In-memory repository; preferences last for the life of the process
pub struct InMemorySettingsRepository {
    settings: RwLock<Settings>,
}

impl InMemorySettingsRepository {
    /// Create a repository holding `initial`
    pub fn new(initial: Settings) -> Self {
        Self {
            settings: RwLock::new(initial),
        }
    }
}

impl Default for InMemorySettingsRepository {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn load(&self) -> Result<Settings> {
        Ok(self.settings.read().await.clone())
    }

    async fn save(&self, settings: Settings) -> Result<Settings> {
        debug!(?settings, "Saving settings");
        *self.settings.write().await = settings.clone();
        Ok(settings)
    }
}
