//! Settings service for managing display preferences

pub mod config;
pub mod repository;
pub mod service;

pub use config::SettingsConfig;
pub use repository::{InMemorySettingsRepository, SettingsRepository};
pub use service::SettingsService;
