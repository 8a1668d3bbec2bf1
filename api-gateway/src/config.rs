//! Application configuration

use std::env;
use std::net::SocketAddr;

use common::error::{Error, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host
    pub host: String,
    /// API port
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
        }
    }
}

impl AppConfig {
    /// Create a new configuration from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Address to listen on
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::ConfigurationError(format!("Invalid listen address: {}", e)))
    }
}
