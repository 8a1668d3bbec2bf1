//! Configuration for the market-data feed and refresh loop

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Public CoinGecko API root
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Refresh period used when none, or a zero one, is configured
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Transport timeout used when none, or a zero one, is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the market-data feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API root, without the trailing endpoint path
    pub base_url: String,
    /// Reference currency prices are quoted in
    pub vs_currency: String,
    /// Number of entries requested per fetch
    pub per_page: u32,
    /// Period between background refreshes
    pub refresh_interval: Duration,
    /// Transport timeout for a single request
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: env::var("MARKET_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            vs_currency: env::var("MARKET_VS_CURRENCY")
                .unwrap_or_else(|_| "usd".to_string()),
            per_page: positive_env("MARKET_PAGE_SIZE", 50),
            refresh_interval: Duration::from_secs(positive_env(
                "REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL.as_secs(),
            )),
            request_timeout: Duration::from_secs(positive_env(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )),
        }
    }
}

impl FeedConfig {
    /// Create a new configuration using environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create a new configuration with custom values
    pub fn new(base_url: String, per_page: u32, refresh_interval: Duration) -> Self {
        Self {
            base_url,
            vs_currency: "usd".to_string(),
            per_page,
            refresh_interval,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Full URL of the top-markets endpoint
    pub fn markets_url(&self) -> String {
        format!(
            "{}/coins/markets?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false&price_change_percentage=24h%2C7d",
            self.base_url.trim_end_matches('/'),
            self.vs_currency,
            self.per_page
        )
    }
}

/// Read a strictly positive number from `name`, warning when it is unusable
fn positive_env<T>(name: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Display,
{
    let raw = match env::var(name) {
        Ok(raw) => raw,
        Err(_) => return default,
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        _ => {
            warn!("Ignoring {}={:?}, using {}", name, raw, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markets_url_requests_top_page_with_both_windows() {
        let config = FeedConfig::new(
            "https://example.invalid/api/v3/".to_string(),
            50,
            Duration::from_secs(30),
        );
        assert_eq!(
            config.markets_url(),
            "https://example.invalid/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=50&page=1&sparkline=false&price_change_percentage=24h%2C7d"
        );
    }

    #[test]
    fn positive_env_rejects_zero_and_garbage() {
        env::set_var("FEED_CONFIG_TEST_ZERO", "0");
        env::set_var("FEED_CONFIG_TEST_TEXT", "soon");
        env::set_var("FEED_CONFIG_TEST_OK", " 45 ");

        assert_eq!(positive_env("FEED_CONFIG_TEST_ZERO", 30u64), 30);
        assert_eq!(positive_env("FEED_CONFIG_TEST_TEXT", 30u64), 30);
        assert_eq!(positive_env("FEED_CONFIG_TEST_OK", 30u64), 45);
        assert_eq!(positive_env("FEED_CONFIG_TEST_UNSET", 50u32), 50);
    }
}
