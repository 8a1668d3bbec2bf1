//! Market models and related types

use serde::{Deserialize, Deserializer, Serialize};

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// One tracked asset's latest price and market snapshot
///
/// Field names follow the upstream `coins/markets` payload, so a response can
/// be deserialized straight into `Vec<MarketEntry>` and served back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct MarketEntry {
    /// Stable identifier (e.g., "bitcoin")
    pub id: String,
    /// Display name (e.g., "Bitcoin")
    pub name: String,
    /// Ticker symbol as sent upstream (e.g., "btc")
    pub symbol: String,
    /// Logo URL
    #[serde(default)]
    pub image: String,
    /// Price in the reference currency
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_price: f64,
    /// 24h price change in percent
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_change_percentage_24h: f64,
    /// 7d price change in percent
    #[serde(
        default,
        rename = "price_change_percentage_7d_in_currency",
        deserialize_with = "null_as_default"
    )]
    pub price_change_percentage_7d: f64,
    /// Rank by market capitalization; 0 when upstream has none
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap_rank: u32,
    /// Market capitalization
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_cap: f64,
    /// 24h traded volume
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_volume: f64,
}

impl MarketEntry {
    /// Create an entry with only an id and a price set
    pub fn priced(id: &str, current_price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            symbol: id.to_string(),
            image: String::new(),
            current_price,
            price_change_percentage_24h: 0.0,
            price_change_percentage_7d: 0.0,
            market_cap_rank: 0,
            market_cap: 0.0,
            total_volume: 0.0,
        }
    }

    /// Upper-case ticker for display
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }
}

/// Look up an entry by id in a snapshot
pub fn find_entry<'a>(entries: &'a [MarketEntry], id: &str) -> Option<&'a MarketEntry> {
    entries.iter().find(|entry| entry.id == id)
}

/// Market overview shown above the list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct MarketStats {
    /// Sum of market caps over the snapshot
    pub total_market_cap: f64,
    /// Entries whose 24h change is positive
    pub gainers: usize,
    /// Entries whose 24h change is negative
    pub losers: usize,
}

impl MarketStats {
    /// Compute the overview for a snapshot
    pub fn from_entries(entries: &[MarketEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut stats, entry| {
            stats.total_market_cap += entry.market_cap;
            if entry.price_change_percentage_24h > 0.0 {
                stats.gainers += 1;
            } else if entry.price_change_percentage_24h < 0.0 {
                stats.losers += 1;
            }
            stats
        })
    }
}

// Upstream sends `null` for assets without a rank or a 7d history.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
