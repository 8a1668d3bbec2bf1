//! Display preference models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Currency used for displaying values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayCurrency {
    /// US dollar
    #[default]
    Usd,
    /// Euro
    Eur,
    /// Pound sterling
    Gbp,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
}

impl DisplayCurrency {
    /// Every selectable currency, in menu order
    pub const ALL: [DisplayCurrency; 5] = [
        DisplayCurrency::Usd,
        DisplayCurrency::Eur,
        DisplayCurrency::Gbp,
        DisplayCurrency::Btc,
        DisplayCurrency::Eth,
    ];

    /// Currency code
    pub fn code(&self) -> &'static str {
        match self {
            DisplayCurrency::Usd => "USD",
            DisplayCurrency::Eur => "EUR",
            DisplayCurrency::Gbp => "GBP",
            DisplayCurrency::Btc => "BTC",
            DisplayCurrency::Eth => "ETH",
        }
    }
}

impl fmt::Display for DisplayCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DisplayCurrency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        DisplayCurrency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| Error::ValidationError(format!("Unsupported currency: {}", s)))
    }
}

/// User display preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Settings {
    /// Price alerts and updates
    pub notifications: bool,
    /// Dark theme
    pub dark_mode: bool,
    /// Default display currency
    pub currency: DisplayCurrency,
}

/// Partial change to the preferences; absent fields are left as they are
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct SettingsUpdate {
    #[serde(default)]
    pub notifications: Option<bool>,
    #[serde(default)]
    pub dark_mode: Option<bool>,
    /// Currency code, e.g. "EUR"
    #[serde(default)]
    pub currency: Option<String>,
}

impl SettingsUpdate {
    /// Whether the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.notifications.is_none() && self.dark_mode.is_none() && self.currency.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_launch() {
        let settings = Settings::default();
        assert!(!settings.notifications);
        assert!(!settings.dark_mode);
        assert_eq!(settings.currency, DisplayCurrency::Usd);
    }

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!("eur".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Eur);
        assert_eq!(" ETH ".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Eth);
        assert!("JPY".parse::<DisplayCurrency>().is_err());
    }

    #[test]
    fn serializes_as_code() {
        let json = serde_json::to_string(&DisplayCurrency::Gbp).unwrap();
        assert_eq!(json, "\"GBP\"");
    }

    #[test]
    fn update_fields_are_optional() {
        let update: SettingsUpdate = serde_json::from_str(r#"{"dark_mode": true}"#).unwrap();
        assert_eq!(update.dark_mode, Some(true));
        assert!(update.notifications.is_none());
        assert!(!update.is_empty());
        assert!(SettingsUpdate::default().is_empty());
    }
}
