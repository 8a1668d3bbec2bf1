//! State of a converter form

use common::decimal::{format_amount, precision, to_decimal, to_fixed, DisplayAmount};
use common::format::sanitize_number_input;
use common::model::market::{find_entry, MarketEntry};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::{conversion_rate, convert, parse_amount, price_of};

/// Preset amounts offered next to the amount field
pub const QUICK_AMOUNTS: [&str; 4] = ["0.1", "0.5", "1", "10"];

const DEFAULT_FROM: &str = "bitcoin";
const DEFAULT_TO: &str = "ethereum";
const DEFAULT_AMOUNT: &str = "1";

/// Selected pair and the amount as typed
///
/// The session keeps no computed values; every result is derived from the
/// snapshot passed in, so it follows the entries as they refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterSession {
    from_id: String,
    to_id: String,
    amount: String,
}

/// Everything a converter view shows for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Source asset id
    pub from_id: String,
    /// Destination asset id
    pub to_id: String,
    /// Parsed source amount
    pub amount: f64,
    /// Converted amount, full precision
    pub result: f64,
    /// Converted amount with 8 fractional digits
    pub result_text: String,
    /// Destination units per source unit
    pub rate: f64,
    /// `rate` with 6 fractional digits
    pub rate_text: String,
    /// Source amount valued in the reference currency
    pub from_value: f64,
    /// Converted amount valued in the reference currency
    pub to_value: f64,
}

impl Default for ConverterSession {
    fn default() -> Self {
        Self::new(DEFAULT_FROM, DEFAULT_TO, DEFAULT_AMOUNT)
    }
}

impl ConverterSession {
    /// Create a session for a pair and an amount
    pub fn new(from_id: &str, to_id: &str, amount: &str) -> Self {
        Self {
            from_id: from_id.to_string(),
            to_id: to_id.to_string(),
            amount: amount.to_string(),
        }
    }

    pub fn from_id(&self) -> &str {
        &self.from_id
    }

    pub fn to_id(&self) -> &str {
        &self.to_id
    }

    /// Amount text as typed
    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn set_from(&mut self, id: &str) {
        self.from_id = id.to_string();
    }

    pub fn set_to(&mut self, id: &str) {
        self.to_id = id.to_string();
    }

    pub fn set_amount(&mut self, text: &str) {
        self.amount = text.to_string();
    }

    /// Set the amount from free-form input, keeping digits and one decimal point
    pub fn set_amount_input(&mut self, raw: &str) {
        self.amount = sanitize_number_input(raw);
    }

    /// Whether the current amount is one of the presets
    pub fn is_quick_amount(&self) -> bool {
        QUICK_AMOUNTS.contains(&self.amount.as_str())
    }

    /// Converted amount, full precision
    pub fn result(&self, entries: &[MarketEntry]) -> f64 {
        convert(entries, &self.from_id, &self.to_id, parse_amount(&self.amount))
    }

    /// Converted amount rounded to 8 places
    pub fn result_amount(&self, entries: &[MarketEntry]) -> DisplayAmount {
        to_decimal(self.result(entries))
            .map(precision::round_price)
            .unwrap_or_default()
    }

    /// Converted amount as shown, with 8 fractional digits
    pub fn result_text(&self, entries: &[MarketEntry]) -> String {
        format_amount(self.result(entries))
    }

    /// Exchange the pair and carry the shown result over as the new amount
    pub fn swap(&mut self, entries: &[MarketEntry]) {
        let carried = self.result_text(entries);
        std::mem::swap(&mut self.from_id, &mut self.to_id);
        debug!(from = %self.from_id, to = %self.to_id, amount = %carried, "Swapped converter pair");
        self.amount = carried;
    }

    /// Values for every field of the converter view
    pub fn quote(&self, entries: &[MarketEntry]) -> Quote {
        let amount = parse_amount(&self.amount);
        let result = self.result(entries);
        let rate = conversion_rate(entries, &self.from_id, &self.to_id);

        Quote {
            from_id: self.from_id.clone(),
            to_id: self.to_id.clone(),
            amount,
            result,
            result_text: format_amount(result),
            rate,
            rate_text: to_fixed(rate, precision::RATE_PRECISION),
            from_value: amount * price_of(entries, &self.from_id),
            to_value: result * price_of(entries, &self.to_id),
        }
    }

    /// Whether both sides of the pair are in the snapshot
    pub fn is_resolved(&self, entries: &[MarketEntry]) -> bool {
        find_entry(entries, &self.from_id).is_some() && find_entry(entries, &self.to_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::decimal::dec;

    fn entries() -> Vec<MarketEntry> {
        vec![
            MarketEntry::priced("bitcoin", 50000.0),
            MarketEntry::priced("ethereum", 2500.0),
        ]
    }

    #[test]
    fn defaults_to_one_bitcoin_in_ethereum() {
        let session = ConverterSession::default();
        assert_eq!(session.from_id(), "bitcoin");
        assert_eq!(session.to_id(), "ethereum");
        assert_eq!(session.amount(), "1");
        assert!(session.is_quick_amount());
        assert_eq!(session.result_text(&entries()), "20.00000000");
        assert_eq!(session.result_amount(&entries()), dec!(20));
    }

    #[test]
    fn swap_carries_result_over() {
        let mut session = ConverterSession::default();
        session.swap(&entries());

        assert_eq!(session.from_id(), "ethereum");
        assert_eq!(session.to_id(), "bitcoin");
        assert_eq!(session.amount(), "20.00000000");
        assert_eq!(session.result(&entries()), 1.0);
    }

    #[test]
    fn quote_fills_every_field() {
        let mut session = ConverterSession::default();
        session.set_amount("0.5");
        let quote = session.quote(&entries());

        assert_eq!(quote.amount, 0.5);
        assert_eq!(quote.result, 10.0);
        assert_eq!(quote.result_text, "10.00000000");
        assert_eq!(quote.rate_text, "20.000000");
        assert_eq!(quote.from_value, 25000.0);
        assert_eq!(quote.to_value, 25000.0);
    }

    #[test]
    fn unresolved_pair_quotes_zero() {
        let mut session = ConverterSession::default();
        session.set_to("doge");

        assert!(!session.is_resolved(&entries()));
        assert_eq!(session.result_text(&entries()), "0.00000000");
        assert_eq!(session.quote(&entries()).rate_text, "0.000000");
    }
}
