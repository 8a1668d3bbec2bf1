//! Conversion arithmetic
//!
//! Everything here works on a snapshot of entries and returns full `f64`
//! precision; rounding is left to presentation.

use common::format::is_valid_amount;
use common::model::market::{find_entry, MarketEntry};
use tracing::trace;

/// Current price of `id` in the snapshot, or 0 when it is not listed
pub fn price_of(entries: &[MarketEntry], id: &str) -> f64 {
    find_entry(entries, id)
        .map(|entry| entry.current_price)
        .unwrap_or(0.0)
}

/// Convert `amount` units of `from_id` into units of `to_id`
///
/// Computes `amount * price(from) / price(to)`. An unknown id prices as 0.
/// When the destination price is zero, or the result is not finite, the
/// result is 0.
pub fn convert(entries: &[MarketEntry], from_id: &str, to_id: &str, amount: f64) -> f64 {
    let from_price = price_of(entries, from_id);
    let to_price = price_of(entries, to_id);

    if to_price == 0.0 {
        trace!(from_id, to_id, "No destination price, converting to 0");
        return 0.0;
    }

    let converted = amount * from_price / to_price;
    if converted.is_finite() {
        converted
    } else {
        0.0
    }
}

/// Units of `to_id` one unit of `from_id` buys
pub fn conversion_rate(entries: &[MarketEntry], from_id: &str, to_id: &str) -> f64 {
    convert(entries, from_id, to_id, 1.0)
}

/// Parse an amount typed by the user
///
/// Empty, malformed, negative or non-finite input reads as 0.
pub fn parse_amount(text: &str) -> f64 {
    if !is_valid_amount(text) {
        return 0.0;
    }
    text.trim().parse().unwrap_or(0.0)
}
