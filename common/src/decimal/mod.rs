//! Decimal type utilities for display rounding
//!
//! Prices travel as `f64` because that is what the upstream feed sends and what
//! the conversion arithmetic works in. Rounding for display goes through
//! `Decimal` so that fixed-digit output does not pick up binary noise.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
pub use rust_decimal_macros::dec;

/// Display value with exact decimal digits
pub type DisplayAmount = Decimal;

/// Precision helpers for common operations
pub mod precision {
    use super::*;

    /// Fractional digits shown for converted amounts
    pub const PRICE_PRECISION: u32 = 8;

    /// Fractional digits shown for the "1 X = n Y" rate
    pub const RATE_PRECISION: u32 = 6;

    /// Fractional digits shown for percentages and fiat values
    pub const PERCENT_PRECISION: u32 = 2;

    /// Round price to standard precision
    pub fn round_price(price: DisplayAmount) -> DisplayAmount {
        price.round_dp_with_strategy(PRICE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Convert a float into a decimal, if it is finite and in range
pub fn to_decimal(value: f64) -> Option<DisplayAmount> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

/// Render `value` with exactly `dp` fractional digits
///
/// Non-finite input renders as zero.
pub fn to_fixed(value: f64, dp: u32) -> String {
    if !value.is_finite() {
        return format!("{:.*}", dp as usize, 0.0);
    }
    match to_decimal(value) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", dp as usize, rounded)
        }
        // Out of Decimal range; float formatting is exact enough at that magnitude
        None => format!("{:.*}", dp as usize, value),
    }
}

/// Render a converted amount with the standard 8 fractional digits
pub fn format_amount(value: f64) -> String {
    to_fixed(value, precision::PRICE_PRECISION)
}
