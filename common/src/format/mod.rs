//! Display formatting for prices, volumes and percentages
//!
//! Every formatter here is total: NaN and infinities render as a zero value
//! instead of leaking "NaN" into the list or the converter.

use chrono::{DateTime, Utc};

use crate::decimal::to_fixed;

/// Format a value as US dollars with thousands separators
///
/// Shows 2 fractional digits, or up to 6 when the value is below 1 so that
/// sub-cent coins stay readable.
pub fn format_currency(value: f64) -> String {
    let max_dp = if value.abs() < 1.0 { 6 } else { 2 };
    format_currency_with(value, 2, max_dp)
}

/// Format a value as US dollars with explicit fractional digit bounds
pub fn format_currency_with(value: f64, min_dp: u32, max_dp: u32) -> String {
    if !value.is_finite() {
        return "$0.00".to_string();
    }
    let max_dp = max_dp.max(min_dp);
    let fixed = to_fixed(value.abs(), max_dp);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (fixed.clone(), String::new()),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < min_dp as usize {
        frac.push('0');
    }

    let sign = if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    let grouped = group_thousands(&int_part);
    if frac.is_empty() {
        format!("{}${}", sign, grouped)
    } else {
        format!("{}${}.{}", sign, grouped, frac)
    }
}

/// Format a large dollar value in compact form (e.g., "$1.23T")
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return "$0".to_string();
    }
    format!("${}", compact(value))
}

/// Format a volume in compact form without a currency symbol
pub fn format_volume(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    compact(value)
}

fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{}T", to_fixed(value / 1e12, 2))
    } else if abs >= 1e9 {
        format!("{}B", to_fixed(value / 1e9, 2))
    } else if abs >= 1e6 {
        format!("{}M", to_fixed(value / 1e6, 2))
    } else if abs >= 1e3 {
        format!("{}K", to_fixed(value / 1e3, 2))
    } else {
        to_fixed(value, 2)
    }
}

/// Format a percentage with a leading "+" for positive values
pub fn format_percentage(value: f64) -> String {
    format_percentage_with(value, 2, true)
}

/// Format a percentage with explicit digits and sign handling
pub fn format_percentage_with(value: f64, decimals: u32, show_sign: bool) -> String {
    if !value.is_finite() {
        return format!("{}%", to_fixed(0.0, decimals));
    }
    let sign = if show_sign && value > 0.0 { "+" } else { "" };
    format!("{}{}%", sign, to_fixed(value, decimals))
}

/// Format an asset amount, trimming trailing zeros
///
/// Amounts of 1 or more get at most 4 digits, amounts of at least 0.01 at
/// most 6, anything smaller up to `max_decimals`.
pub fn format_crypto_amount(value: f64, symbol: &str, max_decimals: u32) -> String {
    let suffix = if symbol.is_empty() {
        String::new()
    } else {
        format!(" {}", symbol)
    };
    if !value.is_finite() {
        return format!("0{}", suffix);
    }

    let decimals = if value >= 1.0 {
        max_decimals.min(4)
    } else if value >= 0.01 {
        max_decimals.min(6)
    } else {
        max_decimals
    };

    let mut formatted = to_fixed(value, decimals);
    if formatted.contains('.') {
        formatted = formatted.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{}{}", formatted, suffix)
}

/// Format the "1 BTC = 20 ETH" line
pub fn format_conversion_rate(from_amount: f64, from_symbol: &str, to_amount: f64, to_symbol: &str) -> String {
    if !from_amount.is_finite() || !to_amount.is_finite() || from_amount == 0.0 {
        return format!("1 {} = 0 {}", from_symbol.to_uppercase(), to_symbol.to_uppercase());
    }
    let rate = format_crypto_amount(to_amount / from_amount, "", 8);
    format!("1 {} = {} {}", from_symbol.to_uppercase(), rate, to_symbol.to_uppercase())
}

/// Format a market-cap rank as an ordinal ("1st", "22nd")
pub fn format_rank(rank: u32) -> String {
    if rank == 0 {
        return "N/A".to_string();
    }
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", rank, suffix)
}

/// Format how long ago `timestamp` was, relative to `now`
pub fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - timestamp).num_seconds();
    if secs < 60 {
        "Just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

/// Shorten text to `max_len` characters, ending in "..."
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Keep only digits and a single decimal point
pub fn sanitize_number_input(input: &str) -> String {
    let cleaned: String = input.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    match cleaned.split_once('.') {
        Some((int_part, rest)) => format!("{}.{}", int_part, rest.replace('.', "")),
        None => cleaned,
    }
}

/// Whether `text` parses as a finite, non-negative amount
pub fn is_valid_amount(text: &str) -> bool {
    text.trim()
        .parse::<f64>()
        .map(|v| v.is_finite() && v >= 0.0)
        .unwrap_or(false)
}

/// Map a raw fetch error message to something a user can act on
pub fn friendly_error_message(message: &str) -> String {
    if message.contains("Network") || message.contains("fetch") {
        "Network error. Please check your connection and try again.".to_string()
    } else if message.contains("404") {
        "The requested data could not be found.".to_string()
    } else if message.contains("429") {
        "Too many requests. Please wait a moment and try again.".to_string()
    } else if message.contains("500") || message.contains("502") || message.contains("503") {
        "Server error. Please try again later.".to_string()
    } else if message.is_empty() {
        "An unexpected error occurred.".to_string()
    } else {
        message.to_string()
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
