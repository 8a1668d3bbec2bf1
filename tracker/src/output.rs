//! Terminal rendering for the `list` and `convert` commands

use common::format::{
    format_compact, format_conversion_rate, format_currency, format_percentage, format_rank,
    format_volume, truncate_text,
};
use common::model::market::MarketEntry;
use converter::Quote;

/// One line per entry: rank, name, symbol, price, 24h change, market cap, volume
pub fn render_table(entries: &[&MarketEntry]) -> String {
    let mut out = format!(
        "{:<6} {:<18} {:<6} {:>16} {:>9} {:>10} {:>9}\n",
        "Rank", "Name", "Symbol", "Price", "24h", "Mkt Cap", "Volume"
    );
    for entry in entries {
        out.push_str(&format!(
            "{:<6} {:<18} {:<6} {:>16} {:>9} {:>10} {:>9}\n",
            format_rank(entry.market_cap_rank),
            truncate_text(&entry.name, 18),
            entry.display_symbol(),
            format_currency(entry.current_price),
            format_percentage(entry.price_change_percentage_24h),
            format_compact(entry.market_cap),
            format_volume(entry.total_volume),
        ));
    }
    out
}

/// Converted amount and the unit rate
pub fn render_quote(quote: &Quote, from_symbol: &str, to_symbol: &str) -> String {
    format!(
        "{} {} = {} {}\n{}\n",
        quote.amount,
        from_symbol.to_uppercase(),
        quote.result_text,
        to_symbol.to_uppercase(),
        format_conversion_rate(1.0, from_symbol, quote.rate, to_symbol),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use converter::ConverterSession;

    #[test]
    fn table_has_header_and_one_row_per_entry() {
        let mut bitcoin = MarketEntry::priced("bitcoin", 50000.0);
        bitcoin.name = "Bitcoin".to_string();
        bitcoin.symbol = "btc".to_string();
        bitcoin.market_cap_rank = 1;
        bitcoin.total_volume = 32_000_000_000.0;

        let table = render_table(&[&bitcoin]);
        let lines: Vec<_> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Rank"));
        assert!(lines[1].starts_with("1st"));
        assert!(lines[1].contains("BTC"));
        assert!(lines[1].contains("$50,000.00"));
        assert!(lines[1].ends_with("32.00B"));
    }

    #[test]
    fn quote_shows_result_and_rate() {
        let entries = vec![
            MarketEntry::priced("bitcoin", 50000.0),
            MarketEntry::priced("ethereum", 2500.0),
        ];
        let quote = ConverterSession::new("bitcoin", "ethereum", "2").quote(&entries);

        let text = render_quote(&quote, "btc", "eth");

        assert!(text.starts_with("2 BTC = 40.00000000 ETH"));
        assert!(text.contains("1 BTC = 20 ETH"));
    }

    #[test]
    fn unknown_asset_shows_zero_rate() {
        let entries = vec![MarketEntry::priced("bitcoin", 50000.0)];
        let quote = ConverterSession::new("bitcoin", "doge", "1").quote(&entries);

        let text = render_quote(&quote, "btc", "doge");
        assert!(text.starts_with("1 BTC = 0.00000000 DOGE"));
        assert!(text.contains("1 BTC = 0 DOGE"));
    }
}
