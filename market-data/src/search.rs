//! Search over a snapshot

use common::model::market::MarketEntry;

/// Entries whose name or symbol contains `term`, ignoring case
///
/// A blank term matches everything. Snapshot order is preserved.
pub fn filter_entries<'a>(entries: &'a [MarketEntry], term: &str) -> Vec<&'a MarketEntry> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return entries.iter().collect();
    }

    entries
        .iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&needle)
                || entry.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, symbol: &str) -> MarketEntry {
        let mut entry = MarketEntry::priced(id, 1.0);
        entry.name = name.to_string();
        entry.symbol = symbol.to_string();
        entry
    }

    fn sample() -> Vec<MarketEntry> {
        vec![
            entry("bitcoin", "Bitcoin", "btc"),
            entry("ethereum", "Ethereum", "eth"),
            entry("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc"),
        ]
    }

    #[test]
    fn matches_name_or_symbol_case_insensitively() {
        let entries = sample();
        let ids: Vec<_> = filter_entries(&entries, "BTC").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin"]);

        let ids: Vec<_> = filter_entries(&entries, "ether").iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ethereum"]);
    }

    #[test]
    fn blank_term_matches_everything() {
        let entries = sample();
        assert_eq!(filter_entries(&entries, "  ").len(), 3);
    }

    #[test]
    fn no_match_is_empty() {
        let entries = sample();
        assert!(filter_entries(&entries, "doge").is_empty());
    }
}
