//! Offline demo data

use common::model::market::MarketEntry;

struct DemoCoin {
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    price: f64,
    change_24h: f64,
    change_7d: f64,
    market_cap: f64,
    volume: f64,
}

const COINS: [DemoCoin; 6] = [
    DemoCoin { id: "bitcoin", name: "Bitcoin", symbol: "btc", price: 50000.0, change_24h: 2.41, change_7d: 5.12, market_cap: 980_000_000_000.0, volume: 32_000_000_000.0 },
    DemoCoin { id: "ethereum", name: "Ethereum", symbol: "eth", price: 2500.0, change_24h: -1.08, change_7d: 3.4, market_cap: 300_000_000_000.0, volume: 15_000_000_000.0 },
    DemoCoin { id: "tether", name: "Tether", symbol: "usdt", price: 1.0, change_24h: 0.01, change_7d: -0.02, market_cap: 110_000_000_000.0, volume: 45_000_000_000.0 },
    DemoCoin { id: "solana", name: "Solana", symbol: "sol", price: 150.0, change_24h: 4.7, change_7d: 12.9, market_cap: 67_000_000_000.0, volume: 3_100_000_000.0 },
    DemoCoin { id: "dogecoin", name: "Dogecoin", symbol: "doge", price: 0.1542, change_24h: -3.3, change_7d: -8.1, market_cap: 22_000_000_000.0, volume: 1_200_000_000.0 },
    DemoCoin { id: "shiba-inu", name: "Shiba Inu", symbol: "shib", price: 0.00002134, change_24h: 1.9, change_7d: -2.2, market_cap: 12_500_000_000.0, volume: 480_000_000.0 },
];

/// Entries served by the demo feed, ranked by market cap
pub fn entries() -> Vec<MarketEntry> {
    COINS
        .iter()
        .enumerate()
        .map(|(i, coin)| MarketEntry {
            id: coin.id.to_string(),
            name: coin.name.to_string(),
            symbol: coin.symbol.to_string(),
            image: String::new(),
            current_price: coin.price,
            price_change_percentage_24h: coin.change_24h,
            price_change_percentage_7d: coin.change_7d,
            market_cap_rank: i as u32 + 1,
            market_cap: coin.market_cap,
            total_volume: coin.volume,
        })
        .collect()
}
