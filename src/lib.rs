//! Metapackage for workspace integration tests
//!
//! Holds fixtures shared by the tests under `tests/`.

pub mod fixtures {
    use std::sync::Arc;
    use std::time::Duration;

    use api_gateway::AppState;
    use common::model::market::MarketEntry;
    use market_data::RefreshController;
    use settings_service::SettingsService;

    /// Entry with the fields the views read
    pub fn entry(id: &str, name: &str, symbol: &str, price: f64, change_24h: f64) -> MarketEntry {
        let mut entry = MarketEntry::priced(id, price);
        entry.name = name.to_string();
        entry.symbol = symbol.to_string();
        entry.price_change_percentage_24h = change_24h;
        entry
    }

    /// Two-coin snapshot where 1 BTC buys 20 ETH
    pub fn sample_entries() -> Vec<MarketEntry> {
        vec![
            entry("bitcoin", "Bitcoin", "btc", 50000.0, 2.5),
            entry("ethereum", "Ethereum", "eth", 2500.0, -1.25),
        ]
    }

    /// Poll until no fetch is flagged as in flight, giving up after `limit`
    pub async fn wait_until_idle(controller: &RefreshController, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let state = controller.state();
            if !state.is_initial_loading && !state.is_refreshing {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Gateway state around a controller, with fresh settings
    pub fn app_state(controller: Arc<RefreshController>) -> Arc<AppState> {
        Arc::new(AppState {
            controller,
            settings: Arc::new(SettingsService::new()),
        })
    }
}
