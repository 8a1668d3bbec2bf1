//! Market data: the upstream feed, the periodically refreshed snapshot, and
//! the helpers views use to browse it

pub mod channel;
pub mod config;
mod controller;
pub mod feed;
pub mod search;
mod state;

pub use config::FeedConfig;
pub use controller::RefreshController;
pub use feed::{CoinGeckoFeed, MarketFeed, ScriptedFeed};
pub use search::filter_entries;
pub use state::{FetchKind, RefreshState};

pub use common::model::market::{MarketEntry, MarketStats};
