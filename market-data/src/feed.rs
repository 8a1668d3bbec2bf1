//! Market-data feeds
//!
//! A feed answers one question: what are the top entries right now. The
//! refresh controller treats it as a black box and never retries on its own.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use common::error::{Error, Result};
use common::model::market::MarketEntry;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;

use crate::config::{FeedConfig, DEFAULT_REQUEST_TIMEOUT};

/// Source of market entries
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Fetch the full list of entries, in upstream order
    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>>;
}

/// Feed backed by the public CoinGecko `coins/markets` endpoint
pub struct CoinGeckoFeed {
    client: Client,
    url: String,
}

impl CoinGeckoFeed {
    /// Create a feed for the given configuration
    pub fn new(config: &FeedConfig) -> Result<Self> {
        // A zero timeout would fail every request
        let timeout = if config.request_timeout.is_zero() {
            DEFAULT_REQUEST_TIMEOUT
        } else {
            config.request_timeout
        };
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigurationError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.markets_url(),
        })
    }

    /// Endpoint this feed requests
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MarketFeed for CoinGeckoFeed {
    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>> {
        debug!("GET {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::UpstreamStatus(status.as_u16()));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        serde_json::from_slice::<Vec<MarketEntry>>(&body)
            .map_err(|e| Error::MalformedResponse(e.to_string()))
    }
}

/// One scripted answer
struct Step {
    delay: Duration,
    outcome: std::result::Result<Vec<MarketEntry>, String>,
}

/// In-memory feed that plays back scripted answers
///
/// Queued answers are consumed in order; once the queue is empty every call
/// returns the fallback entries. Used for demo mode and tests.
pub struct ScriptedFeed {
    fallback: Vec<MarketEntry>,
    steps: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedFeed {
    /// Create a feed that always answers with `fallback`
    pub fn new(fallback: Vec<MarketEntry>) -> Self {
        Self {
            fallback,
            steps: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a successful answer
    pub fn push_ok(&self, entries: Vec<MarketEntry>) -> &Self {
        self.push(Duration::ZERO, Ok(entries))
    }

    /// Queue a failed answer
    pub fn push_err(&self, message: &str) -> &Self {
        self.push(Duration::ZERO, Err(message.to_string()))
    }

    /// Queue an answer that resolves after `delay`
    pub fn push_delayed(
        &self,
        delay: Duration,
        outcome: std::result::Result<Vec<MarketEntry>, String>,
    ) -> &Self {
        self.push(delay, outcome)
    }

    /// Number of fetches issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn push(&self, delay: Duration, outcome: std::result::Result<Vec<MarketEntry>, String>) -> &Self {
        self.steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(Step { delay, outcome });
        self
    }
}

#[async_trait]
impl MarketFeed for ScriptedFeed {
    async fn fetch_markets(&self) -> Result<Vec<MarketEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let step = self
            .steps
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match step {
            Some(step) => {
                if !step.delay.is_zero() {
                    tokio::time::sleep(step.delay).await;
                }
                step.outcome.map_err(Error::Transport)
            }
            None => Ok(self.fallback.clone()),
        }
    }
}
