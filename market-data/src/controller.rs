//! Data refresh controller
//!
//! Owns the single authoritative snapshot of market entries. On `start` it
//! issues an initial fetch and spawns a timer that issues a background refresh
//! every period until `stop`. Fetches are never cancelled and may overlap;
//! whichever resolves last decides the visible entries.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use chrono::Utc;
use common::error::Result;
use common::model::market::MarketEntry;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::channel::{StateChannel, StateUpdate};
use crate::config::{FeedConfig, DEFAULT_REFRESH_INTERVAL};
use crate::feed::MarketFeed;
use crate::state::{FetchKind, RefreshState};

/// State shared between the controller handle, its timer and in-flight fetches
struct Shared {
    feed: Arc<dyn MarketFeed>,
    state: RwLock<RefreshState>,
    channel: Arc<StateChannel>,
    fetch_seq: AtomicU64,
}

impl Shared {
    /// Raise the in-flight flag now and return the fetch itself
    ///
    /// The flag is set before the returned future is first polled, so callers
    /// that spawn the fetch see the flag immediately.
    fn fetch(self: Arc<Self>, kind: FetchKind) -> impl Future<Output = ()> + Send + 'static {
        let seq = self.begin(kind);
        InFlight {
            shared: self,
            seq,
            kind,
            settled: false,
        }
        .run()
    }

    fn begin(&self, kind: FetchKind) -> u64 {
        let seq = self.fetch_seq.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(seq, ?kind, "Fetch started");

        let status = {
            let mut state = self.write_state();
            state.last_error = None;
            match kind {
                FetchKind::Initial => state.is_initial_loading = true,
                FetchKind::Refresh => state.is_refreshing = true,
            }
            status_update(&state)
        };
        self.channel.publish(status);
        seq
    }

    /// Single mutation point for fetch results
    ///
    /// Every outcome is applied as it resolves, with no ordering check against
    /// `seq`.
    fn apply_outcome(&self, seq: u64, kind: FetchKind, outcome: Result<Vec<MarketEntry>>) {
        let (snapshot, status) = {
            let mut state = self.write_state();
            let snapshot = match outcome {
                Ok(entries) => {
                    debug!(seq, ?kind, count = entries.len(), "Fetch succeeded");
                    let now = Utc::now();
                    state.entries = entries;
                    state.last_updated = Some(now);
                    Some(StateUpdate::Snapshot {
                        entries: state.entries.clone(),
                        last_updated: now,
                    })
                }
                Err(e) => {
                    warn!(seq, ?kind, "Fetch failed: {}", e);
                    state.last_error = Some(e.to_string());
                    None
                }
            };
            state.is_initial_loading = false;
            state.is_refreshing = false;
            (snapshot, status_update(&state))
        };

        if let Some(snapshot) = snapshot {
            self.channel.publish(snapshot);
        }
        self.channel.publish(status);
    }

    /// Lower the flag of a fetch whose future was dropped before it resolved
    fn abandon(&self, seq: u64, kind: FetchKind) {
        debug!(seq, ?kind, "Fetch dropped before completion");

        let status = {
            let mut state = self.write_state();
            match kind {
                FetchKind::Initial => state.is_initial_loading = false,
                FetchKind::Refresh => state.is_refreshing = false,
            }
            status_update(&state)
        };
        self.channel.publish(status);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, RefreshState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, RefreshState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// One started fetch; lowers its flag if dropped before the outcome applies
struct InFlight {
    shared: Arc<Shared>,
    seq: u64,
    kind: FetchKind,
    settled: bool,
}

impl InFlight {
    async fn run(mut self) {
        let outcome = self.shared.feed.fetch_markets().await;
        self.shared.apply_outcome(self.seq, self.kind, outcome);
        self.settled = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.settled {
            self.shared.abandon(self.seq, self.kind);
        }
    }
}

fn status_update(state: &RefreshState) -> StateUpdate {
    StateUpdate::Status {
        is_initial_loading: state.is_initial_loading,
        is_refreshing: state.is_refreshing,
        last_error: state.last_error.clone(),
    }
}

/// Periodically refreshed snapshot of market entries
pub struct RefreshController {
    shared: Arc<Shared>,
    period: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshController {
    /// Start a controller with the refresh period from `config`
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(feed: Arc<dyn MarketFeed>, config: &FeedConfig) -> Self {
        Self::start_with_period(feed, config.refresh_interval)
    }

    /// Start a controller that refreshes every `period`
    ///
    /// Issues the initial fetch immediately and schedules the first background
    /// refresh one period from now.
    ///
    /// A zero period falls back to `DEFAULT_REFRESH_INTERVAL`.
    pub fn start_with_period(feed: Arc<dyn MarketFeed>, period: Duration) -> Self {
        let period = if period.is_zero() {
            warn!(
                "Refresh period must be positive, using {:?}",
                DEFAULT_REFRESH_INTERVAL
            );
            DEFAULT_REFRESH_INTERVAL
        } else {
            period
        };

        let shared = Arc::new(Shared {
            feed,
            state: RwLock::new(RefreshState::new()),
            channel: Arc::new(StateChannel::new()),
            fetch_seq: AtomicU64::new(0),
        });

        tokio::spawn(shared.clone().fetch(FetchKind::Initial));
        let timer = tokio::spawn(run_timer(shared.clone(), period));

        info!("Refresh controller started, period {:?}", period);

        Self {
            shared,
            period,
            timer: Mutex::new(Some(timer)),
        }
    }

    /// Background refresh; current entries stay visible while it runs
    ///
    /// `is_refreshing` is raised when this is called, not when the returned
    /// future is first polled. Dropping the future before it resolves lowers
    /// the flag again and leaves the entries untouched.
    pub fn refresh(&self) -> impl Future<Output = ()> + Send + 'static {
        self.shared.clone().fetch(FetchKind::Refresh)
    }

    /// Fetch with initial-load semantics, for use after an error
    pub fn retry(&self) -> impl Future<Output = ()> + Send + 'static {
        self.shared.clone().fetch(FetchKind::Initial)
    }

    /// Spawn a background refresh without waiting for it
    pub fn trigger_refresh(&self) -> JoinHandle<()> {
        tokio::spawn(self.refresh())
    }

    /// Spawn a retry without waiting for it
    pub fn trigger_retry(&self) -> JoinHandle<()> {
        tokio::spawn(self.retry())
    }

    /// Cancel the periodic timer
    ///
    /// Idempotent. Fetches already in flight still complete and apply.
    pub fn stop(&self) {
        let handle = self
            .timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();

        if let Some(handle) = handle {
            handle.abort();
            info!("Refresh controller stopped");
        }
    }

    /// Whether the periodic timer is still scheduled
    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_some()
    }

    /// Copy of the current state
    pub fn state(&self) -> RefreshState {
        self.shared.read_state().clone()
    }

    /// Copy of the current entries
    pub fn entries(&self) -> Vec<MarketEntry> {
        self.shared.read_state().entries.clone()
    }

    /// Refresh period
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Channel on which state changes are published
    pub fn channel(&self) -> Arc<StateChannel> {
        self.shared.channel.clone()
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_timer(shared: Arc<Shared>, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        // Not awaited: a slow fetch must not hold back the next tick
        tokio::spawn(shared.clone().fetch(FetchKind::Refresh));
    }
}
