//! Snapshot state owned by the refresh controller

use chrono::{DateTime, Utc};
use common::model::market::{find_entry, MarketEntry, MarketStats};
use serde::Serialize;

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Why a fetch was issued
///
/// Decides which in-flight flag the fetch raises: a full-view spinner for
/// `Initial`, a subtle indicator for `Refresh`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First load, or an explicit retry after an error
    Initial,
    /// Timer tick or a user-triggered refresh
    Refresh,
}

/// The current snapshot and its loading flags
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct RefreshState {
    /// Entries from the last successful fetch, in upstream order
    pub entries: Vec<MarketEntry>,
    /// Set until the first fetch completes, and again during a retry
    pub is_initial_loading: bool,
    /// Set while a background fetch is in flight
    pub is_refreshing: bool,
    /// Message from the most recent failed fetch
    pub last_error: Option<String>,
    /// When the entries were last replaced
    pub last_updated: Option<DateTime<Utc>>,
}

impl RefreshState {
    /// State of a controller that has not completed any fetch yet
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            is_initial_loading: true,
            is_refreshing: false,
            last_error: None,
            last_updated: None,
        }
    }

    /// Whether any fetch has ever succeeded
    pub fn has_data(&self) -> bool {
        self.last_updated.is_some()
    }

    /// Whether the view should offer a retry action
    ///
    /// Only when nothing has loaded yet; otherwise the last good list stays on
    /// screen and the next tick gets another chance.
    pub fn needs_retry(&self) -> bool {
        self.last_error.is_some() && !self.has_data() && !self.is_initial_loading
    }

    /// Look up an entry by id
    pub fn entry(&self, id: &str) -> Option<&MarketEntry> {
        find_entry(&self.entries, id)
    }

    /// Overview of the current snapshot
    pub fn stats(&self) -> MarketStats {
        MarketStats::from_entries(&self.entries)
    }
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new()
    }
}
