//! Channel for distributing refresh-state updates

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use common::model::market::MarketEntry;
use crossbeam_channel::{self, Receiver, Sender};
use serde::Serialize;
use uuid::Uuid;

/// Topic types for state updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// A new set of entries replaced the previous one
    Snapshot,
    /// Loading flags or the error changed
    Status,
    /// Everything
    All,
}

impl Topic {
    /// Parse a topic from its channel name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "snapshot" => Some(Topic::Snapshot),
            "status" => Some(Topic::Status),
            "all" => Some(Topic::All),
            _ => None,
        }
    }

    /// Channel name, as accepted by `from_name`
    pub fn name(&self) -> &'static str {
        match self {
            Topic::Snapshot => "snapshot",
            Topic::Status => "status",
            Topic::All => "all",
        }
    }
}

/// Message published on the channel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateUpdate {
    /// Entries were replaced wholesale
    Snapshot {
        /// New entries, in upstream order
        entries: Vec<MarketEntry>,
        /// Time of the replacement
        last_updated: DateTime<Utc>,
    },
    /// Flags or error changed
    Status {
        /// Full-view loading in progress
        is_initial_loading: bool,
        /// Background refresh in progress
        is_refreshing: bool,
        /// Most recent fetch error
        last_error: Option<String>,
    },
}

impl StateUpdate {
    /// Topic this update is published on
    pub fn topic(&self) -> Topic {
        match self {
            StateUpdate::Snapshot { .. } => Topic::Snapshot,
            StateUpdate::Status { .. } => Topic::Status,
        }
    }
}

/// Live subscription handle
pub struct Subscription {
    /// Subscription ID
    pub id: Uuid,
    /// Receiving end
    pub receiver: Receiver<Arc<StateUpdate>>,
}

/// Subscription entry
struct SubscriptionEntry {
    /// Sender channel
    sender: Sender<Arc<StateUpdate>>,
    /// Subscription ID
    id: Uuid,
}

/// State update channel
pub struct StateChannel {
    /// Senders by topic
    senders: Mutex<HashMap<Topic, Vec<SubscriptionEntry>>>,
}

impl StateChannel {
    /// Create a new state channel
    pub fn new() -> Self {
        Self {
            senders: Mutex::new(HashMap::new()),
        }
    }

    /// Subscribe to a topic
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let id = Uuid::new_v4();

        let mut senders = self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        senders.entry(topic).or_default().push(SubscriptionEntry { sender, id });

        Subscription { id, receiver }
    }

    /// Publish an update to its topic and to `Topic::All`
    pub fn publish(&self, update: StateUpdate) {
        let topic = update.topic();
        let message = Arc::new(update);
        let mut senders = self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        for target in [topic, Topic::All] {
            if let Some(entries) = senders.get_mut(&target) {
                // Dropped receivers show up as send errors
                entries.retain(|entry| entry.sender.send(message.clone()).is_ok());
            }
        }
    }

    /// Unsubscribe using subscription ID
    pub fn unsubscribe_by_id(&self, subscription_id: Uuid) -> bool {
        let mut senders = self.senders.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut found = false;

        for entries in senders.values_mut() {
            let initial_len = entries.len();
            entries.retain(|entry| entry.id != subscription_id);

            if entries.len() < initial_len {
                found = true;
            }
        }

        found
    }

    /// Number of live subscriptions on a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&topic)
            .map(|entries| entries.len())
            .unwrap_or(0)
    }
}

impl Default for StateChannel {
    fn default() -> Self {
        Self::new()
    }
}
